use super::{parser::is_bare_string, SnbtFormat};
use crate::{Compound, List, Tag};

pub(crate) struct Printer {
    out: String,
    format: SnbtFormat,
    level: usize,
}

impl Printer {
    pub(crate) fn new(format: SnbtFormat) -> Self {
        Self {
            out: String::new(),
            format,
            level: 0,
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn pretty(&self) -> bool {
        self.format.indent > 0
    }

    fn newline(&mut self) {
        self.out.push('\n');
        let width = self.level.saturating_mul(self.format.indent);
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    fn separator(&mut self, multiline: bool) {
        self.out.push(',');
        if multiline {
            self.newline();
        } else if self.pretty() {
            self.out.push(' ');
        }
    }

    pub(crate) fn tag(&mut self, tag: &Tag) {
        match tag {
            Tag::End => {}
            Tag::Byte(v) => self.integer(*v, "b"),
            Tag::Short(v) => self.integer(*v, "s"),
            Tag::Int(v) => self.integer(*v, ""),
            Tag::Long(v) => self.integer(*v, "l"),
            Tag::Float(v) => self.float(*v as f64, v.is_finite().then(|| *v), "f"),
            Tag::Double(v) => self.float(*v, v.is_finite().then(|| *v), "d"),
            Tag::String(v) => self.string(v),
            Tag::ByteArray(v) => self.array("B", v.iter().map(|b| (*b as i64, "b"))),
            Tag::IntArray(v) => self.array("I", v.iter().map(|i| (*i as i64, ""))),
            Tag::LongArray(v) => self.array("L", v.iter().map(|l| (*l, "l"))),
            Tag::List(v) => self.list(v),
            Tag::Compound(v) => self.compound(v),
        }
    }

    fn integer<I: itoa::Integer>(&mut self, v: I, suffix: &str) {
        let mut buffer = itoa::Buffer::new();
        self.out.push_str(buffer.format(v));
        self.out.push_str(suffix);
    }

    // `finite` carries the value in its own width so ryu prints the shortest
    // text that reads back to the same bits.
    fn float<F: ryu::Float>(&mut self, v: f64, finite: Option<F>, suffix: &str) {
        match finite {
            Some(f) => {
                let mut buffer = ryu::Buffer::new();
                self.out.push_str(buffer.format_finite(f));
            }
            None if v.is_nan() => self.out.push_str("NaN"),
            None if v > 0.0 => self.out.push_str("Infinity"),
            None => self.out.push_str("-Infinity"),
        }
        self.out.push_str(suffix);
    }

    fn string(&mut self, s: &str) {
        if !self.format.force_quote && is_bare_string(s) {
            self.out.push_str(s);
        } else {
            self.quoted(s);
        }
    }

    fn key(&mut self, key: &str) {
        let bare = !key.is_empty() && key.chars().all(super::parser::is_bare_char);
        if !self.format.force_quote && bare {
            self.out.push_str(key);
        } else {
            self.quoted(key);
        }
    }

    fn quoted(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                c if c.is_control() && (c as u32) < 0x80 => {
                    self.out.push_str(&format!("\\x{:02x}", c as u32))
                }
                c if self.format.ascii_escape && !c.is_ascii() => {
                    let code = c as u32;
                    if code <= 0xffff {
                        self.out.push_str(&format!("\\u{:04x}", code));
                    } else {
                        self.out.push_str(&format!("\\U{:08x}", code));
                    }
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn array(&mut self, prefix: &str, values: impl ExactSizeIterator<Item = (i64, &'static str)>) {
        self.out.push('[');
        self.out.push_str(prefix);
        self.out.push(';');
        if values.len() == 0 {
            self.out.push(']');
            return;
        }

        let multiline = self.pretty() && self.format.array_line_feed;
        if multiline {
            self.level += 1;
            self.newline();
        } else if self.pretty() {
            self.out.push(' ');
        }

        for (i, (v, suffix)) in values.enumerate() {
            if i > 0 {
                self.separator(multiline);
            }
            self.integer(v, suffix);
        }

        if multiline {
            self.level -= 1;
            self.newline();
        }
        self.out.push(']');
    }

    fn list(&mut self, list: &List) {
        self.out.push('[');
        if list.is_empty() {
            self.out.push(']');
            return;
        }

        let nested = list
            .iter()
            .any(|t| matches!(t, Tag::List(_) | Tag::Compound(_)));
        let multiline = self.pretty() && (self.format.always_line_feed || nested);
        if multiline {
            self.level += 1;
            self.newline();
        }

        for (i, item) in list.iter().enumerate() {
            if i > 0 {
                self.separator(multiline);
            }
            self.tag(item);
        }

        if multiline {
            self.level -= 1;
            self.newline();
        }
        self.out.push(']');
    }

    fn compound(&mut self, compound: &Compound) {
        self.out.push('{');
        if compound.is_empty() {
            self.out.push('}');
            return;
        }

        let multiline = self.pretty();
        if multiline {
            self.level += 1;
            self.newline();
        }

        for (i, (key, value)) in compound.iter().enumerate() {
            if i > 0 {
                self.separator(multiline);
            }
            self.key(key);
            self.out.push(':');
            if multiline {
                self.out.push(' ');
            }
            self.tag(value);
        }

        if multiline {
            self.level -= 1;
            self.newline();
        }
        self.out.push('}');
    }
}
