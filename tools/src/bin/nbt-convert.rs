use std::io::Write;
use std::path::Path;

use clap::{App, Arg, ArgMatches};
use env_logger::Env;
use log::{debug, error, info};
use quicknbt::binary::{self, BinaryFormat, DeOpts};
use quicknbt::snbt::{self, SnbtFormat};
use quicknbt::Tag;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Storage version written into headers when the input did not carry one.
const DEFAULT_STORAGE_VERSION: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Binary(BinaryFormat),
    Snbt,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Output {
    Binary(BinaryFormat),
    Snbt,
    Json,
}

fn binary_format(name: &str) -> Option<BinaryFormat> {
    match name {
        "be" => Some(BinaryFormat::BigEndianFixed),
        "le" => Some(BinaryFormat::LittleEndianFixed),
        "varint" => Some(BinaryFormat::LittleEndianVarInt),
        _ => None,
    }
}

fn parse_input(name: &str) -> Result<Input> {
    match name {
        "snbt" => Ok(Input::Snbt),
        "auto" => Ok(Input::Auto),
        _ => binary_format(name)
            .map(Input::Binary)
            .ok_or_else(|| format!("unknown input format: {}", name).into()),
    }
}

fn parse_output(name: &str) -> Result<Output> {
    match name {
        "snbt" => Ok(Output::Snbt),
        "json" => Ok(Output::Json),
        _ => binary_format(name)
            .map(Output::Binary)
            .ok_or_else(|| format!("unknown output format: {}", name).into()),
    }
}

/// A decoded document and, for headered binary input, its storage version.
struct Document {
    tag: Tag,
    storage_version: Option<i32>,
}

fn decode_binary(data: &[u8], format: BinaryFormat, header: bool) -> Result<Document> {
    if header {
        let (version, tag) = binary::from_bytes_with_header(data, format)?;
        debug!("storage version {}", version);
        Ok(Document {
            tag,
            storage_version: Some(version),
        })
    } else {
        let tag = binary::from_bytes_with_opts(data, format, DeOpts::new().exact(true))?;
        Ok(Document {
            tag,
            storage_version: None,
        })
    }
}

fn decode(data: &[u8], input: Input, header: bool) -> Result<Document> {
    match input {
        Input::Binary(format) => decode_binary(data, format, header),
        Input::Snbt => Ok(Document {
            tag: snbt::from_snbt(std::str::from_utf8(data)?)?,
            storage_version: None,
        }),
        Input::Auto => {
            if let Some(detected) = binary::detect_format(data) {
                info!(
                    "detected {:?}{}",
                    detected.format,
                    if detected.header { " with header" } else { "" }
                );
                return decode_binary(data, detected.format, detected.header);
            }

            let text = std::str::from_utf8(data)
                .map_err(|_| "input is not a recognised binary format or SNBT text")?;
            info!("no binary format matched, reading as SNBT");
            Ok(Document {
                tag: snbt::from_snbt(text)?,
                storage_version: None,
            })
        }
    }
}

fn encode(doc: &Document, output: Output, header: bool, indent: usize) -> Result<Vec<u8>> {
    let bytes = match output {
        Output::Binary(format) if header => {
            let version = doc.storage_version.unwrap_or(DEFAULT_STORAGE_VERSION);
            binary::to_bytes_with_header(&doc.tag, format, version)?
        }
        Output::Binary(format) => binary::to_bytes(&doc.tag, format)?,
        Output::Snbt => {
            let mut text = snbt::to_snbt(&doc.tag, SnbtFormat::pretty(indent));
            text.push('\n');
            text.into_bytes()
        }
        Output::Json => {
            let mut text = doc.tag.to_json(indent)?;
            text.push('\n');
            text.into_bytes()
        }
    };
    Ok(bytes)
}

fn validate(data: &[u8], input: Input, header: bool) -> bool {
    match input {
        Input::Binary(format) if !header => binary::validate(data, format),
        _ => decode(data, input, header).is_ok(),
    }
}

fn run(args: &ArgMatches) -> Result<()> {
    let path = Path::new(args.value_of("input").ok_or("no input given")?);
    let input = parse_input(args.value_of("from").unwrap_or("auto"))?;
    let output = parse_output(args.value_of("to").unwrap_or("snbt"))?;
    let header = args.is_present("header");
    let indent: usize = args.value_of("pretty").unwrap_or("0").parse()?;

    let data = std::fs::read(path)?;
    debug!("read {} bytes from {}", data.len(), path.display());

    if args.is_present("validate") {
        let valid = validate(&data, input, header);
        println!(
            "{}: {}",
            path.display(),
            if valid { "valid" } else { "invalid" }
        );
        return if valid {
            Ok(())
        } else {
            Err("validation failed".into())
        };
    }

    let doc = decode(&data, input, header)?;
    let bytes = encode(&doc, output, header, indent)?;

    match args.value_of("output") {
        Some(out) => {
            std::fs::write(out, &bytes)?;
            info!("wrote {} bytes to {}", bytes.len(), out);
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&bytes)?;
            lock.flush()?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("nbt-convert")
        .about("Convert NBT between binary encodings, SNBT and JSON")
        .arg(Arg::with_name("input").takes_value(true).required(true))
        .arg(
            Arg::with_name("from")
                .long("from")
                .takes_value(true)
                .possible_values(&["be", "le", "varint", "snbt", "auto"])
                .default_value("auto"),
        )
        .arg(
            Arg::with_name("to")
                .long("to")
                .takes_value(true)
                .possible_values(&["be", "le", "varint", "snbt", "json"])
                .default_value("snbt"),
        )
        .arg(
            Arg::with_name("header")
                .long("header")
                .help("binary input or output carries an 8-byte storage version header"),
        )
        .arg(
            Arg::with_name("pretty")
                .long("pretty")
                .takes_value(true)
                .default_value("0")
                .help("indent text output by this many spaces per level"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("validate")
                .long("validate")
                .help("only report whether the input decodes"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}
