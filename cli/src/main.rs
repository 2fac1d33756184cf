use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::{ArgAction, Parser, ValueEnum};
use toon_codec::{
    decode_with_warnings, encode_value, DecodeOptions, Delimiter, EncodeOptions, ExpandPaths,
    Indent, KeyFolding, Value,
};

#[derive(Parser, Debug)]
#[command(name = "toon", version, about = "TOON encoder/decoder")]
struct Args {
    /// Input file path (.json or .toon). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode (overrides auto-detection).
    #[arg(short = 'e', long)]
    encode: bool,

    /// Force decode mode (overrides auto-detection).
    #[arg(short = 'd', long)]
    decode: bool,

    /// Array delimiter: , (comma), \t (tab), | (pipe).
    #[arg(long, value_name = "char", value_parser = parse_delimiter)]
    delimiter: Option<Delimiter>,

    /// Indentation size (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Sort object keys when encoding.
    #[arg(long = "sort-keys")]
    sort_keys: bool,

    /// Escape non-ASCII characters when encoding.
    #[arg(long = "ensure-ascii")]
    ensure_ascii: bool,

    /// Key folding mode: off, safe (default: off).
    #[arg(long = "key-folding", value_enum, value_name = "mode", default_value_t = ModeArg::Off)]
    key_folding: ModeArg,

    /// Path expansion mode: off, safe (default: off).
    #[arg(long = "expand-paths", value_enum, value_name = "mode", default_value_t = ModeArg::Off)]
    expand_paths: ModeArg,

    /// Disable strict validation when decoding.
    #[arg(long = "no-strict", action = ArgAction::SetFalse, default_value_t = true)]
    strict: bool,

    /// Show size statistics on stderr.
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Off,
    Safe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    match raw {
        "," => Ok(Delimiter::Comma),
        "\t" | "\\t" | "tab" => Ok(Delimiter::Tab),
        "|" => Ok(Delimiter::Pipe),
        other => Err(format!("unsupported delimiter '{other}'")),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(&args, &input_source, &input_text);

    let output = match mode {
        Mode::Encode => run_encode(&args, &input_text)?,
        Mode::Decode => run_decode(&args, &input_text)?,
    };

    if args.stats {
        print_stats(mode, &input_text, &output);
    }
    write_output(args.output.as_deref(), &output)
}

fn read_input(path: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok((text, InputSource::File(path.to_string())))
        }
    }
}

fn resolve_mode(args: &Args, source: &InputSource, input: &str) -> Mode {
    if args.encode {
        return Mode::Encode;
    }
    if args.decode {
        return Mode::Decode;
    }
    if let InputSource::File(path) = source {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("json") => return Mode::Encode,
            Some("toon") => return Mode::Decode,
            _ => {}
        }
    }
    // Stdin or unknown extension: JSON input means encode.
    if serde_json::from_str::<serde_json::Value>(input).is_ok() {
        Mode::Encode
    } else {
        Mode::Decode
    }
}

fn encode_options(args: &Args) -> EncodeOptions {
    let mut options = EncodeOptions::new()
        .with_indent(Indent::spaces(args.indent))
        .with_sort_keys(args.sort_keys)
        .with_ensure_ascii(args.ensure_ascii);
    if let Some(delimiter) = args.delimiter {
        options = options.with_delimiter(delimiter);
    }
    if args.key_folding == ModeArg::Safe {
        options = options.with_key_folding(KeyFolding::Safe);
    }
    options
}

fn decode_options(args: &Args) -> DecodeOptions {
    let mut options = DecodeOptions::new()
        .with_indent(Indent::spaces(args.indent))
        .with_strict(args.strict);
    if args.expand_paths == ModeArg::Safe {
        options = options.with_expand_paths(ExpandPaths::Safe);
    }
    options
}

fn run_encode(args: &Args, input: &str) -> Result<String, Box<dyn Error>> {
    let json: serde_json::Value = serde_json::from_str(input)?;
    let value = Value::from(&json);
    let mut encoded = encode_value(&value, &encode_options(args))?;
    encoded.push('\n');
    Ok(encoded)
}

fn run_decode(args: &Args, input: &str) -> Result<String, Box<dyn Error>> {
    let (value, warnings) = decode_with_warnings(input, &decode_options(args))?;
    for warning in &warnings {
        eprintln!(
            "WARN   {} (line {}, column {})",
            warning.message, warning.line, warning.column
        );
    }
    let json = serde_json::Value::from(value);
    let mut rendered = serde_json::to_string_pretty(&json)?;
    rendered.push('\n');
    Ok(rendered)
}

fn print_stats(mode: Mode, input: &str, output: &str) {
    let label = match mode {
        Mode::Encode => "encoded",
        Mode::Decode => "decoded",
    };
    let in_bytes = input.len();
    let out_bytes = output.len();
    let saved = if in_bytes > 0 {
        100.0 - (out_bytes as f64 / in_bytes as f64) * 100.0
    } else {
        0.0
    };
    eprintln!(
        "STATS  {label}: {in_bytes} bytes in, {out_bytes} bytes out ({saved:+.1}% saved), {} lines",
        output.lines().count()
    );
}

fn write_output(path: Option<&str>, output: &str) -> Result<(), Box<dyn Error>> {
    match path {
        None => {
            io::stdout().write_all(output.as_bytes())?;
            Ok(())
        }
        Some(path) => {
            fs::write(path, output)?;
            Ok(())
        }
    }
}
