use anyhow::{Context, Result};
use clap::builder::TypedValueParser;
use clap::Parser;
use env_logger::Builder;
use log::{info, Level, LevelFilter};
use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use tabular_anonymization::config::Config;
use tabular_anonymization::io::{read_csv, write_csv, CsvOptions};
use tabular_anonymization::Anonymizer;

#[derive(Clone)]
struct DelimiterParser;

impl TypedValueParser for DelimiterParser {
    type Value = u8;

    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let s = value.to_str().ok_or_else(|| {
            clap::Error::raw(clap::error::ErrorKind::InvalidUtf8, "invalid delimiter")
        })?;

        match s.as_bytes() {
            [b'\\', b't'] => Ok(b'\t'),
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("{s} is not a single ASCII character\n"),
            )),
        }
    }
}

/// Anonymize a CSV table column by column
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input table ('-' for stdin)
    #[arg(value_name = "INPUT_TABLE")]
    input_table: PathBuf,

    /// JSON file with the anonymization rules per column
    #[arg(value_name = "INPUT_CONFIG")]
    input_config: PathBuf,

    /// Output table ('-' for stdout)
    #[arg(value_name = "OUTPUT_TABLE")]
    output_table: PathBuf,

    /// Field delimiter of the input table
    #[arg(short, long, default_value = ",", value_parser = DelimiterParser)]
    delimiter: u8,

    /// Field delimiter of the output table (default: same as the input)
    #[arg(long, value_parser = DelimiterParser)]
    output_delimiter: Option<u8>,

    /// Seed for the randomized methods, overriding the one in the config
    #[arg(short, long, env = "TABANON_SEED")]
    seed: Option<u64>,

    /// Show more verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path == Path::new("-") {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ))
    }
}

fn create_output(path: &Path) -> Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdout().lock()));
    }

    // Create intermediate output directories if they don't exist yet
    if let Some(parent_dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent_dir)
            .with_context(|| format!("failed to create {}", parent_dir.display()))?;
    }

    Ok(Box::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    ))
}

fn load_config(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    Config::from_json(&json).with_context(|| format!("failed to load config {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    };

    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "Error",
                Level::Warn => "Warning",
                Level::Info => "Info",
                Level::Debug => "Debug",
                Level::Trace => "Trace",
            };
            writeln!(buf, "{}: {}", level, record.args())
        })
        .filter(None, log_level);
    builder.init();

    let mut config = load_config(&args.input_config)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let input_options = CsvOptions::with_delimiter(args.delimiter);
    let output_options =
        CsvOptions::with_delimiter(args.output_delimiter.unwrap_or(args.delimiter));

    let input = open_input(&args.input_table)?;
    let dataset = read_csv(input, &input_options, &config)
        .with_context(|| format!("failed to read {}", args.input_table.display()))?;
    info!(
        "read {} rows and {} columns from {}",
        dataset.row_count(),
        dataset.columns().len(),
        args.input_table.display()
    );

    let anonymized = Anonymizer::new(config)
        .anonymize(&dataset)
        .with_context(|| format!("failed to anonymize {}", args.input_table.display()))?;

    let output = create_output(&args.output_table)?;
    write_csv(output, &anonymized, &output_options)
        .with_context(|| format!("failed to write {}", args.output_table.display()))?;

    Ok(())
}
