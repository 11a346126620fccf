//! qb2iif CLI
//!
//! Converts a QuickBooks account export into an IIF import file next to it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv            # writes ledger.iif and ledger.log
//! cargo run -- ledger.csv -o out.iif --no-log-file
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to trace parsing and emission

use clap::Parser;
use qb2iif::{
    convert_file, paths, AmountSign, Console, ConvertError, ConverterConfig, FanOut, LogFile,
    LogSink, Result,
};
use std::path::PathBuf;
use std::process;

/// Convert a QuickBooks CSV export into an IIF file
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the CSV export
    input: Option<PathBuf>,

    /// Where to write the IIF file [default: input path with an .iif extension]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML file overriding column names, transaction types and sentinels
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional transaction type whose main leg is negative (repeatable)
    #[arg(long = "outgoing-type")]
    outgoing_types: Vec<String>,

    /// Additional transaction type whose main leg is positive (repeatable)
    #[arg(long = "incoming-type")]
    incoming_types: Vec<String>,

    /// Treat the Credit column as positive and Debit as negative
    #[arg(long)]
    credit_positive: bool,

    /// Do not write diagnostics to a .log file next to the input
    #[arg(long)]
    no_log_file: bool,
}

impl Args {
    fn converter_config(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_yaml_file(path)?,
            None => ConverterConfig::default(),
        };
        config.outgoing_types.extend(self.outgoing_types.iter().cloned());
        config.incoming_types.extend(self.incoming_types.iter().cloned());
        if self.credit_positive {
            config.amount_sign = AmountSign::CreditPositive;
        }
        Ok(config)
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let input = args.input.clone().ok_or(ConvertError::MissingInput)?;
    let config = args.converter_config()?;
    let output = args.output.clone().unwrap_or_else(|| paths::iif_path(&input));

    let mut log_file = if args.no_log_file {
        None
    } else {
        Some(LogFile::create(&paths::log_path(&input))?)
    };
    let mut console = Console;

    let result = {
        let mut sink = FanOut::default();
        sink.push(&mut console);
        if let Some(log_file) = log_file.as_mut() {
            sink.push(log_file);
        }
        convert_file(&input, &output, &config, &mut sink)
    };

    if let (Err(e), Some(log_file)) = (&result, log_file.as_mut()) {
        log_file.write(&e.to_string());
    }
    result.map(|_| ())
}
