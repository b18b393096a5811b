//! dbml-convert CLI
//!
//! 解析済みDBMLスキーマ（JSON）をCSVまたはExcelワークブックへ変換する
//! コマンドラインツール。

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;

use dbmlsheet::{convert_file, DbmlSheetError, Format};

#[derive(Parser)]
#[command(name = "dbml-convert")]
#[command(version)]
#[command(about = "Convert a parsed DBML schema (JSON) to CSV or Excel table definitions")]
#[command(after_help = "EXAMPLES:
    # Convert to CSV files (one per table, plus a table overview)
    dbml-convert schema.json output/ --format csv

    # Convert to a multi-sheet Excel workbook
    dbml-convert schema.json schema.xlsx --format xlsx

    # Default output path next to the input file
    dbml-convert schema.json --format xlsx --verbose

The input file is the JSON serialization of an external DBML parser's
output (an object with a `tables` array).")]
struct Cli {
    /// Parsed DBML schema file (JSON)
    input: PathBuf,

    /// Output file or directory path
    output: Option<PathBuf>,

    /// Output format (csv, xlsx)
    #[arg(short, long, default_value = "csv", value_parser = parse_format)]
    format: Format,

    /// Output file path (alternative to the positional argument)
    #[arg(short = 'o', long = "out-file")]
    out_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

fn parse_format(s: &str) -> Result<Format, String> {
    Format::from_str(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(&cli) {
        eprintln!("Conversion failed: {}", error);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DbmlSheetError> {
    let output = cli.out_file.as_deref().or(cli.output.as_deref());

    if cli.verbose {
        println!(
            "Converting {} to {} format...",
            cli.input.display(),
            cli.format
        );
        if let Some(output) = output {
            println!("Output: {}", output.display());
        }
    }

    let report = convert_file(&cli.input, output, cli.format)?;

    println!("Conversion completed successfully");
    if cli.verbose {
        println!("Tables processed: {}", report.tables_count);
        println!("Output path: {}", report.output.display());
        if !report.files.is_empty() {
            println!("Files generated: {}", report.files.len());
        }
        if !report.worksheets.is_empty() {
            println!("Worksheets: {}", report.worksheets.join(", "));
        }
    }

    Ok(())
}
