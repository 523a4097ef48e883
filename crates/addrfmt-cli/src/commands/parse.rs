//! Parse command - split free text into address fields.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use addrfmt_core::{Address, AddressField, AddressParser};

use super::{load_config, open_store, read_input};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Address text (default: read from --input or stdin)
    text: Option<String>,

    /// Read the address from a file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Context locale (default: from configuration)
    #[arg(short, long)]
    locale: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extra locale data directory, searched first
    #[arg(long = "data-dir")]
    data_dirs: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// One `field: value` line per component
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config, &args.data_dirs);
    let text = read_input(args.text, args.input.as_deref())?;

    let mut parser = AddressParser::new(store);
    if let Some(locale) = args.locale {
        parser = parser.with_locale(locale);
    }
    info!("Parsing with locale {}", parser.locale());

    let address = parser.parse_async(text).await;
    let output = render(&address, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn render(address: &Address, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(address)?),
        OutputFormat::Text => Ok(AddressField::ALL
            .iter()
            .filter_map(|&field| address.get(field).map(|value| format!("{field}: {value}")))
            .chain(std::iter::once(format!("format: {}", address.format.as_str())))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
