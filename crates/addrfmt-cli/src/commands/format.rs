//! Format command - render an address for display.

use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use addrfmt_core::{AddressFmt, AddressInput, AddressParser, FormatOptions};

use super::{load_config, open_store, read_input};

/// Arguments for the format command.
#[derive(Args)]
pub struct FormatArgs {
    /// Address as a JSON object of fields, or free text to parse first
    /// (default: read from --input or stdin)
    address: Option<String>,

    /// Read the address from a file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Locale whose conventions apply (default: from configuration)
    #[arg(short, long)]
    locale: Option<String>,

    /// Template style (default: from configuration)
    #[arg(short, long)]
    style: Option<String>,

    /// Extra locale data directory, searched first
    #[arg(long = "data-dir")]
    data_dirs: Vec<PathBuf>,
}

/// JSON objects are taken as fields, anything else as free text.
fn to_input(raw: String) -> anyhow::Result<AddressInput> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(trimmed)?;
        return Ok(AddressInput::try_from(value)?);
    }
    Ok(AddressInput::Text(raw))
}

pub async fn run(args: FormatArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config, &args.data_dirs);
    let raw = read_input(args.address, args.input.as_deref())?;

    let locale = args
        .locale
        .unwrap_or_else(|| config.locale.default_locale.clone());
    let style = args
        .style
        .unwrap_or_else(|| config.format.default_style.clone());

    let input = to_input(raw)?;
    if matches!(input, AddressInput::Text(_)) {
        debug!("Input is free text, parsing it first");
    }
    let address = AddressParser::new(store.clone())
        .with_locale(locale.as_str())
        .parse_async(input)
        .await;

    info!("Formatting for {} with style {}", locale, style);
    let options = FormatOptions::new()
        .with_locale(locale.as_str())
        .with_style(style);
    let formatter = AddressFmt::create(store, options).await;

    println!("{}", formatter.format_async(&address).await);

    Ok(())
}
