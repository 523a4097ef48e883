//! Info command - describe the address form for a locale.

use std::path::PathBuf;

use clap::Args;
use console::style;

use addrfmt_core::{AddressFmt, Constraint, FormatOptions, FormatRow, Locale};

use super::{load_config, open_store};

/// Arguments for the info command.
#[derive(Args)]
pub struct InfoArgs {
    /// Locale whose form to describe (default: from configuration)
    #[arg(short, long)]
    locale: Option<String>,

    /// Language for the labels, as a locale (default: the form's locale)
    #[arg(short, long)]
    display: Option<String>,

    /// Template style (default: from configuration)
    #[arg(short, long)]
    style: Option<String>,

    /// Print a readable summary instead of JSON
    #[arg(long)]
    text: bool,

    /// Extra locale data directory, searched first
    #[arg(long = "data-dir")]
    data_dirs: Vec<PathBuf>,
}

pub async fn run(args: InfoArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config, &args.data_dirs);

    let locale = args
        .locale
        .unwrap_or_else(|| config.locale.default_locale.clone());
    let style_name = args
        .style
        .unwrap_or_else(|| config.format.default_style.clone());
    let display = args.display.map(Locale::from);

    let options = FormatOptions::new()
        .with_locale(locale.as_str())
        .with_style(style_name);
    let formatter = AddressFmt::create(store, options).await;

    let Some(rows) = formatter.format_info(display.as_ref()).await else {
        anyhow::bail!("Locale data for {} could not be loaded", locale);
    };

    if args.text {
        print_rows(&rows);
    } else {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    Ok(())
}

fn print_rows(rows: &[FormatRow]) {
    for (i, row) in rows.iter().enumerate() {
        println!("{}", style(format!("Line {}", i + 1)).bold());
        for component in row {
            let constraint = match &component.constraint {
                Some(Constraint::Pattern(pattern)) => format!("pattern {pattern}"),
                Some(Constraint::Choices(choices)) => format!("{} choices", choices.len()),
                None => "free text".to_string(),
            };
            println!(
                "  {:<14} {:<24} {}",
                component.component,
                component.label,
                style(constraint).dim()
            );
        }
    }
}
