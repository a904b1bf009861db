use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use embed_export::{CodeNames, Document, EmojiCatalog, OutputFormat, RandomIds, export};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "embed-export")]
#[command(about = "Export an embed editor document as message components JSON and builder code", long_about = None)]
struct Cli {
    /// Document JSON file; read from stdin when omitted.
    #[arg(long, value_name = "DOCUMENT_JSON")]
    document: Option<PathBuf>,
    /// Emoji catalog JSON, consulted before the document's own emojis.
    #[arg(long, value_name = "CATALOG_JSON")]
    catalog: Option<PathBuf>,
    /// json, code or both. Defaults to EMBED_EXPORT_FORMAT, then both.
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,
    #[arg(long, value_name = "IDENT")]
    container_var: Option<String>,
    #[arg(long, value_name = "IDENT")]
    rows_var: Option<String>,
    #[arg(long, value_name = "IDENT")]
    components_var: Option<String>,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(value).ok_or_else(|| format!("unknown format `{value}`"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let input = read_document_json(cli.document.as_ref())?;
    let document = Document::from_json_str(&input, &mut RandomIds).context("parse document")?;

    let catalog = match &cli.catalog {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read catalog {}", path.display()))?;
            let overrides = EmojiCatalog::from_json_str(&raw).context("parse catalog")?;
            document.emojis.merged_with(&overrides)
        }
        None => document.emojis.clone(),
    };

    let defaults = CodeNames::default();
    let names = CodeNames {
        container: cli.container_var.unwrap_or(defaults.container),
        rows: cli.rows_var.unwrap_or(defaults.rows),
        components: cli.components_var.unwrap_or(defaults.components),
    }
    .sanitized();
    let format = cli.format.unwrap_or_else(OutputFormat::from_env);
    debug!(?format, items = document.items.len(), emojis = catalog.len(), "exporting");

    let exported = export(&document, &catalog, format, &names);
    match (exported.json, exported.code) {
        (Some(components), Some(code)) => {
            let both = json!({ "components": components["components"], "code": code });
            println!("{}", serde_json::to_string_pretty(&both)?);
        }
        (Some(components), None) => println!("{}", serde_json::to_string_pretty(&components)?),
        (None, Some(code)) => print!("{code}"),
        (None, None) => return Err(anyhow!("nothing to export for format {format:?}")),
    }
    Ok(())
}

fn read_document_json(path: Option<&PathBuf>) -> Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path)
            .with_context(|| format!("read document {}", path.display()));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Err(anyhow!("document JSON required via --document or stdin"));
    }
    Ok(buf)
}
