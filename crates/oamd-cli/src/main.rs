use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use oamd_core::DocGenerator;
use oamd_core::assemble::{self, AssembleOptions};
use oamd_core::locale::{Locale, Messages};
use oamd_core::parse;
use oamd_markdown::MarkdownGenerator;

#[derive(Parser)]
#[command(
    name = "oamd",
    about = "OpenAPI 3.x to Markdown reference generator",
    version
)]
struct Cli {
    /// Path to the OpenAPI document (YAML or JSON)
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = oamd_markdown::OUTPUT_FILE_NAME)]
    output: PathBuf,

    /// Output locale tag (ru or en)
    #[arg(long, default_value = "ru")]
    locale: Locale,

    /// Seed for example generation, for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let ext = cli
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");
    let doc = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    info!("parsed {} with {} paths", cli.input.display(), doc.paths.len());

    let options = AssembleOptions {
        locale: cli.locale,
        seed: cli.seed,
    };
    let spec = assemble::assemble(&doc, &options)?;

    let messages = Messages::for_locale(cli.locale);
    let file = MarkdownGenerator.generate(&spec, messages)?;

    fs::write(&cli.output, &file.content)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    eprintln!("wrote {}", cli.output.display());

    Ok(())
}
