use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use pl_story::config::{Config, load_dotenv};
use pl_story::export;
use pl_story::loader;
use pl_story::logging;
use pl_story::scenes::SceneRegistry;

/// Writes every scene's aggregate to a workbook and/or a JSON file.
#[derive(Parser, Debug)]
#[command(name = "story_export", version, about)]
struct Args {
    #[command(flatten)]
    config: Config,

    /// Excel workbook to write, one sheet per scene
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON file to write
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    args.config.validate()?;
    if args.out.is_none() && args.json.is_none() {
        bail!("nothing to do: pass --out and/or --json");
    }
    logging::init_stderr()?;

    let session = loader::load_session(&args.config.sources()).context("load league data")?;
    let snapshot = export::story_snapshot(
        &SceneRegistry::story(),
        &session,
        &args.config.story_params(),
    );

    if let Some(path) = &args.out {
        let report = export::export_workbook(path, &snapshot)?;
        println!(
            "Workbook: {} ({} sheets, {} rows)",
            path.display(),
            report.scenes,
            report.rows
        );
    }
    if let Some(path) = &args.json {
        let report = export::export_json(path, &snapshot)?;
        println!(
            "JSON: {} ({} scenes, {} rows)",
            path.display(),
            report.scenes,
            report.rows
        );
    }
    Ok(())
}
