use anyhow::{Context, Result};
use clap::Parser;

use pl_story::config::{Config, load_dotenv};
use pl_story::controller::{SceneController, Transition};
use pl_story::loader;
use pl_story::logging;
use pl_story::scenes::SceneRegistry;
use pl_story::surface::SceneCanvas;

/// Prints every scene of the story as plain text.
#[derive(Parser, Debug)]
#[command(name = "story_dump", version, about)]
struct Args {
    #[command(flatten)]
    config: Config,

    /// Only print the scene at this 1-based position
    #[arg(long)]
    scene: Option<usize>,
}

fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    args.config.validate()?;
    logging::init_stderr()?;

    let session = loader::load_session(&args.config.sources()).context("load league data")?;
    let mut controller = SceneController::new(SceneRegistry::story(), args.config.story_params());
    let mut canvas = SceneCanvas::new();

    if let Some(position) = args.scene {
        if position == 0 || position > controller.len() {
            anyhow::bail!("scene must be between 1 and {}", controller.len());
        }
    }

    controller.activate(Some(&session), &mut canvas);
    loop {
        let position = controller.index() + 1;
        if args.scene.is_none_or(|wanted| wanted == position) {
            println!("{}", canvas.to_text());
        }
        if controller.advance(Some(&session), &mut canvas) == Transition::Unchanged {
            break;
        }
    }

    let issues = session.issues();
    if issues.total() > 0 {
        eprintln!(
            "{} fields could not be read ({} match dates)",
            issues.total(),
            issues.bad_dates()
        );
    }
    Ok(())
}
