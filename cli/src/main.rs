mod scene;

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use guideline::guide::GuideLine;
use guideline::{GuideEngine, GuideError, Outcome, Signal, SnapConfig};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::scene::Scene;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Guide(#[from] GuideError),
    #[error("unknown signal `{0}`")]
    UnknownSignal(String),
    #[error("{0} event needs a target object")]
    MissingTarget(Signal),
}

#[derive(Parser, Debug)]
#[command(name = "guideline-cli", about = "Replay canvas gestures and print the alignment guides they produce")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch a scene's events in order and print the guides after each one.
    Replay(ReplayArgs),
    /// Print the default configuration.
    Defaults,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Scene file.
    scene: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// Neighbor alignment threshold.
    #[arg(long, env = "GUIDELINE_THRESHOLD")]
    threshold: Option<f64>,

    /// Distance from the canvas center that shows the center guide.
    #[arg(long, env = "GUIDELINE_CENTER_DISTANCE")]
    center_distance: Option<f64>,

    #[arg(long, env = "GUIDELINE_NO_CENTER_LINE", default_value_t = false)]
    no_center_line: bool,

    /// One color for canvas and neighbor guides.
    #[arg(long, env = "GUIDELINE_SINGLE_COLOR")]
    single_color: Option<String>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut SnapConfig) {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(distance) = self.center_distance {
            config.canvas_center_snap_distance = distance;
        }
        if self.no_center_line {
            config.canvas_center_line = false;
        }
        if let Some(color) = &self.single_color {
            config.line_color.clone_from(color);
            config.snap_line_color.clone_from(color);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Canvas state after one replayed event.
#[derive(Debug, Serialize)]
struct Step {
    index: usize,
    signal: Signal,
    outcome: &'static str,
    count: usize,
    guides: Vec<GuideLine>,
}

fn main() -> Result<(), CliError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay(args) => run_replay(&args),
        Command::Defaults => print_json(&SnapConfig::default()),
    }
}

fn run_replay(args: &ReplayArgs) -> Result<(), CliError> {
    let text = fs::read_to_string(&args.scene)?;
    let mut scene = Scene::parse(&text)?;
    args.overrides.apply(&mut scene.config);

    let events = scene.canvas_events()?;
    let mut engine = GuideEngine::new(scene.build_canvas(), Some(scene.config.clone()))?;
    engine.init()?;
    info!(scene = %args.scene.display(), objects = scene.objects.len(), events = events.len(), "replaying scene");

    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        if let Some(target) = event.target() {
            let canvas = engine.canvas_mut()?;
            if !canvas.update(target.clone()) {
                debug!(id = %target.id, "event target is not on the canvas");
            }
        }
        let (outcome, count) = describe(engine.handle_event(event)?);
        steps.push(Step { index: index + 1, signal: event.signal(), outcome, count, guides: engine.guide_lines()? });
    }

    let canvas = engine.detach()?;
    debug!(render_requests = canvas.render_requests(), "replay finished");

    match args.format {
        OutputFormat::Json => print_json(&steps),
        OutputFormat::Text => {
            for step in &steps {
                print_step(step);
            }
            Ok(())
        }
    }
}

fn describe(outcome: Outcome) -> (&'static str, usize) {
    match outcome {
        Outcome::Ignored => ("ignored", 0),
        Outcome::Rendered(n) => ("rendered", n),
        Outcome::Cleared(n) => ("cleared", n),
    }
}

fn print_step(step: &Step) {
    println!("[{}] {} {} {}", step.index, step.signal, step.outcome, step.count);
    for guide in &step.guides {
        let s = guide.segment();
        println!(
            "    {:<18} ({:.1}, {:.1}) -> ({:.1}, {:.1})  {}",
            guide.category().as_str(),
            s.x1,
            s.y1,
            s.x2,
            s.y2,
            guide.style().color
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
