mod app;
mod game;
mod util;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;

use app::{PhysicsConfig, Viewport, VizConfig};
use game::{GraphSource, Preset, load_request_file};

const SIDE_PANEL_WIDTH: f32 = 260.0;
const TOP_BAR_HEIGHT: f32 = 48.0;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the game analysis service.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    service_url: String,

    /// JSON file with a payoff matrix and player actions to analyze.
    #[arg(long, conflicts_with = "preset")]
    request: Option<PathBuf>,

    /// Built-in game to analyze when no request file is given.
    #[arg(long, value_enum, default_value_t = Preset::PrisonersDilemma)]
    preset: Preset,

    /// Read a saved analysis response instead of calling the service.
    #[arg(long)]
    response: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    #[arg(long, default_value_t = 20.0)]
    margin: f32,

    #[arg(long, default_value_t = 100.0)]
    link_distance: f32,

    #[arg(long, default_value_t = -300.0, allow_hyphen_values = true)]
    charge: f32,

    /// Service request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

impl Args {
    fn source(&self) -> Result<(GraphSource, String)> {
        if let Some(path) = &self.response {
            let title = format!("Deviation graph: {}", path.display());
            return Ok((GraphSource::File(path.clone()), title));
        }

        let (request, title) = match &self.request {
            Some(path) => (
                load_request_file(path)?,
                format!("Deviation graph: {}", path.display()),
            ),
            None => (
                self.preset.request(),
                format!("Deviation graph: {}", self.preset.label()),
            ),
        };

        let source = GraphSource::Service {
            url: self.service_url.clone(),
            request,
            timeout: Duration::from_secs(self.timeout_secs),
        };
        Ok((source, title))
    }

    fn config(&self) -> Result<VizConfig> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(anyhow!(
                "viewport must have a positive size, got {}x{}",
                self.width,
                self.height
            ));
        }

        Ok(VizConfig {
            viewport: Viewport {
                width: self.width,
                height: self.height,
                margin: self.margin.max(0.0),
            },
            physics: PhysicsConfig {
                link_distance: self.link_distance,
                charge_strength: self.charge,
                ..PhysicsConfig::default()
            },
            ..VizConfig::default()
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let (source, title) = args.source()?;
    let config = args.config()?;

    let viewport = config.viewport;
    let inner_size = [
        viewport.width + viewport.margin * 2.0 + SIDE_PANEL_WIDTH,
        viewport.height + viewport.margin * 2.0 + TOP_BAR_HEIGHT,
    ];
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size(inner_size),
        ..Default::default()
    };

    eframe::run_native(
        "deviation-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::DeviationGraphApp::new(
                cc, source, title, config,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to start the viewer: {error}"))
}
