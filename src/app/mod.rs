use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context, Vec2, vec2};
use log::{error, info};

use crate::game::{DeviationResponse, GraphSource, collect_deviation_graph};

mod graph;
mod physics;
mod render_utils;
mod scene;
mod session;
mod ui;

use session::Session;

const DEFAULT_LINK_DISTANCE: f32 = 100.0;
const DEFAULT_CHARGE_STRENGTH: f32 = -300.0;
const DEFAULT_ALPHA_MIN: f32 = 0.001;
const SETTLE_TICKS: f32 = 300.0;

/// Fixed drawing region; the simulation works directly in these coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Viewport {
    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub fn size(self) -> Vec2 {
        vec2(self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub center_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub reheat_alpha: f32,
    pub theta: f32,
}

impl PhysicsConfig {
    /// Decay that takes alpha from 1 to `alpha_min` in about 300 ticks.
    pub fn decay_for(alpha_min: f32) -> f32 {
        1.0 - alpha_min.powf(1.0 / SETTLE_TICKS)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            link_distance: DEFAULT_LINK_DISTANCE,
            charge_strength: DEFAULT_CHARGE_STRENGTH,
            center_strength: 0.1,
            velocity_decay: 0.4,
            alpha_min: DEFAULT_ALPHA_MIN,
            alpha_decay: Self::decay_for(DEFAULT_ALPHA_MIN),
            reheat_alpha: 0.3,
            theta: 0.9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VizConfig {
    pub viewport: Viewport,
    pub physics: PhysicsConfig,
    pub node_radius: f32,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            physics: PhysicsConfig::default(),
            node_radius: 12.0,
        }
    }
}

pub struct DeviationGraphApp {
    source: GraphSource,
    title: String,
    config: VizConfig,
    load: LoadState,
    session: Session,
    loaded_once: bool,
}

enum LoadState {
    Loading {
        rx: Receiver<Result<DeviationResponse, String>>,
    },
    Ready,
    Failed(String),
}

impl DeviationGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: GraphSource,
        title: String,
        config: VizConfig,
    ) -> Self {
        let load = Self::start_load(&source);
        Self {
            source,
            title,
            config,
            load,
            session: Session::new(config),
            loaded_once: false,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<Result<DeviationResponse, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = collect_deviation_graph(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: &GraphSource) -> LoadState {
        info!("loading deviation graph from {}", source.describe());
        LoadState::Loading {
            rx: Self::spawn_load(source.clone()),
        }
    }

    pub(in crate::app) fn request_reload(&mut self) {
        if !matches!(self.load, LoadState::Loading { .. }) {
            self.load = Self::start_load(&self.source);
        }
    }

    pub(in crate::app) fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }

    pub(in crate::app) fn load_error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(error) => Some(error),
            _ => None,
        }
    }

    fn poll_load(&mut self) {
        let LoadState::Loading { rx } = &self.load else {
            return;
        };

        let next = match rx.try_recv() {
            Ok(Ok(response)) => {
                let graph = graph::sanitize(response, self.config.viewport.center());
                self.session.start(graph);
                self.loaded_once = true;
                LoadState::Ready
            }
            Ok(Err(message)) => {
                error!("failed to load deviation graph: {message}");
                LoadState::Failed(message)
            }
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                LoadState::Failed("Background load worker disconnected".to_owned())
            }
        };
        self.load = next;
    }
}

impl eframe::App for DeviationGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_load();
        if self.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        if !self.loaded_once {
            egui::CentralPanel::default().show(ctx, |ui| self.show_first_load(ui));
            return;
        }

        self.show_top_bar(ctx);
        self.show_side_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.is_active() {
                self.draw_graph(ui);
            } else {
                self.show_empty_state(ui);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_decay_reaches_alpha_min_in_300_ticks() {
        let config = PhysicsConfig::default();
        let alpha = (1.0 - config.alpha_decay).powi(300);
        assert!((alpha - config.alpha_min).abs() < 1e-4);
    }

    #[test]
    fn viewport_center_is_half_its_size() {
        let viewport = Viewport::default();
        assert_eq!(viewport.center(), vec2(400.0, 300.0));
        assert_eq!(viewport.size() * 0.5, viewport.center());
    }
}
