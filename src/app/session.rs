use log::info;

use super::graph::{DragState, Graph, InteractionController, PointerEvent};
use super::physics::{CancellationToken, Simulation, TickOutcome};
use super::scene::{Scene, SceneStyle};
use super::{PhysicsConfig, VizConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum FrameOutcome {
    /// No simulation is running; nothing was drawn.
    Idle,
    /// A tick ran or a drag is in progress; another frame is wanted.
    Animating,
    /// The layout has cooled; the final frame was drawn.
    Settled,
}

struct ActiveSimulation {
    generation: u64,
    simulation: Simulation,
    token: CancellationToken,
    interaction: InteractionController,
    scene: Scene,
}

/// Owns at most one running simulation together with its overlay and scene.
pub(in crate::app) struct Session {
    config: VizConfig,
    active: Option<ActiveSimulation>,
    generation: u64,
}

impl Session {
    pub(in crate::app) fn new(config: VizConfig) -> Self {
        Self {
            config,
            active: None,
            generation: 0,
        }
    }

    /// Stops whatever is running, then lays out `graph`. An empty graph
    /// starts nothing and returns `None`.
    pub(in crate::app) fn start(&mut self, graph: Graph) -> Option<u64> {
        self.stop();

        if graph.is_empty() {
            info!("no action profiles to lay out");
            return None;
        }

        self.generation += 1;
        info!(
            "starting simulation #{}: {} nodes, {} edges, {} highlighted",
            self.generation,
            graph.nodes.len(),
            graph.edges.len(),
            graph.highlighted_ids().len()
        );

        let token = CancellationToken::default();
        let simulation = Simulation::new(
            graph,
            self.config.physics,
            self.config.viewport.center(),
            token.clone(),
        );
        let mut active = ActiveSimulation {
            generation: self.generation,
            simulation,
            token,
            interaction: InteractionController::new(self.config.node_radius),
            scene: Scene::default(),
        };
        active.redraw(self.style());
        self.active = Some(active);
        Some(self.generation)
    }

    pub(in crate::app) fn stop(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };

        active.token.cancel();
        active.interaction.clear_overlay();
        active.scene.clear();
        info!(
            "stopped simulation #{} after {} ticks",
            active.generation,
            active.simulation.ticks()
        );
    }

    pub(in crate::app) fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub(in crate::app) fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.generation)
    }

    pub(in crate::app) fn simulation(&self) -> Option<&Simulation> {
        self.active.as_ref().map(|active| &active.simulation)
    }

    pub(in crate::app) fn scene(&self) -> Option<&Scene> {
        self.active.as_ref().map(|active| &active.scene)
    }

    pub(in crate::app) fn hovered(&self) -> Option<usize> {
        self.active
            .as_ref()
            .and_then(|active| active.interaction.hovered())
    }

    pub(in crate::app) fn is_dragging(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.interaction.drag_state() != DragState::Idle)
    }

    pub(in crate::app) fn pointer(&mut self, event: PointerEvent) {
        if let Some(active) = self.active.as_mut() {
            active.interaction.handle(event, &mut active.simulation);
        }
    }

    pub(in crate::app) fn set_physics(&mut self, physics: PhysicsConfig) {
        self.config.physics = physics;
        if let Some(active) = self.active.as_mut() {
            active.simulation.set_config(physics);
        }
    }

    pub(in crate::app) fn reheat(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.simulation.reheat();
        }
    }

    /// Advances one tick and redraws. Called once per host frame.
    pub(in crate::app) fn frame(&mut self) -> FrameOutcome {
        let style = self.style();
        let Some(active) = self.active.as_mut() else {
            return FrameOutcome::Idle;
        };

        let outcome = match active.simulation.tick() {
            // `stop` takes the simulation before cancelling, so this only
            // fires when the token was cancelled from outside the session
            TickOutcome::Cancelled => {
                self.stop();
                return FrameOutcome::Idle;
            }
            TickOutcome::Advanced => FrameOutcome::Animating,
            TickOutcome::Settled if active.interaction.drag_state() != DragState::Idle => {
                FrameOutcome::Animating
            }
            TickOutcome::Settled => FrameOutcome::Settled,
        };

        active.redraw(style);
        outcome
    }

    #[cfg(test)]
    fn token(&self) -> Option<CancellationToken> {
        self.active.as_ref().map(|active| active.token.clone())
    }

    fn style(&self) -> SceneStyle {
        SceneStyle::for_radius(self.config.node_radius)
    }
}

impl ActiveSimulation {
    fn redraw(&mut self, style: SceneStyle) {
        self.scene.rebuild(
            self.simulation.graph(),
            style,
            self.interaction.hovered(),
            self.interaction.tooltip(),
        );
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
