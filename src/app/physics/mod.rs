mod forces;
mod quadtree;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use eframe::egui::{Vec2, vec2};
use log::{debug, info};

use super::PhysicsConfig;
use super::graph::{Graph, Motion};
use forces::{accumulate_charge_for_node, accumulate_links};
use quadtree::QuadNode;

const ALPHA_START: f32 = 1.0;
const ALPHA_TARGET: f32 = 0.0;
const INITIAL_SPREAD_RADIUS: f32 = 10.0;
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Shared stop flag between a simulation and whoever drives its frames.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub(in crate::app) fn cancel(&self) {
        self.0.set(true);
    }

    pub(in crate::app) fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum TickOutcome {
    Advanced,
    Settled,
    Cancelled,
}

struct PhysicsScratch {
    deltas: Vec<Vec2>,
    positions: Vec<Vec2>,
}

/// Owns a graph and advances its layout one tick at a time.
pub(in crate::app) struct Simulation {
    graph: Graph,
    config: PhysicsConfig,
    center: Vec2,
    alpha: f32,
    degrees: Vec<usize>,
    ticks: u64,
    token: CancellationToken,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub(in crate::app) fn new(
        mut graph: Graph,
        config: PhysicsConfig,
        center: Vec2,
        token: CancellationToken,
    ) -> Self {
        spread_coincident(&mut graph);
        let degrees = graph.degrees();
        let node_count = graph.nodes.len();

        Self {
            graph,
            config,
            center,
            alpha: ALPHA_START,
            degrees,
            ticks: 0,
            token,
            scratch: PhysicsScratch {
                deltas: Vec::with_capacity(node_count),
                positions: Vec::with_capacity(node_count),
            },
        }
    }

    pub(in crate::app) fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(in crate::app) fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(in crate::app) fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    pub(in crate::app) fn set_config(&mut self, config: PhysicsConfig) {
        self.config = config;
    }

    /// Raises alpha to at least the configured reheat value.
    pub(in crate::app) fn reheat(&mut self) {
        let was_settled = self.is_settled();
        self.alpha = self.alpha.max(self.config.reheat_alpha);
        if was_settled {
            debug!("simulation reheated to alpha {:.3}", self.alpha);
        }
    }

    pub(in crate::app) fn tick(&mut self) -> TickOutcome {
        if self.token.is_cancelled() {
            return TickOutcome::Cancelled;
        }
        if self.is_settled() {
            return TickOutcome::Settled;
        }

        self.alpha += (ALPHA_TARGET - self.alpha) * self.config.alpha_decay;
        self.step();
        self.ticks += 1;

        if self.is_settled() {
            info!(
                "layout settled after {} ticks ({} nodes)",
                self.ticks,
                self.graph.nodes.len()
            );
        }
        TickOutcome::Advanced
    }

    fn step(&mut self) {
        let node_count = self.graph.nodes.len();
        if node_count == 0 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.deltas.clear();
        scratch.deltas.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch
            .positions
            .extend(self.graph.nodes.iter().map(|node| node.position));

        let alpha = self.alpha;
        accumulate_links(
            &self.graph.edges,
            &self.degrees,
            &scratch.positions,
            self.config.link_distance,
            alpha,
            &mut scratch.deltas,
        );

        if node_count > 1
            && let Some(quadtree) = QuadNode::build(&scratch.positions)
        {
            let strength = self.config.charge_strength * alpha;
            for (index, delta_v) in scratch.deltas.iter_mut().enumerate() {
                accumulate_charge_for_node(
                    &quadtree,
                    index,
                    &scratch.positions,
                    strength,
                    self.config.theta,
                    delta_v,
                );
            }
        }

        let retained = 1.0 - self.config.velocity_decay.clamp(0.0, 1.0);
        for (node, delta_v) in self.graph.nodes.iter_mut().zip(&scratch.deltas) {
            match node.motion {
                // the interaction controller owns pinned positions
                Motion::Pinned(_) => node.velocity = Vec2::ZERO,
                Motion::Free => {
                    node.velocity = (node.velocity + *delta_v) * retained;
                    node.position += node.velocity;
                    if !node.position.is_finite() {
                        node.position = self.center;
                        node.velocity = Vec2::ZERO;
                    }
                }
            }
        }

        self.apply_centering();
    }

    fn apply_centering(&mut self) {
        let node_count = self.graph.nodes.len() as f32;
        let centroid = self
            .graph
            .nodes
            .iter()
            .fold(Vec2::ZERO, |sum, node| sum + node.position)
            / node_count;

        // a position correction like d3's forceCenter, not scaled by alpha
        let shift = (self.center - centroid) * self.config.center_strength;
        if shift.length_sq() <= f32::EPSILON {
            return;
        }

        for node in &mut self.graph.nodes {
            if node.motion == Motion::Free {
                node.position += shift;
            }
        }
    }
}

/// Nodes sharing an exact start position (typically the viewport center) are
/// fanned out on a small phyllotaxis spiral so forces have a direction.
fn spread_coincident(graph: &mut Graph) {
    let mut seen: HashMap<(u32, u32), usize> = HashMap::with_capacity(graph.nodes.len());
    for node in &mut graph.nodes {
        if node.is_pinned() {
            continue;
        }

        let key = (node.position.x.to_bits(), node.position.y.to_bits());
        let occurrence = seen.entry(key).or_insert(0);
        if *occurrence > 0 {
            let step = *occurrence as f32;
            let radius = INITIAL_SPREAD_RADIUS * (0.5 + step).sqrt();
            let angle = step * GOLDEN_ANGLE;
            node.position += vec2(angle.cos(), angle.sin()) * radius;
        }
        *occurrence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::graph::{Edge, Node};
    use crate::game::WireId;

    const CENTER: Vec2 = vec2(400.0, 300.0);

    fn node(id: i64) -> Node {
        Node {
            id: WireId::from(id),
            profile_key: format!("p{id}"),
            payoffs: Vec::new(),
            position: CENTER,
            velocity: Vec2::ZERO,
            motion: Motion::Free,
        }
    }

    fn graph(node_count: i64, links: &[(usize, usize)]) -> Graph {
        let nodes = (1..=node_count).map(node).collect::<Vec<_>>();
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        let edges = links
            .iter()
            .map(|&(source, target)| Edge {
                source,
                target,
                player: WireId::from(0),
                action: "x".to_owned(),
                base_payoff: 0.0,
                deviation_payoff: 1.0,
            })
            .collect();
        Graph {
            nodes,
            edges,
            index_by_id,
            nash_ids: Default::default(),
        }
    }

    fn simulation(graph: Graph) -> Simulation {
        Simulation::new(
            graph,
            PhysicsConfig::default(),
            CENTER,
            CancellationToken::default(),
        )
    }

    fn run_until_settled(simulation: &mut Simulation) -> u64 {
        while simulation.tick() == TickOutcome::Advanced {
            assert!(simulation.ticks() < 1_000, "simulation never settled");
        }
        simulation.ticks()
    }

    #[test]
    fn alpha_decays_geometrically_and_settles_near_300_ticks() {
        let mut sim = simulation(graph(3, &[(0, 1), (1, 2)]));
        let mut previous = sim.alpha();
        for _ in 0..10 {
            assert_eq!(sim.tick(), TickOutcome::Advanced);
            assert!(sim.alpha() < previous);
            previous = sim.alpha();
        }

        let ticks = run_until_settled(&mut sim);
        assert!((295..=305).contains(&ticks), "settled after {ticks} ticks");
        assert!(sim.is_settled());
        assert_eq!(sim.tick(), TickOutcome::Settled);
        assert_eq!(sim.ticks(), ticks);
    }

    #[test]
    fn linked_pair_converges_to_link_distance() {
        let mut sim = simulation(graph(2, &[(0, 1)]));
        run_until_settled(&mut sim);

        let nodes = &sim.graph().nodes;
        let distance = (nodes[0].position - nodes[1].position).length();
        let target = PhysicsConfig::default().link_distance;
        assert!(
            (distance - target).abs() < 8.0,
            "distance {distance} too far from {target}"
        );
    }

    #[test]
    fn unlinked_nodes_repel() {
        let mut sim = simulation(graph(2, &[]));
        let before = (sim.graph().nodes[0].position - sim.graph().nodes[1].position).length();
        for _ in 0..50 {
            sim.tick();
        }
        let after = (sim.graph().nodes[0].position - sim.graph().nodes[1].position).length();
        assert!(after > before);
    }

    #[test]
    fn coincident_start_positions_are_spread() {
        let sim = simulation(graph(5, &[]));
        let positions = sim
            .graph()
            .nodes
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        for (index, position) in positions.iter().enumerate() {
            for other in &positions[index + 1..] {
                assert!((*position - *other).length() > 1.0);
            }
        }
    }

    #[test]
    fn centering_pull_does_not_cool_with_alpha() {
        let offset = vec2(500.0, 300.0);

        let mut hot = simulation(graph(1, &[]));
        hot.graph_mut().nodes[0].position = offset;
        assert_eq!(hot.tick(), TickOutcome::Advanced);

        let mut reheated = simulation(graph(1, &[]));
        run_until_settled(&mut reheated);
        reheated.graph_mut().nodes[0].position = offset;
        reheated.reheat();
        assert!(reheated.alpha() <= 0.3 + f32::EPSILON);
        assert_eq!(reheated.tick(), TickOutcome::Advanced);

        for sim in [&hot, &reheated] {
            let position = sim.graph().nodes[0].position;
            assert!((position - vec2(490.0, 300.0)).length() < 1e-3, "{position:?}");
        }
    }

    #[test]
    fn layout_stays_centered() {
        let mut sim = simulation(graph(6, &[(0, 1), (1, 2), (3, 4)]));
        run_until_settled(&mut sim);

        let nodes = &sim.graph().nodes;
        let centroid =
            nodes.iter().fold(Vec2::ZERO, |sum, node| sum + node.position) / nodes.len() as f32;
        assert!((centroid - CENTER).length() < 5.0, "centroid {centroid:?}");
    }

    #[test]
    fn pinned_node_holds_position_but_still_repels() {
        let mut sim = simulation(graph(2, &[]));
        let pin = vec2(100.0, 100.0);
        {
            let node = &mut sim.graph_mut().nodes[0];
            node.motion = Motion::Pinned(pin);
            node.position = pin;
        }
        sim.graph_mut().nodes[1].position = vec2(110.0, 100.0);

        sim.tick();
        assert_eq!(sim.graph().nodes[0].position, pin);
        assert_eq!(sim.graph().nodes[0].velocity, Vec2::ZERO);
        assert!(sim.graph().nodes[1].velocity.x > 0.0);
    }

    #[test]
    fn cancelled_simulation_never_mutates() {
        let token = CancellationToken::default();
        let mut sim = Simulation::new(
            graph(3, &[(0, 1)]),
            PhysicsConfig::default(),
            CENTER,
            token.clone(),
        );
        sim.tick();
        let before = sim
            .graph()
            .nodes
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();

        token.cancel();
        for _ in 0..5 {
            assert_eq!(sim.tick(), TickOutcome::Cancelled);
        }

        let after = sim
            .graph()
            .nodes
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        assert_eq!(before, after);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn reheat_revives_a_settled_simulation() {
        let mut sim = simulation(graph(2, &[(0, 1)]));
        run_until_settled(&mut sim);
        assert_eq!(sim.tick(), TickOutcome::Settled);

        sim.reheat();
        assert!((sim.alpha() - PhysicsConfig::default().reheat_alpha).abs() < 1e-6);
        assert_eq!(sim.tick(), TickOutcome::Advanced);
    }

    #[test]
    fn reheat_never_lowers_alpha() {
        let mut sim = simulation(graph(2, &[(0, 1)]));
        sim.tick();
        let alpha = sim.alpha();
        sim.reheat();
        assert_eq!(sim.alpha(), alpha);
    }
}
