use eframe::egui::Vec2;
use log::debug;

use crate::util::format_payoff;

use super::super::physics::Simulation;
use super::{Graph, Motion};

/// Pointer input in viewport coordinates, independent of the GUI toolkit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
    Leave,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum DragState {
    #[default]
    Idle,
    Dragging {
        node: usize,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct Tooltip {
    pub(in crate::app) node: usize,
    pub(in crate::app) lines: Vec<String>,
    pub(in crate::app) equilibrium: bool,
}

pub(in crate::app) struct InteractionController {
    node_radius: f32,
    drag: DragState,
    hovered: Option<usize>,
    tooltip: Option<Tooltip>,
}

impl InteractionController {
    pub(in crate::app) fn new(node_radius: f32) -> Self {
        Self {
            node_radius,
            drag: DragState::Idle,
            hovered: None,
            tooltip: None,
        }
    }

    pub(in crate::app) fn drag_state(&self) -> DragState {
        self.drag
    }

    pub(in crate::app) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(in crate::app) fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub(in crate::app) fn clear_overlay(&mut self) {
        self.hovered = None;
        self.tooltip = None;
    }

    pub(in crate::app) fn handle(&mut self, event: PointerEvent, simulation: &mut Simulation) {
        match event {
            PointerEvent::Down(point) => {
                self.update_hover(simulation.graph(), Some(point));
                if let Some(node) = self.hovered {
                    self.start_drag(node, point, simulation);
                }
            }
            PointerEvent::Move(point) => match self.drag {
                DragState::Dragging { node } => pin(simulation.graph_mut(), node, point),
                DragState::Idle => self.update_hover(simulation.graph(), Some(point)),
            },
            PointerEvent::Up => self.release(simulation),
            PointerEvent::Leave => {
                if self.drag == DragState::Idle {
                    self.clear_overlay();
                }
            }
        }
    }

    fn start_drag(&mut self, node: usize, point: Vec2, simulation: &mut Simulation) {
        if let DragState::Dragging { node: previous } = self.drag {
            release_node(simulation.graph_mut(), previous);
        }

        pin(simulation.graph_mut(), node, point);
        simulation.reheat();
        self.drag = DragState::Dragging { node };
        debug!("dragging node {node}");
    }

    fn release(&mut self, simulation: &mut Simulation) {
        if let DragState::Dragging { node } = self.drag {
            release_node(simulation.graph_mut(), node);
            debug!("released node {node}");
        }
        self.drag = DragState::Idle;
    }

    fn update_hover(&mut self, graph: &Graph, point: Option<Vec2>) {
        let hit = point.and_then(|point| hit_test(graph, point, self.node_radius));
        if hit == self.hovered && (hit.is_none() || self.tooltip.is_some()) {
            return;
        }

        self.hovered = hit;
        self.tooltip = hit.map(|node| Tooltip {
            node,
            lines: tooltip_lines(graph, node),
            equilibrium: graph.is_equilibrium(node),
        });
    }
}

fn pin(graph: &mut Graph, index: usize, point: Vec2) {
    if let Some(node) = graph.nodes.get_mut(index) {
        node.motion = Motion::Pinned(point);
        node.position = point;
        node.velocity = Vec2::ZERO;
    }
}

fn release_node(graph: &mut Graph, index: usize) {
    if let Some(node) = graph.nodes.get_mut(index) {
        node.motion = Motion::Free;
    }
}

/// Nearest node whose circle contains `point`.
pub(in crate::app) fn hit_test(graph: &Graph, point: Vec2, radius: f32) -> Option<usize> {
    graph
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let distance = (node.position - point).length();
            (distance <= radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

pub(in crate::app) fn tooltip_lines(graph: &Graph, index: usize) -> Vec<String> {
    let Some(node) = graph.nodes.get(index) else {
        return Vec::new();
    };

    let mut lines = Vec::with_capacity(node.payoffs.len() + 2);
    lines.push(if node.profile_key.is_empty() {
        format!("profile {}", node.id)
    } else {
        format!("({})", node.profile_key)
    });

    for (player, payoff) in &node.payoffs {
        lines.push(format!("player {player}: {}", format_payoff(*payoff)));
    }

    if graph.is_equilibrium(index) {
        lines.push("Nash equilibrium".to_owned());
    }

    for edge in graph.outgoing(index) {
        lines.push(format!(
            "player {} \u{2192} {}: {} \u{2192} {}",
            edge.player,
            edge.action,
            format_payoff(edge.base_payoff),
            format_payoff(edge.deviation_payoff)
        ));
    }

    lines
}
