use std::collections::{HashMap, HashSet};

use eframe::egui::Vec2;

use crate::game::WireId;

mod interaction;
mod sanitize;
mod view;

pub(in crate::app) use interaction::{DragState, InteractionController, PointerEvent, Tooltip};
pub(in crate::app) use sanitize::sanitize;

/// Who owns a node's position this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum Motion {
    Free,
    Pinned(Vec2),
}

/// One action profile.
#[derive(Clone, Debug)]
pub(in crate::app) struct Node {
    pub(in crate::app) id: WireId,
    pub(in crate::app) profile_key: String,
    /// Sorted by player id.
    pub(in crate::app) payoffs: Vec<(WireId, f64)>,
    pub(in crate::app) position: Vec2,
    pub(in crate::app) velocity: Vec2,
    pub(in crate::app) motion: Motion,
}

impl Node {
    #[cfg(test)]
    pub(in crate::app) fn pinned_position(&self) -> Option<Vec2> {
        match self.motion {
            Motion::Free => None,
            Motion::Pinned(pin) => Some(pin),
        }
    }

    pub(in crate::app) fn is_pinned(&self) -> bool {
        matches!(self.motion, Motion::Pinned(_))
    }
}

/// One profitable unilateral deviation, with endpoints resolved to node indices.
#[derive(Clone, Debug)]
pub(in crate::app) struct Edge {
    pub(in crate::app) source: usize,
    pub(in crate::app) target: usize,
    pub(in crate::app) player: WireId,
    pub(in crate::app) action: String,
    pub(in crate::app) base_payoff: f64,
    pub(in crate::app) deviation_payoff: f64,
}

#[derive(Clone, Debug, Default)]
pub(in crate::app) struct Graph {
    pub(in crate::app) nodes: Vec<Node>,
    pub(in crate::app) edges: Vec<Edge>,
    pub(in crate::app) index_by_id: HashMap<WireId, usize>,
    /// Passed through from the service unfiltered; intersect before use.
    pub(in crate::app) nash_ids: HashSet<WireId>,
}

impl Graph {
    pub(in crate::app) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[cfg(test)]
    pub(in crate::app) fn node_index(&self, id: &WireId) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub(in crate::app) fn is_equilibrium(&self, index: usize) -> bool {
        self.nodes
            .get(index)
            .is_some_and(|node| self.nash_ids.contains(&node.id))
    }

    /// Equilibrium ids that name a live node.
    pub(in crate::app) fn highlighted_ids(&self) -> HashSet<&WireId> {
        self.nash_ids
            .iter()
            .filter(|id| self.index_by_id.contains_key(*id))
            .collect()
    }

    pub(in crate::app) fn outgoing(&self, index: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.source == index)
    }

    pub(in crate::app) fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for edge in &self.edges {
            if edge.source == edge.target {
                continue;
            }
            if let Some(degree) = degrees.get_mut(edge.source) {
                *degree += 1;
            }
            if let Some(degree) = degrees.get_mut(edge.target) {
                *degree += 1;
            }
        }
        degrees
    }
}
