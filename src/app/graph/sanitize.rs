use std::collections::{HashMap, HashSet};

use eframe::egui::{Vec2, vec2};
use log::{debug, warn};

use crate::game::{DeviationResponse, RawNode};

use super::{Edge, Graph, Motion, Node};

fn make_node(raw: RawNode, center: Vec2) -> Node {
    let position = match (raw.x, raw.y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => vec2(x, y),
        _ => center,
    };

    let mut payoffs = raw.payoffs.into_iter().collect::<Vec<_>>();
    payoffs.sort_by(|a, b| a.0.sort_key().cmp(&b.0.sort_key()));

    Node {
        id: raw.id,
        profile_key: raw.profile_key,
        payoffs,
        position,
        velocity: Vec2::ZERO,
        motion: Motion::Free,
    }
}

/// Turns an untrusted service response into a consistent graph.
///
/// Later nodes with a repeated id replace earlier ones in place. Edges whose
/// endpoints do not resolve are discarded and only logged.
pub(in crate::app) fn sanitize(response: DeviationResponse, center: Vec2) -> Graph {
    let mut nodes: Vec<Node> = Vec::with_capacity(response.nodes.len());
    let mut index_by_id = HashMap::with_capacity(response.nodes.len());

    for raw in response.nodes {
        let node = make_node(raw, center);
        match index_by_id.get(&node.id) {
            Some(&index) => {
                debug!("node id {} repeated; keeping the later entry", node.id);
                nodes[index] = node;
            }
            None => {
                index_by_id.insert(node.id.clone(), nodes.len());
                nodes.push(node);
            }
        }
    }

    let mut dropped = 0usize;
    let mut edges = Vec::with_capacity(response.edges.len());
    for raw in response.edges {
        let (Some(&source), Some(&target)) = (index_by_id.get(&raw.from), index_by_id.get(&raw.to))
        else {
            debug!("dropping deviation {} -> {}: unknown endpoint", raw.from, raw.to);
            dropped += 1;
            continue;
        };

        edges.push(Edge {
            source,
            target,
            player: raw.player_id,
            action: raw.action,
            base_payoff: raw.base_payoff,
            deviation_payoff: raw.deviation_payoff,
        });
    }

    if dropped > 0 {
        warn!("dropped {dropped} deviation edges with unresolved endpoints");
    }

    Graph {
        nodes,
        edges,
        index_by_id,
        nash_ids: response.nash_nodes.into_iter().collect::<HashSet<_>>(),
    }
}
