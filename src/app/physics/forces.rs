use eframe::egui::{Vec2, vec2};

use super::super::graph::Edge;
use super::quadtree::QuadNode;

const DISTANCE_MIN_SQ: f32 = 1.0;
const COINCIDENT_EPSILON_SQ: f32 = 1e-12;
const JIGGLE_LENGTH: f32 = 1e-3;

/// Vector from `point` to `other`. Exactly coincident pairs get a tiny offset
/// whose direction depends only on the pair and flips with argument order,
/// so both nodes are pushed apart symmetrically.
fn separation(point: Vec2, other: Vec2, index: usize, other_index: usize) -> Vec2 {
    let delta = other - point;
    if delta.length_sq() > COINCIDENT_EPSILON_SQ {
        return delta;
    }

    let (low, high) = (index.min(other_index), index.max(other_index));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let sign = if index < other_index { 1.0 } else { -1.0 };
    vec2(angle.cos(), angle.sin()) * (JIGGLE_LENGTH * sign)
}

fn charge_from(delta: Vec2, strength: f32) -> Vec2 {
    let distance_sq = delta.length_sq().max(DISTANCE_MIN_SQ);
    delta * (strength / distance_sq)
}

/// Many-body charge on one node. `strength` is already scaled by alpha; a
/// negative value repels.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    delta_v: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            let delta = separation(point, positions[other_index], index, other_index);
            *delta_v += charge_from(delta, strength);
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let distance = delta.length().max(0.0001);
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < theta
        && node.mass > 1.0;

    if can_approximate {
        *delta_v += charge_from(delta, strength * node.mass);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, strength, theta, delta_v);
    }
}

/// Springs every edge toward `distance`. Strength is `1 / min(degree)` and the
/// correction is split by the endpoints' degrees, so hubs move less.
pub(super) fn accumulate_links(
    edges: &[Edge],
    degrees: &[usize],
    positions: &[Vec2],
    distance: f32,
    alpha: f32,
    deltas: &mut [Vec2],
) {
    let node_count = positions.len();
    for edge in edges {
        let (source, target) = (edge.source, edge.target);
        if source == target || source >= node_count || target >= node_count {
            continue;
        }

        let source_degree = degrees[source].max(1) as f32;
        let target_degree = degrees[target].max(1) as f32;
        let strength = 1.0 / source_degree.min(target_degree);
        let bias = source_degree / (source_degree + target_degree);

        let delta = separation(positions[source], positions[target], source, target);
        let length = delta.length();
        let shift = delta * (((length - distance) / length) * alpha * strength);

        deltas[target] -= shift * bias;
        deltas[source] += shift * (1.0 - bias);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::WireId;

    fn edge(source: usize, target: usize) -> Edge {
        Edge {
            source,
            target,
            player: WireId::from(0),
            action: String::new(),
            base_payoff: 0.0,
            deviation_payoff: 1.0,
        }
    }

    fn exact_charge(positions: &[Vec2], index: usize, strength: f32) -> Vec2 {
        let mut total = Vec2::ZERO;
        for (other, position) in positions.iter().enumerate() {
            if other != index {
                total += charge_from(*position - positions[index], strength);
            }
        }
        total
    }

    #[test]
    fn negative_charge_pushes_nodes_apart() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let tree = QuadNode::build(&positions).unwrap();

        let mut left = Vec2::ZERO;
        let mut right = Vec2::ZERO;
        accumulate_charge_for_node(&tree, 0, &positions, -300.0, 0.9, &mut left);
        accumulate_charge_for_node(&tree, 1, &positions, -300.0, 0.9, &mut right);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left.x + right.x).abs() < 1e-4);
        assert!((left.x - (-30.0)).abs() < 1e-3);
    }

    #[test]
    fn coincident_nodes_separate_in_opposite_directions() {
        let positions = vec![vec2(3.0, 3.0), vec2(3.0, 3.0)];
        let tree = QuadNode::build(&positions).unwrap();

        let mut first = Vec2::ZERO;
        let mut second = Vec2::ZERO;
        accumulate_charge_for_node(&tree, 0, &positions, -300.0, 0.9, &mut first);
        accumulate_charge_for_node(&tree, 1, &positions, -300.0, 0.9, &mut second);

        assert!(first.length() > 0.0);
        assert!((first + second).length() < 1e-6);
    }

    #[test]
    fn barnes_hut_stays_close_to_exact_sum() {
        let positions = (0..300)
            .map(|index| {
                let angle = index as f32 * 2.399_963;
                let radius = 4.0 * (index as f32).sqrt();
                vec2(angle.cos() * radius, angle.sin() * radius)
            })
            .collect::<Vec<_>>();
        let tree = QuadNode::build(&positions).unwrap();

        for index in [0usize, 17, 150, 299] {
            let mut approximate = Vec2::ZERO;
            accumulate_charge_for_node(&tree, index, &positions, -300.0, 0.9, &mut approximate);
            let exact = exact_charge(&positions, index, -300.0);
            let error = (approximate - exact).length();
            assert!(
                error <= exact.length() * 0.2 + 1.0,
                "node {index}: approximate {approximate:?} exact {exact:?}"
            );
        }
    }

    #[test]
    fn stretched_link_pulls_endpoints_together() {
        let positions = vec![vec2(0.0, 0.0), vec2(200.0, 0.0)];
        let mut deltas = vec![Vec2::ZERO; 2];
        accumulate_links(&[edge(0, 1)], &[1, 1], &positions, 100.0, 1.0, &mut deltas);

        assert!(deltas[0].x > 0.0);
        assert!(deltas[1].x < 0.0);
        assert!((deltas[0].x - 50.0).abs() < 1e-3);
        assert!((deltas[1].x + 50.0).abs() < 1e-3);
    }

    #[test]
    fn compressed_link_pushes_endpoints_apart() {
        let positions = vec![vec2(0.0, 0.0), vec2(20.0, 0.0)];
        let mut deltas = vec![Vec2::ZERO; 2];
        accumulate_links(&[edge(0, 1)], &[1, 1], &positions, 100.0, 1.0, &mut deltas);

        assert!(deltas[0].x < 0.0);
        assert!(deltas[1].x > 0.0);
    }

    #[test]
    fn link_at_rest_length_exerts_nothing() {
        let positions = vec![vec2(0.0, 0.0), vec2(0.0, 100.0)];
        let mut deltas = vec![Vec2::ZERO; 2];
        accumulate_links(&[edge(0, 1)], &[1, 1], &positions, 100.0, 1.0, &mut deltas);
        assert!(deltas[0].length() < 1e-4);
        assert!(deltas[1].length() < 1e-4);
    }

    #[test]
    fn self_loops_are_ignored() {
        let positions = vec![vec2(0.0, 0.0)];
        let mut deltas = vec![Vec2::ZERO; 1];
        accumulate_links(&[edge(0, 0)], &[0], &positions, 100.0, 1.0, &mut deltas);
        assert_eq!(deltas[0], Vec2::ZERO);
    }
}
