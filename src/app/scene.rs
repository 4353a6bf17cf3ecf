use eframe::egui::{Vec2, vec2};

use super::graph::{Graph, Tooltip};

/// One drawable element in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum SceneItem {
    Edge {
        start: Vec2,
        end: Vec2,
    },
    Arrowhead {
        points: [Vec2; 3],
    },
    Node {
        center: Vec2,
        radius: f32,
        equilibrium: bool,
        hovered: bool,
        pinned: bool,
    },
    Label {
        anchor: Vec2,
        text: String,
    },
    Tooltip {
        anchor: Vec2,
        lines: Vec<String>,
        equilibrium: bool,
    },
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct SceneStyle {
    pub(in crate::app) node_radius: f32,
    pub(in crate::app) arrow_length: f32,
    pub(in crate::app) arrow_half_width: f32,
    pub(in crate::app) label_gap: f32,
}

impl SceneStyle {
    pub(in crate::app) fn for_radius(node_radius: f32) -> Self {
        Self {
            node_radius,
            arrow_length: (node_radius * 0.8).max(6.0),
            arrow_half_width: (node_radius * 0.4).max(3.0),
            label_gap: 5.0,
        }
    }
}

/// The drawn frame. `rebuild` replaces everything, so calling it every tick
/// never accumulates stale elements.
#[derive(Debug, Default)]
pub(in crate::app) struct Scene {
    items: Vec<SceneItem>,
}

impl Scene {
    pub(in crate::app) fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub(in crate::app) fn clear(&mut self) {
        self.items.clear();
    }

    #[cfg(test)]
    pub(in crate::app) fn node_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, SceneItem::Node { .. }))
            .count()
    }

    #[cfg(test)]
    pub(in crate::app) fn edge_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, SceneItem::Edge { .. }))
            .count()
    }

    pub(in crate::app) fn rebuild(
        &mut self,
        graph: &Graph,
        style: SceneStyle,
        hovered: Option<usize>,
        tooltip: Option<&Tooltip>,
    ) {
        self.items.clear();
        if graph.is_empty() {
            return;
        }

        for edge in &graph.edges {
            let (Some(source), Some(target)) =
                (graph.nodes.get(edge.source), graph.nodes.get(edge.target))
            else {
                continue;
            };
            if edge.source == edge.target {
                continue;
            }

            let (start, end, direction) =
                trim_to_circles(source.position, target.position, style.node_radius);
            self.items.push(SceneItem::Edge { start, end });
            self.items.push(SceneItem::Arrowhead {
                points: arrowhead(end, direction, style),
            });
        }

        for (index, node) in graph.nodes.iter().enumerate() {
            self.items.push(SceneItem::Node {
                center: node.position,
                radius: style.node_radius,
                equilibrium: graph.is_equilibrium(index),
                hovered: hovered == Some(index),
                pinned: node.is_pinned(),
            });
        }

        for node in &graph.nodes {
            self.items.push(SceneItem::Label {
                anchor: node.position + vec2(style.node_radius + style.label_gap, 0.0),
                text: node.profile_key.clone(),
            });
        }

        if let Some(tooltip) = tooltip
            && let Some(node) = graph.nodes.get(tooltip.node)
        {
            let offset = style.node_radius + 8.0;
            self.items.push(SceneItem::Tooltip {
                anchor: node.position + vec2(offset, -offset),
                lines: tooltip.lines.clone(),
                equilibrium: tooltip.equilibrium,
            });
        }
    }
}

/// Segment between two circle boundaries plus its unit direction.
fn trim_to_circles(start: Vec2, end: Vec2, radius: f32) -> (Vec2, Vec2, Vec2) {
    let delta = end - start;
    let length = delta.length();
    if length <= f32::EPSILON {
        return (start, end, vec2(1.0, 0.0));
    }

    let direction = delta / length;
    let trim = radius.min(length * 0.5);
    (start + direction * trim, end - direction * trim, direction)
}

fn arrowhead(tip: Vec2, direction: Vec2, style: SceneStyle) -> [Vec2; 3] {
    let base = tip - direction * style.arrow_length;
    let normal = direction.rot90() * style.arrow_half_width;
    [tip, base + normal, base - normal]
}
