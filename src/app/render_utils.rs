use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use super::scene::{Scene, SceneItem};

pub(super) const EQUILIBRIUM_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const PROFILE_COLOR: Color32 = Color32::from_rgb(72, 146, 212);
const EDGE_COLOR: Color32 = Color32::from_rgb(128, 138, 150);
const HOVER_OUTLINE: Color32 = Color32::from_rgb(255, 164, 101);
const PIN_OUTLINE: Color32 = Color32::from_rgb(240, 240, 240);
const LABEL_COLOR: Color32 = Color32::from_gray(232);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = 50.0;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

fn to_screen(origin: Vec2, point: Vec2) -> Pos2 {
    (origin + point).to_pos2()
}

/// Maps scene items onto the painter. `origin` is the drawing region's
/// top-left corner; simulation and scene share its coordinate space.
pub(super) fn paint_scene(painter: &Painter, origin: Vec2, scene: &Scene) {
    for item in scene.items() {
        match item {
            SceneItem::Edge { start, end } => {
                painter.line_segment(
                    [to_screen(origin, *start), to_screen(origin, *end)],
                    Stroke::new(1.4, EDGE_COLOR),
                );
            }
            SceneItem::Arrowhead { points } => {
                painter.add(Shape::convex_polygon(
                    points.iter().map(|point| to_screen(origin, *point)).collect(),
                    EDGE_COLOR,
                    Stroke::NONE,
                ));
            }
            SceneItem::Node {
                center,
                radius,
                equilibrium,
                hovered,
                pinned,
            } => {
                let position = to_screen(origin, *center);
                let fill = if *equilibrium {
                    EQUILIBRIUM_COLOR
                } else {
                    PROFILE_COLOR
                };
                let fill = if *hovered {
                    blend_color(fill, HOVER_OUTLINE, 0.25)
                } else {
                    fill
                };

                painter.circle_filled(position, *radius, fill);
                let outline = if *pinned {
                    Stroke::new(2.2, PIN_OUTLINE)
                } else if *hovered {
                    Stroke::new(2.0, HOVER_OUTLINE)
                } else {
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
                };
                painter.circle_stroke(position, *radius, outline);
            }
            SceneItem::Label { anchor, text } => {
                painter.text(
                    to_screen(origin, *anchor),
                    Align2::LEFT_CENTER,
                    text,
                    FontId::proportional(12.0),
                    LABEL_COLOR,
                );
            }
            SceneItem::Tooltip {
                anchor,
                lines,
                equilibrium,
            } => paint_tooltip(painter, to_screen(origin, *anchor), lines, *equilibrium),
        }
    }
}

fn paint_tooltip(painter: &Painter, anchor: Pos2, lines: &[String], equilibrium: bool) {
    let galley = painter.layout_no_wrap(
        lines.join("\n"),
        FontId::proportional(13.0),
        Color32::from_gray(240),
    );

    let padding = vec2(8.0, 6.0);
    let size = galley.size() + padding * 2.0;
    let clip = painter.clip_rect();
    let mut min = anchor - vec2(0.0, size.y);
    min.x = min.x.min(clip.right() - size.x).max(clip.left());
    min.y = min.y.min(clip.bottom() - size.y).max(clip.top());
    let frame = Rect::from_min_size(min, size);

    let border = if equilibrium {
        EQUILIBRIUM_COLOR
    } else {
        Color32::from_gray(90)
    };
    painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(28, 32, 40, 235));
    painter.line_segment([frame.left_top(), frame.left_bottom()], Stroke::new(3.0, border));
    painter.galley(frame.min + padding, galley, Color32::from_gray(240));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_is_clamped() {
        let black = Color32::from_rgb(0, 0, 0);
        let white = Color32::from_rgb(255, 255, 255);
        assert_eq!(blend_color(black, white, 0.0), black);
        assert_eq!(blend_color(black, white, 2.0), white);
        assert_eq!(blend_color(black, white, 0.5).r(), 127);
    }
}
