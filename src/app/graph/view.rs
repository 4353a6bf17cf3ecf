use eframe::egui::{self, CursorIcon, PointerButton, Sense, Ui};

use super::super::DeviationGraphApp;
use super::super::render_utils::{draw_background, paint_scene};
use super::super::session::FrameOutcome;
use super::PointerEvent;

impl DeviationGraphApp {
    /// Translates this frame's pointer input, advances one tick and paints.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let viewport = self.config.viewport;
        ui.add_space(viewport.margin);
        let (rect, response) = ui
            .horizontal(|ui| {
                ui.add_space(viewport.margin);
                ui.allocate_exact_size(viewport.size(), Sense::click_and_drag())
            })
            .inner;
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let origin = rect.min.to_vec2();
        let to_viewport = |position: egui::Pos2| position.to_vec2() - origin;

        if response.drag_started_by(PointerButton::Primary) {
            let press = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(press) = press {
                self.session.pointer(PointerEvent::Down(to_viewport(press)));
            }
        }

        if response.dragged_by(PointerButton::Primary)
            && let Some(position) = response.interact_pointer_pos()
        {
            self.session.pointer(PointerEvent::Move(to_viewport(position)));
        }

        if response.drag_stopped() {
            self.session.pointer(PointerEvent::Up);
        }

        if !self.session.is_dragging() {
            match ui.input(|input| input.pointer.hover_pos()) {
                Some(position) if response.hovered() => {
                    self.session.pointer(PointerEvent::Move(to_viewport(position)));
                }
                _ => self.session.pointer(PointerEvent::Leave),
            }
        }

        let outcome = self.session.frame();
        if outcome == FrameOutcome::Animating {
            ui.ctx().request_repaint();
        }

        if self.session.hovered().is_some() {
            ui.ctx().set_cursor_icon(if self.session.is_dragging() {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Grab
            });
        }

        if let Some(scene) = self.session.scene() {
            paint_scene(&painter, origin, scene);
        }
    }
}
