use eframe::egui::{self, Color32, Context, Sense, Ui, vec2};

use super::super::DeviationGraphApp;
use super::super::render_utils::{EQUILIBRIUM_COLOR, PROFILE_COLOR};

impl DeviationGraphApp {
    pub(in crate::app) fn show_side_panel(&mut self, ctx: &Context) {
        egui::SidePanel::right("controls")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                self.draw_physics_controls(ui);
                ui.separator();
                draw_legend(ui);
                ui.separator();
                self.draw_stats(ui);
            });
    }

    fn draw_physics_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        let mut physics = self.config.physics;
        let mut changed = false;

        changed |= ui
            .add(
                egui::Slider::new(&mut physics.link_distance, 30.0..=300.0)
                    .text("Link distance")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Rest length of every deviation edge.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut physics.charge_strength, -1000.0..=-10.0)
                    .text("Charge")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Repulsion between profiles; more negative pushes harder.")
            .changed();

        if changed {
            self.config.physics = physics;
            self.session.set_physics(physics);
            self.session.reheat();
        }

        if ui
            .add_enabled(self.session.is_active(), egui::Button::new("Reheat"))
            .on_hover_text("Wake the layout so it settles again.")
            .clicked()
        {
            self.session.reheat();
        }
    }

    fn draw_stats(&self, ui: &mut Ui) {
        ui.heading("Graph");
        let Some(simulation) = self.session.simulation() else {
            ui.label("No simulation running.");
            return;
        };

        let graph = simulation.graph();
        egui::Grid::new("graph_stats")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                if let Some(generation) = self.session.generation() {
                    ui.label("Run");
                    ui.label(format!("#{generation}"));
                    ui.end_row();
                }

                ui.label("Profiles");
                ui.label(graph.nodes.len().to_string());
                ui.end_row();

                ui.label("Deviations");
                ui.label(graph.edges.len().to_string());
                ui.end_row();

                ui.label("Equilibria");
                ui.label(graph.highlighted_ids().len().to_string());
                ui.end_row();

                ui.label("Alpha");
                ui.label(format!("{:.4}", simulation.alpha()));
                ui.end_row();

                ui.label("Ticks");
                ui.label(simulation.ticks().to_string());
                ui.end_row();

                ui.label("State");
                ui.label(if simulation.is_settled() {
                    "settled"
                } else {
                    "running"
                });
                ui.end_row();
            });
    }
}

fn draw_legend(ui: &mut Ui) {
    ui.heading("Legend");
    legend_row(ui, EQUILIBRIUM_COLOR, "Pure Nash equilibrium");
    legend_row(ui, PROFILE_COLOR, "Action profile");
    ui.label("Arrows point from a profile to a player's profitable deviation.");
}

fn legend_row(ui: &mut Ui, color: Color32, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter().circle_filled(rect.center(), 6.0, color);
        ui.label(label);
    });
}
