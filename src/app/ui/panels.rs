use eframe::egui::{self, Align, Color32, Context, Layout, RichText, Ui};

use super::super::DeviationGraphApp;

impl DeviationGraphApp {
    pub(in crate::app) fn show_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.title.as_str());
                ui.separator();
                ui.label(RichText::new(self.source.describe()).weak());

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let loading = self.is_loading();
                    if ui
                        .add_enabled(!loading, egui::Button::new("Reload"))
                        .on_hover_text("Fetch the deviation graph again and restart the layout.")
                        .clicked()
                    {
                        self.request_reload();
                    }
                    if loading {
                        ui.spinner();
                        ui.label("Loading...");
                    }
                });
            });

            if let Some(error) = self.load_error().map(str::to_owned) {
                ui.horizontal(|ui| {
                    ui.colored_label(Color32::from_rgb(230, 110, 100), "Reload failed:");
                    ui.label(error);
                    if ui.button("Retry").clicked() {
                        self.request_reload();
                    }
                });
            }
        });
    }

    pub(in crate::app) fn show_first_load(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            match self.load_error().map(str::to_owned) {
                Some(error) => {
                    ui.heading("Failed to load deviation graph");
                    ui.add_space(8.0);
                    ui.label(error);
                    ui.add_space(8.0);
                    if ui.button("Retry").clicked() {
                        self.request_reload();
                    }
                }
                None => {
                    ui.heading("Loading deviation graph...");
                    ui.add_space(8.0);
                    ui.label(RichText::new(self.source.describe()).weak());
                    ui.add_space(8.0);
                    ui.spinner();
                }
            }
        });
    }

    pub(in crate::app) fn show_empty_state(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading("No action profiles to display");
            ui.add_space(8.0);
            ui.label("The analysis returned an empty deviation graph.");
        });
    }
}
