use egui::{Context, RichText};
use egui_phosphor::regular as icons;

use crate::app::TimelineApp;
use crate::ui::theme;

/// Collapsible project list on the left.
pub fn show_sidebar(app: &mut TimelineApp, ctx: &Context) {
    let mut select = None;
    let mut delete = None;
    let mut rename = None;
    let mut create = false;

    egui::SidePanel::left("project_sidebar")
        .default_width(220.0)
        .min_width(180.0)
        .resizable(true)
        .frame(
            egui::Frame::default()
                .fill(theme::BG_PANEL)
                .inner_margin(egui::Margin::same(8.0))
                .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE)),
        )
        .show_animated(ctx, !app.view.sidebar_collapsed, |ui| {
            ui.label(RichText::new("Projects").strong().color(theme::TEXT_SECONDARY));
            ui.add_space(4.0);

            let selected = app.view.selected_project_id.clone();
            for project in app.source.projects() {
                ui.horizontal(|ui| {
                    if let Some((id, name)) = app.renaming_project.as_mut() {
                        if *id == project.id {
                            let response = ui.add(egui::TextEdit::singleline(name).desired_width(150.0));
                            if response.lost_focus() {
                                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                    rename = Some((id.clone(), name.clone()));
                                }
                                app.renaming_project = None;
                            } else {
                                response.request_focus();
                            }
                            return;
                        }
                    }

                    let is_selected = selected.as_deref() == Some(project.id.as_str());
                    let label = format!("{} ({})", project.name, project.tasks.len());
                    let response = ui.selectable_label(is_selected, label);
                    if response.clicked() && !is_selected {
                        select = Some(project.id.clone());
                    }
                    if response.double_clicked() {
                        app.renaming_project = Some((project.id.clone(), project.name.clone()));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .small_button(icons::TRASH)
                            .on_hover_text("Delete project")
                            .clicked()
                        {
                            delete = Some(project.id.clone());
                        }
                    });
                });
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut app.new_project_name)
                        .hint_text("New project...")
                        .desired_width(140.0),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button(icons::PLUS).on_hover_text("Create project").clicked() || submitted {
                    create = true;
                }
            });

            if let Some(summary) = &app.summary {
                ui.add_space(12.0);
                ui.separator();
                ui.label(RichText::new("Summary").strong().color(theme::TEXT_SECONDARY));
                ui.label(RichText::new(summary).small());
            }
        });

    if create {
        app.create_project();
    }
    if let Some(id) = select {
        app.select_project(Some(id));
    }
    if let Some((id, name)) = rename {
        app.rename_project(&id, &name);
    }
    if let Some(id) = delete {
        app.delete_project(&id);
    }
}
