use crate::app::TimelineApp;
use crate::model::Granularity;
use crate::state::ViewAction;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  File  ", |ui| {
            if ui.button(format!("{} New Task      Ctrl+N", icons::PLUS)).clicked() {
                app.open_new_task_dialog();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            if ui.button("  CSV Format...").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{} Open Data Folder", icons::FOLDER_OPEN)).clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("  View  ", |ui| {
            let sidebar = if app.view.sidebar_collapsed { "Show Sidebar" } else { "Hide Sidebar" };
            if ui.button(format!("{} {sidebar}", icons::SIDEBAR)).clicked() {
                app.apply_view(ViewAction::ToggleSidebar);
                ui.close_menu();
            }
            if ui.button(format!("{} Share Preview", icons::EYE)).clicked() {
                app.show_share = true;
                ui.close_menu();
            }
        });

        ui.menu_button("  Help  ", |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        for granularity in Granularity::ALL {
            let selected = app.view.granularity == granularity;
            if ui.selectable_label(selected, granularity.label()).clicked() && !selected {
                app.apply_view(ViewAction::SetGranularity(granularity));
            }
        }

        ui.separator();

        let timeline = app.view.granularity.scale().is_some();
        ui.add_enabled_ui(timeline, |ui| {
            if ui
                .add_enabled(app.view.can_zoom_out(), egui::Button::new(icons::MAGNIFYING_GLASS_MINUS))
                .on_hover_text("Zoom out (Ctrl -)")
                .clicked()
            {
                app.apply_view(ViewAction::ZoomOut);
            }
            ui.label(RichText::new(format!("{}%", app.view.zoom_percent)).monospace());
            if ui
                .add_enabled(app.view.can_zoom_in(), egui::Button::new(icons::MAGNIFYING_GLASS_PLUS))
                .on_hover_text("Zoom in (Ctrl +)")
                .clicked()
            {
                app.apply_view(ViewAction::ZoomIn);
            }
            if ui
                .button(icons::ARROW_COUNTER_CLOCKWISE)
                .on_hover_text("Reset zoom (Ctrl 0)")
                .clicked()
            {
                app.apply_view(ViewAction::ResetZoom);
            }
        });

        // Right-aligned project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(format!("{} Add Task", icons::PLUS)).clicked() {
                app.open_new_task_dialog();
            }
            if let Some(project) = app.selected_project() {
                ui.label(RichText::new(project.name).size(11.0).weak());
            }
        });
    });
}
