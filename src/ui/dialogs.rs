use chrono::NaiveDate;
use egui::{Color32, Context, RichText, Window};

use crate::kanban::KanbanColumn;
use crate::model::{Task, TaskStatus};
use crate::source::NewTask;
use crate::ui::theme;

/// Field values of the add/edit task dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    /// `None` while creating a new task.
    pub task_id: Option<String>,
    pub title: String,
    pub description: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: TaskStatus,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn create(today: NaiveDate) -> Self {
        Self {
            task_id: None,
            title: String::new(),
            description: String::new(),
            start: today,
            end: today + chrono::Duration::days(7),
            status: TaskStatus::Todo,
            error: None,
        }
    }

    /// Prefill from `task`; unusable dates start out as `today`.
    pub fn edit(task: &Task, today: NaiveDate) -> Self {
        Self {
            task_id: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            start: task.start_date.unwrap_or(today),
            end: task.end_date.or(task.start_date).unwrap_or(today),
            status: task.effective_status(),
            error: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.end < self.start {
            return Err("End date is before the start date".to_string());
        }
        Ok(())
    }

    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date: self.start,
            end_date: self.end,
            status: Some(self.status.clone()),
        }
    }

    /// Apply the form to an existing task. Moving into or out of Done updates
    /// completion the same way the board does.
    pub fn apply_to(&self, task: &Task) -> Task {
        let mut updated = task.clone();
        updated.title = self.title.trim().to_string();
        updated.description = self.description.trim().to_string();
        updated.start_date = Some(self.start);
        updated.end_date = Some(self.end);
        if task.effective_status() != self.status {
            updated.completed = self.status.is_done();
        }
        updated.status = Some(self.status.clone());
        updated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Submit,
    Cancel,
}

/// Render the add/edit task dialog.
pub fn show_task_dialog(
    ctx: &Context,
    form: &mut TaskForm,
    columns: &[KanbanColumn],
) -> Option<DialogResult> {
    let mut result = None;
    let title = if form.task_id.is_some() { "Edit Task" } else { "Add Task" };

    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([360.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);

            egui::Grid::new("task_form_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [240.0, 24.0],
                        egui::TextEdit::singleline(&mut form.title).hint_text("Task title..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Description").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [240.0, 48.0],
                        egui::TextEdit::multiline(&mut form.description).desired_rows(2),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut form.start).id_salt("dlg_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut form.end).id_salt("dlg_dp_end"));
                    ui.end_row();

                    ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
                    let selected = columns
                        .iter()
                        .find(|c| c.status == form.status)
                        .map(|c| c.title.clone())
                        .unwrap_or_else(|| form.status.to_string());
                    egui::ComboBox::from_id_salt("dlg_status")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for column in columns {
                                ui.selectable_value(&mut form.status, column.status.clone(), column.title.as_str());
                            }
                        });
                    ui.end_row();
                });

            if let Some(error) = &form.error {
                ui.add_space(4.0);
                ui.label(RichText::new(error).color(theme::TODAY_LINE));
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let label = if form.task_id.is_some() { "Save" } else { "Create" };
                let submit = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], submit).clicked() {
                    match form.validate() {
                        Ok(()) => result = Some(DialogResult::Submit),
                        Err(e) => form.error = Some(e),
                    }
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    result = Some(DialogResult::Cancel);
                }
            });
            ui.add_space(2.0);
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = Some(DialogResult::Cancel);
    }
    result
}

/// Render the "About" dialog.
pub fn show_about_dialog(ctx: &Context, open: &mut bool) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Timeline Board").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Project timelines and Kanban boards");
                ui.label("built with Rust and egui.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        *open = false;
    }
}

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(ctx: &Context, open: &mut bool) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([520.0, 420.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(RichText::new("Delimiters").strong());
                ui.label("The delimiter is auto-detected: comma (,), semicolon (;), or tab.");
                ui.add_space(8.0);

                ui.label(RichText::new("Columns").strong());
                egui::Grid::new("csv_columns")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for (column, headers) in [
                            ("Title *", "Title, Name, Task, Task Name, Task Label, Label"),
                            ("Start Date *", "Start, Start Date, From, Begin"),
                            ("End Date *", "End, End Date, To, Finish, Due, Due Date"),
                            ("Status", "Status, State, Stage"),
                            ("Completed", "Completed, Complete, Done (yes / no)"),
                            ("Description", "Description, Notes, Details"),
                        ] {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Notes").strong());
                for note in [
                    "• Header matching ignores case, spaces, hyphens and underscores.",
                    "• Dates: YYYY-MM-DD, DD/MM/YYYY, MM/DD/YYYY, DD-MM-YYYY, DD.MM.YYYY, YYYY/MM/DD.",
                    "• Rows without a title are skipped.",
                    "• Rows with invalid dates are kept but stay off the timeline until fixed.",
                    "• Importing replaces the tasks of the selected project.",
                ] {
                    ui.label(RichText::new(note).small());
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Example").strong());
                let example = "Title;Start Date;End Date;Status;Completed\n\
                               Design;2025-01-01;2025-01-31;done;yes\n\
                               Build;2025-02-01;2025-02-28;in-progress;no";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
            });

            ui.separator();
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        *open = false;
    }
}
