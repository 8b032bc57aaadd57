use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::config::AppPaths;
use crate::kanban::KanbanBoard;
use crate::layout;
use crate::model::{Project, TaskStatus};
use crate::scroll_sync::ScrollSynchronizer;
use crate::source::{LocalSource, NewTask, Snapshot, Subscription, TaskMutations, TaskSource};
use crate::state::{FileStore, ViewAction, ViewState};
use crate::summary::{ProgressSummarizer, Summarizer, SummaryDebouncer};
use crate::ui;
use crate::ui::dialogs::{DialogResult, TaskForm};
use crate::ui::kanban_board::{KanbanAction, KanbanEditState};
use crate::ui::timeline_view::{TimelineAction, TimelineMode};

const SUMMARY_DELAY: Duration = Duration::from_millis(800);

/// Main application state.
pub struct TimelineApp {
    pub paths: AppPaths,
    pub source: LocalSource,
    pub view: ViewState,
    settings: FileStore,
    persisted_view: ViewState,

    /// Latest snapshot of the selected project, written by the subscription.
    tasks: Rc<RefCell<Snapshot>>,
    subscription: Option<Subscription>,

    pub timeline_sync: ScrollSynchronizer,
    pub share_sync: ScrollSynchronizer,
    pub kanban_state: KanbanEditState,

    // Dialog state
    pub task_form: Option<TaskForm>,
    pub show_about: bool,
    pub show_csv_help: bool,
    pub show_share: bool,
    pub new_project_name: String,
    /// Project being renamed in the sidebar, with the edited name.
    pub renaming_project: Option<(String, String)>,

    summarizer: Box<dyn Summarizer>,
    summary_debounce: SummaryDebouncer,
    summarized: Snapshot,
    pub summary: Option<String>,

    pub status_message: String,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, paths: AppPaths) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let mut status_message = "Ready".to_string();
        let source = match LocalSource::open(paths.workspace_file()) {
            Ok(source) => source,
            Err(e) => {
                error!(error = %e, "Failed to open workspace, continuing in memory");
                status_message = format!("Could not open workspace: {e}");
                LocalSource::in_memory(Default::default())
            }
        };
        let settings = FileStore::open(paths.settings_file());
        let view = ViewState::load(&settings);

        let mut app = Self {
            paths,
            source,
            persisted_view: view.clone(),
            view,
            settings,
            tasks: Rc::new(RefCell::new(Snapshot::from(Vec::new()))),
            subscription: None,
            timeline_sync: ScrollSynchronizer::new(),
            share_sync: ScrollSynchronizer::new(),
            kanban_state: KanbanEditState::default(),
            task_form: None,
            show_about: false,
            show_csv_help: false,
            show_share: false,
            new_project_name: String::new(),
            renaming_project: None,
            summarizer: Box::new(ProgressSummarizer),
            summary_debounce: SummaryDebouncer::new(SUMMARY_DELAY),
            summarized: Snapshot::from(Vec::new()),
            summary: None,
            status_message,
        };

        if app.source.projects().is_empty() {
            app.seed_sample_project();
        }
        let selected = app
            .view
            .selected_project_id
            .clone()
            .filter(|id| app.source.project(id).is_ok())
            .or_else(|| app.source.projects().first().map(|p| p.id.clone()));
        app.select_project(selected);
        app
    }

    fn seed_sample_project(&mut self) {
        let today = chrono::Local::now().date_naive();
        let day = |offset: i64| today + chrono::Duration::days(offset);
        let project = match self.source.create_project("Website Launch") {
            Ok(project) => project,
            Err(e) => {
                warn!(error = %e, "Could not create sample project");
                return;
            }
        };
        let samples: [(&str, i64, i64, TaskStatus); 5] = [
            ("Requirements", -10, -4, TaskStatus::Done),
            ("Design", -5, 3, TaskStatus::InProgress),
            ("Content review", 0, 6, TaskStatus::Pending),
            ("Build", 4, 20, TaskStatus::Todo),
            ("Launch", 21, 21, TaskStatus::Todo),
        ];
        for (title, start, end, status) in samples {
            let new = NewTask {
                title: title.to_string(),
                description: String::new(),
                start_date: day(start),
                end_date: day(end),
                status: Some(status),
            };
            if let Err(e) = self.source.create_task(&project.id, new) {
                warn!(error = %e, title, "Could not create sample task");
            }
        }
        info!(project_id = %project.id, "Seeded sample project");
    }

    // --- View state ---

    pub fn apply_view(&mut self, action: ViewAction) {
        self.view = self.view.apply(action);
    }

    fn persist_view_if_changed(&mut self) {
        if self.view != self.persisted_view {
            self.view.persist(&mut self.settings);
            self.persisted_view = self.view.clone();
        }
    }

    // --- Projects ---

    pub fn selected_project(&self) -> Option<Project> {
        let id = self.view.selected_project_id.as_deref()?;
        self.source.project(id).ok()
    }

    /// Switch projects and move the subscription along.
    pub fn select_project(&mut self, id: Option<String>) {
        self.subscription = None;
        self.apply_view(ViewAction::SelectProject(id.clone()));

        let snapshot = match id.as_deref().map(|id| self.source.fetch_tasks(id)) {
            Some(Ok(tasks)) => tasks,
            Some(Err(e)) => {
                warn!(error = %e, "Selected project is unavailable");
                self.apply_view(ViewAction::SelectProject(None));
                Snapshot::from(Vec::new())
            }
            None => Snapshot::from(Vec::new()),
        };
        *self.tasks.borrow_mut() = snapshot;

        if let Some(id) = self.view.selected_project_id.clone() {
            let cell = Rc::clone(&self.tasks);
            self.subscription = Some(self.source.subscribe(
                &id,
                Box::new(move |tasks: Snapshot| *cell.borrow_mut() = tasks),
            ));
        }
        self.timeline_sync.unbind();
        self.share_sync.unbind();
        self.summary = None;
    }

    pub fn create_project(&mut self) {
        let name = self.new_project_name.trim().to_string();
        if name.is_empty() {
            return;
        }
        match self.source.create_project(&name) {
            Ok(project) => {
                self.new_project_name.clear();
                self.status_message = format!("Created project '{}'", project.name);
                self.select_project(Some(project.id));
            }
            Err(e) => self.report_error("Could not create project", e),
        }
    }

    pub fn rename_project(&mut self, id: &str, name: &str) {
        if name.trim().is_empty() {
            return;
        }
        match self.source.rename_project(id, name) {
            Ok(()) => self.status_message = format!("Renamed project to '{}'", name.trim()),
            Err(e) => self.report_error("Could not rename project", e),
        }
    }

    pub fn delete_project(&mut self, id: &str) {
        let confirm = rfd::MessageDialog::new()
            .set_title("Delete project")
            .set_description("Delete this project and all of its tasks?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        if confirm != rfd::MessageDialogResult::Yes {
            return;
        }
        match self.source.delete_project(id) {
            Ok(()) => {
                self.status_message = "Project deleted".to_string();
                if self.view.selected_project_id.as_deref() == Some(id) {
                    let next = self.source.projects().first().map(|p| p.id.clone());
                    self.select_project(next);
                }
            }
            Err(e) => self.report_error("Could not delete project", e),
        }
    }

    fn current_tasks(&self) -> Snapshot {
        Rc::clone(&self.tasks.borrow())
    }

    fn current_board(&self) -> KanbanBoard {
        self.view
            .selected_project_id
            .as_deref()
            .and_then(|id| self.source.board(id).ok())
            .unwrap_or_default()
    }

    fn report_error(&mut self, what: &str, e: crate::error::Error) {
        error!(error = %e, "{what}");
        self.status_message = format!("{what}: {e}");
    }

    // --- Tasks ---

    pub fn open_new_task_dialog(&mut self) {
        if self.view.selected_project_id.is_none() {
            self.status_message = "Create a project first".to_string();
            return;
        }
        self.task_form = Some(TaskForm::create(today()));
    }

    fn open_edit_dialog(&mut self, task_id: &str) {
        let tasks = self.current_tasks();
        if let Some(task) = tasks.iter().find(|t| t.id == task_id) {
            self.task_form = Some(TaskForm::edit(task, today()));
        }
    }

    fn submit_task_form(&mut self, form: TaskForm) {
        let Some(project_id) = self.view.selected_project_id.clone() else {
            return;
        };
        let result = match &form.task_id {
            None => self
                .source
                .create_task(&project_id, form.to_new_task())
                .map(|_| "Task added"),
            Some(id) => {
                let tasks = self.current_tasks();
                match tasks.iter().find(|t| &t.id == id) {
                    Some(task) => self.source.update_task(form.apply_to(task)).map(|_| "Task updated"),
                    None => Err(crate::error::Error::TaskNotFound(id.clone())),
                }
            }
        };
        match result {
            Ok(message) => self.status_message = message.to_string(),
            Err(e) => self.report_error("Could not save task", e),
        }
    }

    fn handle_timeline_action(&mut self, action: TimelineAction) {
        let Some(project_id) = self.view.selected_project_id.clone() else {
            return;
        };
        match action {
            TimelineAction::None => {}
            TimelineAction::Edit(id) => self.open_edit_dialog(&id),
            TimelineAction::ToggleComplete(id) => {
                match self.source.toggle_completed(&project_id, &id) {
                    Ok(done) => {
                        self.status_message =
                            if done { "Task completed" } else { "Task reopened" }.to_string()
                    }
                    Err(e) => self.report_error("Could not update task", e),
                }
            }
            TimelineAction::Delete(id) => match self.source.delete_task(&project_id, &id) {
                Ok(()) => self.status_message = "Task deleted".to_string(),
                Err(e) => self.report_error("Could not delete task", e),
            },
        }
    }

    fn handle_kanban_action(&mut self, action: KanbanAction) {
        let Some(project_id) = self.view.selected_project_id.clone() else {
            return;
        };
        let mut board = self.current_board();
        let board_result = match action {
            KanbanAction::None => return,
            KanbanAction::Edit(id) => {
                self.open_edit_dialog(&id);
                return;
            }
            KanbanAction::Move(change) => {
                match self
                    .source
                    .update_status(&project_id, &change.task_id, change.status, change.completed)
                {
                    Ok(()) => debug!(task_id = %change.task_id, "Task moved"),
                    Err(e) => self.report_error("Could not move task", e),
                }
                return;
            }
            KanbanAction::AddColumn(title) => board.add_column(&title).map(|_| ()),
            KanbanAction::RenameColumn { id, title } => board.rename_column(&id, &title),
            KanbanAction::RemoveColumn(id) => board.remove_column(&id).map(|_| ()),
        };
        match board_result {
            Ok(()) => {
                if let Err(e) = self.source.update_board(&project_id, board) {
                    self.report_error("Could not save board", e);
                }
            }
            Err(e) => {
                warn!(error = %e, "Board change rejected");
                self.status_message = e.to_string();
            }
        }
    }

    // --- Import / export ---

    pub fn import_csv(&mut self) {
        let Some(project_id) = self.view.selected_project_id.clone() else {
            self.status_message = "Select a project to import into".to_string();
            return;
        };
        // Guard: if current project has tasks, confirm before replacing
        if !self.current_tasks().is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the tasks of the current project. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        let imported = crate::io::csv_import::import_csv(&path, &project_id).and_then(
            |(tasks, skipped)| {
                let count = tasks.len();
                self.source.replace_tasks(&project_id, tasks)?;
                Ok((count, skipped))
            },
        );
        match imported {
            Ok((count, 0)) => self.status_message = format!("Imported {count} tasks"),
            Ok((count, skipped)) => {
                self.status_message = format!("Imported {count} tasks ({skipped} rows skipped)")
            }
            Err(e) => self.report_error("CSV import failed", e),
        }
    }

    pub fn export_csv(&mut self) {
        let tasks = self.current_tasks();
        if tasks.is_empty() {
            self.status_message = "Nothing to export: project has no tasks".to_string();
            return;
        }
        let name = self
            .selected_project()
            .map(|p| p.name)
            .unwrap_or_else(|| "tasks".to_string());
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{name}.csv"))
            .save_file()
        {
            match crate::io::csv_export::export_csv(&tasks, &path) {
                Ok(count) => self.status_message = format!("Exported {count} tasks to CSV"),
                Err(e) => self.report_error("CSV export failed", e),
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        if let Err(e) = open::that(&self.paths.data_dir) {
            warn!(error = %e, dir = %self.paths.data_dir.display(), "Could not open data folder");
            self.status_message = format!("Could not open data folder: {e}");
        }
    }

    // --- Summary ---

    fn tick_summary(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let tasks = self.current_tasks();
        if !Rc::ptr_eq(&tasks, &self.summarized) {
            self.summarized = Rc::clone(&tasks);
            self.summary_debounce.schedule(now);
        }

        if let Some(generation) = self.summary_debounce.poll(now) {
            let name = self.selected_project().map(|p| p.name).unwrap_or_default();
            match self.summarizer.summarize(&name, &tasks) {
                Ok(text) if self.summary_debounce.accept(generation) => self.summary = Some(text),
                Ok(_) => debug!(generation, "Discarding stale summary"),
                Err(e) => {
                    debug!(error = %e, "No summary");
                    self.summary = None;
                }
            }
        }

        if let Some(remaining) = self.summary_debounce.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keyboard shortcuts
        let (zoom_in, zoom_out, reset_zoom, new_task) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                cmd && (i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals)),
                cmd && i.key_pressed(egui::Key::Minus),
                cmd && i.key_pressed(egui::Key::Num0),
                cmd && i.key_pressed(egui::Key::N),
            )
        });
        if zoom_in {
            self.apply_view(ViewAction::ZoomIn);
        }
        if zoom_out {
            self.apply_view(ViewAction::ZoomOut);
        }
        if reset_zoom {
            self.apply_view(ViewAction::ResetZoom);
        }
        if new_task && self.task_form.is_none() {
            self.open_new_task_dialog();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {}  ·  Zoom: {}%",
                                self.tasks.borrow().len(),
                                self.view.zoom_percent
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        ui::sidebar::show_sidebar(self, ctx);

        // Rebuilt every frame from the latest snapshot.
        let tasks = self.current_tasks();
        let model = layout::build_model(&tasks, &self.view);

        let mut timeline_action = TimelineAction::None;
        let mut kanban_action = KanbanAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.view.selected_project_id.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("Create or select a project in the sidebar.");
                });
                return;
            }
            match &model {
                Some(model) => {
                    timeline_action = ui::timeline_view::show_timeline(
                        ui,
                        model,
                        &mut self.timeline_sync,
                        TimelineMode::Editable,
                        "timeline",
                    );
                }
                None => {
                    let board = self.current_board();
                    kanban_action = ui::kanban_board::show_kanban_board(
                        ui,
                        &board,
                        &tasks,
                        &mut self.kanban_state,
                    );
                }
            }
        });

        if self.show_share {
            let mut open = true;
            egui::Window::new("Share preview (read-only)")
                .open(&mut open)
                .default_size([900.0, 420.0])
                .show(ctx, |ui| match &model {
                    Some(model) => {
                        ui::timeline_view::show_timeline(
                            ui,
                            model,
                            &mut self.share_sync,
                            TimelineMode::ReadOnly,
                            "share",
                        );
                    }
                    None => {
                        ui.label("Switch to a timeline view to preview the shared timeline.");
                    }
                });
            self.show_share = open;
        }

        self.handle_timeline_action(timeline_action);
        self.handle_kanban_action(kanban_action);

        if let Some(mut form) = self.task_form.take() {
            let columns = self.current_board();
            match ui::dialogs::show_task_dialog(ctx, &mut form, columns.columns()) {
                Some(DialogResult::Submit) => self.submit_task_form(form),
                Some(DialogResult::Cancel) => {}
                None => self.task_form = Some(form),
            }
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(ctx, &mut self.show_about);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(ctx, &mut self.show_csv_help);
        }

        self.tick_summary(ctx);
        self.persist_view_if_changed();
    }
}
