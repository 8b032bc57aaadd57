use egui::{Align, Frame, Id, Layout, Margin, RichText, Rounding, ScrollArea, Stroke, Ui, Vec2};
use egui_phosphor::regular as icons;

use crate::kanban::{group_by_status, move_to_column, KanbanBoard, KanbanColumn, StatusChange};
use crate::model::Task;
use crate::ui::theme;

/// Drag payload for a task card.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CardDrag {
    task_id: String,
}

/// Board UI state that outlives a frame.
#[derive(Debug, Clone, Default)]
pub struct KanbanEditState {
    pub new_column_title: String,
    /// Column being renamed and the title typed so far.
    pub renaming: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KanbanAction {
    #[default]
    None,
    Move(StatusChange),
    Edit(String),
    AddColumn(String),
    RenameColumn { id: String, title: String },
    RemoveColumn(String),
}

pub fn show_kanban_board(
    ui: &mut Ui,
    board: &KanbanBoard,
    tasks: &[Task],
    state: &mut KanbanEditState,
) -> KanbanAction {
    let mut action = KanbanAction::None;
    let groups = group_by_status(tasks, board.columns());

    ScrollArea::horizontal()
        .id_salt("kanban-board")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for column in board.columns() {
                    let cards = groups.get(&column.id).map(Vec::as_slice).unwrap_or(&[]);
                    if let Some(a) = show_column(ui, column, cards, tasks, state) {
                        action = a;
                    }
                }
                if let Some(a) = add_column_box(ui, state) {
                    action = a;
                }
            });
        });

    action
}

fn show_column(
    ui: &mut Ui,
    column: &KanbanColumn,
    cards: &[&Task],
    tasks: &[Task],
    state: &mut KanbanEditState,
) -> Option<KanbanAction> {
    let mut action = None;

    ui.allocate_ui_with_layout(
        Vec2::new(theme::KANBAN_COLUMN_WIDTH, ui.available_height()),
        Layout::top_down(Align::Min),
        |ui| {
            ui.set_width(theme::KANBAN_COLUMN_WIDTH);
            if let Some(a) = column_header(ui, column, cards.len(), state) {
                action = Some(a);
            }

            let dragging = egui::DragAndDrop::has_payload_of_type::<CardDrag>(ui.ctx());
            let frame = Frame::none()
                .fill(if dragging { theme::BG_DROP_TARGET } else { theme::BG_DARK })
                .rounding(Rounding::same(6.0))
                .inner_margin(Margin::same(6.0));
            let (_, dropped) = ui.dnd_drop_zone::<CardDrag, ()>(frame, |ui| {
                ui.set_min_size(Vec2::new(theme::KANBAN_COLUMN_WIDTH - 12.0, 120.0));
                for task in cards {
                    if let Some(a) = card(ui, task) {
                        action = Some(a);
                    }
                }
                if cards.is_empty() {
                    ui.label(RichText::new("Drop tasks here").small().color(theme::TEXT_DIM));
                }
            });

            if let Some(payload) = dropped {
                if let Some(task) = tasks.iter().find(|t| t.id == payload.task_id) {
                    let change = move_to_column(task, column);
                    if task.status.as_ref() != Some(&change.status) || task.completed != change.completed {
                        action = Some(KanbanAction::Move(change));
                    }
                }
            }
        },
    );
    action
}

fn column_header(
    ui: &mut Ui,
    column: &KanbanColumn,
    count: usize,
    state: &mut KanbanEditState,
) -> Option<KanbanAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
        ui.painter()
            .circle_filled(rect.center(), 4.0, theme::status_color(&column.status));

        let editing = matches!(&state.renaming, Some((id, _)) if *id == column.id);
        if editing {
            if let Some((_, title)) = state.renaming.as_mut() {
                let response = ui.add(egui::TextEdit::singleline(title).desired_width(140.0));
                if response.lost_focus() {
                    if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        action = Some(KanbanAction::RenameColumn {
                            id: column.id.clone(),
                            title: title.clone(),
                        });
                    }
                    state.renaming = None;
                } else {
                    response.request_focus();
                }
            }
            return;
        }

        ui.label(RichText::new(&column.title).strong());
        ui.label(RichText::new(count.to_string()).small().color(theme::TEXT_DIM));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.menu_button(icons::DOTS_THREE, |ui| {
                if ui.button("Rename").clicked() {
                    state.renaming = Some((column.id.clone(), column.title.clone()));
                    ui.close_menu();
                }
                let remove = ui.add_enabled(!column.is_default, egui::Button::new("Remove column"));
                let remove = if column.is_default {
                    remove.on_disabled_hover_text("Default columns cannot be removed")
                } else {
                    remove
                };
                if remove.clicked() {
                    action = Some(KanbanAction::RemoveColumn(column.id.clone()));
                    ui.close_menu();
                }
            });
        });
    });
    action
}

fn card(ui: &mut Ui, task: &Task) -> Option<KanbanAction> {
    let mut action = None;
    let id = Id::new(("kanban-card", task.id.as_str()));
    let payload = CardDrag {
        task_id: task.id.clone(),
    };
    ui.dnd_drag_source(id, payload, |ui| {
        Frame::none()
            .fill(theme::BG_PANEL)
            .stroke(Stroke::new(1.0, theme::BORDER_SUBTLE))
            .rounding(Rounding::same(4.0))
            .inner_margin(Margin::same(8.0))
            .show(ui, |ui| {
                ui.set_width(theme::KANBAN_COLUMN_WIDTH - 30.0);
                ui.allocate_ui_with_layout(
                    Vec2::new(ui.available_width(), 20.0),
                    Layout::right_to_left(Align::Center),
                    |ui| {
                        if ui
                            .small_button(icons::PENCIL_SIMPLE)
                            .on_hover_text("Edit task")
                            .clicked()
                        {
                            action = Some(KanbanAction::Edit(task.id.clone()));
                        }
                        let mut title = RichText::new(&task.title);
                        if task.completed {
                            title = title.strikethrough().color(theme::TEXT_DIM);
                        }
                        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                            ui.add(egui::Label::new(title).truncate().selectable(false));
                        });
                    },
                );
                match task.date_range() {
                    Some((start, end)) => ui.label(
                        RichText::new(format!("{} → {}", start.format("%b %-d"), end.format("%b %-d")))
                            .small()
                            .color(theme::TEXT_SECONDARY),
                    ),
                    None => ui.label(RichText::new("No dates").small().color(theme::TEXT_DIM)),
                };
            });
    });
    ui.add_space(4.0);
    action
}

fn add_column_box(ui: &mut Ui, state: &mut KanbanEditState) -> Option<KanbanAction> {
    let mut action = None;
    ui.allocate_ui_with_layout(
        Vec2::new(theme::KANBAN_COLUMN_WIDTH, 60.0),
        Layout::top_down(Align::Min),
        |ui| {
            ui.label(RichText::new("New column").color(theme::TEXT_SECONDARY));
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.new_column_title)
                        .hint_text("Column title")
                        .desired_width(160.0),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let has_title = !state.new_column_title.trim().is_empty();
                if (ui.add_enabled(has_title, egui::Button::new(icons::PLUS)).clicked() || submitted)
                    && has_title
                {
                    action = Some(KanbanAction::AddColumn(std::mem::take(&mut state.new_column_title)));
                }
            });
        },
    );
    action
}
