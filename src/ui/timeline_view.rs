//! Timeline renderer shared by the editable grid and the read-only share view.
//!
//! The header and each task row are their own horizontal scroll areas; a
//! [`ScrollSynchronizer`] keeps them moving as one surface.

use chrono::NaiveDate;
use egui::scroll_area::ScrollBarVisibility;
use egui::{
    Align, Align2, Color32, Id, Layout, Pos2, Rect, RichText, Rounding, ScrollArea, Sense, Stroke,
    Ui, Vec2,
};
use egui_phosphor::regular as icons;

use crate::layout::{TaskLayout, TimelineModel};
use crate::model::Task;
use crate::scroll_sync::ScrollSynchronizer;
use crate::ui::theme;

/// Key under which each rendered timeline's screen rect is stored in egui
/// memory, so an exporter can find the finished grid.
pub const TIMELINE_ROOT_ID: &str = "timeline-root";

/// Root id of the timeline rendered under `salt`.
pub fn timeline_root_id(salt: &str) -> Id {
    Id::new((TIMELINE_ROOT_ID, salt))
}

/// Screen rect of the last timeline rendered under `salt`, if any.
pub fn timeline_root_rect(ctx: &egui::Context, salt: &str) -> Option<Rect> {
    ctx.data(|d| d.get_temp(timeline_root_id(salt)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineMode {
    Editable,
    ReadOnly,
}

/// What the user asked for in an editable timeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimelineAction {
    #[default]
    None,
    ToggleComplete(String),
    Edit(String),
    Delete(String),
}

/// Render `model`. `salt` keeps the surfaces of different timelines apart.
pub fn show_timeline(
    ui: &mut Ui,
    model: &TimelineModel<'_>,
    sync: &mut ScrollSynchronizer,
    mode: TimelineMode,
    salt: &str,
) -> TimelineAction {
    let mut action = TimelineAction::None;

    let response = ui
        .vertical(|ui| {
            if model.is_empty() {
                sync.unbind();
                empty_state(ui, model.dropped);
                return;
            }

            let header_id = Id::new((salt, "header"));
            let row_ids: Vec<Id> = model
                .rows
                .iter()
                .map(|row| Id::new((salt, "row", row.task.id.as_str())))
                .collect();
            sync.bind(header_id, row_ids.iter().copied(), model.column_width);

            let today = chrono::Local::now().date_naive();

            if model.dropped > 0 {
                ui.label(
                    RichText::new(format!(
                        "{} task(s) hidden because of missing or invalid dates",
                        model.dropped
                    ))
                    .small()
                    .color(theme::TEXT_DIM),
                );
            }

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(
                    Vec2::new(theme::LABEL_WIDTH, theme::HEADER_HEIGHT),
                    Sense::hover(),
                );
                ui.painter().rect_filled(rect, 0.0, theme::BG_HEADER);
                ui.painter().text(
                    Pos2::new(rect.left() + 8.0, rect.center().y),
                    Align2::LEFT_CENTER,
                    format!("Tasks ({})", model.rows.len()),
                    theme::font_header(),
                    theme::TEXT_SECONDARY,
                );
                synced_surface(ui, sync, header_id, true, |ui| draw_header(ui, model, today));
            });

            ScrollArea::vertical()
                .id_salt((salt, "rows"))
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.spacing_mut().item_spacing.y = 0.0;
                    for (index, (row, id)) in model.rows.iter().zip(&row_ids).enumerate() {
                        ui.horizontal(|ui| {
                            if let Some(a) = row_label(ui, row.task, mode) {
                                action = a;
                            }
                            let clicked = synced_surface(ui, sync, *id, false, |ui| {
                                draw_row(ui, model, row, mode, index, today)
                            });
                            if let Some(a) = clicked {
                                action = a;
                            }
                        });
                    }
                });
        })
        .response;

    ui.ctx()
        .data_mut(|d| d.insert_temp(timeline_root_id(salt), response.rect));
    action
}

/// A horizontal scroll area wired into the synchronizer.
fn synced_surface<R>(
    ui: &mut Ui,
    sync: &mut ScrollSynchronizer,
    id: Id,
    show_scroll_bar: bool,
    add_contents: impl FnOnce(&mut Ui) -> R,
) -> R {
    let visibility = if show_scroll_bar {
        ScrollBarVisibility::VisibleWhenNeeded
    } else {
        ScrollBarVisibility::AlwaysHidden
    };
    let mut area = ScrollArea::horizontal()
        .id_salt(id)
        .auto_shrink([false, true])
        .scroll_bar_visibility(visibility);
    if let Some(offset) = sync.take_pending(id) {
        area = area.horizontal_scroll_offset(offset);
    }
    let output = area.show(ui, add_contents);
    sync.report(id, output.state.offset.x);
    output.inner
}

fn empty_state(ui: &mut Ui, dropped: usize) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(icons::CALENDAR_BLANK)
                .size(32.0)
                .color(theme::TEXT_DIM),
        );
        ui.label(RichText::new("No scheduled tasks yet").strong());
        if dropped > 0 {
            ui.label(
                RichText::new(format!("{dropped} task(s) have missing or invalid dates"))
                    .color(theme::TEXT_SECONDARY),
            );
        } else {
            ui.label(
                RichText::new("Add a task with a start and end date to see it here.")
                    .color(theme::TEXT_SECONDARY),
            );
        }
    });
}

fn draw_header(ui: &mut Ui, model: &TimelineModel<'_>, today: NaiveDate) {
    let width = model.content_width();
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, theme::HEADER_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme::BG_HEADER);

    let mut previous = None;
    for (i, period) in model.periods.iter().enumerate() {
        let x = rect.left() + i as f32 * model.column_width;
        if period.is_weekend() {
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(x, rect.top() + 20.0),
                    Vec2::new(model.column_width, theme::HEADER_HEIGHT - 20.0),
                ),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        painter.line_segment(
            [Pos2::new(x, rect.top() + 20.0), Pos2::new(x, rect.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        if let Some(group) = period.group_label(previous) {
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(1.0, theme::BORDER_SUBTLE),
            );
            painter.text(
                Pos2::new(x + 4.0, rect.top() + 10.0),
                Align2::LEFT_CENTER,
                group,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        let color = if period.is_weekend() {
            theme::TEXT_DIM
        } else {
            theme::TEXT_SECONDARY
        };
        painter.text(
            Pos2::new(x + 4.0, rect.top() + 31.0),
            Align2::LEFT_CENTER,
            period.label(),
            theme::font_sub(),
            color,
        );
        previous = Some(period);
    }

    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    if let Some(x) = model.date_x(today) {
        let x = rect.left() + x;
        let badge = Rect::from_center_size(
            Pos2::new(x, rect.bottom() - 7.0),
            Vec2::new(40.0, 14.0),
        );
        painter.rect_filled(badge, Rounding::same(3.0), theme::TODAY_LINE);
        painter.text(
            badge.center(),
            Align2::CENTER_CENTER,
            "Today",
            theme::font_small(),
            Color32::WHITE,
        );
    }
}

/// Fixed left-hand cell of a row: completion toggle, title and actions.
fn row_label(ui: &mut Ui, task: &Task, mode: TimelineMode) -> Option<TimelineAction> {
    let mut action = None;
    ui.allocate_ui_with_layout(
        Vec2::new(theme::LABEL_WIDTH, theme::ROW_HEIGHT),
        Layout::left_to_right(Align::Center),
        |ui| {
            ui.set_width(theme::LABEL_WIDTH);
            match mode {
                TimelineMode::Editable => {
                    let mut completed = task.completed;
                    if ui.checkbox(&mut completed, "").changed() {
                        action = Some(TimelineAction::ToggleComplete(task.id.clone()));
                    }
                }
                TimelineMode::ReadOnly => {
                    let icon = if task.completed { icons::CHECK_SQUARE } else { icons::SQUARE };
                    ui.label(RichText::new(icon).color(theme::TEXT_SECONDARY));
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if mode == TimelineMode::Editable {
                    if ui
                        .small_button(icons::TRASH)
                        .on_hover_text("Delete task")
                        .clicked()
                    {
                        action = Some(TimelineAction::Delete(task.id.clone()));
                    }
                    if ui
                        .small_button(icons::PENCIL_SIMPLE)
                        .on_hover_text("Edit task")
                        .clicked()
                    {
                        action = Some(TimelineAction::Edit(task.id.clone()));
                    }
                }
                let mut title = RichText::new(&task.title);
                if task.completed {
                    title = title.strikethrough().color(theme::TEXT_DIM);
                }
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    ui.add(egui::Label::new(title).truncate());
                });
            });
        },
    );
    action
}

fn draw_row(
    ui: &mut Ui,
    model: &TimelineModel<'_>,
    row: &TaskLayout<'_>,
    mode: TimelineMode,
    index: usize,
    today: NaiveDate,
) -> Option<TimelineAction> {
    let width = model.content_width();
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, theme::ROW_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);

    let stripe = if index % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
    painter.rect_filled(rect, 0.0, stripe);
    for (i, period) in model.periods.iter().enumerate() {
        let x = rect.left() + i as f32 * model.column_width;
        if period.is_weekend() {
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(x, rect.top()),
                    Vec2::new(model.column_width, rect.height()),
                ),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );
    if let Some(x) = model.date_x(today) {
        let x = rect.left() + x;
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.5, theme::TODAY_LINE),
        );
    }

    let task = row.task;
    let geometry = model.bar_geometry(row);
    let bar_rect = Rect::from_min_size(
        Pos2::new(rect.left() + geometry.left, rect.top() + theme::BAR_INSET),
        Vec2::new(geometry.width, theme::ROW_HEIGHT - theme::BAR_INSET * 2.0),
    );
    let fill = if task.completed {
        theme::COMPLETED_BAR
    } else {
        theme::status_color(&task.effective_status())
    };
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, fill);

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(task.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.center().y - galley.size().y / 2.0;
        painter
            .with_clip_rect(bar_rect.intersect(rect))
            .galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    let sense = match mode {
        TimelineMode::Editable => Sense::click(),
        TimelineMode::ReadOnly => Sense::hover(),
    };
    let response = ui
        .interact(bar_rect, ui.id().with(("bar", task.id.as_str())), sense)
        .on_hover_ui(|ui| bar_tooltip(ui, task));

    if mode == TimelineMode::ReadOnly {
        return None;
    }
    if response.hovered() {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    let mut action = None;
    if response.double_clicked() {
        action = Some(TimelineAction::Edit(task.id.clone()));
    }
    response.context_menu(|ui| {
        if ui.button(format!("{} Edit", icons::PENCIL_SIMPLE)).clicked() {
            action = Some(TimelineAction::Edit(task.id.clone()));
            ui.close_menu();
        }
        let toggle = if task.completed { "Mark as not done" } else { "Mark as done" };
        if ui.button(format!("{} {toggle}", icons::CHECK_SQUARE)).clicked() {
            action = Some(TimelineAction::ToggleComplete(task.id.clone()));
            ui.close_menu();
        }
        ui.separator();
        if ui.button(format!("{} Delete", icons::TRASH)).clicked() {
            action = Some(TimelineAction::Delete(task.id.clone()));
            ui.close_menu();
        }
    });
    action
}

fn bar_tooltip(ui: &mut Ui, task: &Task) {
    ui.strong(task.title.as_str());
    if let Some((start, end)) = task.date_range() {
        ui.label(format!(
            "{} → {}",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        ));
    }
    ui.label(format!("Status: {}", task.effective_status()));
    if !task.description.is_empty() {
        ui.label(RichText::new(&task.description).color(theme::TEXT_SECONDARY));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_tasks;
    use crate::model::TimelineScale;

    fn tasks() -> Vec<Task> {
        let d = |day| NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
        vec![
            Task::new("p", "Plan", d(1), d(4)),
            Task::new("p", "Build", d(5), d(20)),
        ]
    }

    fn render(
        ctx: &egui::Context,
        model: &TimelineModel<'_>,
        sync: &mut ScrollSynchronizer,
        mode: TimelineMode,
    ) -> TimelineAction {
        let mut action = TimelineAction::None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = show_timeline(ui, model, sync, mode, "test");
            });
        });
        action
    }

    /// One frame with the editor in the central panel and the share preview
    /// in a window, the way the app lays them out.
    fn render_both(
        ctx: &egui::Context,
        model: &TimelineModel<'_>,
        editor: &mut ScrollSynchronizer,
        share: &mut ScrollSynchronizer,
    ) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                show_timeline(ui, model, editor, TimelineMode::Editable, "timeline");
            });
            egui::Window::new("Share preview")
                .fixed_pos([40.0, 40.0])
                .fixed_size([300.0, 200.0])
                .show(ctx, |ui| {
                    show_timeline(ui, model, share, TimelineMode::ReadOnly, "share");
                });
        });
    }

    #[test]
    fn rendering_registers_the_root_and_binds_every_row() {
        let ctx = egui::Context::default();
        let tasks = tasks();
        let model = layout_tasks(&tasks, TimelineScale::Daily, 100);
        let mut sync = ScrollSynchronizer::new();

        assert!(timeline_root_rect(&ctx, "test").is_none());
        let action = render(&ctx, &model, &mut sync, TimelineMode::ReadOnly);

        assert_eq!(action, TimelineAction::None);
        assert!(timeline_root_rect(&ctx, "test").is_some());
        assert_eq!(sync.bound_count(), model.rows.len() + 1);
    }

    #[test]
    fn empty_model_releases_surfaces() {
        let ctx = egui::Context::default();
        let tasks = tasks();
        let mut sync = ScrollSynchronizer::new();
        render(
            &ctx,
            &layout_tasks(&tasks, TimelineScale::Weekly, 100),
            &mut sync,
            TimelineMode::Editable,
        );
        assert!(sync.bound_count() > 0);

        render(&ctx, &layout_tasks(&[], TimelineScale::Weekly, 100), &mut sync, TimelineMode::Editable);
        assert_eq!(sync.bound_count(), 0);
    }

    #[test]
    fn editor_and_share_preview_keep_separate_roots() {
        let ctx = egui::Context::default();
        let tasks = tasks();
        let model = layout_tasks(&tasks, TimelineScale::Daily, 100);
        let (mut editor, mut share) = (ScrollSynchronizer::new(), ScrollSynchronizer::new());

        render_both(&ctx, &model, &mut editor, &mut share);

        let editor_rect = timeline_root_rect(&ctx, "timeline").unwrap();
        let share_rect = timeline_root_rect(&ctx, "share").unwrap();
        assert_ne!(editor_rect, share_rect);
        assert_ne!(timeline_root_id("timeline"), timeline_root_id("share"));
        assert!(timeline_root_rect(&ctx, "test").is_none());
    }
}
