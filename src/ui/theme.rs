//! Colors, metrics and fonts shared by every panel.

use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use crate::model::TaskStatus;

// Surfaces
pub const BG_DARK: Color32 = Color32::from_rgb(19, 22, 28);
pub const BG_PANEL: Color32 = Color32::from_rgb(27, 31, 38);
pub const BG_HEADER: Color32 = Color32::from_rgb(33, 38, 47);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 48);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(38, 140, 130, 50);
pub const BG_DROP_TARGET: Color32 = Color32::from_rgb(26, 44, 46);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(46, 52, 62);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(64, 180, 166);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 230, 236);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 158, 172);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 106, 120);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

pub const ACCENT: Color32 = Color32::from_rgb(52, 168, 155);
pub const TODAY_LINE: Color32 = Color32::from_rgb(236, 96, 80);
pub const GRID_LINE: Color32 = Color32::from_rgb(40, 45, 54);
pub const COMPLETED_BAR: Color32 = Color32::from_rgb(72, 104, 86);

// Metrics
pub const ROW_HEIGHT: f32 = 32.0;
pub const HEADER_HEIGHT: f32 = 46.0;
pub const LABEL_WIDTH: f32 = 220.0;
pub const BAR_ROUNDING: f32 = 4.0;
/// Gap between a bar and the top and bottom of its row.
pub const BAR_INSET: f32 = 5.0;
pub const KANBAN_COLUMN_WIDTH: f32 = 240.0;

pub fn font_header() -> FontId {
    FontId::proportional(12.5)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.0)
}

pub fn font_small() -> FontId {
    FontId::monospace(9.0)
}

/// Colors handed out to user-defined statuses, picked by a hash of the key.
const CUSTOM_STATUS_COLORS: [Color32; 4] = [
    Color32::from_rgb(156, 100, 210),
    Color32::from_rgb(40, 170, 200),
    Color32::from_rgb(214, 170, 50),
    Color32::from_rgb(200, 110, 160),
];

pub fn status_color(status: &TaskStatus) -> Color32 {
    match status {
        TaskStatus::Todo => Color32::from_rgb(84, 130, 210),
        TaskStatus::InProgress => Color32::from_rgb(226, 146, 46),
        TaskStatus::Pending => Color32::from_rgb(128, 134, 150),
        TaskStatus::Blocked => Color32::from_rgb(210, 70, 70),
        TaskStatus::Done => Color32::from_rgb(70, 160, 100),
        TaskStatus::Custom(key) => {
            let hash = key.bytes().fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
            CUSTOM_STATUS_COLORS[hash % CUSTOM_STATUS_COLORS.len()]
        }
    }
}

/// Install the dark board visuals on `ctx`.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_HEADER;
    visuals.extreme_bg_color = BG_DARK;
    visuals.faint_bg_color = BG_HEADER;
    visuals.hyperlink_color = ACCENT;

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    widgets.inactive.weak_bg_fill = Color32::from_rgb(38, 43, 53);
    widgets.hovered.weak_bg_fill = Color32::from_rgb(46, 53, 64);
    widgets.hovered.bg_stroke = Stroke::new(1.0, BORDER_ACCENT);
    widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    for state in [
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        state.rounding = Rounding::same(3.0);
    }

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, BORDER_ACCENT);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(6.0, 5.0);
        style.spacing.button_padding = egui::vec2(7.0, 3.0);
    });
}
