pub mod dialogs;
pub mod kanban_board;
pub mod sidebar;
pub mod theme;
pub mod timeline_view;
pub mod toolbar;
