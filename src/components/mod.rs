pub mod app;
pub mod board_view;
pub mod objective_panel;
pub mod result_overlay;
pub mod score_panel;
pub mod status_panel;
