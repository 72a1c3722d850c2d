pub mod input_area;
pub mod mode_bar;
pub mod output_panel;
pub mod status_bar;
