mod app;
mod dispatch;
mod event_handler;
mod input_handler;
mod state;
mod theme;
mod ui;
mod widgets;

pub use app::TuiApp;
