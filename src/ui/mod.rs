//! Front ends: the terminal dashboard and the headless logger

mod app;
pub mod dashboard;
mod headless;
pub mod theme;
mod widgets;

pub use app::{App, AppState};
pub use headless::{summary_lines, HeadlessLogger};
pub use theme::ThemeColors;
pub use widgets::*;
