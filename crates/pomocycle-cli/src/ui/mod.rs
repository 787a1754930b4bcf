pub mod app;
pub mod render;
pub mod terminal;

pub use app::{App, Intent};
pub use terminal::TerminalGuard;
