// Library surface for headless/integration tests and reuse.
// Terminal setup and the CLI stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod duration;
pub mod format;
pub mod logging;
pub mod notify;
pub mod runtime;
pub mod schedule;
pub mod stopwatch;
pub mod timer;
pub mod ui;

pub use app::{App, Tab};
pub use duration::{format_preset, parse_duration};
