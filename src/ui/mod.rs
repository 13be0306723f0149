mod handlers;
mod progress;
mod render;

pub use progress::TerminalYielder;
pub use render::{PreviewTerminal, run_app};
