pub mod config;
pub mod engine;
pub mod window;

pub use config::{PlaybackClock, PlaybackConfig};
pub use engine::{PlaybackEngine, PlaybackState};
pub use window::VisibleWindow;
