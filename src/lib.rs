pub mod config;
pub mod di;
pub mod entity;
pub mod evm;
pub mod interactor;

// Re-export commonly used items
pub use crate::config::{AppConfig, SwapContext};
pub use di::*;
pub use entity::*;
pub use interactor::*;

/// Crate version, reported at startup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
