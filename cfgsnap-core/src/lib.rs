pub mod config;
pub mod custom;
pub mod keybind;
pub mod matcher;
pub mod naming;
pub mod preset;
pub mod sharing;
pub mod types;

// Keep the public surface small and intentional.
pub use config::*;
pub use custom::*;
pub use keybind::*;
pub use matcher::*;
pub use preset::*;
pub use sharing::*;
pub use types::*;
