pub mod editor;
pub mod engine;
pub mod repository;
pub mod session;
pub mod traits;
