pub mod config_store;
pub mod defaults;
pub mod files;
pub mod host_file;
pub mod preset_store;
