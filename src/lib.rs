pub mod config;
pub mod core;
pub mod script;
pub mod user_config;
