use std::sync::Arc;

pub mod actor;
pub mod config;
pub mod node;
pub mod registry;
mod utils;

pub type AppConfig = Arc<config::Config>;
