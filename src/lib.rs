pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod render;
pub mod sanitize;
pub mod scanner;
