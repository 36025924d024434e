pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod executors;
pub mod parser;
pub mod reporters;
pub mod ui;
pub mod utils;
