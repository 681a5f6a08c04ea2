pub mod cli;
pub mod config;
pub mod credentials;
pub mod datasource;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod picker;
pub mod report;
