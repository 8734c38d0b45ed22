pub mod config;
pub mod errors;
pub mod gates;
pub mod github;
pub mod logging;
pub mod ui;
pub mod workflow;
