pub mod answers_file;
pub mod app;
pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod session;
