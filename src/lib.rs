pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod state;
pub mod students;
