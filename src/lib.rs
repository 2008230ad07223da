pub mod api;
pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod format;
pub mod middleware;
pub mod models;
pub mod render;
pub mod services;
