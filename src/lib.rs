pub mod aggregate;
pub mod config;
pub mod controller;
pub mod export;
pub mod fields;
pub mod http_client;
pub mod loader;
pub mod logging;
pub mod raw_table;
pub mod records;
pub mod scenes;
pub mod session;
pub mod state;
pub mod surface;
