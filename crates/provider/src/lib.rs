pub mod config;
pub mod data_sources;
pub mod isard;
pub mod poller;
pub mod resources;
pub mod state;
