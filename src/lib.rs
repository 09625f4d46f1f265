pub mod cache;
pub mod classify;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod model;
pub mod playback;
pub mod render;
pub mod schedule;
pub mod selector;
pub mod state;
