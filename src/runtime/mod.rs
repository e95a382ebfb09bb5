pub mod cache;
pub mod fetcher;
pub mod logging;
pub mod orchestrator;
pub mod types;
