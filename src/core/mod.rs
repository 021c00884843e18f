pub mod aggregator;
pub mod file_lock;
pub mod paths;
pub mod run_log;
pub mod store;
