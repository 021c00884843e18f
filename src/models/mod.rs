pub mod credential;
pub mod pool_config;
