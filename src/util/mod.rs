pub mod curl;
pub mod privilege;
pub mod toolforge;
