pub mod config;
pub mod storage;
pub mod todo;
pub mod utils;
