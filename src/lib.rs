pub mod args;
mod backup;
pub mod commands;
mod config;
mod db;
pub mod engine;
mod error;
pub mod model;
pub mod report;
pub mod store;
mod utils;

pub use config::Config;
pub use error::Error;
pub use error::ErrorType;
pub use error::Result;
