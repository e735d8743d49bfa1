pub mod api;
pub mod cache;
pub mod config;
pub mod ddns;
pub mod error;
pub mod ip;

pub use error::{Error, Result};
