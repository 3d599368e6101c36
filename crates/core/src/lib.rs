pub mod config;
pub mod error;
pub mod field;
pub mod page;
pub mod web;

pub use config::Config;
pub use error::*;
pub use field::*;
pub use page::*;
