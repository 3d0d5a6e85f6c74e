pub mod app;
pub mod config;
pub mod conversion;
pub mod domain;
pub mod error;
pub mod input;
pub mod platform;
pub mod state;
pub mod utils;

pub use app::App;
pub use error::{Error, Result};
