pub mod config;
pub mod conversation;
pub mod disk;
pub mod drive;
pub mod error;
pub mod io;
pub mod name;
pub mod registration;
pub mod retry;
pub mod sheet;
pub mod store;
pub mod types;
pub mod upload;

pub use error::{Result, ShiftError};
