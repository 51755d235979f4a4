pub mod config;
pub mod error;
pub mod execute;
pub mod extract;
pub mod index;
pub mod io;
pub mod paths;
pub mod plan;
pub mod range;
pub mod reconcile;
pub mod store;
pub mod types;

pub use error::{AttendantError, Result};
