pub mod config;
pub mod error;
pub mod filter;
pub mod services;
pub mod types;

pub use config::*;
pub use error::*;
pub use filter::*;
pub use services::*;
pub use types::*;
