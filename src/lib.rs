pub mod config;
pub mod csh;
pub mod error;
pub mod links;
pub mod tooltips;
pub mod xml;

pub use config::CshConfig;
pub use csh::{build_csh, write_csh, CshEntry, CshMap};
pub use error::CshError;

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
