//! Database schema and queries

pub mod init;
pub mod store;

pub use init::*;
pub use store::*;
