pub mod access_log;
pub mod client_ip;
pub mod types;

pub use client_ip::*;
pub use types::*;
