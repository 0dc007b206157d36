//! Infrastructure modules

pub mod config;
pub mod email;
pub mod http;
