//! Domain modules

pub mod email;
