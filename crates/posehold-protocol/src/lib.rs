pub mod config;
pub mod fingerprint;
pub mod frame;
pub mod landmarks;
