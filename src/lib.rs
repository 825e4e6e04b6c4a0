pub mod cli;
pub mod compress;
pub mod config;
pub mod error;
pub mod geo;
pub mod host;
pub mod navigation;
pub mod notify;
pub mod scanner;
pub mod session;
