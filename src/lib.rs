pub mod errors;
pub mod ingest;

pub mod config;

#[cfg(feature = "server")]
pub mod common;
#[cfg(feature = "server")]
pub mod database;
#[cfg(feature = "server")]
pub mod export;
#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
pub mod services;
