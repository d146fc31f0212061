pub mod adapter;
pub mod bundle;
pub mod client;
pub mod config;
pub mod error;
pub mod hardware;
pub mod manager;
pub mod spi;
pub mod telemetry;
pub mod transport;
