pub mod config;
pub mod logging;

pub mod client;
pub mod exchange;
pub mod har;
pub mod host_scope;
pub mod logical_path;
pub mod signed_urls;
pub mod transport;
