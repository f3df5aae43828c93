//! devserve
//!
//! A static file server for local front-end development. Every response it
//! sends carries headers that forbid browsers and proxies from caching it, so
//! edited files are always refetched.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use handler::{Handler, NoCache, StaticFiles};
pub use server::Server;
