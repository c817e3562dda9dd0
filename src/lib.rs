//! rangewatch: IPv4 Range Reachability Monitor
//!
//! A library for periodically probing every host of configured IPv4
//! ranges with a waterfall of reachability checks and tracking a rolling
//! quality signal per host.

pub mod config;
pub mod host;
pub mod monitor;
pub mod probe;
pub mod time;
