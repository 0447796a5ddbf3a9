//! Tracing initialization
//!
//! Text output for local runs, JSON output for log collectors.

mod init_basic;

pub use init_basic::{default_filter, init_telemetry};
