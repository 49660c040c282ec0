//! Module for background services.
//!
//! This module encapsulates long-running tasks that run beside the HTTP
//! server, such as keeping the trusted signing keys current.

pub mod key_refresher;
