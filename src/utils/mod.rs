//! # Utility Modules
//!
//! Supporting utilities for logging, metrics and timing.
//!
//! ## Components
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Process-wide atomic counters
//! - **Time**: Monotonic tick sources for liveness checks

pub mod logging;
pub mod metrics;
pub mod time;
