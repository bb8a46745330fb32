//! # Connection Management
//!
//! Stateful layer on top of the packet format.
//!
//! ## Components
//! - **Connection**: Inbound reassembly, outbound sending, auth gate, liveness
//! - **Queue**: Outbound FIFO with in-flight-safe priority inserts
//! - **Stats**: Per-group sent/received byte counters
//! - **Disconnect**: Bounded disconnect reasons and the formatter contract

pub mod connection;
pub mod disconnect;
pub mod queue;
pub mod stats;
