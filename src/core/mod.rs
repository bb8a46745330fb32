//! # Core Packet Components
//!
//! Low-level packet representation, header layout and framing codec.
//!
//! ## Components
//! - **Command**: Closed enumeration of command ids
//! - **Header**: Fixed 4-byte header with the legacy size adjustment
//! - **Packet**: Growable body with append and sequential read cursors
//! - **Codec**: Tokio codec for framing over async byte streams
//!
//! ## Wire Format
//! ```text
//! [Size(2)] [Command(2)] [Body(Size - 2)]
//! ```
//!
//! Both header fields are big-endian. The size field counts the command id as
//! part of the body for compatibility with older peers.

pub mod codec;
pub mod command;
pub mod header;
pub mod packet;
