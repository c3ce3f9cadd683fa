//! Bounded Channels and Union Wait
//!
//! This crate provides the two coordination primitives of the status hub:
//! a fixed-capacity FIFO channel with non-blocking, timeout-bounded, and
//! latest-value-wins send modes, and a channel set that lets a single
//! consumer suspend on the union of several channels without polling and
//! without starving any member.

mod channel;
mod error;
mod set;

pub use channel::BoundedChannel;
pub use error::{SendError, SetError};
pub use set::ChannelSet;
