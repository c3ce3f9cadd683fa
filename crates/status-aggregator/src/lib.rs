//! Status Aggregation
//!
//! The aggregator is the sole consumer of every status channel: it
//! suspends on the channel set until any member has data, then drains all
//! currently-ready channels in one pass under the shared-status lock.
//! Numeric samples update the car status record; everything else goes to
//! the render collaborator.

mod aggregator;
mod render;

pub use aggregator::{Aggregator, AggregatorConfig};
pub use render::{LogRenderer, RecordingRenderer, StatusRenderer};
