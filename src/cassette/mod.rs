//! Cassettes: recorded port interactions for offline replay.
//!
//! A cassette captures every prioritization-service call (and the clock
//! readings that local ids come from) of one run, so the same run can be
//! replayed later without a live service.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
