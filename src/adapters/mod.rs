//! Adapter implementations for port traits.
//!
//! - `live`: real clock, clock-derived ids and the HTTP service client.
//! - `recording`: wrappers that capture interactions to a cassette.
//! - `replaying`: serve a cassette back without touching the network.

pub mod live;
pub mod recording;
pub mod replaying;
