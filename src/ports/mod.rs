//! Port traits defining external boundaries.
//!
//! Each trait is a seam between the task pipeline and something outside it
//! (time, id allocation, the prioritization service). Implementations live
//! in `src/adapters/`.

pub mod clock;
pub mod id_gen;
pub mod prioritizer;

pub use clock::Clock;
pub use id_gen::IdGenerator;
pub use prioritizer::{Prioritizer, PrioritizerFuture, RankedItem, Ranking, Suggestion};
