//! Core data models: upstream payloads, the loaded snapshot, and derived results.

mod battle;
mod clan;
mod placement;
mod report;
mod snapshot;
mod stats;
mod tag;
mod war;

pub use battle::*;
pub use clan::*;
pub use placement::*;
pub use report::*;
pub use snapshot::*;
pub use stats::*;
pub use tag::*;
pub use war::*;
