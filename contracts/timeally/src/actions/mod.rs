pub mod batch;
pub mod distribution;
pub mod loan;
pub mod stake;

pub use distribution::{DistributionCursor, DistributionPhase, DistributionProgress, SkippedCredit};
