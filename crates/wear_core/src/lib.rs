//! `wear_core`: durability estimation engine.
//!
//! No IO, no network. All randomness via the passed-in Rng.
//!
//! Four estimators share one durability-loss process:
//! - [`precise_interval`] / [`simulate_interval`]: how many uses a tool survives
//!   at a given confidence level.
//! - [`precise_probability`] / [`simulate_probability`]: how likely a tool is to
//!   survive a fixed number of uses.

mod error;
mod histogram;
mod interval;
mod normal;
mod probability;
mod process;
mod series;
mod types;

pub mod serde_float;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use error::EstimateError;
pub use histogram::OutcomeHistogram;
pub use interval::{
    interval_from_histogram, precise_interval, sample_uses_to_break, simulate_interval,
    trial_cap, UsesSample,
};
pub use probability::{
    precise_probability, probability_from_histogram, sample_durability_lost,
    simulate_probability,
};
pub use process::{reduce_probability, DurabilityLossProcess, ProcessParameters};
pub use series::{DisplaySeries, Marker, MarkerKind, PointClass, SeriesKind, SeriesRow};
pub use types::*;
