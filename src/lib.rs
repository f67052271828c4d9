#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(
    clippy::nursery,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod sync;
pub mod trackman;
pub mod util;

pub use trackman::aggregate::{aggregate, aggregate_file, Aggregation, PlayerAggregate, Role};
pub use trackman::record::PitchRecord;
