//! Performance counters reported by a CoreMark run and their extraction from
//! the run log.

mod extract;
mod record;

pub use extract::{extract, matches};
pub use record::{Field, FixedPoint, MetricValue, MetricsRecord, ParseFixedPointError};
