//! Duration ranges and filters over average function durations.
//!
//! Both the observed range offered to the user and the per-direction color
//! scale of the graph derive from `positive_bounds`.

use super::call_graph::{aggregate_chains, CallAggregate, ChainSelection};
use crate::parser::ChainData;
use crate::utils::config::DEFAULT_DURATION_RANGE;
use serde::{Deserialize, Serialize};

/// Min and max of the strictly positive values
///
/// Functions that never returned have an average of 0 and are left out.
/// Returns `None` when no positive value exists.
pub fn positive_bounds<I>(averages: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    averages
        .into_iter()
        .filter(|avg| *avg > 0.0)
        .fold(None, |bounds, avg| match bounds {
            None => Some((avg, avg)),
            Some((min, max)) => Some((min.min(avg), max.max(avg))),
        })
}

/// Range of average durations seen in the data, in whole microseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_micros: f64,
    pub max_micros: f64,
}

impl Default for DurationRange {
    fn default() -> Self {
        Self {
            min_micros: DEFAULT_DURATION_RANGE.0,
            max_micros: DEFAULT_DURATION_RANGE.1,
        }
    }
}

impl DurationRange {
    /// Observed range over every chain of both directions
    pub fn observed(data: &ChainData) -> Self {
        Self::from_aggregate(&aggregate_chains(data, ChainSelection::All))
    }

    /// `[floor(min), ceil(max)]` of the positive averages, or the default range
    pub fn from_aggregate(aggregate: &CallAggregate) -> Self {
        match positive_bounds(aggregate.stats.values().map(|stat| stat.avg_duration())) {
            Some((min, max)) => Self {
                min_micros: min.floor(),
                max_micros: max.ceil(),
            },
            None => Self::default(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min_micros == self.max_micros
    }
}

/// Inclusive filter on a function's average duration (microseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationFilter {
    pub min_micros: f64,
    pub max_micros: f64,
}

impl Default for DurationFilter {
    fn default() -> Self {
        Self {
            min_micros: DEFAULT_DURATION_RANGE.0,
            max_micros: DEFAULT_DURATION_RANGE.1,
        }
    }
}

impl DurationFilter {
    pub fn new(min_micros: f64, max_micros: f64) -> Self {
        Self {
            min_micros,
            max_micros,
        }
    }

    /// Filter covering an observed range
    ///
    /// A degenerate range would hide everything but a single value, so the
    /// default filter is used instead.
    pub fn from_range(range: DurationRange) -> Self {
        if range.is_degenerate() {
            Self::default()
        } else {
            Self::new(range.min_micros, range.max_micros)
        }
    }

    pub fn contains(&self, avg_duration: f64) -> bool {
        avg_duration >= self.min_micros && avg_duration <= self.max_micros
    }
}
