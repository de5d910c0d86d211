use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::AggregationError;
use super::filter::{filter_ticks, FilterCriteria};
use super::grades::{band_index, GradeBand, GradeTable};
use super::model::{Tick, TickLog};

pub const USER_TITLE: &str = "User's Route Pyramid";
pub const DEMO_TITLE: &str = "(Demo Data) Route Pyramid";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Distinct routes climbed within one grade band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidRow {
    pub grade: String,
    pub routes: usize,
}

impl PyramidRow {
    pub fn new(grade: impl Into<String>, routes: usize) -> Self {
        PyramidRow {
            grade: grade.into(),
            routes,
        }
    }
}

/// A titled pyramid, hardest band first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pyramid {
    pub title: String,
    pub rows: Vec<PyramidRow>,
    /// Ticks that passed the filters (0 for the demo).
    #[serde(skip)]
    pub matching: usize,
}

impl Pyramid {
    /// Total of all band counts.
    pub fn total_routes(&self) -> usize {
        self.rows.iter().map(|r| r.routes).sum()
    }

    pub fn max_count(&self) -> usize {
        self.rows.iter().map(|r| r.routes).max().unwrap_or(0)
    }

    /// Fixed placeholder shown before a log is loaded.
    pub fn demo() -> Self {
        const GRADES: [&str; 16] = [
            "5.12d", "5.12c", "5.12b", "5.12a", "5.11d", "5.11c", "5.11b", "5.11a", "5.10d",
            "5.10c", "5.10b", "5.10a", "5.9", "5.8", "5.7", "5.easy",
        ];
        const ROUTES: [usize; 16] = [1, 0, 1, 0, 2, 3, 5, 8, 16, 32, 64, 80, 70, 90, 100, 120];

        Pyramid {
            title: DEMO_TITLE.to_string(),
            rows: GRADES
                .iter()
                .zip(ROUTES)
                .map(|(grade, routes)| PyramidRow::new(*grade, routes))
                .collect(),
            matching: 0,
        }
    }
}

/// What to do with a tick harder than every active band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Leave it out of the pyramid.
    #[default]
    Lenient,
    /// Fail the computation.
    Strict,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Count distinct routes per band.
///
/// Each tick goes to the first band whose cutoff is at least its rating
/// code. Every band in `bands` appears in the result, empty ones with a
/// count of zero, ordered hardest first.
pub fn aggregate(
    ticks: &[&Tick],
    bands: &[GradeBand],
    mode: AggregationMode,
) -> Result<Vec<PyramidRow>, AggregationError> {
    let mut routes_per_band: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); bands.len()];
    let mut unbanded = 0usize;

    for tick in ticks {
        match band_index(bands, tick.rating_code) {
            Some(idx) => {
                routes_per_band[idx].insert(tick.route_id.as_str());
            }
            None => match mode {
                AggregationMode::Strict => {
                    return Err(match bands.last() {
                        Some(hardest) => AggregationError::Unbanded {
                            route: tick.display_name().to_string(),
                            rating: tick.rating_code,
                            cutoff: hardest.cutoff,
                        },
                        None => AggregationError::NoBands,
                    });
                }
                AggregationMode::Lenient => unbanded += 1,
            },
        }
    }

    if unbanded > 0 {
        log::warn!("{unbanded} ticks are harder than every active grade band and were left out");
    }

    Ok(bands
        .iter()
        .zip(routes_per_band)
        .rev()
        .map(|(band, routes)| PyramidRow::new(band.label, routes.len()))
        .collect())
}

/// Filter a loaded log and aggregate the survivors over the active bands.
pub fn build_pyramid(
    log: &TickLog,
    criteria: &FilterCriteria,
    table: GradeTable,
    mode: AggregationMode,
) -> Result<Pyramid, AggregationError> {
    let ticks = filter_ticks(&log.ticks, criteria);
    let bands = table.active_bands(criteria.max_rating);
    let rows = aggregate(&ticks, bands, mode)?;

    log::debug!(
        "{} of {} ticks matched, {} bands",
        ticks.len(),
        log.len(),
        rows.len()
    );

    Ok(Pyramid {
        title: USER_TITLE.to_string(),
        rows,
        matching: ticks.len(),
    })
}
