//! Grade bands: rating-code cutoffs and their YDS labels.
//!
//! Both tables are ascending by cutoff. A rating code belongs to the first
//! band whose cutoff is greater than or equal to it.

use serde::{Deserialize, Serialize};

/// A named difficulty tier with an inclusive upper bound on rating code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeBand {
    pub cutoff: u32,
    pub label: &'static str,
}

const fn band(cutoff: u32, label: &'static str) -> GradeBand {
    GradeBand { cutoff, label }
}

/// Current table, up to 5.13d.
static STANDARD_BANDS: [GradeBand; 20] = [
    band(1700, "5.easy"),
    band(1900, "5.7"),
    band(2200, "5.8"),
    band(2500, "5.9"),
    band(2800, "5.10a"),
    band(3100, "5.10b"),
    band(3400, "5.10c"),
    band(4500, "5.10d"),
    band(4800, "5.11a"),
    band(5100, "5.11b"),
    band(5400, "5.11c"),
    band(6500, "5.11d"),
    band(6800, "5.12a"),
    band(7100, "5.12b"),
    band(7400, "5.12c"),
    band(8500, "5.12d"),
    band(8800, "5.13a"),
    band(9100, "5.13b"),
    band(9400, "5.13c"),
    band(10400, "5.13d"),
];

/// First-generation table, up to 5.12d, with narrower 5.10d and 5.12d bands.
static LEGACY_BANDS: [GradeBand; 16] = [
    band(1700, "5.easy"),
    band(1900, "5.7"),
    band(2200, "5.8"),
    band(2500, "5.9"),
    band(2800, "5.10a"),
    band(3100, "5.10b"),
    band(3400, "5.10c"),
    band(3700, "5.10d"),
    band(4800, "5.11a"),
    band(5100, "5.11b"),
    band(5400, "5.11c"),
    band(5500, "5.11d"),
    band(6800, "5.12a"),
    band(7100, "5.12b"),
    band(7400, "5.12c"),
    band(7500, "5.12d"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeScale {
    #[default]
    Standard,
    Legacy,
}

impl GradeScale {
    pub fn table(self) -> GradeTable {
        match self {
            GradeScale::Standard => GradeTable::new(&STANDARD_BANDS),
            GradeScale::Legacy => GradeTable::new(&LEGACY_BANDS),
        }
    }
}

/// An ordered, immutable view over one of the static band tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeTable {
    bands: &'static [GradeBand],
}

impl GradeTable {
    const fn new(bands: &'static [GradeBand]) -> Self {
        GradeTable { bands }
    }

    pub fn bands(&self) -> &'static [GradeBand] {
        self.bands
    }

    /// Cutoff of the hardest band.
    pub fn max_cutoff(&self) -> u32 {
        self.bands.last().map(|b| b.cutoff).unwrap_or(0)
    }

    /// Bands whose cutoff is at most `max_rating`, or all of them when no
    /// maximum is selected. Always a prefix of the table.
    pub fn active_bands(&self, max_rating: Option<u32>) -> &'static [GradeBand] {
        match max_rating {
            Some(max) => {
                let end = self.bands.partition_point(|b| b.cutoff <= max);
                &self.bands[..end]
            }
            None => self.bands,
        }
    }

    /// The band with exactly this cutoff, used by the max-grade selector.
    pub fn band_with_cutoff(&self, cutoff: u32) -> Option<&'static GradeBand> {
        self.bands.iter().find(|b| b.cutoff == cutoff)
    }
}

/// Index of the first band in `bands` whose cutoff is ≥ `rating`.
pub fn band_index(bands: &[GradeBand], rating: u32) -> Option<usize> {
    let idx = bands.partition_point(|b| b.cutoff < rating);
    (idx < bands.len()).then_some(idx)
}
