use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::filter::{DateFilter, FilterCriteria, PitchFilter, StyleSelection};
use crate::data::grades::{GradeScale, GradeTable};
use crate::data::loader::{IngestOptions, DEFAULT_ROUTE_ID_COLUMN};
use crate::data::model::{LeadStyle, RouteType};
use crate::data::pyramid::AggregationMode;

pub const PRESET_ENV: &str = "ROUTE_PYRAMID_PRESET";
pub const CONFIG_ENV: &str = "ROUTE_PYRAMID_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {path}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown preset '{0}' (expected date-range, year-set, minimal or legacy)")]
    UnknownPreset(String),
}

// ---------------------------------------------------------------------------
// View configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilterMode {
    None,
    #[default]
    Range,
    Years,
}

/// Initial widget selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSelections {
    pub route_types: Vec<RouteType>,
    pub styles: Vec<LeadStyle>,
    pub include_unknown_style: bool,
    pub include_multipitch: bool,
    pub max_rating: u32,
}

impl Default for DefaultSelections {
    fn default() -> Self {
        DefaultSelections {
            route_types: vec![RouteType::Sport],
            styles: vec![LeadStyle::Onsight, LeadStyle::Flash, LeadStyle::Redpoint],
            include_unknown_style: false,
            include_multipitch: true,
            max_rating: 8500,
        }
    }
}

/// Earliest and latest dates the date pickers offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateBounds {
    pub earliest: NaiveDate,
    /// `None` means today.
    pub latest: Option<NaiveDate>,
}

impl Default for DateBounds {
    fn default() -> Self {
        DateBounds {
            earliest: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default(),
            latest: None,
        }
    }
}

impl DateBounds {
    pub fn latest_or_today(&self) -> NaiveDate {
        self.latest.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Which filters a view offers and how the pyramid is binned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub date_filter: DateFilterMode,
    pub max_grade_selector: bool,
    pub grade_scale: GradeScale,
    pub route_id_column: String,
    pub aggregation: AggregationMode,
    pub defaults: DefaultSelections,
    pub date_bounds: DateBounds,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig::preset(Preset::DateRange)
    }
}

/// The dashboard layouts the viewer reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    DateRange,
    YearSet,
    Minimal,
    Legacy,
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date-range" => Ok(Preset::DateRange),
            "year-set" => Ok(Preset::YearSet),
            "minimal" => Ok(Preset::Minimal),
            "legacy" => Ok(Preset::Legacy),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

impl ViewConfig {
    pub fn preset(preset: Preset) -> Self {
        let (date_filter, max_grade_selector, grade_scale) = match preset {
            Preset::DateRange => (DateFilterMode::Range, true, GradeScale::Standard),
            Preset::YearSet => (DateFilterMode::Years, true, GradeScale::Standard),
            Preset::Minimal => (DateFilterMode::None, false, GradeScale::Standard),
            Preset::Legacy => (DateFilterMode::None, false, GradeScale::Legacy),
        };
        ViewConfig {
            date_filter,
            max_grade_selector,
            grade_scale,
            route_id_column: DEFAULT_ROUTE_ID_COLUMN.to_string(),
            aggregation: AggregationMode::Lenient,
            defaults: DefaultSelections::default(),
            date_bounds: DateBounds::default(),
        }
    }

    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: origin.clone(),
            source,
        })?;
        Self::from_json_str(&text, &origin)
    }

    /// Resolve the configuration from the environment.
    ///
    /// `ROUTE_PYRAMID_CONFIG` (a JSON file) wins over `ROUTE_PYRAMID_PRESET`.
    /// Problems are logged and the default layout is used instead.
    pub fn from_env() -> Self {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            match Self::from_json_file(Path::new(&path)) {
                Ok(config) => {
                    log::info!("Using view config from {}", Path::new(&path).display());
                    return config;
                }
                Err(e) => log::error!("{:#}", anyhow::Error::new(e)),
            }
        }
        if let Ok(name) = std::env::var(PRESET_ENV) {
            match name.parse::<Preset>() {
                Ok(preset) => return Self::preset(preset),
                Err(e) => log::error!("{e}"),
            }
        }
        Self::default()
    }

    pub fn grade_table(&self) -> GradeTable {
        self.grade_scale.table()
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            route_id_column: self.route_id_column.clone(),
            require_date: self.date_filter != DateFilterMode::None,
        }
    }

    /// Criteria matching the initial widget state.
    ///
    /// `years` seeds the year selector with every year present in the log.
    pub fn initial_criteria(&self, years: &BTreeSet<i32>) -> FilterCriteria {
        let d = &self.defaults;
        let dates = match self.date_filter {
            DateFilterMode::None => DateFilter::None,
            DateFilterMode::Range => DateFilter::Range {
                start: None,
                end: Some(self.date_bounds.latest_or_today()),
            },
            DateFilterMode::Years => DateFilter::Years(years.clone()),
        };
        let max_rating = self
            .max_grade_selector
            .then(|| self.snap_max_rating(d.max_rating));

        FilterCriteria {
            route_types: d.route_types.iter().copied().collect(),
            styles: StyleSelection::new(d.styles.iter().copied(), d.include_unknown_style),
            dates,
            max_rating,
            pitches: PitchFilter::from_include_multipitch(d.include_multipitch),
        }
    }

    /// Largest band cutoff not above `rating`, so the selector always shows
    /// a real band. Falls back to the easiest band.
    fn snap_max_rating(&self, rating: u32) -> u32 {
        let table = self.grade_table();
        table
            .active_bands(Some(rating))
            .last()
            .or_else(|| table.bands().first())
            .map(|b| b.cutoff)
            .unwrap_or(rating)
    }
}
