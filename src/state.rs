use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::ViewConfig;
use crate::data::filter::{DateFilter, FilterCriteria, PitchFilter};
use crate::data::grades::GradeTable;
use crate::data::loader::{ingest_bytes, load_file};
use crate::data::model::{LeadStyle, RouteType, TickLog};
use crate::data::pyramid::{build_pyramid, Pyramid};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewConfig,

    /// Band table selected by the config.
    pub table: GradeTable,

    /// Parsed tick log (None until the user loads a file).
    pub log: Option<TickLog>,

    /// Where the current log came from.
    pub source: Option<PathBuf>,

    /// Current widget selections.
    pub criteria: FilterCriteria,

    /// Pyramid for the current log and criteria (cached).
    pub pyramid: Pyramid,

    /// Ticks passing the current filters.
    pub matching: usize,

    /// Status / error message from the last load or export.
    pub status_message: Option<String>,

    /// Why the current criteria could not be aggregated, if they could not.
    pub pyramid_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewConfig) -> Self {
        let criteria = config.initial_criteria(&Default::default());
        Self {
            table: config.grade_table(),
            config,
            log: None,
            source: None,
            criteria,
            pyramid: Pyramid::demo(),
            matching: 0,
            status_message: None,
            pyramid_error: None,
        }
    }

    pub fn has_log(&self) -> bool {
        self.log.is_some()
    }

    /// Ingest a newly loaded log. Widget selections carry over; only the
    /// year checklist is re-seeded with the new log's years.
    pub fn set_log(&mut self, log: TickLog, source: Option<PathBuf>) {
        if let DateFilter::Years(years) = &mut self.criteria.dates {
            *years = log.years.clone();
        }
        self.status_message = (!log.rejected.is_empty())
            .then(|| format!("{} row(s) skipped", log.rejected.len()));
        self.log = Some(log);
        self.source = source;
        self.recompute();
    }

    /// Load a tick log from disk. On failure the demo pyramid is shown.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path, &self.config.ingest_options()) {
            Ok(log) => {
                log::info!(
                    "Loaded {} ticks ({} routes) from {}",
                    log.len(),
                    log.distinct_routes(),
                    path.display()
                );
                self.set_log(log, Some(path.to_path_buf()));
            }
            Err(e) => self.fail_load(format!("{e:#}")),
        }
    }

    /// Load a tick log from raw bytes, e.g. a dropped file.
    pub fn load_bytes(&mut self, bytes: &[u8], name: &str) {
        match ingest_bytes(bytes, &self.config.ingest_options()) {
            Ok(log) => {
                log::info!("Loaded {} ticks from {name}", log.len());
                self.set_log(log, Some(PathBuf::from(name)));
            }
            Err(e) => self.fail_load(format!("loading ticks from {name}: {e}")),
        }
    }

    fn fail_load(&mut self, message: String) {
        log::error!("Failed to load tick log: {message}");
        self.clear();
        self.status_message = Some(format!("Error: {message}"));
    }

    /// Drop the loaded log and go back to the demo pyramid.
    pub fn clear(&mut self) {
        self.log = None;
        self.source = None;
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild the pyramid after a criteria change.
    pub fn recompute(&mut self) {
        let Some(log) = &self.log else {
            self.pyramid = Pyramid::demo();
            self.matching = 0;
            self.pyramid_error = None;
            return;
        };

        match build_pyramid(log, &self.criteria, self.table, self.config.aggregation) {
            Ok(pyramid) => {
                self.pyramid_error = None;
                self.pyramid = pyramid;
            }
            Err(e) => {
                log::error!("Failed to build pyramid: {e}");
                self.pyramid_error = Some(format!("Error: {e}"));
                self.pyramid = Pyramid::demo();
            }
        }
        self.matching = self.pyramid.matching;
    }

    // -- Widget actions ----------------------------------------------------

    pub fn toggle_route_type(&mut self, route_type: RouteType) {
        let types = &mut self.criteria.route_types;
        if !types.remove(&route_type) {
            types.insert(route_type);
        }
        self.recompute();
    }

    pub fn toggle_style(&mut self, style: LeadStyle) {
        let styles = &mut self.criteria.styles.styles;
        if !styles.remove(&style) {
            styles.insert(style);
        }
        self.recompute();
    }

    pub fn toggle_unknown_style(&mut self) {
        self.criteria.styles.include_unknown = !self.criteria.styles.include_unknown;
        self.recompute();
    }

    pub fn set_include_multipitch(&mut self, include: bool) {
        self.criteria.pitches = PitchFilter::from_include_multipitch(include);
        self.recompute();
    }

    pub fn set_max_rating(&mut self, cutoff: u32) {
        if self.config.max_grade_selector {
            self.criteria.max_rating = Some(cutoff);
            self.recompute();
        }
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        if let DateFilter::Range { .. } = self.criteria.dates {
            self.criteria.dates = DateFilter::Range { start, end };
            self.recompute();
        }
    }

    pub fn toggle_year(&mut self, year: i32) {
        if let DateFilter::Years(years) = &mut self.criteria.dates {
            if !years.remove(&year) {
                years.insert(year);
            }
            self.recompute();
        }
    }

    pub fn select_all_years(&mut self) {
        let Some(all) = self.log.as_ref().map(|l| l.years.clone()) else {
            return;
        };
        if let DateFilter::Years(years) = &mut self.criteria.dates {
            *years = all;
            self.recompute();
        }
    }

    pub fn select_no_years(&mut self) {
        if let DateFilter::Years(years) = &mut self.criteria.dates {
            years.clear();
            self.recompute();
        }
    }
}
