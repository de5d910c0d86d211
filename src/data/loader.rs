use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::StringRecord;

use super::error::{FilterError, IngestionError, RowIssue};
use super::model::{LeadStyle, RouteType, Tick, TickLog};

pub const COL_ROUTE_TYPE: &str = "Route Type";
pub const COL_LEAD_STYLE: &str = "Lead Style";
pub const COL_RATING_CODE: &str = "Rating Code";
pub const COL_PITCHES: &str = "Pitches";
pub const COL_DATE: &str = "Date";
pub const COL_ROUTE_NAME: &str = "Route";
pub const DEFAULT_ROUTE_ID_COLUMN: &str = "URL";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What the ingestion step needs to know about the active view.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Column that uniquely identifies a route.
    pub route_id_column: String,
    /// Whether the `Date` column is required and must parse on every row.
    pub require_date: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            route_id_column: DEFAULT_ROUTE_ID_COLUMN.to_string(),
            require_date: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a tick log from disk.
pub fn load_file(path: &Path, options: &IngestOptions) -> Result<TickLog> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let log = ingest_bytes(&bytes, options)
        .with_context(|| format!("loading ticks from {}", path.display()))?;
    Ok(log)
}

/// Decode an uploaded tick log.
///
/// Layout: header row, comma-separated. Required columns are the route id
/// column, `Route Type`, `Lead Style`, `Rating Code`, `Pitches`, plus `Date`
/// when `require_date` is set. `Route` and `Date` are read when present.
///
/// Structural problems fail the whole load. Rows with values the pyramid
/// cannot use are left out and reported in [`TickLog::rejected`].
pub fn ingest_bytes(bytes: &[u8], options: &IngestOptions) -> Result<TickLog, IngestionError> {
    let text = std::str::from_utf8(bytes).map_err(|e| IngestionError::Encoding {
        offset: e.valid_up_to(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(IngestionError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers, options)?;

    let mut ticks = Vec::new();
    let mut rejected = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match columns.parse_row(&record, line) {
            Ok(tick) => ticks.push(tick),
            Err(error) => {
                log::debug!("Skipping line {line}: {error}");
                rejected.push(RowIssue { line, error });
            }
        }
    }

    if !rejected.is_empty() {
        log::warn!(
            "{} of {} rows left out of the tick log",
            rejected.len(),
            rejected.len() + ticks.len()
        );
    }

    Ok(TickLog::new(ticks, rejected))
}

// ---------------------------------------------------------------------------
// Column lookup and row decoding
// ---------------------------------------------------------------------------

struct Columns {
    route_id: usize,
    route_type: usize,
    lead_style: usize,
    rating_code: usize,
    pitches: usize,
    date: Option<usize>,
    route_name: Option<usize>,
    strict_dates: bool,
}

impl Columns {
    fn locate(headers: &StringRecord, options: &IngestOptions) -> Result<Self, IngestionError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| IngestionError::MissingColumn(name.to_string()))
        };

        let date = if options.require_date {
            Some(require(COL_DATE)?)
        } else {
            find(COL_DATE)
        };

        Ok(Columns {
            route_id: require(options.route_id_column.as_str())?,
            route_type: require(COL_ROUTE_TYPE)?,
            lead_style: require(COL_LEAD_STYLE)?,
            rating_code: require(COL_RATING_CODE)?,
            pitches: require(COL_PITCHES)?,
            date,
            route_name: find(COL_ROUTE_NAME),
            strict_dates: options.require_date,
        })
    }

    fn parse_row(&self, record: &StringRecord, line: u64) -> Result<Tick, FilterError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let route_id = cell(self.route_id);
        if route_id.is_empty() {
            return Err(FilterError::MissingRouteId);
        }

        let route_type = RouteType::parse(cell(self.route_type))?;
        let lead_style = LeadStyle::parse(cell(self.lead_style))?;

        let rating_raw = cell(self.rating_code);
        let rating_code = rating_raw
            .parse::<u32>()
            .map_err(|_| FilterError::InvalidRating(rating_raw.to_string()))?;

        let pitches_raw = cell(self.pitches);
        let pitches = pitches_raw
            .parse::<u32>()
            .ok()
            .filter(|&p| p >= 1)
            .ok_or_else(|| FilterError::InvalidPitches(pitches_raw.to_string()))?;

        let date = match self.date.map(cell).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match parse_date(raw) {
                Some(d) => Some(d),
                None if self.strict_dates => {
                    return Err(FilterError::InvalidDate(raw.to_string()));
                }
                None => None,
            },
        };

        let route_name = self
            .route_name
            .map(cell)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Tick {
            route_id: route_id.to_string(),
            route_name,
            route_type,
            lead_style,
            rating_code,
            date,
            pitches,
            line,
        })
    }
}

/// Accepts `YYYY-MM-DD`, an ISO date followed by a time, or `MM/DD/YYYY`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Some(prefix) = s.get(..10) {
        let rest = &s[10..];
        if rest.starts_with(' ') || rest.starts_with('T') {
            if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(d);
            }
        }
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Route,Rating,Notes,URL,Pitches,Location,Avg Stars,Your Stars,Style,Lead Style,Route Type,Your Rating,Length,Rating Code";

    fn ingest(text: &str) -> Result<TickLog, IngestionError> {
        ingest_bytes(text.as_bytes(), &IngestOptions::default())
    }

    #[test]
    fn parses_mountain_project_export() {
        let csv = format!(
            "{HEADER}\n\
             2023-05-14,Pinch Me,5.10b,,https://mp/r/1,1,Crag,3.2,3,Lead,Redpoint,Sport,,80,3000\n\
             2023-06-01,Long Way,5.8,\"nice, long\",https://mp/r/2,4,Crag,3.5,4,Lead,,Trad,,600,2000\n"
        );
        let log = ingest(&csv).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.rejected.is_empty());

        let first = &log.ticks[0];
        assert_eq!(first.route_id, "https://mp/r/1");
        assert_eq!(first.route_name.as_deref(), Some("Pinch Me"));
        assert_eq!(first.lead_style, Some(LeadStyle::Redpoint));
        assert_eq!(first.rating_code, 3000);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 5, 14));
        assert_eq!(first.line, 2);

        let second = &log.ticks[1];
        assert_eq!(second.lead_style, None);
        assert_eq!(second.pitches, 4);
        assert_eq!(second.route_type, RouteType::Trad);
    }

    #[test]
    fn minimal_columns_without_date() {
        let csv = "URL,Route Type,Lead Style,Rating Code,Pitches\nr1,Sport,Flash,1800,1\n";
        let log = ingest(csv).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.ticks[0].date, None);
        assert!(log.years.is_empty());
    }

    #[test]
    fn na_lead_style_tokens_are_missing_styles() {
        let csv = "URL,Route Type,Lead Style,Rating Code,Pitches\n\
                   r1,Sport,N/A,1800,1\n\
                   r2,Sport,,1800,1\n\
                   r3,Sport,NA,1800,1\n\
                   r4,Sport,NaN,1800,1\n\
                   r5,Sport,null,1800,1\n";
        let log = ingest(csv).unwrap();
        assert!(log.rejected.is_empty(), "{:?}", log.rejected);
        assert_eq!(log.len(), 5);
        assert!(log.ticks.iter().all(|t| t.lead_style.is_none()));
    }

    #[test]
    fn header_whitespace_and_bom_are_ignored() {
        let csv = "\u{feff}URL , Route Type,Lead Style,Rating Code,Pitches\nr1,Sport,Flash,1800,1\n";
        assert_eq!(ingest(csv).unwrap().len(), 1);
    }

    #[test]
    fn non_utf8_is_an_encoding_error() {
        let bytes = b"URL,Route Type\n\xff\xfe,Sport\n";
        let err = ingest_bytes(bytes, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::Encoding { offset: 15 }));
    }

    #[test]
    fn missing_required_column_is_named() {
        let csv = "URL,Route Type,Lead Style,Pitches\nr1,Sport,Flash,1\n";
        match ingest(csv) {
            Err(IngestionError::MissingColumn(col)) => assert_eq!(col, "Rating Code"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn date_column_required_only_when_filtering_by_date() {
        let csv = "URL,Route Type,Lead Style,Rating Code,Pitches\nr1,Sport,Flash,1800,1\n";
        let options = IngestOptions {
            require_date: true,
            ..IngestOptions::default()
        };
        assert!(matches!(
            ingest_bytes(csv.as_bytes(), &options),
            Err(IngestionError::MissingColumn(col)) if col == "Date"
        ));
    }

    #[test]
    fn custom_route_id_column() {
        let csv = "Route,Route Type,Lead Style,Rating Code,Pitches\nThe Nose,Trad,,5300,31\n";
        let options = IngestOptions {
            route_id_column: "Route".into(),
            ..IngestOptions::default()
        };
        let log = ingest_bytes(csv.as_bytes(), &options).unwrap();
        assert_eq!(log.ticks[0].route_id, "The Nose");
        assert!(log.ticks[0].is_multipitch());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(ingest(""), Err(IngestionError::Empty)));
        assert!(matches!(ingest("  \n"), Err(IngestionError::Empty)));
    }

    #[test]
    fn ragged_rows_fail_the_load() {
        let csv = "URL,Route Type,Lead Style,Rating Code,Pitches\nr1,Sport,Flash,1800\n";
        assert!(matches!(ingest(csv), Err(IngestionError::Csv { line: 2, .. })));
    }

    #[test]
    fn bad_rows_are_excluded_not_fatal() {
        let csv = "URL,Route Type,Lead Style,Rating Code,Pitches\n\
                   r1,Sport,Flash,1800,1\n\
                   r2,Boulder,Flash,1800,1\n\
                   r3,Sport,Attempt,1800,1\n\
                   r4,Sport,Flash,hard,1\n\
                   r5,Sport,Flash,1800,0\n\
                   ,Sport,Flash,1800,1\n";
        let log = ingest(csv).unwrap();
        assert_eq!(log.len(), 1);
        let errors: Vec<_> = log.rejected.iter().map(|r| (r.line, r.error.clone())).collect();
        assert_eq!(
            errors,
            vec![
                (3, FilterError::UnknownRouteType("Boulder".into())),
                (4, FilterError::UnknownLeadStyle("Attempt".into())),
                (5, FilterError::InvalidRating("hard".into())),
                (6, FilterError::InvalidPitches("0".into())),
                (7, FilterError::MissingRouteId),
            ]
        );
    }

    #[test]
    fn unparseable_dates_depend_on_date_filtering() {
        let csv = "URL,Route Type,Lead Style,Rating Code,Pitches,Date\nr1,Sport,Flash,1800,1,someday\n";
        let lenient = ingest(csv).unwrap();
        assert_eq!(lenient.ticks[0].date, None);

        let strict = IngestOptions {
            require_date: true,
            ..IngestOptions::default()
        };
        let log = ingest_bytes(csv.as_bytes(), &strict).unwrap();
        assert!(log.is_empty());
        assert_eq!(log.rejected[0].error, FilterError::InvalidDate("someday".into()));
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2022, 3, 9);
        assert_eq!(parse_date("2022-03-09"), expected);
        assert_eq!(parse_date("2022-03-09 14:30:00"), expected);
        assert_eq!(parse_date("2022-03-09T14:30:00"), expected);
        assert_eq!(parse_date("03/09/2022"), expected);
        assert_eq!(parse_date("2022-13-01"), None);
        assert_eq!(parse_date("yesterday"), None);
    }
}
