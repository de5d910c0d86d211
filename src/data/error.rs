use thiserror::Error;

// ---------------------------------------------------------------------------
// Ingestion – fatal for the current load
// ---------------------------------------------------------------------------

/// Why a tick log could not be decoded at all.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("file is not valid UTF-8 text (invalid byte at offset {offset})")]
    Encoding { offset: usize },

    #[error("file is empty or has no header row")]
    Empty,

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("malformed CSV at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("reading tick log")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for IngestionError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => IngestionError::Io(io),
            csv::ErrorKind::Utf8 { err, .. } => IngestionError::Encoding {
                offset: err.valid_up_to(),
            },
            other => IngestionError::Csv {
                line,
                message: csv_kind_message(&other),
            },
        }
    }
}

fn csv_kind_message(kind: &csv::ErrorKind) -> String {
    match kind {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        other => format!("{other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Per-row anomalies – tolerated by excluding the row
// ---------------------------------------------------------------------------

/// A single row whose values fall outside what the pyramid can use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown route type '{0}'")]
    UnknownRouteType(String),

    #[error("unknown lead style '{0}'")]
    UnknownLeadStyle(String),

    #[error("empty route identifier")]
    MissingRouteId,

    #[error("rating code '{0}' is not an integer")]
    InvalidRating(String),

    #[error("pitch count '{0}' is not a positive integer")]
    InvalidPitches(String),

    #[error("date '{0}' is not a calendar date")]
    InvalidDate(String),
}

/// A rejected row with its 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub line: u64,
    pub error: FilterError,
}

// ---------------------------------------------------------------------------
// Aggregation – only raised in strict mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("route '{route}' has rating code {rating} above the hardest active band (cutoff {cutoff})")]
    Unbanded {
        route: String,
        rating: u32,
        cutoff: u32,
    },

    #[error("no grade bands are active")]
    NoBands,
}
