use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::{FilterError, RowIssue};

// ---------------------------------------------------------------------------
// RouteType – fixed category set of the `Route Type` column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RouteType {
    Sport,
    Trad,
    #[serde(alias = "TR", alias = "Toprope")]
    TopRope,
}

impl RouteType {
    pub const ALL: [RouteType; 3] = [RouteType::Sport, RouteType::Trad, RouteType::TopRope];

    /// Parse an exact, case-sensitive `Route Type` cell.
    ///
    /// Top-rope ascents are exported either as `TR` or `Toprope`.
    pub fn parse(label: &str) -> Result<Self, FilterError> {
        match label {
            "Sport" => Ok(RouteType::Sport),
            "Trad" => Ok(RouteType::Trad),
            "TR" | "Toprope" => Ok(RouteType::TopRope),
            other => Err(FilterError::UnknownRouteType(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RouteType::Sport => "Sport",
            RouteType::Trad => "Trad",
            RouteType::TopRope => "TR",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LeadStyle – the ascent style of a tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeadStyle {
    Onsight,
    Flash,
    Redpoint,
    Pinkpoint,
    #[serde(rename = "Fell/Hung")]
    FellHung,
}

impl LeadStyle {
    pub const ALL: [LeadStyle; 5] = [
        LeadStyle::Onsight,
        LeadStyle::Flash,
        LeadStyle::Redpoint,
        LeadStyle::Pinkpoint,
        LeadStyle::FellHung,
    ];

    /// Label used for the "style unknown" choice in selectors.
    pub const UNKNOWN_LABEL: &'static str = "N/A";

    /// Cell values that mean "no style recorded".
    pub const MISSING_TOKENS: [&'static str; 5] = ["", "N/A", "NA", "NaN", "null"];

    /// Parse a `Lead Style` cell. An empty cell or a common NA token is a
    /// missing style.
    pub fn parse(label: &str) -> Result<Option<Self>, FilterError> {
        match label {
            missing if Self::MISSING_TOKENS.contains(&missing) => Ok(None),
            "Onsight" => Ok(Some(LeadStyle::Onsight)),
            "Flash" => Ok(Some(LeadStyle::Flash)),
            "Redpoint" => Ok(Some(LeadStyle::Redpoint)),
            "Pinkpoint" => Ok(Some(LeadStyle::Pinkpoint)),
            "Fell/Hung" => Ok(Some(LeadStyle::FellHung)),
            other => Err(FilterError::UnknownLeadStyle(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeadStyle::Onsight => "Onsight",
            LeadStyle::Flash => "Flash",
            LeadStyle::Redpoint => "Redpoint",
            LeadStyle::Pinkpoint => "Pinkpoint",
            LeadStyle::FellHung => "Fell/Hung",
        }
    }
}

impl fmt::Display for LeadStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tick – one row of the log
// ---------------------------------------------------------------------------

/// A single logged ascent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Unique key of the route (the `URL` column by default).
    pub route_id: String,
    /// Human-readable route name, if the log has a `Route` column.
    pub route_name: Option<String>,
    pub route_type: RouteType,
    /// `None` when the log leaves the style blank.
    pub lead_style: Option<LeadStyle>,
    pub rating_code: u32,
    pub date: Option<NaiveDate>,
    /// Always ≥ 1.
    pub pitches: u32,
    /// 1-based line in the source file, header being line 1.
    pub line: u64,
}

impl Tick {
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }

    pub fn is_multipitch(&self) -> bool {
        self.pitches > 1
    }

    /// Name for log messages: the route name if known, else its identifier.
    pub fn display_name(&self) -> &str {
        self.route_name.as_deref().unwrap_or(&self.route_id)
    }
}

// ---------------------------------------------------------------------------
// TickLog – the complete parsed file
// ---------------------------------------------------------------------------

/// Parsed tick log with the rows that had to be left out.
#[derive(Debug, Clone, Default)]
pub struct TickLog {
    pub ticks: Vec<Tick>,
    /// Rows excluded while decoding, in file order.
    pub rejected: Vec<RowIssue>,
    /// Calendar years present among the ticks, ascending.
    pub years: BTreeSet<i32>,
}

impl TickLog {
    pub fn new(ticks: Vec<Tick>, rejected: Vec<RowIssue>) -> Self {
        let years = ticks.iter().filter_map(Tick::year).collect();
        TickLog {
            ticks,
            rejected,
            years,
        }
    }

    /// Number of accepted ticks.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Number of distinct routes across all accepted ticks.
    pub fn distinct_routes(&self) -> usize {
        self.ticks
            .iter()
            .map(|t| t.route_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(route_id: &str, date: Option<NaiveDate>) -> Tick {
        Tick {
            route_id: route_id.to_string(),
            route_name: None,
            route_type: RouteType::Sport,
            lead_style: None,
            rating_code: 2000,
            date,
            pitches: 1,
            line: 2,
        }
    }

    #[test]
    fn route_type_matches_exact_labels_only() {
        assert_eq!(RouteType::parse("Sport"), Ok(RouteType::Sport));
        assert_eq!(RouteType::parse("TR"), Ok(RouteType::TopRope));
        assert_eq!(RouteType::parse("Toprope"), Ok(RouteType::TopRope));
        assert_eq!(
            RouteType::parse("sport"),
            Err(FilterError::UnknownRouteType("sport".into()))
        );
        assert!(RouteType::parse("Trad, Sport").is_err());
    }

    #[test]
    fn empty_lead_style_is_missing() {
        assert_eq!(LeadStyle::parse(""), Ok(None));
        for token in LeadStyle::MISSING_TOKENS {
            assert_eq!(LeadStyle::parse(token), Ok(None), "{token}");
        }
        assert!(LeadStyle::parse("n/a").is_err());
        assert_eq!(LeadStyle::parse("Fell/Hung"), Ok(Some(LeadStyle::FellHung)));
        assert!(LeadStyle::parse("Solo").is_err());
    }

    #[test]
    fn tick_log_collects_years_and_routes() {
        let d = |y| NaiveDate::from_ymd_opt(y, 6, 1);
        let log = TickLog::new(
            vec![
                tick("a", d(2021)),
                tick("a", d(2023)),
                tick("b", None),
                tick("c", d(2021)),
            ],
            Vec::new(),
        );
        assert_eq!(log.years.iter().copied().collect::<Vec<_>>(), vec![2021, 2023]);
        assert_eq!(log.distinct_routes(), 3);
        assert_eq!(log.len(), 4);
    }
}
