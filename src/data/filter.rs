use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use super::model::{LeadStyle, RouteType, Tick};

// ---------------------------------------------------------------------------
// Filter criteria: the current form selections
// ---------------------------------------------------------------------------

/// Selected ascent styles, plus whether ticks without a style are wanted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSelection {
    pub styles: BTreeSet<LeadStyle>,
    /// The "N/A" choice.
    pub include_unknown: bool,
}

impl StyleSelection {
    pub fn new(styles: impl IntoIterator<Item = LeadStyle>, include_unknown: bool) -> Self {
        StyleSelection {
            styles: styles.into_iter().collect(),
            include_unknown,
        }
    }

    pub fn matches(&self, style: Option<LeadStyle>) -> bool {
        match style {
            Some(s) => self.styles.contains(&s),
            None => self.include_unknown,
        }
    }
}

/// How ticks are restricted by date. Only one mode is active per view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    None,
    /// Inclusive bounds; an unset bound is open on that side.
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// Calendar years of the ascent date.
    Years(BTreeSet<i32>),
}

impl DateFilter {
    pub fn matches(&self, date: Option<NaiveDate>) -> bool {
        match self {
            DateFilter::None => true,
            DateFilter::Range {
                start: None,
                end: None,
            } => true,
            DateFilter::Range { start, end } => date.is_some_and(|d| {
                start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e)
            }),
            DateFilter::Years(years) => {
                date.is_some_and(|d| years.contains(&d.year()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PitchFilter {
    SinglePitchOnly,
    #[default]
    IncludeMultipitch,
}

impl PitchFilter {
    pub fn from_include_multipitch(include: bool) -> Self {
        if include {
            PitchFilter::IncludeMultipitch
        } else {
            PitchFilter::SinglePitchOnly
        }
    }

    pub fn includes_multipitch(self) -> bool {
        self == PitchFilter::IncludeMultipitch
    }

    pub fn matches(self, pitches: u32) -> bool {
        match self {
            PitchFilter::SinglePitchOnly => pitches == 1,
            PitchFilter::IncludeMultipitch => true,
        }
    }
}

/// Everything that decides whether a tick reaches the pyramid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub route_types: BTreeSet<RouteType>,
    pub styles: StyleSelection,
    pub dates: DateFilter,
    /// Highest rating code kept; `None` when the view has no max-grade selector.
    pub max_rating: Option<u32>,
    pub pitches: PitchFilter,
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One independent row test. A tick survives when every predicate passes,
/// so the order they are applied in does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    RouteType,
    Date,
    Style,
    Pitches,
    MaxRating,
}

impl Predicate {
    pub const ALL: [Predicate; 5] = [
        Predicate::RouteType,
        Predicate::Date,
        Predicate::Style,
        Predicate::Pitches,
        Predicate::MaxRating,
    ];

    pub fn test(self, criteria: &FilterCriteria, tick: &Tick) -> bool {
        match self {
            Predicate::RouteType => criteria.route_types.contains(&tick.route_type),
            Predicate::Date => criteria.dates.matches(tick.date),
            Predicate::Style => criteria.styles.matches(tick.lead_style),
            Predicate::Pitches => criteria.pitches.matches(tick.pitches),
            Predicate::MaxRating => criteria.max_rating.map_or(true, |max| tick.rating_code <= max),
        }
    }
}

impl FilterCriteria {
    pub fn matches(&self, tick: &Tick) -> bool {
        Predicate::ALL.iter().all(|p| p.test(self, tick))
    }
}

/// Ticks passing all active filters, in log order.
pub fn filter_ticks<'a>(ticks: &'a [Tick], criteria: &FilterCriteria) -> Vec<&'a Tick> {
    ticks.iter().filter(|t| criteria.matches(t)).collect()
}

/// Apply predicates one pass at a time in the given order.
pub fn filter_ticks_in_order<'a>(
    ticks: &'a [Tick],
    criteria: &FilterCriteria,
    order: &[Predicate],
) -> Vec<&'a Tick> {
    let mut surviving: Vec<&Tick> = ticks.iter().collect();
    for predicate in order {
        surviving.retain(|t| predicate.test(criteria, t));
    }
    surviving
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(style: Option<LeadStyle>, pitches: u32, date: Option<NaiveDate>) -> Tick {
        Tick {
            route_id: "r1".into(),
            route_name: None,
            route_type: RouteType::Sport,
            lead_style: style,
            rating_code: 1800,
            date,
            pitches,
            line: 2,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria {
            route_types: [RouteType::Sport].into(),
            styles: StyleSelection::new([LeadStyle::Redpoint], false),
            dates: DateFilter::None,
            max_rating: Some(4500),
            pitches: PitchFilter::IncludeMultipitch,
        }
    }

    #[test]
    fn unknown_style_sentinel_opts_in_missing_styles() {
        let missing = tick(None, 1, None);
        let mut c = criteria();
        assert!(!c.matches(&missing));

        c.styles.include_unknown = true;
        assert!(c.matches(&missing));
        assert!(c.matches(&tick(Some(LeadStyle::Redpoint), 1, None)));
        assert!(!c.matches(&tick(Some(LeadStyle::Flash), 1, None)));
    }

    #[test]
    fn multipitch_toggle() {
        let two_pitch = tick(Some(LeadStyle::Redpoint), 2, None);
        let mut c = criteria();
        assert!(c.matches(&two_pitch));

        c.pitches = PitchFilter::SinglePitchOnly;
        assert!(!c.matches(&two_pitch));
        assert!(c.matches(&tick(Some(LeadStyle::Redpoint), 1, None)));
    }

    #[test]
    fn route_type_must_be_selected() {
        let mut c = criteria();
        let mut t = tick(Some(LeadStyle::Redpoint), 1, None);
        t.route_type = RouteType::Trad;
        assert!(!c.matches(&t));
        c.route_types.insert(RouteType::Trad);
        assert!(c.matches(&t));
        c.route_types.clear();
        assert!(!c.matches(&t));
    }

    #[test]
    fn max_rating_is_inclusive() {
        let mut c = criteria();
        let mut t = tick(Some(LeadStyle::Redpoint), 1, None);
        t.rating_code = 4500;
        assert!(c.matches(&t));
        t.rating_code = 4501;
        assert!(!c.matches(&t));
        c.max_rating = None;
        assert!(c.matches(&t));
    }

    #[test]
    fn date_range_bounds_are_inclusive_and_optional() {
        let range = DateFilter::Range {
            start: day(2022, 1, 1),
            end: day(2022, 12, 31),
        };
        assert!(range.matches(day(2022, 1, 1)));
        assert!(range.matches(day(2022, 12, 31)));
        assert!(!range.matches(day(2021, 12, 31)));
        assert!(!range.matches(day(2023, 1, 1)));
        assert!(!range.matches(None));

        let open_start = DateFilter::Range {
            start: None,
            end: day(2022, 12, 31),
        };
        assert!(open_start.matches(day(1999, 5, 5)));

        let unbounded = DateFilter::Range {
            start: None,
            end: None,
        };
        assert!(unbounded.matches(None));
    }

    #[test]
    fn year_set_membership() {
        let years = DateFilter::Years([2021, 2023].into());
        assert!(years.matches(day(2021, 7, 4)));
        assert!(!years.matches(day(2022, 7, 4)));
        assert!(!years.matches(None));
        assert!(!DateFilter::Years(BTreeSet::new()).matches(day(2021, 7, 4)));
    }

    #[test]
    fn pass_order_does_not_change_result() {
        let ticks = vec![
            tick(Some(LeadStyle::Redpoint), 1, day(2022, 1, 1)),
            tick(None, 2, day(2022, 1, 1)),
            tick(Some(LeadStyle::Flash), 1, None),
        ];
        let mut c = criteria();
        c.styles.include_unknown = true;
        c.pitches = PitchFilter::SinglePitchOnly;

        let mut reversed = Predicate::ALL;
        reversed.reverse();
        let a = filter_ticks_in_order(&ticks, &c, &Predicate::ALL);
        let b = filter_ticks_in_order(&ticks, &c, &reversed);
        assert_eq!(a, b);
        assert_eq!(a, filter_ticks(&ticks, &c));
        assert_eq!(a.len(), 1);
    }
}
