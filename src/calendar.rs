//! Business-calendar arithmetic.
//!
//! Weekday classification, business-hour clamping, business-day counting, and
//! deterministic normalization of storyline date ranges.
//!
//! ## Determinism
//!
//! [`normalize_storyline_range`] derives its generator from a hash of the
//! storyline text, so the same `(title, summary, start, end)` inputs always
//! produce the same normalized range and the same explanation note. The
//! hour-clamping helper takes a caller-supplied generator instead; callers
//! that need reproducibility seed it themselves.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex_lite::Regex;
use tracing::debug;

use crate::identity;
use crate::types::{DayType, DayTypeCounts, ShiftDirection};

/// First hour of the business day (inclusive).
pub const WORKDAY_START_HOUR: u32 = 8;
/// First hour past the business day (exclusive bound).
pub const WORKDAY_END_HOUR: u32 = 19;
/// Maximum storyline span in calendar months.
const MAX_STORYLINE_MONTHS: u32 = 6;

/// Boundary language, acronym form: `Q3`, `FY2024`, `H1`, `EOM`, `EOQ`, `EOY`.
static BOUNDARY_ACRONYMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:q[1-4]|h[12]|fy\s?\d{2,4}|eom|eoq|eoy)\b")
        .expect("boundary acronym pattern compiles")
});

/// Boundary language, long form: `quarter`, `fiscal year`, `month-end`, ...
static BOUNDARY_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:fiscal\s+year|quarter|month[\s-]end|year[\s-]end|end\s+of\s+(?:the\s+)?(?:month|quarter|year))",
    )
    .expect("boundary phrase pattern compiles")
});

/// Error type for calendar operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Range end precedes range start.
    #[error("Range end {end} precedes start {start}")]
    EndBeforeStart {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },
}

/// Classify a calendar date.
pub fn classify_day(date: NaiveDate) -> DayType {
    DayType::from_date(date)
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().expect("date within supported range")
}

fn prev_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().expect("date within supported range")
}

fn morning_slot(date: NaiveDate, rng: &mut impl Rng) -> NaiveDateTime {
    date.and_hms_opt(WORKDAY_START_HOUR, rng.random_range(0..60), 0)
        .expect("valid wall-clock time")
}

/// Clamp a timestamp into business hours.
///
/// - Weekend dates advance to the next Monday at 09:00
/// - Times before 08:00 move to a random minute within 08:00-08:59
/// - Times at or after 19:00 advance to the next weekday, random minute
///   within 08:00-08:59
///
/// Postcondition: the result falls on a weekday with hour in `[8, 19)`.
pub fn adjust_to_business_hours(ts: NaiveDateTime, rng: &mut impl Rng) -> NaiveDateTime {
    let mut ts = ts;

    if classify_day(ts.date()).is_weekend() {
        let mut date = ts.date();
        while classify_day(date).is_weekend() {
            date = next_day(date);
        }
        ts = date
            .and_hms_opt(WORKDAY_START_HOUR + 1, 0, 0)
            .expect("valid wall-clock time");
    }

    if ts.time().hour() < WORKDAY_START_HOUR {
        ts = morning_slot(ts.date(), rng);
    } else if ts.time().hour() >= WORKDAY_END_HOUR {
        let mut date = next_day(ts.date());
        while classify_day(date).is_weekend() {
            date = next_day(date);
        }
        ts = morning_slot(date, rng);
    }

    ts
}

/// Shift a date by `n` business days.
///
/// Steps one calendar day at a time, counting only weekdays, until `n`
/// weekdays have been consumed. `n <= 0` returns the input unchanged.
pub fn shift_by_business_days(date: NaiveDate, n: i64, direction: ShiftDirection) -> NaiveDate {
    if n <= 0 {
        return date;
    }
    let mut date = date;
    let mut remaining = n;
    while remaining > 0 {
        date = match direction {
            ShiftDirection::Forward => next_day(date),
            ShiftDirection::Backward => prev_day(date),
        };
        if !classify_day(date).is_weekend() {
            remaining -= 1;
        }
    }
    date
}

/// Count day types over `[start, end]`, inclusive of both endpoints.
pub fn count_day_types_inclusive(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DayTypeCounts, CalendarError> {
    if end < start {
        return Err(CalendarError::EndBeforeStart { start, end });
    }
    let mut counts = DayTypeCounts::default();
    let mut date = start;
    loop {
        match classify_day(date) {
            DayType::Weekday => counts.business_days += 1,
            DayType::Saturday => counts.saturdays += 1,
            DayType::Sunday => counts.sundays += 1,
        }
        if date == end {
            break;
        }
        date = next_day(date);
    }
    Ok(counts)
}

/// A storyline date range after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRange {
    /// Normalized start date.
    pub start: NaiveDate,
    /// Normalized end date; always `>= start`.
    pub end: NaiveDate,
    /// Human-readable rationale for every adjustment, space-joined.
    pub note: String,
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    next_day(date).month() != date.month()
}

fn mentions_boundary_language(text: &str) -> bool {
    BOUNDARY_ACRONYMS.is_match(text) || BOUNDARY_PHRASES.is_match(text)
}

/// Normalize a storyline date range.
///
/// Suspiciously "clean" month boundaries are nudged away unless the storyline
/// text explicitly calls for them, the range is pulled inward by a few
/// business days, and the total span is capped at six months. All random
/// draws come from a generator seeded from the storyline text, so the result
/// is a pure function of the four inputs.
pub fn normalize_storyline_range(
    title: &str,
    summary: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<NormalizedRange, CalendarError> {
    if end < start {
        return Err(CalendarError::EndBeforeStart { start, end });
    }

    let seed = identity::seed("storyline-dates", &[title, summary]);
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut notes: Vec<String> = Vec::new();
    let mut start = start;
    let mut end = end;

    let combined = format!("{title} {summary}");
    if !mentions_boundary_language(&combined) {
        if start.day() == 1 {
            let span = (end - start).num_days();
            let shift = i64::from(rng.random_range(1u32..=5)).min(span - 1);
            if shift >= 1 {
                start = start + chrono::Days::new(shift as u64);
                notes.push(format!(
                    "Moved the start off the 1st of the month by {shift} day(s)."
                ));
            }
        }
        if is_last_day_of_month(end) {
            let span = (end - start).num_days();
            let shift = i64::from(rng.random_range(1u32..=5)).min(span - 1);
            if shift >= 1 {
                end = end - chrono::Days::new(shift as u64);
                notes.push(format!(
                    "Moved the end off the month boundary by {shift} day(s)."
                ));
            }
        }
    }

    if classify_day(start).is_weekend() {
        while classify_day(start).is_weekend() {
            start = next_day(start);
        }
        notes.push("Moved the start to the next weekday.".to_string());
    }
    let start_shift = i64::from(rng.random_range(1u32..=3));
    start = shift_by_business_days(start, start_shift, ShiftDirection::Forward);
    notes.push(format!(
        "Shifted the start forward {start_shift} business day(s)."
    ));

    if classify_day(end).is_weekend() {
        while classify_day(end).is_weekend() {
            end = prev_day(end);
        }
        notes.push("Moved the end to the previous weekday.".to_string());
    }
    let end_shift = i64::from(rng.random_range(1u32..=7));
    end = shift_by_business_days(end, end_shift, ShiftDirection::Backward);
    notes.push(format!("Shifted the end back {end_shift} business day(s)."));

    let cap = start
        .checked_add_months(Months::new(MAX_STORYLINE_MONTHS))
        .expect("date within supported range");
    if end > cap {
        end = cap;
        notes.push("Capped the storyline span at six months.".to_string());
    }

    if end < start {
        end = start;
        notes.push("Clamped the end to the start after adjustments.".to_string());
    }

    let note = notes.join(" ");
    debug!(%start, %end, %note, "normalized storyline range");
    Ok(NormalizedRange { start, end, note })
}
