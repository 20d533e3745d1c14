//! Statistical volume estimation.
//!
//! Models per-day message volume as an over-dispersed count. Participation
//! saturates as the active-role count grows:
//!
//! ```text
//! p     = p_max * (1 - e^(-(n - 1) / k))
//! mu    = n * s * p
//! sigma = sqrt(mu + mu^2 / (n * kappa))
//! range = [ceil(max(0, mu - z * sigma)), ceil(mu + z * sigma)]
//! ```
//!
//! The `mu^2 / (n * kappa)` term inflates variance beyond a simple Poisson
//! count, modeling clustering and bursting. Weekend means are the business-day
//! mean scaled by a day-specific multiplier, with a smaller dispersion
//! parameter.
//!
//! Ranges are computed fresh on every call and never cached.

use chrono::NaiveDate;
use rand::Rng;

use crate::types::{DayType, VolumeRange};

/// Per-role daily base rate `s`.
const PER_ROLE_DAILY_BASE: f64 = 24.0;
/// Saturating per-role sending probability `p_max`.
const MAX_SEND_PROBABILITY: f64 = 0.65;
/// Saturation scale `k` for the role count.
const SATURATION_SCALE: f64 = 12.0;
/// One-sided 95% normal quantile `z`, used as a symmetric half-width.
const MARGIN_QUANTILE: f64 = 1.645;
/// Dispersion parameter for business days.
const BUSINESS_DISPERSION: f64 = 3.0;
/// Dispersion parameter for weekend days.
const WEEKEND_DISPERSION: f64 = 2.0;
/// Saturday traffic as a share of business-day traffic.
const SATURDAY_MULTIPLIER: f64 = 0.146;
/// Sunday traffic as a share of business-day traffic.
const SUNDAY_MULTIPLIER: f64 = 0.136;

/// Error type for volume estimation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VolumeError {
    /// Active-role count must be at least one.
    #[error("Active-role count must be positive")]
    InvalidRoleCount,
    /// The requested day type is not a weekend day.
    #[error("Expected a weekend day type, got {0}")]
    NotAWeekendDay(DayType),
    /// Range end precedes range start.
    #[error("Range end {end} precedes start {start}")]
    EndBeforeStart {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },
}

/// Saturating participation probability for `n` active roles.
fn send_probability(n: u32) -> f64 {
    MAX_SEND_PROBABILITY * (1.0 - (-(f64::from(n) - 1.0) / SATURATION_SCALE).exp())
}

/// Business-day mean volume for `n` active roles.
fn business_day_mean(n: u32) -> f64 {
    f64::from(n) * PER_ROLE_DAILY_BASE * send_probability(n)
}

/// Build the confidence interval around a mean.
fn range_from_mean(mu: f64, n: u32, dispersion: f64) -> VolumeRange {
    let sigma = (mu + mu * mu / (f64::from(n) * dispersion)).sqrt();
    let margin = MARGIN_QUANTILE * sigma;
    let low = (mu - margin).max(0.0).ceil() as u64;
    let high = (mu + margin).ceil();
    let high = if high >= u64::MAX as f64 {
        u64::MAX
    } else {
        high as u64
    };
    VolumeRange::new(low, high)
}

/// Expected volume range for one business day with `n` active roles.
pub fn business_day_range(n: u32) -> Result<VolumeRange, VolumeError> {
    if n == 0 {
        return Err(VolumeError::InvalidRoleCount);
    }
    Ok(range_from_mean(business_day_mean(n), n, BUSINESS_DISPERSION))
}

/// Expected volume range for one weekend day with `n` active roles.
///
/// The mean is the business-day mean scaled by the day-specific multiplier.
pub fn weekend_range(n: u32, day: DayType) -> Result<VolumeRange, VolumeError> {
    if n == 0 {
        return Err(VolumeError::InvalidRoleCount);
    }
    let multiplier = match day {
        DayType::Saturday => SATURDAY_MULTIPLIER,
        DayType::Sunday => SUNDAY_MULTIPLIER,
        DayType::Weekday => return Err(VolumeError::NotAWeekendDay(day)),
    };
    Ok(range_from_mean(
        business_day_mean(n) * multiplier,
        n,
        WEEKEND_DISPERSION,
    ))
}

/// Expected volume range for a specific calendar date.
pub fn day_range(date: NaiveDate, n: u32) -> Result<VolumeRange, VolumeError> {
    match DayType::from_date(date) {
        DayType::Weekday => business_day_range(n),
        day => weekend_range(n, day),
    }
}

/// Estimate the total volume over `[start, end]` inclusive.
///
/// Draws one uniform sample within each day's range (degenerate to `low`
/// when `high < low`) and sums across the whole range.
pub fn estimate_total_for_range(
    start: NaiveDate,
    end: NaiveDate,
    n: u32,
    rng: &mut impl Rng,
) -> Result<u64, VolumeError> {
    if n == 0 {
        return Err(VolumeError::InvalidRoleCount);
    }
    if end < start {
        return Err(VolumeError::EndBeforeStart { start, end });
    }

    let mut total: u64 = 0;
    let mut date = start;
    loop {
        let range = day_range(date, n)?;
        let sample = if range.high < range.low {
            range.low
        } else {
            rng.random_range(range.low..=range.high)
        };
        total = total.saturating_add(sample);
        if date == end {
            break;
        }
        date = date.succ_opt().expect("date within supported range");
    }
    Ok(total)
}
