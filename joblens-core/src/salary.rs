//! Salary estimation from sampled postings and histograms, with currency normalization.

use crate::types::{MarketFetchResult, RateTable, SalaryBand, SalaryEstimate, SalaryHistogram};

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

/// Midpoint of a salary band. A missing bound is filled with the other one;
/// a band without any positive bound yields `None`.
#[must_use]
pub fn midpoint(band: &SalaryBand) -> Option<f64> {
    let (min, max) = (positive(band.min), positive(band.max));
    let lo = min.or(max)?;
    let hi = max.or(min)?;
    Some(f64::midpoint(lo, hi))
}

/// Rounded mean of the midpoints of all qualifying bands.
#[must_use]
pub fn sampled_average(bands: &[SalaryBand]) -> Option<i64> {
    let mids: Vec<f64> = bands.iter().filter_map(midpoint).collect();
    if mids.is_empty() {
        return None;
    }
    let mean = mids.iter().sum::<f64>() / mids.len() as f64;
    Some(mean.round() as i64)
}

/// Rounded count-weighted mean of a salary histogram.
///
/// Buckets whose key does not parse as a number are skipped. Returns `None`
/// when nothing remains or the total weight is zero.
#[must_use]
pub fn histogram_average(histogram: &SalaryHistogram) -> Option<i64> {
    let mut weighted = 0.0_f64;
    let mut total = 0_u64;
    for (bucket, count) in histogram {
        let Ok(value) = bucket.trim().parse::<f64>() else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        weighted += value * *count as f64;
        total += *count;
    }
    if total == 0 {
        return None;
    }
    Some((weighted / total as f64).round() as i64)
}

/// Convert `amount` quoted in `from` into `to` using `rates`.
///
/// Passes the amount through unchanged when the currencies match or no usable
/// factor exists for either side.
#[must_use]
pub fn convert(amount: i64, from: &str, to: &str, rates: &RateTable) -> i64 {
    if from.eq_ignore_ascii_case(to) {
        return amount;
    }
    let (Some(r_from), Some(r_to)) = (rates.rate_for(from), rates.rate_for(to)) else {
        return amount;
    };
    (amount as f64 / r_from * r_to).round() as i64
}

/// Local and base-currency salary estimates for one market.
///
/// The sampled-posting average wins over the histogram average; the histogram
/// is only consulted when no posting advertises a salary.
#[must_use]
pub fn normalize(result: &MarketFetchResult, rates: &RateTable, target: &str) -> SalaryEstimate {
    let local_average =
        sampled_average(&result.sampled_salaries).or_else(|| histogram_average(&result.histogram));
    let base_average =
        local_average.map(|local| convert(local, &result.market.currency, target, rates));
    SalaryEstimate {
        local_average,
        base_average,
    }
}
