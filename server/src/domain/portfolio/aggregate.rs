//! Combined portfolio aggregation
//!
//! Input is a mapping of profile id to its date-ordered entries, already
//! filtered to the caller's visible profiles by the access engine. Malformed
//! individual entries (unparsable dates) are skipped, never errors: a
//! tracker must keep rendering around one bad row.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::period::TimePeriod;
use super::types::{ChartPoint, CombinedPortfolio, RiskSlice};
use crate::data::types::EntryRow;
use crate::utils::time::parse_entry_date;

/// Risk distribution slice label for the volatile group
pub const HIGH_MEDIUM_RISK_LABEL: &str = "High/Medium Risk";

/// Risk distribution slice label for the capital-preserving group
pub const LOW_RISK_LABEL: &str = "Low Risk";

/// Group a flat entry list by profile id, preserving relative order
pub fn group_entries_by_profile(entries: Vec<EntryRow>) -> BTreeMap<String, Vec<EntryRow>> {
    let mut map: BTreeMap<String, Vec<EntryRow>> = BTreeMap::new();
    for entry in entries {
        map.entry(entry.profile_id.clone()).or_default().push(entry);
    }
    map
}

/// Keep entries dated on or after the period start, preserving order.
/// Entries whose date does not parse cannot satisfy the bound and are
/// dropped. The input is never mutated.
pub fn filter_entries_by_period(
    entries: &[EntryRow],
    period: TimePeriod,
    now: DateTime<Utc>,
) -> Vec<EntryRow> {
    let start = period.start_date(now);
    entries
        .iter()
        .filter(|e| parse_entry_date(&e.entry_date).is_some_and(|d| d >= start))
        .cloned()
        .collect()
}

/// Apply the period filter per profile, dropping profiles whose filtered
/// series is empty: a profile with nothing in-period is invisible to the
/// aggregate, not a zero-value row.
pub fn filter_combined_by_period(
    profiles: &BTreeMap<String, Vec<EntryRow>>,
    period: TimePeriod,
    now: DateTime<Utc>,
) -> BTreeMap<String, Vec<EntryRow>> {
    profiles
        .iter()
        .filter_map(|(profile_id, entries)| {
            let filtered = filter_entries_by_period(entries, period, now);
            (!filtered.is_empty()).then(|| (profile_id.clone(), filtered))
        })
        .collect()
}

/// The chronologically latest entry with a parsable date
fn latest_valid_entry(entries: &[EntryRow]) -> Option<&EntryRow> {
    entries
        .iter()
        .filter_map(|e| parse_entry_date(&e.entry_date).map(|d| (d, e)))
        .max_by_key(|(date, _)| *date)
        .map(|(_, e)| e)
}

/// Combine the profiles into a current snapshot, risk split, and time series
pub fn aggregate_combined_portfolio(
    profiles: &BTreeMap<String, Vec<EntryRow>>,
    tolerance: f64,
) -> CombinedPortfolio {
    if profiles.is_empty() {
        return CombinedPortfolio::empty();
    }

    // Current snapshot: each profile contributes its latest valid entry
    let mut total_assets = 0.0_f64;
    let mut total_high_medium = 0.0_f64;
    let mut total_low = 0.0_f64;
    for entries in profiles.values() {
        if let Some(latest) = latest_valid_entry(entries) {
            total_assets += latest.total_assets;
            total_high_medium += latest.total_high_medium_risk;
            total_low += latest.total_low_risk;
        }
    }

    let risk_distribution = risk_distribution(total_assets, total_high_medium, total_low, tolerance);

    // Time series: every entry of every profile, merged by calendar date
    let mut by_date: BTreeMap<NaiveDate, ChartPoint> = BTreeMap::new();
    for entry in profiles.values().flatten() {
        let Some(date) = parse_entry_date(&entry.entry_date) else {
            continue;
        };
        let point = by_date.entry(date).or_insert_with(|| ChartPoint::empty(date));
        point.total_assets += entry.total_assets;
        point.total_high_medium_risk += entry.total_high_medium_risk;
        point.total_low_risk += entry.total_low_risk;
        point.high_medium_risk.add(&entry.high_medium_risk);
        point.low_risk.add(&entry.low_risk);
    }

    CombinedPortfolio {
        chart_data: by_date.into_values().collect(),
        risk_distribution,
        total_assets,
    }
}

/// Split totals into the two risk slices.
///
/// Computed only when the portfolio is non-empty at minor-unit scale and the
/// totals cross-check holds within tolerance; anything else returns an empty
/// list rather than percentages derived from corrupted inputs.
fn risk_distribution(
    total_assets: f64,
    total_high_medium: f64,
    total_low: f64,
    tolerance: f64,
) -> Vec<RiskSlice> {
    if total_assets < tolerance {
        return Vec::new();
    }
    if (total_assets - (total_high_medium + total_low)).abs() >= tolerance {
        return Vec::new();
    }

    vec![
        RiskSlice {
            name: HIGH_MEDIUM_RISK_LABEL.to_string(),
            value: total_high_medium,
            percentage: total_high_medium / total_assets * 100.0,
        },
        RiskSlice {
            name: LOW_RISK_LABEL.to_string(),
            value: total_low,
            percentage: total_low / total_assets * 100.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::TOTALS_TOLERANCE;
    use crate::data::types::{HighMediumRisk, LowRisk};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn entry(profile_id: &str, date: &str, high_medium: f64, low: f64) -> EntryRow {
        EntryRow {
            id: cuid2::create_id(),
            profile_id: profile_id.to_string(),
            entry_date: date.to_string(),
            high_medium_risk: HighMediumRisk {
                us_stocks: high_medium,
                ..Default::default()
            },
            low_risk: LowRisk {
                cash: low,
                ..Default::default()
            },
            total_high_medium_risk: high_medium,
            total_low_risk: low,
            total_assets: high_medium + low,
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn profiles(input: Vec<EntryRow>) -> BTreeMap<String, Vec<EntryRow>> {
        group_entries_by_profile(input)
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let result = aggregate_combined_portfolio(&BTreeMap::new(), TOTALS_TOLERANCE);
        assert_eq!(result.total_assets, 0.0);
        assert!(result.chart_data.is_empty());
        assert!(result.risk_distribution.is_empty());
    }

    #[test]
    fn test_total_is_sum_of_latest_entries() {
        let map = profiles(vec![
            entry("a", "2024-01-01", 50_000.0, 100_000.0),
            entry("a", "2024-06-01", 100_000.0, 200_000.0), // latest for a: 300000
            entry("b", "2024-05-01", 40_000.0, 200_000.0),  // latest for b: 240000
        ]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert!((result.total_assets - 540_000.0).abs() < 0.01);
    }

    #[test]
    fn test_latest_selection_skips_invalid_dates() {
        let map = profiles(vec![
            entry("a", "2024-01-01", 100.0, 100.0),
            entry("a", "not-a-date", 9_999_999.0, 0.0),
        ]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert!((result.total_assets - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_profile_with_no_valid_entries_contributes_zero() {
        let map = profiles(vec![
            entry("a", "2024-01-01", 100.0, 100.0),
            entry("b", "garbage", 500.0, 500.0),
        ]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert!((result.total_assets - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_risk_distribution_values_and_percentages() {
        let map = profiles(vec![entry("a", "2024-06-01", 75_000.0, 25_000.0)]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert_eq!(result.risk_distribution.len(), 2);

        let high = &result.risk_distribution[0];
        let low = &result.risk_distribution[1];
        assert_eq!(high.name, HIGH_MEDIUM_RISK_LABEL);
        assert_eq!(low.name, LOW_RISK_LABEL);
        assert!((high.value - 75_000.0).abs() < 0.01);
        assert!((high.percentage - 75.0).abs() < 1e-9);
        assert!((low.percentage - 25.0).abs() < 1e-9);
        assert!((high.percentage + low.percentage - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_risk_distribution_empty_for_zero_total() {
        let map = profiles(vec![entry("a", "2024-06-01", 0.0, 0.0)]);
        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert!(result.risk_distribution.is_empty());
        // The zero entry still lands in the chart
        assert_eq!(result.chart_data.len(), 1);
    }

    #[test]
    fn test_risk_distribution_empty_for_inconsistent_totals() {
        let mut bad = entry("a", "2024-06-01", 100.0, 100.0);
        bad.total_assets = 500.0; // corrupted: not high+low
        let map = profiles(vec![bad]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert!(result.risk_distribution.is_empty());
        assert!((result.total_assets - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_chart_merges_profiles_sharing_a_date() {
        let map = profiles(vec![
            entry("a", "2024-06-01", 60_000.0, 40_000.0), // 100000
            entry("b", "2024-06-01", 150_000.0, 50_000.0), // 200000
        ]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert_eq!(result.chart_data.len(), 1);

        let point = &result.chart_data[0];
        assert!((point.total_assets - 300_000.0).abs() < 0.01);
        assert!((point.total_high_medium_risk - 210_000.0).abs() < 0.01);
        assert!((point.total_low_risk - 90_000.0).abs() < 0.01);
        // Individual fields merge too
        assert!((point.high_medium_risk.us_stocks - 210_000.0).abs() < 0.01);
        assert!((point.low_risk.cash - 90_000.0).abs() < 0.01);
    }

    #[test]
    fn test_chart_uses_all_entries_sorted_ascending() {
        let map = profiles(vec![
            entry("a", "2024-03-01", 10.0, 0.0),
            entry("a", "2024-01-01", 20.0, 0.0),
            entry("b", "2024-02-01", 30.0, 0.0),
        ]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        let dates: Vec<String> = result
            .chart_data
            .iter()
            .map(|p| p.date.to_string())
            .collect();
        assert_eq!(dates, ["2024-01-01", "2024-02-01", "2024-03-01"]);
    }

    #[test]
    fn test_chart_skips_invalid_dates() {
        let map = profiles(vec![
            entry("a", "2024-06-01", 10.0, 0.0),
            entry("a", "??", 99.0, 0.0),
        ]);

        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert_eq!(result.chart_data.len(), 1);
    }

    #[test]
    fn test_filter_entries_by_period_keeps_recent_in_order() {
        let entries = vec![
            entry("a", "2024-06-10", 1.0, 0.0),
            entry("a", "2024-01-01", 2.0, 0.0),
            entry("a", "2024-06-01", 3.0, 0.0),
        ];

        let filtered = filter_entries_by_period(&entries, TimePeriod::ThirtyDays, now());
        let dates: Vec<&str> = filtered.iter().map(|e| e.entry_date.as_str()).collect();
        // now is 2024-06-15, start 2024-05-16; order preserved, old one gone
        assert_eq!(dates, ["2024-06-10", "2024-06-01"]);
    }

    #[test]
    fn test_filter_entries_by_period_boundary_is_inclusive() {
        let entries = vec![entry("a", "2024-05-16", 1.0, 0.0)];
        let filtered = filter_entries_by_period(&entries, TimePeriod::ThirtyDays, now());
        assert_eq!(filtered.len(), 1);

        let entries = vec![entry("a", "2024-05-15", 1.0, 0.0)];
        assert!(filter_entries_by_period(&entries, TimePeriod::ThirtyDays, now()).is_empty());
    }

    #[test]
    fn test_filter_entries_by_period_empty_input() {
        assert!(filter_entries_by_period(&[], TimePeriod::OneYear, now()).is_empty());
    }

    #[test]
    fn test_filter_combined_drops_empty_profiles() {
        let map = profiles(vec![
            entry("recent", "2024-06-10", 1.0, 0.0),
            entry("stale", "2020-01-01", 2.0, 0.0),
        ]);

        let filtered = filter_combined_by_period(&map, TimePeriod::ThirtyDays, now());
        assert!(filtered.contains_key("recent"));
        assert!(!filtered.contains_key("stale"));
    }

    #[test]
    fn test_filter_combined_does_not_mutate_input() {
        let map = profiles(vec![entry("stale", "2020-01-01", 2.0, 0.0)]);
        let _ = filter_combined_by_period(&map, TimePeriod::ThirtyDays, now());
        assert_eq!(map["stale"].len(), 1);
    }

    #[test]
    fn test_group_entries_by_profile_preserves_order() {
        let grouped = group_entries_by_profile(vec![
            entry("a", "2024-01-02", 1.0, 0.0),
            entry("b", "2024-01-01", 2.0, 0.0),
            entry("a", "2024-01-03", 3.0, 0.0),
        ]);

        assert_eq!(grouped.len(), 2);
        let a_dates: Vec<&str> = grouped["a"].iter().map(|e| e.entry_date.as_str()).collect();
        assert_eq!(a_dates, ["2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn test_tolerance_is_respected_as_configured() {
        let mut slightly_off = entry("a", "2024-06-01", 100.0, 100.0);
        slightly_off.total_assets = 200.005; // within 0.01

        let map = profiles(vec![slightly_off]);
        let result = aggregate_combined_portfolio(&map, TOTALS_TOLERANCE);
        assert_eq!(result.risk_distribution.len(), 2);

        // A tighter tolerance rejects the same input
        let result = aggregate_combined_portfolio(&map, 0.001);
        assert!(result.risk_distribution.is_empty());
    }
}
