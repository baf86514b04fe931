//! Rainfall trend analysis and stress projection
//!
//! The projection is a heuristic: the trend shifts the current rainfall
//! deviation, the shifted deviation is turned back into an absolute rainfall
//! figure, and the stress model is re-run on it. It is not a weather model.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{
    ForecastResult, RainfallRecord, RainfallTrend, RiskLevel, StressProjection, TrendResult, Village,
};
use crate::stress::compute_stress;
use crate::types::round_to;

/// Days covered by the weekly buckets
pub const TREND_WINDOW_DAYS: i64 = 28;

/// Relative change between the two fortnights that counts as a trend
pub const TREND_THRESHOLD_PCT: f64 = 15.0;

/// Bucket the last four weeks of rainfall and classify the trend.
///
/// `today` is day 0. Records older than 27 days or dated after `today` do
/// not count toward the weekly totals but still feed the moving average.
pub fn compute_rainfall_trend(records: &[RainfallRecord], today: NaiveDate) -> TrendResult {
    let mut sorted: Vec<&RainfallRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let mut weekly_totals = [0.0f64; 4];
    for record in &sorted {
        let days_ago = (today - record.date).num_days();
        if !(0..TREND_WINDOW_DAYS).contains(&days_ago) {
            continue;
        }
        let week_idx = 3 - (days_ago / 7) as usize;
        weekly_totals[week_idx] += record.rain_mm;
    }
    for total in weekly_totals.iter_mut() {
        *total = round_to(*total, 1);
    }

    let daily: Vec<f64> = sorted.iter().map(|r| r.rain_mm).collect();
    let moving_avg_7d = daily
        .windows(7)
        .map(|window| round_to(window.iter().sum::<f64>() / 7.0, 2))
        .collect();

    TrendResult {
        weekly_totals,
        moving_avg_7d,
        trend: classify_trend(&weekly_totals),
    }
}

/// Compare the most recent fortnight against the one before it
pub fn classify_trend(weekly_totals: &[f64; 4]) -> RainfallTrend {
    let recent_avg = (weekly_totals[2] + weekly_totals[3]) / 2.0;
    let prior_avg = (weekly_totals[0] + weekly_totals[1]) / 2.0;

    if prior_avg == 0.0 && recent_avg == 0.0 {
        return RainfallTrend::Stable;
    }
    if prior_avg == 0.0 {
        return RainfallTrend::Improving;
    }

    let change = (recent_avg - prior_avg) / prior_avg * 100.0;
    if change < -TREND_THRESHOLD_PCT {
        RainfallTrend::Declining
    } else if change > TREND_THRESHOLD_PCT {
        RainfallTrend::Improving
    } else {
        RainfallTrend::Stable
    }
}

/// Project a village's stress one trend-step forward
pub fn forecast_stress(village: &Village, trend: RainfallTrend) -> StressProjection {
    let projected_deviation = village.rainfall_deviation + trend.deviation_shift();
    let projected_rainfall =
        (village.historical_avg_rainfall_mm * (1.0 + projected_deviation / 100.0)).max(0.0);

    let projected = compute_stress(
        projected_rainfall,
        village.historical_avg_rainfall_mm,
        village.groundwater_depth_m,
        village.population,
    );

    let delta = i64::from(projected.stress_score) - i64::from(village.stress_score);

    StressProjection {
        projected_score: projected.stress_score,
        projected_demand: projected.tanker_demand,
        risk_level: RiskLevel::from_delta(delta),
    }
}

/// Trend plus projection for a single village
pub fn forecast_village(village: &Village, records: &[RainfallRecord], today: NaiveDate) -> ForecastResult {
    let trend = compute_rainfall_trend(records, today);
    let projection = forecast_stress(village, trend.trend);

    ForecastResult {
        village_id: village.id.clone(),
        village_name: village.name.clone(),
        district: village.district.clone(),
        current_score: village.stress_score,
        projected_score: projection.projected_score,
        current_demand: village.tanker_demand,
        projected_demand: projection.projected_demand,
        risk_level: projection.risk_level,
        trend: trend.trend,
        weekly_rainfall: trend.weekly_totals,
    }
}

/// Forecast every village, rising risk first, then by projected score.
///
/// Records are matched to villages by `village_id`; a village without
/// records forecasts as a stable trend.
pub fn forecast_all(villages: &[Village], records: &[RainfallRecord], today: NaiveDate) -> Vec<ForecastResult> {
    let mut by_village: HashMap<&str, Vec<RainfallRecord>> = HashMap::new();
    for record in records {
        by_village
            .entry(record.village_id.as_str())
            .or_default()
            .push(record.clone());
    }

    let mut forecasts: Vec<ForecastResult> = villages
        .iter()
        .map(|village| {
            let series = by_village
                .get(village.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            forecast_village(village, series, today)
        })
        .collect();

    sort_forecasts(&mut forecasts);
    forecasts
}

/// Display order: rising, steady, falling; higher projected score first
pub fn sort_forecasts(forecasts: &mut [ForecastResult]) {
    forecasts.sort_by(|a, b| {
        a.risk_level
            .cmp(&b.risk_level)
            .then_with(|| b.projected_score.cmp(&a.projected_score))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GpsCoordinates;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
    }

    fn record(days_ago: i64, rain_mm: f64) -> RainfallRecord {
        RainfallRecord {
            village_id: "VIL-001".to_string(),
            date: today() - Duration::days(days_ago),
            rain_mm,
        }
    }

    fn village(stress: u32, deviation: f64) -> Village {
        Village {
            id: "VIL-001".to_string(),
            name: "Ashti".to_string(),
            district: "Beed".to_string(),
            coordinates: GpsCoordinates::new(18.8, 75.2),
            population: 25_000,
            stress_score: stress,
            rainfall_deviation: deviation,
            groundwater_depth_m: 10.0,
            historical_avg_rainfall_mm: 100.0,
            tanker_demand: 0,
            has_active_dispatch: false,
        }
    }

    #[test]
    fn test_weekly_buckets() {
        let records = vec![
            record(0, 1.0),
            record(6, 2.0),
            record(7, 3.0),
            record(13, 4.0),
            record(14, 5.0),
            record(21, 6.0),
            record(27, 7.0),
            record(28, 100.0),
            record(-1, 100.0),
        ];
        let result = compute_rainfall_trend(&records, today());
        assert_eq!(result.weekly_totals, [13.0, 5.0, 7.0, 3.0]);
    }

    #[test]
    fn test_weekly_totals_round_to_one_decimal() {
        let records = vec![record(0, 0.04), record(1, 0.04), record(2, 0.04)];
        let result = compute_rainfall_trend(&records, today());
        assert_eq!(result.weekly_totals[3], 0.1);
    }

    #[test]
    fn test_moving_average_needs_seven_days() {
        let short: Vec<RainfallRecord> = (0..6).map(|d| record(d, 7.0)).collect();
        assert!(compute_rainfall_trend(&short, today()).moving_avg_7d.is_empty());

        let long: Vec<RainfallRecord> = (0..9).rev().map(|d| record(d, d as f64)).collect();
        let result = compute_rainfall_trend(&long, today());
        // Sorted ascending by date the series is 8, 7, ..., 0
        assert_eq!(result.moving_avg_7d, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_moving_average_sorts_by_date() {
        let records: Vec<RainfallRecord> = (0..7).map(|d| record(d, 7.0)).collect();
        let result = compute_rainfall_trend(&records, today());
        assert_eq!(result.moving_avg_7d, vec![7.0]);
    }

    #[test]
    fn test_classify_trend() {
        assert_eq!(classify_trend(&[40.0, 35.0, 10.0, 8.0]), RainfallTrend::Declining);
        assert_eq!(classify_trend(&[10.0, 10.0, 20.0, 20.0]), RainfallTrend::Improving);
        assert_eq!(classify_trend(&[10.0, 10.0, 11.0, 10.0]), RainfallTrend::Stable);
        assert_eq!(classify_trend(&[0.0, 0.0, 0.0, 0.0]), RainfallTrend::Stable);
        assert_eq!(classify_trend(&[0.0, 0.0, 0.0, 0.5]), RainfallTrend::Improving);
    }

    #[test]
    fn test_empty_series_is_stable() {
        let result = compute_rainfall_trend(&[], today());
        assert_eq!(result.weekly_totals, [0.0; 4]);
        assert!(result.moving_avg_7d.is_empty());
        assert_eq!(result.trend, RainfallTrend::Stable);
    }

    #[test]
    fn test_declining_trend_raises_projected_stress() {
        // Current: deviation -20 -> 33.3, groundwater 50, population 50 -> 43
        let v = village(43, -20.0);
        let projection = forecast_stress(&v, RainfallTrend::Declining);
        // Projected: deviation -30 -> 50 -> 20 + 20 + 10
        assert_eq!(projection.projected_score, 50);
        assert_eq!(projection.risk_level, RiskLevel::Rising);
    }

    #[test]
    fn test_improving_trend_lowers_projected_stress() {
        let v = village(50, -30.0);
        let projection = forecast_stress(&v, RainfallTrend::Improving);
        // deviation -22 -> 36.67 -> 14.67 + 20 + 10 = 44.67
        assert_eq!(projection.projected_score, 45);
        assert_eq!(projection.risk_level, RiskLevel::Falling);
    }

    #[test]
    fn test_stable_trend_keeps_score() {
        let v = village(43, -20.0);
        let projection = forecast_stress(&v, RainfallTrend::Stable);
        assert_eq!(projection.projected_score, 43);
        assert_eq!(projection.risk_level, RiskLevel::Steady);
    }

    #[test]
    fn test_projected_rainfall_floors_at_zero() {
        let v = village(60, -95.0);
        let projection = forecast_stress(&v, RainfallTrend::Declining);
        // deviation clamps at -100: 40 + 20 + 10
        assert_eq!(projection.projected_score, 70);
    }

    #[test]
    fn test_forecast_all_orders_by_risk_then_score() {
        let mut rising = village(43, -20.0);
        rising.id = "rising".to_string();
        let mut steady_high = village(63, -20.0);
        steady_high.id = "steady-high".to_string();
        steady_high.groundwater_depth_m = 20.0;
        let mut steady_low = village(43, -20.0);
        steady_low.id = "steady-low".to_string();

        let mut records: Vec<RainfallRecord> = Vec::new();
        for (days_ago, rain) in [(25, 40.0), (18, 35.0), (10, 10.0), (3, 8.0)] {
            records.push(RainfallRecord {
                village_id: "rising".to_string(),
                date: today() - Duration::days(days_ago),
                rain_mm: rain,
            });
        }

        let forecasts = forecast_all(&[steady_low, steady_high, rising], &records, today());
        let ids: Vec<&str> = forecasts.iter().map(|f| f.village_id.as_str()).collect();

        assert_eq!(ids, vec!["rising", "steady-high", "steady-low"]);
        assert_eq!(forecasts[0].trend, RainfallTrend::Declining);
        assert_eq!(forecasts[0].weekly_rainfall, [40.0, 35.0, 10.0, 8.0]);
    }
}
