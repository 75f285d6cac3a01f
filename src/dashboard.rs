//! Dashboard statistics: status breakdown, pie-chart geometry, and the
//! 30-day answered series with its y-axis ticks.

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{DailyAnsweredRecord, Status, WordProgress};

/// Days shown in the answered-count chart, today included.
pub const CHART_DAYS: i64 = 30;
/// Smallest visible slice for a non-empty ok/ng segment, in degrees.
pub const MIN_VISIBLE_ANGLE: f64 = 2.0;
/// Pie geometry in SVG user units: a 160x160 viewBox.
pub const PIE_RADIUS: f64 = 70.0;
pub const PIE_CENTER: f64 = 80.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieAngles {
    pub ok: f64,
    pub ng: f64,
    pub unknown: f64,
}

/// SVG path per pie slice, drawn clockwise ok → ng → unknown from 12 o'clock.
/// Empty slices have no path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieSlices {
    pub ok: Option<String>,
    pub ng: Option<String>,
    pub unknown: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_words: usize,
    pub ok_count: usize,
    pub ng_count: usize,
    pub unknown_count: usize,
    pub ok_percent: f64,
    pub ng_percent: f64,
    pub unknown_percent: f64,
    /// Rounded share of mastered words.
    pub progress_percent: u32,
    pub total_answered: usize,
    pub pie: PieAngles,
    pub slices: PieSlices,
    pub daily: Vec<DailyPoint>,
    pub y_axis: Vec<u32>,
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Slice angles in degrees for ok / ng / unknown.
pub fn pie_angles(ok: usize, ng: usize, unknown: usize, total: usize) -> PieAngles {
    let mut ok_angle = percent(ok, total) * 3.6;
    let mut ng_angle = percent(ng, total) * 3.6;
    let mut unknown_angle = percent(unknown, total) * 3.6;

    if ok > 0 && ok_angle > 0.0 && ok_angle < MIN_VISIBLE_ANGLE {
        ok_angle = MIN_VISIBLE_ANGLE;
    }
    if ng > 0 && ng_angle > 0.0 && ng_angle < MIN_VISIBLE_ANGLE {
        ng_angle = MIN_VISIBLE_ANGLE;
    }

    let sum = ok_angle + ng_angle + unknown_angle;
    if sum > 360.0 {
        unknown_angle = (unknown_angle - (sum - 360.0)).max(0.0);
    } else if sum < 360.0 && unknown > 0 {
        unknown_angle = 360.0 - ok_angle - ng_angle;
    }

    PieAngles {
        ok: ok_angle,
        ng: ng_angle,
        unknown: unknown_angle,
    }
}

/// Point on a circle; 0° is 12 o'clock, angles grow clockwise.
fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let rad = (degrees - 90.0).to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// SVG path for a pie slice from `start` to `end` degrees.
pub fn arc_path(start: f64, end: f64, radius: f64, cx: f64, cy: f64) -> String {
    if end - start >= 360.0 {
        return format!(
            "M {cx} {cy} m -{r}, 0 a {r},{r} 0 1,0 {d},0 a {r},{r} 0 1,0 -{d},0",
            r = radius,
            d = radius * 2.0
        );
    }
    let (sx, sy) = polar_to_cartesian(cx, cy, radius, start);
    let (ex, ey) = polar_to_cartesian(cx, cy, radius, end);
    let large_arc = if end - start > 180.0 { 1 } else { 0 };
    format!("M {cx} {cy} L {sx} {sy} A {radius} {radius} 0 {large_arc} 1 {ex} {ey} Z")
}

pub fn pie_slices(pie: &PieAngles) -> PieSlices {
    let slice = |start: f64, angle: f64| {
        (angle > 0.0).then(|| arc_path(start, start + angle, PIE_RADIUS, PIE_CENTER, PIE_CENTER))
    };
    PieSlices {
        ok: slice(0.0, pie.ok),
        ng: slice(pie.ok, pie.ng),
        unknown: slice(pie.ok + pie.ng, pie.unknown),
    }
}

/// Counts for the `CHART_DAYS` days ending at `today`, oldest first.
pub fn daily_series(records: &[DailyAnsweredRecord], today: NaiveDate) -> Vec<DailyPoint> {
    let by_date: HashMap<&str, u32> = records.iter().map(|r| (r.date.as_str(), r.count)).collect();
    (0..CHART_DAYS)
        .rev()
        .map(|back| {
            let date = (today - Duration::days(back)).format("%Y-%m-%d").to_string();
            let count = by_date.get(date.as_str()).copied().unwrap_or(0);
            DailyPoint { date, count }
        })
        .collect()
}

/// Y-axis tick labels, highest first.
pub fn y_axis_labels(series: &[DailyPoint]) -> Vec<u32> {
    let max = series.iter().map(|p| p.count).max().unwrap_or(0);
    if max == 0 {
        return vec![0];
    }
    if max <= 5 {
        return (0..=max).rev().collect();
    }
    let m = f64::from(max);
    let steps: BTreeSet<u32> = [
        max,
        (m * 0.75).ceil() as u32,
        (m * 0.5).ceil() as u32,
        (m * 0.25).ceil() as u32,
        0,
    ]
    .into_iter()
    .collect();
    steps.into_iter().rev().collect()
}

pub fn compute(
    total_words: usize,
    progress: &[WordProgress],
    total_answered: usize,
    daily: &[DailyAnsweredRecord],
    today: NaiveDate,
) -> DashboardStats {
    let ok = progress.iter().filter(|p| p.status == Status::Ok).count();
    let ng = progress.iter().filter(|p| p.status == Status::Ng).count();
    let unknown = total_words.saturating_sub(ok + ng);
    let pie = pie_angles(ok, ng, unknown, total_words);

    let ok_percent = percent(ok, total_words);
    let series = daily_series(daily, today);
    let y_axis = y_axis_labels(&series);

    DashboardStats {
        total_words,
        ok_count: ok,
        ng_count: ng,
        unknown_count: unknown,
        ok_percent,
        ng_percent: percent(ng, total_words),
        unknown_percent: percent(unknown, total_words),
        progress_percent: ok_percent.round() as u32,
        total_answered,
        slices: pie_slices(&pie),
        pie,
        daily: series,
        y_axis,
    }
}
