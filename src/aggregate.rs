//! Forecast aggregation
//!
//! Turns the provider's flat list of 3-hourly forecast samples into the
//! dashboard's view: one summary per calendar day (capped at 7) and a fixed
//! window of the first 8 samples. Pure transformation, no I/O.

use crate::models::{DailySummary, HourlySample};
use chrono::{DateTime, NaiveDate};

/// Daily summaries are capped at the first 7 distinct dates
pub const MAX_DAILY: usize = 7;
/// The hourly window is the first 8 input samples
pub const MAX_HOURLY: usize = 8;

/// One raw forecast data point at a specific timestamp
#[derive(Debug, Clone)]
pub struct ForecastSample {
    /// Unix epoch seconds
    pub timestamp: i64,
    /// Point temperature in °F
    pub temperature: f64,
    /// Sample minimum temperature in °F
    pub temp_min: f64,
    /// Sample maximum temperature in °F
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation in [0, 1]; absent means 0
    pub pop: Option<f64>,
}

impl ForecastSample {
    fn date(&self) -> NaiveDate {
        DateTime::from_timestamp(self.timestamp, 0)
            .unwrap_or_default()
            .date_naive()
    }

    fn precipitation_chance(&self) -> u8 {
        round_chance(self.pop.unwrap_or(0.0))
    }
}

/// Running per-day state; description/icon/pop are frozen at the first
/// sample of the day, only the temperature range keeps updating
struct DayAccumulator {
    date: NaiveDate,
    high: f64,
    low: f64,
    description: String,
    icon: String,
    precipitation_chance: u8,
}

impl DayAccumulator {
    fn seed(sample: &ForecastSample) -> Self {
        Self {
            date: sample.date(),
            high: sample.temp_max,
            low: sample.temp_min,
            description: sample.description.clone(),
            icon: sample.icon.clone(),
            precipitation_chance: sample.precipitation_chance(),
        }
    }

    fn update(&mut self, sample: &ForecastSample) {
        self.high = self.high.max(sample.temp_max);
        self.low = self.low.min(sample.temp_min);
    }

    fn into_summary(self) -> DailySummary {
        DailySummary {
            date: self.date.to_string(),
            day_name: self.date.format("%A").to_string(),
            high: round(self.high),
            low: round(self.low),
            description: self.description,
            icon: self.icon,
            precipitation_chance: self.precipitation_chance,
        }
    }
}

/// Group samples into per-day summaries, in the order each date first
/// appears, truncated to the first [`MAX_DAILY`] distinct dates
#[must_use]
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DailySummary> {
    // Single forward pass; a linear scan over the accumulators is fine for
    // the handful of distinct dates a forecast payload carries.
    let mut days: Vec<DayAccumulator> = Vec::new();

    for sample in samples {
        let date = sample.date();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.update(sample),
            None => days.push(DayAccumulator::seed(sample)),
        }
    }

    days.into_iter()
        .take(MAX_DAILY)
        .map(DayAccumulator::into_summary)
        .collect()
}

/// Project the first [`MAX_HOURLY`] samples unmodified except for rounding
#[must_use]
pub fn hourly_window(samples: &[ForecastSample]) -> Vec<HourlySample> {
    samples
        .iter()
        .take(MAX_HOURLY)
        .map(|sample| HourlySample {
            time: sample.timestamp,
            temperature: round(sample.temperature),
            description: sample.description.clone(),
            icon: sample.icon.clone(),
            precipitation_chance: sample.precipitation_chance(),
        })
        .collect()
}

fn round(value: f64) -> i32 {
    value.round() as i32
}

fn round_chance(pop: f64) -> u8 {
    (pop * 100.0).round().clamp(0.0, 100.0) as u8
}
