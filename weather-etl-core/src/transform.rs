//! Reshapes the provider's parallel daily arrays into one row per day.

use chrono::NaiveDate;

use crate::model::{DailySeries, DailyVariable, DateRange, WeatherObservation};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShapeError {
    #[error("daily variable '{variable}' has {actual} entries but the date axis has {expected}")]
    LengthMismatch { variable: DailyVariable, expected: usize, actual: usize },

    #[error("response dates do not match requested window {range}: {detail}")]
    WindowMismatch { range: DateRange, detail: String },
}

/// Build one observation per index of `series.time`.
///
/// All variable arrays must have exactly as many entries as the date axis.
pub fn to_observations(series: DailySeries) -> Result<Vec<WeatherObservation>, ShapeError> {
    let expected = series.time.len();
    let lengths = [
        (DailyVariable::TemperatureMax, series.temperature_2m_max.len()),
        (DailyVariable::TemperatureMin, series.temperature_2m_min.len()),
        (DailyVariable::PrecipitationSum, series.precipitation_sum.len()),
        (DailyVariable::WeatherCode, series.weathercode.len()),
    ];
    if let Some((variable, actual)) = lengths.into_iter().find(|(_, len)| *len != expected) {
        return Err(ShapeError::LengthMismatch { variable, expected, actual });
    }

    let rows = series
        .time
        .into_iter()
        .zip(series.temperature_2m_max)
        .zip(series.temperature_2m_min)
        .zip(series.precipitation_sum)
        .zip(series.weathercode)
        .map(|((((date, tmax), tmin), precip), code)| WeatherObservation {
            date,
            max_temperature_celsius: tmax,
            min_temperature_celsius: tmin,
            precipitation_millimeters: precip,
            weather_code: code,
        })
        .collect();

    Ok(rows)
}

/// Check that the rows cover `range` exactly, one per day, in order.
pub fn check_window(range: &DateRange, rows: &[WeatherObservation]) -> Result<(), ShapeError> {
    let mismatch = |detail: String| ShapeError::WindowMismatch { range: *range, detail };

    if rows.len() != range.num_days() {
        return Err(mismatch(format!("expected {} days, got {}", range.num_days(), rows.len())));
    }

    let misplaced: Option<(NaiveDate, NaiveDate)> = range
        .days()
        .zip(rows.iter().map(|row| row.date))
        .find(|(want, got)| want != got);

    match misplaced {
        Some((want, got)) => Err(mismatch(format!("expected {want}, got {got}"))),
        None => Ok(()),
    }
}
