use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One calendar day's weather summary at the fixed coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub max_temperature_celsius: Option<f64>,
    pub min_temperature_celsius: Option<f64>,
    pub precipitation_millimeters: Option<f64>,
    /// WMO weather code as reported by the provider. Stored, never interpreted.
    pub weather_code: Option<i32>,
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Number of days in the range, both ends included. Zero for an inverted range.
    pub fn num_days(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every date of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days() as u64).filter_map(move |offset| start.checked_add_days(Days::new(offset)))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// The `daily` section of a forecast response: a date axis plus one parallel
/// array per requested variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(alias = "weather_code")]
    pub weathercode: Vec<Option<i32>>,
}

/// Daily variables requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyVariable {
    TemperatureMax,
    TemperatureMin,
    PrecipitationSum,
    WeatherCode,
}

impl DailyVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyVariable::TemperatureMax => "temperature_2m_max",
            DailyVariable::TemperatureMin => "temperature_2m_min",
            DailyVariable::PrecipitationSum => "precipitation_sum",
            DailyVariable::WeatherCode => "weathercode",
        }
    }

    pub const fn all() -> &'static [DailyVariable] {
        &[
            DailyVariable::TemperatureMax,
            DailyVariable::TemperatureMin,
            DailyVariable::PrecipitationSum,
            DailyVariable::WeatherCode,
        ]
    }

    /// Comma-joined wire names, as expected by the `daily` query parameter.
    pub fn query_value() -> String {
        Self::all().iter().map(|v| v.as_str()).collect::<Vec<_>>().join(",")
    }
}

impl std::fmt::Display for DailyVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_query_value_lists_all_variables_in_order() {
        assert_eq!(
            DailyVariable::query_value(),
            "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode"
        );
    }

    #[test]
    fn range_days_are_inclusive() {
        let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 1));
        let days: Vec<_> = range.days().collect();

        assert_eq!(range.num_days(), 4);
        assert_eq!(days, vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::new(date(2024, 5, 3), date(2024, 5, 1));
        assert!(!range.is_valid());
        assert_eq!(range.num_days(), 0);
        assert_eq!(range.days().count(), 0);
    }

    #[test]
    fn daily_series_accepts_new_weather_code_name() {
        let json = r#"{
            "time": ["2024-05-01"],
            "temperature_2m_max": [20.1],
            "temperature_2m_min": [null],
            "precipitation_sum": [0.0],
            "weather_code": [3]
        }"#;

        let series: DailySeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.weathercode, vec![Some(3)]);
        assert_eq!(series.temperature_2m_min, vec![None]);
    }
}
