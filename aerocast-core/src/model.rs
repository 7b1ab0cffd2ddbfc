use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A search-grounding attribution returned alongside a generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Pollutant breakdown in µg/m³.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pollution {
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
}

/// One day of the 7-day outlook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub day: String,
    pub temp: f64,
    pub condition: String,
}

/// One hour of the 12-hour outlook, e.g. time = "1 PM".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: String,
    pub temp: f64,
    pub condition: String,
}

/// Typed weather report parsed from the model's JSON answer.
///
/// Field names follow the camelCase keys the prompt asks the model to
/// emit; `sources` and `fetched_at` are filled in locally after the
/// payload parses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub visibility: f64,
    pub uv_index: f64,
    pub pressure: f64,
    pub condition: String,
    pub rain_probability: f64,
    /// kg/m³
    pub air_density: f64,
    pub aqi: f64,
    pub pollution: Pollution,
    pub forecast: Vec<DailyForecast>,
    pub hourly_forecast: Vec<HourlyForecast>,
    pub ai_insights: String,

    #[serde(default)]
    pub sources: Vec<Source>,

    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "city": "Mumbai",
        "temperature": 31.2,
        "humidity": 74,
        "windSpeed": 14.5,
        "visibility": 6,
        "uvIndex": 8,
        "pressure": 1004,
        "condition": "Partly cloudy",
        "rainProbability": 40,
        "airDensity": 1.16,
        "aqi": 152,
        "pollution": { "pm25": 62.1, "pm10": 110.4, "no2": 38.0, "o3": 21.5 },
        "forecast": [
            { "day": "Tuesday", "temp": 32, "condition": "Sunny" }
        ],
        "hourlyForecast": [
            { "time": "1 PM", "temp": 31, "condition": "Hazy" }
        ],
        "aiInsights": "Air quality is poor; limit outdoor activity."
    }"#;

    #[test]
    fn report_parses_camel_case_model_output() {
        let report: WeatherReport = serde_json::from_str(SAMPLE).expect("sample must parse");

        assert_eq!(report.city, "Mumbai");
        assert_eq!(report.pollution.pm25, 62.1);
        assert_eq!(report.forecast[0].day, "Tuesday");
        assert_eq!(report.hourly_forecast[0].time, "1 PM");
        // Locally-filled fields default when absent from the payload.
        assert!(report.sources.is_empty());
    }

    #[test]
    fn report_missing_required_field_fails() {
        let truncated = SAMPLE.replace("\"city\": \"Mumbai\",", "");
        let result: Result<WeatherReport, _> = serde_json::from_str(&truncated);
        assert!(result.is_err());
    }
}
