use async_trait::async_trait;
use chrono::Utc;
use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::gemini::{FLASH_MODEL, GeminiClient, GenerateRequest, PRO_MODEL};
use crate::model::WeatherReport;

/// Prompt for the raw weather query. The caller gets the model's text
/// back verbatim; "JSON format" here is an instruction to the model,
/// not a guarantee.
pub fn weather_prompt(location: &str) -> String {
    format!("Current weather in {location}, India in JSON format.")
}

/// Prompt for the full typed report: current conditions plus air
/// quality, 12 hourly entries and a 7-day outlook, keyed the way
/// [`WeatherReport`] expects.
pub fn report_prompt(location: &str) -> String {
    format!(
        "Retrieve absolute current, real-time weather and air quality analytics \
         for {location}, India. Include a detailed hourly forecast for the next \
         12 hours (e.g., \"1 PM\", \"2 PM\") and a daily forecast for the next \
         7 days. Source data from IMD (India Meteorological Dept), CPCB, and \
         reputable live news. Respond with a single JSON object using exactly \
         these keys: city, temperature, humidity, windSpeed, visibility, \
         uvIndex, pressure, condition, rainProbability, airDensity, aqi, \
         pollution {{pm25, pm10, no2, o3}}, forecast [{{day, temp, condition}}], \
         hourlyForecast [{{time, temp, condition}}], aiInsights."
    )
}

/// Seam between the CLI and the remote service. The Gemini client is
/// the only production implementation; tests substitute their own.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Raw weather answer for a location, returned verbatim.
    async fn weather_text(&self, location: &str) -> Result<String>;

    /// Typed report parsed from the model's JSON answer.
    async fn weather_report(&self, location: &str) -> Result<WeatherReport>;
}

#[async_trait]
impl WeatherSource for GeminiClient {
    async fn weather_text(&self, location: &str) -> Result<String> {
        let request =
            GenerateRequest::new(FLASH_MODEL, weather_prompt(location)).with_search_grounding();

        Ok(self.generate(&request).await?.text)
    }

    async fn weather_report(&self, location: &str) -> Result<WeatherReport> {
        let request = GenerateRequest::new(PRO_MODEL, report_prompt(location))
            .with_search_grounding()
            .with_json_response();

        let response = self.generate(&request).await?;

        let mut report: WeatherReport =
            serde_json::from_str(&response.text).map_err(Error::MalformedReport)?;

        report.sources = response.sources;
        report.fetched_at = Utc::now();

        Ok(report)
    }
}
