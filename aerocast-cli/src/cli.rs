use clap::{Parser, Subcommand};

use aerocast_core::{Config, Error, GeminiClient, WeatherReport, WeatherSource};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "aerocast", version, about = "AeroCast weather assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Gemini API key in the config file.
    Configure,

    /// Send a fixed greeting to verify the credential and connectivity.
    Check,

    /// Show current weather and air quality for a location in India.
    Weather {
        /// City or locality name, e.g. "Mumbai".
        location: String,

        /// Print the model's raw text answer instead of the parsed report.
        #[arg(long)]
        raw: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Check => {
                let Some(client) = client_or_report()? else { return Ok(()) };
                let text = client.hello().await?;
                println!("{text}");
                Ok(())
            }
            Command::Weather { location, raw } => {
                let Some(client) = client_or_report()? else { return Ok(()) };

                if raw {
                    let text = client.weather_text(&location).await?;
                    println!("{text}");
                } else {
                    let report = client.weather_report(&location).await?;
                    print_report(&report);
                }

                Ok(())
            }
        }
    }
}

/// Build a client from env/config, or print the configuration error and
/// return `None`. A missing key is a soft failure: one fixed message,
/// no network request, successful exit.
fn client_or_report() -> anyhow::Result<Option<GeminiClient>> {
    let config = Config::load()?;

    match config.resolve_api_key() {
        Ok(api_key) => Ok(Some(GeminiClient::new(api_key))),
        Err(err @ Error::MissingApiKey) => {
            println!("Error: {err}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn configure() -> anyhow::Result<()> {
    let api_key = inquire::Password::new("Gemini API key:")
        .without_confirmation()
        .prompt()?;

    let mut config = Config::load()?;
    config.set_api_key(api_key);
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_report(report: &WeatherReport) {
    println!("Weather for {} (fetched {})", report.city, report.fetched_at.format("%H:%M UTC"));
    println!("  {}  {:.1}°C", report.condition, report.temperature);
    println!("  Humidity {:.0}%  Wind {:.1} km/h  Pressure {:.0} hPa", report.humidity, report.wind_speed, report.pressure);
    println!("  Visibility {:.0} km  UV index {:.0}  Rain {:.0}%", report.visibility, report.uv_index, report.rain_probability);
    println!(
        "  AQI {:.0}  (PM2.5 {:.0}, PM10 {:.0}, NO2 {:.0}, O3 {:.0})  air density {:.2} kg/m³",
        report.aqi,
        report.pollution.pm25,
        report.pollution.pm10,
        report.pollution.no2,
        report.pollution.o3,
        report.air_density,
    );

    if !report.hourly_forecast.is_empty() {
        println!("  Next hours:");
        for hour in &report.hourly_forecast {
            println!("    {:>5}  {:.0}°C  {}", hour.time, hour.temp, hour.condition);
        }
    }

    if !report.forecast.is_empty() {
        println!("  Next days:");
        for day in &report.forecast {
            println!("    {:>9}  {:.0}°C  {}", day.day, day.temp, day.condition);
        }
    }

    if !report.ai_insights.is_empty() {
        println!("  Insights: {}", report.ai_insights);
    }

    if !report.sources.is_empty() {
        println!("  Sources:");
        for source in &report.sources {
            println!("    {} ({})", source.title, source.uri);
        }
    }
}
