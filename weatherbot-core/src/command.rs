//! Platform-neutral bot commands and their handling.

use anyhow::{Context, Result, anyhow, bail};
use log::{info, warn};
use std::{str::FromStr, sync::Arc};

use crate::{
    Config,
    advisor::RecommendationInput,
    convert::{celsius_to_fahrenheit, fahrenheit_to_celsius},
    message::{Reply, air_quality_embed, current_embed, forecast_embed},
    provider::WeatherProvider,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Weather { city: String },
    Forecast { city: String },
    AirQuality { city: String },
    RecommendF { description: String, degree: f64 },
    RecommendC { description: String, degree: f64 },
    FahrenheitToCelsius { degree: f64 },
    CelsiusToFahrenheit { degree: f64 },
    Shutdown,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Weather { .. } => "weather",
            Command::Forecast { .. } => "forecast",
            Command::AirQuality { .. } => "airquality",
            Command::RecommendF { .. } => "getrecommendation_f",
            Command::RecommendC { .. } => "getrecommendation_c",
            Command::FahrenheitToCelsius { .. } => "f_to_c",
            Command::CelsiusToFahrenheit { .. } => "c_to_f",
            Command::Shutdown => "shutdown",
        }
    }

    /// Reply for commands answered without any lookup; `None` for the rest.
    pub fn local_reply(&self) -> Option<Reply> {
        let text = match self {
            Command::RecommendF { description, degree } => {
                RecommendationInput::fahrenheit(description.as_str(), *degree)
                    .advise()
                    .to_string()
            }
            Command::RecommendC { description, degree } => {
                RecommendationInput::celsius(description.as_str(), *degree)
                    .advise()
                    .to_string()
            }
            Command::FahrenheitToCelsius { degree } => format!(
                "The degree in Celsius is {:.2}°C.",
                fahrenheit_to_celsius(*degree)
            ),
            Command::CelsiusToFahrenheit { degree } => format!(
                "The degree in Fahrenheit is {:.2}°F.",
                celsius_to_fahrenheit(*degree)
            ),
            Command::Weather { .. }
            | Command::Forecast { .. }
            | Command::AirQuality { .. }
            | Command::Shutdown => return None,
        };
        Some(Reply::Text(text))
    }
}

/// Parses a chat line such as `/weather New York` or
/// `/getrecommendation_c light rain 12`.
impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let city = || -> Result<String> {
            if rest.is_empty() {
                bail!("/{name} needs a city");
            }
            Ok(rest.to_string())
        };
        let degree = |text: &str| -> Result<f64> {
            text.parse()
                .with_context(|| format!("'{text}' is not a number"))
        };
        let description_and_degree = || -> Result<(String, f64)> {
            let (description, value) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("/{name} needs a description and a degree"))?;
            Ok((description.trim().to_string(), degree(value)?))
        };

        let cmd = match name.to_lowercase().as_str() {
            "weather" => Command::Weather { city: city()? },
            "forecast" => Command::Forecast { city: city()? },
            "airquality" => Command::AirQuality { city: city()? },
            "getrecommendation_f" | "recommend-f" => {
                let (description, degree) = description_and_degree()?;
                Command::RecommendF { description, degree }
            }
            "getrecommendation_c" | "recommend-c" => {
                let (description, degree) = description_and_degree()?;
                Command::RecommendC { description, degree }
            }
            "f_to_c" | "f-to-c" => Command::FahrenheitToCelsius {
                degree: degree(rest)?,
            },
            "c_to_f" | "c-to-f" => Command::CelsiusToFahrenheit {
                degree: degree(rest)?,
            },
            "shutdown" => Command::Shutdown,
            "" => bail!("empty command"),
            other => bail!("Unknown command '/{other}'"),
        };

        Ok(cmd)
    }
}

/// Result of handling one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reply: Reply,
    /// Set when the owner asked the bot to stop.
    pub shutdown: bool,
}

impl From<Reply> for Outcome {
    fn from(reply: Reply) -> Self {
        Self {
            reply,
            shutdown: false,
        }
    }
}

/// Turns commands into replies. Never fails: lookups that produce no data
/// become an apology.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    provider: Arc<dyn WeatherProvider>,
    config: Config,
}

impl CommandHandler {
    pub fn new(provider: Arc<dyn WeatherProvider>, config: &Config) -> Self {
        Self {
            provider,
            config: config.clone(),
        }
    }

    pub async fn handle(&self, user_id: u64, cmd: Command) -> Outcome {
        info!("/{} from user {user_id}", cmd.name());

        let reply = match cmd {
            Command::Weather { city } => match self.provider.fetch_current(&city).await {
                Ok(snap) => Reply::from(current_embed(&snap)),
                Err(e) => {
                    warn!("weather lookup for '{city}' failed: {e}");
                    Reply::text(format!("Sorry, I couldn't find the weather for {city}."))
                }
            },
            Command::Forecast { city } => match self.provider.fetch_forecast(&city).await {
                Ok(snap) => Reply::from(forecast_embed(&snap)),
                Err(e) => {
                    warn!("forecast lookup for '{city}' failed: {e}");
                    Reply::text(format!("Sorry, I couldn't find the forecast for {city}."))
                }
            },
            Command::AirQuality { city } => match self.provider.fetch_air_quality(&city).await {
                Ok(snap) => Reply::from(air_quality_embed(&snap)),
                Err(e) => {
                    warn!("air quality lookup for '{city}' failed: {e}");
                    Reply::text(format!(
                        "Sorry, I couldn't find the air quality data for {city}."
                    ))
                }
            },
            Command::Shutdown => return self.shutdown(user_id),
            local => local
                .local_reply()
                .unwrap_or_else(|| Reply::text("Sorry, I couldn't find the recommendation.")),
        };

        reply.into()
    }

    fn shutdown(&self, user_id: u64) -> Outcome {
        if self.config.is_owner(user_id) {
            info!("shutdown requested by owner");
            Outcome {
                reply: Reply::text("Shutting down..."),
                shutdown: true,
            }
        } else {
            warn!("user {user_id} tried to shut the bot down");
            Reply::text("You do not have permission to use this command.").into()
        }
    }
}
