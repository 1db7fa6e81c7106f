//! Rich chat messages and how each snapshot is rendered into one.

use serde::Serialize;
use std::fmt;

use crate::model::{AirQualitySnapshot, ForecastSnapshot, WeatherSnapshot};

/// Embed accent colours, as RGB integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Blue,
    Green,
    Red,
}

impl Color {
    pub fn rgb(&self) -> u32 {
        match self {
            Color::Blue => 0x3498db,
            Color::Green => 0x2ecc71,
            Color::Red => 0xe74c3c,
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.rgb())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

/// Field names follow Discord's embed object so it can be posted as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.into(),
            description: None,
            color,
            image: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(EmbedImage { url: url.into() });
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

impl fmt::Display for Embed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        if let Some(description) = &self.description {
            writeln!(f, "{description}")?;
        }
        for field in &self.fields {
            writeln!(f, "\n[{}]\n{}", field.name, field.value)?;
        }
        if let Some(image) = &self.image {
            writeln!(f, "\n{}", image.url)?;
        }
        Ok(())
    }
}

/// What the bot says back: plain text or an embed.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }
}

impl From<Embed> for Reply {
    fn from(embed: Embed) -> Self {
        Reply::Embed(embed)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Text(text) => f.write_str(text),
            Reply::Embed(embed) => write!(f, "{embed}"),
        }
    }
}

fn conditions(
    description: &str,
    temperature_f: f64,
    humidity_pct: u8,
    wind_speed_mph: f64,
) -> String {
    format!(
        "{description}\nTemperature: {temperature_f}°F\nHumidity: {humidity_pct}%\nWind Speed: {wind_speed_mph} mph"
    )
}

pub fn current_embed(snap: &WeatherSnapshot) -> Embed {
    let body = conditions(
        &snap.description,
        snap.temperature_f,
        snap.humidity_pct,
        snap.wind_speed_mph,
    );

    Embed::new(format!("Weather in {}", snap.city_name), Color::Blue)
        .description(format!("{body}\n\n{}", snap.advisory))
        .image(snap.image_url)
}

pub fn forecast_embed(snap: &ForecastSnapshot) -> Embed {
    snap.entries.iter().fold(
        Embed::new(format!("3-Day Weather Forecast for {}", snap.city_name), Color::Blue),
        |embed, entry| {
            embed.field(
                entry.timestamp.clone(),
                conditions(
                    &entry.description,
                    entry.temperature_f,
                    entry.humidity_pct,
                    entry.wind_speed_mph,
                ),
                false,
            )
        },
    )
}

pub fn air_quality_embed(snap: &AirQualitySnapshot) -> Embed {
    let color = if snap.aqi == 1 { Color::Green } else { Color::Red };

    Embed::new(format!("Air Quality in {}", snap.city_name), color)
        .description(format!("AQI: {} ({})", snap.aqi, snap.level))
}
