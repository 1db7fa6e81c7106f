use std::fmt;

use crate::advisor::Advisory;

/// Image shown when the provider reports a category we have no picture for.
pub const PLACEHOLDER_IMAGE: &str =
    "https://upload.wikimedia.org/wikipedia/commons/6/65/No-Image-Placeholder.svg";

/// Maximum number of three-hour slots in a forecast (3 days x 8).
pub const FORECAST_SLOTS: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub description: String,
    pub temperature_f: f64,
    pub humidity_pct: u8,
    pub wind_speed_mph: f64,
    pub advisory: Advisory,
    pub image_url: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Provider's own label for the slot, e.g. `2024-06-01 12:00:00`.
    pub timestamp: String,
    pub description: String,
    pub temperature_f: f64,
    pub humidity_pct: u8,
    pub wind_speed_mph: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub city_name: String,
    pub entries: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQualitySnapshot {
    /// The city exactly as the user asked for it.
    pub city_name: String,
    pub aqi: i64,
    pub level: AqiLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    pub fn from_index(aqi: i64) -> Self {
        match aqi {
            1 => AqiLevel::Good,
            2 => AqiLevel::Fair,
            3 => AqiLevel::Moderate,
            4 => AqiLevel::Poor,
            5 => AqiLevel::VeryPoor,
            _ => AqiLevel::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Picture for the provider's coarse weather group (`weather[0].main`).
pub fn category_image(category: &str) -> &'static str {
    match category {
        "Clear" => "https://images.pexels.com/photos/96622/pexels-photo-96622.jpeg",
        "Clouds" => {
            "https://images.pexels.com/photos/53594/blue-clouds-day-fluffy-53594.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        "Rain" => {
            "https://images.pexels.com/photos/39811/pexels-photo-39811.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        "Thunderstorm" => {
            "https://images.pexels.com/photos/1114688/pexels-photo-1114688.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        "Snow" => {
            "https://images.pexels.com/photos/688660/pexels-photo-688660.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        "Drizzle" => {
            "https://images.pexels.com/photos/7002970/pexels-photo-7002970.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        "Mist" => {
            "https://images.pexels.com/photos/163323/fog-dawn-landscape-morgenstimmung-163323.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        "Fog" => {
            "https://images.pexels.com/photos/1605325/pexels-photo-1605325.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        "Haze" => {
            "https://images.pexels.com/photos/1165991/pexels-photo-1165991.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
        }
        _ => PLACEHOLDER_IMAGE,
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
