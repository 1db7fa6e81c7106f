//! Clothing advice derived from a weather description and a temperature.
//!
//! Rules are checked top to bottom and the first match wins, so a
//! description mentioning both rain and snow is treated as rain.

use std::fmt;

use crate::convert::celsius_to_fahrenheit;

/// One clothing recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    LightRaincoat,
    WarmRaincoat,
    HeavySnowGear,
    LightClothing,
    ComfortableClothing,
    JacketAndLayers,
    LightLayers,
    WarmJacket,
    HeavyWinterGear,
    Anything,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::LightRaincoat => {
                "Recommendation: Wear a light raincoat and waterproof shoes!"
            }
            Advisory::WarmRaincoat => {
                "Recommendation: Wear a warm raincoat, waterproof shoes, and some layers of clothing!"
            }
            Advisory::HeavySnowGear => {
                "Recommendation: Wear a heavy coat, gloves, scarf, and warm boots!"
            }
            Advisory::LightClothing => {
                "Recommendation: Wear light clothing, sunglasses, and stay hydrated!"
            }
            Advisory::ComfortableClothing => {
                "Recommendation: Wear comfortable clothing, and enjoy the nice weather outside!"
            }
            Advisory::JacketAndLayers => {
                "Recommendation: Wear a jacket and some layers of clothes!"
            }
            Advisory::LightLayers => {
                "Recommendation: Wear light layers, and carry a jacket just in case!"
            }
            Advisory::WarmJacket => {
                "Recommendation: Wear a warm jacket, and some layers of clothing!"
            }
            Advisory::HeavyWinterGear => {
                "Recommendation: Wear a heavy coat, hat, scarf, and gloves!"
            }
            Advisory::Anything => "Recommendation: However you want!",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A description and temperature to advise on, normalized to Fahrenheit.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationInput {
    pub description: String,
    pub temperature_f: f64,
}

impl RecommendationInput {
    pub fn fahrenheit(description: impl Into<String>, degrees_f: f64) -> Self {
        Self {
            description: description.into(),
            temperature_f: degrees_f,
        }
    }

    pub fn celsius(description: impl Into<String>, degrees_c: f64) -> Self {
        Self::fahrenheit(description, celsius_to_fahrenheit(degrees_c))
    }

    pub fn advise(&self) -> Advisory {
        recommend(&self.description, self.temperature_f)
    }
}

/// Pick an advisory for `description` at `temperature_f` degrees Fahrenheit.
pub fn recommend(description: &str, temperature_f: f64) -> Advisory {
    let desc = description.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| desc.contains(w));

    if mentions(&["rain", "drizzle"]) {
        if temperature_f > 60.0 {
            Advisory::LightRaincoat
        } else {
            Advisory::WarmRaincoat
        }
    } else if mentions(&["snow"]) {
        Advisory::HeavySnowGear
    } else if mentions(&["clear", "sun"]) {
        if temperature_f > 85.0 {
            Advisory::LightClothing
        } else if temperature_f > 60.0 {
            Advisory::ComfortableClothing
        } else {
            Advisory::JacketAndLayers
        }
    } else if mentions(&["cloud", "overcast"]) {
        if temperature_f > 70.0 {
            Advisory::LightLayers
        } else {
            Advisory::WarmJacket
        }
    } else if temperature_f < 32.0 {
        Advisory::HeavyWinterGear
    } else {
        Advisory::Anything
    }
}
