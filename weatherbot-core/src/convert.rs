//! Temperature unit conversions.

pub fn fahrenheit_to_celsius(degrees_f: f64) -> f64 {
    (degrees_f - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(degrees_c: f64) -> f64 {
    degrees_c * 9.0 / 5.0 + 32.0
}
