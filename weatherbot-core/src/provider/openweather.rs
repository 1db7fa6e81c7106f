use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    advisor,
    error::{LookupError, LookupResult},
    model::{
        AirQualitySnapshot, AqiLevel, FORECAST_SLOTS, ForecastEntry, ForecastSnapshot,
        WeatherSnapshot, capitalize, category_image,
    },
};

use super::{HttpTransport, Transport, WeatherProvider, truncate_body};

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const GEOCODE_PATH: &str = "/geo/1.0/direct";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider<T = HttpTransport> {
    api_key: String,
    transport: T,
}

impl OpenWeatherProvider<HttpTransport> {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self::with_transport(api_key, HttpTransport::new(base_url))
    }
}

impl<T: Transport> OpenWeatherProvider<T> {
    pub fn with_transport(api_key: String, transport: T) -> Self {
        Self { api_key, transport }
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        mut query: Vec<(&str, String)>,
    ) -> LookupResult<R> {
        query.push(("appid", self.api_key.clone()));

        debug!("OpenWeather GET {path}");
        let res = self.transport.get(path, &query).await?;

        if !res.is_ok() {
            debug!(
                "OpenWeather {path} failed with status {}: {}",
                res.status,
                truncate_body(&res.body)
            );
            return Err(LookupError::Status { status: res.status });
        }

        Ok(serde_json::from_str(&res.body)?)
    }

    async fn current(&self, city: &str) -> LookupResult<WeatherSnapshot> {
        let parsed: OwCurrentResponse = self
            .get_json(
                CURRENT_PATH,
                vec![("q", city.to_string()), ("units", "imperial".to_string())],
            )
            .await?;

        let condition = parsed.weather.into_iter().next().ok_or_else(|| {
            LookupError::Malformed("current weather has no conditions".to_string())
        })?;

        let description = capitalize(&condition.description);
        let advisory = advisor::recommend(&description, parsed.main.temp);

        Ok(WeatherSnapshot {
            city_name: parsed.name,
            description,
            temperature_f: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mph: parsed.wind.speed,
            advisory,
            image_url: category_image(&condition.main),
        })
    }

    async fn forecast(&self, city: &str) -> LookupResult<ForecastSnapshot> {
        let parsed: OwForecastResponse = self
            .get_json(
                FORECAST_PATH,
                vec![
                    ("q", city.to_string()),
                    ("units", "imperial".to_string()),
                    ("cnt", FORECAST_SLOTS.to_string()),
                ],
            )
            .await?;

        let entries = parsed
            .list
            .into_iter()
            .take(FORECAST_SLOTS)
            .map(forecast_entry)
            .collect::<LookupResult<Vec<_>>>()?;

        Ok(ForecastSnapshot {
            city_name: parsed.city.name,
            entries,
        })
    }

    async fn air_quality(&self, city: &str) -> LookupResult<AirQualitySnapshot> {
        let matches: Vec<OwGeocode> = self
            .get_json(
                GEOCODE_PATH,
                vec![("q", city.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        let place = matches
            .first()
            .ok_or_else(|| LookupError::NoGeocodeMatch(city.to_string()))?;

        let pollution: OwPollutionResponse = self
            .get_json(
                AIR_POLLUTION_PATH,
                vec![("lat", place.lat.to_string()), ("lon", place.lon.to_string())],
            )
            .await?;

        let aqi = pollution
            .list
            .first()
            .map(|entry| entry.main.aqi)
            .ok_or_else(|| LookupError::Malformed("air pollution list is empty".to_string()))?;

        Ok(AirQualitySnapshot {
            city_name: city.to_string(),
            aqi,
            level: AqiLevel::from_index(aqi),
        })
    }
}

fn forecast_entry(entry: OwForecastEntry) -> LookupResult<ForecastEntry> {
    let description = entry
        .weather
        .first()
        .map(|w| capitalize(&w.description))
        .unwrap_or_else(|| "Unknown".to_string());

    let timestamp = match entry.dt_txt {
        Some(text) => text,
        None => DateTime::<Utc>::from_timestamp(entry.dt, 0)
            .ok_or_else(|| {
                LookupError::Malformed(format!("forecast timestamp {} out of range", entry.dt))
            })?
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    };

    Ok(ForecastEntry {
        timestamp,
        description,
        temperature_f: entry.main.temp,
        humidity_pct: entry.main.humidity,
        wind_speed_mph: entry.wind.speed,
    })
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(default)]
    dt_txt: Option<String>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeocode {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionEntry {
    main: OwAqi,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    list: Vec<OwPollutionEntry>,
}

#[async_trait]
impl<T: Transport> WeatherProvider for OpenWeatherProvider<T> {
    async fn fetch_current(&self, city: &str) -> LookupResult<WeatherSnapshot> {
        self.current(city).await
    }

    async fn fetch_forecast(&self, city: &str) -> LookupResult<ForecastSnapshot> {
        self.forecast(city).await
    }

    async fn fetch_air_quality(&self, city: &str) -> LookupResult<AirQualitySnapshot> {
        self.air_quality(city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::Advisory;
    use crate::model::PLACEHOLDER_IMAGE;
    use crate::provider::RawResponse;
    use serde_json::json;
    use std::{collections::HashMap, sync::Mutex};

    /// Canned responses keyed by path; records every request it sees.
    #[derive(Debug, Default)]
    struct FakeTransport {
        responses: HashMap<&'static str, RawResponse>,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeTransport {
        fn respond(mut self, path: &'static str, status: u16, body: serde_json::Value) -> Self {
            self.responses.insert(
                path,
                RawResponse {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }

        fn requested_paths(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(path, _)| path.clone())
                .collect()
        }

        fn query_of(&self, path: &str) -> HashMap<String, String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, q)| q.iter().cloned().collect())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, path: &str, query: &[(&str, String)]) -> LookupResult<RawResponse> {
            self.requests.lock().unwrap().push((
                path.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));

            match self.responses.get(path) {
                Some(res) => Ok(res.clone()),
                None => Err(LookupError::Network(format!("no route for {path}"))),
            }
        }
    }

    fn provider(transport: FakeTransport) -> OpenWeatherProvider<FakeTransport> {
        OpenWeatherProvider::with_transport("SECRET".to_string(), transport)
    }

    fn forecast_item(dt: i64, desc: &str, temp: f64) -> serde_json::Value {
        json!({
            "dt": dt,
            "dt_txt": format!("slot-{dt}"),
            "main": { "temp": temp, "humidity": 50 },
            "weather": [{ "main": "Clouds", "description": desc }],
            "wind": { "speed": 3.0 }
        })
    }

    #[tokio::test]
    async fn current_maps_fields_and_advice() {
        let transport = FakeTransport::default().respond(
            CURRENT_PATH,
            200,
            json!({
                "name": "London",
                "main": { "temp": 55.4, "humidity": 81 },
                "weather": [{ "main": "Rain", "description": "light rain" }],
                "wind": { "speed": 9.2 }
            }),
        );
        let provider = provider(transport);

        let snap = provider.fetch_current("london").await.expect("snapshot");

        assert_eq!(snap.city_name, "London");
        assert_eq!(snap.description, "Light rain");
        assert_eq!(snap.temperature_f, 55.4);
        assert_eq!(snap.humidity_pct, 81);
        assert_eq!(snap.wind_speed_mph, 9.2);
        assert_eq!(snap.advisory, Advisory::WarmRaincoat);
        assert_eq!(snap.image_url, category_image("Rain"));

        let query = provider.transport.query_of(CURRENT_PATH);
        assert_eq!(query.get("q").map(String::as_str), Some("london"));
        assert_eq!(query.get("units").map(String::as_str), Some("imperial"));
        assert_eq!(query.get("appid").map(String::as_str), Some("SECRET"));
    }

    #[tokio::test]
    async fn current_unknown_category_gets_placeholder() {
        let transport = FakeTransport::default().respond(
            CURRENT_PATH,
            200,
            json!({
                "name": "Kuwait City",
                "main": { "temp": 101.0, "humidity": 10 },
                "weather": [{ "main": "Dust", "description": "dust" }],
                "wind": { "speed": 12.0 }
            }),
        );

        let snap = provider(transport).fetch_current("Kuwait City").await.unwrap();
        assert_eq!(snap.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(snap.advisory, Advisory::Anything);
    }

    #[tokio::test]
    async fn current_non_ok_status_is_not_found() {
        let transport = FakeTransport::default().respond(
            CURRENT_PATH,
            404,
            json!({ "cod": "404", "message": "city not found" }),
        );

        let err = provider(transport).fetch_current("Atlantis").await.unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn current_network_failure_is_not_found() {
        let err = provider(FakeTransport::default())
            .fetch_current("London")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Network(_)));
    }

    #[tokio::test]
    async fn current_malformed_body_is_not_found() {
        let transport =
            FakeTransport::default().respond(CURRENT_PATH, 200, json!({ "unexpected": true }));

        let err = provider(transport).fetch_current("London").await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[tokio::test]
    async fn forecast_preserves_order_and_caps_slots() {
        let list: Vec<_> = (0..30)
            .map(|i| forecast_item(1_700_000_000 + i * 10_800, "few clouds", 60.0 + i as f64))
            .collect();
        let transport = FakeTransport::default().respond(
            FORECAST_PATH,
            200,
            json!({ "city": { "name": "Fairfax" }, "list": list }),
        );
        let provider = provider(transport);

        let snap = provider.fetch_forecast("Fairfax").await.unwrap();

        assert_eq!(snap.city_name, "Fairfax");
        assert_eq!(snap.entries.len(), FORECAST_SLOTS);
        for (i, entry) in snap.entries.iter().enumerate() {
            let dt = 1_700_000_000 + i as i64 * 10_800;
            assert_eq!(entry.timestamp, format!("slot-{dt}"));
            assert_eq!(entry.temperature_f, 60.0 + i as f64);
            assert_eq!(entry.description, "Few clouds");
        }

        let query = provider.transport.query_of(FORECAST_PATH);
        assert_eq!(query.get("cnt").map(String::as_str), Some("24"));
    }

    #[tokio::test]
    async fn forecast_without_dt_txt_formats_timestamp() {
        let transport = FakeTransport::default().respond(
            FORECAST_PATH,
            200,
            json!({
                "city": { "name": "Oslo" },
                "list": [{
                    "dt": 0,
                    "main": { "temp": 30.0, "humidity": 90 },
                    "weather": [{ "main": "Snow", "description": "snow" }],
                    "wind": { "speed": 1.0 }
                }]
            }),
        );

        let snap = provider(transport).fetch_forecast("Oslo").await.unwrap();
        assert_eq!(snap.entries[0].timestamp, "1970-01-01 00:00:00");
    }

    #[tokio::test]
    async fn forecast_unrepresentable_time_without_dt_txt_is_malformed() {
        let transport = FakeTransport::default().respond(
            FORECAST_PATH,
            200,
            json!({
                "city": { "name": "Oslo" },
                "list": [{
                    "dt": i64::MAX,
                    "main": { "temp": 30.0, "humidity": 90 },
                    "weather": [],
                    "wind": { "speed": 1.0 }
                }]
            }),
        );

        let err = provider(transport).fetch_forecast("Oslo").await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[tokio::test]
    async fn forecast_non_ok_status_is_not_found() {
        let transport = FakeTransport::default().respond(FORECAST_PATH, 401, json!({}));

        let err = provider(transport).fetch_forecast("Fairfax").await.unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 401 }));
    }

    #[tokio::test]
    async fn air_quality_geocodes_then_queries_pollution() {
        let transport = FakeTransport::default()
            .respond(GEOCODE_PATH, 200, json!([{ "name": "Paris", "lat": 48.85, "lon": 2.35 }]))
            .respond(
                AIR_POLLUTION_PATH,
                200,
                json!({ "list": [{ "main": { "aqi": 4 } }] }),
            );
        let provider = provider(transport);

        let snap = provider.fetch_air_quality("paris").await.unwrap();

        assert_eq!(snap.city_name, "paris");
        assert_eq!(snap.aqi, 4);
        assert_eq!(snap.level, AqiLevel::Poor);
        assert_eq!(
            provider.transport.requested_paths(),
            vec![GEOCODE_PATH.to_string(), AIR_POLLUTION_PATH.to_string()]
        );

        let query = provider.transport.query_of(AIR_POLLUTION_PATH);
        assert_eq!(query.get("lat").map(String::as_str), Some("48.85"));
        assert_eq!(query.get("lon").map(String::as_str), Some("2.35"));
    }

    #[tokio::test]
    async fn air_quality_empty_geocode_skips_pollution_call() {
        let transport = FakeTransport::default()
            .respond(GEOCODE_PATH, 200, json!([]))
            .respond(
                AIR_POLLUTION_PATH,
                200,
                json!({ "list": [{ "main": { "aqi": 1 } }] }),
            );
        let provider = provider(transport);

        let err = provider.fetch_air_quality("Nowhere").await.unwrap_err();

        assert!(matches!(err, LookupError::NoGeocodeMatch(ref c) if c == "Nowhere"));
        assert_eq!(provider.transport.requested_paths(), vec![GEOCODE_PATH.to_string()]);
    }

    #[tokio::test]
    async fn air_quality_geocode_failure_skips_pollution_call() {
        let transport = FakeTransport::default()
            .respond(GEOCODE_PATH, 401, json!({ "cod": 401 }))
            .respond(
                AIR_POLLUTION_PATH,
                200,
                json!({ "list": [{ "main": { "aqi": 1 } }] }),
            );
        let provider = provider(transport);

        let err = provider.fetch_air_quality("Paris").await.unwrap_err();

        assert!(matches!(err, LookupError::Status { status: 401 }));
        assert_eq!(provider.transport.requested_paths(), vec![GEOCODE_PATH.to_string()]);
    }

    #[tokio::test]
    async fn air_quality_out_of_range_index_is_unknown() {
        let transport = FakeTransport::default()
            .respond(GEOCODE_PATH, 200, json!([{ "lat": 1.0, "lon": 2.0 }]))
            .respond(
                AIR_POLLUTION_PATH,
                200,
                json!({ "list": [{ "main": { "aqi": 9 } }] }),
            );

        let snap = provider(transport).fetch_air_quality("Somewhere").await.unwrap();
        assert_eq!(snap.level, AqiLevel::Unknown);
    }

    #[tokio::test]
    async fn air_quality_pollution_failure_is_not_found() {
        let transport = FakeTransport::default()
            .respond(GEOCODE_PATH, 200, json!([{ "lat": 1.0, "lon": 2.0 }]))
            .respond(AIR_POLLUTION_PATH, 500, json!({}));

        let err = provider(transport).fetch_air_quality("Somewhere").await.unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 500 }));
    }
}
