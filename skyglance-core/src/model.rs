use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current conditions for a place, as reported by the weather API.
///
/// Only obtainable by validating a JSON payload, so every instance carries all
/// four fields. The temperature is kept in Kelvin exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    temperature_kelvin: f64,
    icon: String,
    condition: String,
    place: String,
}

impl WeatherRecord {
    /// Validate a decoded payload, yielding nothing if any required field is
    /// absent or of the wrong type.
    pub fn from_json(json: &Value) -> Option<Self> {
        Self::try_from(json).ok()
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature_kelvin
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn place(&self) -> &str {
        &self.place
    }
}

impl TryFrom<&Value> for WeatherRecord {
    type Error = FetchError;

    fn try_from(json: &Value) -> Result<Self, Self::Error> {
        let missing = |field| FetchError::Validation { field };

        let temperature_kelvin = json
            .pointer("/main/temp")
            .and_then(Value::as_f64)
            .ok_or_else(|| missing("main.temp"))?;

        let first = json
            .get("weather")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .ok_or_else(|| missing("weather[0]"))?;

        let icon = first
            .get("icon")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("weather[0].icon"))?;

        let condition = first
            .get("description")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("weather[0].description"))?;

        let place = json
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("name"))?;

        Ok(Self {
            temperature_kelvin,
            icon: icon.to_owned(),
            condition: condition.to_owned(),
            place: place.to_owned(),
        })
    }
}

/// Unit used when showing a temperature to a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Kelvin,
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn convert(self, kelvin: f64) -> f64 {
        match self {
            TemperatureUnit::Kelvin => kelvin,
            TemperatureUnit::Celsius => kelvin - 273.15,
            TemperatureUnit::Fahrenheit => (kelvin - 273.15) * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Whole-degree rendering, e.g. `17°C`.
    pub fn format(self, kelvin: f64) -> String {
        format!("{:.0}{}", self.convert(kelvin), self.symbol())
    }
}

impl std::str::FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "kelvin" | "k" => Ok(TemperatureUnit::Kelvin),
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: kelvin, celsius, fahrenheit."
            )),
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TemperatureUnit::Kelvin => "kelvin",
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokyo() -> Value {
        json!({
            "main": { "temp": 290.5 },
            "weather": [{ "icon": "01d", "description": "clear sky" }],
            "name": "Tokyo"
        })
    }

    #[test]
    fn well_formed_payload_is_copied_verbatim() {
        let record = WeatherRecord::from_json(&tokyo()).expect("valid payload");

        assert_eq!(record.temperature_kelvin(), 290.5);
        assert_eq!(record.icon(), "01d");
        assert_eq!(record.condition(), "clear sky");
        assert_eq!(record.place(), "Tokyo");
    }

    #[test]
    fn integer_temperature_is_accepted() {
        let mut json = tokyo();
        json["main"]["temp"] = json!(291);

        let record = WeatherRecord::from_json(&json).expect("valid payload");
        assert_eq!(record.temperature_kelvin(), 291.0);
    }

    #[test]
    fn only_first_weather_entry_is_used() {
        let mut json = tokyo();
        json["weather"] = json!([
            { "icon": "10n", "description": "light rain" },
            { "icon": "01d", "description": "clear sky" }
        ]);

        let record = WeatherRecord::from_json(&json).expect("valid payload");
        assert_eq!(record.icon(), "10n");
        assert_eq!(record.condition(), "light rain");
    }

    #[test]
    fn missing_required_fields_yield_nothing() {
        let removals: [(&str, fn(&mut Value)); 4] = [
            ("main.temp", |v| {
                v["main"].as_object_mut().unwrap().remove("temp");
            }),
            ("weather[0].icon", |v| {
                v["weather"][0].as_object_mut().unwrap().remove("icon");
            }),
            ("weather[0].description", |v| {
                v["weather"][0].as_object_mut().unwrap().remove("description");
            }),
            ("name", |v| {
                v.as_object_mut().unwrap().remove("name");
            }),
        ];

        for (field, remove) in removals {
            let mut json = tokyo();
            remove(&mut json);

            assert!(WeatherRecord::from_json(&json).is_none(), "{field}");
            match WeatherRecord::try_from(&json) {
                Err(FetchError::Validation { field: reported }) => assert_eq!(reported, field),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn mistyped_fields_yield_nothing() {
        let mut json = tokyo();
        json["main"]["temp"] = json!("290.5");
        assert!(WeatherRecord::from_json(&json).is_none());

        let mut json = tokyo();
        json["name"] = json!(42);
        assert!(WeatherRecord::from_json(&json).is_none());

        let mut json = tokyo();
        json["weather"] = json!({ "icon": "01d", "description": "clear sky" });
        assert!(WeatherRecord::from_json(&json).is_none());
    }

    #[test]
    fn empty_weather_array_fails_validation() {
        let json = json!({ "main": { "temp": 290.5 }, "weather": [] });

        let err = WeatherRecord::try_from(&json).unwrap_err();
        assert!(matches!(err, FetchError::Validation { field: "weather[0]" }));
    }

    #[test]
    fn temperature_units_convert_from_kelvin() {
        assert_eq!(TemperatureUnit::Kelvin.format(290.4), "290K");
        assert_eq!(TemperatureUnit::Celsius.format(290.5), "17°C");
        assert_eq!(TemperatureUnit::Fahrenheit.format(273.15), "32°F");
    }

    #[test]
    fn temperature_unit_parses_short_names() {
        assert_eq!("C".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!("fahrenheit".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert!("rankine".parse::<TemperatureUnit>().is_err());
    }
}
