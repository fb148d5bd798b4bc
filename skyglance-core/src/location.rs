use async_trait::async_trait;

use crate::{Coordinates, FetchError};

/// A located point plus an optional human label such as "Tokyo, JP".
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub label: Option<String>,
    pub coords: Coordinates,
}

/// Yields the coordinates to fetch weather for.
///
/// Platform geolocation and geocoding live behind this trait.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Place, FetchError>;
}

/// Always reports the same place.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    place: Place,
}

impl FixedLocation {
    pub fn new(coords: Coordinates) -> Self {
        Self {
            place: Place {
                label: None,
                coords,
            },
        }
    }

    pub fn labelled(label: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            place: Place {
                label: Some(label.into()),
                coords,
            },
        }
    }
}

impl From<&PresetCity> for FixedLocation {
    fn from(city: &PresetCity) -> Self {
        FixedLocation::labelled(city.label(), city.coords)
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<Place, FetchError> {
        Ok(self.place.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetCity {
    pub name: &'static str,
    pub region: &'static str,
    pub coords: Coordinates,
}

impl PresetCity {
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.region)
    }
}

pub const PRESET_CITIES: &[PresetCity] = &[
    PresetCity {
        name: "Tokyo",
        region: "JP",
        coords: Coordinates::new(35.683333, 139.683333),
    },
    PresetCity {
        name: "Jakarta",
        region: "ID",
        coords: Coordinates::new(-6.2, 106.816667),
    },
    PresetCity {
        name: "Delhi",
        region: "IN",
        coords: Coordinates::new(28.61, 77.23),
    },
    PresetCity {
        name: "Manila",
        region: "PH",
        coords: Coordinates::new(14.58, 121.0),
    },
    PresetCity {
        name: "São Paulo",
        region: "BR",
        coords: Coordinates::new(-23.55, -46.633333),
    },
    PresetCity {
        name: "Athens",
        region: "Greece",
        coords: Coordinates::new(37.966667, 23.716667),
    },
];

/// Location used when the caller gives none.
pub fn default_city() -> &'static PresetCity {
    &PRESET_CITIES[PRESET_CITIES.len() - 1]
}

/// Case-insensitive lookup by city name.
pub fn preset_city(name: &str) -> Result<&'static PresetCity, FetchError> {
    let wanted = name.trim().to_lowercase();

    PRESET_CITIES
        .iter()
        .find(|city| city.name.to_lowercase() == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = PRESET_CITIES.iter().map(|c| c.name).collect();
            FetchError::Location(format!(
                "unknown city '{name}'. Known cities: {}",
                known.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lookup_ignores_case() {
        let city = preset_city("tokyo").unwrap();
        assert_eq!(city.label(), "Tokyo, JP");

        let city = preset_city("  SÃO PAULO ").unwrap();
        assert_eq!(city.region, "BR");
    }

    #[test]
    fn unknown_city_lists_known_ones() {
        let err = preset_city("Atlantis").unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("Atlantis"));
        assert!(msg.contains("Jakarta"));
    }

    #[test]
    fn default_is_athens() {
        assert_eq!(default_city().name, "Athens");
    }

    #[tokio::test]
    async fn fixed_location_reports_its_place() {
        let location = FixedLocation::from(preset_city("Delhi").unwrap());
        let place = location.locate().await.unwrap();

        assert_eq!(place.label.as_deref(), Some("Delhi, IN"));
        assert_eq!(place.coords, Coordinates::new(28.61, 77.23));

        let bare = FixedLocation::new(Coordinates::new(1.0, 2.0)).locate().await.unwrap();
        assert!(bare.label.is_none());
    }
}
