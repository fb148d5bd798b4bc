use chrono::Local;
use skyglance_core::{FetchError, IconImage, Renderer, TemperatureUnit, WeatherRecord};

const PLACEHOLDER: &str = "--";

/// Prints each refresh stage to stdout.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    units: TemperatureUnit,
}

impl TerminalRenderer {
    pub fn new(units: TemperatureUnit) -> Self {
        Self { units }
    }
}

impl Renderer for TerminalRenderer {
    fn show_place(&self, label: &str) {
        println!("{}", place_line(label));
    }

    fn show_weather(&self, weather: &WeatherRecord) {
        for line in weather_lines(weather, self.units) {
            println!("{line}");
        }
    }

    fn show_icon(&self, icon: &IconImage) {
        println!(
            "Icon:        {} ({}x{}, {})",
            icon.id(),
            icon.width(),
            icon.height(),
            icon.source()
        );
    }

    fn show_error(&self, error: &FetchError) {
        for line in error_lines(error) {
            println!("{line}");
        }
    }
}

fn place_line(label: &str) -> String {
    format!("[{}] {label}", Local::now().format("%H:%M:%S"))
}

fn weather_lines(weather: &WeatherRecord, units: TemperatureUnit) -> Vec<String> {
    vec![
        format!("Place:       {}", weather.place()),
        format!("Temperature: {}", units.format(weather.temperature_kelvin())),
        format!("Condition:   {}", weather.condition()),
    ]
}

fn error_lines(error: &FetchError) -> Vec<String> {
    vec![
        format!("Place:       {PLACEHOLDER}"),
        format!("Temperature: {PLACEHOLDER}"),
        format!("Condition:   {PLACEHOLDER}"),
        format!("Error:       {error}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> WeatherRecord {
        WeatherRecord::from_json(&serde_json::json!({
            "main": { "temp": 290.5 },
            "weather": [{ "icon": "01d", "description": "clear sky" }],
            "name": "Tokyo"
        }))
        .expect("valid payload")
    }

    #[test]
    fn weather_is_shown_in_configured_unit() {
        let lines = weather_lines(&tokyo(), TemperatureUnit::Celsius);

        assert_eq!(lines[0], "Place:       Tokyo");
        assert_eq!(lines[1], "Temperature: 17°C");
        assert_eq!(lines[2], "Condition:   clear sky");
    }

    #[test]
    fn errors_replace_values_with_placeholders() {
        let lines = error_lines(&FetchError::Location("permission denied".into()));

        assert_eq!(lines[0], "Place:       --");
        assert_eq!(lines[1], "Temperature: --");
        assert_eq!(lines[2], "Condition:   --");
        assert!(lines[3].contains("permission denied"));
    }

    #[test]
    fn place_line_carries_label() {
        assert!(place_line("Tokyo, JP").ends_with("] Tokyo, JP"));
    }
}
