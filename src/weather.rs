use crate::api::Weather;

/// Glyph for an OpenWeather icon code.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" | "10n" => "🌧️",
        "10d" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "🌤️",
    }
}

/// Formatted fields for the weather panel.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub temperature: String,
    pub description: String,
    pub icon: &'static str,
    pub humidity: String,
    pub wind: String,
    pub feels_like: String,
}

impl WeatherView {
    pub fn new(weather: &Weather) -> Self {
        // Providers without a feels-like figure get a rough two-degree estimate.
        let feels_like = weather.feels_like.unwrap_or(weather.temp - 2.0);

        Self {
            temperature: format!("{}°C", weather.temp),
            description: weather.description.clone(),
            icon: icon_glyph(&weather.icon),
            humidity: format!("{}%", weather.humidity),
            wind: format!("{} m/s", weather.wind_speed),
            feels_like: format!("{}°C", round_half_up(feels_like)),
        }
    }
}

/// Rounds halves toward positive infinity and never yields negative zero.
fn round_half_up(value: f64) -> f64 {
    let rounded = (value + 0.5).floor();
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(feels_like: Option<f64>) -> Weather {
        Weather {
            temp: 21.0,
            description: "few clouds".to_string(),
            icon: "02d".to_string(),
            humidity: 55.0,
            wind_speed: 3.5,
            feels_like,
        }
    }

    #[test]
    fn formats_all_fields() {
        let view = WeatherView::new(&weather(Some(20.4)));

        assert_eq!(view.temperature, "21°C");
        assert_eq!(view.icon, "⛅");
        assert_eq!(view.humidity, "55%");
        assert_eq!(view.wind, "3.5 m/s");
        assert_eq!(view.feels_like, "20°C");
    }

    #[test]
    fn feels_like_defaults_below_temp() {
        assert_eq!(WeatherView::new(&weather(None)).feels_like, "19°C");
    }

    #[test]
    fn feels_like_rounds_halves_up_without_negative_zero() {
        assert_eq!(WeatherView::new(&weather(Some(-0.3))).feels_like, "0°C");
        assert_eq!(WeatherView::new(&weather(Some(-2.5))).feels_like, "-2°C");
        assert_eq!(WeatherView::new(&weather(Some(2.5))).feels_like, "3°C");
        assert_eq!(WeatherView::new(&weather(Some(-0.7))).feels_like, "-1°C");
    }

    #[test]
    fn unknown_icon_uses_default() {
        assert_eq!(icon_glyph("99x"), "🌤️");
        assert_eq!(icon_glyph("10d"), "🌦️");
        assert_eq!(icon_glyph("10n"), "🌧️");
    }
}
