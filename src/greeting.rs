//! Time- and weather-based greeting text.
//!
//! All functions here are total: hours outside `0..24` fall into the
//! night bands, and any temperature yields some advice.

use crate::api::Weather;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Greeting {
    pub label: &'static str,
    pub icon: &'static str,
}

pub fn time_greeting(hour: u32) -> Greeting {
    match hour {
        5..=11 => Greeting {
            label: "Good morning",
            icon: "🌅",
        },
        12..=16 => Greeting {
            label: "Good afternoon",
            icon: "☀️",
        },
        17..=20 => Greeting {
            label: "Good evening",
            icon: "🌆",
        },
        _ => Greeting {
            label: "Good night",
            icon: "🌙",
        },
    }
}

/// First matching rule wins; description rules come before temperature rules.
pub fn weather_advice(description: &str, temp: f64) -> &'static str {
    let desc = description.to_lowercase();

    if desc.contains("rain") || desc.contains("drizzle") {
        "Don't forget your umbrella! ☔"
    } else if desc.contains("snow") {
        "Bundle up warm and stay cozy! ❄️"
    } else if desc.contains("cloud") {
        "Might want to bring a light jacket just in case. 🧥"
    } else if temp > 25.0 {
        "Stay hydrated and wear something light! 👕"
    } else if temp < 10.0 {
        "Dress warm with a cozy sweater! 🧣"
    } else if (15.0..=25.0).contains(&temp) {
        "Perfect weather for a nice walk outside! 🚶"
    } else {
        "Have a wonderful day! ✨"
    }
}

/// A question band covers `start..end`; bands with `end < start` wrap midnight.
#[derive(Debug, Clone, Copy)]
pub struct QuestionBand {
    pub start: u32,
    pub end: u32,
    pub question: &'static str,
}

impl QuestionBand {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            (self.start..self.end).contains(&hour)
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

const LATE_NIGHT_QUESTION: &str = "Still awake? What's keeping you up? 🌜";

pub const QUESTION_BANDS: [QuestionBand; 7] = [
    QuestionBand {
        start: 5,
        end: 9,
        question: "Are you getting ready for your day? What are your plans? 😊",
    },
    QuestionBand {
        start: 9,
        end: 12,
        question: "How's your morning going so far? ☕",
    },
    QuestionBand {
        start: 12,
        end: 14,
        question: "Have you had lunch yet? What did you eat? 🍽️",
    },
    QuestionBand {
        start: 14,
        end: 17,
        question: "How's your afternoon treating you? 📚",
    },
    QuestionBand {
        start: 17,
        end: 20,
        question: "How was your day? Tell me about it! 🌟",
    },
    QuestionBand {
        start: 20,
        end: 23,
        question: "Winding down for the evening? What are you up to? 🌃",
    },
    QuestionBand {
        start: 23,
        end: 5,
        question: LATE_NIGHT_QUESTION,
    },
];

pub fn time_question(hour: u32) -> &'static str {
    QUESTION_BANDS
        .iter()
        .find(|band| band.contains(hour))
        .map_or(LATE_NIGHT_QUESTION, |band| band.question)
}

/// `0 -> "12:00 AM"`, `13 -> "1:00 PM"`.
pub fn format_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:00 {}", display, period)
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialGreeting {
    pub header: String,
    pub body: Vec<String>,
}

pub fn initial_greeting(city: &str, weather: &Weather, hour: u32) -> InitialGreeting {
    let greeting = time_greeting(hour);
    let advice = weather_advice(&weather.description, weather.temp);

    InitialGreeting {
        header: format!("{} {}, from {}!", greeting.icon, greeting.label, city),
        body: vec![
            format!(
                "The weather looks {} today with a temperature of {}°C. {}",
                weather.description, weather.temp, advice
            ),
            format!("It's {} now. {}", format_hour(hour), time_question(hour)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_bands() {
        assert_eq!(time_greeting(4).label, "Good night");
        assert_eq!(time_greeting(23).label, "Good night");
        assert_eq!(time_greeting(5).label, "Good morning");
        assert_eq!(time_greeting(11).label, "Good morning");
        assert_eq!(time_greeting(12).label, "Good afternoon");
        assert_eq!(time_greeting(17).label, "Good evening");
        assert_eq!(time_greeting(21).label, "Good night");
    }

    #[test]
    fn description_rules_precede_temperature() {
        assert_eq!(weather_advice("light rain", 30.0), "Don't forget your umbrella! ☔");
        assert_eq!(weather_advice("Drizzle", 5.0), "Don't forget your umbrella! ☔");
        assert_eq!(weather_advice("light snow", 30.0), "Bundle up warm and stay cozy! ❄️");
        assert_eq!(
            weather_advice("overcast clouds", 30.0),
            "Might want to bring a light jacket just in case. 🧥"
        );
    }

    #[test]
    fn temperature_rules() {
        assert_eq!(weather_advice("clear sky", 26.0), "Stay hydrated and wear something light! 👕");
        assert_eq!(weather_advice("clear sky", 9.0), "Dress warm with a cozy sweater! 🧣");
        assert_eq!(weather_advice("clear sky", 25.0), "Perfect weather for a nice walk outside! 🚶");
        assert_eq!(weather_advice("clear sky", 15.0), "Perfect weather for a nice walk outside! 🚶");
        assert_eq!(weather_advice("clear sky", 12.0), "Have a wonderful day! ✨");
        assert_eq!(weather_advice("clear sky", 10.0), "Have a wonderful day! ✨");
    }

    #[test]
    fn question_bands_partition_the_day() {
        for hour in 0..24 {
            let matches = QUESTION_BANDS.iter().filter(|b| b.contains(hour)).count();
            assert_eq!(matches, 1, "hour {hour} matched {matches} bands");
        }
    }

    #[test]
    fn question_band_edges() {
        assert_eq!(time_question(4), LATE_NIGHT_QUESTION);
        assert_eq!(time_question(23), LATE_NIGHT_QUESTION);
        assert_eq!(time_question(0), LATE_NIGHT_QUESTION);
        assert_eq!(time_question(5), QUESTION_BANDS[0].question);
        assert_eq!(time_question(13), QUESTION_BANDS[2].question);
        assert_eq!(time_question(22), QUESTION_BANDS[5].question);
    }

    #[test]
    fn twelve_hour_format() {
        assert_eq!(format_hour(0), "12:00 AM");
        assert_eq!(format_hour(9), "9:00 AM");
        assert_eq!(format_hour(12), "12:00 PM");
        assert_eq!(format_hour(23), "11:00 PM");
    }

    #[test]
    fn initial_greeting_text() {
        let weather = Weather {
            temp: 18.0,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            humidity: 40.0,
            wind_speed: 2.0,
            feels_like: None,
        };

        let greeting = initial_greeting("Berlin", &weather, 8);

        assert_eq!(greeting.header, "🌅 Good morning, from Berlin!");
        assert_eq!(
            greeting.body[0],
            "The weather looks clear sky today with a temperature of 18°C. \
             Perfect weather for a nice walk outside! 🚶"
        );
        assert_eq!(
            greeting.body[1],
            "It's 8:00 AM now. Are you getting ready for your day? What are your plans? 😊"
        );
    }
}
