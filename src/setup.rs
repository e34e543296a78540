use crate::api::DetectedLocation;
use crate::countries::CountryTable;

pub const MISSING_FIELDS_MESSAGE: &str = "Please select a country and enter your city";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    City,
    Country,
}

impl SetupField {
    pub fn next(self) -> Self {
        match self {
            SetupField::City => SetupField::Country,
            SetupField::Country => SetupField::City,
        }
    }

    pub fn prev(self) -> Self {
        // Two fields: previous and next coincide.
        self.next()
    }
}

#[derive(Debug, Clone)]
pub struct SetupForm {
    pub city: String,
    /// Index into the country table; `None` until the user picks one.
    pub country: Option<usize>,
    pub focus: SetupField,
    pub error: Option<&'static str>,
}

impl SetupForm {
    pub fn new(stored_city: Option<&str>, stored_country: Option<&str>, table: &CountryTable) -> Self {
        Self {
            city: stored_city.unwrap_or_default().to_string(),
            country: stored_country.and_then(|c| table.position(c)),
            focus: SetupField::City,
            error: None,
        }
    }

    /// Fills only the fields the user has not already provided.
    pub fn apply_detected(&mut self, detected: &DetectedLocation, table: &CountryTable) {
        let (Some(city), Some(country)) = (&detected.city, &detected.country) else {
            return;
        };

        if self.city.trim().is_empty() {
            self.city = city.clone();
        }
        if self.country.is_none() {
            self.country = table.position(country);
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus == SetupField::City {
            self.city.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if self.focus == SetupField::City {
            self.city.pop();
        }
    }

    pub fn next_country(&mut self, table: &CountryTable) {
        if table.is_empty() {
            return;
        }
        self.country = Some(match self.country {
            Some(i) => (i + 1) % table.len(),
            None => 0,
        });
        self.error = None;
    }

    pub fn prev_country(&mut self, table: &CountryTable) {
        if table.is_empty() {
            return;
        }
        self.country = Some(match self.country {
            Some(0) | None => table.len() - 1,
            Some(i) => i - 1,
        });
        self.error = None;
    }

    /// Returns `(city, country name)` or records the validation message.
    pub fn submit(&mut self, table: &CountryTable) -> Option<(String, String)> {
        let city = self.city.trim();
        let country = self.country.and_then(|i| table.get(i));

        match country {
            Some(country) if !city.is_empty() => {
                self.error = None;
                Some((city.to_string(), country.name.to_string()))
            }
            _ => {
                self.error = Some(MISSING_FIELDS_MESSAGE);
                None
            }
        }
    }
}
