#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
}

const COUNTRIES: [(&str, &str); 18] = [
    ("Morocco", "MA"),
    ("Germany", "DE"),
    ("United States", "US"),
    ("United Kingdom", "GB"),
    ("France", "FR"),
    ("Spain", "ES"),
    ("Italy", "IT"),
    ("Canada", "CA"),
    ("Australia", "AU"),
    ("Japan", "JP"),
    ("Brazil", "BR"),
    ("India", "IN"),
    ("China", "CN"),
    ("Russia", "RU"),
    ("Netherlands", "NL"),
    ("Sweden", "SE"),
    ("Norway", "NO"),
    ("Denmark", "DK"),
];

/// Selectable countries, sorted by name. Built once at startup.
#[derive(Debug, Clone)]
pub struct CountryTable {
    entries: Vec<Country>,
}

impl CountryTable {
    pub fn load() -> Self {
        let mut entries: Vec<Country> = COUNTRIES
            .iter()
            .map(|&(name, code)| Country { name, code })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(b.name));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Country> {
        self.entries.get(index)
    }

    /// Position of the entry whose name or ISO code equals `value`.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|c| c.name == value || c.code == value)
    }
}
