use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// A stored preference wins; otherwise evenings and nights are dark.
    pub fn initial(stored: Option<bool>, hour: u32) -> Self {
        let dark = stored.unwrap_or(hour >= 18 || hour < 6);
        Self::from_dark(dark)
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(24, 24, 27),
                accent: Color::Rgb(100, 149, 237),
                info: Color::Rgb(147, 180, 220),
                warn: Color::Rgb(220, 180, 130),
                text_primary: Color::Rgb(230, 230, 230),
                text_secondary: Color::Rgb(160, 160, 160),
                text_muted: Color::Rgb(100, 100, 100),
                border: Color::Rgb(60, 60, 65),
                border_active: Color::Rgb(100, 100, 110),
                progress_dim: Color::Rgb(80, 120, 90),
                progress: Color::Rgb(134, 194, 156),
            },
            Theme::Light => Palette {
                background: Color::Rgb(248, 248, 250),
                accent: Color::Rgb(37, 99, 235),
                info: Color::Rgb(59, 110, 170),
                warn: Color::Rgb(180, 120, 40),
                text_primary: Color::Rgb(30, 30, 35),
                text_secondary: Color::Rgb(80, 80, 90),
                text_muted: Color::Rgb(140, 140, 150),
                border: Color::Rgb(200, 200, 205),
                border_active: Color::Rgb(120, 120, 130),
                progress_dim: Color::Rgb(190, 220, 200),
                progress: Color::Rgb(40, 150, 90),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub accent: Color,
    pub info: Color,
    pub warn: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_active: Color,
    pub progress_dim: Color,
    pub progress: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_flag_wins() {
        assert_eq!(Theme::initial(Some(false), 23), Theme::Light);
        assert_eq!(Theme::initial(Some(true), 12), Theme::Dark);
    }

    #[test]
    fn hour_decides_without_stored_flag() {
        assert_eq!(Theme::initial(None, 18), Theme::Dark);
        assert_eq!(Theme::initial(None, 5), Theme::Dark);
        assert_eq!(Theme::initial(None, 6), Theme::Light);
        assert_eq!(Theme::initial(None, 17), Theme::Light);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!(Theme::Light.toggled().is_dark());
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
