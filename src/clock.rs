use chrono::{DateTime, Local, Offset, TimeZone, Timelike};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    /// Zero-padded 12-hour `HH:MM`
    pub time: String,
    pub period: &'static str,
    pub date: String,
    pub timezone: String,
}

impl ClockReading {
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let hour = now.hour();
        let period = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };

        Self {
            time: format!("{:02}:{:02}", display_hour, now.minute()),
            period,
            date: now.format("%A, %B %-d, %Y").to_string(),
            timezone: gmt_label(now.offset().fix().local_minus_utc()),
        }
    }
}

/// `GMT+2`, `GMT-5`, `GMT+5.5`.
pub fn gmt_label(offset_seconds: i32) -> String {
    let hours = f64::from(offset_seconds) / 3600.0;
    let sign = if hours >= 0.0 { "+" } else { "" };
    format!("GMT{}{}", sign, hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(offset_hours: i32, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
    }

    #[test]
    fn midnight_and_afternoon() {
        let reading = ClockReading::from_datetime(&at(2, 2026, 1, 5, 0, 7));
        assert_eq!(reading.time, "12:07");
        assert_eq!(reading.period, "AM");
        assert_eq!(reading.date, "Monday, January 5, 2026");
        assert_eq!(reading.timezone, "GMT+2");

        let reading = ClockReading::from_datetime(&at(-5, 2026, 10, 19, 15, 30));
        assert_eq!(reading.time, "03:30");
        assert_eq!(reading.period, "PM");
        assert_eq!(reading.timezone, "GMT-5");
    }

    #[test]
    fn noon_is_pm() {
        let reading = ClockReading::from_datetime(&at(0, 2026, 6, 1, 12, 0));
        assert_eq!(reading.time, "12:00");
        assert_eq!(reading.period, "PM");
        assert_eq!(reading.timezone, "GMT+0");
    }

    #[test]
    fn fractional_offsets() {
        assert_eq!(gmt_label(5 * 3600 + 1800), "GMT+5.5");
        assert_eq!(gmt_label(-(3 * 3600 + 1800)), "GMT-3.5");
    }
}
