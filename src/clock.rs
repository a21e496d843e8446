//! Business time: the calendar date and wall-clock time in the driver's timezone.

use crate::Result;
use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves "today" and "now" in a fixed business timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    tz: Tz,
}

impl BusinessClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Parses an IANA timezone name such as `America/Caracas`.
    pub fn from_name(name: &str) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Unknown timezone '{name}'"))?;
        Ok(Self::new(tz))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The current business date.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// The current instant, carrying the business timezone's offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.at(Utc::now())
    }

    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.tz).fixed_offset()
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .with_context(|| format!("'{s}' is not a date in the form YYYY-MM-DD"))
}

/// Renders a time of day on a 12-hour clock, e.g. `2:30 PM`.
pub fn format_time_12h(time: DateTime<FixedOffset>) -> String {
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_business_date_differs_from_utc_late_at_night() {
        let clock = BusinessClock::from_name("America/Caracas").unwrap();
        // 02:00 UTC on the 18th is 22:00 on the 17th in Caracas
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 2, 0, 0).unwrap();
        let local = clock.at(instant);
        assert_eq!(
            local.date_naive(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
        assert_eq!(local.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(BusinessClock::from_name("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-10-17").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
        assert!(parse_date("17/10/2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
    }

    #[test]
    fn test_format_time_12h() {
        let t = DateTime::parse_from_rfc3339("2026-10-17T14:30:00-04:00").unwrap();
        assert_eq!(format_time_12h(t), "2:30 PM");
        let t = DateTime::parse_from_rfc3339("2026-10-17T00:05:00-04:00").unwrap();
        assert_eq!(format_time_12h(t), "12:05 AM");
    }
}
