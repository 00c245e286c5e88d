use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::CertDate;

/// Window, in days, in which a certificate counts as expiring.
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CertStatus {
    Expired,
    Expiring { days: i64 },
    Valid,
    Unknown,
}

impl CertStatus {
    pub fn classify(valid_until: &CertDate, now: DateTime<Utc>) -> Self {
        let expiry = match valid_until {
            CertDate::Missing => return Self::Unknown,
            // No day count to compare, so neither bound applies.
            CertDate::Unparsed(_) => return Self::Valid,
            CertDate::Parsed(at) => *at,
        };
        let days = days_until(expiry, now);
        if days < 0 {
            Self::Expired
        } else if days <= EXPIRING_WINDOW_DAYS {
            Self::Expiring { days }
        } else {
            Self::Valid
        }
    }

    /// Badge class used by the dashboard stylesheet.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Expiring { .. } => "expiring",
            Self::Valid | Self::Unknown => "valid",
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Expired => "Expired".to_string(),
            Self::Expiring { days } => format!("Expires in {days}d"),
            Self::Valid => "Valid".to_string(),
            Self::Unknown => "Unknown".to_string(),
        }
    }
}

/// Whole days until `expiry`, rounded up.
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (expiry - now).num_milliseconds();
    let days = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) > 0 {
        days + 1
    } else {
        days
    }
}

/// `Mar 4, 2025` style date; `N/A` when absent, the raw text when unparseable.
pub fn format_date(date: &CertDate) -> String {
    match date {
        CertDate::Missing => "N/A".to_string(),
        CertDate::Parsed(at) => at.format("%b %-d, %Y").to_string(),
        CertDate::Unparsed(raw) => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(days: i64, now: DateTime<Utc>) -> CertDate {
        CertDate::Parsed(now + Duration::days(days))
    }

    #[test]
    fn classification_boundaries() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(CertStatus::classify(&at(-1, now), now), CertStatus::Expired);
        assert_eq!(
            CertStatus::classify(&at(30, now), now),
            CertStatus::Expiring { days: 30 }
        );
        assert_eq!(CertStatus::classify(&at(31, now), now), CertStatus::Valid);
        assert_eq!(
            CertStatus::classify(&at(0, now), now),
            CertStatus::Expiring { days: 0 }
        );
    }

    #[test]
    fn partial_days_round_up() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(days_until(now + Duration::hours(1), now), 1);
        assert_eq!(days_until(now - Duration::hours(1), now), 0);
        assert_eq!(days_until(now - Duration::hours(25), now), -1);
    }

    #[test]
    fn missing_expiry_is_unknown() {
        let missing = CertStatus::classify(&CertDate::Missing, Utc::now());
        assert_eq!(missing, CertStatus::Unknown);
        assert_eq!(missing.css_class(), "valid");
        assert_eq!(missing.label(), "Unknown");
    }

    #[test]
    fn garbled_expiry_reads_as_valid() {
        let garbled = CertStatus::classify(&CertDate::Unparsed("garbage".into()), Utc::now());
        assert_eq!(garbled, CertStatus::Valid);
        assert_eq!(garbled.css_class(), "valid");
        assert_eq!(garbled.label(), "Valid");
    }

    #[test]
    fn labels() {
        assert_eq!(CertStatus::Expiring { days: 7 }.label(), "Expires in 7d");
        assert_eq!(CertStatus::Expired.css_class(), "expired");
    }

    #[test]
    fn date_formatting() {
        let d = CertDate::Parsed(Utc.with_ymd_and_hms(2025, 3, 4, 23, 0, 0).unwrap());
        assert_eq!(format_date(&d), "Mar 4, 2025");
        assert_eq!(format_date(&CertDate::Missing), "N/A");
        assert_eq!(format_date(&CertDate::Unparsed("someday".into())), "someday");
    }
}
