use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;

use super::{CertDate, Certificate};

/// Hosts provisioned by the TinyCA quick-start, with days until expiry.
pub const SAMPLE_HOSTS: [(&str, i64); 8] = [
    ("www.tinyca.lan", 90),
    ("api.tinyca.lan", 85),
    ("grafana.lan", 60),
    ("portainer.lan", 45),
    ("vault.lan", 30),
    ("gitlab.lan", 15),
    ("jenkins.lan", 7),
    ("nas.lan", 120),
];

const SERIAL_CHARS: &[u8; 16] = b"0123456789ABCDEF";
const SERIAL_LEN: usize = 16;

pub fn default_certificates(now: DateTime<Utc>) -> Vec<Certificate> {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now);

    SAMPLE_HOSTS
        .iter()
        .map(|(name, days)| Certificate {
            common_name: Some((*name).to_string()),
            serial_number: Some(mock_serial()),
            valid_from: CertDate::Parsed(midnight),
            valid_until: CertDate::Parsed(now + Duration::days(*days)),
        })
        .collect()
}

pub fn mock_serial() -> String {
    let mut rng = rand::thread_rng();
    (0..SERIAL_LEN)
        .map(|_| SERIAL_CHARS[rng.gen_range(0..SERIAL_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_is_sixteen_uppercase_hex_chars() {
        for _ in 0..32 {
            let s = mock_serial();
            assert_eq!(s.len(), 16);
            assert!(s.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }

    #[test]
    fn defaults_are_offset_from_now() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 15, 30, 0).unwrap();
        let certs = default_certificates(now);
        assert_eq!(certs.len(), 8);
        let jenkins = certs
            .iter()
            .find(|c| c.display_name() == Some("jenkins.lan"))
            .unwrap();
        assert_eq!(
            jenkins.valid_until.instant(),
            Some(Utc.with_ymd_and_hms(2026, 2, 17, 15, 30, 0).unwrap())
        );
        assert_eq!(
            jenkins.valid_from.instant(),
            Some(Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap())
        );
    }
}
