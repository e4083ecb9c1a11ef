//! Serde helpers that store a [`Duration`] as fractional seconds.
//!
//! Keeps TOML and JSON round specs readable (`duration_per_voice = 60`)
//! instead of the default `{ secs, nanos }` struct encoding.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "duration must be a non-negative number of seconds, got {secs}"
        )));
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Milliseconds as `u64`, saturating instead of truncating silently.
pub fn as_millis_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        budget: Duration,
    }

    #[test]
    fn serializes_as_seconds() {
        let json = serde_json::to_string(&Wrapper {
            budget: Duration::from_millis(1500),
        })
        .unwrap();
        assert_eq!(json, r#"{"budget":1.5}"#);
    }

    #[test]
    fn accepts_integer_seconds() {
        let w: Wrapper = serde_json::from_str(r#"{"budget":60}"#).unwrap();
        assert_eq!(w.budget, Duration::from_secs(60));
    }

    #[test]
    fn rejects_negative_seconds() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"budget":-1}"#).is_err());
    }
}
