//! Serde helpers for [`Duration`] fields written by Go controllers, where
//! `time.Duration` is encoded as a signed count of nanoseconds.

/// Use with `#[serde(with = "knative::duration::nanos")]`.
pub mod nanos {
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = i64::try_from(duration.as_nanos()).map_err(|_| {
            S::Error::custom(format!("duration {duration:?} overflows i64 nanoseconds"))
        })?;
        serializer.serialize_i64(nanos)
    }

    /// Negative values decode as [`Duration::ZERO`].
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = i64::deserialize(deserializer)?;
        Ok(u64::try_from(nanos).map_or(Duration::ZERO, Duration::from_nanos))
    }
}

#[cfg(test)]
mod test {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Wrapper {
        #[serde(with = "super::nanos")]
        period: Duration,
    }

    #[test]
    fn encodes_as_nanoseconds() {
        let w = Wrapper { period: Duration::from_secs(2) };
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"period":2000000000}"#);
    }

    #[test]
    fn decodes_nanoseconds() {
        let w: Wrapper = serde_json::from_str(r#"{"period":15000000000}"#).unwrap();
        assert_eq!(w.period, Duration::from_secs(15));
    }

    #[test]
    fn negative_durations_are_zero() {
        let w: Wrapper = serde_json::from_str(r#"{"period":-1}"#).unwrap();
        assert_eq!(w.period, Duration::ZERO);
    }

    #[test]
    fn rejects_non_integers() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"period":"2s"}"#).is_err());
    }
}
