use super::util;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::Error;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Milliseconds between the unix epoch and the first second of 2015
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Snowflake(pub u64);

impl Snowflake {
    pub fn serialize_vec_to_ints<S: Serializer>(
        vec: &[Snowflake],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(vec.len()))?;

        for snowflake in vec {
            seq.serialize_element(&snowflake.0)?;
        }

        seq.end()
    }

    /// The moment the entity behind this id was created, taken from the top 42 bits
    pub fn created_at(&self) -> DateTime<Utc> {
        let millis = (self.0 >> 22) + DISCORD_EPOCH;

        Utc.timestamp_millis_opt(millis as i64)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Value = Deserialize::deserialize(deserializer)?;

        if let Some(i) = value.as_u64() {
            return Ok(Snowflake(i));
        }

        if let Some(s) = value.as_str() {
            return Ok(Snowflake(s.parse().map_err(Error::custom)?));
        }

        Err(Error::invalid_type(
            util::to_unexpected(value),
            &"a string or u64",
        ))
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Snowflake(s.parse()?))
    }
}

impl From<u64> for Snowflake {
    fn from(x: u64) -> Self {
        Snowflake(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde::Serialize;

    #[derive(Serialize)]
    struct VecStruct {
        #[serde(serialize_with = "Snowflake::serialize_vec_to_ints")]
        pub snowflakes: Vec<Snowflake>,
    }

    #[test]
    fn test_serialize_snowflake_vec() {
        let v = VecStruct {
            snowflakes: vec![Snowflake(1), Snowflake(2), Snowflake(3)],
        };

        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"snowflakes":[1,2,3]}"#);
    }

    #[test]
    fn test_deserialize_string_or_int() {
        let from_str: Snowflake = serde_json::from_str(r#""175928847299117063""#).unwrap();
        let from_int: Snowflake = serde_json::from_str("175928847299117063").unwrap();

        assert_eq!(from_str, from_int);
        assert!(serde_json::from_str::<Snowflake>("true").is_err());
    }

    #[test]
    fn test_created_at() {
        // example id from the Discord developer documentation
        let created = Snowflake(175928847299117063).created_at();

        assert_eq!(created.timestamp_millis(), 1462015105796);
        assert_eq!(created.year(), 2016);
    }
}
