//! `HH:MM` clock times as used by attendance records.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";

pub fn parse(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), FORMAT).ok()
}

pub fn format(value: NaiveTime) -> String {
    value.format(FORMAT).to_string()
}

pub mod hhmm {
    use super::*;

    pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time `{}`, expected HH:MM", raw.trim()))
        })
    }
}

pub mod hhmm_opt {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_some(&format(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time `{text}`, expected HH:MM"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Punch {
        #[serde(default, with = "hhmm_opt")]
        at: Option<NaiveTime>,
    }

    #[test]
    fn accepts_hours_and_minutes() {
        let punch: Punch = serde_json::from_str(r#"{"at":"09:05"}"#).unwrap();
        assert_eq!(punch.at, NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(serde_json::to_string(&punch).unwrap(), r#"{"at":"09:05"}"#);
    }

    #[test]
    fn blank_and_missing_are_none() {
        let blank: Punch = serde_json::from_str(r#"{"at":""}"#).unwrap();
        assert!(blank.at.is_none());
        let missing: Punch = serde_json::from_str("{}").unwrap();
        assert!(missing.at.is_none());
        assert!(serde_json::from_str::<Punch>(r#"{"at":"25:99"}"#).is_err());
    }

    #[test]
    fn required_time_rejects_blank() {
        #[derive(Deserialize)]
        struct Shift {
            #[serde(with = "hhmm")]
            starts: NaiveTime,
        }

        let shift: Shift = serde_json::from_str(r#"{"starts":" 22:30 "}"#).unwrap();
        assert_eq!(shift.starts, NaiveTime::from_hms_opt(22, 30, 0).unwrap());
        assert!(serde_json::from_str::<Shift>(r#"{"starts":""}"#).is_err());
    }
}
