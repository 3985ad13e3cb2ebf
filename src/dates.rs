//! `YYYY-MM-DD` serde adapters for calendar dates.

use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
use time::{macros::format_description, Date};

pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    let text = date
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(S::Error::custom)?;
    serializer.serialize_str(&text)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let text = String::deserialize(deserializer)?;
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| D::Error::custom(format!("invalid date {text:?}, expected YYYY-MM-DD: {e}")))
}

pub mod option {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::{macros::format_description, Date};

    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => super::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text {
            Some(text) => Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
                .map(Some)
                .map_err(|e| {
                    D::Error::custom(format!("invalid date {text:?}, expected YYYY-MM-DD: {e}"))
                }),
            None => Ok(None),
        }
    }
}
