use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

/// A date field as the campaign API sends it: ISO text, or epoch milliseconds.
///
/// Anything else is kept as is and never parses, so one odd field can't reject
/// the whole record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum DateValue {
    Millis(i64),
    Text(String),
    Other(Value),
}

impl DateValue {
    /// Whether the field counts as set: any number or non-blank text.
    pub fn is_present(&self) -> bool {
        match self {
            DateValue::Millis(_) => true,
            DateValue::Text(text) => !text.trim().is_empty(),
            DateValue::Other(_) => false,
        }
    }

    pub fn parse(&self) -> Option<OffsetDateTime> {
        match self {
            DateValue::Millis(millis) => {
                OffsetDateTime::from_unix_timestamp_nanos(*millis as i128 * 1_000_000).ok()
            }
            DateValue::Text(text) => parse_text(text.trim()),
            DateValue::Other(_) => None,
        }
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        DateValue::Text(text.into())
    }
}

fn parse_text(text: &str) -> Option<OffsetDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time);
    }
    // no offset, assume UTC
    let local = format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second]]][optional [.[subsecond]]]"
    );
    if let Ok(date_time) = PrimitiveDateTime::parse(text, local) {
        return Some(date_time.assume_utc());
    }
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

#[cfg(test)]
mod test {
    use super::DateValue;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn rfc3339() {
        assert_eq!(
            Some(datetime!(2025-01-05 10:00 UTC)),
            DateValue::from("2025-01-05T10:00:00Z").parse()
        );
        assert_eq!(
            Some(datetime!(2025-01-05 10:00:00.5 +5)),
            DateValue::from("2025-01-05T10:00:00.500+05:00").parse()
        );
    }

    #[test]
    fn local_date_time_is_utc() {
        assert_eq!(
            Some(datetime!(2025-11-14 14:30 UTC)),
            DateValue::from("2025-11-14T14:30:00").parse()
        );
        assert_eq!(
            Some(datetime!(2025-11-14 14:30 UTC)),
            DateValue::from("2025-11-14T14:30").parse()
        );
    }

    #[test]
    fn date_only() {
        assert_eq!(
            Some(datetime!(2025-01-01 0:00 UTC)),
            DateValue::from("2025-01-01").parse()
        );
    }

    #[test]
    fn millis() {
        let value: DateValue = serde_json::from_value(json!(1736071200000_i64)).unwrap();
        assert_eq!(DateValue::Millis(1736071200000), value);
        assert_eq!(Some(datetime!(2025-01-05 10:00 UTC)), value.parse());
    }

    #[test]
    fn is_present() {
        assert!(DateValue::Millis(0).is_present());
        assert!(DateValue::from("yesterday").is_present());
        assert!(!DateValue::from("  ").is_present());
        assert!(!DateValue::Other(json!({"$date": 1})).is_present());
    }

    #[test]
    fn garbage() {
        assert_eq!(None, DateValue::from("").parse());
        assert_eq!(None, DateValue::from("yesterday").parse());
        let value: DateValue = serde_json::from_value(json!({"$date": 1})).unwrap();
        assert_eq!(None, value.parse());
    }
}
