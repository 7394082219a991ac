use crate::acmi::record::{format_date, PropertyRecord};
use crate::prelude::{format_error, AcmiError, AcmiResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepted textual timestamp formats, tried in order.
pub const DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S%.fZ"];

/// Global properties known to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    ReferenceTime,
    RecordingTime,
    Title,
    DataRecorder,
    DataSource,
    Author,
    ReferenceLongitude,
    ReferenceLatitude,
    Category,
    Briefing,
    Debriefing,
    Comments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    Text,
    Float,
    Date,
}

/// Every known property, in export order.
pub const PROPERTY_KEYS: [PropertyKey; 12] = [
    PropertyKey::ReferenceTime,
    PropertyKey::RecordingTime,
    PropertyKey::Title,
    PropertyKey::DataRecorder,
    PropertyKey::DataSource,
    PropertyKey::Author,
    PropertyKey::ReferenceLongitude,
    PropertyKey::ReferenceLatitude,
    PropertyKey::Category,
    PropertyKey::Briefing,
    PropertyKey::Debriefing,
    PropertyKey::Comments,
];

impl PropertyKey {
    /// Case-insensitive lookup of a wire key.
    pub fn lookup(name: &str) -> AcmiResult<Self> {
        PROPERTY_KEYS
            .into_iter()
            .find(|key| key.wire_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| AcmiError::UnknownProperty(name.to_string()))
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            PropertyKey::ReferenceTime => "ReferenceTime",
            PropertyKey::RecordingTime => "RecordingTime",
            PropertyKey::Title => "Title",
            PropertyKey::DataRecorder => "DataRecorder",
            PropertyKey::DataSource => "DataSource",
            PropertyKey::Author => "Author",
            PropertyKey::ReferenceLongitude => "ReferenceLongitude",
            PropertyKey::ReferenceLatitude => "ReferenceLatitude",
            PropertyKey::Category => "Category",
            PropertyKey::Briefing => "Briefing",
            PropertyKey::Debriefing => "Debriefing",
            PropertyKey::Comments => "Comments",
        }
    }

    pub fn camel_name(self) -> String {
        let wire = self.wire_name();
        let mut chars = wire.chars();
        match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn coerce(self, raw: &str) -> AcmiResult<PropertyValue> {
        match self.coercion() {
            Coercion::Text => Ok(PropertyValue::Text(unescape(raw))),
            Coercion::Float => raw
                .trim()
                .parse::<f64>()
                .map(PropertyValue::Float)
                .map_err(|_| format_error!("{} is not a number: {:?}", self.wire_name(), raw)),
            Coercion::Date => parse_date(raw)
                .map(PropertyValue::Date)
                .ok_or_else(|| format_error!("{} is not a timestamp: {:?}", self.wire_name(), raw)),
        }
    }

    fn coercion(self) -> Coercion {
        match self {
            PropertyKey::ReferenceTime | PropertyKey::RecordingTime => Coercion::Date,
            PropertyKey::ReferenceLongitude | PropertyKey::ReferenceLatitude => Coercion::Float,
            PropertyKey::Title
            | PropertyKey::DataRecorder
            | PropertyKey::DataSource
            | PropertyKey::Author
            | PropertyKey::Category
            | PropertyKey::Briefing
            | PropertyKey::Debriefing
            | PropertyKey::Comments => Coercion::Text,
        }
    }
}

/// A coerced property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Float(f64),
    Date(DateTime<Utc>),
}

impl PropertyValue {
    pub fn to_value(&self) -> Value {
        match self {
            PropertyValue::Text(text) => Value::String(text.clone()),
            PropertyValue::Float(number) => serde_json::Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropertyValue::Date(date) => Value::String(format_date(date)),
        }
    }
}

/// Mission-level metadata of a recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalProperties {
    pub reference_time: Option<DateTime<Utc>>,
    pub recording_time: Option<DateTime<Utc>>,
    /// Offset of the most recent frame, in seconds from the reference time.
    pub delta: f64,
    pub title: Option<String>,
    pub data_recorder: Option<String>,
    pub data_source: Option<String>,
    pub author: Option<String>,
    pub reference_longitude: Option<f64>,
    pub reference_latitude: Option<f64>,
    pub category: Option<String>,
    pub briefing: Option<String>,
    pub debriefing: Option<String>,
    pub comments: Option<String>,
}

impl GlobalProperties {
    pub fn apply(&mut self, record: &PropertyRecord) {
        let value = record.value.clone();
        match (record.key, value) {
            (PropertyKey::ReferenceTime, PropertyValue::Date(date)) => {
                self.reference_time = Some(date)
            }
            (PropertyKey::RecordingTime, PropertyValue::Date(date)) => {
                self.recording_time = Some(date)
            }
            (PropertyKey::ReferenceLongitude, PropertyValue::Float(number)) => {
                self.reference_longitude = Some(number)
            }
            (PropertyKey::ReferenceLatitude, PropertyValue::Float(number)) => {
                self.reference_latitude = Some(number)
            }
            (key, PropertyValue::Text(text)) => {
                if let Some(slot) = self.text_slot(key) {
                    *slot = Some(text);
                }
            }
            (key, value) => log::debug!("ignoring {:?} value for {:?}", value, key),
        }
    }

    pub fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        match key {
            PropertyKey::ReferenceTime => self.reference_time.map(PropertyValue::Date),
            PropertyKey::RecordingTime => self.recording_time.map(PropertyValue::Date),
            PropertyKey::ReferenceLongitude => self.reference_longitude.map(PropertyValue::Float),
            PropertyKey::ReferenceLatitude => self.reference_latitude.map(PropertyValue::Float),
            PropertyKey::Title => self.title.clone().map(PropertyValue::Text),
            PropertyKey::DataRecorder => self.data_recorder.clone().map(PropertyValue::Text),
            PropertyKey::DataSource => self.data_source.clone().map(PropertyValue::Text),
            PropertyKey::Author => self.author.clone().map(PropertyValue::Text),
            PropertyKey::Category => self.category.clone().map(PropertyValue::Text),
            PropertyKey::Briefing => self.briefing.clone().map(PropertyValue::Text),
            PropertyKey::Debriefing => self.debriefing.clone().map(PropertyValue::Text),
            PropertyKey::Comments => self.comments.clone().map(PropertyValue::Text),
        }
    }

    /// Checks the fields a recording needs before it is worth writing.
    pub fn validate(&self) -> AcmiResult<()> {
        let mut missing = Vec::new();
        if self.reference_time.is_none() {
            missing.push("ReferenceTime");
        }
        if !self.delta.is_finite() {
            missing.push("Delta");
        }
        if self.data_recorder.is_none() {
            missing.push("DataRecorder");
        }
        if self.data_source.is_none() {
            missing.push("DataSource");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AcmiError::Validation(missing))
        }
    }

    pub fn to_array(&self) -> Map<String, Value> {
        PROPERTY_KEYS
            .into_iter()
            .map(|key| {
                let value = self
                    .get(key)
                    .map(|value| value.to_value())
                    .unwrap_or(Value::Null);
                (key.camel_name(), value)
            })
            .collect()
    }

    fn text_slot(&mut self, key: PropertyKey) -> Option<&mut Option<String>> {
        match key {
            PropertyKey::Title => Some(&mut self.title),
            PropertyKey::DataRecorder => Some(&mut self.data_recorder),
            PropertyKey::DataSource => Some(&mut self.data_source),
            PropertyKey::Author => Some(&mut self.author),
            PropertyKey::Category => Some(&mut self.category),
            PropertyKey::Briefing => Some(&mut self.briefing),
            PropertyKey::Debriefing => Some(&mut self.debriefing),
            PropertyKey::Comments => Some(&mut self.comments),
            PropertyKey::ReferenceTime
            | PropertyKey::RecordingTime
            | PropertyKey::ReferenceLongitude
            | PropertyKey::ReferenceLatitude => None,
        }
    }
}

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Resolves backslash escapes the recorder applies to text values.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acmi::record::RecordStamp;

    fn assign(properties: &mut GlobalProperties, key: &str, raw: &str) {
        let key = PropertyKey::lookup(key).unwrap();
        let record = PropertyRecord {
            key,
            value: key.coerce(raw).unwrap(),
            stamp: RecordStamp::default(),
        };
        properties.apply(&record);
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(
            PropertyKey::lookup("referencetime").unwrap(),
            PropertyKey::ReferenceTime
        );
        assert_eq!(
            PropertyKey::lookup("DATASOURCE").unwrap(),
            PropertyKey::DataSource
        );
        assert!(matches!(
            PropertyKey::lookup("MissionTime"),
            Err(AcmiError::UnknownProperty(_))
        ));
    }

    #[test]
    fn both_date_formats_are_accepted() {
        let normal = parse_date("2022-03-01T12:00:00Z").unwrap();
        let extended = parse_date("2022-03-01T12:00:00.125Z").unwrap();
        assert_eq!(format_date(&normal), "2022-03-01T12:00:00Z");
        assert_eq!(format_date(&extended), "2022-03-01T12:00:00.125Z");
        assert!(parse_date("01/03/2022").is_none());
    }

    #[test]
    fn values_survive_store_and_export() {
        let mut properties = GlobalProperties::default();
        assign(&mut properties, "ReferenceTime", "2022-03-01T12:00:00.250Z");
        assign(&mut properties, "RecordingTime", "2022-03-01T13:00:00Z");
        assign(&mut properties, "ReferenceLongitude", "35.5");
        assign(&mut properties, "Title", "Strike\\, package one");
        assign(&mut properties, "DataSource", "DCS 2.9");

        let exported = properties.to_array();
        assert_eq!(exported["referenceTime"], "2022-03-01T12:00:00.250Z");
        assert_eq!(exported["recordingTime"], "2022-03-01T13:00:00Z");
        assert_eq!(exported["referenceLongitude"], 35.5);
        assert_eq!(exported["title"], "Strike, package one");
        assert_eq!(exported["dataSource"], "DCS 2.9");
        assert_eq!(exported["author"], Value::Null);
    }

    #[test]
    fn malformed_numbers_are_format_errors() {
        let result = PropertyKey::ReferenceLatitude.coerce("north");
        assert!(matches!(result, Err(AcmiError::Format(_))));
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let mut properties = GlobalProperties::default();
        match properties.validate() {
            Err(AcmiError::Validation(missing)) => {
                assert_eq!(missing, vec!["ReferenceTime", "DataRecorder", "DataSource"])
            }
            other => panic!("unexpected {:?}", other),
        }

        assign(&mut properties, "ReferenceTime", "2022-03-01T12:00:00Z");
        assign(&mut properties, "DataRecorder", "Tacview 1.9");
        assign(&mut properties, "DataSource", "DCS 2.9");
        assert!(properties.validate().is_ok());
    }

    #[test]
    fn unescape_handles_common_sequences() {
        assert_eq!(unescape("a\\,b\\nc\\\\d"), "a,b\nc\\d");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }
}
