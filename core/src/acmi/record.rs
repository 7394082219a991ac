use crate::acmi::object::PositionRecord;
use crate::acmi::properties::{PropertyKey, PropertyValue};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Instant a record was observed at, when the recording's reference time is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStamp {
    pub recorded_at: Option<DateTime<Utc>>,
}

impl RecordStamp {
    pub fn at(reference_time: Option<DateTime<Utc>>, frame_offset: f64) -> Self {
        let recorded_at = reference_time.and_then(|reference| {
            let micros = (frame_offset * 1_000_000.0).round();
            if !micros.is_finite() {
                return None;
            }
            reference.checked_add_signed(TimeDelta::microseconds(micros as i64))
        });
        Self { recorded_at }
    }

    fn to_value(self) -> Value {
        match self.recorded_at {
            Some(at) => Value::String(format_date(&at)),
            None => Value::Null,
        }
    }
}

/// ISO-8601 UTC rendering that keeps sub-second digits only when present.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// One assignment of a global property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub key: PropertyKey,
    pub value: PropertyValue,
    pub stamp: RecordStamp,
}

/// One `0,Event=` sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub arguments: Vec<String>,
    pub stamp: RecordStamp,
}

/// The record kinds a recording is made of.
#[derive(Debug, Clone, PartialEq)]
pub enum AcmiRecord {
    Property(PropertyRecord),
    Object(PositionRecord),
    Event(EventRecord),
}

impl AcmiRecord {
    pub fn stamp(&self) -> RecordStamp {
        match self {
            AcmiRecord::Property(record) => record.stamp,
            AcmiRecord::Object(record) => record.stamp,
            AcmiRecord::Event(record) => record.stamp,
        }
    }

    pub fn to_array(&self) -> Value {
        match self {
            AcmiRecord::Property(record) => property_to_array(record),
            AcmiRecord::Object(record) => position_to_array(record),
            AcmiRecord::Event(record) => event_to_array(record),
        }
    }
}

fn property_to_array(record: &PropertyRecord) -> Value {
    json!({
        "recordType": "property",
        "recordedAt": record.stamp.to_value(),
        "properties": { record.key.camel_name(): record.value.to_value() },
    })
}

fn position_to_array(record: &PositionRecord) -> Value {
    json!({
        "recordType": "object",
        "recordedAt": record.stamp.to_value(),
        "properties": {
            "lon": record.longitude,
            "lat": record.latitude,
            "alt": record.altitude,
        },
    })
}

fn event_to_array(record: &EventRecord) -> Value {
    json!({
        "recordType": "event",
        "recordedAt": record.stamp.to_value(),
        "properties": {
            "name": record.name,
            "properties": record.arguments,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn stamp_adds_frame_offset_to_reference_time() {
        let stamp = RecordStamp::at(Some(reference()), 90.25);
        assert_eq!(
            stamp.recorded_at.map(|at| format_date(&at)).as_deref(),
            Some("2022-03-01T12:01:30.250Z")
        );
    }

    #[test]
    fn stamp_without_reference_time_is_empty() {
        assert_eq!(RecordStamp::at(None, 12.0).recorded_at, None);
    }

    #[test]
    fn event_record_exports_name_and_arguments() {
        let record = AcmiRecord::Event(EventRecord {
            name: "Destroyed".into(),
            arguments: vec!["102".into(), "splash".into()],
            stamp: RecordStamp::at(Some(reference()), 0.0),
        });
        let exported = record.to_array();
        assert_eq!(exported["recordType"], "event");
        assert_eq!(exported["recordedAt"], "2022-03-01T12:00:00Z");
        assert_eq!(exported["properties"]["name"], "Destroyed");
        assert_eq!(exported["properties"]["properties"][1], "splash");
    }

    #[test]
    fn property_record_exports_under_camel_case_key() {
        let record = AcmiRecord::Property(PropertyRecord {
            key: PropertyKey::ReferenceLatitude,
            value: PropertyValue::Float(41.5),
            stamp: RecordStamp::default(),
        });
        assert_eq!(record.to_array()["properties"]["referenceLatitude"], 41.5);
        assert_eq!(record.stamp().recorded_at, None);
    }
}
