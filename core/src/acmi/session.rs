use crate::acmi::object::{AcmiObject, ObjectId};
use crate::acmi::properties::GlobalProperties;
use crate::acmi::record::{AcmiRecord, EventRecord, RecordStamp};
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::collections::BTreeSet;

/// Mutable state of one parse pass over a recording.
#[derive(Debug, Clone, Default)]
pub struct Acmi {
    pub file_type: Option<String>,
    pub file_version: Option<String>,
    pub properties: GlobalProperties,
    /// Tracked objects in order of first sighting.
    pub objects: IndexMap<ObjectId, AcmiObject>,
    pub active_objects: BTreeSet<ObjectId>,
    pub events: Vec<EventRecord>,
    frame_offset: f64,
}

impl Acmi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_offset(&self) -> f64 {
        self.frame_offset
    }

    pub fn set_frame_offset(&mut self, offset: f64) {
        self.frame_offset = offset;
        self.properties.delta = offset;
    }

    /// Stamp for a record observed in the current frame.
    pub fn stamp(&self) -> RecordStamp {
        RecordStamp::at(self.properties.reference_time, self.frame_offset)
    }

    pub fn object(&self, id: ObjectId) -> Option<&AcmiObject> {
        self.objects.get(&id)
    }

    /// Marks an object as having interacted; unknown ids are ignored.
    pub fn mark_active(&mut self, id: ObjectId) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.active = true;
                self.active_objects.insert(id);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, id: ObjectId) -> bool {
        self.objects.get(&id).is_some_and(|object| object.active)
    }

    pub fn active_count(&self) -> usize {
        self.objects.values().filter(|object| object.active).count()
    }

    pub fn inactive_count(&self) -> usize {
        self.objects.len() - self.active_count()
    }

    pub fn to_array(&self) -> Value {
        json!({
            "file_type": self.file_type,
            "version": self.file_version,
            "properties": self.properties.to_array(),
            "objects": self.objects.values().map(AcmiObject::to_array).collect::<Vec<_>>(),
            "events": self
                .events
                .iter()
                .map(|event| AcmiRecord::Event(event.clone()).to_array())
                .collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn mark_active_keeps_flag_and_set_in_step() {
        let mut acmi = Acmi::new();
        let id = ObjectId::new(0x11);
        assert!(!acmi.mark_active(id));

        acmi.objects.insert(id, AcmiObject::new(id));
        acmi.objects
            .insert(ObjectId::new(0x12), AcmiObject::new(ObjectId::new(0x12)));
        assert!(acmi.mark_active(id));
        assert!(acmi.is_active(id));
        assert!(acmi.active_objects.contains(&id));
        assert_eq!(acmi.active_count(), 1);
        assert_eq!(acmi.inactive_count(), 1);
    }

    #[test]
    fn frame_offset_drives_record_stamps() {
        let mut acmi = Acmi::new();
        acmi.properties.reference_time = Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
        acmi.set_frame_offset(60.0);
        assert_eq!(acmi.properties.delta, 60.0);
        assert_eq!(
            acmi.stamp().recorded_at,
            Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 1, 0).unwrap())
        );
    }

    #[test]
    fn export_lists_objects_in_sighting_order() {
        let mut acmi = Acmi::new();
        for raw in [0x30, 0x10, 0x20] {
            let id = ObjectId::new(raw);
            acmi.objects.insert(id, AcmiObject::new(id));
        }
        let exported = acmi.to_array();
        let ids: Vec<_> = exported["objects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|object| object["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["30", "10", "20"]);
    }
}
