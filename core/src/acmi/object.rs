use crate::acmi::properties::unescape;
use crate::acmi::record::RecordStamp;
use crate::prelude::{format_error, AcmiResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Stable identifier of a tracked object, written as up to 16 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Placeholder reported when a search finds no object.
    pub const UNKNOWN: &'static str = "-1";

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.is_empty() || hex.len() > 16 {
            return None;
        }
        u64::from_str_radix(hex, 16).ok().map(Self)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Closed classification of tracked objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectType {
    Air,
    Sea,
    Ground,
    Weapon,
    Shrapnel,
    Decoy,
    Misc,
}

impl ObjectType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "AIR" => ObjectType::Air,
            "SEA" => ObjectType::Sea,
            "GROUND" => ObjectType::Ground,
            "WEAPON" => ObjectType::Weapon,
            "SHRAPNEL" => ObjectType::Shrapnel,
            "DECOY" => ObjectType::Decoy,
            _ => ObjectType::Misc,
        }
    }

    /// Parses a `+`-joined type tag such as `Air+FixedWing` into its known
    /// categories, keeping the recorder's most-general-first order.
    ///
    /// Unrecognized tags only survive as a single `Misc` entry when nothing
    /// else was recognized.
    pub fn parse_tags(raw: &str) -> Vec<ObjectType> {
        let mut categories: Vec<ObjectType> = Vec::new();
        for category in raw.split('+').map(ObjectType::from_tag) {
            if category != ObjectType::Misc && !categories.contains(&category) {
                categories.push(category);
            }
        }
        if categories.is_empty() {
            categories.push(ObjectType::Misc);
        }
        categories
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Air => "AIR",
            ObjectType::Sea => "SEA",
            ObjectType::Ground => "GROUND",
            ObjectType::Weapon => "WEAPON",
            ObjectType::Shrapnel => "SHRAPNEL",
            ObjectType::Decoy => "DECOY",
            ObjectType::Misc => "MISC",
        }
    }

    /// Platforms that can launch weapons or be hit by them.
    pub fn is_platform(self) -> bool {
        matches!(self, ObjectType::Air | ObjectType::Sea | ObjectType::Ground)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional fields of one object-update sentence; `None` means the field was
/// left empty or not carried at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
    pub roll: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
    pub u: Option<f64>,
    pub v: Option<f64>,
    pub heading: Option<f64>,
}

impl Transform {
    pub fn parse(raw: &str) -> AcmiResult<Self> {
        let fields = raw
            .split('|')
            .map(parse_component)
            .collect::<AcmiResult<Vec<_>>>()?;

        let transform = match fields.as_slice() {
            [lon, lat, alt] => Transform {
                longitude: *lon,
                latitude: *lat,
                altitude: *alt,
                ..Default::default()
            },
            [lon, lat, alt, u, v] => Transform {
                longitude: *lon,
                latitude: *lat,
                altitude: *alt,
                u: *u,
                v: *v,
                ..Default::default()
            },
            [lon, lat, alt, roll, pitch, yaw] => Transform {
                longitude: *lon,
                latitude: *lat,
                altitude: *alt,
                roll: *roll,
                pitch: *pitch,
                yaw: *yaw,
                ..Default::default()
            },
            [lon, lat, alt, roll, pitch, yaw, u, v, heading] => Transform {
                longitude: *lon,
                latitude: *lat,
                altitude: *alt,
                roll: *roll,
                pitch: *pitch,
                yaw: *yaw,
                u: *u,
                v: *v,
                heading: *heading,
            },
            other => {
                return Err(format_error!(
                    "transform {:?} has {} components",
                    raw,
                    other.len()
                ))
            }
        };
        Ok(transform)
    }
}

fn parse_component(raw: &str) -> AcmiResult<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| format_error!("transform component {:?} is not a number", raw))
}

/// Last known position and orientation of an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
    pub roll: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
    pub u: Option<f64>,
    pub v: Option<f64>,
    pub heading: Option<f64>,
    pub stamp: RecordStamp,
}

impl PositionRecord {
    /// Applies the fields an update carries; absent fields keep their value.
    pub fn merge(&mut self, transform: &Transform, stamp: RecordStamp) {
        merge_field(&mut self.longitude, transform.longitude);
        merge_field(&mut self.latitude, transform.latitude);
        merge_field(&mut self.altitude, transform.altitude);
        merge_field(&mut self.roll, transform.roll);
        merge_field(&mut self.pitch, transform.pitch);
        merge_field(&mut self.yaw, transform.yaw);
        merge_field(&mut self.u, transform.u);
        merge_field(&mut self.v, transform.v);
        merge_field(&mut self.heading, transform.heading);
        self.stamp = stamp;
    }

    /// True once both horizontal coordinates have been observed.
    pub fn has_fix(&self) -> bool {
        self.longitude.is_some() && self.latitude.is_some()
    }
}

fn merge_field(stored: &mut Option<f64>, update: Option<f64>) {
    if let Some(value) = update {
        if *stored != Some(value) {
            *stored = Some(value);
        }
    }
}

/// Attribute keys recognized on object-update sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey {
    Name,
    Parent,
    Next,
    Pilot,
    Coalition,
    Color,
    Country,
    Type,
}

impl AttributeKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Name" => Some(AttributeKey::Name),
            "Parent" => Some(AttributeKey::Parent),
            "Next" => Some(AttributeKey::Next),
            "Pilot" => Some(AttributeKey::Pilot),
            "Coalition" => Some(AttributeKey::Coalition),
            "Color" => Some(AttributeKey::Color),
            "Country" => Some(AttributeKey::Country),
            "Type" => Some(AttributeKey::Type),
            _ => None,
        }
    }
}

/// One tracked object of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcmiObject {
    pub id: ObjectId,
    pub name: Option<String>,
    pub parent: Option<ObjectId>,
    pub next: Option<ObjectId>,
    pub pilot: Option<String>,
    pub color: Option<String>,
    pub coalition: Option<String>,
    pub country: Option<String>,
    pub object_type: Vec<ObjectType>,
    pub active: bool,
    pub position: PositionRecord,
    /// Frame offset of the deletion sentence, once one was seen.
    pub removed_at: Option<f64>,
}

impl AcmiObject {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            name: None,
            parent: None,
            next: None,
            pilot: None,
            color: None,
            coalition: None,
            country: None,
            object_type: Vec::new(),
            active: false,
            position: PositionRecord::default(),
            removed_at: None,
        }
    }

    /// Stores one `Key=Value` pair; returns false for keys the object does not track.
    pub fn apply_attribute(&mut self, key: &str, raw: &str) -> bool {
        let Some(key) = AttributeKey::from_key(key) else {
            return false;
        };
        let text = unescape(raw);
        match key {
            AttributeKey::Name => self.name = Some(text),
            AttributeKey::Parent => self.parent = ObjectId::from_hex(text.trim()),
            AttributeKey::Next => self.next = ObjectId::from_hex(text.trim()),
            AttributeKey::Pilot => self.pilot = Some(text),
            AttributeKey::Coalition => self.coalition = Some(text),
            AttributeKey::Color => self.color = Some(text),
            AttributeKey::Country => self.country = Some(text),
            AttributeKey::Type => self.object_type = ObjectType::parse_tags(&text),
        }
        true
    }

    pub fn primary_type(&self) -> ObjectType {
        self.object_type.first().copied().unwrap_or(ObjectType::Misc)
    }

    pub fn is_platform(&self) -> bool {
        self.primary_type().is_platform()
    }

    /// Red is the opposing side whose objects stay hidden unless revealed.
    pub fn is_red(&self) -> bool {
        self.color
            .as_deref()
            .is_some_and(|color| color.trim().eq_ignore_ascii_case("red"))
    }

    /// Shrapnel and decoys are left out of the human-readable narrative.
    pub fn is_reportable(&self) -> bool {
        !self
            .object_type
            .iter()
            .any(|category| matches!(category, ObjectType::Shrapnel | ObjectType::Decoy))
    }

    pub fn color_label(&self) -> &str {
        self.color.as_deref().unwrap_or("")
    }

    pub fn name_label(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn pilot_label(&self) -> &str {
        self.pilot.as_deref().unwrap_or("")
    }

    pub fn to_array(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "parent": self.parent.map(|id| id.to_string()),
            "pilot": self.pilot,
            "color": self.color,
            "coalition": self.coalition,
            "country": self.country,
            "next": self.next.map(|id| id.to_string()),
            "type": self.object_type.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
            "active": self.active,
            "position": {
                "lon": self.position.longitude,
                "lat": self.position.latitude,
                "alt": self.position.altitude,
            },
        })
    }
}
