use crate::acmi::{Acmi, AcmiObject, ObjectId, ObjectType, Transform};
use crate::prelude::{format_error, AcmiResult, FogConfig, RecordKind, SentenceHandler};
use crate::processing::resolver::ActivityResolver;
use crate::telemetry::log::LogManager;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

static OBJECT_UPDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([0-9a-fA-F]{1,16}),T=(.*)$").unwrap());

/// Id referenced by an object-update sentence, if it is one.
pub fn object_update_id(sentence: &str) -> Option<ObjectId> {
    OBJECT_UPDATE
        .captures(sentence)
        .and_then(|captures| ObjectId::from_hex(&captures[1]))
}

/// `<hex-id>,T=<transform>[,<Key>=<Value>...]` sentences.
///
/// A first sighting registers the object with its identity attributes;
/// later sightings only refresh the position.
pub struct ObjectHandler {
    resolver: ActivityResolver,
    logger: LogManager,
}

impl ObjectHandler {
    pub fn new(config: &FogConfig) -> Self {
        Self {
            resolver: ActivityResolver::new(config),
            logger: LogManager::with_verbosity(config.verbose),
        }
    }

    fn register(&self, acmi: &mut Acmi, object: AcmiObject) {
        let id = object.id;
        let revealed = !object.is_red();
        self.narrate_registration(&object);
        let is_weapon = object.primary_type() == ObjectType::Weapon;
        acmi.objects.insert(id, object);

        if is_weapon {
            self.resolver.on_weapon_launch(acmi, id);
        }
        if revealed {
            acmi.mark_active(id);
        }
    }

    fn narrate_registration(&self, object: &AcmiObject) {
        match object.primary_type() {
            ObjectType::Air => self.logger.narrate(format_args!(
                "Added new {} {} aircraft with name {} flown by pilot: {} ({})",
                object.color_label(),
                ObjectType::Air,
                object.name_label(),
                object.pilot_label(),
                object.id
            )),
            ObjectType::Sea => self.logger.narrate(format_args!(
                "Added new {} boat with name {} commanded by: {}",
                object.color_label(),
                object.name_label(),
                object.pilot_label()
            )),
            ObjectType::Ground => self.logger.narrate(format_args!(
                "Added new {} ground object with name {} commanded by: {}",
                object.color_label(),
                object.name_label(),
                object.pilot_label()
            )),
            // the launch search narrates weapons
            ObjectType::Weapon => {}
            ObjectType::Shrapnel | ObjectType::Decoy | ObjectType::Misc => {
                if object.is_reportable() {
                    self.logger.narrate(format_args!(
                        "Added new misc object with type {}",
                        object.primary_type()
                    ));
                }
            }
        }
    }
}

impl SentenceHandler for ObjectHandler {
    fn kind(&self) -> RecordKind {
        RecordKind::ObjectUpdate
    }

    fn matches(&self, sentence: &str) -> bool {
        OBJECT_UPDATE.is_match(sentence)
    }

    fn handle(&self, sentence: &str, acmi: &mut Acmi) -> AcmiResult<()> {
        let captures = OBJECT_UPDATE
            .captures(sentence)
            .ok_or_else(|| format_error!("not an object update: {:?}", sentence))?;
        let id = ObjectId::from_hex(&captures[1])
            .ok_or_else(|| format_error!("invalid object id in {:?}", sentence))?;

        let fields = split_unescaped(&captures[2], ',');
        let (transform, attributes) = match fields.split_first() {
            Some((transform, attributes)) => (Transform::parse(transform)?, attributes),
            None => return Err(format_error!("object update without transform: {:?}", sentence)),
        };
        let stamp = acmi.stamp();

        if let Some(existing) = acmi.objects.get_mut(&id) {
            existing.position.merge(&transform, stamp);
            return Ok(());
        }

        let mut object = AcmiObject::new(id);
        for pair in attributes {
            let Some((key, value)) = pair.split_once('=') else {
                trace!("object {}: dropping attribute without value {:?}", id, pair);
                continue;
            };
            if !object.apply_attribute(key, value) {
                trace!("object {}: dropping unrecognized attribute {}", id, key);
            }
        }
        object.position.merge(&transform, stamp);
        self.register(acmi, object);
        Ok(())
    }
}

/// Splits on `separator` except where it is escaped with a backslash.
fn split_unescaped(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&text[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}
