use crate::acmi::{Acmi, ObjectId, ObjectType};
use crate::prelude::{format_error, AcmiResult, FogConfig, RecordKind, SentenceHandler};
use crate::processing::resolver::ActivityResolver;
use crate::telemetry::log::LogManager;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static OBJECT_DELETION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-([0-9a-fA-F]{1,16})$").unwrap());

/// `-<hex-id>` sentences. The object stays in the table; weapons trigger the
/// impact search.
pub struct ObjectDeletionHandler {
    resolver: ActivityResolver,
    logger: LogManager,
}

impl ObjectDeletionHandler {
    pub fn new(config: &FogConfig) -> Self {
        Self {
            resolver: ActivityResolver::new(config),
            logger: LogManager::with_verbosity(config.verbose),
        }
    }
}

impl SentenceHandler for ObjectDeletionHandler {
    fn kind(&self) -> RecordKind {
        RecordKind::ObjectDeletion
    }

    fn matches(&self, sentence: &str) -> bool {
        OBJECT_DELETION.is_match(sentence)
    }

    fn handle(&self, sentence: &str, acmi: &mut Acmi) -> AcmiResult<()> {
        let captures = OBJECT_DELETION
            .captures(sentence)
            .ok_or_else(|| format_error!("not an object deletion: {:?}", sentence))?;
        let id = ObjectId::from_hex(&captures[1])
            .ok_or_else(|| format_error!("invalid object id in {:?}", sentence))?;

        let frame_offset = acmi.frame_offset();
        let Some(object) = acmi.objects.get_mut(&id) else {
            debug!("deletion of unknown object {}", id);
            return Ok(());
        };
        object.removed_at = Some(frame_offset);

        match object.primary_type() {
            ObjectType::Weapon => {
                self.resolver.on_weapon_impact(acmi, id);
            }
            ObjectType::Air => self.logger.narrate(format_args!(
                "DELETE: removed {} {} aircraft with name {} flown by pilot: {} ({})",
                object.color_label(),
                ObjectType::Air,
                object.name_label(),
                object.pilot_label(),
                object.id
            )),
            ObjectType::Sea => self.logger.narrate(format_args!(
                "DELETE: removed {} boat with name {} commanded by: {}",
                object.color_label(),
                object.name_label(),
                object.pilot_label()
            )),
            ObjectType::Ground => self.logger.narrate(format_args!(
                "DELETE: removed {} ground object with name {} commanded by: {}",
                object.color_label(),
                object.name_label(),
                object.pilot_label()
            )),
            ObjectType::Shrapnel | ObjectType::Decoy | ObjectType::Misc => {
                if object.is_reportable() {
                    self.logger.narrate(format_args!(
                        "DELETE: removed misc object with type {}",
                        object.primary_type()
                    ));
                }
            }
        }
        Ok(())
    }
}
