use crate::acmi::{Acmi, PropertyKey, PropertyRecord};
use crate::prelude::{format_error, AcmiError, AcmiResult, RecordKind, SentenceHandler};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static GLOBAL_PROPERTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^0,(\w*)=(.*)").unwrap());

/// `0,<Key>=<value>` sentences that set mission-level properties.
pub struct GlobalPropertyHandler;

impl SentenceHandler for GlobalPropertyHandler {
    fn kind(&self) -> RecordKind {
        RecordKind::GlobalProperty
    }

    fn matches(&self, sentence: &str) -> bool {
        GLOBAL_PROPERTY.is_match(sentence)
    }

    fn handle(&self, sentence: &str, acmi: &mut Acmi) -> AcmiResult<()> {
        let captures = GLOBAL_PROPERTY
            .captures(sentence)
            .ok_or_else(|| format_error!("not a global property: {:?}", sentence))?;
        let (name, raw) = (&captures[1], &captures[2]);

        let key = match PropertyKey::lookup(name) {
            Ok(key) => key,
            Err(AcmiError::UnknownProperty(name)) => {
                debug!("skipping unknown global property {}", name);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let record = PropertyRecord {
            key,
            value: key.coerce(raw)?,
            stamp: acmi.stamp(),
        };
        acmi.properties.apply(&record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acmi::GlobalProperties;

    #[test]
    fn known_keys_are_stored_with_coercion() {
        let mut acmi = Acmi::new();
        let handler = GlobalPropertyHandler;
        for sentence in [
            "0,ReferenceTime=2022-03-01T12:00:00Z",
            "0,referencelongitude=35",
            "0,Author=Viper 1-1",
        ] {
            assert!(handler.matches(sentence));
            handler.handle(sentence, &mut acmi).unwrap();
        }
        assert!(acmi.properties.reference_time.is_some());
        assert_eq!(acmi.properties.reference_longitude, Some(35.0));
        assert_eq!(acmi.properties.author.as_deref(), Some("Viper 1-1"));
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let mut acmi = Acmi::new();
        GlobalPropertyHandler
            .handle("0,MapId=Caucasus", &mut acmi)
            .unwrap();
        assert_eq!(acmi.properties, GlobalProperties::default());
    }

    #[test]
    fn malformed_values_are_fatal() {
        let mut acmi = Acmi::new();
        let result = GlobalPropertyHandler.handle("0,ReferenceTime=yesterday", &mut acmi);
        assert!(matches!(result, Err(AcmiError::Format(_))));
    }
}
