use crate::acmi::{Acmi, EventRecord};
use crate::prelude::{format_error, AcmiResult, RecordKind, SentenceHandler};
use once_cell::sync::Lazy;
use regex::Regex;

static EVENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^0,Event=(\w*)\|(.*)").unwrap());

/// `0,Event=<name>|<args>` sentences, kept for bookkeeping only.
pub struct EventHandler;

impl SentenceHandler for EventHandler {
    fn kind(&self) -> RecordKind {
        RecordKind::Event
    }

    fn matches(&self, sentence: &str) -> bool {
        EVENT.is_match(sentence)
    }

    fn handle(&self, sentence: &str, acmi: &mut Acmi) -> AcmiResult<()> {
        let captures = EVENT
            .captures(sentence)
            .ok_or_else(|| format_error!("not an event: {:?}", sentence))?;
        let record = EventRecord {
            name: captures[1].to_string(),
            arguments: captures[2].split('|').map(str::to_string).collect(),
            stamp: acmi.stamp(),
        };
        acmi.events.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_recorded_with_arguments() {
        let mut acmi = Acmi::new();
        let sentence = "0,Event=Message|3000102|Fox two";
        assert!(EventHandler.matches(sentence));
        EventHandler.handle(sentence, &mut acmi).unwrap();

        assert_eq!(acmi.events.len(), 1);
        assert_eq!(acmi.events[0].name, "Message");
        assert_eq!(acmi.events[0].arguments, vec!["3000102", "Fox two"]);
        assert!(!EventHandler.matches("0,Event=Bookmark"));
    }
}
