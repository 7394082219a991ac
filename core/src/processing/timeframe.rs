use crate::acmi::Acmi;
use crate::prelude::{format_error, AcmiResult, RecordKind, SentenceHandler};

/// `#<seconds>` sentences that move the running frame offset.
pub struct TimeframeHandler;

impl SentenceHandler for TimeframeHandler {
    fn kind(&self) -> RecordKind {
        RecordKind::Timeframe
    }

    fn matches(&self, sentence: &str) -> bool {
        sentence.starts_with('#')
    }

    fn handle(&self, sentence: &str, acmi: &mut Acmi) -> AcmiResult<()> {
        if acmi.properties.reference_time.is_none() {
            return Err(format_error!(
                "no ReferenceTime set before timeframe change {:?}",
                sentence
            ));
        }
        let raw = sentence[1..].trim();
        let offset = raw
            .parse::<f64>()
            .map_err(|_| format_error!("timeframe offset {:?} is not a number", raw))?;
        acmi.set_frame_offset(offset);
        Ok(())
    }
}
