use crate::acmi::Acmi;
use crate::prelude::{AcmiResult, FogConfig, RecordKind, SentenceHandler};
use crate::processing::{
    EventHandler, FileHeadersHandler, GlobalPropertyHandler, ObjectDeletionHandler, ObjectHandler,
    TimeframeHandler,
};
use crate::reader::{open_recording, SentenceSource};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{Metrics, MetricsRecorder};
use std::path::Path;

/// Sentences between two progress records.
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Ordered handler table; the first handler whose pattern matches wins.
pub struct Dispatcher {
    handlers: Vec<Box<dyn SentenceHandler>>,
}

impl Dispatcher {
    pub fn new(handlers: Vec<Box<dyn SentenceHandler>>) -> Self {
        Self { handlers }
    }

    /// Events are listed ahead of global properties since `0,Event=` also
    /// fits the property pattern.
    pub fn with_default_handlers(config: &FogConfig) -> Self {
        Self::new(vec![
            Box::new(FileHeadersHandler),
            Box::new(EventHandler),
            Box::new(GlobalPropertyHandler),
            Box::new(TimeframeHandler),
            Box::new(ObjectHandler::new(config)),
            Box::new(ObjectDeletionHandler::new(config)),
        ])
    }

    pub fn route(&self, sentence: &str) -> Option<&dyn SentenceHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.matches(sentence))
            .map(|handler| handler.as_ref())
    }

    pub fn classify(&self, sentence: &str) -> Option<RecordKind> {
        self.route(sentence).map(|handler| handler.kind())
    }
}

/// Reads a recording into an [`Acmi`] session.
pub struct Parser {
    dispatcher: Dispatcher,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl Parser {
    pub fn new(config: &FogConfig) -> Self {
        Self {
            dispatcher: Dispatcher::with_default_handlers(config),
            metrics: MetricsRecorder::new(),
            logger: LogManager::with_verbosity(config.verbose),
        }
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    /// Full first pass: every object, weapon search and event.
    pub fn parse_file(&self, path: &Path) -> AcmiResult<Acmi> {
        let mut reader = open_recording(path)?;
        self.logger
            .record(&format!("Parsing recording {}", path.display()));
        self.parse_source(reader.as_mut(), false)
    }

    /// Reads file headers and global properties and stops at the first
    /// sentence of any other kind.
    pub fn parse_global_properties(&self, path: &Path) -> AcmiResult<Acmi> {
        let mut reader = open_recording(path)?;
        self.parse_source(reader.as_mut(), true)
    }

    pub fn parse_source<S>(&self, source: &mut S, header_only: bool) -> AcmiResult<Acmi>
    where
        S: SentenceSource + ?Sized,
    {
        self.metrics.reset();
        let mut acmi = Acmi::new();
        let mut count = 0usize;

        while let Some(sentence) = source.next_sentence()? {
            if sentence.is_empty() {
                continue;
            }
            count += 1;
            if count % PROGRESS_INTERVAL == 0 {
                self.logger
                    .record(&format!("Processed {} sentences", count));
            }

            let Some(handler) = self.dispatcher.route(&sentence) else {
                self.metrics.record_unmatched();
                if header_only {
                    break;
                }
                continue;
            };
            if header_only && !handler.kind().is_header_section() {
                break;
            }
            if let Err(err) = handler.handle(&sentence, &mut acmi) {
                self.metrics.record_error();
                return Err(err);
            }
            self.metrics.record_processed(handler.kind());
        }

        self.logger.record(&format!(
            "Finished after {} sentences, {} objects tracked",
            count,
            acmi.objects.len()
        ));
        Ok(acmi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acmi::ObjectId;
    use crate::prelude::AcmiError;
    use crate::reader::SentenceStream;
    use std::io::{Cursor, Write};
    use tempfile::Builder;

    const RECORDING: &str = "\u{feff}FileType=text/acmi/tacview\n\
FileVersion=2.2\n\
0,ReferenceTime=2024-03-01T10:00:00Z\n\
0,DataSource=DCS 2.9\n\
0,DataRecorder=Tacview 1.9\n\
0,Author=Ops Desk\n\
0,ReferenceLongitude=40\n\
0,ReferenceLatitude=40\n\
0,Event=Message|Mission start\n\
#0\n\
100,T=0.1|0.1|5000,Type=Air+FixedWing,Color=Blue,Name=F-16C,Pilot=Viper\n\
200,T=0.3|0.3|100,Type=Ground+Heavy+Armor,Color=Red,Name=T-90\n\
201,T=0.9|0.9|100,Type=Ground+Vehicle,Color=Red,Name=BTR\n\
#12.5\n\
300,T=0.1001|0.1|5000,Type=Weapon+Missile,Color=Blue,Name=AGM-65\n\
#20\n\
300,T=0.3001|0.3|100\n\
-300\n";

    fn stream(text: &str) -> SentenceStream {
        SentenceStream::new(Cursor::new(text.as_bytes().to_vec()))
    }

    fn parser() -> Parser {
        Parser::new(&FogConfig::new(50, false).unwrap())
    }

    #[test]
    fn full_pass_resolves_activity() {
        let parser = parser();
        let acmi = parser.parse_source(&mut stream(RECORDING), false).unwrap();

        assert_eq!(acmi.file_type.as_deref(), Some("text/acmi/tacview"));
        assert_eq!(acmi.objects.len(), 4);
        assert!(acmi.is_active(ObjectId::new(0x100)));
        assert!(acmi.is_active(ObjectId::new(0x200)));
        assert!(!acmi.is_active(ObjectId::new(0x201)));
        assert!(acmi.is_active(ObjectId::new(0x300)));
        assert_eq!(acmi.events.len(), 1);
        assert_eq!(acmi.frame_offset(), 20.0);

        let metrics = parser.metrics();
        assert_eq!(metrics.by_kind[&RecordKind::Timeframe], 3);
        assert_eq!(metrics.by_kind[&RecordKind::ObjectDeletion], 1);
        assert_eq!(metrics.unmatched, 0);
    }

    #[test]
    fn header_only_pass_stops_at_first_frame() {
        let acmi = parser().parse_source(&mut stream(RECORDING), true).unwrap();
        assert_eq!(acmi.properties.author.as_deref(), Some("Ops Desk"));
        assert!(acmi.properties.validate().is_ok());
        assert!(acmi.objects.is_empty());
        assert_eq!(acmi.events.len(), 1);
    }

    #[test]
    fn timeframe_before_reference_time_aborts() {
        let text = "FileType=text/acmi/tacview\n#1\n1,T=0|0|0,Color=Blue\n";
        let parser = parser();
        let result = parser.parse_source(&mut stream(text), false);
        assert!(matches!(result, Err(AcmiError::Format(_))));
        assert_eq!(parser.metrics().errors, 1);
    }

    #[test]
    fn unmatched_sentences_are_counted_and_skipped() {
        let text = "0,ReferenceTime=2024-03-01T10:00:00Z\n// comment\n\n#0\n";
        let parser = parser();
        parser.parse_source(&mut stream(text), false).unwrap();
        let metrics = parser.metrics();
        assert_eq!(metrics.unmatched, 1);
        assert_eq!(metrics.processed, 3);
    }

    #[test]
    fn dispatch_order_keeps_events_apart_from_properties() {
        let dispatcher = Dispatcher::with_default_handlers(&FogConfig::default());
        assert_eq!(
            dispatcher.classify("0,Event=Bookmark|Here"),
            Some(RecordKind::Event)
        );
        assert_eq!(
            dispatcher.classify("0,Title=Sortie"),
            Some(RecordKind::GlobalProperty)
        );
        assert_eq!(dispatcher.classify("-1f"), Some(RecordKind::ObjectDeletion));
        assert_eq!(dispatcher.classify("garbage"), None);
    }

    #[test]
    fn parse_file_reads_text_recordings() {
        let mut file = Builder::new().suffix(".txt.acmi").tempfile().unwrap();
        file.write_all(RECORDING.as_bytes()).unwrap();
        let acmi = parser().parse_file(file.path()).unwrap();
        assert_eq!(acmi.active_count(), 3);
        assert_eq!(acmi.inactive_count(), 1);
    }
}
