pub mod deletion;
pub mod event;
pub mod global_property;
pub mod headers;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod timeframe;

pub use deletion::ObjectDeletionHandler;
pub use event::EventHandler;
pub use global_property::GlobalPropertyHandler;
pub use headers::FileHeadersHandler;
pub use object::{object_update_id, ObjectHandler};
pub use parser::{Dispatcher, Parser, PROGRESS_INTERVAL};
pub use resolver::{ActivityResolver, Candidate};
pub use timeframe::TimeframeHandler;
