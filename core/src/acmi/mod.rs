pub mod object;
pub mod properties;
pub mod record;
pub mod session;

pub use object::{AcmiObject, ObjectId, ObjectType, PositionRecord, Transform};
pub use properties::{GlobalProperties, PropertyKey, PropertyValue};
pub use record::{AcmiRecord, EventRecord, PropertyRecord, RecordStamp};
pub use session::Acmi;
