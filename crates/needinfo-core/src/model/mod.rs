//! Plain data types shared by the derivation stages.

pub mod boilerplate;
pub mod event;
pub mod ticket;

pub use boilerplate::{
    BoilerplateComment, BoilerplateLog, ISSUE_MISSING_DATA, NEEDS_INFO_BASE, parse_marker,
};
pub use event::{Event, EventKind, UnknownEventKind};
pub use ticket::{TemplateFields, TicketKind, deserialize_template_fields};
