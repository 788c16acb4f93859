pub mod error;
pub mod source;
pub mod table;

pub use error::{Result, RosterError};
pub use source::{HttpRosterSource, RosterSource};
pub use table::RosterTable;
