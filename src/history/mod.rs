//! Turn-by-turn game history.
//!
//! - `record`: `TurnRecord` snapshots and the append-only `History`
//! - `export`: CSV write/read and a text table for display

pub mod record;
pub mod export;

pub use record::{History, TurnRecord};
pub use export::columns;
