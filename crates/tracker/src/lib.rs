// Library crate: the tracker state engine, derived views and the JSON command
// interface. The binary only wires stdin/stdout to `command`.

pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod i18n;
pub mod state;
pub mod views;
