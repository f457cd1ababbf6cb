//! High-level operations: compile, provision, doctor, and the worker
//! runner that executes them one at a time.

pub mod compile;
pub mod doctor;
pub mod events;
pub mod provision;
pub mod runner;

pub use compile::{compile, CompileError, CompileOptions};
pub use doctor::{doctor, format_report, DoctorReport};
pub use events::CompileEvent;
pub use provision::provision_sdk;
pub use runner::{EventSink, Runner};
