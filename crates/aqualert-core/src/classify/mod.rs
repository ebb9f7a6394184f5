pub mod engine;
pub mod outcome;

pub use engine::classify;
pub use outcome::{SafetyStatus, SafetyVerdict, Violation};
