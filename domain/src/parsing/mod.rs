//! Recovery of structured data from model output.

pub mod fields;
pub mod response;

pub use response::{ParseStrategy, Parsed, ResponseParser};
