pub mod document;

pub use document::{ImagePayload, ResumeDocument};
