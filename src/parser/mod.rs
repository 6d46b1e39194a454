pub mod gemini;

pub use gemini::{GeminiParser, ParsedReminder};
