// Utility Module
// Input validation and the diagnostic log sink

pub mod input;
pub mod log_sink;

pub use input::{parse_tokens, read_line_tokens, PROMPT};
pub use log_sink::{LogSink, LogSinkError};
