//! Reply payloads and quote formatting

pub mod formatter;
pub mod message;

pub use formatter::QuoteFormatter;
pub use message::{BoxLayout, FlexBubble, FlexComponent, ReplyMessage};
