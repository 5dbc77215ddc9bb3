pub mod json;
pub mod text;

pub use json::{JsonConfig, JsonFormatter, mentions_to_json, thread_to_json, topic_to_json, topics_to_json};
pub use text::{TextConfig, TextFormatter, mentions_to_text, thread_to_text, topic_to_text, topics_to_text};
