use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Reply, Topic};
use crate::thread::ReplyThread;

static INLINE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{3000}]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n\s*(\n\s*)+").unwrap());

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Wrap body lines at this many characters (0 = no wrapping)
    pub line_width: usize,

    /// Collapse runs of spaces and blank lines in body text
    pub normalize_whitespace: bool,

    /// Include the topic body and reply contents in detail output
    pub include_content: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { line_width: 80, normalize_whitespace: true, include_content: true }
    }
}

/// Plain text renderer for topics, topic lists and reply threads
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn topic_list(&self, topics: &[Topic]) -> String {
        topics_to_text(topics, &self.config)
    }

    pub fn topic(&self, topic: &Topic) -> String {
        topic_to_text(topic, &self.config)
    }

    pub fn thread(&self, thread: &ReplyThread<'_>) -> String {
        thread_to_text(thread, &self.config)
    }

    pub fn mentions(&self, target: &str, replies: &[&Reply]) -> String {
        mentions_to_text(target, replies, &self.config)
    }
}

/// Render a listing as numbered entries
pub fn topics_to_text(topics: &[Topic], config: &TextConfig) -> String {
    let width = topics.len().to_string().len();
    let mut output = String::new();

    for (index, topic) in topics.iter().enumerate() {
        let pad = " ".repeat(width + 2);
        output.push_str(&format!("{:>width$}. {}\n", index + 1, clean(&topic.title, config), width = width));
        output.push_str(&format!(
            "{}{} · {} comments · {}\n",
            pad,
            display_or(&topic.author, "unknown"),
            topic.comment_count,
            display_or(&topic.activity_time, "-")
        ));
        output.push_str(&format!("{}{}\n", pad, topic.url));
    }

    output.trim_end().to_string()
}

/// Render one topic with its replies
pub fn topic_to_text(topic: &Topic, config: &TextConfig) -> String {
    let mut output = String::new();
    let title = clean(&topic.title, config);

    output.push_str(&title);
    output.push('\n');
    output.push_str(&"=".repeat(title.chars().count().max(1)));
    output.push('\n');
    output.push_str(&format!(
        "{} · {}\n{}\n",
        display_or(&topic.author, "unknown"),
        display_or(&topic.activity_time, "-"),
        topic.url
    ));

    if config.include_content && !topic.content.is_empty() {
        output.push('\n');
        output.push_str(&body(&topic.content, config, ""));
        output.push('\n');
    }

    output.push_str(&format!("\nReplies ({})\n", topic.replies.len()));
    output.push_str(&"-".repeat(12));
    output.push('\n');

    for reply in &topic.replies {
        output.push_str(&reply_to_text(reply, config));
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Render a reply and the replies addressed to its author
pub fn thread_to_text(thread: &ReplyThread<'_>, config: &TextConfig) -> String {
    let mut output = reply_to_text(thread.reply, config);
    output.push('\n');
    output.push_str(&mentions_to_text(&thread.reply.author, &thread.responses, config));
    output
}

/// Render the replies that mention `target`
pub fn mentions_to_text(target: &str, replies: &[&Reply], config: &TextConfig) -> String {
    let mut output = format!("Replies to {} ({})\n", display_or(target, "unknown"), replies.len());
    output.push_str(&"-".repeat(12));
    output.push('\n');

    if replies.is_empty() {
        output.push_str("(none)\n");
    }

    for reply in replies {
        output.push_str(&reply_to_text(reply, config));
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Render a single reply header plus indented content
pub fn reply_to_text(reply: &Reply, config: &TextConfig) -> String {
    let mut header = format!(
        "#{} {} · {}",
        display_or(&reply.number, "?"),
        display_or(&reply.author, "unknown"),
        display_or(&reply.time, "-")
    );

    if reply.is_mention() {
        header.push_str(&format!(" → @{}", reply.mentioned_author));
    }
    if reply.reply_count > 0 {
        header.push_str(&format!(" [{} replies]", reply.reply_count));
    }
    header.push('\n');

    if config.include_content && !reply.content.is_empty() {
        header.push_str(&body(&reply.content, config, "    "));
        header.push('\n');
    }

    header
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

fn clean(text: &str, config: &TextConfig) -> String {
    if config.normalize_whitespace { normalize_whitespace(text) } else { text.trim().to_string() }
}

fn body(text: &str, config: &TextConfig, indent: &str) -> String {
    let text = clean(text, config);
    let width = config.line_width.saturating_sub(indent.chars().count());

    text.lines()
        .flat_map(|line| wrap_line(line.trim(), if config.line_width == 0 { 0 } else { width.max(1) }))
        .map(|line| if line.is_empty() { line } else { format!("{}{}", indent, line) })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse inline whitespace runs and multiple blank lines
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = INLINE_SPACE.replace_all(text.trim(), " ");
    BLANK_LINES.replace_all(&collapsed, "\n\n").to_string()
}

/// Wrap one line at `width` characters, splitting words longer than a line
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while !word.is_empty() {
            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };

            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(word.iter());
                current_len += word.len();
                word.clear();
            } else if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            } else {
                let rest = word.split_off(width);
                current.extend(word.iter());
                lines.push(std::mem::take(&mut current));
                word = rest;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
