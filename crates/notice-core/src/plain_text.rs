//! Plain-text summaries of chat messages for notification bodies.

use std::sync::LazyLock;

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::constants::{keys, DEFAULT_PLAIN_TEXT_LIMIT};
use crate::lang::Localizer;
use crate::models::{ChatMessage, MessageContent};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("tag pattern is valid"));

/// Renders a message's rich content to HTML.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, message: &ChatMessage) -> String;
}

/// Markdown messages through pulldown-cmark, plain text escaped as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, message: &ChatMessage) -> String {
        match &message.content {
            MessageContent::Text {
                text,
                markdown: true,
            } => {
                let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
                let parser = Parser::new_ext(text, options);
                let mut out = String::with_capacity(text.len() * 3 / 2);
                html::push_html(&mut out, parser);
                out
            }
            MessageContent::Text { text, .. } => escape_html(text),
            MessageContent::File { name, .. } | MessageContent::Image { name } => {
                escape_html(name)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainTextOptions {
    /// Maximum length in characters; `None` keeps the full text
    pub limit_length: Option<usize>,
    /// Collapse line breaks into spaces
    pub ignore_break: bool,
}

impl Default for PlainTextOptions {
    fn default() -> Self {
        Self {
            limit_length: Some(DEFAULT_PLAIN_TEXT_LIMIT),
            ignore_break: true,
        }
    }
}

/// Describe a chat message as bounded plain text.
pub fn plain_text_of_chat_message(
    message: &ChatMessage,
    renderer: &dyn ContentRenderer,
    lang: &dyn Localizer,
    options: PlainTextOptions,
) -> String {
    match &message.content {
        MessageContent::File { name, .. } => {
            return format!("[{}]", lang.format(keys::FILE_TITLE, &[name.as_str()]));
        }
        MessageContent::Image { .. } => {
            return format!("[{}]", lang.string(keys::IMAGE_TITLE));
        }
        MessageContent::Text { .. } => {}
    }

    let rendered = renderer.render(message);
    let mut plain_text = decode_entities(&TAG_RE.replace_all(&rendered, ""));
    if options.ignore_break {
        plain_text = plain_text.trim().replace(['\r', '\n'], " ");
    }
    match options.limit_length {
        Some(limit) if limit > 0 && plain_text.chars().count() > limit => {
            plain_text.chars().take(limit).collect()
        }
        _ => plain_text,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
