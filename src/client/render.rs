// src/client/render.rs
use crossterm::style::{Attribute, SetAttribute};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

use super::conversation::{Message, Sender};

pub const LOADING_INDICATOR: &str = "Just a sec...";

const CODE_INDENT: &str = "    ";

/// Renders Markdown into terminal lines. Emphasis becomes SGR styling.
pub fn render_markdown(text: &str) -> Vec<String> {
    let mut out = MarkdownLines::default();

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { .. }) => out.flush(),
            Event::End(TagEnd::Heading(level)) => {
                let title = std::mem::take(&mut out.current);
                let title = title.trim_end();
                let rule = if level == HeadingLevel::H1 { "=" } else { "-" };
                out.lines.push(title.to_string());
                out.lines.push(rule.repeat(title.width().max(1)));
                out.lines.push(String::new());
            }
            Event::End(TagEnd::Paragraph) => {
                out.flush();
                if out.lists.is_empty() {
                    out.lines.push(String::new());
                }
            }
            Event::Start(Tag::List(start)) => {
                out.flush();
                out.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                out.flush();
                out.lists.pop();
                if out.lists.is_empty() {
                    out.lines.push(String::new());
                }
            }
            Event::Start(Tag::Item) => {
                out.flush();
                let indent = "  ".repeat(out.lists.len().saturating_sub(1));
                let marker = match out.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                out.current = format!("{indent}{marker}");
            }
            Event::End(TagEnd::Item) => out.flush(),
            Event::Start(Tag::CodeBlock(_)) => {
                out.flush();
                out.code = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                // Code inside a list item stays under the item's text.
                let indent = "  ".repeat(out.lists.len());
                if let Some(code) = out.code.take() {
                    for line in code.lines() {
                        out.lines.push(format!("{indent}{CODE_INDENT}{line}").trim_end().to_string());
                    }
                }
                if out.lists.is_empty() {
                    out.lines.push(String::new());
                }
            }
            Event::Start(Tag::Emphasis) => out.push_style(Attribute::Italic),
            Event::Start(Tag::Strong) => out.push_style(Attribute::Bold),
            Event::End(TagEnd::Emphasis) | Event::End(TagEnd::Strong) => out.pop_style(),
            Event::Code(code) => {
                out.current.push('`');
                out.current.push_str(&code);
                out.current.push('`');
            }
            Event::Text(text) => match out.code.as_mut() {
                Some(code) => code.push_str(&text),
                None => out.current.push_str(&text),
            },
            Event::Html(html) | Event::InlineHtml(html) => out.current.push_str(&html),
            Event::SoftBreak => out.current.push(' '),
            Event::HardBreak => out.flush(),
            Event::Rule => {
                out.flush();
                out.lines.push("───".to_string());
                out.lines.push(String::new());
            }
            Event::TaskListMarker(done) => out.current.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    out.finish()
}

#[derive(Default)]
struct MarkdownLines {
    lines: Vec<String>,
    current: String,
    // One entry per open list; `Some(n)` is the next number of an ordered list.
    lists: Vec<Option<u64>>,
    code: Option<String>,
    styles: Vec<Attribute>,
}

impl MarkdownLines {
    fn push_style(&mut self, attribute: Attribute) {
        self.styles.push(attribute);
        self.current.push_str(&SetAttribute(attribute).to_string());
    }

    // SGR has no per-attribute "off" that covers both bold and italic, so
    // reset and re-apply whatever is still open.
    fn pop_style(&mut self) {
        self.styles.pop();
        self.current.push_str(&SetAttribute(Attribute::Reset).to_string());
        for attribute in &self.styles {
            self.current.push_str(&SetAttribute(*attribute).to_string());
        }
    }

    fn flush(&mut self) {
        let line = std::mem::take(&mut self.current);
        if !line.trim().is_empty() {
            self.lines.push(line.trim_end().to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Label plus body of one message. User text is plain and right-aligned;
/// assistant text is Markdown and left-aligned.
pub fn render_message(message: &Message, width: usize) -> Vec<String> {
    let label = format!("{}:", message.sender.label());
    match message.sender {
        Sender::User => std::iter::once(label.as_str())
            .chain(message.text.lines())
            .map(|line| align_right(line, width))
            .collect(),
        Sender::Assistant => std::iter::once(label)
            .chain(render_markdown(&message.text))
            .collect(),
    }
}

/// The whole chat view, messages separated by a blank line.
pub fn render_transcript(messages: &[Message], loading: bool, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for message in messages {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(render_message(message, width));
    }
    if loading {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(LOADING_INDICATOR.to_string());
    }
    lines
}

fn align_right(line: &str, width: usize) -> String {
    let pad = width.saturating_sub(line.width());
    format!("{}{}", " ".repeat(pad), line)
}
