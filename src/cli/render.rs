// src/cli/render.rs — Markdown answer rendering for the terminal

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::theme::{Emphasis, Theme};
use crate::core::types::Session;
use crate::infra::config::DisplayConfig;

/// The session's answer, ready to print.
pub fn answer_text(session: &Session, display: &DisplayConfig, theme: &Theme) -> String {
    let markdown = session.response_markdown();
    if display.render_markdown {
        render_markdown(&markdown, theme)
    } else {
        markdown
    }
}

/// Render a markdown answer as terminal text.
///
/// Soft breaks stay line breaks: answers built from joined test cases rely on
/// one case per line.
pub fn render_markdown(markdown: &str, theme: &Theme) -> String {
    let mut out = String::new();
    let mut lists: Vec<Option<u64>> = Vec::new();
    // Per open list item: whether a paragraph has already been written.
    let mut items: Vec<bool> = Vec::new();
    let mut emphasis = Emphasis::default();
    let mut in_code_block = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                blank_line(&mut out);
                emphasis.heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                emphasis.heading = false;
                out.push('\n');
            }
            Event::Start(Tag::Paragraph) => {
                if lists.is_empty() {
                    blank_line(&mut out);
                } else if items.last() == Some(&true) {
                    end_line(&mut out);
                    out.push_str(&"  ".repeat(lists.len()));
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if lists.is_empty() {
                    out.push('\n');
                } else if let Some(written) = items.last_mut() {
                    *written = true;
                }
            }
            Event::Start(Tag::List(start)) => {
                if lists.is_empty() {
                    blank_line(&mut out);
                } else {
                    end_line(&mut out);
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                end_line(&mut out);
                let depth = lists.len().saturating_sub(1);
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{n}.");
                        *n += 1;
                        m
                    }
                    _ => "-".to_string(),
                };
                out.push_str(&"  ".repeat(depth));
                out.push_str(&theme.bullet(&marker));
                out.push(' ');
                items.push(false);
            }
            Event::End(TagEnd::Item) => {
                items.pop();
                end_line(&mut out);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                blank_line(&mut out);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::Strong) => emphasis.strong = true,
            Event::End(TagEnd::Strong) => emphasis.strong = false,
            Event::Start(Tag::Emphasis) => emphasis.italic = true,
            Event::End(TagEnd::Emphasis) => emphasis.italic = false,
            Event::Text(text) => {
                if in_code_block {
                    for line in text.lines() {
                        out.push_str("    ");
                        out.push_str(&theme.code(line));
                        out.push('\n');
                    }
                } else {
                    out.push_str(&theme.inline(&text, emphasis));
                }
            }
            Event::Code(code) => out.push_str(&theme.code(&code)),
            Event::SoftBreak | Event::HardBreak => {
                out.push('\n');
                if !lists.is_empty() {
                    out.push_str(&"  ".repeat(lists.len()));
                }
            }
            Event::Rule => {
                blank_line(&mut out);
                out.push_str(&theme.dim("---"));
                out.push('\n');
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}

/// Start a new line unless already at one.
fn end_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Leave exactly one empty line before the next block.
fn blank_line(out: &mut String) {
    if out.is_empty() {
        return;
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}
