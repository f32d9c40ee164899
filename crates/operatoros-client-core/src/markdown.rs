//! Best-effort markdown-ish rendering for AI replies.
//!
//! Passes run in a fixed order: escape, bold, italic, paragraph split, then
//! per-paragraph list grouping. A lone `*` is left as literal text, but an
//! unclosed `**` is read as an empty italic span.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").ok());
static ITALIC: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").ok());
static PARAGRAPH_BREAK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\n{2,}").ok());
static BULLET_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^- (.+)$").ok());
static NUMBERED_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d+\. (.+)$").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Text,
    Bullet,
    Numbered,
}

/// Renders a plain-text AI response as HTML.
#[must_use]
pub fn format_ai_response(response: &str) -> String {
    let normalized = response.replace("\r\n", "\n");
    let escaped = escape_html(&normalized);
    let inline = apply_inline(&escaped);

    let paragraphs: Vec<&str> = match PARAGRAPH_BREAK.as_ref() {
        Some(pattern) => pattern.split(&inline).collect(),
        None => vec![inline.as_str()],
    };

    let mut html = String::with_capacity(inline.len() + 32);
    for paragraph in paragraphs {
        render_paragraph(paragraph, &mut html);
    }
    html
}

fn apply_inline(text: &str) -> String {
    let mut out = text.to_string();
    if let Some(bold) = BOLD.as_ref() {
        out = bold.replace_all(&out, "<strong>$1</strong>").into_owned();
    }
    if let Some(italic) = ITALIC.as_ref() {
        out = italic.replace_all(&out, "<em>$1</em>").into_owned();
    }
    out
}

fn classify(line: &str) -> (BlockKind, &str) {
    if let Some(item) = capture_item(BULLET_LINE.as_ref(), line) {
        return (BlockKind::Bullet, item);
    }
    if let Some(item) = capture_item(NUMBERED_LINE.as_ref(), line) {
        return (BlockKind::Numbered, item);
    }
    (BlockKind::Text, line)
}

fn capture_item<'a>(pattern: Option<&Regex>, line: &'a str) -> Option<&'a str> {
    pattern?
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|item| item.as_str())
}

fn render_paragraph(paragraph: &str, html: &mut String) {
    let paragraph = paragraph.trim_matches('\n');
    if paragraph.trim().is_empty() {
        return;
    }

    let mut run: Vec<&str> = Vec::new();
    let mut run_kind = BlockKind::Text;
    for line in paragraph.split('\n') {
        let (kind, content) = classify(line);
        if kind != run_kind && !run.is_empty() {
            flush_run(run_kind, &run, html);
            run.clear();
        }
        run_kind = kind;
        run.push(content);
    }
    if !run.is_empty() {
        flush_run(run_kind, &run, html);
    }
}

fn flush_run(kind: BlockKind, lines: &[&str], html: &mut String) {
    match kind {
        BlockKind::Text => {
            html.push_str("<p>");
            html.push_str(&lines.join("<br>"));
            html.push_str("</p>");
        }
        BlockKind::Bullet | BlockKind::Numbered => {
            let tag = if kind == BlockKind::Bullet { "ul" } else { "ol" };
            html.push_str(&format!("<{tag}>"));
            for item in lines {
                html.push_str(&format!("<li>{item}</li>"));
            }
            html.push_str(&format!("</{tag}>"));
        }
    }
}

#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
