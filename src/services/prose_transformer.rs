use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    models::domain::{CalloutKind, ContentBlock},
    services::renderer::{contains_block_markup, escape_html, render_block},
};

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(#{1,6})\s+(.*?)\s*$").expect("HEADING is a valid regex pattern")
});

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("BOLD is a valid regex pattern"));

static ITALIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^*\s](?:[^*]*?[^*\s])?)\*").expect("ITALIC is a valid regex pattern")
});

static BULLET_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[*\-•]\s+(.*?)\s*$").expect("BULLET_ITEM is a valid regex pattern")
});

static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+[.)]\s+(.*?)\s*$").expect("ORDERED_ITEM is a valid regex pattern")
});

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("TAG is a valid regex pattern"));

const HIGHLIGHT_MARKERS: &[&str] = &["key point:", "important:", "💡"];
const ACTIVITY_MARKERS: &[&str] = &["activity:", "exercise:", "🎯"];
const CULTURAL_MARKERS: &[&str] = &["cultural context:", "indian example:", "🇮🇳"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Tag-stripped text contains one of the markers, compared case-insensitively.
    ContainsMarker(&'static [&'static str]),
    HasListItems,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Callout(CalloutKind),
    List,
    Paragraph,
}

/// First matching rule wins; a paragraph matching none stays a paragraph.
pub const CLASSIFICATION_RULES: &[(Predicate, BlockKind)] = &[
    (
        Predicate::ContainsMarker(HIGHLIGHT_MARKERS),
        BlockKind::Callout(CalloutKind::Highlight),
    ),
    (
        Predicate::ContainsMarker(ACTIVITY_MARKERS),
        BlockKind::Callout(CalloutKind::Activity),
    ),
    (
        Predicate::ContainsMarker(CULTURAL_MARKERS),
        BlockKind::Callout(CalloutKind::Cultural),
    ),
    (Predicate::HasListItems, BlockKind::List),
];

#[derive(Clone, Debug, PartialEq, Eq)]
enum Line {
    Heading { level: u8, html: String },
    Item { ordered: bool, html: String, full: String },
    Text(String),
}

impl Line {
    fn html(&self) -> &str {
        match self {
            Line::Heading { html, .. } | Line::Item { full: html, .. } | Line::Text(html) => html,
        }
    }
}

fn apply_inline(escaped: &str) -> String {
    let bolded = BOLD.replace_all(escaped, "<strong>$1</strong>");
    ITALIC.replace_all(&bolded, "<em>$1</em>").into_owned()
}

fn substitute_line(line: &str) -> Line {
    let escaped = escape_html(line);

    if let Some(caps) = HEADING.captures(&escaped) {
        let level = caps[1].len().min(3) as u8;
        return Line::Heading {
            level,
            html: apply_inline(&caps[2]),
        };
    }

    let html = apply_inline(escaped.trim());
    if let Some(caps) = BULLET_ITEM.captures(&html) {
        return Line::Item {
            ordered: false,
            html: caps[1].to_string(),
            full: html.clone(),
        };
    }
    if let Some(caps) = ORDERED_ITEM.captures(&html) {
        return Line::Item {
            ordered: true,
            html: caps[1].to_string(),
            full: html.clone(),
        };
    }
    Line::Text(html)
}

fn join_html(lines: &[Line]) -> String {
    lines
        .iter()
        .map(Line::html)
        .collect::<Vec<_>>()
        .join("<br>")
}

fn plain_text(lines: &[Line]) -> String {
    TAG.replace_all(&join_html(lines), "").to_lowercase()
}

impl Predicate {
    fn matches(&self, lines: &[Line], plain: &str) -> bool {
        match self {
            Predicate::ContainsMarker(markers) => {
                markers.iter().any(|marker| plain.contains(marker))
            }
            Predicate::HasListItems => lines.iter().any(|line| matches!(line, Line::Item { .. })),
        }
    }
}

fn classify_lines(lines: &[Line]) -> BlockKind {
    let plain = plain_text(lines);
    CLASSIFICATION_RULES
        .iter()
        .find(|(predicate, _)| predicate.matches(lines, &plain))
        .map(|(_, kind)| *kind)
        .unwrap_or(BlockKind::Paragraph)
}

/// Classifies one blank-line-delimited paragraph of prose.
pub fn classify_paragraph(paragraph: &str) -> BlockKind {
    let lines: Vec<Line> = paragraph
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(substitute_line)
        .collect();
    classify_lines(&lines)
}

fn list_blocks(lines: &[Line]) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut preamble: Vec<Line> = Vec::new();
    let mut ordered = None;
    let mut items: Vec<String> = Vec::new();

    for line in lines {
        match line {
            Line::Item {
                ordered: is_ordered,
                html,
                ..
            } => {
                ordered.get_or_insert(*is_ordered);
                items.push(html.clone());
            }
            other => match items.last_mut() {
                Some(last) => {
                    if !last.is_empty() {
                        last.push(' ');
                    }
                    last.push_str(other.html());
                }
                None => preamble.push(other.clone()),
            },
        }
    }

    if !preamble.is_empty() {
        blocks.push(ContentBlock::paragraph(join_html(&preamble)));
    }
    items.retain(|item| !item.is_empty());
    if !items.is_empty() {
        blocks.push(ContentBlock::list(ordered.unwrap_or(false), items));
    }
    blocks
}

fn build_blocks(lines: &[Line]) -> Vec<ContentBlock> {
    if lines.is_empty() {
        return Vec::new();
    }
    match classify_lines(lines) {
        BlockKind::Callout(kind) => vec![ContentBlock::callout(kind, join_html(lines))],
        BlockKind::List => list_blocks(lines),
        BlockKind::Paragraph => vec![ContentBlock::paragraph(join_html(lines))],
    }
}

fn paragraph_blocks(paragraph: &[&str]) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut segment: Vec<Line> = Vec::new();

    for line in paragraph.iter().map(|line| substitute_line(line)) {
        match line {
            Line::Heading { level, html } => {
                blocks.extend(build_blocks(&segment));
                segment.clear();
                blocks.push(ContentBlock::heading(level, html));
            }
            other => segment.push(other),
        }
    }
    blocks.extend(build_blocks(&segment));
    blocks
}

fn split_paragraphs(raw: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Turns lightly-marked-up prose into typed blocks.
///
/// Text that already carries block markup passes through as a single raw paragraph.
pub fn to_blocks(raw: &str) -> Vec<ContentBlock> {
    if contains_block_markup(raw) {
        return vec![ContentBlock::paragraph(raw)];
    }

    split_paragraphs(raw)
        .iter()
        .flat_map(|paragraph| paragraph_blocks(paragraph))
        .collect()
}

/// Serializes blocks to a content fragment that `to_blocks` will pass through unchanged.
pub fn blocks_to_html(blocks: &[ContentBlock]) -> String {
    let html = blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n");
    if blocks.is_empty() || contains_block_markup(&html) {
        html
    } else {
        format!("<div class=\"content-body\">\n{html}\n</div>")
    }
}
