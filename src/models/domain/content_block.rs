use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum CalloutKind {
    Highlight,
    Activity,
    Cultural,
}

impl CalloutKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            CalloutKind::Highlight => "highlight-box",
            CalloutKind::Activity => "activity-box",
            CalloutKind::Cultural => "cultural-reference",
        }
    }
}

/// One typed unit of renderable content. Html payloads are already escaped.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph { html: String },
    List { ordered: bool, items: Vec<String> },
    CalloutBox { kind: CalloutKind, html: String },
}

impl ContentBlock {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        ContentBlock::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        }
    }

    pub fn paragraph(html: impl Into<String>) -> Self {
        ContentBlock::Paragraph { html: html.into() }
    }

    pub fn list(ordered: bool, items: Vec<String>) -> Self {
        ContentBlock::List { ordered, items }
    }

    pub fn callout(kind: CalloutKind, html: impl Into<String>) -> Self {
        ContentBlock::CalloutBox {
            kind,
            html: html.into(),
        }
    }
}
