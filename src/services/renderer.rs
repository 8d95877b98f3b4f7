use crate::models::domain::{ContentBlock, DocumentMetadata, RenderedDocument};

const BRAND: &str = "EduAI Platform";
const TAGLINE: &str = "Empowering Teachers with AI-Powered Educational Tools";
const SUBTITLE: &str = "AI-Generated Educational Content for Multi-Grade Classrooms";

const STYLESHEET: &str = r#"
        @page { size: A4; margin: 20mm; }
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #f4f5fb;
            padding: 20px;
        }
        .container {
            max-width: 800px;
            margin: 0 auto;
            background: white;
            border-radius: 15px;
            overflow: hidden;
        }
        .header {
            background: linear-gradient(135deg, #4f46e5 0%, #7c3aed 100%);
            color: white;
            padding: 30px;
            text-align: center;
        }
        .header h1 { font-size: 2rem; margin-bottom: 10px; }
        .header .subtitle { opacity: 0.9; font-style: italic; }
        .metadata-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
            gap: 12px;
            margin-top: 20px;
            font-size: 0.9rem;
        }
        .metadata-item { background: rgba(255,255,255,0.15); border-radius: 8px; padding: 8px 12px; }
        .content-body { padding: 30px; }
        .content-body h1, .content-body h2, .content-body h3 { color: #4f46e5; margin: 20px 0 10px; }
        .content-body p { margin-bottom: 12px; }
        .content-body ul, .content-body ol { margin: 0 0 12px 25px; }
        .content-body li { margin-bottom: 5px; }
        .highlight-box, .activity-box, .cultural-reference {
            border-radius: 12px;
            padding: 20px;
            margin: 25px 0;
            page-break-inside: avoid;
        }
        .highlight-box { background: #fef3c7; border: 2px solid #f59e0b; }
        .activity-box { background: #dcfce7; border: 2px solid #22c55e; }
        .cultural-reference { background: #f3e8ff; border: 2px solid #a855f7; }
        .footer {
            background: #f8fafc;
            padding: 30px;
            text-align: center;
            border-top: 2px solid #e5e7eb;
        }
        .footer .brand { font-size: 1.5rem; font-weight: 700; color: #4f46e5; }
        .footer .tagline { color: #666; font-style: italic; }
        @media print {
            body { background: white; padding: 0; }
            .container { border-radius: 0; }
        }
"#;

/// Escapes text for inclusion in element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// True when the string already carries block-level markup.
pub fn contains_block_markup(html: &str) -> bool {
    html.contains("<div") || html.contains("<h1") || html.contains("<p")
}

pub fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            format!("<h{level}>{text}</h{level}>")
        }
        ContentBlock::Paragraph { html } if contains_block_markup(html) => html.clone(),
        ContentBlock::Paragraph { html } => format!("<p>{html}</p>"),
        ContentBlock::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let items: String = items
                .iter()
                .map(|item| format!("\n  <li>{item}</li>"))
                .collect();
            format!("<{tag} class=\"content-list\">{items}\n</{tag}>")
        }
        ContentBlock::CalloutBox { kind, html } => {
            format!("<div class=\"{}\">{html}</div>", kind.css_class())
        }
    }
}

fn or_not_specified(value: String) -> String {
    if value.is_empty() {
        "Not specified".to_string()
    } else {
        value
    }
}

/// Ordered `(label, value)` rows of the header grid. Absent optional fields produce no row.
pub fn metadata_rows(metadata: &DocumentMetadata) -> Vec<(&'static str, String)> {
    let mut rows = Vec::with_capacity(6);
    if let Some(subject) = &metadata.subject {
        rows.push(("Subject", subject.clone()));
    }
    rows.push(("Grades", or_not_specified(metadata.grades_display())));
    rows.push(("Languages", or_not_specified(metadata.languages_display())));
    if let Some(count) = metadata.question_count {
        rows.push(("Question Count", count.to_string()));
    }
    rows.push(("Generated By", metadata.agent_label.clone()));
    rows.push((
        "Generated On",
        metadata.generated_at.format("%d/%m/%Y").to_string(),
    ));
    rows
}

fn render_header(metadata: &DocumentMetadata) -> String {
    let generated_at = metadata.generated_at.to_rfc3339();
    let items: String = metadata_rows(metadata)
        .into_iter()
        .map(|(label, value)| {
            let field = label.to_ascii_lowercase().replace(' ', "-");
            if label == "Generated On" {
                format!(
                    "\n        <div class=\"metadata-item\" data-field=\"{field}\" data-timestamp=\"{generated_at}\">{label}: {}</div>",
                    escape_html(&value)
                )
            } else {
                format!(
                    "\n        <div class=\"metadata-item\" data-field=\"{field}\">{label}: {}</div>",
                    escape_html(&value)
                )
            }
        })
        .collect();

    format!(
        r#"<div class="header">
      <h1>{title}</h1>
      <div class="subtitle">{SUBTITLE}</div>
      <div class="metadata-grid">{items}
      </div>
    </div>"#,
        title = escape_html(&metadata.title),
    )
}

/// Renders header, blocks in order and the fixed footer into a self-contained page.
pub fn render(metadata: &DocumentMetadata, blocks: &[ContentBlock]) -> String {
    let body: String = blocks
        .iter()
        .map(|block| format!("\n      {}", render_block(block)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>{STYLESHEET}</style>
</head>
<body>
  <div class="container">
    {header}
    <div class="content-body">{body}
    </div>
    <div class="footer">
      <div class="brand">{BRAND}</div>
      <div class="tagline">{TAGLINE}</div>
    </div>
  </div>
</body>
</html>
"#,
        title = escape_html(&metadata.title),
        header = render_header(metadata),
    )
}

pub fn render_document(document: &RenderedDocument) -> String {
    render(&document.metadata, &document.blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::CalloutKind;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn metadata(subject: Option<&str>) -> DocumentMetadata {
        let mut metadata = DocumentMetadata::new(
            "The Water Cycle",
            BTreeSet::from([6, 7]),
            vec!["English".to_string(), "Hindi".to_string()],
            subject.map(str::to_string),
            "Hyper-Local Content Generator",
        );
        metadata.generated_at = Utc.with_ymd_and_hms(2025, 1, 23, 10, 0, 0).unwrap();
        metadata
    }

    #[test]
    fn header_shows_metadata_rows() {
        let html = render(&metadata(Some("Science")), &[]);

        assert!(html.contains("<h1>The Water Cycle</h1>"));
        assert!(html.contains("Subject: Science"));
        assert!(html.contains("Grades: 6, 7"));
        assert!(html.contains("Languages: English, Hindi"));
        assert!(html.contains("Generated By: Hyper-Local Content Generator"));
        assert!(html.contains("Generated On: 23/01/2025"));
        assert!(html.contains(BRAND));
    }

    #[test]
    fn subject_row_omitted_when_absent() {
        let html = render(&metadata(None), &[]);

        assert!(!html.contains("Subject"));
        assert!(!html.contains("data-field=\"subject\""));
        assert!(html.contains("Grades: 6, 7"));
    }

    #[test]
    fn blocks_render_in_order_with_every_variant() {
        let blocks = vec![
            ContentBlock::heading(2, "Intro"),
            ContentBlock::paragraph("Rain <strong>falls</strong>."),
            ContentBlock::list(true, vec!["one".into(), "two".into()]),
            ContentBlock::callout(CalloutKind::Cultural, "Monsoon in Kerala"),
        ];
        let html = render(&metadata(None), &blocks);

        let positions: Vec<usize> = [
            "<h2>Intro</h2>",
            "<p>Rain <strong>falls</strong>.</p>",
            "<ol class=\"content-list\">",
            "<div class=\"cultural-reference\">Monsoon in Kerala</div>",
            "class=\"footer\"",
        ]
        .iter()
        .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn title_and_metadata_are_escaped() {
        let mut metadata = metadata(Some("<script>"));
        metadata.title = "Fish & Chips <b>".to_string();
        let html = render(&metadata, &[]);

        assert!(html.contains("Fish &amp; Chips &lt;b&gt;"));
        assert!(html.contains("Subject: &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn paragraph_with_block_markup_is_emitted_verbatim() {
        let raw = "<div class=\"x\"><p>kept</p></div>";
        assert_eq!(render_block(&ContentBlock::paragraph(raw)), raw);
    }

    #[test]
    fn question_count_row_is_optional() {
        let html = render(&metadata(None).with_question_count(30), &[]);
        assert!(html.contains("Question Count: 30"));
        assert!(!render(&metadata(None), &[]).contains("Question Count"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let blocks = vec![ContentBlock::paragraph("same")];
        assert_eq!(render(&metadata(None), &blocks), render(&metadata(None), &blocks));
    }
}
