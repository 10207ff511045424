//! Item label template.
//!
//! Widgets can be handed an item before its record back-reference is filled
//! in, or with no item at all, so the label falls back in three steps:
//! icon + title from the record, then the raw content text, then a
//! placeholder.

use crate::dataset::VisualItem;

const PLACEHOLDER: &str = "<span>Unnamed</span>";

/// Render the label markup for an item.
pub fn render_label(item: Option<&VisualItem>) -> String {
    let Some(item) = item else {
        return PLACEHOLDER.to_string();
    };
    let Some(record) = &item.record else {
        return format!("<span>{}</span>", escape_html(&item.content));
    };
    match record.icon.as_deref().filter(|icon| !icon.is_empty()) {
        Some(icon) => format!(
            "<span>{} {}</span>",
            escape_html(icon),
            escape_html(&record.title)
        ),
        None => format!("<span>{}</span>", escape_html(&record.title)),
    }
}

/// Escape text for inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
