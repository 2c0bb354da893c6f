//! Markdown rendering for assistant replies.
//!
//! Converts streamed reply text into styled `ratatui` lines after every
//! append, so partially received replies always render as well-formed
//! blocks. Supported structure: paragraphs, `-`/`*` and numbered lists,
//! fenced code blocks, and inline **bold** / *italic* / `code` plus
//! `#`-prefixed headings. Anything fancier renders as plain text rather
//! than being guessed at.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::tui_palette as tp;

/// Render a full message body into display lines.
pub fn render_markdown(content: &str, base_color: Color) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code = false;

    let code_style = Style::default().fg(tp::ACCENT_BRIGHT).bg(tp::SURFACE);

    for raw in content.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            in_code = !in_code;
            lines.push(Line::from(Span::styled(
                raw.to_string(),
                Style::default().fg(tp::MUTED),
            )));
            continue;
        }

        if in_code {
            lines.push(Line::from(Span::styled(format!(" {raw} "), code_style)));
            continue;
        }

        if raw.trim().is_empty() {
            lines.push(Line::default());
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            let mut spans = vec![Span::styled("  • ", Style::default().fg(tp::ACCENT))];
            spans.extend(parse_inline(rest, base_color));
            lines.push(Line::from(spans));
            continue;
        }

        if let Some((marker, rest)) = split_ordered_item(trimmed) {
            let mut spans = vec![Span::styled(
                format!("  {marker} "),
                Style::default().fg(tp::ACCENT),
            )];
            spans.extend(parse_inline(rest, base_color));
            lines.push(Line::from(spans));
            continue;
        }

        lines.push(Line::from(parse_inline(raw, base_color)));
    }

    lines
}

/// Split `"12. rest"` into `("12.", "rest")`, if the line is an ordered
/// list item.
fn split_ordered_item(text: &str) -> Option<(&str, &str)> {
    let dot = text.find(". ")?;
    if dot == 0 || !text[..dot].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((&text[..=dot], &text[dot + 2..]))
}

/// Parse inline markdown into styled [`Span`]s.
///
/// Supports: **bold**, *italic*, `code`, and `#`/`##`/`###` heading
/// prefixes.
fn parse_inline(text: &str, base_color: Color) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    // Heading prefixes render as an accent gutter mark.
    let text = if let Some(rest) = text.strip_prefix("### ") {
        spans.push(Span::styled("▎ ", Style::default().fg(tp::ACCENT)));
        rest
    } else if let Some(rest) = text.strip_prefix("## ") {
        spans.push(Span::styled(
            "▎ ",
            Style::default()
                .fg(tp::ACCENT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        ));
        rest
    } else if let Some(rest) = text.strip_prefix("# ") {
        spans.push(Span::styled(
            "▎ ",
            Style::default().fg(tp::ACCENT).add_modifier(Modifier::BOLD),
        ));
        rest
    } else {
        text
    };

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut i = 0;
    let mut buf = String::new();

    let base = Style::default().fg(base_color);
    let bold = base.add_modifier(Modifier::BOLD);
    let italic = base.add_modifier(Modifier::ITALIC);
    let code = Style::default().fg(tp::ACCENT_BRIGHT).bg(tp::SURFACE);

    while i < len {
        // `code`
        if chars[i] == '`' {
            if !buf.is_empty() {
                spans.push(Span::styled(buf.clone(), base));
                buf.clear();
            }
            i += 1;
            let start = i;
            while i < len && chars[i] != '`' {
                i += 1;
            }
            let code_text: String = chars[start..i].iter().collect();
            spans.push(Span::styled(format!(" {code_text} "), code));
            if i < len {
                i += 1; // skip closing `
            }
            continue;
        }

        // **bold**
        if i + 1 < len && chars[i] == '*' && chars[i + 1] == '*' {
            if !buf.is_empty() {
                spans.push(Span::styled(buf.clone(), base));
                buf.clear();
            }
            i += 2;
            let start = i;
            while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '*') {
                i += 1;
            }
            let bold_text: String = chars[start..i].iter().collect();
            spans.push(Span::styled(bold_text, bold));
            if i + 1 < len {
                i += 2; // skip closing **
            }
            continue;
        }

        // *italic*
        if chars[i] == '*' {
            if !buf.is_empty() {
                spans.push(Span::styled(buf.clone(), base));
                buf.clear();
            }
            i += 1;
            let start = i;
            while i < len && chars[i] != '*' {
                i += 1;
            }
            let italic_text: String = chars[start..i].iter().collect();
            spans.push(Span::styled(italic_text, italic));
            if i < len {
                i += 1; // skip closing *
            }
            continue;
        }

        buf.push(chars[i]);
        i += 1;
    }

    if !buf.is_empty() {
        spans.push(Span::styled(buf, base));
    }

    spans
}
