use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::style::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Width in terminal cells, not bytes or chars.
    pub fn width(&self) -> usize {
        self.text.as_str().width()
    }
}

pub type SpanLine = Vec<Span>;

pub fn line_width(line: &SpanLine) -> usize {
    line.iter().map(Span::width).sum()
}

/// Clips `line` to `max_width` terminal cells, dropping whatever does not
/// fit. A span straddling the boundary is cut at the last whole character.
pub fn truncate_line(line: &SpanLine, max_width: usize) -> SpanLine {
    let mut out = Vec::new();
    let mut used = 0usize;

    for span in line {
        if used >= max_width {
            break;
        }
        let width = span.width();
        if used + width <= max_width {
            used += width;
            out.push(span.clone());
            continue;
        }

        let mut text = String::new();
        for ch in span.text.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if used + ch_width > max_width {
                break;
            }
            used += ch_width;
            text.push(ch);
        }
        if !text.is_empty() {
            out.push(Span {
                text,
                style: span.style,
            });
        }
        break;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{Span, line_width, truncate_line};
    use crate::ui::style::{Color, Style};

    #[test]
    fn width_counts_cells_not_bytes() {
        assert_eq!(Span::new("abc").width(), 3);
        // CJK characters occupy two cells each.
        assert_eq!(Span::new("日本").width(), 4);
    }

    #[test]
    fn truncate_keeps_whole_spans_that_fit() {
        let line = vec![Span::new("hello "), Span::new("world")];
        let clipped = truncate_line(&line, 8);
        assert_eq!(line_width(&clipped), 8);
        assert_eq!(clipped[1].text, "wo");
    }

    #[test]
    fn truncate_preserves_styles() {
        let style = Style::new().color(Color::Green);
        let line = vec![Span::styled("abcdef", style)];
        let clipped = truncate_line(&line, 3);
        assert_eq!(clipped[0].style, style);
        assert_eq!(clipped[0].text, "abc");
    }

    #[test]
    fn truncate_never_splits_a_wide_character() {
        let line = vec![Span::new("日本")];
        let clipped = truncate_line(&line, 3);
        assert_eq!(clipped[0].text, "日");
    }
}
