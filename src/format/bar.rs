//! Bar line: three-section fixed-width text line.
//!
//! A line with left, center, and right sections, each limited to a third
//! of the width. Used for one buffer node per line in the buffer panel.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A three-section line (left, center, right).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarLine {
    /// Left section content.
    left: String,
    /// Center section content.
    center: String,
    /// Right section content.
    right: String,
}

impl BarLine {
    /// Create a bar line with all sections set.
    pub fn new(left: impl Into<String>, center: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            center: center.into(),
            right: right.into(),
        }
    }

    /// Get the left section content.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Get the center section content.
    pub fn center(&self) -> &str {
        &self.center
    }

    /// Get the right section content.
    pub fn right(&self) -> &str {
        &self.right
    }

    /// Render to exactly `width` display columns.
    ///
    /// Left is left-aligned, center is centered, right is right-aligned.
    /// Sections longer than a third of the width are cut at a grapheme
    /// boundary.
    pub fn render(&self, width: u16) -> String {
        let width = usize::from(width);
        let third = width / 3;

        let (left, left_cols) = fit(&self.left, third);
        let (center, center_cols) = fit(&self.center, third);
        let (right, right_cols) = fit(&self.right, third);

        let center_start = (width - center_cols) / 2;
        let right_start = width - right_cols;

        let mut line = String::with_capacity(width);
        line.push_str(&left);
        pad(&mut line, center_start - left_cols);
        line.push_str(&center);
        pad(&mut line, right_start - center_start - center_cols);
        line.push_str(&right);
        line
    }
}

/// Cut `text` to at most `max_cols` display columns.
///
/// Returns the kept prefix and its width in columns.
pub fn fit(text: &str, max_cols: usize) -> (String, usize) {
    let mut kept = String::new();
    let mut cols = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if cols + w > max_cols {
            break;
        }
        kept.push_str(grapheme);
        cols += w;
    }
    (kept, cols)
}

fn pad(line: &mut String, count: usize) {
    line.extend(std::iter::repeat(' ').take(count));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_line_sections() {
        let bar = BarLine::new("Left", "Mid", "Right");
        let line = bar.render(30);

        assert_eq!(line.width(), 30);
        assert!(line.starts_with("Left"));
        assert!(line.ends_with("Right"));
        assert_eq!(&line[13..16], "Mid");
    }

    #[test]
    fn test_bar_line_truncates() {
        let bar = BarLine::new("abcdefghijkl", "", "");
        let line = bar.render(12);
        assert_eq!(line, "abcd        ");
    }

    #[test]
    fn test_fit_respects_wide_graphemes() {
        // Each ideograph is two columns wide.
        let (kept, cols) = fit("日本語", 5);
        assert_eq!(kept, "日本");
        assert_eq!(cols, 4);

        let (kept, cols) = fit("e\u{301}x", 1);
        assert_eq!(kept, "e\u{301}");
        assert_eq!(cols, 1);
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(BarLine::new("a", "b", "c").render(0), "");
    }
}
