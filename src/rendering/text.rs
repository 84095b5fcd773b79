//! Font faces, measuring and line breaking

use std::sync::OnceLock;

use fontdue::{Font, FontSettings};

use crate::{Error, Result};

static REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

static FONTS: OnceLock<std::result::Result<FontBook, String>> = OnceLock::new();

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    Bold,
}

/// The two embedded faces every template draws with
pub struct FontBook {
    regular: Font,
    bold: Font,
}

/// Shared font book, parsed on first use.
pub fn fonts() -> Result<&'static FontBook> {
    FONTS
        .get_or_init(FontBook::load)
        .as_ref()
        .map_err(|e| Error::RenderError(format!("font loading failed: {}", e)))
}

impl FontBook {
    fn load() -> std::result::Result<Self, String> {
        let regular = Font::from_bytes(REGULAR_TTF, FontSettings::default())
            .map_err(|e| format!("regular face: {}", e))?;
        let bold = Font::from_bytes(BOLD_TTF, FontSettings::default())
            .map_err(|e| format!("bold face: {}", e))?;
        log::debug!("loaded embedded font faces");
        Ok(Self { regular, bold })
    }

    pub fn face(&self, weight: Weight) -> &Font {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    /// Advance width of `text` on a single line, kerning included.
    pub fn measure(&self, text: &str, px: f32, weight: Weight) -> f32 {
        let face = self.face(weight);
        let mut width = 0.0;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += face.horizontal_kern(p, ch, px).unwrap_or(0.0);
            }
            width += face.metrics(ch, px).advance_width;
            prev = Some(ch);
        }
        width
    }

    pub fn ascent(&self, px: f32, weight: Weight) -> f32 {
        self.face(weight)
            .horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px * 0.8)
    }

    /// Breaks `text` into lines no wider than `max_width`.
    ///
    /// Explicit newlines are kept (pre-line semantics), runs of spaces
    /// collapse, and a word wider than the line is split between characters.
    pub fn wrap(&self, text: &str, px: f32, weight: Weight, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if self.measure(&candidate, px, weight) <= max_width {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if self.measure(word, px, weight) <= max_width {
                    current = word.to_string();
                } else {
                    let mut pieces = self.split_word(word, px, weight, max_width);
                    current = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }
            lines.push(current);
        }
        // A trailing empty paragraph adds nothing visible.
        while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }

    fn split_word(&self, word: &str, px: f32, weight: Weight, max_width: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for ch in word.chars() {
            current.push(ch);
            if current.chars().count() > 1 && self.measure(&current, px, weight) > max_width {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        pieces.push(current);
        pieces
    }

    /// Keeps at most `max_lines` lines, ending the last kept line with an
    /// ellipsis when something was cut. Returns whether truncation happened.
    pub fn clip_lines(
        &self,
        mut lines: Vec<String>,
        max_lines: usize,
        px: f32,
        weight: Weight,
        max_width: f32,
    ) -> (Vec<String>, bool) {
        if lines.len() <= max_lines {
            return (lines, false);
        }
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut trimmed = last.trim_end().to_string();
            loop {
                let candidate = format!("{}{}", trimmed, ELLIPSIS);
                if trimmed.is_empty() || self.measure(&candidate, px, weight) <= max_width {
                    *last = candidate;
                    break;
                }
                trimmed.pop();
            }
        }
        (lines, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_grows_with_text_and_size() {
        let book = fonts().unwrap();
        let short = book.measure("Poster", 20.0, Weight::Regular);
        let long = book.measure("Poster title", 20.0, Weight::Regular);
        let big = book.measure("Poster", 40.0, Weight::Regular);
        assert!(short > 0.0);
        assert!(long > short);
        assert!((big - short * 2.0).abs() < 2.0);
        assert!(book.measure("Poster", 20.0, Weight::Bold) >= short);
    }

    #[test]
    fn wrap_respects_width_and_newlines() {
        let book = fonts().unwrap();
        let text = "one two three four five six seven eight nine ten\nsecond paragraph";
        let lines = book.wrap(text, 20.0, Weight::Regular, 200.0);
        assert!(lines.len() >= 3);
        for line in &lines {
            assert!(book.measure(line, 20.0, Weight::Regular) <= 200.0, "{}", line);
        }
        assert_eq!(lines.last().unwrap(), "second paragraph");
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let book = fonts().unwrap();
        let lines = book.wrap(&"W".repeat(60), 20.0, Weight::Bold, 120.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "W".repeat(60));
    }

    #[test]
    fn clip_lines_adds_ellipsis() {
        let book = fonts().unwrap();
        let lines = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        let (kept, cut) = book.clip_lines(lines.clone(), 3, 16.0, Weight::Regular, 300.0);
        assert!(!cut);
        assert_eq!(kept, lines);

        let (kept, cut) = book.clip_lines(lines, 2, 16.0, Weight::Regular, 300.0);
        assert!(cut);
        assert_eq!(kept, vec!["alpha".to_string(), "beta…".to_string()]);
    }

    #[test]
    fn empty_text_wraps_to_single_empty_line() {
        let book = fonts().unwrap();
        assert_eq!(book.wrap("", 16.0, Weight::Regular, 100.0), vec![String::new()]);
    }
}
