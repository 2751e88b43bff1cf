//! Greedy line layout of edit-text contents over fixed per-glyph advances.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::foundation::core::Bounds;
use crate::scene::model::{FontDef, TextAlign};

/// Advance (em fraction) assumed for every glyph of a font without layout metrics.
pub const DEFAULT_ADVANCE: f64 = 0.5;

/// Per-code advances of one font, in em fractions.
#[derive(Clone, Debug, PartialEq)]
pub struct FontMetrics {
    advances: HashMap<u32, f64>,
    min_advance: f64,
    max_advance: f64,
}

impl FontMetrics {
    /// Metrics with no explicit advances; every glyph is `advance` em wide.
    pub fn uniform(advance: f64) -> Self {
        Self {
            advances: HashMap::new(),
            min_advance: advance,
            max_advance: advance,
        }
    }

    /// Metrics from explicit `(code, advance)` pairs.
    pub fn from_advances(advances: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let advances: HashMap<u32, f64> = advances.into_iter().collect();
        if advances.is_empty() {
            return Self::uniform(DEFAULT_ADVANCE);
        }
        let min_advance = advances.values().copied().fold(f64::INFINITY, f64::min);
        let max_advance = advances.values().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            advances,
            min_advance,
            max_advance,
        }
    }

    /// Metrics of an embedded font: its layout table when present, else half-em everywhere.
    pub fn from_font(font: &FontDef) -> Self {
        let Some(layout) = &font.layout else {
            return Self::uniform(DEFAULT_ADVANCE);
        };
        let em = if font.em_square > 0.0 {
            font.em_square
        } else {
            crate::scene::model::DEFAULT_EM_SQUARE
        };
        Self::from_advances(
            font.code_table
                .iter()
                .zip(&layout.advances)
                .map(|(&code, &adv)| (code, adv / em)),
        )
    }

    /// Explicit advance for `code`, else the narrow (code < 256) or wide class default.
    pub fn advance(&self, code: u32) -> f64 {
        let default = if code < 256 {
            self.min_advance
        } else {
            self.max_advance
        };
        self.advances.get(&code).copied().unwrap_or(default)
    }

    /// Narrowest advance.
    pub fn min_advance(&self) -> f64 {
        self.min_advance
    }
}

/// Tunables of [`TextLayout`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Left inset applied to every line, in pixels.
    pub inset: f64,
    /// Characters that start a new token.
    pub break_before: String,
    /// Characters that close the current token.
    pub break_after: String,
    /// Advance multipliers applied to codes whose advance is exactly the half-em default.
    pub advance_overrides: BTreeMap<u32, f64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            inset: 2.0,
            break_before: "([{".to_string(),
            break_after: ")]}+-=".to_string(),
            advance_overrides: BTreeMap::from([(215, 2.0)]),
        }
    }
}

/// One positioned character, coordinates in output pixels (baseline origin).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutChar {
    /// Character.
    pub ch: char,
    /// Character code.
    pub code: u32,
    /// Left edge.
    pub x: f64,
    /// Baseline.
    pub y: f64,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n')
}

/// Text layout over one font's metrics.
#[derive(Clone, Debug)]
pub struct TextLayout<'a> {
    metrics: &'a FontMetrics,
    options: &'a LayoutOptions,
}

impl<'a> TextLayout<'a> {
    /// Layout engine for one font.
    pub fn new(metrics: &'a FontMetrics, options: &'a LayoutOptions) -> Self {
        Self { metrics, options }
    }

    /// Position every visible character of `text` inside `bounds`.
    ///
    /// Lines are packed greedily; each line's baseline is `font_size` below the previous one,
    /// starting one `font_size` below `bounds.y_min`. Control characters and spaces emit nothing.
    pub fn layout(
        &self,
        text: &str,
        font_size: f64,
        align: TextAlign,
        bounds: Bounds,
    ) -> Vec<LayoutChar> {
        let width = bounds.width();
        let mut out = Vec::new();
        for (i, line) in self.split_lines(text, font_size, width).iter().enumerate() {
            let y = bounds.y_min + font_size * (i as f64 + 1.0);
            self.layout_line(line, font_size, align, bounds.x_min, y, width, &mut out);
        }
        out
    }

    /// Split `text` into tokens: delimiters stand alone, break-before characters open a token,
    /// break-after characters close one (even when they are its first character).
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut tokens = Vec::new();
        let mut start = 0;
        for (i, c) in text.char_indices() {
            let next = i + c.len_utf8();
            if is_delimiter(c) {
                if i > start {
                    tokens.push(&text[start..i]);
                }
                tokens.push(&text[i..next]);
                start = next;
            } else if self.options.break_before.contains(c) {
                if i > start {
                    tokens.push(&text[start..i]);
                    start = i;
                }
            } else if self.options.break_after.contains(c) {
                tokens.push(&text[start..next]);
                start = next;
            }
        }
        if start < text.len() {
            tokens.push(&text[start..]);
        }
        tokens
    }

    fn split_lines(&self, text: &str, font_size: f64, max_width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        let mut parts = String::new();
        let mut line_width = 0.0;
        for token in self.tokenize(text) {
            if (token == "\r" || token == "\n") && !parts.is_empty() {
                lines.push(std::mem::take(&mut parts));
                line_width = 0.0;
                continue;
            }
            let token_width = self.measure(token, font_size);
            if line_width + token_width > max_width && !parts.is_empty() {
                lines.push(std::mem::take(&mut parts));
                line_width = 0.0;
                if token == " " {
                    continue;
                }
            }
            parts.push_str(token);
            line_width += token_width;
        }
        if !parts.is_empty() {
            lines.push(parts);
        }
        lines
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_line(
        &self,
        line: &str,
        font_size: f64,
        align: TextAlign,
        x_min: f64,
        y: f64,
        width: f64,
        out: &mut Vec<LayoutChar>,
    ) {
        let line_width = self.measure(line, font_size);
        let offset = match align {
            TextAlign::Center => (width - line_width) / 2.0,
            TextAlign::Right => width - line_width,
            TextAlign::Left | TextAlign::Justify => 0.0,
        };
        let mut x = x_min + self.options.inset + offset;
        for ch in line.chars() {
            let code = u32::from(ch);
            if ch == ' ' {
                x += self.measure_char(ch, font_size);
                continue;
            }
            if code < 32 {
                continue;
            }
            out.push(LayoutChar { ch, code, x, y });
            x += self.measure_char(ch, font_size);
        }
    }

    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|c| self.measure_char(c, font_size)).sum()
    }

    /// Advance of one character in pixels at `font_size`.
    pub fn measure_char(&self, ch: char, font_size: f64) -> f64 {
        let code = u32::from(ch);
        let advance = if ch == ' ' {
            self.metrics.min_advance()
        } else if code < 32 {
            0.0
        } else {
            let adv = self.metrics.advance(code);
            match self.options.advance_overrides.get(&code) {
                Some(factor) if adv == DEFAULT_ADVANCE => adv * factor,
                _ => adv,
            }
        };
        advance * font_size
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
