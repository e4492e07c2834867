use crate::fonts::Font;

/// Text measurement in layout units: a font at a point size, plus
/// the number of layout units per point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub font: Font,
    pub size: f64,
    pub units_per_point: f64,
}

impl Measure {
    pub fn width(&self, text: &str) -> f64 {
        self.font.measure(text, self.size) * self.units_per_point
    }
}

/// A value wrapped to a column width: the lines in order and the
/// vertical space they take.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub lines: Vec<String>,
    pub height: f64,
}

impl RenderedBlock {
    /// Wrap `text` to `width` and measure it as
    /// `lines × line_height + padding`. Always at least one line.
    pub fn layout(text: &str, width: f64, measure: &Measure, line_height: f64, padding: f64) -> Self {
        let mut lines = wrap_lines(text, width, measure);
        if lines.is_empty() {
            lines.push(String::new());
        }
        let height = lines.len() as f64 * line_height + padding;
        RenderedBlock { lines, height }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Greedy word wrap. Breaks at spaces, honours explicit newlines,
/// and splits a word at character boundaries only when the word
/// alone is wider than `width`. Pure: the same inputs always give
/// the same lines.
pub fn wrap_lines(text: &str, width: f64, measure: &Measure) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if measure.width(&candidate) <= width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if measure.width(word) <= width {
                line = word.to_string();
            } else {
                let mut pieces = split_word(word, width, measure);
                line = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(line);
    }
    // Trailing blank lines from a final newline carry no content.
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Cut an over-long word into pieces no wider than `width`. Each
/// piece holds at least one character.
fn split_word(word: &str, width: f64, measure: &Measure) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if measure.width(&piece) > width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
