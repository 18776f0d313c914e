//! Card geometry: illustration placement and text wrapping.
//!
//! Text width is estimated from character counts rather than measured with
//! real font metrics. The estimate only drives line breaking; the line caps
//! and ellipsis truncation are the observable contract.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Card width in pixels.
pub const WIDTH: u32 = 1200;
/// Card height in pixels.
pub const HEIGHT: u32 = 630;

/// Outer padding of the card.
pub const PADDING: f64 = 80.0;

/// Share of the card width reserved for the illustration.
pub const ILLUSTRATION_AREA_RATIO: f64 = 0.45;
/// Upper bound for the illustration scale factor.
pub const MAX_SCALE: f64 = 0.75;
/// Opacity of the illustration layer.
pub const ILLUSTRATION_OPACITY: f64 = 0.95;

/// Share of the card width available to text.
pub const TEXT_AREA_RATIO: f64 = 0.70;
/// Estimated glyph advance as a fraction of the font size. Tunable.
pub const CHAR_WIDTH_RATIO: f64 = 0.55;

/// Baseline of the first title line.
pub const TITLE_TOP: f64 = 180.0;
/// Space between the title block and the description block.
pub const TITLE_DESCRIPTION_GAP: f64 = 40.0;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";
const TRUNCATE_CHARS: usize = 3;

/// Size used when an illustration declares neither a viewBox nor a size.
pub const DEFAULT_VIEWPORT: SvgViewport = SvgViewport {
    min_x: 0.0,
    min_y: 0.0,
    width: 500.0,
    height: 500.0,
};

/// Typography of one text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub line_height_ratio: f64,
    pub max_lines: usize,
}

impl TextStyle {
    pub const TITLE: TextStyle = TextStyle {
        font_size: 56.0,
        line_height_ratio: 1.15,
        max_lines: 2,
    };

    pub const DESCRIPTION: TextStyle = TextStyle {
        font_size: 24.0,
        line_height_ratio: 1.6,
        max_lines: 3,
    };

    pub fn line_height(&self) -> f64 {
        self.font_size * self.line_height_ratio
    }
}

/// Intrinsic coordinate system of an illustration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SvgViewport {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

pub(crate) static SVG_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<svg\b[^>]*>").expect("Invalid svg tag regex"));

static VIEWBOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)viewBox\s*=\s*["']([^"']+)["']"#).expect("Invalid viewBox regex")
});

static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)width\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(?:px)?\s*["']"#)
        .expect("Invalid width regex")
});

static HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)height\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(?:px)?\s*["']"#)
        .expect("Invalid height regex")
});

impl SvgViewport {
    /// Read the viewport from the root `<svg>` element.
    ///
    /// A `viewBox` wins over `width`/`height` attributes. Returns `None` when
    /// neither yields a positive size.
    pub fn detect(svg: &str) -> Option<Self> {
        let tag = SVG_OPEN_RE.find(svg)?.as_str();

        if let Some(caps) = VIEWBOX_RE.captures(tag) {
            let values: Vec<f64> = caps[1]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            if let [min_x, min_y, width, height] = values[..] {
                let viewport = Self {
                    min_x,
                    min_y,
                    width,
                    height,
                };
                if viewport.is_valid() {
                    return Some(viewport);
                }
            }
        }

        let width = WIDTH_RE.captures(tag)?[1].parse().ok()?;
        let height = HEIGHT_RE.captures(tag)?[1].parse().ok()?;
        let viewport = Self {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        };
        viewport.is_valid().then_some(viewport)
    }

    /// Like [`SvgViewport::detect`], falling back to [`DEFAULT_VIEWPORT`].
    pub fn detect_or_default(svg: &str) -> Self {
        Self::detect(svg).unwrap_or_else(|| {
            tracing::warn!(
                "Could not determine illustration size, assuming {}x{}",
                DEFAULT_VIEWPORT.width,
                DEFAULT_VIEWPORT.height
            );
            DEFAULT_VIEWPORT
        })
    }

    fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Where the illustration lands on the card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IllustrationPlacement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    /// Coordinate system the illustration is drawn in
    pub viewport: SvgViewport,
}

impl IllustrationPlacement {
    pub fn compute(viewport: SvgViewport) -> Self {
        let area_width = f64::from(WIDTH) * ILLUSTRATION_AREA_RATIO;
        let area_height = f64::from(HEIGHT) - PADDING * 2.0;

        let scale = (area_width / viewport.width)
            .min(area_height / viewport.height)
            .min(MAX_SCALE);

        let width = viewport.width * scale;
        let height = viewport.height * scale;

        Self {
            x: round2(f64::from(WIDTH) - width - PADDING / 2.0),
            y: round2((f64::from(HEIGHT) - height) / 2.0),
            scale,
            width: round2(width),
            height: round2(height),
            viewport,
        }
    }
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    /// Baseline position
    pub y: f64,
}

/// A wrapped, capped block of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub font_size: f64,
    pub line_height: f64,
    pub lines: Vec<TextLine>,
    pub truncated: bool,
}

impl TextBlock {
    /// Wrap `text` and position its lines starting at baseline `top`.
    pub fn layout(text: &str, style: TextStyle, max_width: f64, top: f64) -> Self {
        let wrapped = wrap_text(text, style.font_size, max_width);
        let (lines, truncated) = clamp_lines(wrapped, style.max_lines);
        let line_height = style.line_height();

        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| TextLine {
                text,
                y: round2(top + i as f64 * line_height),
            })
            .collect();

        Self {
            font_size: style.font_size,
            line_height: round2(line_height),
            lines,
            truncated,
        }
    }

    /// Vertical space taken by the block.
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }
}

/// Complete geometry of one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub text_x: f64,
    pub illustration: IllustrationPlacement,
    pub title: TextBlock,
    pub description: TextBlock,
}

impl Layout {
    pub fn compute(viewport: SvgViewport, title: &str, description: &str) -> Self {
        let text_width = f64::from(WIDTH) * TEXT_AREA_RATIO;

        let title = TextBlock::layout(title, TextStyle::TITLE, text_width, TITLE_TOP);
        let description_top = TITLE_TOP + title.height() + TITLE_DESCRIPTION_GAP;
        let description =
            TextBlock::layout(description, TextStyle::DESCRIPTION, text_width, description_top);

        Self {
            width: WIDTH,
            height: HEIGHT,
            text_x: PADDING,
            illustration: IllustrationPlacement::compute(viewport),
            title,
            description,
        }
    }
}

/// Greedily pack words into lines no wider than `max_width`.
///
/// A single word wider than `max_width` becomes its own line.
pub fn wrap_text(text: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let char_width = font_size * CHAR_WIDTH_RATIO;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && (current_len + 1 + word_len) as f64 * char_width > max_width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current);
    }

    lines
}

/// Keep at most `max_lines`, marking the last kept line with an ellipsis on overflow.
///
/// Returns the kept lines and whether anything was cut.
pub fn clamp_lines(mut lines: Vec<String>, max_lines: usize) -> (Vec<String>, bool) {
    if lines.len() <= max_lines {
        return (lines, false);
    }

    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let keep = last.chars().count().saturating_sub(TRUNCATE_CHARS);
        let kept: String = last.chars().take(keep).collect();
        *last = format!("{}{ELLIPSIS}", kept.trim_end());
    }

    (lines, true)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
