//! Card composition: layout, composite SVG and raster encoding for one illustration.

use crate::composite::{CompositeTemplate, IllustrationSource, Theme};
use crate::layout::{Layout, SvgViewport};
use crate::raster::{encode_png, Rasterizer};

/// Text drawn on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardText {
    pub title: String,
    pub description: String,
}

impl CardText {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A composed card before rasterization.
#[derive(Debug, Clone)]
pub struct Composite {
    pub layout: Layout,
    pub svg: String,
}

/// Errors that can occur while rendering a card.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Illustration has no root <svg> element")]
    NotSvg,

    #[error("Failed to render composite template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Invalid SVG: {0}")]
    Svg(String),

    #[error("Failed to allocate canvas")]
    Allocation,

    #[error("Failed to encode PNG: {0}")]
    Encode(String),
}

/// Renders social cards from illustrations.
pub struct ImageComposer {
    theme: Theme,
    template: CompositeTemplate,
    rasterizer: Rasterizer,
}

impl ImageComposer {
    pub fn new(theme: Theme, rasterizer: Rasterizer) -> Self {
        Self {
            theme,
            template: CompositeTemplate::new(),
            rasterizer,
        }
    }

    /// Lay out a card and build its composite SVG.
    pub fn compose(&self, illustration_svg: &str, text: &CardText) -> Result<Composite, RenderError> {
        let source = IllustrationSource::parse(illustration_svg).ok_or(RenderError::NotSvg)?;
        let viewport = SvgViewport::detect_or_default(illustration_svg);
        let layout = Layout::compute(viewport, &text.title, &text.description);

        if layout.title.truncated || layout.description.truncated {
            tracing::debug!(
                title_truncated = layout.title.truncated,
                description_truncated = layout.description.truncated,
                "Card text truncated"
            );
        }

        let svg = self.template.render(&layout, &self.theme, &source)?;
        Ok(Composite { layout, svg })
    }

    /// Compose a card and encode it as PNG.
    pub fn render_png(&self, illustration_svg: &str, text: &CardText) -> Result<Vec<u8>, RenderError> {
        let composite = self.compose(illustration_svg, text)?;
        let image = self.rasterizer.rasterize(&composite.svg)?;
        encode_png(&image)
    }
}

impl Default for ImageComposer {
    fn default() -> Self {
        Self::new(Theme::default(), Rasterizer::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HEIGHT, MAX_SCALE, WIDTH};

    const ILLUSTRATION: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100">
  <rect x="10" y="10" width="180" height="80" fill="#6c63ff"/>
</svg>"##;

    #[test]
    fn composes_short_card() {
        let composer = ImageComposer::default();

        let composite = composer
            .compose(ILLUSTRATION, &CardText::new("Short Title", "Short description."))
            .unwrap();

        assert!(composite.layout.illustration.scale <= MAX_SCALE);
        assert_eq!(composite.layout.title.lines.len(), 1);
        assert!(composite.svg.contains(r##"fill="#6c63ff""##));
        assert!(!composite.svg.contains("<?xml"));
    }

    #[test]
    fn escaped_composite_still_parses() {
        let composer = ImageComposer::default();
        let text = CardText::new("<Generics> & 'Traits'", "Use Vec<T> && Option<&T> for \"safety\" > speed");

        let composite = composer.compose(ILLUSTRATION, &text).unwrap();

        assert!(composite.svg.contains("&lt;Generics&gt; &amp; &apos;Traits&apos;"));
        assert!(!composite.svg.contains("Vec<T>"));
        assert!(usvg::Tree::from_str(&composite.svg, &usvg::Options::default()).is_ok());
    }

    #[test]
    fn renders_png_at_card_size() {
        let composer = ImageComposer::default();

        let png = composer
            .render_png(ILLUSTRATION, &CardText::new("Short Title", "Short description."))
            .unwrap();

        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        // top-left corner shows the gradient start color
        let [r, g, b, a] = image.get_pixel(0, 0).0;
        assert!(r.abs_diff(0xd0) <= 4 && g.abs_diff(0xcd) <= 4 && b.abs_diff(0xff) <= 4);
        assert_eq!(a, 255);
    }

    #[test]
    fn huge_illustration_keeps_card_size() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="9000" height="7000"><circle cx="4500" cy="3500" r="3000"/></svg>"#;

        let png = ImageComposer::default()
            .render_png(svg, &CardText::new("Big", "Art"))
            .unwrap();

        let image = image::load_from_memory(&png).unwrap();
        assert_eq!((image.width(), image.height()), (WIDTH, HEIGHT));
    }

    #[test]
    fn renders_illustration_with_editor_namespaces() {
        let svg = r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg"
   xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
   xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
   width="100" height="100" viewBox="0 0 100 100" inkscape:version="1.3">
  <sodipodi:namedview id="base" inkscape:zoom="1"/>
  <g inkscape:label="Layer 1" inkscape:groupmode="layer">
    <rect width="100" height="100" fill="#6c63ff"/>
  </g>
</svg>"##;

        let png = ImageComposer::default()
            .render_png(svg, &CardText::new("Inkscape", "Exported from an editor"))
            .unwrap();

        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        // 100x100 at MAX_SCALE lands at x=1085, y=277.5 with a 75px side
        let [r, g, b, _] = image.get_pixel(1122, 315).0;
        assert!(r.abs_diff(0x6c) <= 12 && g.abs_diff(0x63) <= 12 && b.abs_diff(0xff) <= 12);
    }

    #[test]
    fn root_presentation_attributes_are_inherited() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" fill="none" stroke="#000000" stroke-width="4">
  <rect x="10" y="10" width="80" height="80"/>
</svg>"##;

        let png = ImageComposer::default()
            .render_png(svg, &CardText::new("Outline", "Stroke only"))
            .unwrap();

        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        // interior shows the background gradient, not a black fill
        let [r, g, b, _] = image.get_pixel(1122, 315).0;
        assert!(r > 120 && g > 120 && b > 120, "interior filled: {:?}", [r, g, b]);
        // the stroke along x=10 sits at 1085 + 7.5
        let [r, g, b, _] = image.get_pixel(1092, 315).0;
        assert!(r < 60 && g < 60 && b < 60, "stroke missing: {:?}", [r, g, b]);
    }

    #[test]
    fn rejects_non_svg_input() {
        let result = ImageComposer::default().compose("not an image", &CardText::new("a", "b"));

        assert!(matches!(result, Err(RenderError::NotSvg)));
    }
}
