//! Rasterization of composite SVGs into PNG cards.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use resvg::tiny_skia;
use usvg::fontdb;

use crate::composer::RenderError;
use crate::layout::{HEIGHT, WIDTH};

/// Renders SVG documents onto a fixed-size card canvas.
///
/// The font database is loaded once and shared by every render.
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl Rasterizer {
    /// Rasterizer using the system fonts.
    pub fn new() -> Self {
        Self::with_font_dirs::<&Path>(&[])
    }

    /// Rasterizer using the system fonts plus every font file in `dirs`.
    pub fn with_font_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        for dir in dirs {
            let dir = dir.as_ref();
            if dir.is_dir() {
                db.load_fonts_dir(dir);
            } else {
                tracing::warn!("Font directory not found: {}", dir.display());
            }
        }

        Self::from_database(db)
    }

    /// Rasterizer over an already populated font database.
    pub fn from_database(db: fontdb::Database) -> Self {
        if db.is_empty() {
            tracing::warn!("No fonts found; card titles and descriptions will not be drawn");
        } else {
            tracing::debug!("Loaded {} font faces", db.len());
        }

        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Render `svg` into a `WIDTH`x`HEIGHT` RGBA image.
    ///
    /// The canvas size is fixed regardless of the size the document declares.
    pub fn rasterize(&self, svg: &str) -> Result<RgbaImage, RenderError> {
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };

        let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| RenderError::Svg(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(WIDTH, HEIGHT).ok_or(RenderError::Allocation)?;

        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            WIDTH as f32 / size.width(),
            HEIGHT as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let mut rgba = pixmap.take();
        demultiply_rgba8_in_place(&mut rgba);

        RgbaImage::from_raw(WIDTH, HEIGHT, rgba).ok_or(RenderError::Allocation)
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_size_is_fixed() {
        let rasterizer = Rasterizer::new();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="10"><rect width="40" height="10" fill="#ff0000"/></svg>"##;

        let image = rasterizer.rasterize(svg).unwrap();

        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        assert_eq!(image.get_pixel(600, 315).0, [255, 0, 0, 255]);
    }

    #[test]
    fn renders_without_fonts() {
        let rasterizer = Rasterizer::from_database(fontdb::Database::new());
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="630"><rect width="1200" height="630" fill="#00ff00"/><text x="10" y="50" font-size="40">Hidden</text></svg>"##;

        let image = rasterizer.rasterize(svg).unwrap();

        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        assert_eq!(image.get_pixel(20, 40).0, [0, 255, 0, 255]);
    }

    #[test]
    fn rejects_malformed_svg() {
        let result = Rasterizer::new().rasterize("<svg><g></svg>");

        assert!(matches!(result, Err(RenderError::Svg(_))));
    }

    #[test]
    fn encodes_png() {
        let image = RgbaImage::from_pixel(4, 3, image::Rgba([1, 2, 3, 255]));

        let bytes = encode_png(&image).unwrap();

        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn demultiplies_partial_alpha() {
        let mut px = [64, 0, 128, 128];

        demultiply_rgba8_in_place(&mut px);

        assert_eq!(px, [128, 0, 255, 128]);
    }
}
