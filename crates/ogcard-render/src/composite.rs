//! Composite SVG template combining background, illustration and text.

use std::sync::LazyLock;

use minijinja::{context, AutoEscape, Environment};
use regex::Regex;
use serde::Serialize;

use crate::escape::escape_xml;
use crate::layout::{Layout, ILLUSTRATION_OPACITY, SVG_OPEN_RE};

/// Colors and fonts of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub gradient_start: String,
    pub gradient_end: String,
    pub title_color: String,
    pub description_color: String,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            gradient_start: "#d0cdff".to_string(),
            gradient_end: "#9e98ff".to_string(),
            title_color: "#1c1e21".to_string(),
            description_color: "#3b3b58".to_string(),
            font_family: "Inter, 'Helvetica Neue', Arial, sans-serif".to_string(),
        }
    }
}

static XML_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\?xml.*?\?>").expect("Invalid xml declaration regex"));

static DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<!DOCTYPE[^>]*>").expect("Invalid doctype regex"));

/// Root attributes replaced by the card's own placement.
static SIZING_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s(?:x|y|width|height|viewBox|preserveAspectRatio)\s*=\s*(?:"[^"]*"|'[^']*')"#)
        .expect("Invalid sizing attribute regex")
});

/// An illustration split at its root `<svg>` element.
///
/// The root is re-emitted as a nested `<svg>` on the card, so namespace
/// declarations and inherited presentation attributes (`fill`, `style`, ...)
/// keep applying to the children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IllustrationSource {
    /// Root attributes other than position and size, each with a leading space
    pub attributes: String,

    /// Markup between the root's opening and closing tags
    pub body: String,
}

impl IllustrationSource {
    /// Returns `None` when the document has no root `<svg>` element.
    pub fn parse(svg: &str) -> Option<Self> {
        let without_decl = XML_DECL_RE.replace_all(svg, "");
        let without_doctype = DOCTYPE_RE.replace_all(&without_decl, "");

        let open = SVG_OPEN_RE.find(&without_doctype)?;
        let tag = open.as_str();
        let self_closing = tag.ends_with("/>");
        let inner = tag["<svg".len()..].trim_end_matches('>').trim_end_matches('/');
        let attributes = SIZING_ATTR_RE.replace_all(inner, "").trim_end().to_string();

        if self_closing {
            return Some(Self {
                attributes,
                body: String::new(),
            });
        }

        let rest = &without_doctype[open.end()..];
        let close = rest.rfind("</svg>").unwrap_or(rest.len());
        Some(Self {
            attributes,
            body: rest[..close].trim().to_string(),
        })
    }
}

/// Template engine producing the composite SVG of a card.
pub struct CompositeTemplate {
    env: Environment<'static>,
}

impl CompositeTemplate {
    pub fn new() -> Self {
        let mut env = Environment::new();

        // Text is escaped explicitly through the `xml` filter; the
        // illustration is markup and must pass through untouched.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("xml", |value: String| escape_xml(&value));

        env.add_template("card.svg", CARD_TEMPLATE)
            .expect("Failed to add card template");

        Self { env }
    }

    /// Render the composite SVG for a computed layout.
    pub fn render(
        &self,
        layout: &Layout,
        theme: &Theme,
        illustration: &IllustrationSource,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("card.svg")?;

        tmpl.render(context! {
            layout => layout,
            theme => theme,
            art => &layout.illustration,
            opacity => ILLUSTRATION_OPACITY,
            illustration => illustration,
        })
    }
}

impl Default for CompositeTemplate {
    fn default() -> Self {
        Self::new()
    }
}

const CARD_TEMPLATE: &str = r##"<svg width="{{ layout.width }}" height="{{ layout.height }}" viewBox="0 0 {{ layout.width }} {{ layout.height }}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <defs>
    <linearGradient id="ogcard-background" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="{{ theme.gradient_start | xml }}" stop-opacity="1"/>
      <stop offset="100%" stop-color="{{ theme.gradient_end | xml }}" stop-opacity="1"/>
    </linearGradient>
  </defs>
  <rect width="{{ layout.width }}" height="{{ layout.height }}" fill="url(#ogcard-background)"/>
  <g opacity="{{ opacity }}">
    <svg x="{{ art.x }}" y="{{ art.y }}" width="{{ art.width }}" height="{{ art.height }}" viewBox="{{ art.viewport.min_x }} {{ art.viewport.min_y }} {{ art.viewport.width }} {{ art.viewport.height }}"{{ illustration.attributes }}>
{{ illustration.body }}
    </svg>
  </g>
  <g font-family="{{ theme.font_family | xml }}">
{%- for line in layout.title.lines %}
    <text x="{{ layout.text_x }}" y="{{ line.y }}" font-size="{{ layout.title.font_size }}" font-weight="700" fill="{{ theme.title_color | xml }}">{{ line.text | xml }}</text>
{%- endfor %}
{%- for line in layout.description.lines %}
    <text x="{{ layout.text_x }}" y="{{ line.y }}" font-size="{{ layout.description.font_size }}" fill="{{ theme.description_color | xml }}">{{ line.text | xml }}</text>
{%- endfor %}
  </g>
</svg>
"##;
