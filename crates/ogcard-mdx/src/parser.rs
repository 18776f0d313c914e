//! Documentation page parser.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError, MetadataError, PageMetadata};

/// A parsed documentation page.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Parsed front matter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Text of the first level-1 heading, if any
    pub first_heading: Option<String>,
}

impl ParsedPage {
    /// Validated social card metadata for this page.
    pub fn page_metadata(&self) -> Result<PageMetadata, MetadataError> {
        let fallback = self.first_heading.as_deref();
        match &self.frontmatter {
            Some(fm) => fm.page_metadata(fallback),
            None => Frontmatter::default().page_metadata(fallback),
        }
    }
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a Markdown/MDX page.
///
/// Page bodies are never evaluated; only the front matter and the first
/// heading are read.
pub fn parse_page(source: &str) -> Result<ParsedPage, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    Ok(ParsedPage {
        frontmatter,
        first_heading: first_heading(content),
    })
}

fn first_heading(content: &str) -> Option<String> {
    let parser = Parser::new_ext(content, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);

    let mut current: Option<String> = None;
    for event in parser {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => current = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(ref mut heading) = current {
                    heading.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(heading) = current.take() {
                    let heading = heading.trim();
                    if !heading.is_empty() {
                        return Some(heading.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    None
}
