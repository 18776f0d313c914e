//! Front matter parsing for documentation pages.
//!
//! This crate extracts YAML front matter from Markdown/MDX pages and validates
//! the fields social cards and the chapter index depend on.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError, MetadataError, PageMetadata};
pub use parser::{parse_page, ParseError, ParsedPage};
