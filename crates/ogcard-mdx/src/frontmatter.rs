//! Front matter extraction and validation.

use serde::Deserialize;

/// Raw front matter of a documentation page.
///
/// Every field is optional at this level; callers validate the subset they
/// need through [`Frontmatter::page_metadata`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Document id used by the site generator
    #[serde(default)]
    pub id: Option<String>,

    /// Page title
    #[serde(default)]
    pub title: Option<String>,

    /// Page description for SEO and social cards
    #[serde(default)]
    pub description: Option<String>,

    /// Social preview image (absolute URL or site path)
    #[serde(default)]
    pub image: Option<String>,

    /// Custom slug override
    #[serde(default)]
    pub slug: Option<String>,
}

/// Validated metadata for rendering a social card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
}

impl Frontmatter {
    /// Validate the fields a social card needs.
    ///
    /// `fallback_title` is used when the front matter has no `title`, which
    /// mirrors how the site generator derives titles from the first heading.
    pub fn page_metadata(&self, fallback_title: Option<&str>) -> Result<PageMetadata, MetadataError> {
        let title = non_blank(self.title.as_deref())
            .or_else(|| non_blank(fallback_title))
            .ok_or(MetadataError::MissingField("title"))?;
        let description =
            non_blank(self.description.as_deref()).ok_or(MetadataError::MissingField("description"))?;
        let image = non_blank(self.image.as_deref()).ok_or(MetadataError::MissingField("image"))?;

        Ok(PageMetadata {
            title,
            description,
            image,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extract front matter from page content.
///
/// Returns the parsed front matter and the remaining content after the front matter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    if yaml_content.is_empty() {
        return Ok((Some(Frontmatter::default()), remaining.trim_start()));
    }

    let frontmatter: Frontmatter = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

/// A required front matter field is absent or blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("missing required front matter field `{0}`")]
    MissingField(&'static str),
}
