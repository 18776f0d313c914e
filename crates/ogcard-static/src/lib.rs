//! Build steps for the documentation site.
//!
//! Generates social preview cards for cover illustrations and the chapter
//! index consumed by the site's chapter listing.

pub mod builder;
pub mod chapters;
pub mod metadata;
pub mod pages;

pub use builder::{BuildConfig, BuildError, BuildReport, SocialImageBuilder};
pub use chapters::{collect_chapters, write_chapter_index, Chapter, ChapterConfig, ChapterReport};
pub use metadata::MetadataIndex;
pub use pages::{discover_pages, DocPage};
