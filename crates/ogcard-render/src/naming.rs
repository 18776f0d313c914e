//! File naming convention shared by illustrations, cards and page front matter.
//!
//! Illustrations live as `undraw_<name>.svg`; their cards are written as
//! `undraw_<name>.png` and pages reference the card through a URL such as
//! `https://site/img/social/undraw_<name>.png`.

/// Prefix identifying cover illustrations.
pub const ILLUSTRATION_PREFIX: &str = "undraw_";

const VECTOR_EXT: &str = ".svg";
const RASTER_EXT: &str = ".png";

/// Site path holding generated social cards.
pub const SOCIAL_IMAGE_PATH: &str = "/img/social/";

/// Site path holding the source illustrations.
pub const ILLUSTRATION_PATH: &str = "/img/";

/// Whether a file name is a cover illustration candidate.
pub fn is_illustration(file_name: &str) -> bool {
    file_name.starts_with(ILLUSTRATION_PREFIX) && file_name.ends_with(VECTOR_EXT)
}

/// Card file name for an illustration, or `None` if the name does not qualify.
pub fn output_file_name(illustration: &str) -> Option<String> {
    if !is_illustration(illustration) {
        return None;
    }
    let stem = &illustration[..illustration.len() - VECTOR_EXT.len()];
    Some(format!("{stem}{RASTER_EXT}"))
}

/// Remove the scheme and host from an absolute URL.
///
/// Paths without a scheme are returned unchanged.
pub fn strip_origin(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return url;
    };
    let scheme = &url[..scheme_end];
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
        return url;
    }

    let after_scheme = &url[scheme_end + 3..];
    match after_scheme.find('/') {
        Some(slash) => &after_scheme[slash..],
        None => "/",
    }
}

/// Resolve the illustration file name a page's `image` reference was rendered from.
///
/// `https://site/img/social/undraw_agile.png` -> `undraw_agile.svg`
pub fn illustration_for_image_ref(image: &str) -> Option<String> {
    let path = strip_origin(image.trim());
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let file_name = path.rsplit('/').next().unwrap_or(path);

    let candidate = match file_name.strip_suffix(RASTER_EXT) {
        Some(stem) => format!("{stem}{VECTOR_EXT}"),
        None => file_name.to_string(),
    };

    is_illustration(&candidate).then_some(candidate)
}

/// Site-relative URL of the illustration behind a page's `image` reference.
///
/// References to generated cards are mapped back to the source illustration;
/// anything else only loses its origin.
pub fn illustration_url(image: &str) -> String {
    let path = strip_origin(image.trim());

    match path.strip_prefix(SOCIAL_IMAGE_PATH) {
        Some(rest) => {
            let rest = match rest.strip_suffix(RASTER_EXT) {
                Some(stem) => format!("{stem}{VECTOR_EXT}"),
                None => rest.to_string(),
            };
            format!("{ILLUSTRATION_PATH}{rest}")
        }
        None => path.to_string(),
    }
}
