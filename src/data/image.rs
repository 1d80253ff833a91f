//! Hero image URL derivation
//!
//! Images are served from a static CDN as `{base}/{id}-{slug}.jpg`, so the URL
//! can be built from a hero's id and name alone.

use std::fmt::Display;

/// Default image host (medium-size portraits)
pub const IMAGE_BASE: &str = "https://cdn.jsdelivr.net/gh/akabab/superhero-api@0.3.0/api/images/md";

/// Slug used when a name has no usable characters
const UNKNOWN_SLUG: &str = "unknown";

/// Converts a display name to its image slug
///
/// Lowercases the name, drops everything except word characters (letters,
/// digits, underscores), whitespace and hyphens, then collapses whitespace and
/// hyphen runs into single hyphens.
///
/// ```
/// use capecache::data::slug;
///
/// assert_eq!(slug("Spider-Man"), "spider-man");
/// assert_eq!(slug("A-Bomb (HAS)"), "a-bomb-has");
/// assert_eq!(slug(""), "unknown");
/// ```
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        UNKNOWN_SLUG.to_string()
    } else {
        slug
    }
}

/// Builds the image URL for a hero under `base`
pub fn image_url(base: &str, hero_id: impl Display, name: &str) -> String {
    format!("{}/{}-{}.jpg", base.trim_end_matches('/'), hero_id, slug(name))
}

/// Builds the image URL for a hero on the default image host
pub fn hero_image_url(hero_id: impl Display, name: &str) -> String {
    image_url(IMAGE_BASE, hero_id, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(hero_image_url(1, "Batman"), format!("{}/1-batman.jpg", IMAGE_BASE));
    }

    #[test]
    fn test_hyphenated_name() {
        assert_eq!(
            hero_image_url(2, "Spider-Man"),
            format!("{}/2-spider-man.jpg", IMAGE_BASE)
        );
    }

    #[test]
    fn test_punctuation_is_removed() {
        assert_eq!(slug("A-Bomb (HAS)"), "a-bomb-has");
        assert_eq!(slug("Mr. Freeze"), "mr-freeze");
        assert_eq!(slug("Black Widow II"), "black-widow-ii");
    }

    #[test]
    fn test_empty_name_is_unknown() {
        assert_eq!(slug(""), "unknown");
        assert_eq!(slug("  -- "), "unknown");
        assert_eq!(slug("???"), "unknown");
    }

    #[test]
    fn test_runs_and_edges_collapse() {
        assert_eq!(slug("  Ant -- Man  "), "ant-man");
        assert_eq!(slug("-Leading and trailing-"), "leading-and-trailing");
    }

    #[test]
    fn test_punctuation_between_words_does_not_split() {
        // Removed characters vanish without leaving a separator
        assert_eq!(slug("Ant.Man"), "antman");
    }

    #[test]
    fn test_underscores_are_kept() {
        assert_eq!(slug("Foo_Bar"), "foo_bar");
        assert_eq!(slug("Foo _ Bar"), "foo-_-bar");
        assert_eq!(slug("-_-"), "_");
    }

    #[test]
    fn test_string_id() {
        assert_eq!(
            hero_image_url("70", "Batman"),
            format!("{}/70-batman.jpg", IMAGE_BASE)
        );
    }

    #[test]
    fn test_custom_base_trailing_slash() {
        assert_eq!(
            image_url("https://img.example/", 3, "Abe Sapien"),
            "https://img.example/3-abe-sapien.jpg"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(slug("Wonder Woman"), slug("Wonder Woman"));
    }
}
