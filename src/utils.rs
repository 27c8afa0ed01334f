// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Trimmed value, or `None` when absent or blank
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Title-case the way Python's `str.title()` does: a letter is uppercased when the
/// previous character is not a letter, lowercased otherwise ("c_level" -> "C_Level")
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// URL-safe slug for list names
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.trim().to_lowercase().chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }

    slug
}

/// Prefix a scheme on scheme-less URLs ("linkedin.com/in/x" -> "https://linkedin.com/in/x")
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

// File system utilities
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  Spain ")), Some("Spain"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("specialist"), "Specialist");
        assert_eq!(title_case("c_level"), "C_Level");
        assert_eq!(title_case("board_member"), "Board_Member");
        assert_eq!(title_case("SENIOR staff"), "Senior Staff");
        assert_eq!(title_case("3rd-party"), "3Rd-Party");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hot Prospects Q1 2025"), "hot-prospects-q1-2025");
        assert_eq!(slugify("  Leads & Friends!  "), "leads-friends");
        assert_eq!(slugify("already-slugged"), "already-slugged");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("linkedin.com/in/john-doe"),
            "https://linkedin.com/in/john-doe"
        );
        assert_eq!(
            normalize_url("http://linkedin.com/in/jane"),
            "http://linkedin.com/in/jane"
        );
        assert_eq!(normalize_url(""), "");
    }
}
