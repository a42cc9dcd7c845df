//! URL slug derivation for section titles.
//!
//! Order of operations:
//!
//! 1. lower-case the title;
//! 2. replace each run of whitespace with a single `-`;
//! 3. drop every character outside `[a-z0-9-]`.
//!
//! Because stripping runs last, punctuation surrounded by spaces leaves
//! adjacent hyphens: `"A & B!"` becomes `"a--b"`.

/// Derive a slug from a title.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();

    let mut hyphenated = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                hyphenated.push('-');
            }
            in_whitespace = true;
        } else {
            hyphenated.push(c);
            in_whitespace = false;
        }
    }

    hyphenated
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// True if `slug` is non-empty and only uses `[a-z0-9-]`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_title() {
        assert_eq!(slugify("Getting Started"), "getting-started");
    }

    #[test]
    fn test_whitespace_replaced_before_stripping() {
        assert_eq!(slugify("A & B!"), "a--b");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(slugify("API \t\n  Keys"), "api-keys");
    }

    #[test]
    fn test_non_ascii_stripped() {
        assert_eq!(slugify("Café Crème 2"), "caf-crme-2");
    }

    #[test]
    fn test_edges_keep_hyphens() {
        assert_eq!(slugify("  padded  "), "-padded-");
    }

    #[test]
    fn test_valid_slug() {
        assert!(is_valid_slug("getting-started-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Getting Started"));
    }
}
