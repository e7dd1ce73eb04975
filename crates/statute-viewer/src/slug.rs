//! Heading identifier generation.
//!
//! Ids are a pure function of the heading text and a scope prefix, so the
//! same document always yields the same anchors regardless of the order
//! headings are visited in.

use std::collections::HashSet;

/// Slug used when a title reduces to nothing.
pub const EMPTY_SLUG: &str = "generated-empty";

/// Reduce a title to a URL-fragment-safe slug.
///
/// Lowercases, turns whitespace runs into `-`, drops everything outside
/// `[A-Za-z0-9_-]`, then collapses repeated hyphens.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let mut hyphenated = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                hyphenated.push('-');
            }
            in_space = true;
        } else {
            hyphenated.push(c);
            in_space = false;
        }
    }

    let mut out = String::with_capacity(hyphenated.len());
    for c in hyphenated.chars() {
        let keep = c.is_ascii_alphanumeric() || c == '_' || c == '-';
        if !keep || (c == '-' && out.ends_with('-')) {
            continue;
        }
        out.push(c);
    }

    if out.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        out
    }
}

/// `"{prefix}-{slug}"`.
pub fn generate_id(text: &str, prefix: &str) -> String {
    format!("{prefix}-{}", slugify(text))
}

/// Hands out unique ids during one outline build.
///
/// Ids already present in the document are reserved up front; a generated
/// id that collides gets `-2`, `-3`, ... appended.
#[derive(Debug, Default)]
pub struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an existing id as taken.
    pub fn reserve(&mut self, id: &str) {
        self.taken.insert(id.to_string());
    }

    /// Claim `candidate`, or the first free suffixed variant of it.
    pub fn claim(&mut self, candidate: String) -> String {
        if self.taken.insert(candidate.clone()) {
            return candidate;
        }
        let mut n = 2;
        loop {
            let next = format!("{candidate}-{n}");
            if self.taken.insert(next.clone()) {
                return next;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn basic_title() {
        assert_eq!(slugify("Act One"), "act-one");
        assert_eq!(generate_id("Act One", "act"), "act-act-one");
    }

    #[test]
    fn punctuation_is_stripped_and_hyphens_collapse() {
        assert_eq!(slugify("  Sec. 12 -- Definitions (a) "), "sec-12-definitions-a");
        assert_eq!(slugify("Part\tII\n\nGeneral"), "part-ii-general");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(slugify("§ 5 Überblick"), "-5-berblick");
    }

    #[test]
    fn empty_falls_back_to_placeholder() {
        assert_eq!(slugify(""), EMPTY_SLUG);
        assert_eq!(slugify("§§ ¶"), "-");
        assert_eq!(generate_id("???", "act"), "act-generated-empty");
    }

    #[test]
    fn scoped_prefixes_separate_identical_titles() {
        let a = generate_id("Definitions", "act-one-sec");
        let b = generate_id("Definitions", "act-two-sec");
        assert_ne!(a, b);
    }

    #[test]
    fn allocator_suffixes_collisions() {
        let mut ids = IdAllocator::new();
        ids.reserve("act-general");
        assert_eq!(ids.claim("act-general".into()), "act-general-2");
        assert_eq!(ids.claim("act-general".into()), "act-general-3");
        assert_eq!(ids.claim("act-other".into()), "act-other");
        assert_eq!(ids.claim("act-general-2".into()), "act-general-2-2");
    }

    proptest! {
        #[test]
        fn slug_is_never_empty_and_charset_is_safe(title in "\\PC{0,40}") {
            let slug = slugify(&title);
            prop_assert!(!slug.is_empty());
            prop_assert!(slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn slugify_is_deterministic(title in "[A-Za-z .,-]{0,30}") {
            prop_assert_eq!(slugify(&title), slugify(&title));
        }
    }
}
