// SPDX-License-Identifier: MIT OR Apache-2.0

/// Maps a human-chosen name to its canonical identifier.
///
/// The input is lowercased, every run of characters which are not ASCII letters or digits
/// (hyphens included) collapses into a single hyphen and hyphens at the start or end are dropped.
/// The function is total and idempotent: `slug(&slug(s)) == slug(s)` for every string `s`.
pub fn slug(input: &str) -> String {
    slug_with_limit(input, None)
}

/// Same as [`slug`] but caps the result at `max_len` characters.
///
/// A hyphen left dangling at the end after truncation is removed as well.
pub fn slug_with_limit(input: &str, max_len: Option<usize>) -> String {
    let mut output = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !output.is_empty() {
                output.push('-');
            }
            pending_hyphen = false;
            output.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    // Output only ever contains ASCII, truncating by bytes can't split a character.
    if let Some(max_len) = max_len {
        if output.len() > max_len {
            output.truncate(max_len);
            while output.ends_with('-') {
                output.pop();
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::{slug, slug_with_limit};

    const SAMPLES: [&str; 12] = [
        "",
        "Team Alpha",
        "Book Club",
        "  --Hello__World!!  ",
        "---",
        "a",
        "Café Crème",
        "UPPER lower 123",
        "already-a-slug",
        "trailing-",
        "😀 emoji 😀 group",
        "tab\tand\nnewline",
    ];

    #[test]
    fn derives_canonical_ids() {
        assert_eq!(slug("Team Alpha"), "team-alpha");
        assert_eq!(slug("Book Club"), "book-club");
        assert_eq!(slug("  --Hello__World!!  "), "hello-world");
        assert_eq!(slug("Café Crème"), "caf-cr-me");
        assert_eq!(slug("UPPER lower 123"), "upper-lower-123");
        assert_eq!(slug("😀 emoji 😀 group"), "emoji-group");
    }

    #[test]
    fn total_over_degenerate_input() {
        assert_eq!(slug(""), "");
        assert_eq!(slug("---"), "");
        assert_eq!(slug("   "), "");
        assert_eq!(slug("!@#$%"), "");
    }

    #[test]
    fn idempotent() {
        for sample in SAMPLES {
            let once = slug(sample);
            assert_eq!(slug(&once), once, "slug not idempotent for {sample:?}");
        }
    }

    #[test]
    fn only_lowercase_alphanumerics_and_single_hyphens() {
        for sample in SAMPLES {
            let result = slug(sample);
            assert!(
                result
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            );
            assert!(!result.starts_with('-'));
            assert!(!result.ends_with('-'));
            assert!(!result.contains("--"));
        }
    }

    #[test]
    fn length_cap() {
        assert_eq!(slug_with_limit("Team Alpha", Some(4)), "team");
        // Cut would land right after the hyphen.
        assert_eq!(slug_with_limit("Team Alpha", Some(5)), "team");
        assert_eq!(slug_with_limit("Team Alpha", Some(64)), "team-alpha");
        assert_eq!(slug_with_limit("Team Alpha", Some(0)), "");

        let capped = slug_with_limit("a very long group name indeed", Some(10));
        assert_eq!(capped, "a-very-lon");
        assert_eq!(slug_with_limit(&capped, Some(10)), capped);
    }
}
