//! Title normalization for series comparison
//!
//! Scraped series names and library titles disagree on punctuation, articles
//! and separators ("The Amazing Spider-Man" vs "Amazing Spider Man"). Both
//! sides are reduced to a canonical form and compared byte-for-byte.
//!
//! The pipeline runs in two stages, in this order: strip noise tokens, then
//! collapse separators. Collapsing first would change results for inputs
//! where a ` - ` separator sits next to a removed token.

/// Noise characters removed outright before separator collapsing.
const NOISE_CHARS: [char; 7] = ['+', ',', '!', ':', '\'', '\u{2019}', '"'];

/// Canonicalize a free-text title for equality comparison.
///
/// Deterministic, pure and idempotent:
/// 1. lowercase;
/// 2. drop noise: the plural `s` directly after the word "annual", the
///    characters `+ , ! :`, apostrophe/quote variants, and any leading
///    word "the";
/// 3. collapse every run of whitespace, `-` and `/` into a single space,
///    trim, and spell `&` out as "and".
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = strip_annual_plural(&strip_noise_chars(&lowered));
    let stripped = strip_leading_article(stripped.trim_start_matches(is_separator));
    collapse_separators(stripped)
}

/// Two titles match iff their normalized forms are equal.
pub fn titles_match(title: &str, other: &str) -> bool {
    let result = normalize_title(title) == normalize_title(other);
    tracing::trace!(title, other, result, "Matching titles");
    result
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '/'
}

fn strip_noise_chars(input: &str) -> String {
    input.chars().filter(|c| !NOISE_CHARS.contains(c)).collect()
}

/// Drop the run of `s` immediately following "annual", so "Annuals" and
/// "Annual" compare equal.
fn strip_annual_plural(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(at) = rest.find("annual") {
        let after = at + "annual".len();
        out.push_str(&rest[..after]);
        rest = rest[after..].trim_start_matches('s');
    }
    out.push_str(rest);
    out
}

/// Drop leading "the" words. Repeats so "The The Batman" and "Batman"
/// normalize to the same form on the first pass.
fn strip_leading_article(input: &str) -> &str {
    let mut current = input;
    loop {
        let Some(rest) = current.strip_prefix("the") else {
            return current;
        };
        let trimmed = rest.trim_start_matches(is_separator);
        if trimmed.len() == rest.len() {
            // Not a standalone word ("theory"), or bare "the"
            return current;
        }
        current = trimmed;
    }
}

fn collapse_separators(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for c in input.chars() {
        if is_separator(c) {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            if c == '&' {
                out.push_str("and");
            } else {
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_article() {
        assert_eq!(normalize_title("The Batman"), "batman");
        assert_eq!(normalize_title("Batman"), "batman");
        assert!(titles_match("Batman", "The Batman"));
    }

    #[test]
    fn keeps_non_article_the_prefix() {
        assert_eq!(normalize_title("Theory of Everything"), "theory of everything");
    }

    #[test]
    fn hyphens_colons_and_articles_group_together() {
        let forms = [
            "The Amazing Spider-Man",
            "Amazing Spider Man",
            "Amazing Spider-Man:",
        ];
        for form in forms {
            assert_eq!(
                normalize_title(form),
                "amazing spider man",
                "normalizing {form:?}"
            );
        }
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(
            normalize_title("Batman - Detective/Comics   Special"),
            "batman detective comics special"
        );
    }

    #[test]
    fn spells_out_ampersand() {
        assert_eq!(normalize_title("Cloak & Dagger"), "cloak and dagger");
    }

    #[test]
    fn drops_annual_plural() {
        assert_eq!(normalize_title("Batman Annuals"), "batman annual");
        assert!(titles_match("Batman Annuals", "Batman Annual"));
    }

    #[test]
    fn drops_noise_characters() {
        assert_eq!(
            normalize_title("Batman: Year One, Part 1!"),
            "batman year one part 1"
        );
        assert_eq!(normalize_title("Marvel's Spider-Man"), "marvels spider man");
        assert_eq!(normalize_title("Marvel\u{2019}s Spider-Man"), "marvels spider man");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "The Amazing Spider-Man",
            "Batman Annuals",
            "The The Batman",
            "the-batman",
            ": the batman",
            "Cloak & Dagger",
            "A + B, C!",
            "Theory of Everything",
            "  padded   everywhere  ",
            "100% Marvel / What If",
            "",
            "the",
        ];
        for sample in samples {
            let once = normalize_title(sample);
            assert_eq!(normalize_title(&once), once, "re-normalizing {sample:?}");
        }
    }
}
