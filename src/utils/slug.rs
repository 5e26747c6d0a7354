//! Slug generation for list names

/// Turn a list name into its url slug
///
/// "Watch later" becomes "watch-later"; non-ascii letters are transliterated
/// and runs of anything else collapse into a single dash.
pub fn slugify(name: &str) -> String {
    let ascii = deunicode::deunicode(name).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Slugify `name`, appending `-2`, `-3`... until `taken` reports it free
pub fn unique_slug<F>(name: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = match slugify(name) {
        s if s.is_empty() => "list".to_string(),
        s => s,
    };

    if !taken(&base) {
        return base;
    }

    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Watch later"), "watch-later");
        assert_eq!(slugify("  Sci-Fi  &  Fantasy!! "), "sci-fi-fantasy");
        assert_eq!(slugify("Amélie's Picks"), "amelie-s-picks");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_unique_slug() {
        let existing = ["faves", "faves-2"];
        let slug = unique_slug("Faves", |s| existing.contains(&s));
        assert_eq!(slug, "faves-3");
        assert_eq!(unique_slug("!!", |_| false), "list");
    }
}
