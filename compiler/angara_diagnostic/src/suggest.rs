//! "Did you mean?" suggestions via Levenshtein edit distance, used by the
//! checker when a name lookup fails (undefined name, missing property,
//! unknown selective `attach`) to point at the most likely intended name.

/// Minimum number of single-character edits (insertions, deletions,
/// substitutions) to turn `a` into `b`.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1).min(curr_row[j] + 1).min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Short names tolerate fewer edits than long ones, so a two-letter typo
/// doesn't match half the identifiers in scope.
fn default_threshold(name_len: usize) -> usize {
    match name_len {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        n => (n / 2).min(5),
    }
}

/// Find the closest candidate to `name`, if any is within the
/// length-scaled default threshold. Used for the single-suggestion case
/// (`missing_property`, `undefined_name`, selective-attach diagnostics).
#[must_use]
pub fn closest_name<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    closest_name_with_threshold(name, candidates, default_threshold(name.len()))
}

#[must_use]
pub fn closest_name_with_threshold<'a>(
    name: &str,
    candidates: impl Iterator<Item = &'a str>,
    threshold: usize,
) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }

    let mut best: Option<(&str, usize)> = None;
    for candidate in candidates {
        let len_diff = name.len().abs_diff(candidate.len());
        if len_diff > threshold {
            continue;
        }
        let distance = edit_distance(name, candidate);
        if distance <= threshold {
            match best {
                None => best = Some((candidate, distance)),
                Some((_, best_dist)) if distance < best_dist => best = Some((candidate, distance)),
                _ => {}
            }
        }
    }
    best.map(|(s, _)| s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_basics() {
        assert_eq!(edit_distance("hello", "hello"), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn test_closest_name_typo() {
        let candidates = vec!["length", "height", "width"];
        assert_eq!(closest_name("lenght", candidates.iter().copied()), Some("length"));
    }

    #[test]
    fn test_closest_name_no_match_for_unrelated() {
        let candidates = vec!["alpha", "beta", "gamma"];
        assert_eq!(closest_name("xyz", candidates.iter().copied()), None);
    }

    #[test]
    fn test_closest_name_empty_input() {
        let candidates = vec!["foo", "bar"];
        assert_eq!(closest_name("", candidates.iter().copied()), None);
    }
}
