//! Pronunciation scoring against the expected target-language text.

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Use two rows instead of the full matrix for memory efficiency
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Score a spoken transcript against the expected text, 0 to 100.
///
/// Both inputs are trimmed; no case folding or diacritic normalization is
/// applied, a deliberate simplification for script-specific phonetics.
/// Two empty strings score 100.
pub fn pronunciation_score(expected: &str, actual: &str) -> u8 {
    let expected = expected.trim();
    let actual = actual.trim();

    let max_len = expected.chars().count().max(actual.chars().count());
    if max_len == 0 {
        return 100;
    }

    // distance never exceeds the longer length under unit costs
    let distance = levenshtein_distance(expected, actual);
    (((max_len - distance) as f64 / max_len as f64) * 100.0).round() as u8
}
