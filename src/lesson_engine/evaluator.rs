//! Answer normalization and checking.

/// Marker that replaces the hidden word in fill-in sentences.
pub const BLANK: &str = "___";

/// Trimmed, lowercased form used for every answer comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// True when two answers are equal ignoring case and surrounding whitespace.
pub fn answers_match(expected: &str, given: &str) -> bool {
    normalize(expected) == normalize(given)
}

/// True when the learner's tiles, read in order, spell the target phrase.
///
/// Runs of whitespace are collapsed on both sides before comparing.
pub fn assembled_matches(target: &str, tiles: &[String]) -> bool {
    let expected: Vec<String> = target.split_whitespace().map(normalize).collect();
    let given: Vec<String> = tiles
        .iter()
        .flat_map(|t| t.split_whitespace())
        .map(normalize)
        .collect();
    !expected.is_empty() && expected == given
}

/// Replace the first case-insensitive occurrence of `word` in `sentence` with
/// [`BLANK`]. Returns `None` when the word does not occur.
pub fn blank_out(sentence: &str, word: &str) -> Option<String> {
    let needle: Vec<char> = word.trim().chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    // Compare char by char so lowercasing never shifts byte offsets.
    let indices: Vec<(usize, char)> = sentence.char_indices().collect();
    for start in 0..indices.len() {
        let mut matched = 0;
        let mut pos = start;
        let mut pending: Vec<char> = Vec::new();
        while matched < needle.len() {
            if pending.is_empty() {
                let Some(&(_, c)) = indices.get(pos) else { break };
                pending = c.to_lowercase().collect();
                pending.reverse();
                pos += 1;
            }
            match pending.pop() {
                Some(c) if c == needle[matched] => matched += 1,
                _ => break,
            }
        }
        if matched == needle.len() && pending.is_empty() {
            let from = indices[start].0;
            let to = indices.get(pos).map(|&(i, _)| i).unwrap_or(sentence.len());
            return Some(format!("{}{}{}", &sentence[..from], BLANK, &sentence[to..]));
        }
    }
    None
}
