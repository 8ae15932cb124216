//! Number audit for generated narratives
//!
//! Every figure a narrative quotes should come from the bundle. This pulls
//! the multi-digit numbers out of a text and reports those that do not occur
//! anywhere in the bundle's JSON. Spaces and dots inside a number are treated
//! as thousands separators and ignored on both sides.

/// Numeric tokens: a digit, then digits, spaces or dots, ending on a digit
pub fn numeric_tokens(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut last_digit = i;
        let mut j = i + 1;
        while j < chars.len() && (chars[j].is_ascii_digit() || chars[j].is_whitespace() || chars[j] == '.') {
            if chars[j].is_ascii_digit() {
                last_digit = j;
            }
            j += 1;
        }
        if last_digit > i {
            tokens.push(chars[i..=last_digit].iter().collect());
            i = last_digit + 1;
        } else {
            i += 1;
        }
    }
    tokens
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace() && *c != '.').collect()
}

/// Tokens from `text` whose digits do not appear in `bundle_json`, in order
pub fn unmatched_numbers(text: &str, bundle_json: &str) -> Vec<String> {
    let haystack = strip_separators(bundle_json);
    numeric_tokens(text)
        .into_iter()
        .filter(|token| !haystack.contains(&strip_separators(token)))
        .collect()
}
