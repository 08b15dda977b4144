use super::types::Modifier;

/// Canonical match key for a set of key tokens.
///
/// Tokens are lower-cased; modifiers come first in `control, meta, alt,
/// shift` order and every other token follows in lexicographic order. The
/// result is `+`-joined. Total: no tokens gives an empty string.
pub fn normalize_combo<S: AsRef<str>>(keys: &[S]) -> String {
    let mut tokens: Vec<String> = keys.iter().map(|k| k.as_ref().to_lowercase()).collect();
    tokens.sort_by(|a, b| {
        let ra = Modifier::from_token(a).map(Modifier::rank);
        let rb = Modifier::from_token(b).map(Modifier::rank);
        match (ra, rb) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
    tokens.join("+")
}

/// Split a canonical key back into its tokens. `"control++"` keeps the
/// literal `+` key.
pub fn split_combo_key(key: &str) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    let mut tokens = Vec::new();
    let mut rest = key;
    while !rest.is_empty() {
        match rest.find('+') {
            Some(0) => {
                tokens.push("+".to_string());
                rest = rest.get(1..).unwrap_or("");
                rest = rest.strip_prefix('+').unwrap_or(rest);
            }
            Some(i) => {
                tokens.push(rest[..i].to_string());
                rest = &rest[i + 1..];
            }
            None => {
                tokens.push(rest.to_string());
                break;
            }
        }
    }
    tokens
}
