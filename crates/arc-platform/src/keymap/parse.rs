use arc_common::PlatformError;

use super::types::{Combo, Modifier};

/// Parse a human-readable combo such as `"Cmd+Shift+T"`, `"Ctrl+Alt+Up"`
/// or `"Ctrl+Shift++"` into a [`Combo`] that applies to every platform.
///
/// Accepted modifier spellings:
/// - `Cmd` / `Command` / `Meta` / `Super` / `Win` -> `Meta`
/// - `Ctrl` / `Control` -> `Control`
/// - `Option` / `Opt` / `Alt` -> `Alt`
/// - `Shift` -> `Shift`
///
/// The last token is the key; a combo made only of modifiers is accepted
/// when the final modifier is meant as the key (`"Shift"`).
pub fn parse_combo(s: &str) -> Result<Combo, PlatformError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(PlatformError::InvalidCombo("empty combo string".into()));
    }

    // A trailing "++" (or a bare "+") means the plus key itself.
    let (head, plus_key) = if trimmed == "+" {
        ("", true)
    } else if let Some(head) = trimmed.strip_suffix("++") {
        (head, true)
    } else {
        (trimmed, false)
    };

    let mut tokens: Vec<&str> = if head.is_empty() {
        Vec::new()
    } else {
        head.split('+').map(str::trim).collect()
    };
    if plus_key {
        tokens.push("+");
    }

    let mut modifiers: Vec<Modifier> = Vec::new();
    let mut key: Option<String> = None;
    let last = tokens.len().saturating_sub(1);

    for (i, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            return Err(PlatformError::InvalidCombo(format!("empty token in '{s}'")));
        }
        match (parse_modifier(token), i == last) {
            (Some(m), false) => {
                if !modifiers.contains(&m) {
                    modifiers.push(m);
                }
            }
            (Some(m), true) => key = Some(m.token().to_string()),
            (None, true) => key = Some(normalize_key_name(token)),
            (None, false) => {
                return Err(PlatformError::InvalidCombo(format!(
                    "unrecognized modifier: {token}"
                )))
            }
        }
    }

    let key = key.ok_or_else(|| PlatformError::InvalidCombo(format!("'{s}' has no key")))?;
    let mut keys: Vec<String> = modifiers.iter().map(|m| m.token().to_string()).collect();
    if !keys.contains(&key) {
        keys.push(key);
    }
    Ok(Combo::new(keys))
}

pub(super) fn parse_modifier(token: &str) -> Option<Modifier> {
    match token.to_lowercase().as_str() {
        "cmd" | "command" | "meta" | "super" | "win" => Some(Modifier::Meta),
        "ctrl" | "control" => Some(Modifier::Control),
        "option" | "opt" | "alt" => Some(Modifier::Alt),
        "shift" => Some(Modifier::Shift),
        _ => None,
    }
}

/// Map a key name to the value a keyboard event reports for it.
pub(super) fn normalize_key_name(token: &str) -> String {
    let lower = token.to_lowercase();
    match lower.as_str() {
        "up" | "arrowup" => "ArrowUp".into(),
        "down" | "arrowdown" => "ArrowDown".into(),
        "left" | "arrowleft" => "ArrowLeft".into(),
        "right" | "arrowright" => "ArrowRight".into(),
        "tab" => "Tab".into(),
        "enter" | "return" => "Enter".into(),
        "esc" | "escape" => "Escape".into(),
        "space" => " ".into(),
        "backspace" => "Backspace".into(),
        "delete" | "del" => "Delete".into(),
        "plus" => "+".into(),
        "minus" => "-".into(),
        "equal" | "equals" => "=".into(),
        "period" => ".".into(),
        "comma" => ",".into(),
        "slash" => "/".into(),
        _ if token.chars().count() == 1 => token.to_lowercase(),
        _ if lower.starts_with('f') && lower[1..].parse::<u8>().is_ok() => lower.to_uppercase(),
        _ => token.to_string(),
    }
}
