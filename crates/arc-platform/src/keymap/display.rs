use crate::platform::Platform;

use super::types::Modifier;

/// Render combo tokens for humans.
///
/// Mac uses the conventional `⌃⌥⇧⌘` glyph order with no separator; other
/// platforms spell modifiers out (`Ctrl+Alt+Shift+Win`) joined by `+`.
pub fn combo_to_display<S: AsRef<str>>(keys: &[S], platform: Platform) -> String {
    let mut modifiers: Vec<Modifier> = Vec::new();
    let mut rest: Vec<&str> = Vec::new();
    for key in keys {
        match Modifier::from_token(key.as_ref()) {
            Some(m) if !modifiers.contains(&m) => modifiers.push(m),
            Some(_) => {}
            None => rest.push(key.as_ref()),
        }
    }
    modifiers.sort_by_key(|m| display_rank(*m));

    let mut parts: Vec<String> = modifiers
        .iter()
        .map(|m| display_modifier(*m, platform).to_string())
        .collect();
    parts.extend(rest.iter().map(|k| display_key(k, platform)));

    match platform {
        Platform::Mac => parts.join(""),
        Platform::Windows | Platform::Linux => parts.join("+"),
    }
}

fn display_rank(m: Modifier) -> u8 {
    match m {
        Modifier::Control => 0,
        Modifier::Alt => 1,
        Modifier::Shift => 2,
        Modifier::Meta => 3,
    }
}

fn display_modifier(m: Modifier, platform: Platform) -> &'static str {
    match (platform, m) {
        (Platform::Mac, Modifier::Control) => "\u{2303}", // ⌃
        (Platform::Mac, Modifier::Alt) => "\u{2325}",     // ⌥
        (Platform::Mac, Modifier::Shift) => "\u{21E7}",   // ⇧
        (Platform::Mac, Modifier::Meta) => "\u{2318}",    // ⌘
        (_, Modifier::Control) => "Ctrl",
        (_, Modifier::Alt) => "Alt",
        (_, Modifier::Shift) => "Shift",
        (Platform::Windows, Modifier::Meta) => "Win",
        (_, Modifier::Meta) => "Super",
    }
}

fn display_key(key: &str, platform: Platform) -> String {
    let mac = platform == Platform::Mac;
    match key {
        "ArrowUp" if mac => "\u{2191}".into(),
        "ArrowDown" if mac => "\u{2193}".into(),
        "ArrowLeft" if mac => "\u{2190}".into(),
        "ArrowRight" if mac => "\u{2192}".into(),
        "Tab" if mac => "\u{21E5}".into(),
        "Enter" if mac => "\u{21A9}".into(),
        "Escape" if mac => "\u{238B}".into(),
        "Backspace" if mac => "\u{232B}".into(),
        "ArrowUp" => "Up".into(),
        "ArrowDown" => "Down".into(),
        "ArrowLeft" => "Left".into(),
        "ArrowRight" => "Right".into(),
        " " => "Space".into(),
        other if other.chars().count() == 1 => other.to_uppercase(),
        other => other.to_string(),
    }
}
