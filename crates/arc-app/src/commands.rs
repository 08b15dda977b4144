//! Subcommand implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_common::Result;
use arc_config::{
    ArcConfig, FileBackend, MemoryBackend, PersistenceBackend, Settings, SettingsStore,
};
use arc_platform::{
    event_to_combo_key, is_overlay_toggle, resolve_platform, KeyEvent, Platform, ShortcutCategory,
    ShortcutRegistry,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::{Command, SettingsAction};
use crate::overlay::OverlayStatus;
use crate::topology::Topology;

const SETTINGS_DEBOUNCE: Duration = Duration::from_millis(250);

pub async fn run(command: Command, config: &ArcConfig) -> Result<()> {
    match command {
        Command::Shortcuts { platform } => shortcuts(config, platform.as_deref()).await,
        Command::Resolve { combo, platform } => resolve(config, &combo, platform.as_deref()).await,
        Command::Settings { file, action } => settings(config, file, action).await,
        Command::Simulate {
            platform,
            inert,
            persist,
        } => simulate(config, platform.as_deref(), inert, persist).await,
    }
}

/// `--platform`, else the config override, else the running OS.
fn platform(config: &ArcConfig, flag: Option<&str>) -> Result<Platform> {
    let name = flag.or(config.platform.override_platform.as_deref());
    Ok(resolve_platform(name)?)
}

async fn open_store(
    config: &ArcConfig,
    file: Option<PathBuf>,
    registry: &ShortcutRegistry,
) -> Result<SettingsStore> {
    let path = match file {
        Some(path) => path,
        None => arc_config::settings_path(config)?,
    };
    let backend = FileBackend::open(path).await?;
    Ok(SettingsStore::new(Arc::new(backend), registry.settings_defaults()))
}

async fn shortcuts(config: &ArcConfig, flag: Option<&str>) -> Result<()> {
    let registry = ShortcutRegistry::builtin(platform(config, flag)?);
    let settings = open_store(config, None, &registry).await?.get().await;

    println!(
        "arc mode: {}",
        if settings.arc_mode_enabled { "on" } else { "off" }
    );
    for category in ShortcutCategory::ALL {
        println!("\n{}", category.label());
        for shortcut in registry.all().iter().filter(|s| s.category == category) {
            let combo = registry.display_for(&shortcut.id).unwrap_or_else(|| "-".into());
            let state = if settings.is_enabled(&shortcut.id) { "" } else { "  (disabled)" };
            println!("  {:<18} {:<14} {}{state}", shortcut.id, combo, shortcut.label);
        }
    }
    Ok(())
}

async fn resolve(config: &ArcConfig, combo: &str, flag: Option<&str>) -> Result<()> {
    let platform = platform(config, flag)?;
    let registry = ShortcutRegistry::builtin(platform);
    let settings = open_store(config, None, &registry).await?.get().await;
    let event = KeyEvent::from_combo_str(combo)?;

    if is_overlay_toggle(&event, platform) {
        println!("{combo}: opens the command overlay");
        return Ok(());
    }
    let Some(key) = event_to_combo_key(&event) else {
        println!("{combo}: no key");
        return Ok(());
    };

    let candidates = registry.resolve(&key);
    if candidates.is_empty() {
        println!("{key}: no shortcut");
        return Ok(());
    }
    println!("{key}:");
    for shortcut in &candidates {
        let state = if settings.is_enabled(&shortcut.id) { "enabled" } else { "disabled" };
        println!("  {} ({}, {state})", shortcut.id, shortcut.action);
    }
    match registry.resolve_enabled(&key, &settings) {
        Some(winner) if settings.arc_mode_enabled => println!("fires: {}", winner.id),
        Some(winner) => println!("fires: {} (once arc mode is on)", winner.id),
        None => println!("fires: nothing, every candidate is disabled"),
    }
    Ok(())
}

async fn settings(config: &ArcConfig, file: Option<PathBuf>, action: SettingsAction) -> Result<()> {
    let registry = ShortcutRegistry::builtin(platform(config, None)?);
    let store = open_store(config, file, &registry).await?;

    let settings = match action {
        SettingsAction::Show => store.get().await,
        SettingsAction::ArcMode { state } => store.set_arc_mode(state.enabled()).await?,
        SettingsAction::Enable { id } => set_feature(&store, &registry, &id, true).await?,
        SettingsAction::Disable { id } => set_feature(&store, &registry, &id, false).await?,
    };
    print_settings(&settings);
    Ok(())
}

async fn set_feature(
    store: &SettingsStore,
    registry: &ShortcutRegistry,
    id: &str,
    enabled: bool,
) -> Result<Settings> {
    if registry.get(id).is_none() {
        warn!(id, "not a known shortcut id, storing anyway");
    }
    Ok(store.set_feature(id, enabled).await?)
}

fn print_settings(settings: &Settings) {
    match serde_json::to_string_pretty(&settings.to_value()) {
        Ok(text) => println!("{text}"),
        Err(e) => warn!(error = %e, "failed to render settings"),
    }
}

async fn simulate(config: &ArcConfig, flag: Option<&str>, inert: bool, persist: bool) -> Result<()> {
    let platform = platform(config, flag)?;
    let mut watcher = None;
    let backend: Arc<dyn PersistenceBackend> = if persist {
        let file = Arc::new(FileBackend::open(arc_config::settings_path(config)?).await?);
        if config.storage.watch {
            watcher = Some(file.spawn_watcher(SETTINGS_DEBOUNCE));
        }
        file
    } else {
        Arc::new(MemoryBackend::new())
    };
    let topology = Topology::start(config, platform, backend).await?;
    if !inert {
        topology.set_arc_mode(true).await?;
    }
    info!(platform = platform.as_str(), "simulating; reading combos from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(text) = line.strip_prefix("type ") {
            topology.type_text(text).await;
            println!("{line}");
            continue;
        }
        match topology.press(line).await {
            Ok(outcome) => println!("{line} -> {outcome:?}"),
            Err(e) => println!("{line} -> error: {e}"),
        }
    }

    println!("\n{}", topology.summary());
    let overlay = topology.overlay();
    if overlay.is_open() || matches!(overlay.status(), OverlayStatus::Error(_)) {
        println!("overlay:\n{}", overlay.render());
    }
    for body in topology.host().notification_bodies() {
        println!("notice: {body}");
    }
    if let Some(copied) = topology.page().clipboard() {
        println!("clipboard: {copied}");
    }
    if let Some(watcher) = watcher {
        watcher.abort();
    }
    Ok(())
}
