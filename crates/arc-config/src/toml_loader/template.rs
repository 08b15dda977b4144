//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> String {
    r##"# Arc Command Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[bridge]
# request_timeout_ms = 5000   # deadline for one bridge round trip
# ready_timeout_ms = 5000     # wait for the mediator to announce readiness

[platform]
# override = "mac"            # mac | windows | linux (detected when unset)

[storage]
# settings_file = "/path/to/settings.json"
# watch = true                # reload when another process edits settings

[overlay]
# search_url = "https://www.google.com/search?q="

[zoom]
# step = 0.1
# min = 0.25
# max = 5.0

[logging]
# level = "info"              # trace | debug | info | warn | error
"##
    .to_string()
}
