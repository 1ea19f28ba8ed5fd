use std::fs;

use super::*;

fn generated_config(color: &str, granularity: u64) -> Config {
    Config {
        location: LocationConfig {
            latitude: 37.7749,
            longitude: -122.4194,
            timezone: "America/Los_Angeles".to_string(),
        },
        mode: SourceMode::Generated,
        wallpapers: None,
        generated: Some(GeneratedConfig {
            screen_width: 1920,
            screen_height: 1080,
            background_colors: PeriodColors {
                night: color.to_string(),
                morning: "#7aa2f7".to_string(),
                afternoon: "#e0af68".to_string(),
            },
        }),
        settings: Settings {
            transitions: Transitions {
                enabled: true,
                granularity,
                ..Transitions::default()
            },
            ..Settings::default()
        },
    }
}

#[test]
fn parses_minimal_file_mode_config() {
    let toml_text = r##"
[location]
latitude = 51.5074
longitude = -0.1278
timezone = "Europe/London"

[wallpapers]
night = "/walls/night.jpg"
morning = "/walls/morning.jpg"
afternoon = "/walls/afternoon.jpg"
"##;
    let config: Config = toml::from_str(toml_text).unwrap();
    assert_eq!(config.mode, SourceMode::File);
    assert_eq!(config.location.timezone, "Europe/London");
    // Settings fall back to defaults when the section is absent.
    assert_eq!(
        config.settings.check_interval_fallback,
        DEFAULT_CHECK_INTERVAL_FALLBACK_SECS
    );
    assert!(!config.settings.transitions.enabled);
    assert_eq!(
        config.settings.transitions.granularity,
        DEFAULT_GRANULARITY_SECS
    );
    assert!(config.settings.transitions.cache_blends);
}

#[test]
fn parses_transition_settings() {
    let toml_text = r##"
[location]
latitude = 0.0
longitude = 0.0
timezone = "UTC"

mode = "generated"

[generated.background_colors]
night = "#000000"
morning = "#111111"
afternoon = "#222222"

[settings.transitions]
enabled = true
granularity = 900
max_cache_mb = 50
"##;
    let config: Config = toml::from_str(toml_text).unwrap();
    assert_eq!(config.mode, SourceMode::Generated);
    assert!(config.settings.transitions.enabled);
    assert_eq!(config.settings.transitions.granularity, 900);
    assert_eq!(config.max_cache_bytes(), 50 * 1024 * 1024);
    let generated = config.generated.as_ref().unwrap();
    // Screen size defaults apply when unspecified.
    assert_eq!(generated.screen_width, DEFAULT_SCREEN_WIDTH);
    assert_eq!(generated.screen_height, DEFAULT_SCREEN_HEIGHT);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn rejects_out_of_range_coordinates() {
    let mut config = generated_config("#1a1b26", 3600);
    config.location.latitude = 91.0;
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("Latitude"));

    config.location.latitude = 45.0;
    config.location.longitude = -181.0;
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("Longitude"));
}

#[test]
fn rejects_unknown_timezone() {
    let mut config = generated_config("#1a1b26", 3600);
    config.location.timezone = "Mars/Olympus_Mons".to_string();
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("Invalid timezone"));
}

#[test]
fn rejects_granularity_out_of_bounds() {
    let too_fast = generated_config("#1a1b26", 30);
    assert!(validate_config(&too_fast).is_err());

    let too_slow = generated_config("#1a1b26", 90000);
    assert!(validate_config(&too_slow).is_err());

    let just_right = generated_config("#1a1b26", 60);
    assert!(validate_config(&just_right).is_ok());
}

#[test]
fn rejects_malformed_hex_colors() {
    for bad in ["1a1b26", "#1a1b2", "#1a1b2g", "#1a1b2677"] {
        let config = generated_config(bad, 3600);
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("hex color"), "accepted {bad}");
    }
}

#[test]
fn file_mode_requires_wallpapers_section() {
    let mut config = generated_config("#1a1b26", 3600);
    config.mode = SourceMode::File;
    config.generated = None;
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("[wallpapers]"));
}

#[test]
fn file_mode_requires_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let existing = dir.path().join("night.jpg");
    fs::write(&existing, b"jpeg bytes").unwrap();

    let mut config = generated_config("#1a1b26", 3600);
    config.mode = SourceMode::File;
    config.generated = None;
    config.wallpapers = Some(WallpaperPaths {
        night: existing.to_string_lossy().into_owned(),
        morning: dir.path().join("missing.jpg").to_string_lossy().into_owned(),
        afternoon: existing.to_string_lossy().into_owned(),
    });
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("morning"));
}

#[test]
fn template_round_trips_through_the_parser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("switchback.toml");
    create_default_config(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let config: Config = toml::from_str(&text).unwrap();
    assert_eq!(config.mode, SourceMode::File);
    assert!(config.timezone().is_ok());

    // A second init must refuse to clobber the existing file.
    assert!(create_default_config(&path).is_err());
}

#[test]
fn expand_path_handles_home_prefix() {
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_path("~/x/y.jpg"), home.join("x/y.jpg"));
    }
    assert_eq!(expand_path("/abs/p.jpg"), PathBuf::from("/abs/p.jpg"));
}
