use std::path::PathBuf;

use tomoview_core::settings::AppSettings;

#[test]
fn test_settings_default_units_is_nm() {
    let settings = AppSettings::default();
    assert_eq!(settings.default_units, "nm");
    assert!(settings.show_properties_panel);
}

#[test]
fn test_settings_saved_file_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let mut settings = AppSettings {
        default_units: "px".to_string(),
        show_properties_panel: false,
        window_width: Some(1024.0),
        ..Default::default()
    };
    settings.push_recent(PathBuf::from("/data/a.toml"));

    settings.save_to(&path).unwrap();

    assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
}

#[test]
fn test_settings_missing_keys_fall_back_to_defaults() {
    let settings: AppSettings = toml::from_str("default_units = \"um\"").unwrap();
    assert_eq!(settings.default_units, "um");
    assert!(settings.show_properties_panel);
    assert!(settings.recent_descriptors.is_empty());
}

#[test]
fn test_recent_list_moves_to_front_and_is_bounded() {
    let mut settings = AppSettings::default();
    for i in 0..10 {
        settings.push_recent(PathBuf::from(format!("{i}.toml")));
    }
    settings.push_recent(PathBuf::from("5.toml"));

    assert_eq!(settings.recent_descriptors.len(), 8);
    assert_eq!(settings.recent_descriptors[0], PathBuf::from("5.toml"));
    assert_eq!(settings.recent_descriptors[1], PathBuf::from("9.toml"));
    assert_eq!(
        settings
            .recent_descriptors
            .iter()
            .filter(|p| *p == &PathBuf::from("5.toml"))
            .count(),
        1
    );
}
