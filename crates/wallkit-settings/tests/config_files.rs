use tempfile::tempdir;
use wallkit_layout::{ContainmentMode, WallInput};
use wallkit_settings::{ConfigError, SettingsError, WallConfig, WallSettings};

#[test]
fn test_toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wall.toml");

    let mut config = WallConfig::new();
    config.parameters.thickness = 2.2;
    config.parameters.containment = ContainmentMode::BoundingBox;
    config.export.pretty_json = false;
    config.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("variant = \"irregular\""));
    assert!(text.contains("containment = \"bounding_box\""));

    let loaded = WallConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wall.json");

    let config = WallConfig::straight(730.0);
    config.save_to_file(&path).unwrap();
    let loaded = WallConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(
        loaded.to_wall_input().unwrap(),
        WallInput::Straight { length: 730.0 }
    );
}

#[test]
fn test_hand_written_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corner.toml");
    std::fs::write(
        &path,
        r#"
[wall]
variant = "irregular"
guide = [[0.0, 0.0, 12.0], [0.0, 300.0, 12.0], [250.0, 300.0, 12.0]]

[parameters]
max_part_length = 300.0
max_corner_length = 80.0

[export]
mill_layer = "HALF"
"#,
    )
    .unwrap();

    let config = WallConfig::load_from_file(&path).unwrap();
    assert_eq!(config.parameters.max_part_length, 300.0);
    assert_eq!(config.parameters.thickness, 1.8);
    assert_eq!(config.export.mill_layer, "HALF");
    assert_eq!(config.export.outside_layer, "OUTSIDE");

    let WallInput::Irregular { guide } = config.to_wall_input().unwrap() else {
        panic!("expected an irregular wall");
    };
    assert_eq!(guide.len(), 2);
    assert!((guide.total_length() - 550.0).abs() < 1e-9);
}

#[test]
fn test_invalid_file_is_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"wall": {"variant": "straight", "length": 0.0}}"#).unwrap();

    let err = WallConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wall.yaml");
    let err = WallConfig::new().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = WallConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_unknown_variant() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wall.toml");
    std::fs::write(&path, "[wall]\nvariant = \"curved\"\n").unwrap();
    assert!(matches!(
        WallConfig::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_settings_variant_matches_input() {
    let config = WallConfig {
        wall: WallSettings::Straight { length: 90.0 },
        ..Default::default()
    };
    assert_eq!(
        config.to_wall_input().unwrap().variant(),
        wallkit_layout::WallVariant::Straight
    );
}
