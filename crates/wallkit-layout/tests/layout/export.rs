use dxf::entities::EntityType;
use dxf::Drawing;
use tempfile::tempdir;
use wallkit_layout::{
    save_dxf, save_json, Blueprint, BlueprintMaker, BlueprintParameters, DxfLayers, WallInput,
};

fn blueprint() -> Blueprint {
    BlueprintMaker::new(
        WallInput::Straight { length: 400.0 },
        BlueprintParameters::default(),
    )
    .generate()
    .unwrap()
}

#[test]
fn test_dxf_file_round_trips_through_reader() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wall.dxf");
    let blueprint = blueprint();
    let layers = DxfLayers {
        outside: "CUT".to_string(),
        ..Default::default()
    };

    save_dxf(&blueprint, &layers, &path).unwrap();
    assert!(path.exists());

    let drawing = Drawing::load_file(&path).unwrap();
    let on_cut = drawing
        .entities()
        .filter(|e| matches!(e.specific, EntityType::LwPolyline(_)))
        .filter(|e| e.common.layer == "CUT")
        .count();
    assert_eq!(on_cut, blueprint.part_count());
}

#[test]
fn test_dxf_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("wall.dxf");
    let result = save_dxf(&blueprint(), &DxfLayers::default(), &path);
    assert!(result.is_err());
}

#[test]
fn test_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wall.json");
    let blueprint = blueprint();
    save_json(&blueprint, &path, false).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let back: Blueprint = serde_json::from_str(&text).unwrap();
    assert_eq!(back, blueprint);
}
