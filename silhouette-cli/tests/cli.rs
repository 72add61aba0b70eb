// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("silhouette_cli_{}_{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_polygons(dir: &PathBuf, name: &str, with_shape: bool) -> PathBuf {
    let path = dir.join(name);
    let value = if with_shape {
        serde_json::json!({
            "input_shape": [64, 64],
            "polygons": [
                [[4, 4], [30, 4], [30, 30], [4, 30]],
                [[40, 40], [60, 40], [50, 60]],
            ],
        })
    } else {
        serde_json::json!({ "polygons": [[[4, 4], [30, 4], [30, 30], [4, 30]]] })
    };

    std::fs::write(&path, value.to_string()).unwrap();
    path
}

fn write_labeled_pgm(dir: &PathBuf, name: &str) -> PathBuf {
    let path = dir.join(name);

    let (width, height) = (16usize, 16usize);
    let mut pixels = vec![0u8; width * height];
    for y in 2..6 {
        for x in 2..6 {
            pixels[y * width + x] = 1;
        }
        for x in 9..14 {
            pixels[y * width + x] = 2;
        }
    }

    let mut bytes = format!("P5\n{} {}\n255\n", width, height).into_bytes();
    bytes.extend(pixels);
    std::fs::write(&path, bytes).unwrap();

    path
}

fn silhouette() -> Command {
    Command::cargo_bin("silhouette").unwrap()
}

#[test]
fn test_polygons_stdout() {
    let dir = temp_dir("polygons_stdout");
    let input = write_polygons(&dir, "image_polygons.json", true);

    silhouette()
        .args(["measure", "polygons", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("object_0\tarea\t676"))
        .stdout(predicate::str::contains("object_1\tnum_corners\t"))
        .stdout(predicate::str::contains("object_0\tcompact\ttrue"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_polygons_require_shape() {
    let dir = temp_dir("polygons_shape");
    let input = write_polygons(&dir, "image_polygons.json", false);

    silhouette()
        .args(["measure", "polygons", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"));

    silhouette()
        .args(["measure", "polygons", "--height", "64", "--width", "64", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("object_0\tarea\t676"));

    silhouette()
        .args(["measure", "polygons", "--height", "64", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("provided together"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_polygons_directory_table() {
    let dir = temp_dir("polygons_table");
    let inputs = dir.join("inputs");
    std::fs::create_dir_all(&inputs).unwrap();

    write_polygons(&inputs, "a_polygons.json", true);
    write_polygons(&inputs, "b_polygons.json", true);
    write_polygons(&inputs, "c_other.json", true);

    let output = dir.join("objects.csv");

    silhouette()
        .args(["measure", "polygons", "--substring", "_polygons", "-i"])
        .arg(&inputs)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let table = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = table.lines().collect();

    assert!(lines[0].starts_with("image,object,segment,area,perimeter"));
    assert!(lines[0].ends_with("long_skeleton,rigid"));
    assert_eq!(lines.len(), 1 + 4);
    assert!(lines[1].starts_with("a_polygons,0,0,"));
    assert!(lines[3].starts_with("b_polygons,0,0,"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_directory_requires_output() {
    let dir = temp_dir("directory_output");
    write_polygons(&dir, "a_polygons.json", true);

    silhouette()
        .args(["measure", "polygons", "-i"])
        .arg(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("output file must be provided"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_masks_json_output() {
    let dir = temp_dir("masks_json");
    let input = write_labeled_pgm(&dir, "labels.pgm");
    let output = dir.join("objects.json");

    silhouette()
        .args(["measure", "masks", "--no-skeleton", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();

    let objects = value["objects"].as_array().unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0]["segment"], 0);
    assert_eq!(objects[1]["segment"], 1);
    assert!(objects[0]["features"]["skeleton_length"].is_null());
    assert_eq!(objects[0]["points"][0], serde_json::json!([2, 2]));
    assert!(value["failures"].as_array().unwrap().is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_invalid_threads_and_output() {
    let dir = temp_dir("invalid_args");
    let input = write_labeled_pgm(&dir, "labels.pgm");

    silhouette()
        .args(["measure", "masks", "-t", "0", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Threads must be set"));

    silhouette()
        .args(["measure", "masks", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(dir.join("objects.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file extension"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_classify_stdout_and_table() {
    let dir = temp_dir("classify");
    let input = dir.join("features.json");

    let features = serde_json::json!({
        "features": [
            { "solidity": 0.97, "extent": 0.9, "num_corners": 4 },
            { "eccentricity": 0.99, "aspect_ratio": 5.0, "circularity": 0.1, "skeleton_length": 400.0 },
        ]
    });
    std::fs::write(&input, features.to_string()).unwrap();

    silhouette()
        .args(["classify", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("object_0\tcompact\ttrue"))
        .stdout(predicate::str::contains("object_0\tround\tfalse"))
        .stdout(predicate::str::contains("object_1\tlong\ttrue"))
        .stdout(predicate::str::contains("object_1\trigid\ttrue"));

    let output = dir.join("attributes.tsv");

    silhouette()
        .args(["classify", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let table = std::fs::read_to_string(&output).unwrap();
    assert!(table.starts_with("object\tarea"));
    assert_eq!(table.lines().count(), 3);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_classify_measure_output() {
    let dir = temp_dir("classify_measured");
    let input = write_polygons(&dir, "image_polygons.json", true);
    let measured = dir.join("measured.json");
    let classified = dir.join("classified.json");

    silhouette()
        .args(["measure", "polygons", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&measured)
        .assert()
        .success();

    silhouette()
        .args(["classify", "-i"])
        .arg(&measured)
        .arg("-o")
        .arg(&classified)
        .assert()
        .success();

    let measured: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&measured).unwrap()).unwrap();
    let classified: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&classified).unwrap()).unwrap();

    let classified = classified.as_array().unwrap();
    assert_eq!(classified.len(), 2);

    for (a, b) in measured["objects"].as_array().unwrap().iter().zip(classified) {
        assert_eq!(a["attribute_map"], b["attribute_map"]);
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_classify_missing_file() {
    silhouette()
        .args(["classify", "-i", "silhouette_missing_features.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[silhouette::classify] ERROR"));
}

#[test]
fn test_directory_json_round_trip() {
    let dir = temp_dir("directory_json");
    let inputs = dir.join("inputs");
    std::fs::create_dir_all(&inputs).unwrap();

    write_polygons(&inputs, "a_polygons.json", true);

    let measured = dir.join("measured.json");
    let classified = dir.join("classified.json");

    silhouette()
        .args(["measure", "polygons", "-i"])
        .arg(&inputs)
        .arg("-o")
        .arg(&measured)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&measured).unwrap()).unwrap();

    let images = value["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["image"], "a_polygons");

    silhouette()
        .args(["classify", "-i"])
        .arg(&measured)
        .arg("-o")
        .arg(&classified)
        .assert()
        .success();

    let classified: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&classified).unwrap()).unwrap();

    let objects = images[0]["objects"].as_array().unwrap();
    let classified = classified.as_array().unwrap();
    assert_eq!(classified.len(), 2);

    for (a, b) in objects.iter().zip(classified) {
        assert_eq!(a["attribute_map"], b["attribute_map"]);
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_verbose_stdout_holds_only_records() {
    let dir = temp_dir("verbose_stdout");
    let input = write_polygons(&dir, "image_polygons.json", true);

    silhouette()
        .args(["measure", "polygons", "-v", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("object_0\tarea\t676"))
        .stdout(predicate::str::contains("milliseconds").not())
        .stderr(predicate::str::contains("describe: "));

    let features = dir.join("features.json");
    std::fs::write(&features, serde_json::json!([{ "solidity": 0.97 }]).to_string()).unwrap();

    silhouette()
        .args(["classify", "-v", "-i"])
        .arg(&features)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("object_0\t"))
        .stderr(predicate::str::contains("classify: "));

    std::fs::remove_dir_all(&dir).unwrap();
}
