mod common;

use assert_cmd::Command;
use emotion_prep::{CorpusTable, SampleRecord};
use predicates::prelude::*;

fn emotion_prep() -> Command {
    Command::cargo_bin("emotion-prep").unwrap()
}

#[test]
fn prepare_then_inspect_and_split() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("RAVDESS");
    common::actor_files(
        &root,
        "Actor_01",
        &[
            "03-01-03-01-01-01-01.wav",
            "03-01-04-01-01-01-01.wav",
            "03-01-99-01-01-01-01.wav",
        ],
    );
    let out_dir = dir.path().join("processed");

    emotion_prep()
        .arg("prepare")
        .arg("--input-root")
        .arg(&root)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--resample-mode", "linear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2/3 files"));

    let artifact = out_dir.join("ravdess_features.msgpack");
    assert!(artifact.exists());

    emotion_prep()
        .arg("inspect")
        .arg(&artifact)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 rows, 40 features per row"))
        .stdout(predicate::str::contains("happy"));

    emotion_prep()
        .arg("split")
        .arg(&artifact)
        .args(["--split", "test", "--ratio", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Split test: 1 rows"))
        .stdout(predicate::str::contains("0 -> sad"));
}

#[test]
fn prepare_fails_without_input_root() {
    let dir = tempfile::tempdir().unwrap();
    emotion_prep()
        .arg("prepare")
        .arg("--input-root")
        .arg(dir.path().join("missing"))
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn prepare_fails_when_nothing_is_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("RAVDESS");
    common::write_garbage(&root.join("Actor_01/03-01-03-01-01-01-01.wav"));
    let out_dir = dir.path().join("out");

    emotion_prep()
        .arg("prepare")
        .arg("--input-root")
        .arg(&root)
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no features were extracted"));
    assert!(!out_dir.exists());
}

#[test]
fn prepare_reads_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("RAVDESS");
    common::actor_files(&root, "Actor_01", &["03-01-02-01-01-01-01.wav"]);
    let out_dir = dir.path().join("out");
    let config = dir.path().join("pipeline.json");
    let body = serde_json::json!({
        "input_root": root,
        "output_dir": out_dir,
        "output_file": "features.json",
        "n_mfcc": 13
    });
    std::fs::write(&config, body.to_string()).unwrap();

    emotion_prep()
        .arg("prepare")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    emotion_prep()
        .arg("inspect")
        .arg(out_dir.join("features.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rows, 13 features per row"));
}

#[test]
fn split_takes_ratio_and_vocabulary_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("table.msgpack");
    CorpusTable::from_rows(vec![
        SampleRecord::new("a.wav", "happy", vec![0.1, 0.2]),
        SampleRecord::new("b.wav", "sad", vec![0.3, 0.4]),
    ])
    .unwrap()
    .save(&artifact)
    .unwrap();

    emotion_prep()
        .arg("split")
        .arg(&artifact)
        .args(["--split", "test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Split test: 1 rows"))
        .stdout(predicate::str::contains("0 -> sad"));

    let config = dir.path().join("split.json");
    let body = serde_json::json!({ "split_ratio": 0.5, "vocabulary": "corpus" });
    std::fs::write(&config, body.to_string()).unwrap();

    emotion_prep()
        .arg("split")
        .arg(&artifact)
        .args(["--split", "test", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Split test: 1 rows"))
        .stdout(predicate::str::contains("0 -> happy"))
        .stdout(predicate::str::contains("1 -> sad"));
}

#[test]
fn split_rejects_config_with_bad_ratio() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("table.msgpack");
    CorpusTable::from_rows(vec![SampleRecord::new("a.wav", "happy", vec![0.1])])
        .unwrap()
        .save(&artifact)
        .unwrap();
    let config = dir.path().join("split.json");
    std::fs::write(&config, r#"{ "split_ratio": 2.0 }"#).unwrap();

    emotion_prep()
        .arg("split")
        .arg(&artifact)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("split_ratio"));
}
