use std::path::{Path, PathBuf};

use emotion_prep::dataset::split_boundary;
use emotion_prep::{
    CorpusTable, DatasetOptions, LabeledTableDataset, PipelineError, SampleRecord, Split,
    VocabularyScope,
};
use tempfile::TempDir;

fn write_table(dir: &TempDir, labels: &[&str]) -> PathBuf {
    let rows = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let features = (0..4).map(|j| (i * 4 + j) as f32 * 0.5).collect();
            SampleRecord::new(format!("Actor_01/{i:03}.wav"), *label, features)
        })
        .collect();
    let table = CorpusTable::from_rows(rows).unwrap();
    let path = dir.path().join("table.msgpack");
    table.save(&path).unwrap();
    path
}

fn open(path: &Path, selector: &str) -> LabeledTableDataset {
    LabeledTableDataset::open(path, selector, 0.8).unwrap()
}

#[test]
fn split_sizes_partition_the_table() {
    for n in [0usize, 1, 7, 100] {
        let dir = tempfile::tempdir().unwrap();
        let labels: Vec<&str> = (0..n)
            .map(|i| if i % 2 == 0 { "happy" } else { "sad" })
            .collect();
        let path = write_table(&dir, &labels);

        let train = open(&path, "train");
        let test = open(&path, "test");
        assert_eq!(train.len() + test.len(), n, "n = {n}");
        assert_eq!(train.len(), (n as f64 * 0.8).floor() as usize, "n = {n}");
        assert_eq!(train.len(), split_boundary(n, 0.8));
    }
}

#[test]
fn get_enforces_split_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, &["happy", "sad", "happy", "sad", "happy", "sad", "happy"]);

    for selector in ["train", "test"] {
        let dataset = open(&path, selector);
        let len = dataset.len();
        assert!(len > 0);
        assert!(dataset.get(0).is_ok());
        assert!(dataset.get(len - 1).is_ok());
        match dataset.get(len) {
            Err(PipelineError::IndexOutOfRange { index, len: reported }) => {
                assert_eq!(index, len);
                assert_eq!(reported, len);
            }
            other => panic!("expected out of range, got {other:?}"),
        }
        // -1 wrapped into usize
        assert!(matches!(
            dataset.get(usize::MAX),
            Err(PipelineError::IndexOutOfRange { .. })
        ));
    }
}

#[test]
fn empty_split_rejects_every_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, &["happy"]);
    let train = open(&path, "train");
    assert!(train.is_empty());
    assert_eq!(train.label_count(), 0);
    assert!(matches!(
        train.get(0),
        Err(PipelineError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn test_split_rows_start_at_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, &["happy"; 10]);
    let test = open(&path, "test");
    assert_eq!(test.len(), 2);
    let (features, label) = test.get(0).unwrap();
    assert_eq!(features.to_vec(), vec![16.0, 16.5, 17.0, 17.5]);
    assert_eq!(label, 0);
    assert_eq!(test.file(1), Some("Actor_01/009.wav"));
}

#[test]
fn shared_label_sets_agree_across_splits() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(
        &dir,
        &["sad", "happy", "happy", "sad", "happy", "sad", "happy", "sad", "happy", "sad"],
    );

    let train = open(&path, "train");
    let test = open(&path, "test");
    assert_eq!(train.label_count(), 2);
    assert_eq!(test.label_count(), 2);
    for dataset in [&train, &test] {
        assert_eq!(dataset.label_id("happy"), Some(0));
        assert_eq!(dataset.label_id("sad"), Some(1));
    }
    assert_eq!(train.get(0).unwrap().1, 1);
    assert_eq!(test.get(0).unwrap().1, 0);
}

#[test]
fn label_missing_from_one_split_shifts_its_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(
        &dir,
        &["angry", "happy", "sad", "happy", "sad", "happy", "sad", "happy", "happy", "sad"],
    );

    let train = open(&path, "train");
    let test = open(&path, "test");
    assert_eq!(train.label_count(), 3);
    assert_eq!(test.label_count(), 2);
    assert_ne!(train.label_id("happy"), test.label_id("happy"));

    let corpus = |split| {
        LabeledTableDataset::open_with(
            &path,
            DatasetOptions::new(split, 0.8).with_vocabulary(VocabularyScope::Corpus),
        )
        .unwrap()
    };
    let (train, test) = (corpus(Split::Train), corpus(Split::Test));
    assert_eq!(train.labels(), test.labels());
    assert_eq!(train.label_id("happy"), test.label_id("happy"));
}

#[test]
fn missing_artifact_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = LabeledTableDataset::open(&dir.path().join("absent.msgpack"), "train", 0.8);
    assert!(matches!(result, Err(PipelineError::Io { .. })));
}

#[test]
fn corrupt_artifact_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.msgpack");
    std::fs::write(&path, [0xc1, 0x00, 0xff]).unwrap();
    let result = LabeledTableDataset::open(&path, "train", 0.8);
    assert!(matches!(result, Err(PipelineError::Serialization(_))));
}

#[test]
fn reads_can_happen_from_several_threads() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, &["happy", "sad", "happy", "sad", "happy"]);
    let dataset = open(&path, "train");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for index in 0..dataset.len() {
                    let (features, _) = dataset.get(index).unwrap();
                    assert_eq!(features.len(), 4);
                }
            });
        }
    });
}
