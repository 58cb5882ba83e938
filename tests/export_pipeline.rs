//! End-to-end export: infer, add drag, write CSV

use std::fs;

use rouse_force::inference::ForceInference;
use rouse_force::models::DragMode;
use rouse_force::output::{export_force_csv, CsvConfig, CsvExporter, CsvMetadata, Exporter};
use tempfile::tempdir;

mod common;
use common::irregular_grid;

#[test]
fn test_export_inferred_profiles() {
    let times = irregular_grid(30, 0.5);
    let n = times.len();
    let displacement: Vec<f64> = (0..n).map(|i| 0.05 * i as f64).collect();

    let mut inference = ForceInference::with_calibration(times.clone(), displacement, 0.4).unwrap();
    inference.populate().unwrap();
    inference.compute_drag(&vec![1.0; n - 1], DragMode::Elastic).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("profile.csv");
    let config = CsvConfig::high_precision().with_metadata(CsvMetadata::from_inference(&inference));
    CsvExporter::new(config).export(&inference, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("# Drag Mode: elastic"));

    let rows: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(rows[0], "Time,Force,Drag");
    assert_eq!(rows.len(), n + 1);

    // Time column is the sample grid
    for (row, t) in rows[1..].iter().zip(&times) {
        let value: f64 = row.split(',').next().unwrap().parse().unwrap();
        assert!((value - t).abs() < 1e-9);
    }
}

#[test]
fn test_export_missing_directory_fails() {
    let mut inference = ForceInference::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.1, 0.3]).unwrap();
    inference.populate().unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("profile.csv");
    assert!(export_force_csv(&inference, &path, None).is_err());
}
