// crates/ldu_config/tests/config_file_tests.rs
//!
//! 配置文件读写测试

use ldu_config::{ConfigError, SolutionConfig, SolverControls};

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fvSolution.json");

    let mut config = SolutionConfig::default();
    config.insert(
        "p",
        SolverControls::new("PCG")
            .with_preconditioner("DIC")
            .with_tolerance(1e-8, 0.05)
            .with_iterations(1, 200),
    );
    config.insert(
        "U",
        SolverControls::new("smoothSolver").with_smoother("symGaussSeidel"),
    );
    config.relaxation.equations.insert("U".into(), 0.7);

    config.save_to_file(&path).unwrap();
    let loaded = SolutionConfig::from_file(&path).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.controls("p").unwrap().min_iter, 1);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = SolutionConfig::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_invalid_entry_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{ "solvers": { "p": { "solver": "PCG", "tolerance": -1 } } }"#,
    )
    .unwrap();

    match SolutionConfig::from_file(&path) {
        Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "p.tolerance"),
        other => panic!("unexpected: {:?}", other),
    }
}
