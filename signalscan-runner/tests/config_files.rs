//! Config and universe files read from disk.

use signalscan_runner::{ConfigError, ScanConfig, ScanRequest};

#[test]
fn universe_file_expands_instruments() {
    let tmp = tempfile::tempdir().unwrap();
    let universe = tmp.path().join("universe.txt");
    std::fs::write(&universe, "RELIANCE.NS, TCS.NS,\nINFY.NS\n\nTCS.NS\n").unwrap();
    let cfg_path = tmp.path().join("scan.toml");
    std::fs::write(
        &cfg_path,
        format!(
            r#"
            instruments = ["HDFCBANK.NS", "INFY.NS"]
            universe_file = '{}'
            start_date = "2024-01-01"
            end_date = "2024-12-31"
            "#,
            universe.display()
        ),
    )
    .unwrap();

    let cfg = ScanConfig::from_file(&cfg_path).unwrap();
    let request = ScanRequest::from_config(&cfg).unwrap();
    let ids: Vec<&str> = request.instruments.iter().map(|i| i.as_str()).collect();
    assert_eq!(ids, vec!["HDFCBANK.NS", "INFY.NS", "RELIANCE.NS", "TCS.NS"]);
    assert_eq!(request.config_hash, cfg.config_hash());
}

#[test]
fn empty_universe_is_config_error() {
    let tmp = tempfile::tempdir().unwrap();
    let universe = tmp.path().join("empty.txt");
    std::fs::write(&universe, " , \n").unwrap();
    let mut cfg = ScanConfig::from_toml(
        r#"
        start_date = "2024-01-01"
        end_date = "2024-12-31"
        "#,
    )
    .unwrap();
    cfg.universe_file = Some(universe);
    assert!(matches!(cfg.validate(), Err(ConfigError::Universe(_))));
}

#[test]
fn missing_config_file_reports_path() {
    let err = ScanConfig::from_file(std::path::Path::new("/nonexistent/scan.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/scan.toml"));
}
