use campus_logger::{LevelFilter, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_sink_writes_records() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("campus-file-logging")
        .console(false)
        .json(true)
        .level(LevelFilter::INFO)
        .path(&log_dir)
        .init()?;
    assert!(logger.has_file_sink());

    tracing::info!(total = 3, "catalog page served");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    let first = contents.lines().next().expect("at least one record");
    let record: serde_json::Value = serde_json::from_str(first)?;
    assert_eq!(record["fields"]["message"], "catalog page served");

    Ok(())
}
