use crate::batch::{process_all, run, sort_by_volatility, summarize};
use crate::calc::returns::PriceSeries;
use crate::config::RunConfig;
use crate::data::results_csv::SeriesResult;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn config_for(root: &Path) -> RunConfig {
    RunConfig {
        input_dir: root.join("data"),
        output_dir: root.join("results"),
        output_file_name: "summary.csv".to_string(),
        max_concurrent_files: 2,
    }
}

fn with_volatility(name: &str, volatility_unbiased: f64) -> SeriesResult {
    let mut result = summarize(name.to_string(), &PriceSeries::new(vec![1.0, 1.0]));
    result.volatility_unbiased = volatility_unbiased;
    result
}

#[test]
fn test_summarize_known_series() {
    let result = summarize("ab.csv".to_string(), &PriceSeries::new(vec![100.0, 105.0, 100.0]));

    assert_eq!(result.file_name, "ab.csv");
    assert!(result.mean_return.abs() < 1e-15);
    assert!((result.volatility_unbiased - 4.8790164169).abs() < 1e-6);
    assert!((result.volatility_mle - 3.9837002227).abs() < 1e-6);
}

#[test]
fn test_sort_descending_nan_last_and_stable() {
    let mut results = vec![
        with_volatility("nan.csv", f64::NAN),
        with_volatility("low.csv", 1.0),
        with_volatility("tie_first.csv", 3.0),
        with_volatility("high.csv", 7.0),
        with_volatility("tie_second.csv", 3.0),
    ];

    sort_by_volatility(&mut results);

    let names: Vec<&str> = results.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["high.csv", "tie_first.csv", "tie_second.csv", "low.csv", "nan.csv"]
    );
}

#[tokio::test]
async fn test_run_ranks_files_and_writes_summary() {
    let tmp = TempDir::new().unwrap();
    let config = config_for(tmp.path());
    std::fs::create_dir_all(&config.input_dir).unwrap();

    // calm.csv moves 1% a day, wild.csv 10%, single.csv cannot produce an unbiased estimate
    std::fs::write(
        config.input_dir.join("calm.csv"),
        "date,price\n2024-01-01,100\n2024-01-02,101\n2024-01-03,100\n",
    )
    .unwrap();
    std::fs::write(
        config.input_dir.join("wild.csv"),
        "date,price\n2024-01-01,100\n2024-01-02,110\n2024-01-03,100\n",
    )
    .unwrap();
    std::fs::write(config.input_dir.join("single.csv"), "date,price\n2024-01-01,100\n").unwrap();

    let results = run(&config).await.unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["wild.csv", "calm.csv", "single.csv"]);
    assert!(results[0].volatility_unbiased > results[1].volatility_unbiased);
    assert!(results[2].volatility_unbiased.is_nan());
    assert_eq!(results[2].sample_variance_mle, 0.0);

    let text = std::fs::read_to_string(config.output_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("File Name,Average DPSR,"));
    assert!(lines[1].starts_with("wild.csv,"));
    assert!(lines[2].starts_with("calm.csv,"));
    assert_eq!(lines[3], "single.csv,0,NaN,0,NaN,0");
}

#[tokio::test]
async fn test_empty_input_directory_writes_header_only() {
    let tmp = TempDir::new().unwrap();
    let config = config_for(tmp.path());
    std::fs::create_dir_all(&config.input_dir).unwrap();

    let results = run(&config).await.unwrap();
    assert!(results.is_empty());

    let text = std::fs::read_to_string(config.output_path()).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[tokio::test]
async fn test_unreadable_input_aborts_without_output() {
    let tmp = TempDir::new().unwrap();
    let config = config_for(tmp.path());

    assert!(run(&config).await.is_err());
    assert!(!config.output_path().exists());
}

#[tokio::test]
async fn test_unparseable_file_aborts_without_output() {
    let tmp = TempDir::new().unwrap();
    let config = config_for(tmp.path());
    std::fs::create_dir_all(&config.input_dir).unwrap();
    std::fs::write(config.input_dir.join("good.csv"), "d1,100\nd2,101\n").unwrap();
    std::fs::write(config.input_dir.join("bad.csv"), b"d1,100\nd2,\xff\n".as_slice()).unwrap();

    let err = run(&config).await.unwrap_err();
    assert!(format!("{:#}", err).contains("bad.csv"));
    assert!(!config.output_path().exists());
}

#[tokio::test]
async fn test_results_keep_discovery_order() {
    let tmp = TempDir::new().unwrap();

    // Same constant price everywhere, so every volatility ties; earlier files are larger
    let files: Vec<PathBuf> = (0..12)
        .map(|i| {
            let path = tmp.path().join(format!("series_{:02}.csv", i));
            let rows: String = (0..(12 - i) * 500)
                .map(|day| format!("d{},100\n", day))
                .collect();
            std::fs::write(&path, format!("date,price\n{}", rows)).unwrap();
            path
        })
        .collect();
    let expected: Vec<String> = (0..12).map(|i| format!("series_{:02}.csv", i)).collect();

    let mut results = process_all(files, 4).await.unwrap();
    let names: Vec<String> = results.iter().map(|r| r.file_name.clone()).collect();
    assert_eq!(names, expected);

    sort_by_volatility(&mut results);
    let names: Vec<String> = results.iter().map(|r| r.file_name.clone()).collect();
    assert_eq!(names, expected, "Ties should keep discovery order after sorting");
    assert!(results.iter().all(|r| r.volatility_unbiased == 0.0));
}
