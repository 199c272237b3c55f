use simple_cea::utils::validation::Validate;
use simple_cea::{AnalysisConfig, CeaEngine, CeaPipeline, LocalStorage};
use tempfile::TempDir;

fn config_in(temp_dir: &TempDir) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.output.output_path = temp_dir.path().to_str().unwrap().to_string();
    config.plane.width = 320;
    config.plane.height = 240;
    config
}

#[tokio::test]
async fn test_end_to_end_base_case() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    assert!(config.validate().is_ok());

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = CeaEngine::new(CeaPipeline::new(storage, config));

    let mut out = Vec::new();
    let outcome = engine.run_with_writer(&mut out, true).await.unwrap();
    let stdout = String::from_utf8(out).unwrap();

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[..5],
        [
            "Total and Discounted Cost for Intervention A: £46734.00, £46734.00",
            "Total and Discounted Cost for Intervention B: £45447.00, £45447.00",
            "Cost per QALY for Intervention A: £13090.76",
            "Cost per QALY for Intervention B: £13134.97",
            "ICER (Incremental Cost-Effectiveness Ratio): £11700.00",
        ]
    );
    assert!(stdout.contains("Decision: Intervention A is cost-effective at £20000.00 per QALY"));

    assert_eq!(outcome.artifacts.len(), 3);
    let png = std::fs::read(temp_dir.path().join("ce_plane.png")).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let csv = std::fs::read_to_string(temp_dir.path().join("cea_summary.csv")).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["Intervention", "Costs", "QALYs", "Incremental costs", "Incremental QALY", "ICER"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Intervention A");
    let icer: f64 = rows[0][5].parse().unwrap();
    assert!((icer - 11700.0).abs() < 1e-6);
    assert_eq!(&rows[1][0], "Intervention B");
    for col in 3..6 {
        assert_eq!(rows[1][col].parse::<f64>().unwrap(), 0.0);
    }
}

#[tokio::test]
async fn test_discounting_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(&temp_dir);
    config.discount.rate = 0.035;
    config.discount.horizon_years = 5.0;
    config.output.render_plane = false;

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = CeaEngine::new(CeaPipeline::new(storage, config));

    let mut out = Vec::new();
    let outcome = engine.run_with_writer(&mut out, true).await.unwrap();

    let factor = 1.035_f64.powf(5.0);
    let a = &outcome.analysis.intervention_a;
    assert_eq!(a.total_cost, 46734.0);
    assert!((a.discounted_cost - 46734.0 / factor).abs() < 1e-9);
    assert_eq!(a.qaly, 3.57);

    let expected_icer = (46734.0 - 45447.0) / factor / (3.57 - 3.46);
    assert!((outcome.analysis.comparison.icer - expected_icer).abs() < 1e-6);

    let stdout = String::from_utf8(out).unwrap();
    assert!(stdout.contains(&format!("£46734.00, £{:.2}", 46734.0 / factor)));

    assert_eq!(outcome.artifacts.len(), 2);
    assert!(!temp_dir.path().join("ce_plane.png").exists());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("artifacts");
    let mut config = config_in(&temp_dir);
    config.output.output_path = out_dir.to_str().unwrap().to_string();

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = CeaEngine::new(CeaPipeline::new(storage, config));

    let mut out = Vec::new();
    let outcome = engine.run_with_writer(&mut out, false).await.unwrap();

    assert!(outcome.artifacts.is_empty());
    assert!(!out_dir.exists());
    assert!(!out.is_empty());
}

#[tokio::test]
async fn test_equal_qalys_report_infinite_icer() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(&temp_dir);
    config.intervention_b.qaly = 3.57;
    config.output.formats = vec!["json".to_string()];

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = CeaEngine::new(CeaPipeline::new(storage, config));

    let mut out = Vec::new();
    let outcome = engine.run_with_writer(&mut out, true).await.unwrap();
    let stdout = String::from_utf8(out).unwrap();

    assert_eq!(outcome.analysis.comparison.icer, f64::INFINITY);
    assert!(stdout.contains("ICER (Incremental Cost-Effectiveness Ratio): £inf"));
    assert!(stdout.contains("is dominated by"));

    let json = std::fs::read_to_string(temp_dir.path().join("cea_summary.json")).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(rows[0]["ICER"].is_null());
    assert_eq!(rows[1]["ICER"], serde_json::json!(0.0));
    assert!(temp_dir.path().join("ce_plane.png").exists());
}

#[tokio::test]
async fn test_independent_comparisons_in_one_process() {
    let temp_dir = TempDir::new().unwrap();

    let mut first = config_in(&temp_dir);
    first.output.table_basename = "first".to_string();
    first.output.render_plane = false;

    let mut second = first.clone();
    second.output.table_basename = "second".to_string();
    second.intervention_a.base_cost = 50000.0;

    let mut sink = Vec::new();
    let first_outcome = CeaEngine::new(CeaPipeline::new(
        LocalStorage::new(first.output_path().to_string()),
        first,
    ))
    .run_with_writer(&mut sink, true)
    .await
    .unwrap();
    let second_outcome = CeaEngine::new(CeaPipeline::new(
        LocalStorage::new(second.output_path().to_string()),
        second,
    ))
    .run_with_writer(&mut sink, true)
    .await
    .unwrap();

    assert!((first_outcome.analysis.comparison.icer - 11700.0).abs() < 1e-6);
    assert!(second_outcome.analysis.comparison.icer > first_outcome.analysis.comparison.icer);
    assert!(temp_dir.path().join("first.csv").exists());
    assert!(temp_dir.path().join("second.csv").exists());
}

#[tokio::test]
async fn test_spawned_comparisons_run_concurrently() {
    let temp_dir = TempDir::new().unwrap();

    let mut handles = Vec::new();
    for (index, wtp) in [10000.0, 20000.0, 30000.0].into_iter().enumerate() {
        let mut config = config_in(&temp_dir);
        config.threshold.wtp.0 = wtp;
        config.output.render_plane = false;
        config.output.table_basename = format!("summary_{}", index);
        config.output.decision_filename = format!("decision_{}.json", index);

        let engine = CeaEngine::new(CeaPipeline::new(
            LocalStorage::new(config.output_path().to_string()),
            config,
        ));
        handles.push(tokio::spawn(async move {
            let mut out = Vec::new();
            engine.run_with_writer(&mut out, true).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap());
    }

    for outcome in &outcomes {
        assert!((outcome.analysis.comparison.icer - 11700.0).abs() < 1e-6);
    }
    assert_eq!(outcomes[0].analysis.wtp.value(), 10000.0);
    assert_eq!(outcomes[2].analysis.wtp.value(), 30000.0);

    let read_decision = |name: &str| -> serde_json::Value {
        let json = std::fs::read_to_string(temp_dir.path().join(name)).unwrap();
        serde_json::from_str(&json).unwrap()
    };
    let low = read_decision("decision_0.json");
    let high = read_decision("decision_2.json");
    assert_eq!(low["decision"], "not_cost_effective");
    assert_eq!(high["decision"], "cost_effective");
}
