use super::*;
use crate::error::Result;
use crate::generator::research::QueryClassifier;
use crate::generator::types::{ResearchResult, StepKind};
use async_trait::async_trait;
use std::sync::Arc;
use tempfile::TempDir;

fn stand_in_config() -> Config {
    Config {
        stand_in: true,
        ..Default::default()
    }
}

/// 所有查询都当作事实查询
struct TextOnly;

impl QueryClassifier for TextOnly {
    fn classify(&self, _query: &str) -> StepKind {
        StepKind::Text
    }
}

#[test]
fn test_timing_scope_records_phases() {
    let mut timing = TimingScope::new();
    timing.start_phase(TimingKeys::PLAN);
    assert!(timing.end_phase(TimingKeys::PLAN).is_some());
    assert!(timing.end_phase(TimingKeys::RENDER).is_none());

    let millis = timing.phase_millis();
    assert_eq!(millis.len(), 1);
    assert!(millis.contains_key("plan"));
    assert!(timing.generate_timing_report().contains("plan:"));
}

#[tokio::test]
async fn test_stand_in_run_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(stand_in_config()).unwrap();

    let result = pipeline.run("Example", Some(temp_dir.path())).await.unwrap();

    assert_eq!(result.article.title, "Article: Example");
    assert_eq!(result.plan.research_steps.len(), 4);
    assert_eq!(result.collected.len(), 4);
    let images = result
        .collected
        .iter()
        .filter(|c| c.kind == StepKind::Image)
        .count();
    assert_eq!(images, 1);
    assert_eq!(result.file_path, temp_dir.path().join("Article Example.docx"));
    assert!(result.file_path.exists());
    assert!(result.image_url.is_some());
    for key in ["plan", "research", "compose", "render"] {
        assert!(result.timings.contains_key(key), "missing timing {key}");
    }
}

#[tokio::test]
async fn test_run_creates_missing_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("a").join("b");
    let pipeline = Pipeline::new(stand_in_config()).unwrap();

    let result = pipeline.run("Example", Some(&nested)).await.unwrap();
    assert!(result.file_path.starts_with(&nested));
    assert!(result.file_path.exists());
}

#[tokio::test]
async fn test_custom_classifier_is_used() {
    let temp_dir = TempDir::new().unwrap();
    let context = GeneratorContext::new(stand_in_config())
        .unwrap()
        .with_classifier(Arc::new(TextOnly));
    let pipeline = Pipeline::from_context(context);

    let result = pipeline.run("Example", Some(temp_dir.path())).await.unwrap();
    assert!(result.collected.iter().all(|c| c.kind == StepKind::Text));
    assert!(
        result
            .collected
            .iter()
            .all(|c| matches!(c.result, ResearchResult::Text { .. }))
    );
    assert!(result.image_url.is_none());
}

#[tokio::test]
async fn test_spawned_run_completes() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(stand_in_config()).unwrap();

    let handle = pipeline.spawn("Example", Some(temp_dir.path().to_path_buf()));
    let result: Result<RunResult> = handle.await.unwrap();
    assert!(result.unwrap().file_path.exists());
}

#[tokio::test]
async fn test_launch_uses_configured_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        output_dir: Some(temp_dir.path().to_path_buf()),
        ..stand_in_config()
    };

    let result = launch(&config, "Reforms: 2024!!").await.unwrap();
    assert_eq!(
        result.file_path,
        temp_dir.path().join("Article Reforms 2024.docx")
    );
}

#[tokio::test]
async fn test_launch_rejects_invalid_config() {
    let mut config = stand_in_config();
    config.retry.max_attempts = 0;
    let err = launch(&config, "Example").await.unwrap_err();
    assert!(matches!(err, DocsmithError::Config(_)));
}

#[test]
fn test_real_mode_without_credentials_still_builds_http_backend() {
    // 构建上下文不做凭据检查，检查交给 Config::validate
    let config = Config::default();
    assert!(GeneratorContext::new(config).is_ok());
}
