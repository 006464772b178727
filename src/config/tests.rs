#[cfg(test)]
mod tests {
    use crate::config::{Config, DocumentConfig, GenerationBackend, RetryConfig, SearchConfig};
    use crate::i18n::TargetLanguage;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn credentialed() -> Config {
        let mut config = Config::default();
        config.generation.api_key = "gen-key".to_string();
        config.search.api_key = "search-key".to_string();
        config.search.engine_id = "cx".to_string();
        config
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(!config.stand_in);
        assert!(config.output_dir.is_none());
        assert_eq!(config.language, TargetLanguage::English);
        assert_eq!(config.fact_summary_cap, 20);
        assert!(!config.verbose);
    }

    #[test]
    fn test_generation_backend_default() {
        assert_eq!(GenerationBackend::default(), GenerationBackend::Http);
    }

    #[test]
    fn test_generation_backend_from_str() {
        assert_eq!(
            "http".parse::<GenerationBackend>().unwrap(),
            GenerationBackend::Http
        );
        assert_eq!(
            "OpenAI".parse::<GenerationBackend>().unwrap(),
            GenerationBackend::OpenAI
        );
        assert_eq!(
            "gemini".parse::<GenerationBackend>().unwrap(),
            GenerationBackend::Gemini
        );
        assert_eq!(
            "ollama".parse::<GenerationBackend>().unwrap(),
            GenerationBackend::Ollama
        );

        assert!("invalid".parse::<GenerationBackend>().is_err());
    }

    #[test]
    fn test_generation_backend_display_round_trips() {
        for backend in [
            GenerationBackend::Http,
            GenerationBackend::Moonshot,
            GenerationBackend::DeepSeek,
            GenerationBackend::Mistral,
            GenerationBackend::OpenRouter,
            GenerationBackend::Anthropic,
        ] {
            assert_eq!(
                backend.to_string().parse::<GenerationBackend>().unwrap(),
                backend
            );
        }
    }

    #[test]
    fn test_retry_config_default() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_delay_ms, 1000);
        assert_eq!(retry.factor, 2.0);
    }

    #[test]
    fn test_search_and_document_defaults() {
        let search = SearchConfig::default();
        assert_eq!(search.results_per_query, 3);
        assert_eq!(search.timeout_secs, 15);
        assert!(search.endpoint.starts_with("https://"));

        let document = DocumentConfig::default();
        assert_eq!(document.font_family, "Times New Roman");
        assert_eq!(document.font_size_pt, 14);
        assert_eq!(document.line_spacing, 1.5);
        assert_eq!(document.image_width_inches, 6.0);
        assert_eq!(document.fallback_file_stem, "article");
    }

    #[test]
    fn test_from_file_partial_toml_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docsmith.toml");
        std::fs::write(
            &path,
            r#"
stand_in = true
language = "ru"
output_dir = "out"

[retry]
max_attempts = 3

[generation]
backend = "anthropic"
model = "claude-test"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.stand_in);
        assert_eq!(config.language, TargetLanguage::Russian);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.factor, 2.0);
        assert_eq!(config.generation.backend, GenerationBackend::Anthropic);
        assert_eq!(config.generation.model, "claude-test");
        assert_eq!(config.generation.plan_max_output_tokens, 800);
        assert_eq!(config.search.results_per_query, 3);
    }

    #[test]
    fn test_from_file_missing_file_fails() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/docsmith.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "stand_in = [not toml").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_resolve_output_dir() {
        let mut config = Config::default();
        assert_eq!(
            config.resolve_output_dir(),
            std::env::current_dir().unwrap()
        );

        config.output_dir = Some(PathBuf::from("/tmp/docs"));
        assert_eq!(config.resolve_output_dir(), PathBuf::from("/tmp/docs"));
    }

    #[test]
    fn test_validate_stand_in_needs_no_credentials() {
        let mut config = Config::default();
        config.stand_in = true;
        config.generation.api_key.clear();
        config.search.api_key.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_credentials() {
        let mut config = credentialed();
        assert!(config.validate().is_ok());

        config.search.engine_id.clear();
        assert!(config.validate().is_err());

        let mut config = credentialed();
        config.generation.api_key = "   ".to_string();
        assert!(config.validate().is_err());

        config.generation.backend = GenerationBackend::Ollama;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_retry_and_search_settings() {
        let mut config = credentialed();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = credentialed();
        config.retry.factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = credentialed();
        config.search.results_per_query = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_factor() {
        for factor in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut config = credentialed();
            config.retry.factor = factor;
            assert!(config.validate().is_err(), "factor {factor} accepted");
        }

        let mut config = credentialed();
        config.retry.factor = 1e20;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_fact_summary_cap_above_limit() {
        let mut config = credentialed();
        config.fact_summary_cap = 21;
        assert!(config.validate().is_err());

        config.fact_summary_cap = 20;
        assert!(config.validate().is_ok());
    }
}
