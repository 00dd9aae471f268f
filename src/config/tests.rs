#[cfg(test)]
mod tests {
    use crate::config::Config;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.top_papers, 20);
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_config_default() {
        let config = Config::default();

        // api_key may be empty if env var is not set
        assert!(!config.llm.api_base_url.is_empty());
        assert!(!config.llm.model.is_empty());
        assert_eq!(config.llm.temperature, 0.1);
        assert_eq!(config.llm.retry_attempts, 3);
        assert_eq!(config.llm.retry_delay_ms, 3000);
        assert_eq!(config.llm.timeout_seconds, 300);
    }

    #[test]
    fn test_search_config_default() {
        let config = Config::default();

        assert_eq!(
            config.search.api_base_url,
            "https://export.arxiv.org/api/query"
        );
        assert_eq!(config.search.max_results_per_query, 100);
        assert_eq!(config.search.request_interval_ms, 3000);
        assert_eq!(config.search.timeout_seconds, 30);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = Config::default();
        config.server.port = 9000;
        config.llm.model = String::from("test-model");
        config.top_papers = 5;

        let content = toml::to_string(&config).unwrap();
        let restored: Config = toml::from_str(&content).unwrap();

        assert_eq!(restored.server.port, 9000);
        assert_eq!(restored.llm.model, "test-model");
        assert_eq!(restored.top_papers, 5);
    }

    #[test]
    fn test_config_parse_partial_fails_without_sections() {
        // 配置文件必须给出完整的段落结构，缺段视为配置错误
        let result = toml::from_str::<Config>("top_papers = 10");
        assert!(result.is_err());
    }
}
