//! Tests for TOML configuration parsing.

use super::toml::{MonitorEntry, TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.settings.report_interval.is_none());
        assert!(config.monitor.is_empty());
    }

    #[test]
    fn parse_settings_section() {
        let config = TomlConfig::parse("[settings]\nreport_interval = 15\n").unwrap();
        assert_eq!(config.settings.report_interval, Some(15));
    }

    #[test]
    fn parse_monitor_entries_in_order() {
        let toml = r#"
            [[monitor]]
            start = "192.168.1.1"
            end = "192.168.1.20"
            interval = 60
            comment = "office"

            [[monitor]]
            start = "10.0.0.1"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.monitor.len(), 2);
        assert_eq!(config.monitor[0].start, "192.168.1.1");
        assert_eq!(config.monitor[0].end.as_deref(), Some("192.168.1.20"));
        assert_eq!(config.monitor[0].interval, Some(60));
        assert_eq!(config.monitor[0].comment.as_deref(), Some("office"));

        assert_eq!(config.monitor[1].start, "10.0.0.1");
        assert!(config.monitor[1].end.is_none());
        assert!(config.monitor[1].interval.is_none());
    }

    #[test]
    fn end_falls_back_to_start() {
        let entry = MonitorEntry {
            start: "10.0.0.1".to_string(),
            end: None,
            interval: None,
            comment: None,
        };
        assert_eq!(entry.end_or_start(), "10.0.0.1");
    }
}

mod errors {
    use super::*;

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            [[monitor]]
            start = "10.0.0.1"
            port = 80
        "#;
        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn reject_unknown_sections() {
        assert!(TomlConfig::parse("[webhook]\nurl = \"x\"\n").is_err());
    }

    #[test]
    fn reject_missing_start() {
        assert!(TomlConfig::parse("[[monitor]]\nend = \"10.0.0.1\"\n").is_err());
    }

    #[test]
    fn reject_wrong_types() {
        let toml = r#"
            [[monitor]]
            start = "10.0.0.1"
            interval = "thirty"
        "#;
        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn load_missing_file_fails() {
        let result = TomlConfig::load(std::path::Path::new("/nonexistent/rangewatch.toml"));
        assert!(matches!(result, Err(crate::config::ConfigError::FileRead { .. })));
    }
}

mod writing {
    use super::*;

    #[test]
    fn serialized_config_parses_back() {
        let mut config = TomlConfig::default();
        config.settings.report_interval = Some(30);
        config.monitor.push(MonitorEntry {
            start: "10.0.0.1".to_string(),
            end: Some("10.0.0.5".to_string()),
            interval: None,
            comment: Some("lab".to_string()),
        });

        let text = config.to_toml_string().unwrap();
        let parsed = TomlConfig::parse(&text).unwrap();

        assert_eq!(parsed.settings.report_interval, Some(30));
        assert_eq!(parsed.monitor, config.monitor);
        assert!(
            !text.lines().any(|line| line.starts_with("interval")),
            "unset fields are omitted: {text}"
        );
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");

        let mut config = TomlConfig::default();
        config.monitor.push(MonitorEntry {
            start: "10.0.0.1".to_string(),
            end: None,
            interval: Some(20),
            comment: None,
        });
        config.save(&path).unwrap();

        let loaded = TomlConfig::load(&path).unwrap();
        assert_eq!(loaded.monitor, config.monitor);
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_is_valid_toml() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.settings.report_interval, Some(60));
        assert_eq!(config.monitor.len(), 1);
        assert_eq!(config.monitor[0].comment.as_deref(), Some("office"));
    }
}
