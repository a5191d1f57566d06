use patina_core::config::RootConfig;
use patina_infrastructure::ConfigService;
use std::fs;
use tempfile::TempDir;

fn service_in(dir: &TempDir) -> ConfigService {
    ConfigService::with_path(dir.path().join("patina").join("config.toml"))
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let service = service_in(&temp_dir);

    let config = service.get_config().unwrap();
    assert_eq!(config, RootConfig::default());
    assert!(!service.path().exists());
}

#[test]
fn test_partial_file_keeps_defaults_for_the_rest() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[extractor]
model = "claude-haiku-4-5"
"#,
    )
    .unwrap();

    let config = ConfigService::with_path(&path).get_config().unwrap();
    assert_eq!(config.extractor.model, "claude-haiku-4-5");
    assert_eq!(config.extractor.max_tokens, 1024);
    assert_eq!(config.aggregation.epsilon, 1.0);
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[aggregation\nepsilon = ").unwrap();

    let err = ConfigService::with_path(&path).get_config().unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_invalid_values_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[aggregation]\nepsilon = -2.0\n").unwrap();

    let err = ConfigService::with_path(&path).get_config().unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_save_round_trips_and_creates_directories() {
    let temp_dir = TempDir::new().unwrap();
    let service = service_in(&temp_dir);

    let mut config = RootConfig::default();
    config.aggregation.near_radius = 640.0;
    service.save(&config).unwrap();
    assert!(service.path().exists());

    let fresh = ConfigService::with_path(service.path());
    assert_eq!(fresh.get_config().unwrap().aggregation.near_radius, 640.0);
}

#[test]
fn test_save_refuses_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let service = service_in(&temp_dir);

    let mut config = RootConfig::default();
    config.extractor.max_tokens = 0;
    assert!(service.save(&config).is_err());
    assert!(!service.path().exists());
}

#[test]
fn test_cache_survives_file_changes_until_invalidated() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[aggregation]\nepsilon = 5.0\n").unwrap();

    let service = ConfigService::with_path(&path);
    assert_eq!(service.get_config().unwrap().aggregation.epsilon, 5.0);

    fs::write(&path, "[aggregation]\nepsilon = 9.0\n").unwrap();
    assert_eq!(service.get_config().unwrap().aggregation.epsilon, 5.0);

    service.invalidate_cache().unwrap();
    assert_eq!(service.get_config().unwrap().aggregation.epsilon, 9.0);
}
