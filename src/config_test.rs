use super::*;
use tempfile::TempDir;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    // Model defaults
    assert_eq!(config.model.size, ModelSize::Base);
    assert_eq!(config.model.language, "auto");

    // Audio defaults
    assert_eq!(config.audio.buffer_size, 1024);
    assert_eq!(config.audio.queue_frames, 64);

    // Segmenter defaults
    assert!((config.segmenter.silence_threshold - 0.01).abs() < f32::EPSILON);
    assert!((config.segmenter.silence_duration_secs - 1.5).abs() < f32::EPSILON);

    // Output defaults
    assert_eq!(config.output.destination, Destination::Console);
    assert!(!config.output.wait_for_enter);
}

#[test]
fn test_load_valid_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
[model]
size = "small"
language = "en"

[audio]
buffer_size = 512

[segmenter]
silence_threshold = 0.02
silence_duration_secs = 1.0

[output]
destination = "clipboard"
wait_for_enter = true
"#;

    std::fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from(&config_path).unwrap();

    assert_eq!(config.model.size, ModelSize::Small);
    assert_eq!(config.model.language, "en");
    assert_eq!(config.audio.buffer_size, 512);
    assert!((config.segmenter.silence_threshold - 0.02).abs() < f32::EPSILON);
    assert!((config.segmenter.silence_duration_secs - 1.0).abs() < f32::EPSILON);
    assert_eq!(config.output.destination, Destination::Clipboard);
    assert!(config.output.wait_for_enter);
}

#[test]
fn test_missing_config_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent.toml");

    let config = Config::load_from(&config_path).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_toml_returns_error() {
    let invalid_toml = "this is not valid { toml [";

    let result = Config::parse(invalid_toml);

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("TOML"));
}

#[test]
fn test_invalid_model_size_returns_error() {
    let toml_content = r#"
[model]
size = "not-a-real-size"
"#;

    let result = Config::parse(toml_content);
    assert!(result.is_err());
}

#[test]
fn test_partial_config_uses_defaults_for_missing() {
    let partial_toml = r#"
[model]
size = "tiny"
"#;

    let config = Config::parse(partial_toml).unwrap();

    // Specified value
    assert_eq!(config.model.size, ModelSize::Tiny);
    // Default values for unspecified fields
    assert_eq!(config.model.language, "auto");
    assert_eq!(config.output.destination, Destination::Console);
    assert_eq!(config.audio.buffer_size, 1024);
}

#[test]
fn test_config_paths() {
    // These should return valid paths on any system
    let config_dir = Config::config_dir().unwrap();
    let config_path = Config::config_path().unwrap();

    assert!(config_dir.ends_with("micscribe"));
    assert!(config_path.ends_with("config.toml"));
    assert_eq!(config_path.parent().unwrap(), config_dir);
}

#[test]
fn test_save_and_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let original = Config {
        model: ModelConfig {
            size: ModelSize::Medium,
            language: "de".to_string(),
        },
        audio: AudioConfig {
            buffer_size: 2048,
            queue_frames: 32,
        },
        segmenter: SegmenterConfig {
            silence_threshold: 0.05,
            silence_duration_secs: 2.0,
            min_segment_secs: 0.5,
            frame_ms: 20,
        },
        output: OutputConfig {
            destination: Destination::Clipboard,
            wait_for_enter: true,
        },
        logging: LoggingConfig {
            level: LogLevel::Debug,
        },
    };

    original.save_to(&config_path).unwrap();
    let loaded = Config::load_from(&config_path).unwrap();

    assert_eq!(original, loaded);
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested/dir/config.toml");

    let config = Config::default();
    config.save_to(&config_path).unwrap();

    assert!(config_path.exists());
}

#[test]
fn test_model_size_serialization() {
    let config = Config {
        model: ModelConfig {
            size: ModelSize::Large,
            ..Default::default()
        },
        ..Default::default()
    };

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("size = \"large\""));
}

#[test]
fn test_destination_serialization() {
    let config = Config {
        output: OutputConfig {
            destination: Destination::Clipboard,
            ..Default::default()
        },
        ..Default::default()
    };

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("destination = \"clipboard\""));
}

#[test]
fn test_log_level_directive() {
    assert_eq!(LogLevel::Info.as_directive(), "micscribe=info");
    assert_eq!(LogLevel::Trace.as_directive(), "micscribe=trace");
}
