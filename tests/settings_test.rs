use scribeway::presentation::config::{
    CacheSettings, Environment, LoggingSettings, ProgressSettings, RetrySettings, ServerSettings,
    Settings, SettingsError, TranscriptionSettings, UploadSettings, UpstreamSettings,
};

fn settings_with_key(api_key: &str) -> Settings {
    Settings {
        environment: Environment::Test,
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        upstream: UpstreamSettings {
            api_key: api_key.to_string(),
            base_url: "https://api.assemblyai.com".to_string(),
            max_connections: 10,
            request_timeout_secs: 600,
            poll_interval_secs: 2,
        },
        cache: CacheSettings { ttl_secs: 3600 },
        retry: RetrySettings {
            max_attempts: 3,
            initial_backoff_ms: 1000,
            max_backoff_secs: 60,
            max_elapsed_secs: 300,
        },
        upload: UploadSettings {
            max_size_mb: 500,
            chunk_size_bytes: 8192,
            temp_dir: "/tmp".to_string(),
            retain_uploads: false,
            archive_dir: "data/audio".to_string(),
        },
        progress: ProgressSettings {
            terminal_grace_secs: 3600,
        },
        transcription: TranscriptionSettings {
            default_speech_model: "slam-1".to_string(),
            allowed_speech_models: vec!["universal".to_string(), "slam-1".to_string()],
        },
        logging: LoggingSettings {
            level: "info".to_string(),
            enable_json: false,
        },
    }
}

#[test]
fn given_blank_api_key_when_validating_then_reports_missing_key() {
    let settings = settings_with_key("  ");
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::MissingApiKey)
    ));
}

#[test]
fn given_default_model_outside_allow_list_when_validating_then_rejects() {
    let mut settings = settings_with_key("key");
    settings.transcription.default_speech_model = "nano".to_string();

    assert!(matches!(
        settings.validate(),
        Err(SettingsError::UnknownDefaultModel(ref m)) if m == "nano"
    ));
}

#[test]
fn given_size_in_megabytes_when_computing_upload_ceiling_then_returns_bytes() {
    let settings = settings_with_key("key");
    assert_eq!(settings.max_upload_bytes(), 500 * 1024 * 1024);
}

#[test]
fn given_environment_names_when_parsing_then_accepts_known_values() {
    assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Prod);
    assert_eq!(" test ".parse::<Environment>().unwrap(), Environment::Test);
    assert_eq!("development".parse::<Environment>().unwrap(), Environment::Local);
    assert!(matches!(
        "staging".parse::<Environment>(),
        Err(SettingsError::UnknownEnvironment(ref e)) if e == "staging"
    ));
}

#[test]
fn given_environment_when_naming_settings_file_then_uses_profile_name() {
    assert_eq!(Environment::Prod.settings_file(), "appsettings.Prod");
    assert_eq!(Environment::default().settings_file(), "appsettings.Local");
}

#[test]
fn given_api_key_in_env_when_loading_for_profile_then_settings_report_that_profile() {
    // SAFETY: no other test in this binary reads or writes process env vars.
    unsafe { std::env::set_var("APP_UPSTREAM__API_KEY", "test-key") };

    let settings = Settings::load_for(Environment::Test).unwrap();

    assert_eq!(settings.environment, Environment::Test);
    assert_eq!(settings.upstream.api_key, "test-key");
    assert_eq!(settings.environment.to_string(), "Test");
}
