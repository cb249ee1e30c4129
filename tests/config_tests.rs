use attendsync::config::{Config, DestinationKind};
use attendsync::core::report::SaturdayRule;
use attendsync::errors::AppError;
use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn yaml_fills_in_defaults() {
    let cfg: Config = serde_yaml::from_str(
        r#"
destination:
  kind: sqlite
  database: /tmp/att.sqlite
"#,
    )
    .unwrap();

    assert_eq!(cfg.destination.kind, DestinationKind::Sqlite);
    assert_eq!(cfg.destination.database, "/tmp/att.sqlite");
    assert_eq!(cfg.source.driver, "sqlite");
    assert!(cfg.source.trusted_connection);
    assert_eq!(cfg.batch_size, 1000);
    assert_eq!(cfg.policy.ot_cutoff_hour, 18);
    assert!(cfg.validate().is_ok());
}

#[test]
fn default_destination_needs_credentials() {
    let cfg = Config::default();
    assert_eq!(cfg.destination.kind, DestinationKind::Supabase);

    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, AppError::MissingCredentials(ref m) if m.contains("SUPABASE_URL")));
}

#[test]
fn env_overrides_the_file() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[
        ("SQL_DRIVER", "sqlite"),
        ("SQL_DATABASE", "/data/clock.sqlite"),
        ("SQL_TRUSTED_CONNECTION", "no"),
        ("SQL_USERNAME", "reader"),
        ("SQL_PASSWORD", "s3cret"),
        ("SUPABASE_URL", "https://abc.supabase.co"),
        ("SUPABASE_KEY", "service-key"),
        ("ATTENDSYNC_BATCH_SIZE", "250"),
    ]));

    assert_eq!(cfg.source.database, "/data/clock.sqlite");
    assert!(!cfg.source.trusted_connection);
    assert_eq!(cfg.source.username.as_deref(), Some("reader"));
    assert_eq!(cfg.destination.url.as_deref(), Some("https://abc.supabase.co"));
    assert_eq!(cfg.destination.key.as_deref(), Some("service-key"));
    assert_eq!(cfg.batch_size, 250);
    assert!(cfg.validate().is_ok());
}

#[test]
fn vite_prefixed_names_are_a_fallback() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[
        ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
        ("VITE_SUPABASE_ANON_KEY", "anon"),
        ("SUPABASE_KEY", "preferred"),
    ]));

    assert_eq!(cfg.destination.url.as_deref(), Some("https://vite.supabase.co"));
    assert_eq!(cfg.destination.key.as_deref(), Some("preferred"));
}

#[test]
fn destination_kind_from_env() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[
        ("ATTENDSYNC_DESTINATION", "SQLite"),
        ("ATTENDSYNC_DEST_DB", "/tmp/x.sqlite"),
    ]));
    assert_eq!(cfg.destination.kind, DestinationKind::Sqlite);
    assert_eq!(cfg.destination.database, "/tmp/x.sqlite");

    // unknown values leave the kind alone
    cfg.apply_env(env(&[("ATTENDSYNC_DESTINATION", "postgres")]));
    assert_eq!(cfg.destination.kind, DestinationKind::Sqlite);
}

#[test]
fn invalid_settings_are_rejected() {
    let mut cfg = Config::default();
    cfg.destination.kind = DestinationKind::Sqlite;

    cfg.batch_size = 0;
    assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    cfg.batch_size = 10;

    cfg.source.trusted_connection = false;
    assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    cfg.source.username = Some("reader".to_string());
    assert!(cfg.validate().is_ok());

    cfg.policy.ot_cutoff_hour = 30;
    assert!(cfg.validate().is_err());
    cfg.policy.ot_cutoff_hour = 18;

    cfg.timesheet.weekday_ot_rate = -0.5;
    assert!(matches!(cfg.validate(), Err(AppError::Config(ref m)) if m.contains("weekday_ot_rate")));
}

#[test]
fn timesheet_section_overrides_rates_and_saturdays() {
    let cfg: Config = serde_yaml::from_str(
        r#"
destination:
  kind: sqlite
timesheet:
  weekend_ot_rate: 3.0
  saturdays: off
"#,
    )
    .unwrap();

    assert_eq!(cfg.timesheet.weekday_ot_rate, 1.5);
    assert_eq!(cfg.timesheet.weekend_day_rate, 2.0);
    assert_eq!(cfg.timesheet.weekend_ot_rate, 3.0);
    assert_eq!(cfg.timesheet.saturdays, SaturdayRule::Off);
    assert!(cfg.validate().is_ok());
}

#[test]
fn masked_copy_hides_secrets() {
    let mut cfg = Config::default();
    cfg.source.password = Some("s3cret".to_string());
    cfg.destination.key = Some("service-key".to_string());

    let yaml = serde_yaml::to_string(&cfg.masked()).unwrap();
    assert!(!yaml.contains("s3cret"));
    assert!(!yaml.contains("service-key"));
    assert!(yaml.contains("********"));
    assert_eq!(cfg.source.password.as_deref(), Some("s3cret"));
}

#[test]
fn save_and_load_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("attendsync.conf");

    let mut cfg = Config::default();
    cfg.destination.kind = DestinationKind::Sqlite;
    cfg.batch_size = 42;
    cfg.save(&path).unwrap();

    let mut loaded: Config =
        serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    loaded.apply_env(|_| None);
    assert_eq!(loaded, cfg);
}

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::load(Some(dir.path().join("absent.conf").as_path())).unwrap();
    assert_eq!(cfg.policy, Config::default().policy);
}
