use chat_core::{Settings, SettingsPatch};
use chrono::NaiveDate;
use tempfile::tempdir;

use chat_db::Db;

fn open_db(dir: &tempfile::TempDir) -> Db {
    let mut db = Db::open(dir.path().join("chatai.sqlite")).expect("open db");
    db.migrate().expect("migrate");
    db
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
}

#[test]
fn record_usage_accumulates_per_day_and_model() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);
    let d = day("2025-08-01");

    db.record_usage_on(d, 10, 5, "model-a").expect("record");
    db.record_usage_on(d, 3, 2, "model-a").expect("record");

    let stats = db.period_stats(d).expect("stats");
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.input_tokens, 13);
    assert_eq!(stats.output_tokens, 7);
    assert_eq!(stats.total_tokens, 20);
    assert_eq!(stats.models.len(), 1);
    let model = stats.models.get("model-a").expect("model row");
    assert_eq!(model.requests, 2);
    assert_eq!(model.input_tokens, 13);
    assert_eq!(model.output_tokens, 7);
}

#[test]
fn period_stats_is_empty_for_a_day_without_records() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);

    db.record_usage_on(day("2025-08-01"), 10, 5, "model-a")
        .expect("record");

    let stats = db.period_stats(day("2025-08-02")).expect("stats");
    assert_eq!(stats.requests, 0);
    assert_eq!(stats.input_tokens, 0);
    assert_eq!(stats.output_tokens, 0);
    assert_eq!(stats.total_tokens, 0);
    assert!(stats.models.is_empty());
}

#[test]
fn all_time_stats_sum_over_days_and_group_by_model() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);

    db.record_usage_on(day("2025-08-01"), 10, 5, "model-a")
        .expect("record");
    db.record_usage_on(day("2025-08-02"), 3, 2, "model-a")
        .expect("record");
    db.record_usage_on(day("2025-08-02"), 7, 1, "model-b")
        .expect("record");

    let all = db.all_time_stats().expect("all time");
    assert_eq!(all.requests, 3);
    assert_eq!(all.input_tokens, 20);
    assert_eq!(all.output_tokens, 8);
    assert_eq!(all.total_tokens, 28);

    let a = all.models.get("model-a").expect("model-a");
    assert_eq!(a.requests, 2);
    assert_eq!(a.input_tokens, 13);
    let b = all.models.get("model-b").expect("model-b");
    assert_eq!(b.requests, 1);
    assert_eq!(b.output_tokens, 1);

    // all-time totals equal the sum of the per-day totals
    let day_sum: u64 = db
        .recorded_days()
        .expect("days")
        .into_iter()
        .map(|d| db.period_stats(d).expect("stats").total_tokens)
        .sum();
    assert_eq!(all.total_tokens, day_sum);
}

#[test]
fn record_usage_uses_todays_date() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);

    db.record_usage(4, 6, "model-a").expect("record");

    let today = chrono::Local::now().date_naive();
    let stats = db.period_stats(today).expect("stats");
    assert_eq!(stats.requests, 1);
    assert_eq!(stats.total_tokens, 10);
}

#[test]
fn recorded_days_are_sorted_and_distinct() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);

    db.record_usage_on(day("2025-08-02"), 1, 1, "m").expect("record");
    db.record_usage_on(day("2025-08-01"), 1, 1, "m").expect("record");
    db.record_usage_on(day("2025-08-02"), 1, 1, "m").expect("record");

    let days = db.recorded_days().expect("days");
    assert_eq!(days, vec![day("2025-08-01"), day("2025-08-02")]);
}

#[test]
fn settings_default_before_first_write() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);

    let settings = db.get_settings().expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_key, "");
    assert_eq!(settings.endpoint, chat_core::DEFAULT_ENDPOINT);
    assert_eq!(settings.model_id, chat_core::DEFAULT_MODEL_ID);
}

#[test]
fn settings_round_trip() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);

    let written = Settings {
        api_key: "k1".to_string(),
        endpoint: "https://e/".to_string(),
        model_id: "m1".to_string(),
    };
    db.update_settings(&written).expect("update");
    assert_eq!(db.get_settings().expect("settings"), written);

    // wholesale replace, not merge
    let replaced = Settings {
        api_key: "k2".to_string(),
        endpoint: "https://f/".to_string(),
        model_id: "m2".to_string(),
    };
    db.update_settings(&replaced).expect("update");
    assert_eq!(db.get_settings().expect("settings"), replaced);
}

#[test]
fn merge_settings_changes_only_patched_fields() {
    let dir = tempdir().expect("temp dir");
    let mut db = open_db(&dir);

    db.update_settings(&Settings {
        api_key: "k1".to_string(),
        endpoint: "https://e/".to_string(),
        model_id: "m1".to_string(),
    })
    .expect("update");

    let merged = db
        .merge_settings(&SettingsPatch {
            model_id: Some("m2".to_string()),
            ..Default::default()
        })
        .expect("merge");
    assert_eq!(merged.api_key, "k1");
    assert_eq!(merged.endpoint, "https://e/");
    assert_eq!(merged.model_id, "m2");
    assert_eq!(db.get_settings().expect("settings"), merged);
}

#[test]
fn merge_settings_on_fresh_store_starts_from_defaults() {
    let dir = tempdir().expect("temp dir");
    let mut db = open_db(&dir);

    let merged = db
        .merge_settings(&SettingsPatch {
            api_key: Some("k1".to_string()),
            ..Default::default()
        })
        .expect("merge");
    assert_eq!(merged.api_key, "k1");
    assert_eq!(merged.endpoint, chat_core::DEFAULT_ENDPOINT);
    assert_eq!(merged.model_id, chat_core::DEFAULT_MODEL_ID);
}

#[test]
fn app_setting_round_trip_and_overwrite() {
    let dir = tempdir().expect("temp dir");
    let db = open_db(&dir);

    assert_eq!(db.get_setting("marker").expect("get"), None);
    db.set_setting("marker", "1").expect("set");
    assert_eq!(db.get_setting("marker").expect("get"), Some("1".to_string()));
    db.set_setting("marker", "2").expect("set");
    assert_eq!(db.get_setting("marker").expect("get"), Some("2".to_string()));
}

#[test]
fn migrate_is_idempotent_and_close_reports_errors() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("chatai.sqlite");

    let mut db = Db::open(&path).expect("open");
    db.migrate().expect("migrate");
    db.record_usage_on(day("2025-08-01"), 1, 1, "m").expect("record");
    db.close().expect("close");

    let mut db = Db::open(&path).expect("reopen");
    db.migrate().expect("migrate again");
    let stats = db.period_stats(day("2025-08-01")).expect("stats");
    assert_eq!(stats.requests, 1);
}
