//! Configuration and snapshot loading from disk.

use rollcall::config::ConfigLoader;
use rollcall::error::RosterError;
use rollcall::tooling::cli::{CliContext, Commands, ReportKind};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DIRECTORY_JSON: &str = r#"{
  "timestamp": 1717200000000,
  "data": {
    "groups": [{ "id": 1, "title": "ESAR" }],
    "members": [{
      "id": 1,
      "name": "Smith, Jane",
      "email": "Jane@kcesar.org",
      "status": { "type": "custom", "value": "Operational" },
      "custom_fields": [{ "label": "Joined Unit Date", "value": "ESAR 2018-09-01" }],
      "group_ids": [1]
    }]
  }
}"#;

const WORKSPACE_JSON: &str = r#"{
  "timestamp": 1717200000000,
  "data": {
    "users": [{
      "primaryEmail": "jane@kcesar.org",
      "name": { "givenName": "Jane", "familyName": "Smith", "fullName": "Jane Smith" },
      "orgUnitPath": "/Members"
    }],
    "memberships": []
  }
}"#;

fn write_config(dir: &Path, cache: &Path, chat_enabled: bool) -> std::path::PathBuf {
    let path = dir.join("rollcall.toml");
    let content = format!(
        r#"
[team]
name = "ESAR"
email_domain = "kcesar.org"

[[directory.status_groups]]
title = "ESAR"
current = true

[chat]
enabled = {chat_enabled}

[mapping]
enabled = false

[cache]
dir = "{cache}"
"#,
        chat_enabled = chat_enabled,
        cache = cache.display().to_string().replace('\\', "/"),
    );
    fs::write(&path, content).unwrap();
    path
}

fn write_snapshots(cache: &Path) {
    fs::create_dir_all(cache).unwrap();
    fs::write(cache.join("Directory.json"), DIRECTORY_JSON).unwrap();
    fs::write(cache.join("Workspace.json"), WORKSPACE_JSON).unwrap();
}

#[test]
fn report_from_files_on_disk() {
    let temp = TempDir::new().unwrap();
    let cache = temp.path().join("cache");
    write_snapshots(&cache);
    let config_path = write_config(temp.path(), &cache, false);

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    assert_eq!(config.directory.status_groups.len(), 1);
    let cli = CliContext::with_config(config, None).unwrap();

    let output = cli
        .execute(&Commands::Report {
            kind: ReportKind::Users,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let users = parsed["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["member"]["team_email"], "jane@kcesar.org");
    let concerns = users[0]["concerns"].as_array().unwrap();
    assert_eq!(concerns.len(), 1);
    assert_eq!(concerns[0]["platform"], "Directory");
    assert_eq!(concerns[0]["level"], "warn");
    assert_eq!(concerns[0]["concern"], "Jane@kcesar.org is not lowercase");
}

#[test]
fn enabled_source_without_snapshot_fails_the_build() {
    let temp = TempDir::new().unwrap();
    let cache = temp.path().join("cache");
    write_snapshots(&cache);
    let config_path = write_config(temp.path(), &cache, true);

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    match CliContext::with_config(config, None) {
        Err(RosterError::SourceUnavailable { platform, .. }) => assert_eq!(platform, "Chat"),
        Err(other) => panic!("Expected SourceUnavailable, got {:?}", other),
        Ok(_) => panic!("Expected SourceUnavailable"),
    }
}

#[test]
fn cache_dir_argument_overrides_config() {
    let temp = TempDir::new().unwrap();
    let configured = temp.path().join("empty");
    let actual = temp.path().join("actual");
    write_snapshots(&actual);
    let config_path = write_config(temp.path(), &configured, false);

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    let cli = CliContext::with_config(config, Some(actual)).unwrap();
    let output = cli.execute(&Commands::Members { format: "json".to_string() }).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["total"], 1);
    let platforms = parsed["members"][0]["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 2);
}
