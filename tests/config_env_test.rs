//! Environment overrides live in their own test binary: the variables are
//! process-wide and would leak into the other config tests.

use std::fs;

use tempfile::TempDir;

use topictree::config::Settings;
use topictree::domain::TitleScope;

#[test]
fn given_env_override_when_loading_then_beats_config_files() {
    let temp_dir = TempDir::new().unwrap();
    let local = temp_dir.path().join("local.toml");
    fs::write(
        &local,
        r#"
data_file = "/srv/topics/local.xml"
title_scope = "siblings"
"#,
    )
    .unwrap();

    std::env::set_var("TOPICTREE_TITLE_SCOPE", "tree");
    std::env::set_var("TOPICTREE_DATA_FILE", "/srv/topics/env.xml");
    let loaded = Settings::load_layers(None, Some(&local));
    std::env::set_var("TOPICTREE_TITLE_SCOPE", "galaxy");
    let rejected = Settings::load_layers(None, Some(&local));
    std::env::remove_var("TOPICTREE_TITLE_SCOPE");
    std::env::remove_var("TOPICTREE_DATA_FILE");

    let settings = loaded.unwrap();
    assert_eq!(settings.title_scope, TitleScope::Tree);
    assert_eq!(settings.data_file.to_string_lossy(), "/srv/topics/env.xml");
    assert!(rejected.is_err());
}
