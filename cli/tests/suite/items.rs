use super::support::fixture;
use super::support::navgroup;
use super::support::saved_settings;
use super::support::stdout_of;
use anyhow::Result;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn home_with_time_group() -> Result<TempDir> {
    let home = TempDir::new()?;
    stdout_of(
        home.path(),
        &["groups", "add", "Time", "--keywords", "cal, task"],
    )?;
    Ok(home)
}

#[test]
fn sync_lists_matching_installed_plugins() -> Result<()> {
    let home = home_with_time_group()?;
    let layout = fixture("layout.toml");
    let layout = layout.to_str().expect("fixture path is UTF-8");

    let stdout = stdout_of(home.path(), &["items", "sync", "Time", "--layout", layout])?;
    assert_eq!(stdout, "'Time' now lists 2 item(s).\n");

    let stdout = stdout_of(home.path(), &["items", "list", "Time"])?;
    assert_eq!(stdout, "1. Calendar\n2. Tasks\n");

    Ok(())
}

#[test]
fn alias_move_and_reset() -> Result<()> {
    let home = home_with_time_group()?;
    let layout = fixture("layout.toml");
    let layout = layout.to_str().expect("fixture path is UTF-8");
    stdout_of(home.path(), &["items", "sync", "Time", "--layout", layout])?;

    let stdout = stdout_of(home.path(), &["items", "alias", "Time", "Tasks", "Todo"])?;
    assert_eq!(stdout, "Updated the alias of 'Tasks' in 'Time'.\n");
    let stdout = stdout_of(home.path(), &["items", "move", "Time", "Tasks", "up"])?;
    assert_eq!(stdout, "Moved 'Tasks' in 'Time'.\n");
    let stdout = stdout_of(home.path(), &["items", "move", "Time", "Tasks", "up"])?;
    assert_eq!(stdout, "'Tasks' cannot move further.\n");

    let stdout = stdout_of(home.path(), &["items", "list", "Time"])?;
    assert_eq!(stdout, "1. Tasks -> Todo\n2. Calendar\n");
    assert_eq!(
        saved_settings(home.path())?["groups"][0]["items"],
        json!([{ "name": "Tasks", "alias": "Todo" }, { "name": "Calendar" }])
    );

    stdout_of(home.path(), &["items", "reset", "Time"])?;
    let stdout = stdout_of(home.path(), &["items", "list", "Time"])?;
    assert_eq!(stdout, "1. Calendar\n2. Tasks\n");

    Ok(())
}

#[test]
fn aliasing_an_unlisted_plugin_adds_it() -> Result<()> {
    let home = home_with_time_group()?;

    stdout_of(home.path(), &["items", "alias", "Time", "Calendar", "Cal"])?;
    let stdout = stdout_of(home.path(), &["items", "alias", "Time", "Calendar"])?;
    assert_eq!(stdout, "Cleared the alias of 'Calendar' in 'Time'.\n");

    let stdout = stdout_of(home.path(), &["items", "list", "Time", "--json"])?;
    let parsed: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(parsed, json!([{ "name": "Calendar" }]));

    Ok(())
}

#[test]
fn unknown_group_or_item_fails() -> Result<()> {
    let home = home_with_time_group()?;

    navgroup(home.path())?
        .args(["items", "list", "Data"])
        .assert()
        .failure()
        .stderr(contains("No group named 'Data' found."));
    navgroup(home.path())?
        .args(["items", "move", "Time", "Kanban", "down"])
        .assert()
        .failure()
        .stderr(contains("'Kanban' is not configured in 'Time'."));

    Ok(())
}
