use super::support::fixture;
use super::support::navgroup;
use super::support::stdout_of;
use anyhow::Result;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;
use serde_json::json;
use tempfile::TempDir;

const HOST_SECTIONS: &str = "\
v Options
    General
    Editor
    Core plugins
    Community plugins
v Core plugins
    Backlinks
    Daily notes
";

fn layout_arg() -> String {
    fixture("layout.toml").to_string_lossy().into_owned()
}

#[test]
fn without_rules_every_plugin_is_ungrouped() -> Result<()> {
    let home = TempDir::new()?;

    let stdout = stdout_of(home.path(), &["preview", "--layout", &layout_arg()])?;
    assert_eq!(
        stdout,
        format!(
            "{HOST_SECTIONS}\
v Community plugins
  [-] Ungrouped (4)
      Calendar
      Dataview *
      Kanban
      Tasks
"
        )
    );

    Ok(())
}

#[test]
fn rules_and_aliases_shape_the_folders() -> Result<()> {
    let home = TempDir::new()?;
    stdout_of(
        home.path(),
        &["groups", "add", "Time", "--keywords", "cal, task"],
    )?;
    stdout_of(home.path(), &["items", "alias", "Time", "Tasks", "Todo"])?;

    let stdout = stdout_of(home.path(), &["preview", "--layout", &layout_arg()])?;
    assert_eq!(
        stdout,
        format!(
            "{HOST_SECTIONS}\
v Community plugins
  [-] Time
      Todo
      Calendar
  [-] Ungrouped (2)
      Dataview *
      Kanban
"
        )
    );

    Ok(())
}

#[test]
fn clicked_folders_stay_closed() -> Result<()> {
    let home = TempDir::new()?;
    stdout_of(
        home.path(),
        &["groups", "add", "Time", "--keywords", "cal, task"],
    )?;
    let layout = layout_arg();

    let stdout = stdout_of(home.path(), &["preview", "--layout", &layout, "--click", "Time"])?;
    assert!(stdout.contains("  [+] Time\n  [-] Ungrouped (2)\n"), "{stdout}");

    let stdout = stdout_of(home.path(), &["preview", "--layout", &layout])?;
    assert!(stdout.contains("  [+] Time\n"), "{stdout}");

    let stdout = stdout_of(
        home.path(),
        &["preview", "--layout", &layout, "--click", "Options"],
    )?;
    assert!(stdout.starts_with("> Options\nv Core plugins\n"), "{stdout}");

    Ok(())
}

#[test]
fn json_output_describes_folders() -> Result<()> {
    let home = TempDir::new()?;
    stdout_of(home.path(), &["groups", "add", "Data", "--keywords", "data"])?;

    let stdout = stdout_of(home.path(), &["preview", "--layout", &layout_arg(), "--json"])?;
    let parsed: JsonValue = serde_json::from_str(&stdout)?;
    let community = &parsed["sections"][2];
    assert_eq!(community["title"], json!("Community plugins"));
    assert_eq!(
        community["entries"][0],
        json!({
            "kind": "group",
            "header": "Data",
            "open": true,
            "items": [{ "label": "Dataview", "active": true }],
        })
    );
    assert_eq!(community["entries"][1]["header"], json!("Ungrouped (3)"));

    Ok(())
}

#[test]
fn missing_layout_is_reported() -> Result<()> {
    let home = TempDir::new()?;

    navgroup(home.path())?
        .args(["preview", "--layout", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(contains("failed to read layout"));

    Ok(())
}
