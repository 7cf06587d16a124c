use super::support;
use navgroup_config::ConfigError;
use navgroup_config::Direction;
use navgroup_config::SettingsEdit;
use navgroup_config::SettingsStore;
use navgroup_dom::layout;
use navgroup_engine::ClickOutcome;
use navgroup_engine::PassOutcome;
use navgroup_engine::SidebarSnapshot;
use pretty_assertions::assert_eq;

fn community_outline(dom: &navgroup_dom::MemoryDom) -> String {
    let outline = SidebarSnapshot::capture(dom).to_string();
    let start = outline
        .find("v Community plugins\n")
        .expect("community section rendered");
    outline[start..].to_string()
}

#[test]
fn new_group_takes_items_once_it_has_keywords() {
    let mut dom = support::mounted();
    let store = support::store_with(&support::settings());
    let mut organizer = support::organizer(store.clone());
    support::attach(&mut organizer, &mut dom);

    let report = support::expect_pass(
        organizer
            .apply_edit(
                &mut dom,
                SettingsEdit::AddGroup {
                    title: Some("Boards".to_string()),
                },
            )
            .expect("edit applies"),
    );
    // No keywords yet, so the group stays out of the sidebar.
    assert_eq!(report.folders, 3);
    support::settle(&mut organizer, &mut dom);

    let report = support::expect_pass(
        organizer
            .apply_edit(
                &mut dom,
                SettingsEdit::SetKeywords {
                    index: 2,
                    keywords: "kanban".to_string(),
                },
            )
            .expect("edit applies"),
    );
    assert_eq!(report.folders, 3);
    assert_eq!(
        community_outline(&dom),
        "\
v Community plugins
  [-] Time
      Tasks
      Calendar
  [-] Data
      DV *
  [-] Boards
      Kanban
"
    );
    let saved = store.load().expect("store readable").expect("settings saved");
    assert_eq!(saved.groups.len(), 3);
    assert_eq!(saved.groups[2].keywords, "kanban");
}

#[test]
fn removed_group_releases_its_items_to_ungrouped() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    support::expect_pass(
        organizer
            .apply_edit(&mut dom, SettingsEdit::RemoveGroup { index: 0 })
            .expect("edit applies"),
    );

    assert_eq!(
        community_outline(&dom),
        "\
v Community plugins
  [-] Data
      DV *
  [-] Ungrouped (3)
      Calendar
      Kanban
      Tasks
"
    );
}

#[test]
fn moving_a_group_reorders_folders() {
    let mut dom = support::mounted();
    let store = support::store_with(&support::settings());
    let mut organizer = support::organizer(store.clone());
    support::attach(&mut organizer, &mut dom);
    let saves = store.save_count();

    assert_eq!(
        organizer
            .apply_edit(
                &mut dom,
                SettingsEdit::MoveGroup {
                    index: 0,
                    direction: Direction::Up,
                },
            )
            .expect("edit applies"),
        PassOutcome::Idle
    );
    assert_eq!(store.save_count(), saves);

    support::expect_pass(
        organizer
            .apply_edit(
                &mut dom,
                SettingsEdit::MoveGroup {
                    index: 1,
                    direction: Direction::Up,
                },
            )
            .expect("edit applies"),
    );
    assert_eq!(
        community_outline(&dom),
        "\
v Community plugins
  [-] Data
      DV *
  [-] Time
      Tasks
      Calendar
  [-] Ungrouped (1)
      Kanban
"
    );
    assert_eq!(store.save_count(), saves + 1);
}

#[test]
fn renamed_group_keeps_its_collapse_state() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let time = support::summary(&dom, "Time");
    organizer.handle_click(&mut dom, time);

    support::expect_pass(
        organizer
            .apply_edit(
                &mut dom,
                SettingsEdit::RenameGroup {
                    index: 0,
                    title: "Schedule".to_string(),
                },
            )
            .expect("edit applies"),
    );

    let outline = community_outline(&dom);
    assert!(outline.contains("  [+] Schedule\n  [-] Data\n"), "{outline}");
    assert!(!organizer.settings().is_group_expanded("Schedule"));
    assert!(organizer.settings().is_group_expanded("Time"));
}

#[test]
fn alias_edit_relabels_the_proxy() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    support::expect_pass(
        organizer
            .apply_edit(
                &mut dom,
                SettingsEdit::SetItemAlias {
                    index: 0,
                    name: "Calendar".to_string(),
                    alias: Some("Cal".to_string()),
                },
            )
            .expect("edit applies"),
    );
    support::settle(&mut organizer, &mut dom);

    let calendar = layout::find_item(&dom, "Calendar").expect("Calendar exists");
    let cal = support::proxy(&dom, "Cal");
    assert_eq!(
        organizer.handle_click(&mut dom, cal),
        ClickOutcome::Forwarded(calendar)
    );
}

#[test]
fn hiding_ungrouped_takes_effect_immediately() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    let report = support::expect_pass(
        organizer
            .apply_edit(&mut dom, SettingsEdit::SetShowUngrouped { enabled: false })
            .expect("edit applies"),
    );

    assert_eq!(report.folders, 2);
    assert_eq!(report.proxies, 3);
    assert_eq!(report.hidden, 4);
    assert!(!community_outline(&dom).contains("Kanban"));
}

#[test]
fn collapse_only_edits_are_saved_without_a_pass() {
    let mut dom = support::mounted();
    let store = support::store_with(&support::settings());
    let mut organizer = support::organizer(store.clone());
    support::attach(&mut organizer, &mut dom);
    let saves = store.save_count();

    let outcome = organizer
        .apply_edit(
            &mut dom,
            SettingsEdit::SetGroupExpanded {
                title: "Data".to_string(),
                expanded: false,
            },
        )
        .expect("edit applies");

    assert_eq!(outcome, PassOutcome::Idle);
    assert_eq!(store.save_count(), saves + 1);
    assert_eq!(organizer.stats().passes, 1);
    assert!(!organizer.state().suspended);
}

#[test]
fn rejected_edits_change_nothing() {
    let mut dom = support::mounted();
    let store = support::store_with(&support::settings());
    let mut organizer = support::organizer(store.clone());
    support::attach(&mut organizer, &mut dom);
    let before = organizer.settings().clone();
    let saves = store.save_count();

    let duplicate = organizer.apply_edit(
        &mut dom,
        SettingsEdit::RenameGroup {
            index: 1,
            title: "Time".to_string(),
        },
    );
    assert!(matches!(duplicate, Err(ConfigError::DuplicateTitle(title)) if title == "Time"));

    let missing = organizer.apply_edit(&mut dom, SettingsEdit::RemoveGroup { index: 9 });
    assert!(matches!(missing, Err(ConfigError::GroupNotFound(9))));

    assert_eq!(organizer.settings(), &before);
    assert_eq!(store.save_count(), saves);
    assert_eq!(organizer.stats().passes, 1);
}
