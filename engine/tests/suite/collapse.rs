use super::support;
use navgroup_config::SettingsEdit;
use navgroup_config::SettingsStore;
use navgroup_dom::Dom;
use navgroup_dom::host;
use navgroup_dom::layout;
use navgroup_engine::ClickOutcome;
use navgroup_engine::PassOutcome;
use navgroup_engine::SidebarSnapshot;
use navgroup_engine::classes;
use navgroup_engine::features;
use pretty_assertions::assert_eq;

#[test]
fn folder_toggle_persists_without_regrouping() {
    let mut dom = support::mounted();
    let store = support::store_with(&support::settings());
    let mut organizer = support::organizer(store.clone());
    support::attach(&mut organizer, &mut dom);
    let saves_before = store.save_count();

    let time = support::summary(&dom, "Time");
    let outcome = organizer.handle_click(&mut dom, time);

    assert_eq!(
        outcome,
        ClickOutcome::GroupToggled {
            title: "Time".to_string(),
            open: false,
        }
    );
    assert_eq!(store.save_count(), saves_before + 1);
    let saved = store.load().expect("store readable").expect("settings saved");
    assert!(!saved.is_group_expanded("Time"));
    assert_eq!(organizer.on_mutations(&mut dom), PassOutcome::Idle);
    assert_eq!(organizer.stats().passes, 1);
}

#[test]
fn folder_state_survives_a_restart() {
    let store = support::store_with(&support::settings());
    {
        let mut dom = support::mounted();
        let mut organizer = support::organizer(store.clone());
        support::attach(&mut organizer, &mut dom);
        let ungrouped = support::summary(&dom, "Ungrouped (1)");
        organizer.handle_click(&mut dom, ungrouped);
    }

    let mut dom = support::mounted();
    let mut organizer = support::organizer(store);
    support::attach(&mut organizer, &mut dom);

    let ungrouped = dom
        .parent(support::summary(&dom, "Ungrouped (1)"))
        .expect("summary sits in a folder");
    assert!(!dom.is_open(ungrouped));
    let time = dom
        .parent(support::summary(&dom, "Time"))
        .expect("summary sits in a folder");
    assert!(dom.is_open(time));
}

#[test]
fn section_header_click_collapses_and_is_restored_on_start() {
    let store = support::store_with(&support::settings());
    {
        let mut dom = support::mounted();
        let mut organizer = support::organizer(store.clone());
        support::attach(&mut organizer, &mut dom);
        let options = support::header(&dom, "Options");
        assert_eq!(
            organizer.handle_click(&mut dom, options),
            ClickOutcome::SectionToggled {
                label: "Options".to_string(),
                collapsed: true,
            }
        );
    }

    let mut dom = support::mounted();
    let mut organizer = support::organizer(store);
    organizer.start(&mut dom);
    let snapshot = SidebarSnapshot::capture(&dom);
    assert_eq!(snapshot.section("Options").map(|s| s.collapsed), Some(true));
    assert_eq!(
        snapshot.section("Core plugins").map(|s| s.collapsed),
        Some(false)
    );
}

#[test]
fn recheck_restores_collapse_after_the_host_rebuilt_headers() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let core = support::header(&dom, "Core plugins");
    organizer.handle_click(&mut dom, core);

    // The host wipes the collapse classes when it re-renders.
    features::clear_section_collapse(&mut dom);
    support::expect_pass(organizer.recheck_and_apply(&mut dom));

    assert!(dom.has_class(support::header(&dom, "Core plugins"), host::COLLAPSED));
}

#[test]
fn headers_do_not_collapse_when_the_feature_is_off() {
    let mut dom = support::mounted();
    let mut settings = support::settings();
    settings.collapsible_headers = false;
    let mut organizer = support::organizer(support::store_with(&settings));
    support::attach(&mut organizer, &mut dom);

    let options = support::header(&dom, "Options");
    assert_eq!(organizer.handle_click(&mut dom, options), ClickOutcome::Host);
    assert!(!dom.has_class(options, host::COLLAPSED));
}

#[test]
fn disabling_collapsible_headers_expands_everything() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let options = support::header(&dom, "Options");
    organizer.handle_click(&mut dom, options);

    support::expect_pass(
        organizer
            .apply_edit(
                &mut dom,
                SettingsEdit::SetCollapsibleHeaders { enabled: false },
            )
            .expect("edit applies"),
    );

    assert_eq!(dom.query_all(dom.root(), host::COLLAPSED), Vec::new());
    // The remembered set is kept for when the feature comes back.
    assert_eq!(organizer.settings().collapsed_sections, vec!["Options"]);
}

#[test]
fn compact_mode_moves_entry_points_into_headers() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    support::expect_pass(
        organizer
            .apply_edit(&mut dom, SettingsEdit::SetCompactMode { enabled: true })
            .expect("edit applies"),
    );
    support::settle(&mut organizer, &mut dom);

    let snapshot = SidebarSnapshot::capture(&dom);
    assert_eq!(
        snapshot.section("Community plugins").map(|s| s.has_button),
        Some(true)
    );
    assert_eq!(
        snapshot.section("Core plugins").map(|s| s.has_button),
        Some(true)
    );
    assert_eq!(snapshot.section("Options").map(|s| s.has_button), Some(false));
    let outline = snapshot.to_string();
    assert!(outline.starts_with("v Options\n    General\n    Editor\nv Core plugins [manage]\n"));

    // The button opens the hidden entry point and does not collapse the header.
    let button = features::find_section_button(&dom, "Community plugins").expect("button added");
    let entry = dom
        .query_all(dom.root(), host::NAV_ITEM)
        .into_iter()
        .find(|item| dom.label(*item) == "Community plugins")
        .expect("entry point exists");
    assert!(dom.has_class(entry, classes::HIDE_NAV));
    assert_eq!(
        organizer.handle_click(&mut dom, button),
        ClickOutcome::CompactOpened(entry)
    );
    assert!(!dom.has_class(support::header(&dom, "Community plugins"), host::COLLAPSED));

    support::expect_pass(
        organizer
            .apply_edit(&mut dom, SettingsEdit::SetCompactMode { enabled: false })
            .expect("edit applies"),
    );
    assert_eq!(features::find_section_button(&dom, "Core plugins"), None);
    assert!(!dom.has_class(entry, classes::HIDE_NAV));
}

#[test]
fn compact_buttons_are_re_added_after_the_host_rebuilds_a_header() {
    let mut dom = support::mounted();
    let mut settings = support::settings();
    settings.compact_mode = true;
    let mut organizer = support::organizer(support::store_with(&settings));
    support::attach(&mut organizer, &mut dom);

    let button = features::find_section_button(&dom, "Core plugins").expect("button added");
    dom.remove(button);
    support::expect_pass(organizer.on_mutations(&mut dom));

    assert!(features::find_section_button(&dom, "Core plugins").is_some());
    assert!(layout::find_section_items(&dom, "Core plugins").is_some());
}
