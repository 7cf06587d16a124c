use super::support;
use navgroup_dom::Dom;
use navgroup_dom::layout;
use navgroup_engine::PassOutcome;
use navgroup_engine::PassReport;
use navgroup_engine::SidebarSnapshot;
use navgroup_engine::classes;
use pretty_assertions::assert_eq;

const GROUPED: &str = "\
v Options
    General
    Editor
    Core plugins
    Community plugins
v Core plugins
    Backlinks
    Daily notes
v Community plugins
  [-] Time
      Tasks
      Calendar
  [-] Data
      DV *
  [-] Ungrouped (1)
      Kanban
";

#[test]
fn first_probe_groups_the_plugin_list() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));

    let report = support::attach(&mut organizer, &mut dom);

    assert_eq!(
        report,
        PassReport {
            container: layout::find_section_items(&dom, "Community plugins"),
            folders: 3,
            proxies: 4,
            hidden: 4,
        }
    );
    assert_eq!(SidebarSnapshot::capture(&dom).to_string(), GROUPED);
}

#[test]
fn repeated_passes_leave_an_identical_sidebar() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let first = SidebarSnapshot::capture(&dom);

    for _ in 0..3 {
        support::expect_pass(organizer.recheck_and_apply(&mut dom));
        support::settle(&mut organizer, &mut dom);
    }

    assert_eq!(SidebarSnapshot::capture(&dom), first);
    assert_eq!(dom.query_all(dom.root(), classes::FOLDER).len(), 3);
    assert_eq!(dom.query_all(dom.root(), classes::PROXY).len(), 4);
}

#[test]
fn a_pass_does_not_trigger_another() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::expect_pass(organizer.on_probe_tick(&mut dom));
    assert!(organizer.pending_records(&dom) > 0);

    // Records from the pass arrive while still suspended.
    assert_eq!(organizer.on_mutations(&mut dom), PassOutcome::Idle);
    organizer.release_suppression();
    assert_eq!(organizer.on_mutations(&mut dom), PassOutcome::Idle);

    let stats = organizer.stats();
    assert_eq!(stats.passes, 1);
    assert_eq!(stats.dropped_batches, 1);
    assert_eq!(stats.rechecks_requested, 0);
}

#[test]
fn host_insertions_trigger_a_pass_but_highlighting_does_not() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    let general = layout::find_item(&dom, "General").expect("General exists");
    dom.click(general);
    assert_eq!(organizer.on_mutations(&mut dom), PassOutcome::Idle);
    assert_eq!(organizer.stats().passes, 1);

    layout::add_item(&mut dom, "Community plugins", "Day Planner").expect("section exists");
    // Not an installed plugin; the pass runs but leaves it alone.
    let report = support::expect_pass(organizer.on_mutations(&mut dom));
    assert_eq!(report.proxies, 4);
    assert_eq!(organizer.stats().passes, 2);
    assert_eq!(organizer.stats().rechecks_requested, 1);
}

#[test]
fn host_re_render_is_regrouped() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    layout::rerender_section(&mut dom, "Community plugins").expect("section exists");
    support::expect_pass(organizer.on_mutations(&mut dom));
    support::settle(&mut organizer, &mut dom);

    assert_eq!(SidebarSnapshot::capture(&dom).to_string(), GROUPED);
    // The host's fresh nodes are the ones hidden now.
    for item in dom.query_all(dom.root(), classes::HIDDEN) {
        assert!(dom.is_connected(item));
    }
    assert_eq!(dom.query_all(dom.root(), classes::HIDDEN).len(), 4);
}

#[test]
fn closing_the_sidebar_detaches_and_reopening_regroups() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    layout::unmount(&mut dom);
    assert_eq!(organizer.on_probe_tick(&mut dom), PassOutcome::Idle);
    assert!(!organizer.state().attached);
    assert_eq!(organizer.recheck_and_apply(&mut dom), PassOutcome::Idle);

    support::layout().mount(&mut dom).expect("layout mounts");
    support::attach(&mut organizer, &mut dom);
    assert_eq!(SidebarSnapshot::capture(&dom).to_string(), GROUPED);
}

#[test]
fn hiding_ungrouped_items_removes_them_entirely() {
    let mut dom = support::mounted();
    let mut settings = support::settings();
    settings.show_ungrouped = false;
    let mut organizer = support::organizer(support::store_with(&settings));
    support::attach(&mut organizer, &mut dom);

    let outline = SidebarSnapshot::capture(&dom).to_string();
    assert!(!outline.contains("Ungrouped"));
    assert!(!outline.contains("Kanban"));
    let kanban = layout::find_item(&dom, "Kanban").expect("host item stays in the tree");
    assert!(dom.has_class(kanban, classes::HIDDEN));
}
