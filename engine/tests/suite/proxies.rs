use super::support;
use navgroup_dom::Dom;
use navgroup_dom::host;
use navgroup_dom::layout;
use navgroup_engine::ClickOutcome;
use navgroup_engine::PassOutcome;
use navgroup_engine::classes;
use pretty_assertions::assert_eq;

#[test]
fn alias_proxy_forwards_to_the_named_item() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let dataview = layout::find_item(&dom, "Dataview").expect("Dataview exists");

    let dv = support::proxy(&dom, "DV");
    assert_eq!(
        organizer.handle_click(&mut dom, dv),
        ClickOutcome::Forwarded(dataview)
    );
    assert_eq!(dom.last_activation(), Some(dataview));
}

#[test]
fn proxy_follows_the_label_after_the_host_replaced_the_item() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let calendar = support::proxy(&dom, "Calendar");

    // Re-rendered, but the recheck has not happened yet.
    let fresh = layout::rerender_section(&mut dom, "Community plugins").expect("section exists");
    let fresh_calendar = fresh[0];
    assert_eq!(dom.label(fresh_calendar), "Calendar");

    assert_eq!(
        organizer.handle_click(&mut dom, calendar),
        ClickOutcome::Forwarded(fresh_calendar)
    );
    assert!(dom.has_class(fresh_calendar, host::ACTIVE));
}

#[test]
fn proxy_falls_back_to_the_node_it_was_built_from() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let original = layout::find_item(&dom, "Kanban").expect("Kanban exists");
    let kanban = support::proxy(&dom, "Kanban");

    layout::remove_item(&mut dom, "Kanban");

    assert_eq!(
        organizer.handle_click(&mut dom, kanban),
        ClickOutcome::Fallback(original)
    );
}

#[test]
fn clicking_a_proxy_moves_the_highlight_without_regrouping() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);

    let tasks = support::proxy(&dom, "Tasks");
    organizer.handle_click(&mut dom, tasks);

    let active: Vec<String> = dom
        .query_all(dom.root(), classes::PROXY)
        .into_iter()
        .filter(|proxy| dom.has_class(*proxy, host::ACTIVE))
        .map(|proxy| dom.label(proxy))
        .collect();
    assert_eq!(active, vec!["Tasks".to_string()]);
    assert_eq!(organizer.on_mutations(&mut dom), PassOutcome::Idle);
    assert_eq!(organizer.stats().passes, 1);

    // The next pass re-derives highlighting from the host item.
    support::expect_pass(organizer.recheck_and_apply(&mut dom));
    assert!(dom.has_class(support::proxy(&dom, "Tasks"), host::ACTIVE));
    assert!(!dom.has_class(support::proxy(&dom, "DV"), host::ACTIVE));
}

#[test]
fn clicks_elsewhere_reach_the_host() {
    let mut dom = support::mounted();
    let mut organizer = support::organizer(support::store_with(&support::settings()));
    support::attach(&mut organizer, &mut dom);
    let general = layout::find_item(&dom, "General").expect("General exists");

    assert_eq!(organizer.handle_click(&mut dom, general), ClickOutcome::Host);
    assert_eq!(dom.last_activation(), Some(general));
}
