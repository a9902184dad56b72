use gemstore_core::{filter_discounted, match_desired, should_notify, DesiredItemList, ItemRecord};
use pretty_assertions::assert_eq;

fn record(name: &str, cost: &str, discounted: bool) -> ItemRecord {
    ItemRecord {
        name: name.to_string(),
        cost: cost.to_string(),
        is_discounted: discounted,
        ..ItemRecord::default()
    }
}

#[test]
fn filter_keeps_discounted_in_order() {
    let records = vec![
        record("A", "100", true),
        record("B", "200", false),
        record("C", "300", true),
        record("A", "150", true),
    ];

    let discounted = filter_discounted(&records);
    let names: Vec<_> = discounted.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(names, vec!["A", "C", "A"]);
    assert!(discounted.iter().all(|r| r.is_discounted));
}

#[test]
fn filter_on_empty_input_is_empty() {
    assert!(filter_discounted(&[]).is_empty());
}

#[test]
fn match_returns_only_desired_records() {
    let desired = DesiredItemList::new(["Hat"]);
    let discounted = vec![record("Hat", "800", true), record("Boots", "400", true)];

    let matched = match_desired(&desired, &discounted);

    assert_eq!(matched, vec![record("Hat", "800", true)]);
}

#[test]
fn match_is_case_sensitive_and_exact() {
    let desired = DesiredItemList::new(["hat", "Boots "]);
    let discounted = vec![record("Hat", "800", true), record("Boots", "400", true)];

    assert!(match_desired(&desired, &discounted).is_empty());
}

#[test]
fn match_preserves_discounted_order() {
    let desired = DesiredItemList::new(["Boots", "Hat"]);
    let discounted = vec![
        record("Hat", "800", true),
        record("Cape", "300", true),
        record("Boots", "400", true),
    ];

    let names: Vec<_> = match_desired(&desired, &discounted)
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Hat", "Boots"]);
}

#[test]
fn empty_watch_list_never_matches() {
    let discounted = vec![record("Hat", "800", true), record("UNKNOWN", "0", true)];
    assert!(match_desired(&DesiredItemList::default(), &discounted).is_empty());
}

#[test]
fn watch_list_parse_drops_comments_and_blank_lines() {
    let text = "# items I want\nHat\n\n  Boots  \n#Cape\nHat\n";
    let list = DesiredItemList::parse(text);

    assert_eq!(list.len(), 2);
    assert!(list.contains("Hat"));
    assert!(list.contains("Boots"));
    assert!(!list.contains("Cape"));
    assert!(!list.contains("# items I want"));
}

#[test]
fn watch_list_of_only_comments_is_empty() {
    assert!(DesiredItemList::parse("# nothing yet\n\n").is_empty());
}

#[test]
fn gate_suppresses_identical_timestamps() {
    for ts in ["", "2023-08-25T00:00:00Z", "not a timestamp"] {
        assert!(!should_notify(ts, Some(ts)));
    }
}

#[test]
fn gate_allows_changed_or_missing_timestamps() {
    let pairs = [
        ("2023-08-25T00:00:00Z", "2023-08-24T00:00:00Z"),
        ("2023-08-25T00:00:00Z", ""),
        ("a", "b"),
    ];
    for (current, last_seen) in pairs {
        assert!(should_notify(current, Some(last_seen)));
    }
    assert!(should_notify("2023-08-25T00:00:00Z", None));
}
