use gemstore_core::{parse_markup, ItemRecord, MarkupParseError};
use pretty_assertions::assert_eq;

const TWO_ENTRIES: &str = "\
{{Gem store entry
| item = Black Lion Chest Key
| availability = Permanent
| cost = 125
| qty = 1
| section = Upgrades
| subsection = [[Keys]]
}}
{{Gem store entry
| item = Mount Select License
| availability = Limited
| cost = 2000
| qty = 1
| discounted = y
| section = Mounts
| subsection = [[Mount Licenses|Licenses]]
}}
";

#[test]
fn single_block_scenario_fills_defaults() {
    let raw = "{{Gem store entry\n| item = Hat\n| cost = 800\n| discounted = y\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(
        records,
        vec![ItemRecord {
            name: "Hat".to_string(),
            cost: "800".to_string(),
            is_discounted: true,
            ..ItemRecord::default()
        }]
    );
    assert_eq!(records[0].availability, "UNKNOWN");
    assert_eq!(records[0].quantity, "1");
    assert_eq!(records[0].section, "UNKNOWN");
    assert_eq!(records[0].subsection, "UNKNOWN");
}

#[test]
fn parses_every_entry_in_page_order() {
    let records = parse_markup(TWO_ENTRIES).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Black Lion Chest Key");
    assert_eq!(records[0].availability, "Permanent");
    assert!(!records[0].is_discounted);
    assert_eq!(records[0].subsection, "Keys");
    assert_eq!(records[1].name, "Mount Select License");
    assert_eq!(records[1].cost, "2000");
    assert!(records[1].is_discounted);
    assert_eq!(records[1].section, "Mounts");
    assert_eq!(records[1].subsection, "Mount Licenses|Licenses");
}

#[test]
fn block_without_known_keys_still_yields_default_record() {
    let raw = "{{Gem store entry\n| colour = red\n| note = new this week\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records, vec![ItemRecord::default()]);
}

#[test]
fn other_templates_and_prose_are_skipped() {
    let raw = "Intro text\n{{Gem store header|Week 34}}\n{{Gem store entry\n| item = Hat\n}}\n{{Other template\n| item = Not an item\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Hat");
}

#[test]
fn tag_comparison_follows_template_name_rules() {
    let raw = "{{ gem_store_entry \n| item = Hat\n}}{{Gem Store Entry\n| item = Boots\n}}";
    let records = parse_markup(raw).unwrap();

    // First letter and underscores are insignificant, later letters are not.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Hat");
}

#[test]
fn malformed_line_is_skipped_and_block_continues() {
    let raw = "{{Gem store entry\n| item = Hat\n| this line has no delimiter\n| cost = 800\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records[0].name, "Hat");
    assert_eq!(records[0].cost, "800");
}

#[test]
fn only_first_delimiter_splits_key_and_value() {
    let raw = "{{Gem store entry\n| item = Outfit = Deluxe\n| availability = a=b\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records[0].name, "Outfit = Deluxe");
    assert_eq!(records[0].availability, "a=b");
}

#[test]
fn subsection_is_stripped_of_link_and_close_markers() {
    let raw = "{{Gem store entry\n| item = Hat\n| subsection = [[Outfits]] and [[Toys]]}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records[0].subsection, "Outfits and Toys");
    for token in ["[[", "]]", "}}", "\n"] {
        assert!(!records[0].subsection.contains(token));
    }
}

#[test]
fn subsection_never_keeps_markers_even_when_nested() {
    let raw = "{{Gem store entry\n| subsection = }[[]]}[[[x]]]\n}}";
    let records = parse_markup(raw).unwrap();
    let subsection = &records[0].subsection;

    for token in ["[[", "]]", "}}", "\n"] {
        assert!(!subsection.contains(token), "{subsection:?} contains {token:?}");
    }
}

#[test]
fn trailing_close_marker_is_removed_from_last_value() {
    let raw = "{{Gem store entry\n| item = Hat\n| discounted = y}}\n| cost = 999\n";
    let records = parse_markup(raw).unwrap();

    assert!(records[0].is_discounted);
    assert_eq!(records[0].cost, "0");
}

#[test]
fn discount_flag_accepts_common_spellings() {
    for (flag, expected) in [("y", true), ("Yes", true), ("TRUE", true), ("n", false), ("", false)] {
        let raw = format!("{{{{Gem store entry\n| discounted = {flag}\n}}}}");
        let records = parse_markup(&raw).unwrap();
        assert_eq!(records[0].is_discounted, expected, "flag {flag:?}");
    }
}

#[test]
fn repeated_names_are_preserved_in_order() {
    let raw = "{{Gem store entry\n| item = Hat\n| cost = 1\n}}{{Gem store entry\n| item = Hat\n| cost = 2\n}}";
    let records = parse_markup(raw).unwrap();

    let costs: Vec<_> = records.iter().map(|r| r.cost.as_str()).collect();
    assert_eq!(costs, vec!["1", "2"]);
}

#[test]
fn page_without_entries_is_not_an_error() {
    let records = parse_markup("Nothing on sale today.").unwrap();
    assert!(records.is_empty());
}

#[test]
fn empty_page_is_fatal() {
    assert_eq!(parse_markup(""), Err(MarkupParseError::EmptyPage));
    assert_eq!(parse_markup("  \n\t\n"), Err(MarkupParseError::EmptyPage));
}

#[test]
fn cost_and_quantity_stay_opaque() {
    let raw = "{{Gem store entry\n| item = Bundle\n| cost = 400 (800)\n| qty = 5\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records[0].cost, "400 (800)");
    assert_eq!(records[0].quantity, "5");
}

#[test]
fn block_closed_on_tag_line_yields_default_record() {
    let records = parse_markup("{{Gem store entry}}").unwrap();

    assert_eq!(records, vec![ItemRecord::default()]);
}

#[test]
fn parameter_on_tag_line_is_parsed() {
    let raw = "{{Gem store entry|item = Hat\n| cost = 800\n| discounted = y\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(
        records,
        vec![ItemRecord {
            name: "Hat".to_string(),
            cost: "800".to_string(),
            is_discounted: true,
            ..ItemRecord::default()
        }]
    );
}

#[test]
fn single_line_block_splits_parameters_outside_links() {
    let raw = "{{Gem store entry|item=Hat|cost=800|subsection=[[Outfits|Looks]]|discounted=yes}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records[0].name, "Hat");
    assert_eq!(records[0].cost, "800");
    assert_eq!(records[0].subsection, "Outfits|Looks");
    assert!(records[0].is_discounted);
}

#[test]
fn continuation_line_extends_previous_value() {
    let raw = "{{Gem store entry\n| item = Hat\n| subsection = [[A]]\n[[B]]\n| cost = 800\n}}";
    let records = parse_markup(raw).unwrap();

    assert_eq!(records[0].subsection, "AB");
    assert_eq!(records[0].cost, "800");
}
