use kms_core::{
    ClickKind, Element, ElementId, ElementStore, ExplorerConfig, KnowledgeStatus, Selection,
    SortConfig, SortDirection, SortKey, filter_and_sort, select,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn abc() -> Vec<Element> {
    vec![
        Element::file(ElementId::new(1), "a"),
        Element::file(ElementId::new(2), "b"),
        Element::file(ElementId::new(3), "c"),
    ]
}

fn sample_list() -> Vec<Element> {
    vec![
        Element::file(ElementId::new(1), "Quarterly Report.pdf")
            .with_status(KnowledgeStatus::Processed),
        Element::link(ElementId::new(2), "https://docs.example.com/guide")
            .with_status(KnowledgeStatus::Uploaded),
        Element::file(ElementId::new(3), "notes.md").with_status(KnowledgeStatus::Error),
        Element::folder(ElementId::new(4), "Reports").with_status(KnowledgeStatus::Reserved),
        Element::file(ElementId::new(5), "budget.xlsx").with_status(KnowledgeStatus::Processing),
    ]
}

fn ids_of(list: &[&Element]) -> Vec<u64> {
    list.iter().map(|e| e.id.0).collect()
}

#[test]
fn test_filter_without_sort_preserves_order() {
    let list = sample_list();
    let out = filter_and_sort(&list, "REPORT", &SortConfig::default());
    assert_eq!(ids_of(&out), vec![1, 4]);

    let all = filter_and_sort(&list, "", &SortConfig::default());
    assert_eq!(ids_of(&all), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_filter_matches_url_entries() {
    let list = sample_list();
    let out = filter_and_sort(&list, "docs.example", &SortConfig::default());
    assert_eq!(ids_of(&out), vec![2]);
}

#[test]
fn test_flipped_direction_reverses_without_ties() {
    let list = sample_list();
    for key in [SortKey::Name, SortKey::Status] {
        let asc = filter_and_sort(&list, "", &SortConfig::by(key.clone(), SortDirection::Ascending));
        let desc = filter_and_sort(&list, "", &SortConfig::by(key, SortDirection::Descending));
        let mut reversed = ids_of(&asc);
        reversed.reverse();
        assert_eq!(ids_of(&desc), reversed);
    }
}

#[test]
fn test_filter_and_sort_is_idempotent() {
    let list = sample_list();
    let sort = SortConfig::by(SortKey::Name, SortDirection::Descending);
    let once = filter_and_sort(&list, "e", &sort);
    let twice = filter_and_sort(once.iter().copied(), "e", &sort);
    assert_eq!(ids_of(&once), ids_of(&twice));
}

#[test]
fn test_name_sort_ascending() {
    let list = sample_list();
    let out = filter_and_sort(&list, "", &SortConfig::by(SortKey::Name, SortDirection::Ascending));
    // Byte order: upper case before lower case.
    assert_eq!(ids_of(&out), vec![1, 4, 5, 2, 3]);
}

#[test]
fn test_plain_then_shift_selects_closed_range() {
    let list = abc();
    let visible: Vec<ElementId> = list.iter().map(|e| e.id).collect();

    let first = select(&Selection::new(), visible[0], 0, ClickKind::Plain, &visible);
    assert_eq!(first.iter().collect::<Vec<_>>(), vec![ElementId::new(1)]);

    let range = select(&first, visible[2], 2, ClickKind::Range, &visible);
    assert_eq!(range.len(), 3);
    for id in &visible {
        assert!(range.contains(*id));
    }
    assert_eq!(range.anchor(), Some(0));
}

#[test]
fn test_range_is_direction_independent() {
    let visible: Vec<ElementId> = (1..=5).map(ElementId::new).collect();

    let forward = select(
        &select(&Selection::new(), visible[1], 1, ClickKind::Plain, &visible),
        visible[3],
        3,
        ClickKind::Range,
        &visible,
    );
    let backward = select(
        &select(&Selection::new(), visible[3], 3, ClickKind::Plain, &visible),
        visible[1],
        1,
        ClickKind::Range,
        &visible,
    );

    let mut f: Vec<_> = forward.iter().collect();
    let mut b: Vec<_> = backward.iter().collect();
    f.sort();
    b.sort();
    assert_eq!(f, b);
    assert_eq!(f, visible[1..=3].to_vec());
}

#[test]
fn test_double_toggle_restores_selection() {
    let visible: Vec<ElementId> = (1..=4).map(ElementId::new).collect();
    let start = select(&Selection::new(), visible[0], 0, ClickKind::Plain, &visible);

    let on = select(&start, visible[2], 2, ClickKind::Toggle, &visible);
    assert!(on.contains(visible[2]));
    assert_eq!(on.anchor(), Some(2));

    let off = select(&on, visible[2], 2, ClickKind::Toggle, &visible);
    assert_eq!(off.iter().collect::<Vec<_>>(), start.iter().collect::<Vec<_>>());
}

#[test]
fn test_select_all_and_visible_subset() {
    let visible: Vec<ElementId> = (1..=3).map(ElementId::new).collect();
    let all = Selection::all(&visible);
    assert_eq!(all.len(), 3);
    assert_eq!(all.anchor(), None);

    let subset = all.visible_subset(&[ElementId::new(3), ElementId::new(7)]);
    assert_eq!(subset, vec![ElementId::new(3)]);
}

#[test]
fn test_store_listing_is_shared_by_id() {
    let mut store = ElementStore::new();
    let ids = store.ingest_listing(None, sample_list());
    assert_eq!(ids.len(), 5);

    let roots: Vec<u64> = store.children(None).map(|e| e.id.0).collect();
    assert_eq!(roots, vec![1, 2, 3, 4, 5]);

    store.reparent(ElementId::new(3), Some(ElementId::new(4))).unwrap();
    let inside: Vec<u64> = store.children(Some(ElementId::new(4))).map(|e| e.id.0).collect();
    assert_eq!(inside, vec![3]);
}

#[test]
fn test_config_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "cache_ttl_secs = 15\nnative_root_label = \"Library\"").unwrap();

    let config = ExplorerConfig::load_from(file.path()).unwrap();
    assert_eq!(config.cache_ttl_secs, 15);
    assert_eq!(config.native_root_label, "Library");
    assert!(config.show_status_column);
}

#[test]
fn test_config_load_rejects_bad_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "native_root_label = \"\"").unwrap();
    assert!(ExplorerConfig::load_from(file.path()).is_err());

    let mut garbage = NamedTempFile::new().unwrap();
    writeln!(garbage, "cache_ttl_secs = \"soon\"").unwrap();
    assert!(ExplorerConfig::load_from(garbage.path()).is_err());
}
