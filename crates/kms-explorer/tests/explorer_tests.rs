use std::sync::Arc;

use kms_core::{
    ClickKind, Element, ElementId, ElementSource, ElementStore, ExplorerConfig, KmsError,
};
use kms_explorer::{CrumbKind, FolderHeader, FolderTree, KnowledgeTable, NavigationContext, NodeState};
use kms_ops::{KnowledgeBackend, MemoryBackend, SharedBackend};

fn id(n: u64) -> ElementId {
    ElementId::new(n)
}

fn backend() -> MemoryBackend {
    MemoryBackend::new(vec![
        Element::folder(id(1), "F1"),
        Element::folder(id(2), "sub").with_parent(id(1)),
        Element::file(id(3), "file.txt").with_parent(id(1)),
        Element::folder(id(4), "deep.v2").with_parent(id(2)),
        Element::folder(id(5), "Other"),
    ])
    .unwrap()
}

#[tokio::test]
async fn test_expand_shows_only_folder_children() {
    let backend = backend();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());
    let ctx = NavigationContext::mounted();

    tree.load_root_with(&mut store, &backend).await;
    tree.expand_with(&mut store, &backend, id(1)).await;

    let rows = tree.visible_rows(&store, &ctx);
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["F1", "sub", "Other"]);
    assert_eq!(rows[1].depth, 1);
    assert_eq!(rows[0].state, NodeState::Loaded);
    assert!(!rows[0].is_empty);

    // Both children are in the store even though only the folder is a node.
    assert_eq!(tree.node(Some(id(1))).unwrap().children(), &[id(2), id(3)]);
    assert!(store.contains(id(3)));
}

#[tokio::test]
async fn test_node_labels_drop_last_extension() {
    let backend = backend();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());

    tree.load_root_with(&mut store, &backend).await;
    tree.expand_with(&mut store, &backend, id(1)).await;
    tree.expand_with(&mut store, &backend, id(2)).await;

    let rows = tree.visible_rows(&store, &NavigationContext::mounted());
    let deep = rows.iter().find(|r| r.id == id(4)).unwrap();
    assert_eq!(deep.label, "deep");
    assert_eq!(deep.depth, 2);
    assert_eq!(deep.parent_last_siblings, vec![false, true]);
    assert!(deep.is_empty);
}

#[tokio::test]
async fn test_fetch_failure_marks_node_failed() {
    let backend = backend();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());

    // 3 is a file, so listing it fails.
    tree.expand_with(&mut store, &backend, id(3)).await;
    assert_eq!(tree.state(id(3)), NodeState::Failed);
    assert!(matches!(
        tree.node(Some(id(3))).unwrap().error(),
        Some(KmsError::Fetch { .. })
    ));
}

#[tokio::test]
async fn test_drop_moves_and_requests_refetch() {
    let backend = backend();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());
    let mut ctx = NavigationContext::mounted();

    tree.load_root_with(&mut store, &backend).await;
    tree.expand_with(&mut store, &backend, id(1)).await;

    assert!(tree.drag_enter(&store, id(5)));
    assert!(tree.node(Some(id(5))).unwrap().is_drag_over());

    tree.drop_onto(&store, &mut ctx, &backend, id(3), id(5))
        .await
        .unwrap();
    assert!(!tree.node(Some(id(5))).unwrap().is_drag_over());
    assert!(ctx.take_refetch());

    for request in tree.refresh() {
        let result = backend.list_children(request.folder).await;
        assert!(tree.complete_fetch(&mut store, request, result));
    }
    assert_eq!(tree.node(Some(id(1))).unwrap().children(), &[id(2)]);
    // The moved file no longer lingers under its old folder.
    assert!(!store.contains(id(3)));
    assert_eq!(
        backend.list_children(Some(id(5))).await.unwrap()[0].id,
        id(3)
    );
}

#[tokio::test]
async fn test_moved_folder_reloads_under_new_parent() {
    let backend = MemoryBackend::new(vec![
        Element::folder(id(1), "F1"),
        Element::folder(id(2), "S").with_parent(id(1)),
        Element::folder(id(3), "D").with_parent(id(2)),
        Element::folder(id(4), "T"),
    ])
    .unwrap();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());
    let mut ctx = NavigationContext::mounted();

    tree.load_root_with(&mut store, &backend).await;
    tree.expand_with(&mut store, &backend, id(1)).await;
    tree.expand_with(&mut store, &backend, id(2)).await;

    tree.drop_onto(&store, &mut ctx, &backend, id(2), id(4))
        .await
        .unwrap();
    assert!(ctx.take_refetch());

    // Listings may come back in any order; deepest first here.
    let mut requests = tree.refresh();
    requests.reverse();
    for request in requests {
        let result = backend.list_children(request.folder).await;
        tree.complete_fetch(&mut store, request, result);
    }
    assert!(!store.contains(id(2)));
    assert!(tree.node(Some(id(2))).is_none());
    assert!(tree.node(Some(id(3))).is_none());

    tree.expand_with(&mut store, &backend, id(4)).await;
    assert_eq!(tree.state(id(2)), NodeState::Collapsed);
    assert!(tree.expand(id(2)).is_some());
    tree.collapse(id(2));
    tree.expand_with(&mut store, &backend, id(2)).await;

    let rows: Vec<(String, NodeState)> = tree
        .visible_rows(&store, &ctx)
        .into_iter()
        .map(|r| (r.label, r.state))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("F1".to_string(), NodeState::Loaded),
            ("T".to_string(), NodeState::Loaded),
            ("S".to_string(), NodeState::Loaded),
            ("D".to_string(), NodeState::Collapsed),
        ]
    );
}

#[tokio::test]
async fn test_drop_onto_descendant_is_rejected() {
    let backend = backend();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());
    let mut ctx = NavigationContext::mounted();

    tree.load_root_with(&mut store, &backend).await;
    tree.expand_with(&mut store, &backend, id(1)).await;

    let err = tree
        .drop_onto(&store, &mut ctx, &backend, id(1), id(2))
        .await
        .unwrap_err();
    assert!(matches!(err, KmsError::InvalidDrop { .. }));

    let err = tree
        .drop_onto(&store, &mut ctx, &backend, id(1), id(1))
        .await
        .unwrap_err();
    assert!(matches!(err, KmsError::InvalidDrop { .. }));

    // Files never accept drops.
    assert!(!tree.drag_enter(&store, id(3)));
    assert!(tree.prepare_drop(&store, id(5), id(3)).is_err());

    assert!(!ctx.refetch_requested());
    assert_eq!(
        backend.list_children(Some(id(2))).await.unwrap()[0].id,
        id(4)
    );
}

#[tokio::test]
async fn test_header_follows_nested_navigation() {
    let backend = backend();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());
    let mut ctx = NavigationContext::mounted();
    let header = FolderHeader::new(&ExplorerConfig::default());

    tree.load_root_with(&mut store, &backend).await;
    tree.expand_with(&mut store, &backend, id(1)).await;
    tree.expand_with(&mut store, &backend, id(2)).await;

    tree.select_label(&store, &mut ctx, id(1)).unwrap();
    let crumbs = header.crumbs(&ctx, &store);
    assert_eq!(crumbs.len(), 2);
    assert_eq!(crumbs[0].kind, CrumbKind::Root);
    assert!(crumbs[0].chevron);
    assert_eq!(crumbs[1].label, "F1");
    assert!(crumbs[1].highlighted);

    tree.select_label(&store, &mut ctx, id(4)).unwrap();
    let crumbs = header.crumbs(&ctx, &store);
    assert_eq!(crumbs[0].kind, CrumbKind::Parent);
    assert_eq!(crumbs[0].label, "sub");
    assert_eq!(crumbs[1].label, "deep");

    header.click(&crumbs[0], &mut ctx, &store);
    assert_eq!(ctx.current_folder(), Some(id(2)));
    header.click_parent(&mut ctx, &store);
    assert_eq!(ctx.current_folder(), Some(id(1)));
    // Top level: no parent to pop to.
    header.click_parent(&mut ctx, &store);
    assert_eq!(ctx.current_folder(), Some(id(1)));

    header.click_root(&mut ctx);
    assert_eq!(ctx.current_folder(), None);
    assert!(ctx.is_exploring_native());
}

#[tokio::test]
async fn test_provider_label_click_switches_root() {
    let google = ElementSource::provider("Google");
    let backend = MemoryBackend::new(vec![
        Element::folder(id(1), "Drive").with_source(google.clone()),
        Element::folder(id(2), "Local"),
    ])
    .unwrap();
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());
    let mut ctx = NavigationContext::mounted();
    let header = FolderHeader::new(&ExplorerConfig::default());

    tree.load_root_with(&mut store, &backend).await;
    tree.select_label(&store, &mut ctx, id(1)).unwrap();
    assert!(!ctx.is_exploring_native());
    assert_eq!(ctx.explored_provider(), Some(&google));
    assert_eq!(header.crumbs(&ctx, &store)[0].label, "Google Drive");

    tree.select_label(&store, &mut ctx, id(2)).unwrap();
    assert!(ctx.is_exploring_native());
    assert_eq!(ctx.explored_provider(), None);
    assert_eq!(header.crumbs(&ctx, &store)[0].label, "Quivr");
}

#[tokio::test]
async fn test_bulk_delete_only_hits_visible_selection() {
    let backend: SharedBackend = Arc::new(
        MemoryBackend::new(vec![
            Element::file(id(1), "report.pdf"),
            Element::file(id(2), "notes.md"),
            Element::file(id(3), "report-final.pdf"),
        ])
        .unwrap(),
    );
    let mut store = ElementStore::new();
    let ids = store.ingest_listing(None, backend.list_children(None).await.unwrap());

    let mut table = KnowledgeTable::new();
    table.set_elements(ids, &store);
    table.click(0, ClickKind::Plain);
    table.click(1, ClickKind::Toggle);
    table.set_search("report", &store);
    assert_eq!(table.visible(), &[id(1), id(3)]);

    let mut ctx = NavigationContext::mounted();
    let complete = table
        .delete_selected(&mut store, &mut ctx, backend.clone())
        .await;
    assert_eq!(complete.succeeded, vec![id(1)]);
    assert!(!store.contains(id(1)));
    assert!(ctx.take_refetch());
    assert!(table.selection().is_empty());
    assert!(!table.delete_enabled());
    assert_eq!(table.visible(), &[id(3)]);

    let remaining: Vec<ElementId> = backend
        .list_children(None)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(remaining, vec![id(2), id(3)]);
}

#[tokio::test]
async fn test_deleted_folder_leaves_the_tree() {
    let backend: SharedBackend = Arc::new(
        MemoryBackend::new(vec![
            Element::folder(id(1), "A"),
            Element::folder(id(2), "inner").with_parent(id(1)),
            Element::folder(id(3), "B"),
        ])
        .unwrap(),
    );
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(&ExplorerConfig::default());
    let mut ctx = NavigationContext::mounted();
    tree.load_root_with(&mut store, backend.as_ref()).await;
    tree.expand_with(&mut store, backend.as_ref(), id(1)).await;

    let mut table = KnowledgeTable::new();
    table.set_elements(store.children(None).map(|e| e.id).collect(), &store);
    table.click(0, ClickKind::Plain);

    let complete = table
        .delete_selected(&mut store, &mut ctx, backend.clone())
        .await;
    assert_eq!(complete.succeeded, vec![id(1)]);
    assert!(!store.contains(id(1)));
    assert!(!store.contains(id(2)));
    assert_eq!(table.visible(), &[id(3)]);

    let labels: Vec<String> = tree
        .visible_rows(&store, &ctx)
        .into_iter()
        .map(|r| r.label)
        .collect();
    assert_eq!(labels, vec!["B"]);
    assert!(ctx.take_refetch());
}
