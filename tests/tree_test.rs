//! Tests for LabelTree path resolution, insertion and removal

use rstest::{fixture, rstest};

use rstree::util::testing::init_test_setup;
use rstree::{Index, LabelTree, SequentialIds, TreeError};

type Tree = LabelTree<Vec<&'static str>>;

#[fixture]
fn tree() -> Tree {
    init_test_setup();
    LabelTree::with_id_source(SequentialIds::new())
}

fn detached(tree: &mut Tree, label: &str) -> Index {
    let id = tree.next_id();
    tree.new_detached_node(id, label, None)
}

/// Zone1 holds SetTemperature and ActualTemperature; ActualTemperature holds
/// Current and Average.
fn heating_plant(tree: &mut Tree) {
    let root = tree.root();
    let set = detached(tree, "SetTemperature");
    let actual = detached(tree, "ActualTemperature");
    tree.insert_at_path(root, &["Machine", "Heating", "Zones", "Zone1"], [set, actual])
        .unwrap();

    let current = detached(tree, "Current");
    let average = detached(tree, "Average");
    tree.insert_at_path(
        root,
        &["Machine", "Heating", "Zones", "Zone1", "ActualTemperature"],
        [current, average],
    )
    .unwrap();
}

// ============================================================
// Construction
// ============================================================

#[rstest]
fn given_label_with_separator_when_creating_node_then_separator_is_stripped(mut tree: Tree) {
    let root = tree.root();
    let id = tree.next_id();
    let idx = tree.create_child(root, id, "/robots/", None).unwrap();

    assert_eq!(tree.get_node(idx).unwrap().label(), "robots");
    assert!(tree.resolve_path("/robots").is_some());
}

#[rstest]
#[case("")]
#[case("/")]
#[case("///")]
fn given_empty_label_when_creating_node_then_label_is_id(mut tree: Tree, #[case] label: &str) {
    let id = tree.next_id();
    let idx = tree.new_detached_node(id, label, None);

    assert_eq!(tree.get_node(idx).unwrap().label(), id.to_string());
}

#[rstest]
#[case("/robots")]
#[case("/robots/marvin/quotes")]
#[case("/Machine/Heating/Zones")]
fn given_fresh_tree_when_resolving_path_then_not_found(tree: Tree, #[case] path: &str) {
    assert!(tree.resolve_path(path).is_none());
}

// ============================================================
// Lookup
// ============================================================

#[rstest]
fn given_chained_children_when_resolving_path_then_payload_is_returned(mut tree: Tree) {
    let (a, b, c) = (tree.next_id(), tree.next_id(), tree.next_id());
    tree.root_mut()
        .create_child(a, "robots", None)
        .and_then(|n| n.create_child(b, "marvin", None))
        .and_then(|n| n.create_child(c, "quotes", Some(vec!["Robot1"])))
        .unwrap();

    let node = tree.root_ref().resolve_path("/robots/marvin/quotes").unwrap();
    assert_eq!(node.data(), Some(&vec!["Robot1"]));

    let by_tokens = tree
        .root_ref()
        .resolve_path_tokens(&["robots", "marvin", "quotes"])
        .unwrap();
    assert_eq!(by_tokens.index(), node.index());
}

#[rstest]
fn given_existing_child_when_searching_by_label_and_id_then_found(mut tree: Tree) {
    let root = tree.root();
    let id = tree.next_id();
    let robots = tree.create_child(root, id, "robots", None).unwrap();

    assert_eq!(tree.find_child_by_label(root, "robots"), Some(robots));
    assert_eq!(tree.find_child_by_id(root, id), Some(robots));
    let other = tree.next_id();
    assert_eq!(tree.find_child_by_id(root, other), None);
    assert_eq!(tree.find_child_by_label(root, "movies"), None);
}

#[rstest]
fn given_duplicate_sibling_labels_when_resolving_then_first_match_wins(mut tree: Tree) {
    let root = tree.root();
    let id = tree.next_id();
    let first = tree.create_child(root, id, "twin", Some(vec!["first"])).unwrap();
    let id = tree.next_id();
    tree.create_child(root, id, "twin", Some(vec!["second"])).unwrap();

    assert_eq!(tree.resolve_path("/twin"), Some(first));
    assert_eq!(
        tree.find_children_matching(root, |n| n.label() == "twin", 0).len(),
        2
    );
}

#[rstest]
#[case("robots/marvin")]
#[case("")]
#[case("/robots//marvin")]
#[case("/robots/marvin/")]
fn given_malformed_path_when_resolving_then_not_found(mut tree: Tree, #[case] path: &str) {
    let root = tree.root();
    let marvin = detached(&mut tree, "marvin");
    tree.insert_at_path(root, &["robots"], [marvin]).unwrap();

    assert!(tree.resolve_path(path).is_none());
    assert_eq!(tree.resolve_path("/robots/marvin"), Some(marvin));
}

#[rstest]
fn given_bare_separator_when_resolving_then_start_node(mut tree: Tree) {
    heating_plant(&mut tree);
    let zones = tree.resolve_path("/Machine/Heating/Zones").unwrap();

    assert_eq!(tree.resolve_path("/"), Some(tree.root()));
    assert_eq!(tree.resolve_path_from(zones, "/"), Some(zones));
    assert_eq!(
        tree.resolve_path_from(zones, "/Zone1/SetTemperature"),
        tree.resolve_path("/Machine/Heating/Zones/Zone1/SetTemperature")
    );
}

// ============================================================
// InsertAtPath
// ============================================================

#[rstest]
fn given_empty_tree_when_inserting_at_path_then_nodes_resolve(mut tree: Tree) {
    let root = tree.root();
    let set = detached(&mut tree, "SetTemperature");
    let actual = detached(&mut tree, "ActualTemperature");
    tree.insert_at_path(root, &["Machine", "Heating", "Zones", "Zone1"], [set, actual])
        .unwrap();

    assert_eq!(
        tree.resolve_path("/Machine/Heating/Zones/Zone1/SetTemperature"),
        Some(set)
    );
    let zones = tree.root_ref().resolve_path("/Machine/Heating/Zones").unwrap();
    let children: Vec<&str> = zones.children().map(|c| c.label()).collect();
    assert_eq!(children, vec!["Zone1"]);
}

#[rstest]
fn given_same_path_twice_when_inserting_then_intermediates_are_shared(mut tree: Tree) {
    let root = tree.root();
    let path = ["Machine", "Heating", "Zones", "Zone1"];
    let a = detached(&mut tree, "SetTemperature");
    tree.insert_at_path(root, &path, [a]).unwrap();
    let b = detached(&mut tree, "ActualTemperature");
    tree.insert_at_path(root, &path, [b]).unwrap();

    for prefix in ["/Machine", "/Machine/Heating", "/Machine/Heating/Zones"] {
        let node = tree.root_ref().resolve_path(prefix).unwrap();
        assert_eq!(node.child_count(), 1, "{prefix} should keep one child");
    }
    let zone1 = tree.root_ref().resolve_path("/Machine/Heating/Zones/Zone1").unwrap();
    assert_eq!(zone1.child_count(), 2);
}

#[rstest]
fn given_sibling_zones_when_inserting_then_both_branches_exist(mut tree: Tree) {
    let root = tree.root();
    for zone in ["Zone1", "Zone2"] {
        let set = detached(&mut tree, "SetTemperature");
        let actual = detached(&mut tree, "ActualTemperature");
        tree.insert_at_path(root, &["Machine", "Heating", "Zones", zone], [set, actual])
            .unwrap();
    }

    assert!(tree
        .resolve_path("/Machine/Heating/Zones/Zone2/SetTemperature")
        .is_some());
    let zones = tree.root_ref().resolve_path("/Machine/Heating/Zones").unwrap();
    assert_eq!(zones.child_count(), 2);
}

#[rstest]
fn given_same_nodes_by_label_when_inserting_twice_then_children_accumulate(mut tree: Tree) {
    let root = tree.root();
    let first = detached(&mut tree, "Value");
    tree.insert_at_path(root, &["a"], [first]).unwrap();
    let second = detached(&mut tree, "Value");
    tree.insert_at_path(root, &["a"], [second]).unwrap();

    let a = tree.resolve_path("/a").unwrap();
    assert_eq!(tree.get_node(a).unwrap().children(), &[first, second]);
}

#[rstest]
fn given_empty_path_when_inserting_then_nodes_attach_to_start(mut tree: Tree) {
    let root = tree.root();
    let top = detached(&mut tree, "top");
    let target = tree.insert_at_path::<&str>(root, &[], [top]).unwrap();

    assert_eq!(target, root);
    assert_eq!(tree.resolve_path("/top"), Some(top));
}

#[rstest]
fn given_attached_node_when_inserting_elsewhere_then_error(mut tree: Tree) {
    let root = tree.root();
    let leaf = detached(&mut tree, "leaf");
    tree.insert_at_path(root, &["a"], [leaf]).unwrap();

    let err = tree.insert_at_path(root, &["b"], [leaf]).unwrap_err();
    assert!(matches!(err, TreeError::AlreadyAttached { .. }));
    assert!(tree.resolve_path("/b").is_none());
}

// ============================================================
// Destroy
// ============================================================

#[rstest]
fn given_leaves_when_destroying_then_parent_keeps_no_children(mut tree: Tree) {
    heating_plant(&mut tree);
    let actual = tree
        .resolve_path("/Machine/Heating/Zones/Zone1/ActualTemperature")
        .unwrap();
    assert_eq!(tree.get_node(actual).unwrap().children().len(), 2);

    for leaf in ["Average", "Current"] {
        let path = format!("/Machine/Heating/Zones/Zone1/ActualTemperature/{leaf}");
        let node = tree.resolve_path(&path).unwrap();
        let before = tree.get_node(actual).unwrap().children().len();
        assert!(tree.destroy(node));
        assert_eq!(tree.get_node(actual).unwrap().children().len(), before - 1);
        assert!(tree.resolve_path(&path).is_none());
    }

    assert!(tree.get_node(actual).unwrap().is_leaf());
}

#[rstest]
fn given_internal_node_when_destroying_then_subtree_is_gone(mut tree: Tree) {
    heating_plant(&mut tree);
    let before = tree.node_count();
    let zone1 = tree.resolve_path("/Machine/Heating/Zones/Zone1").unwrap();

    assert!(tree.destroy(zone1));
    for path in [
        "/Machine/Heating/Zones/Zone1",
        "/Machine/Heating/Zones/Zone1/SetTemperature",
        "/Machine/Heating/Zones/Zone1/ActualTemperature/Current",
    ] {
        assert!(tree.resolve_path(path).is_none(), "{path} should be gone");
    }
    assert_eq!(tree.node_count(), before - 5);
    assert!(tree.resolve_path("/Machine/Heating/Zones").is_some());
}

#[rstest]
fn given_root_when_destroying_then_refused_and_tree_unchanged(mut tree: Tree) {
    heating_plant(&mut tree);
    let before = tree.render();

    assert!(!tree.destroy(tree.root()));
    assert!(!tree.root_mut().destroy());
    assert_eq!(tree.render(), before);
}

#[rstest]
fn given_plant_when_rendering_then_every_node_has_a_line(mut tree: Tree) {
    heating_plant(&mut tree);
    let out = tree.render();

    assert_eq!(out.lines().count(), tree.node_count());
    assert!(out.lines().any(|l| l.contains("Average [")));
    assert_eq!(
        tree.leaf_paths(),
        vec![
            "/Machine/Heating/Zones/Zone1/SetTemperature",
            "/Machine/Heating/Zones/Zone1/ActualTemperature/Current",
            "/Machine/Heating/Zones/Zone1/ActualTemperature/Average",
        ]
    );
}

// ============================================================
// Depth
// ============================================================

const DEEP: usize = 50_000;

#[rstest]
fn given_very_deep_path_when_walking_then_every_operation_completes(mut tree: Tree) {
    let root = tree.root();
    let segments = vec!["a"; DEEP];
    let leaf = detached(&mut tree, "leaf");
    tree.insert_at_path(root, &segments, [leaf]).unwrap();

    let path = format!("{}/leaf", "/a".repeat(DEEP));
    assert_eq!(tree.resolve_path(&path), Some(leaf));
    assert_eq!(tree.path_of(leaf).as_deref(), Some(path.as_str()));
    assert_eq!(tree.depth(), DEEP + 2);
    assert_eq!(tree.node_count(), DEEP + 2);
    assert_eq!(tree.leaf_paths(), vec![path.clone()]);

    let json = tree.to_json_compact().unwrap();
    assert_eq!(json.matches("\"label\":\"a\"").count(), DEEP);
    let closing = format!("[]}}{}}}", "]}".repeat(DEEP + 1));
    assert!(json.ends_with(&closing));

    let top = tree.resolve_path("/a").unwrap();
    assert!(tree.destroy(top));
    assert_eq!(tree.node_count(), 1);
    assert!(tree.resolve_path(&path).is_none());
}

#[rstest]
fn given_deep_path_when_rendering_then_one_line_per_level(mut tree: Tree) {
    // Drawing indents every level, so the text grows quadratically.
    let levels = 2_000;
    let root = tree.root();
    let leaf = detached(&mut tree, "leaf");
    tree.insert_at_path(root, &vec!["a"; levels], [leaf]).unwrap();

    let out = tree.render();
    assert_eq!(out.lines().count(), levels + 2);
    let last = out.lines().last().unwrap();
    assert!(last.trim_start().starts_with("└── leaf ["), "got: {last}");

    let node = tree.node(leaf).unwrap();
    assert!(node.to_json().unwrap().contains("\"label\": \"leaf\""));
}
