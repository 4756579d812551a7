use std::collections::HashSet;

use referral_network::{build_tree, Member, Navigator};

mod common;
use common::heap_network;

#[test]
fn rebuilds_produce_identical_trees() {
    let members = heap_network(200);

    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let tree = build_tree(&members[0], &members);
        fingerprints.insert(tree.fingerprint());
    }

    assert_eq!(fingerprints.len(), 1, "trees diverged across rebuilds");
}

#[test]
fn snapshot_change_invalidates_navigator_state() {
    let mut members = heap_network(31);
    let tree = build_tree(&members[0], &members);

    let mut nav = Navigator::new(&tree);
    assert!(nav.descend_to("2"));
    assert!(nav.descend_to("5"));
    let state = nav.state();

    let same = build_tree(&members[0], &members);
    let restored = Navigator::restore(&same, &state);
    assert_eq!(restored.current().id, "5");
    assert_eq!(restored.depth(), 2);

    members.push(Member::new("32", "Late joiner").with_sponsor("C16"));
    let changed = build_tree(&members[0], &members);
    assert_ne!(changed.fingerprint(), tree.fingerprint());
    let reset = Navigator::restore(&changed, &state);
    assert_eq!(reset.current().id, "1");
    assert_eq!(reset.depth(), 0);
}
