use futures::future;
use park_scene::{
    data_structures::scene_graph::SceneNode,
    flow::{Mutation, PendingLoads},
    park::{
        ParkState,
        trees::{tree_attachment, tree_sites},
    },
};

use crate::common::test_utils::{CyclingColours, FakeNode};

mod common;

fn park_state() -> ParkState {
    ParkState::with_colours(Box::new(CyclingColours::default()))
}

fn fake_tree() -> Box<dyn SceneNode> {
    Box::new(FakeNode::group(vec![Box::new(FakeNode::mesh())]))
}

/// A load that never answers.
fn stuck_load() -> Box<dyn Future<Output = Mutation<ParkState>>> {
    Box::new(future::pending::<Mutation<ParkState>>())
}

#[test]
fn should_attach_the_other_trees_when_one_load_never_completes() {
    let mut state = park_state();
    let sites = tree_sites(20.0);
    let mut pending = PendingLoads::default();

    pending.push(stuck_load());
    for site in &sites[1..] {
        let loaded = tree_attachment(*site, 10.0, Ok(fake_tree()));
        pending.push(Box::new(future::ready(loaded)));
    }

    assert_eq!(pending.apply_ready(&mut state), 3);
    assert_eq!(state.trees.len(), 3);
    let attached: Vec<_> = state.trees.iter().map(|tree| tree.site).collect();
    for site in &sites[1..] {
        assert!(attached.contains(site), "{:?} was not attached", site);
    }

    // the stuck load stays pending and later frames do not block on it
    assert_eq!(pending.len(), 1);
    assert_eq!(pending.apply_ready(&mut state), 0);
    assert_eq!(state.trees.len(), 3);
}

#[test]
fn should_apply_a_load_on_the_frame_it_finishes() {
    let mut state = park_state();
    let site = tree_sites(20.0)[0];
    let (tx, rx) = futures::channel::oneshot::channel::<()>();
    let mut pending = PendingLoads::default();
    let load: Box<dyn Future<Output = Mutation<ParkState>>> = Box::new(async move {
        let _ = rx.await;
        tree_attachment(site, 10.0, Ok(fake_tree()))
    });
    pending.extend(vec![load]);

    assert_eq!(pending.apply_ready(&mut state), 0);
    assert!(state.trees.is_empty());

    tx.send(()).expect("the load is still waiting");
    assert_eq!(pending.apply_ready(&mut state), 1);
    assert_eq!(state.trees.len(), 1);
    assert!(pending.is_empty());
}

#[test]
fn should_do_nothing_without_loads() {
    let mut state = park_state();
    let mut pending: PendingLoads<ParkState> = PendingLoads::default();
    assert_eq!(pending.apply_ready(&mut state), 0);
    assert!(state.scene.is_empty());
}
