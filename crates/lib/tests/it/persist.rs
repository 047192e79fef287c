//! Disk checkpointing wired to the actor.

use std::sync::Arc;

use vitrine::{FileCheckpoint, Request, State, Verb};

use crate::helpers::{body, eventually, seeded_board, segments};

#[tokio::test]
async fn every_mutation_overwrites_the_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::new(seeded_board());
    state.watch(Arc::new(FileCheckpoint::new(&path)));
    let handle = state.spawn();

    handle
        .request(Request::with_body(
            Verb::Replace,
            segments(&["visible"]),
            body("true"),
        ))
        .await
        .unwrap();

    eventually(|| path.exists()).await;
    let checkpoint = {
        let text = std::fs::read_to_string(&path).unwrap();
        serde_json::from_str::<serde_json::Value>(&text).unwrap()
    };
    assert_eq!(checkpoint["visible"], true);

    handle
        .request(Request::new(Verb::Remove, segments(&["array", "0"])))
        .await
        .unwrap();

    eventually(|| {
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
            .is_some_and(|value| value["array"][0] == "one")
    })
    .await;
}

#[tokio::test]
async fn fetches_never_touch_the_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::new(seeded_board());
    state.watch(Arc::new(FileCheckpoint::new(&path)));
    let handle = state.spawn();

    handle
        .request(Request::new(Verb::Fetch, vec![]))
        .await
        .unwrap();

    // Give the fan-out a moment; the file must still not exist.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!path.exists());
}

#[tokio::test]
async fn failed_mutations_leave_the_checkpoint_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::new(seeded_board());
    state.watch(Arc::new(FileCheckpoint::new(&path)));
    let handle = state.spawn();

    let done = handle
        .request(Request::with_body(
            Verb::Replace,
            segments(&["integer"]),
            body("\"bad\""),
        ))
        .await
        .unwrap();
    assert!(done.failed());

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!path.exists());
}
