//! Delivery routing wired to a live state actor.

use std::sync::Arc;

use vitrine::{Broadcaster, ConnectionId, ConnectionRegistry, Request, State, Verb};

use crate::helpers::{RecordingSink, body, eventually, seeded_board, segments};

fn rig() -> (Arc<ConnectionRegistry>, vitrine::StateHandle) {
    let registry = Arc::new(ConnectionRegistry::new());
    let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&registry)));
    let mut state = State::new(seeded_board());
    state.watch(broadcaster);
    (registry, state.spawn())
}

#[tokio::test]
async fn mutations_broadcast_to_every_peer() {
    let (registry, state) = rig();
    let a = RecordingSink::new(false);
    let b = RecordingSink::new(false);
    let id_a = ConnectionId::generate();
    registry.register(id_a.clone(), a.clone());
    registry.register(ConnectionId::generate(), b.clone());

    let mut request = Request::with_body(Verb::Replace, segments(&["visible"]), body("true"));
    request.originator = Some(id_a);
    state.submit(request).await.unwrap();

    eventually(|| a.sent_count() == 1 && b.sent_count() == 1).await;

    // Peers see the completed request, not just the payload.
    let message: serde_json::Value = serde_json::from_str(&a.sent()[0]).unwrap();
    assert_eq!(message["verb"], "replace");
    assert_eq!(message["response"], true);
}

#[tokio::test]
async fn fetch_replies_stay_private() {
    let (registry, state) = rig();
    let requester = RecordingSink::new(false);
    let bystander = RecordingSink::new(false);
    let requester_id = ConnectionId::generate();
    registry.register(requester_id.clone(), requester.clone());
    registry.register(ConnectionId::generate(), bystander.clone());

    let mut request = Request::new(Verb::Fetch, segments(&["integer"]));
    request.originator = Some(requester_id);
    state.submit(request).await.unwrap();

    eventually(|| requester.sent_count() == 1).await;
    assert_eq!(bystander.sent_count(), 0);

    let message: serde_json::Value = serde_json::from_str(&requester.sent()[0]).unwrap();
    assert_eq!(message["response"], 42);
}

#[tokio::test]
async fn errors_return_to_their_sender_only() {
    let (registry, state) = rig();
    let requester = RecordingSink::new(false);
    let bystander = RecordingSink::new(false);
    let requester_id = ConnectionId::generate();
    registry.register(requester_id.clone(), requester.clone());
    registry.register(ConnectionId::generate(), bystander.clone());

    let mut request = Request::new(Verb::Fetch, segments(&["missing"]));
    request.originator = Some(requester_id);
    state.submit(request).await.unwrap();

    eventually(|| requester.sent_count() == 1).await;
    assert_eq!(bystander.sent_count(), 0);

    let message: serde_json::Value = serde_json::from_str(&requester.sent()[0]).unwrap();
    assert!(
        message["error"]
            .as_str()
            .unwrap()
            .contains("field name not found")
    );
}

#[tokio::test]
async fn one_dead_peer_never_starves_the_rest() {
    let (registry, state) = rig();
    let healthy = RecordingSink::new(false);
    let broken = RecordingSink::new(true);
    let broken_id = ConnectionId::generate();
    registry.register(ConnectionId::generate(), healthy.clone());
    registry.register(broken_id.clone(), broken.clone());

    state
        .submit(Request::with_body(
            Verb::Append,
            segments(&["array"]),
            body("\"four\""),
        ))
        .await
        .unwrap();

    eventually(|| healthy.sent_count() == 1).await;

    // The broken connection is gone from the registry afterwards.
    eventually(|| registry.get(&broken_id).is_none()).await;
    assert_eq!(registry.len(), 1);
}
