//! Verb semantics driven end to end through the state actor.

use vitrine::{Request, Verb};

use crate::helpers::{body, seeded_board, segments, spawn_state};

#[tokio::test]
async fn walkthrough_fetch_append_remove_replace() {
    let state = spawn_state(seeded_board());

    // Fetch an element by index.
    let done = state
        .request(Request::new(Verb::Fetch, segments(&["array", "1"])))
        .await
        .unwrap();
    assert_eq!(done.response.as_ref().unwrap().get(), "\"one\"");

    // Append returns only the new element.
    let done = state
        .request(Request::with_body(
            Verb::Append,
            segments(&["array"]),
            body("\"four\""),
        ))
        .await
        .unwrap();
    assert_eq!(done.response.as_ref().unwrap().get(), "\"four\"");

    let done = state
        .request(Request::new(Verb::Fetch, segments(&["array"])))
        .await
        .unwrap();
    assert_eq!(
        done.response.as_ref().unwrap().get(),
        r#"["zero","one","two","three","four"]"#
    );

    // Remove shifts everything down and answers with no payload.
    let done = state
        .request(Request::new(Verb::Remove, segments(&["array", "0"])))
        .await
        .unwrap();
    assert!(done.error.is_none());
    assert!(done.response.is_none());

    let done = state
        .request(Request::new(Verb::Fetch, segments(&["array"])))
        .await
        .unwrap();
    assert_eq!(
        done.response.as_ref().unwrap().get(),
        r#"["one","two","three","four"]"#
    );

    // Replace echoes the new value.
    let done = state
        .request(Request::with_body(
            Verb::Replace,
            segments(&["visible"]),
            body("true"),
        ))
        .await
        .unwrap();
    assert_eq!(done.response.as_ref().unwrap().get(), "true");

    // Paths do not continue past scalars.
    let done = state
        .request(Request::new(Verb::Fetch, segments(&["visible", "extra"])))
        .await
        .unwrap();
    assert!(done.error.as_ref().unwrap().contains("path not found"));
}

#[tokio::test]
async fn external_names_shadow_declared_names() {
    let state = spawn_state(seeded_board());

    let done = state
        .request(Request::new(Verb::Fetch, segments(&["powerStatus"])))
        .await
        .unwrap();
    assert_eq!(done.response.as_ref().unwrap().get(), "\"on\"");

    // The declared name of a renamed field does not resolve.
    let done = state
        .request(Request::new(Verb::Fetch, segments(&["power_status"])))
        .await
        .unwrap();
    assert!(done.error.as_ref().unwrap().contains("field name not found"));
}

#[tokio::test]
async fn skipped_field_is_addressable_but_not_serialized() {
    let state = spawn_state(seeded_board());

    let done = state
        .request(Request::new(Verb::Fetch, segments(&["session"])))
        .await
        .unwrap();
    assert_eq!(done.response.as_ref().unwrap().get(), "\"local\"");

    // The whole-root fetch omits it.
    let done = state.request(Request::new(Verb::Fetch, vec![])).await.unwrap();
    assert!(!done.response.as_ref().unwrap().get().contains("local"));
}

#[tokio::test]
async fn fetch_of_empty_path_returns_whole_root() {
    let state = spawn_state(seeded_board());

    let done = state.request(Request::new(Verb::Fetch, vec![])).await.unwrap();
    let value: serde_json::Value =
        serde_json::from_str(done.response.as_ref().unwrap().get()).unwrap();
    assert_eq!(value["integer"], 42);
    assert_eq!(value["powerStatus"], "on");
    assert_eq!(value["array"][3], "three");
}

#[tokio::test]
async fn error_taxonomy_travels_as_descriptions() {
    let state = spawn_state(seeded_board());

    let cases: &[(Request, &str)] = &[
        (
            Request::new(Verb::Fetch, segments(&["missing"])),
            "field name not found",
        ),
        (
            Request::new(Verb::Fetch, segments(&["array", "9"])),
            "out of bounds",
        ),
        (
            Request::new(Verb::Fetch, segments(&["array", "abc"])),
            "invalid sequence index",
        ),
        (
            Request::new(Verb::Replace, segments(&["visible"])),
            "body is empty",
        ),
        (
            Request::with_body(Verb::Append, segments(&["integer"]), body("1")),
            "sequence required",
        ),
        (Request::new(Verb::Remove, vec![]), "empty path"),
    ];

    for (request, expected) in cases {
        let done = state.request(request.clone()).await.unwrap();
        let error = done.error.as_ref().unwrap();
        assert!(
            error.contains(expected),
            "expected '{expected}' in '{error}'"
        );
        assert!(done.response.is_none());
    }
}

#[tokio::test]
async fn malformed_body_leaves_the_tree_unchanged() {
    let state = spawn_state(seeded_board());

    let done = state
        .request(Request::with_body(
            Verb::Replace,
            segments(&["integer"]),
            body("\"not a number\""),
        ))
        .await
        .unwrap();
    assert!(done.error.as_ref().unwrap().contains("malformed body"));

    let done = state
        .request(Request::new(Verb::Fetch, segments(&["integer"])))
        .await
        .unwrap();
    assert_eq!(done.response.as_ref().unwrap().get(), "42");
}
