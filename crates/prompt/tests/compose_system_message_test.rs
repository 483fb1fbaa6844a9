//! Tests for `prompt::compose_system_message` and speaker formatting.
//!
//! Covers the assistant fallback, persona/event embedding, determinism, and the optional user block.
//! External interactions: none (pure function tests).

use prompt::{
    compose_system_message, format_key_events, summarized_marker, with_speaker, ChatMessage,
    MessageRole, Profile, FALLBACK_SYSTEM_MESSAGE, NO_EVENTS_TEXT,
};

fn rhea() -> Profile {
    Profile::new("Rhea")
        .with_traits(["witty"])
        .with_backstory("B")
        .with_goals("G")
        .with_personality("P")
}

fn ana() -> Profile {
    Profile::new("Ana")
        .with_traits(["curious", "stubborn"])
        .with_backstory("A librarian.")
        .with_goals("Find the lost book.")
        .with_personality("Quiet.")
}

/// **Test: No assistant profile yields the fixed fallback, whatever the user profile or events.**
#[test]
fn compose_without_assistant_is_fallback() {
    let user = ana();
    let a = compose_system_message(None, None, &[] as &[&str]);
    let b = compose_system_message(None, Some(&user), &["met at the library"]);
    assert_eq!(a, ChatMessage::system(FALLBACK_SYSTEM_MESSAGE));
    assert_eq!(b, ChatMessage::system(FALLBACK_SYSTEM_MESSAGE));
}

/// **Test: Assistant, user and events are all embedded; fallback phrase absent.**
#[test]
fn compose_embeds_personas_and_events() {
    let assistant = rhea();
    let user = ana();
    let msg = compose_system_message(Some(&assistant), Some(&user), &["met at the library"]);

    assert_eq!(msg.role, MessageRole::System);
    assert!(msg.content.contains("Rhea"));
    assert!(msg.content.contains("Ana"));
    assert!(msg.content.contains("- met at the library"));
    assert!(msg.content.contains("- Traits: witty"));
    assert!(msg.content.contains("- Their traits: curious, stubborn"));
    assert!(msg.content.contains("- Their backstory: A librarian."));
    assert!(!msg.content.contains(FALLBACK_SYSTEM_MESSAGE));
}

/// **Test: Same inputs twice give identical output.**
#[test]
fn compose_is_deterministic() {
    let assistant = rhea();
    let user = ana();
    let events = vec!["one".to_string(), "two".to_string()];
    let first = compose_system_message(Some(&assistant), Some(&user), &events);
    let second = compose_system_message(Some(&assistant), Some(&user), &events);
    assert_eq!(first, second);
}

/// **Test: Missing user profile omits the context block without failing.**
#[test]
fn compose_without_user_omits_context_block() {
    let assistant = rhea();
    let msg = compose_system_message(Some(&assistant), None, &[] as &[&str]);
    assert!(msg.content.contains("You are Rhea."));
    assert!(!msg.content.contains("Your Context:"));
    assert!(!msg.content.contains("You are interacting with"));
    assert!(msg.content.contains(NO_EVENTS_TEXT));
}

/// **Test: Events keep chronological order, newline-joined with bullets.**
#[test]
fn format_key_events_in_order() {
    assert_eq!(format_key_events(&[] as &[&str]), NO_EVENTS_TEXT);
    assert_eq!(
        format_key_events(&["first", "second", "third"]),
        "- first\n- second\n- third"
    );
}

/// **Test: Trait order is preserved in the identity block.**
#[test]
fn compose_keeps_trait_order() {
    let assistant = Profile::new("Rhea").with_traits(["b", "a", "c"]);
    let msg = compose_system_message(Some(&assistant), None, &[] as &[&str]);
    assert!(msg.content.contains("- Traits: b, a, c"));
}

/// **Test: Speaker prefix is "Name:\n" and falls back to raw content.**
#[test]
fn with_speaker_prefixes_name() {
    let user = ana();
    assert_eq!(with_speaker(Some(&user), "hello"), "Ana:\nhello");
    assert_eq!(with_speaker(None, "hello"), "hello");
}

/// **Test: Summary marker names both personas and is a system message.**
#[test]
fn summarized_marker_names_personas() {
    let marker = summarized_marker("Rhea", "Ana");
    assert!(marker.is_system());
    assert_eq!(
        marker.content,
        "Previous conversation between Rhea and Ana has been summarized."
    );
}

/// **Test: Roles serialize lowercase, matching the chat API.**
#[test]
fn chat_message_serializes_lowercase_role() {
    let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
    assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    let profile: Profile = serde_json::from_str(
        r#"{"name":"Rhea","traits":["witty"],"backstory":"B","goals":"G","personality":"P"}"#,
    )
    .unwrap();
    assert_eq!(profile, rhea());
}
