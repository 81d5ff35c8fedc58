//! Integration tests for Error types
//!
//! Tests error construction, display, context, and load fatality.

use strongbox_foundation::{EntityId, Error, ErrorContext, ErrorKind, Privilege};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_entity_not_found() {
    let err = Error::entity_not_found(EntityId::new(0x4000_002A));
    assert!(matches!(err.kind, ErrorKind::EntityNotFound(_)));
    assert!(format!("{err}").contains("0x4000002a"));
}

#[test]
fn error_access_denied_names_both_levels() {
    let err = Error::access_denied(Privilege::Administrator, Privilege::Player);
    let msg = format!("{err}");
    assert!(msg.contains("administrator"));
    assert!(msg.contains("player"));
}

#[test]
fn access_denied_and_no_constructor_are_distinct() {
    let denied = Error::access_denied(Privilege::Seer, Privilege::Player);
    let missing = Error::no_constructor("corpse");
    assert!(matches!(denied.kind, ErrorKind::AccessDenied { .. }));
    assert!(matches!(missing.kind, ErrorKind::NoParameterlessConstructor(ref tag) if tag == "corpse"));
}

#[test]
fn error_cycle() {
    let err = Error::cycle(EntityId::new(0x4000_0001), EntityId::new(0x4000_0002));
    assert!(matches!(err.kind, ErrorKind::CycleDetected { .. }));
    assert!(format!("{err}").contains("cycle"));
}

#[test]
fn property_mismatch_message() {
    let err = Error::property_mismatch("hue", "int", "text");
    assert_eq!(format!("{err}"), "property hue: expected int, got text");
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn frames_accumulate_innermost_first() {
    let err = Error::unexpected_eof(4, 1)
        .with_frame("decoding Entity(0x40000002) (item)")
        .with_frame("loading 'world.sav'");
    let context = err.context.unwrap();
    assert_eq!(context.stack.len(), 2);
    assert!(context.stack[0].starts_with("decoding"));
}

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_source("world.sav")
        .with_entity(EntityId::new(0x4000_0001))
        .with_frame("decoding");
    let text = context.to_string();
    assert!(text.contains("in world.sav"));
    assert!(text.contains("while decoding"));
}

// =============================================================================
// Load Fatality
// =============================================================================

#[test]
fn only_loader_invariants_are_fatal() {
    assert!(Error::loader_invariant("pass order").is_fatal_for_load());
    assert!(!Error::invalid_data("bad").is_fatal_for_load());
    assert!(!Error::unknown_type("dragon").is_fatal_for_load());
}
