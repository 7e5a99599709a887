mod common;

use notifications_ms::events::consumer::{handle_add_notification, AckAction, AckMode, HandleOutcome};
use notifications_ms::models::{CreateNotification, NotificationType};
use notifications_shared::errors::AppError;

use common::TestContext;

#[test]
fn test_valid_payload_is_persisted_and_readable() {
    let ctx = TestContext::new();

    let outcome = handle_add_notification(
        &ctx.service,
        br#"{"message":"Someone liked your post","userAuth0ID":"auth0id","notificationType":2}"#,
    );

    let HandleOutcome::Persisted(stored) = outcome else {
        panic!("expected persisted outcome, got {outcome:?}");
    };
    assert_eq!(stored.notification_type, NotificationType::Like);

    let found = ctx.service.get_notifications("auth0id");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, stored.id);
    assert_eq!(found[0].message, "Someone liked your post");
}

#[test]
fn test_each_missing_field_is_rejected_without_storing() {
    let ctx = TestContext::new();
    let bodies: [&[u8]; 3] = [
        br#"{"userAuth0ID":"auth0","notificationType":3}"#,
        br#"{"message":"Test message","notificationType":3}"#,
        br#"{"message":"Test message","userAuth0ID":"auth0"}"#,
    ];

    for body in bodies {
        let outcome = handle_add_notification(&ctx.service, body);
        assert!(matches!(outcome, HandleOutcome::Rejected(_)), "{outcome:?}");
    }

    assert!(ctx.repository.is_empty());
}

#[test]
fn test_malformed_payload_is_rejected_without_storing() {
    let ctx = TestContext::new();
    let bodies: [&[u8]; 3] = [
        b"not json",
        br#"{"message":"m","userAuth0ID":"auth0|1","notificationType":"like"}"#,
        br#"{"message":"m","userAuth0ID":"auth0|1","notificationType":7}"#,
    ];

    for body in bodies {
        let outcome = handle_add_notification(&ctx.service, body);
        assert!(matches!(outcome, HandleOutcome::Rejected(_)), "{outcome:?}");
        assert_eq!(
            AckMode::Manual.action_for(&outcome, false),
            AckAction::Reject { requeue: false }
        );
    }

    assert!(ctx.repository.is_empty());
}

#[test]
fn test_round_trip_preserves_payload_fields() {
    let ctx = TestContext::new();
    let payload = CreateNotification {
        message: "Test message".into(),
        user_auth0_id: "auth0Id1".into(),
        notification_type: Some(NotificationType::Follow),
    };
    let body = serde_json::to_vec(&payload).unwrap();

    let outcome = handle_add_notification(&ctx.service, &body);
    assert_eq!(AckMode::Manual.action_for(&outcome, false), AckAction::Ack);

    let found = ctx.service.get_notifications("auth0Id1");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, payload.message);
    assert_eq!(found[0].user_auth0_id, payload.user_auth0_id);
    assert_eq!(Some(found[0].notification_type), payload.notification_type);
}

#[test]
fn test_reads_are_exact_and_deletes_match_local_id() {
    let ctx = TestContext::new();
    for (owner, kind) in [("auth0Id1", 0), ("auth0Id2|auth0", 1), ("google|auth0", 2), ("auth0Id2|other", 3)] {
        let body = format!(r#"{{"message":"Test message","userAuth0ID":"{owner}","notificationType":{kind}}}"#);
        assert!(matches!(
            handle_add_notification(&ctx.service, body.as_bytes()),
            HandleOutcome::Persisted(_)
        ));
    }

    assert_eq!(ctx.service.get_notifications("auth0Id2|auth0").len(), 1);
    assert!(ctx.service.get_notifications("auth0Id2").is_empty());

    ctx.service.delete_notifications("auth0Id2|auth0");

    assert!(ctx.service.get_notifications("auth0Id2|auth0").is_empty());
    assert!(ctx.service.get_notifications("google|auth0").is_empty());
    assert_eq!(ctx.service.get_notifications("auth0Id1").len(), 1);
    assert_eq!(ctx.service.get_notifications("auth0Id2|other").len(), 1);
}

#[test]
fn test_array_bodies_fail_decode_before_validation() {
    let ctx = TestContext::new();
    let bodies: [&[u8]; 2] = [b"[]", br#"["Test message","auth0|1",2]"#];

    for body in bodies {
        let outcome = handle_add_notification(&ctx.service, body);
        assert!(
            matches!(outcome, HandleOutcome::Rejected(AppError::Decode(_))),
            "{outcome:?}"
        );
    }

    assert!(ctx.repository.is_empty());
}

#[test]
fn test_two_notifications_for_same_owner_are_both_returned() {
    let ctx = TestContext::new();
    let bodies: [&[u8]; 2] = [
        br#"{"message":"Test message","userAuth0ID":"auth0Id1","notificationType":2}"#,
        br#"{"message":"Test message3","userAuth0ID":"auth0Id1","notificationType":1}"#,
    ];

    for body in bodies {
        assert!(matches!(
            handle_add_notification(&ctx.service, body),
            HandleOutcome::Persisted(_)
        ));
    }

    let found = ctx.service.get_notifications("auth0Id1");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].message, "Test message");
    assert_eq!(found[0].notification_type, NotificationType::Like);
    assert_eq!(found[1].message, "Test message3");
    assert_eq!(found[1].notification_type, NotificationType::Follow);

    assert!(ctx.service.get_notifications("unknown").is_empty());
}
