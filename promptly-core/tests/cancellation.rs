use promptly_core::ai::mock::MockBehavior;
use promptly_core::controller::{EnhanceError, PhaseKind};
use promptly_core::session::events::EnhancerEvent;


fn slow_reply(text: &str) -> MockBehavior {
    MockBehavior::Delay {
        millis: 5_000,
        then: Box::new(MockBehavior::Reply {
            text: text.to_string(),
        }),
    }
}

#[test]
fn test_cancel_pending_request_then_submit_again() {
    fixture::run_with_behavior(slow_reply("too late"), |mut fixture| async move {
        fixture.actor.set_input("explain recursion").unwrap();
        fixture.next_state().await;

        fixture.actor.submit().unwrap();
        fixture
            .collect_until(|e| matches!(e, EnhancerEvent::BusyStatusChanged(true)))
            .await;

        fixture.actor.cancel().unwrap();
        let events = fixture
            .collect_until(|e| matches!(e, EnhancerEvent::BusyStatusChanged(false)))
            .await;

        assert!(
            events
                .iter()
                .any(|e| matches!(e, EnhancerEvent::OperationCancelled { .. })),
            "Should receive OperationCancelled event"
        );
        let cancelled = events
            .iter()
            .rev()
            .find_map(|e| match e {
                EnhancerEvent::StateChanged(s) => Some(s.clone()),
                _ => None,
            })
            .expect("state after cancel");
        assert_eq!(cancelled.phase, PhaseKind::Failed);
        assert_eq!(cancelled.error, Some(EnhanceError::Cancelled));
        assert!(!cancelled.busy);

        // The session must accept a fresh request afterwards
        fixture.mock().set_behavior(MockBehavior::Reply {
            text: "fresh".to_string(),
        });
        let settled = fixture.submit_and_settle().await;
        assert_eq!(settled.phase, PhaseKind::Succeeded);
        assert_eq!(settled.result_text.as_deref(), Some("fresh"));
    });
}

#[test]
fn test_cancel_while_idle_is_a_no_op() {
    fixture::run(|mut fixture| async move {
        fixture.actor.cancel().unwrap();
        fixture.actor.get_state().unwrap();

        let events = fixture
            .collect_until(|e| matches!(e, EnhancerEvent::StateChanged(_)))
            .await;

        assert_eq!(events.len(), 1, "unexpected events: {events:?}");
        let EnhancerEvent::StateChanged(snapshot) = &events[0] else {
            unreachable!()
        };
        assert_eq!(snapshot.phase, PhaseKind::Idle);
    });
}

#[test]
fn test_submit_while_pending_is_rejected_as_busy() {
    fixture::run_with_behavior(slow_reply("done"), |mut fixture| async move {
        fixture.actor.set_input("first").unwrap();
        fixture.next_state().await;
        fixture.actor.submit().unwrap();
        fixture
            .collect_until(|e| matches!(e, EnhancerEvent::BusyStatusChanged(true)))
            .await;

        fixture.actor.submit().unwrap();
        let events = fixture
            .collect_until(|e| matches!(e, EnhancerEvent::Rejected(_)))
            .await;
        assert_eq!(
            events.last(),
            Some(&EnhancerEvent::Rejected(EnhanceError::Busy))
        );

        fixture.actor.cancel().unwrap();
        fixture
            .collect_until(|e| matches!(e, EnhancerEvent::BusyStatusChanged(false)))
            .await;
        assert_eq!(fixture.mock().get_call_count(), 1);
    });
}

#[test]
fn test_edits_and_mode_changes_apply_while_pending() {
    fixture::run_with_behavior(slow_reply("done"), |mut fixture| async move {
        fixture.actor.set_input("first").unwrap();
        fixture.next_state().await;
        fixture.actor.submit().unwrap();
        fixture
            .collect_until(|e| matches!(e, EnhancerEvent::BusyStatusChanged(true)))
            .await;

        fixture.actor.set_input("second draft").unwrap();
        let edited = fixture.next_state().await;
        assert_eq!(edited.raw_input, "second draft");
        assert_eq!(edited.phase, PhaseKind::Pending);
        assert!(edited.busy);

        fixture.actor.select_template("image").unwrap();
        let switched = fixture.next_state().await;
        assert_eq!(switched.selected_template_id, "image");
        assert_eq!(switched.phase, PhaseKind::Pending);

        fixture.actor.cancel().unwrap();
        fixture
            .collect_until(|e| matches!(e, EnhancerEvent::BusyStatusChanged(false)))
            .await;

        // The request was built from the text at submit time
        let prompt = fixture.mock().get_last_captured_prompt().unwrap();
        assert!(prompt.contains("first"));
        assert!(!prompt.contains("second draft"));
    });
}
