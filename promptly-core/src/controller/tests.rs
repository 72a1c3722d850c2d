use std::sync::Arc;

use super::*;
use crate::ai::mock::{MockBehavior, MockProvider};
use crate::templates::PLACEHOLDER;

fn controller_with(mock: &MockProvider) -> EnhancementController {
    EnhancementController::new(TemplateRegistry::builtin(), Some(Arc::new(mock.clone())))
}

#[tokio::test]
async fn precise_mode_success_settles_with_result() {
    let mock = MockProvider::replying("Explain recursion precisely.");
    let mut controller = controller_with(&mock);

    controller.select_template("precise").unwrap();
    controller.set_input("explain recursion");
    let result = controller.submit().await;

    assert_eq!(result.as_deref(), Ok("Explain recursion precisely."));
    assert_eq!(controller.state().phase_kind(), PhaseKind::Succeeded);
    assert_eq!(
        controller.state().result_text(),
        Some("Explain recursion precisely.")
    );
    assert_eq!(controller.state().error_message(), None);

    let prompt = mock.get_last_captured_prompt().unwrap();
    let expected = TemplateRegistry::builtin()
        .get("precise")
        .unwrap()
        .render("explain recursion");
    assert_eq!(prompt, expected);
}

#[tokio::test]
async fn network_failure_settles_with_message() {
    let mock = MockProvider::new(MockBehavior::NetworkError {
        message: "timeout".to_string(),
    });
    let mut controller = controller_with(&mock);

    controller.select_template("precise").unwrap();
    controller.set_input("explain recursion");
    let result = controller.submit().await;

    assert!(matches!(result, Err(EnhanceError::External(_))));
    assert_eq!(controller.state().phase_kind(), PhaseKind::Failed);
    assert_eq!(controller.state().result_text(), None);
    let message = controller.state().error_message().unwrap();
    assert!(message.contains("timeout"), "unexpected message: {message}");
    assert!(message.starts_with("Enhancement failed: "));
}

#[tokio::test]
async fn failure_without_message_uses_generic_text() {
    let mock = MockProvider::new(MockBehavior::Fail {
        message: String::new(),
    });
    let mut controller = controller_with(&mock);

    controller.set_input("anything");
    let _ = controller.submit().await;

    assert_eq!(
        controller.state().error(),
        Some(&EnhanceError::External("Unknown error occurred".to_string()))
    );
}

#[tokio::test]
async fn empty_input_never_calls_provider() {
    let mock = MockProvider::default();
    let mut controller = controller_with(&mock);

    controller.set_input("");
    let result = controller.submit().await;

    assert_eq!(result, Err(EnhanceError::EmptyInput));
    assert_eq!(controller.state().error(), Some(&EnhanceError::EmptyInput));
    assert_eq!(mock.get_call_count(), 0);
}

#[tokio::test]
async fn whitespace_input_is_rejected_without_pending() {
    let mock = MockProvider::default();
    let mut controller = controller_with(&mock);

    controller.set_input("   \n\t ");
    let err = controller.begin_submit().unwrap_err();

    assert_eq!(err, EnhanceError::EmptyInput);
    assert_eq!(controller.state().phase_kind(), PhaseKind::Failed);
    assert!(!controller.is_busy());
    assert_eq!(mock.get_call_count(), 0);
}

#[tokio::test]
async fn missing_credential_is_reported_on_submit() {
    let mut controller = EnhancementController::new(TemplateRegistry::builtin(), None);
    assert!(!controller.has_credential());

    controller.set_input("hello");
    let result = controller.submit().await;

    let expected = EnhanceError::MissingCredential("GEMINI_API_KEY".to_string());
    assert_eq!(result, Err(expected.clone()));
    assert_eq!(controller.state().error(), Some(&expected));
    assert!(!controller.is_busy());
}

#[test]
fn empty_input_is_checked_before_credential() {
    let mut controller = EnhancementController::new(TemplateRegistry::builtin(), None);
    assert_eq!(
        controller.begin_submit().unwrap_err(),
        EnhanceError::EmptyInput
    );
}

#[test]
fn missing_credential_names_configured_variable() {
    let mut controller = EnhancementController::new(TemplateRegistry::builtin(), None)
        .with_credential_env("PROMPTLY_KEY");
    controller.set_input("hello");

    let err = controller.begin_submit().unwrap_err();

    assert_eq!(err, EnhanceError::MissingCredential("PROMPTLY_KEY".to_string()));
    assert!(err.to_string().contains("PROMPTLY_KEY"));
    assert!(!err.to_string().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn regenerate_calls_provider_again() {
    let mock = MockProvider::new(MockBehavior::Queue {
        behaviors: vec![
            MockBehavior::Reply {
                text: "Explain recursion precisely.".to_string(),
            },
            MockBehavior::Reply {
                text: "Define recursion step by step.".to_string(),
            },
        ],
    });
    let mut controller = controller_with(&mock);

    controller.select_template("precise").unwrap();
    controller.set_input("explain recursion");
    controller.submit().await.unwrap();
    assert_eq!(mock.get_call_count(), 1);

    assert!(controller.can_regenerate());
    controller.submit().await.unwrap();

    assert_eq!(mock.get_call_count(), 2);
    assert_eq!(
        controller.state().result_text(),
        Some("Define recursion step by step.")
    );
}

#[test]
fn select_unknown_template_keeps_selection() {
    let mut controller = EnhancementController::new(TemplateRegistry::builtin(), None);
    controller.select_template("academic").unwrap();

    let err = controller.select_template("poetic").unwrap_err();

    assert_eq!(err, EnhanceError::NotFound("poetic".to_string()));
    assert_eq!(controller.state().selected_template_id, "academic");
}

#[tokio::test]
async fn clear_is_idempotent_and_keeps_template() {
    let mock = MockProvider::replying("done");
    let mut controller = controller_with(&mock);
    controller.select_template("image").unwrap();
    controller.set_input("a cat");
    controller.submit().await.unwrap();

    controller.clear();
    let once = controller.state().clone();
    controller.clear();
    let twice = controller.state().clone();

    assert_eq!(once, twice);
    assert_eq!(twice.phase, Phase::Idle);
    assert_eq!(twice.raw_input, "");
    assert_eq!(twice.selected_template_id, "image");
    assert_eq!(twice.result_text(), None);
    assert_eq!(twice.error_message(), None);
}

#[tokio::test]
async fn submit_while_pending_is_busy_and_leaves_state() {
    let mock = MockProvider::replying("first");
    let mut controller = controller_with(&mock);
    controller.set_input("prompt");

    let pending = controller.begin_submit().unwrap();
    assert_eq!(controller.state().phase_kind(), PhaseKind::Pending);

    let err = controller.begin_submit().unwrap_err();
    assert_eq!(err, EnhanceError::Busy);
    assert_eq!(controller.state().phase_kind(), PhaseKind::Pending);
    assert!(!controller.can_regenerate());

    let completion = pending.execute().await;
    assert_eq!(controller.complete(completion), Some(Ok("first".to_string())));
    assert_eq!(mock.get_call_count(), 1);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn edits_during_pending_do_not_affect_dispatched_prompt() {
    let mock = MockProvider::replying("ok");
    let mut controller = controller_with(&mock);
    controller.set_input("original");

    let pending = controller.begin_submit().unwrap();
    controller.set_input("edited later");
    controller.select_template("academic").unwrap();

    let completion = pending.execute().await;
    controller.complete(completion);

    let prompt = mock.get_last_captured_prompt().unwrap();
    assert!(prompt.contains("original"));
    assert!(!prompt.contains("edited later"));
    assert_eq!(controller.state().raw_input, "edited later");
}

#[tokio::test]
async fn clear_during_pending_still_receives_completion() {
    let mock = MockProvider::replying("late result");
    let mut controller = controller_with(&mock);
    controller.set_input("prompt");

    let pending = controller.begin_submit().unwrap();
    controller.clear();
    assert_eq!(controller.state().phase_kind(), PhaseKind::Idle);
    assert!(controller.is_busy());

    let completion = pending.execute().await;
    controller.complete(completion);

    assert_eq!(controller.state().result_text(), Some("late result"));
}

#[tokio::test]
async fn cancelled_request_discards_late_completion() {
    let mock = MockProvider::replying("too late");
    let mut controller = controller_with(&mock);
    controller.set_input("prompt");

    let pending = controller.begin_submit().unwrap();
    assert!(controller.cancel());
    assert_eq!(controller.state().error(), Some(&EnhanceError::Cancelled));

    let completion = pending.execute().await;
    assert_eq!(controller.complete(completion), None);
    assert_eq!(controller.state().error(), Some(&EnhanceError::Cancelled));
    assert!(!controller.cancel());
}

#[tokio::test]
async fn input_is_trimmed_and_verbatim_otherwise() {
    let mock = MockProvider::default();
    let mut controller = controller_with(&mock);
    controller.set_input(format!("  keep {PLACEHOLDER} literal \n"));

    controller.submit().await.unwrap();

    let prompt = mock.get_last_captured_prompt().unwrap();
    assert!(prompt.contains(&format!("Prompt awal: keep {PLACEHOLDER} literal.")));
}

#[tokio::test]
async fn snapshot_reflects_settled_state() {
    let mock = MockProvider::replying("shiny");
    let mut controller = controller_with(&mock);
    controller.set_input("dull");
    controller.submit().await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, PhaseKind::Succeeded);
    assert_eq!(snapshot.result_text.as_deref(), Some("shiny"));
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.selected_template_id, "creative");
    assert!(snapshot.can_regenerate());
    assert_eq!(snapshot.last_usage, Some(TokenUsage::new(10, 10)));
}
