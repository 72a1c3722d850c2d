use promptly_core::controller::PhaseKind;
use promptly_core::session::EnhancerEvent;

use super::state::TuiState;

pub fn handle_enhancer_event(state: &mut TuiState, event: EnhancerEvent) {
    match event {
        EnhancerEvent::SessionStarted {
            provider,
            credential_env,
            dark_mode,
            templates,
            snapshot,
        } => {
            if provider.is_none() {
                state.set_notice(format!("No API key configured, set {credential_env}"), true);
            }
            state.provider = provider;
            state.dark_mode = dark_mode;
            state.templates = templates;
            state.busy = snapshot.busy;
            state.snapshot = Some(snapshot);
        }

        EnhancerEvent::StateChanged(snapshot) => {
            let previous = state.phase();
            // A fresh result starts at the top
            if snapshot.phase == PhaseKind::Succeeded && previous != PhaseKind::Succeeded {
                state.scroll_offset = 0;
            }
            state.busy = snapshot.busy;
            state.snapshot = Some(snapshot);
        }

        EnhancerEvent::InputChanged { line_count } => {
            state.input_lines = line_count;
        }

        EnhancerEvent::ThemeChanged { dark_mode } => {
            state.dark_mode = dark_mode;
        }

        EnhancerEvent::BusyStatusChanged(busy) => {
            state.busy = busy;
            if busy {
                state.notice = None;
                state.show_help = false;
            }
        }

        EnhancerEvent::OperationCancelled { message } => {
            state.busy = false;
            state.set_notice(message, false);
        }

        EnhancerEvent::Rejected(e) => {
            state.set_notice(e.to_string(), true);
        }

        EnhancerEvent::Error(e) => {
            state.set_notice(e, true);
        }
    }
}
