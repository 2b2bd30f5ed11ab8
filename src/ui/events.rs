//! Application event handling.
//!
//! Applies finished fetches to the navigator in the order they arrive.

use crate::app::{App, AppEvent};

/// Handle an event sent by a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FeedLoaded { request, result } => {
            app.pending_fetches = app.pending_fetches.saturating_sub(1);

            // The last completion applied wins, whatever order the fetches
            // were started in.
            let outcome = app.navigator.complete(&request, result).map(|_| ());
            match outcome {
                Ok(()) => {
                    app.reset_focus();
                    app.status_message = None;
                }
                Err(e) => {
                    let notice = e.notice(&app.navigator.settings().strings).to_string();
                    app.show_notice(notice);
                }
            }
        }
    }
}
