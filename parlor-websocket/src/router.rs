//! Event router: turns inbound frames into presentation side effects.

use crate::error::{ChatError, ChatResult};
use crate::message::{Message, MessageType};
use crate::presentation::Presentation;
use crate::protocol::{EventKind, InboundEvent};
use tokio::sync::mpsc;

/// Dispatches inbound events to the presentation layer.
///
/// The router holds no state; the same frame applied to the same roster always
/// has the same effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRouter;

impl EventRouter {
    /// Create a router.
    pub fn new() -> Self {
        Self
    }

    /// Decode a frame and invoke the matching handler.
    ///
    /// # Errors
    ///
    /// * [`ChatError::MalformedFrame`] if the frame is not a valid event
    /// * [`ChatError::UnknownEventType`] if the `type` is not handled
    ///
    /// Neither error touches the presentation.
    pub fn route<P: Presentation + ?Sized>(
        &self,
        frame: &Message,
        view: &mut P,
    ) -> ChatResult<EventKind> {
        let text = match frame.message_type {
            MessageType::Text => frame.as_bytes(),
            MessageType::Binary => {
                return Err(ChatError::MalformedFrame("events arrive as text frames".to_string()));
            }
            MessageType::Close => {
                return Err(ChatError::MalformedFrame("close frame carries no event".to_string()));
            }
        };

        let event = InboundEvent::from_slice(text)?;
        let kind = event.kind();
        self.dispatch(event, view);
        Ok(kind)
    }

    /// Invoke the handler for an already decoded event.
    pub fn dispatch<P: Presentation + ?Sized>(&self, event: InboundEvent, view: &mut P) {
        match event {
            InboundEvent::ChatMessage { user, message } => {
                view.append_log_line(&format!("{user}: {message}\n"));
                view.scroll_to_bottom();
            }
            InboundEvent::UserList { users } => {
                for user in &users {
                    view.add_roster_entry(user);
                }
            }
            InboundEvent::UserJoin { user } => {
                view.append_log_line(&format!("{user} joined the room.\n"));
                view.add_roster_entry(&user);
                view.scroll_to_bottom();
            }
            InboundEvent::UserLeave { user } => {
                view.append_log_line(&format!("{user} left the room.\n"));
                view.remove_roster_entry(&user);
                view.scroll_to_bottom();
            }
        }
    }

    /// Route a frame, reporting failures instead of returning them.
    ///
    /// Returns the handled kind, or `None` when the frame was dropped.
    pub fn handle<P: Presentation + ?Sized>(
        &self,
        frame: &Message,
        view: &mut P,
    ) -> Option<EventKind> {
        match self.route(frame, view) {
            Ok(kind) => {
                tracing::trace!(kind = %kind, "Dispatched event");
                Some(kind)
            }
            Err(ChatError::UnknownEventType(tag)) => {
                tracing::error!(kind = %tag, "Unknown message type");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, payload_len = frame.payload.len(), "Dropping inbound frame");
                None
            }
        }
    }

    /// Handle frames in arrival order until the sender side closes.
    pub async fn run<P: Presentation + ?Sized>(
        &self,
        frames: &mut mpsc::UnboundedReceiver<Message>,
        view: &mut P,
    ) {
        while let Some(frame) = frames.recv().await {
            self.handle(&frame, view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::BufferedView;

    fn frame(json: &str) -> Message {
        Message::text(json)
    }

    #[test]
    fn test_chat_message_appends_line() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();

        let kind = router
            .route(&frame(r#"{"type":"chat_message","user":"alice","message":"hi"}"#), &mut view)
            .unwrap();

        assert_eq!(kind, EventKind::ChatMessage);
        assert_eq!(view.log(), "alice: hi\n");
        assert!(view.roster().is_empty());
        assert_eq!(view.scroll_count(), 1);
    }

    #[test]
    fn test_join_logs_and_adds() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();

        router
            .route(&frame(r#"{"type":"user_join","user":"bob"}"#), &mut view)
            .unwrap();

        assert_eq!(view.log(), "bob joined the room.\n");
        assert_eq!(view.roster().iter().collect::<Vec<_>>(), vec!["bob"]);
    }

    #[test]
    fn test_user_list_merges_without_duplicates() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();
        view.add_roster_entry("bob");

        let list = frame(r#"{"type":"user_list","users":["bob","carol","carol"]}"#);
        router.route(&list, &mut view).unwrap();
        assert_eq!(view.roster().iter().collect::<Vec<_>>(), vec!["bob", "carol"]);
        assert_eq!(view.log(), "");
        assert_eq!(view.scroll_count(), 0);

        let before = view.roster().clone();
        router.route(&list, &mut view).unwrap();
        assert_eq!(view.roster(), &before);
    }

    #[test]
    fn test_leave_of_absent_user() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();
        view.add_roster_entry("erin");

        router
            .route(&frame(r#"{"type":"user_leave","user":"dave"}"#), &mut view)
            .unwrap();

        assert_eq!(view.log(), "dave left the room.\n");
        assert_eq!(view.roster().iter().collect::<Vec<_>>(), vec!["erin"]);
    }

    #[test]
    fn test_leave_removes_present_user() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();

        router
            .route(&frame(r#"{"type":"user_join","user":"dave"}"#), &mut view)
            .unwrap();
        router
            .route(&frame(r#"{"type":"user_leave","user":"dave"}"#), &mut view)
            .unwrap();

        assert!(view.roster().is_empty());
        assert_eq!(view.log_lines(), vec!["dave joined the room.", "dave left the room."]);
    }

    #[test]
    fn test_unknown_type_has_no_side_effects() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();
        view.add_roster_entry("bob");

        let unknown = frame(r#"{"type":"users_messages","messages":["old"]}"#);
        assert!(matches!(
            router.route(&unknown, &mut view),
            Err(ChatError::UnknownEventType(_))
        ));
        assert_eq!(router.handle(&unknown, &mut view), None);

        assert_eq!(view.log(), "");
        assert_eq!(view.roster().iter().collect::<Vec<_>>(), vec!["bob"]);
    }

    #[test]
    fn test_malformed_frames_are_dropped() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();

        for bad in ["", "{", "null", r#"{"type":7}"#, r#"{"type":"user_join"}"#] {
            assert!(matches!(
                router.route(&frame(bad), &mut view),
                Err(ChatError::MalformedFrame(_))
            ));
            assert_eq!(router.handle(&frame(bad), &mut view), None);
        }
        assert!(router.route(&Message::binary(vec![0xff, 0xfe]), &mut view).is_err());
        assert!(router.route(&Message::close(), &mut view).is_err());

        // Still usable afterwards.
        router
            .route(&frame(r#"{"type":"chat_message","user":"a","message":"b"}"#), &mut view)
            .unwrap();
        assert_eq!(view.log(), "a: b\n");
    }

    #[test]
    fn test_binary_frames_are_malformed() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();

        let result = router.route(
            &Message::binary(br#"{"type":"user_join","user":"zoe"}"#.to_vec()),
            &mut view,
        );
        assert!(matches!(result, Err(ChatError::MalformedFrame(_))));
        assert!(view.roster().is_empty());
        assert!(view.log().is_empty());
    }

    #[tokio::test]
    async fn test_run_preserves_arrival_order() {
        let router = EventRouter::new();
        let mut view = BufferedView::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        tx.send(frame(r#"{"type":"user_join","user":"bob"}"#)).unwrap();
        tx.send(frame("garbage")).unwrap();
        tx.send(frame(r#"{"type":"chat_message","user":"bob","message":"one"}"#))
            .unwrap();
        tx.send(frame(r#"{"type":"chat_message","user":"bob","message":"two"}"#))
            .unwrap();
        tx.send(frame(r#"{"type":"user_leave","user":"bob"}"#)).unwrap();
        drop(tx);

        router.run(&mut rx, &mut view).await;

        assert_eq!(
            view.log_lines(),
            vec![
                "bob joined the room.",
                "bob: one",
                "bob: two",
                "bob left the room.",
            ]
        );
        assert!(view.roster().is_empty());
    }
}
