//! Streamed-reply accumulation tests.
//!
//! The single-accumulator invariant: fragments concatenate in arrival
//! order, at most one reply is open at a time, and every non-text event
//! closes the open one before anything else renders.

use wireline::gateway::ServerEvent;
use wireline::session::{Effect, RenderAction, Session, SessionEvent, dispatch};
use wireline::transcript::{MessageRole, Transcript};

fn authed() -> Session {
    let mut session = Session::new();
    dispatch(&mut session, SessionEvent::ConnectRequested);
    dispatch(&mut session, SessionEvent::Opened);
    dispatch(&mut session, SessionEvent::Input("a@b.com pw".into()));
    dispatch(
        &mut session,
        SessionEvent::Frame(ServerEvent::AuthSuccess {
            session_id: "s".into(),
        }),
    );
    session
}

fn run(session: &mut Session, transcript: &mut Transcript, event: SessionEvent) {
    for effect in dispatch(session, event) {
        if let Effect::Render(action) = effect {
            transcript.apply(action);
        }
    }
}

#[test]
fn fragments_accumulate_in_arrival_order() {
    let mut session = authed();
    let mut transcript = Transcript::new();
    run(&mut session, &mut transcript, SessionEvent::Input("hi".into()));

    for content in ["The ", "quick ", "brown ", "fox"] {
        run(
            &mut session,
            &mut transcript,
            SessionEvent::Frame(ServerEvent::Text {
                content: content.into(),
            }),
        );
    }
    run(&mut session, &mut transcript, SessionEvent::Frame(ServerEvent::End));

    let reply = transcript
        .messages()
        .iter()
        .find(|m| m.role == MessageRole::Assistant)
        .unwrap();
    assert_eq!(reply.content, "The quick brown fox");
}

#[test]
fn at_most_one_reply_is_open_across_many_events() {
    let mut session = authed();
    let mut transcript = Transcript::new();

    let events = [
        SessionEvent::Input("first".into()),
        SessionEvent::Frame(ServerEvent::Text { content: "a".into() }),
        SessionEvent::Frame(ServerEvent::Text { content: "b".into() }),
        SessionEvent::Frame(ServerEvent::Status {
            message: "tooling".into(),
            tool: None,
        }),
        SessionEvent::Input("second".into()),
        SessionEvent::Frame(ServerEvent::Text { content: "c".into() }),
        SessionEvent::Frame(ServerEvent::End),
        SessionEvent::Input("third".into()),
        SessionEvent::Frame(ServerEvent::Error {
            message: "boom".into(),
        }),
    ];

    for event in events {
        let text_frame = matches!(
            event,
            SessionEvent::Frame(ServerEvent::Text { .. })
        );
        run(&mut session, &mut transcript, event);
        // Only text fragments may leave a reply accumulating.
        if !text_frame {
            assert!(!transcript.reply_open());
        }
    }

    let replies: Vec<&str> = transcript
        .messages()
        .iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(replies, vec!["ab", "c"]);
}

#[test]
fn every_non_text_event_closes_the_reply_before_rendering() {
    let non_text = [
        SessionEvent::Frame(ServerEvent::Status {
            message: "s".into(),
            tool: None,
        }),
        SessionEvent::Frame(ServerEvent::Error { message: "e".into() }),
        SessionEvent::Frame(ServerEvent::End),
        SessionEvent::Frame(ServerEvent::AuthSuccess {
            session_id: "id".into(),
        }),
        SessionEvent::Frame(ServerEvent::AuthFailed { message: "m".into() }),
        SessionEvent::Frame(ServerEvent::Unknown {
            kind: "k".into(),
            raw: "{}".into(),
        }),
        SessionEvent::Malformed("detail".into()),
        SessionEvent::Closed {
            code: 1000,
            reason: String::new(),
        },
    ];

    for event in non_text {
        let mut session = authed();
        let mut transcript = Transcript::new();
        run(&mut session, &mut transcript, SessionEvent::Input("go".into()));
        run(
            &mut session,
            &mut transcript,
            SessionEvent::Frame(ServerEvent::Text {
                content: "partial".into(),
            }),
        );
        assert!(transcript.reply_open());

        let effects = dispatch(&mut session, event.clone());
        assert_eq!(
            effects.first(),
            Some(&Effect::Render(RenderAction::CloseReply)),
            "event {event:?} must close the reply first"
        );
        for effect in effects {
            if let Effect::Render(action) = effect {
                transcript.apply(action);
            }
        }
        assert!(!transcript.reply_open(), "event {event:?} left a reply open");
        // The partial text survives as a finalized assistant message.
        assert!(
            transcript
                .messages()
                .iter()
                .any(|m| m.role == MessageRole::Assistant && m.content == "partial")
        );
    }
}

#[test]
fn a_new_user_message_finalizes_the_previous_reply() {
    let mut session = authed();
    let mut transcript = Transcript::new();
    run(&mut session, &mut transcript, SessionEvent::Input("one".into()));
    run(
        &mut session,
        &mut transcript,
        SessionEvent::Frame(ServerEvent::Text {
            content: "dangling".into(),
        }),
    );
    // The turn ends, then the user sends again before any further frames.
    run(&mut session, &mut transcript, SessionEvent::Frame(ServerEvent::End));
    run(&mut session, &mut transcript, SessionEvent::Input("two".into()));

    assert!(!transcript.reply_open());
    let replies: Vec<&str> = transcript
        .messages()
        .iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(replies, vec!["dangling"]);
}
