//! Protocol Scenario Tests
//!
//! The canonical event sequences every conforming client must handle:
//! plain answers, prepared answers with progress ticks, partial results
//! preserved on failure, escaped-newline normalization, and stopping
//! before anything arrived.

use std::sync::atomic::Ordering;

use tokio::sync::mpsc;

use raggen_client::{FeatureOrchestrator, GenerationUpdate, Phase, StreamEvent};

use crate::support::{drain_updates, unused_api, RecordingTrigger, ScriptedTransport};

fn answer(text: &str) -> StreamEvent {
    StreamEvent::Answer {
        content: text.to_string(),
    }
}

/// `connect → answer-start → answer("Hel") → answer("lo") → answer-done →
/// disconnect` yields `content == "Hello"` and a closed session.
#[tokio::test]
async fn test_plain_answer_sequence() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::AnswerStart,
        answer("Hel"),
        answer("lo"),
        StreamEvent::AnswerDone,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();
    let fired = trigger.fire_count();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, mut rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(outcome.phase, Phase::Closed);
    assert_eq!(outcome.message.content, "Hello");
    assert!(outcome.message.inference.is_empty());
    assert!(outcome.message.documents.is_none());
    assert!(!outcome.stopped);
    assert!(outcome.error.is_none());
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // The content snapshots grow monotonically.
    let contents: Vec<String> = drain_updates(&mut rx)
        .into_iter()
        .filter_map(|update| match update {
            GenerationUpdate::Content { content } => Some(content),
            _ => None,
        })
        .collect();
    assert_eq!(contents, vec!["Hel".to_string(), "Hello".to_string()]);
}

/// A prepared generation surfaces the progress tick during `Preparing` and
/// still accumulates the answer.
#[tokio::test]
async fn test_prepare_progress_sequence() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::PrepareStart,
        StreamEvent::Prepare {
            progress: raggen_client::PrepareProgress {
                progress: 0.5,
                message: None,
            },
        },
        StreamEvent::PrepareDone,
        StreamEvent::AnswerStart,
        answer("ok"),
        StreamEvent::AnswerDone,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, mut rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(outcome.phase, Phase::Closed);
    assert_eq!(outcome.message.content, "ok");
    assert_eq!(outcome.progress, 0.5);

    let updates = drain_updates(&mut rx);
    let progress_seen = updates.iter().any(|update| {
        matches!(update, GenerationUpdate::Progress { progress, .. } if *progress == 0.5)
    });
    assert!(progress_seen, "expected a 0.5 progress tick, got {updates:?}");

    // The progress tick arrives while Preparing is the latest phase.
    let preparing_index = updates
        .iter()
        .position(|u| matches!(u, GenerationUpdate::Phase { phase: Phase::Preparing }))
        .unwrap();
    let progress_index = updates
        .iter()
        .position(|u| matches!(u, GenerationUpdate::Progress { .. }))
        .unwrap();
    assert!(preparing_index < progress_index);
}

/// `exception` mid-answer fails the session but preserves the partial
/// content.
#[tokio::test]
async fn test_partial_content_preserved_on_exception() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::AnswerStart,
        answer("partial"),
        StreamEvent::Exception,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, mut rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(outcome.phase, Phase::Failed);
    assert_eq!(outcome.message.content, "partial");
    assert!(outcome.error.is_some());

    let failed_seen = drain_updates(&mut rx)
        .iter()
        .any(|u| matches!(u, GenerationUpdate::Failed { .. }));
    assert!(failed_seen);
}

/// Escaped newlines normalize across fragments: `answer("\n")` (two
/// characters) then `answer("x")` accumulates to a real newline then `x`.
#[tokio::test]
async fn test_escaped_newline_across_fragments() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::AnswerStart,
        answer("\\n"),
        answer("x"),
        StreamEvent::AnswerDone,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, _rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(outcome.message.content, "\nx");
}

/// `stop()` before any event arrived: no channel, no trigger, session left
/// idle.
#[tokio::test]
async fn test_stop_before_generation() {
    let transport = ScriptedTransport::from_events(vec![StreamEvent::Connect]);
    let (opens, cancels) = transport.counters();
    let trigger = RecordingTrigger::new();
    let fired = trigger.fire_count();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();

    attempt.stop().await;
    assert_eq!(cancels.load(Ordering::SeqCst), 1);

    let (tx, _rx) = mpsc::channel(64);
    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(outcome.phase, Phase::Idle);
    assert!(outcome.stopped);
    assert_eq!(opens.load(Ordering::SeqCst), 0, "channel must not open");
    assert_eq!(fired.load(Ordering::SeqCst), 0, "trigger must not fire");
}
