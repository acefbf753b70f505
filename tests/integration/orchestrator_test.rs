//! Orchestrator Behavior Tests
//!
//! Ordering invariants, failure handling, document attachment, the stop
//! path, and session reuse protection.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use raggen_client::features::TriggerReceipt;
use raggen_client::{
    ClientError, Document, FeatureOrchestrator, GenerationUpdate, Phase, StreamEvent,
};

use crate::support::{
    channel_transport, drain_updates, unused_api, FailingTrigger, RecordingTrigger,
    ScriptedTransport,
};

fn answer(text: &str) -> StreamEvent {
    StreamEvent::Answer {
        content: text.to_string(),
    }
}

/// Events arriving before `connect` never fire the trigger; a stream that
/// ends without a terminal event fails the session.
#[tokio::test]
async fn test_trigger_requires_connect() {
    let transport = ScriptedTransport::from_events(vec![StreamEvent::AnswerStart, answer("x")]);
    let trigger = RecordingTrigger::new();
    let fired = trigger.fire_count();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, _rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(outcome.phase, Phase::Failed);
    assert!(outcome.message.content.is_empty());
}

/// A rejected trigger aborts the generation locally instead of waiting for
/// a terminal event that will never arrive.
#[tokio::test]
async fn test_trigger_failure_aborts_locally() {
    let (transport, events) = channel_transport();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, mut rx) = mpsc::channel(64);

    events.send(Ok(StreamEvent::Connect)).await.unwrap();
    // The sender stays alive: no EOF, no terminal event. Only the trigger
    // failure can end this attempt.
    let outcome = orchestrator
        .generate(&attempt, &FailingTrigger, tx)
        .await
        .unwrap();

    assert_eq!(outcome.phase, Phase::Failed);
    assert!(outcome.error.is_some());
    let failed_seen = drain_updates(&mut rx)
        .iter()
        .any(|u| matches!(u, GenerationUpdate::Failed { .. }));
    assert!(failed_seen);
    drop(events);
}

/// Documents from the trigger response attach exactly once, when the
/// answer phase completes.
#[tokio::test]
async fn test_documents_attach_on_answer_done() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::AnswerStart,
        answer("ok"),
        StreamEvent::AnswerDone,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::with_receipt(TriggerReceipt {
        message: "answer requested".to_string(),
        documents: Some(vec![Document {
            title: "Reference A".to_string(),
            ..Document::default()
        }]),
    });

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, mut rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    let documents = outcome.message.documents.expect("documents attached");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "Reference A");

    let attach_count = drain_updates(&mut rx)
        .iter()
        .filter(|u| matches!(u, GenerationUpdate::Documents { .. }))
        .count();
    assert_eq!(attach_count, 1);
}

/// Data events outside their phase are dropped from buffer mutation.
#[tokio::test]
async fn test_out_of_phase_data_dropped() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        answer("stray"),
        StreamEvent::Inference {
            content: "also stray".to_string(),
        },
        StreamEvent::AnswerStart,
        answer("ok"),
        StreamEvent::AnswerDone,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, _rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(outcome.message.content, "ok");
    assert!(outcome.message.inference.is_empty());
    assert_eq!(outcome.phase, Phase::Closed);
}

/// The server's `*-done` flushes during error unwinding do not corrupt the
/// session.
#[tokio::test]
async fn test_done_flush_on_server_abort() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::InferenceDone,
        StreamEvent::AnswerDone,
        StreamEvent::Exception,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, _rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    // Exception wins; the trailing disconnect is discarded.
    assert_eq!(outcome.phase, Phase::Failed);
}

/// `stop()` mid-stream releases the orchestrator promptly and keeps the
/// partial content.
#[tokio::test]
async fn test_stop_mid_stream() {
    let (transport, events) = channel_transport();
    let (_, cancels) = transport.counters();
    let trigger = RecordingTrigger::new();

    let orchestrator = Arc::new(FeatureOrchestrator::new(transport, unused_api()));
    let attempt = orchestrator.begin();
    let stop_handle = attempt.clone();
    let (tx, _rx) = mpsc::channel(64);

    let task = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.generate(&attempt, &trigger, tx).await }
    });

    events.send(Ok(StreamEvent::Connect)).await.unwrap();
    events.send(Ok(StreamEvent::AnswerStart)).await.unwrap();
    events.send(Ok(answer("par"))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    stop_handle.stop().await;

    let outcome = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("stop must release the orchestrator")
        .unwrap()
        .unwrap();

    assert!(outcome.stopped);
    assert_eq!(outcome.phase, Phase::Closed);
    assert_eq!(outcome.message.content, "par");
    assert_eq!(cancels.load(Ordering::SeqCst), 1);
}

/// Stopping after the session already closed is a no-op.
#[tokio::test]
async fn test_stop_after_completion_is_noop() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::AnswerStart,
        answer("done"),
        StreamEvent::AnswerDone,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let stop_handle = attempt.clone();
    let (tx, _rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();
    assert_eq!(outcome.phase, Phase::Closed);
    assert!(!outcome.stopped);

    // Both orderings of stop vs. terminal are valid; late stop changes
    // nothing.
    stop_handle.stop().await;
    stop_handle.stop().await;
}

/// A stop handle is valid for exactly one attempt.
#[tokio::test]
async fn test_session_reuse_rejected() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();

    let (tx, _rx) = mpsc::channel(64);
    orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    let (tx, _rx) = mpsc::channel(64);
    let err = orchestrator
        .generate(&attempt, &trigger, tx)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Internal(_)));
}

/// Inference and reference buffers accumulate independently of the answer.
#[tokio::test]
async fn test_all_buffers_accumulate() {
    let transport = ScriptedTransport::from_events(vec![
        StreamEvent::Connect,
        StreamEvent::InferenceStart,
        StreamEvent::Inference {
            content: "step&nbsp1".to_string(),
        },
        StreamEvent::InferenceDone,
        StreamEvent::AnswerStart,
        answer("final"),
        StreamEvent::AnswerDone,
        StreamEvent::ReferenceStart,
        StreamEvent::Reference {
            content: "[1] source".to_string(),
        },
        StreamEvent::ReferenceDone,
        StreamEvent::Disconnect,
    ]);
    let trigger = RecordingTrigger::new();

    let orchestrator = FeatureOrchestrator::new(transport, unused_api());
    let attempt = orchestrator.begin();
    let (tx, _rx) = mpsc::channel(64);

    let outcome = orchestrator.generate(&attempt, &trigger, tx).await.unwrap();

    assert_eq!(outcome.message.inference, "step 1");
    assert_eq!(outcome.message.content, "final");
    assert_eq!(outcome.references, "[1] source");
    assert_eq!(outcome.phase, Phase::Closed);
}
