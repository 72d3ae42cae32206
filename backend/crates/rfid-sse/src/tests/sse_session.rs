use crate::tests::{
    CHANNEL, RecordingSink, recording_peripherals, test_publisher, test_session_config,
};
use crate::{BroadcastError, Metrics, SessionOutcome, ShutdownCoordinator, SseSession};

use std::time::Duration;

use bytes::Bytes;
use tokio::time::timeout;

async fn wait_for_frames(sink: &RecordingSink, count: usize) {
    while sink.frames().len() < count {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[tokio::test]
async fn given_published_lines_when_streaming_then_card_frames_written() {
    let publisher = test_publisher(2, 15);
    let subscription = publisher.subscribe(CHANNEL).await.unwrap();
    let id = subscription.id;
    let (peripherals, indicator, buzzer) = recording_peripherals();
    let sink = RecordingSink::default();
    let shutdown = ShutdownCoordinator::new();

    let session = SseSession::new(
        subscription,
        publisher.clone(),
        sink.clone(),
        peripherals,
        test_session_config(),
        Metrics::new(),
    );
    let running = tokio::spawn(session.run(shutdown.subscribe_guard()));

    publisher.publish("A1B2\nC3D4", CHANNEL).await;
    timeout(Duration::from_secs(5), wait_for_frames(&sink, 2))
        .await
        .unwrap();

    assert_eq!(
        sink.frames(),
        vec![
            Bytes::from_static(b"event: card\ndata: A1B2\n\n"),
            Bytes::from_static(b"event: card\ndata: C3D4\n\n"),
        ]
    );

    // Removing the subscriber elsewhere ends the stream.
    publisher.unsubscribe(id, CHANNEL).await.unwrap();
    let outcome = timeout(Duration::from_secs(5), running)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Closed);
    assert_eq!(indicator.ons(), 2);
    assert_eq!(indicator.offs(), 3);
    assert!(buzzer.beeps().is_empty());
}

#[tokio::test(start_paused = true)]
async fn given_write_failure_when_streaming_then_alert_and_single_cleanup() {
    let publisher = test_publisher(2, 15);
    let failing = publisher.subscribe(CHANNEL).await.unwrap();
    let failing_id = failing.id;
    let healthy = publisher.subscribe(CHANNEL).await.unwrap();
    let healthy_id = healthy.id;

    let (failing_peripherals, failing_indicator, buzzer) = recording_peripherals();
    let (healthy_peripherals, _, healthy_buzzer) = recording_peripherals();
    let failing_sink = RecordingSink::failing_after(1);
    let healthy_sink = RecordingSink::default();
    let shutdown = ShutdownCoordinator::new();

    let failing_session = SseSession::new(
        failing,
        publisher.clone(),
        failing_sink.clone(),
        failing_peripherals,
        test_session_config(),
        Metrics::new(),
    );
    let healthy_session = SseSession::new(
        healthy,
        publisher.clone(),
        healthy_sink.clone(),
        healthy_peripherals,
        test_session_config(),
        Metrics::new(),
    );
    let failing_run = tokio::spawn(failing_session.run(shutdown.subscribe_guard()));
    let healthy_run = tokio::spawn(healthy_session.run(shutdown.subscribe_guard()));

    publisher.publish("ID1\nID2", CHANNEL).await;
    let outcome = failing_run.await.unwrap();

    assert_eq!(outcome, SessionOutcome::Disconnected);
    assert_eq!(failing_sink.frames().len(), 1);

    let beeps = buzzer.beeps();
    assert_eq!(beeps.len(), 3);
    assert!(beeps.iter().all(|(_, length)| *length == Duration::from_secs(1)));
    for pair in beeps.windows(2) {
        assert_eq!(pair[1].0 - pair[0].0, Duration::from_secs(1));
    }

    // One pulse, then exactly one clear on the way out.
    assert_eq!(failing_indicator.ons(), 1);
    assert_eq!(failing_indicator.offs(), 2);

    assert!(!publisher.contains(failing_id, CHANNEL).await);
    assert!(matches!(
        publisher.unsubscribe(failing_id, CHANNEL).await,
        Err(BroadcastError::SubscriberNotFound { .. })
    ));

    // The other session keeps streaming.
    wait_for_frames(&healthy_sink, 2).await;
    assert!(publisher.contains(healthy_id, CHANNEL).await);
    assert!(healthy_buzzer.beeps().is_empty());

    shutdown.shutdown();
    assert_eq!(healthy_run.await.unwrap(), SessionOutcome::Shutdown);
    assert_eq!(publisher.subscriber_count(CHANNEL).await, 0);
}

#[tokio::test]
async fn given_unexpected_sink_error_when_streaming_then_failed_without_alert() {
    let publisher = test_publisher(2, 15);
    let subscription = publisher.subscribe(CHANNEL).await.unwrap();
    let (peripherals, indicator, buzzer) = recording_peripherals();
    let shutdown = ShutdownCoordinator::new();

    let session = SseSession::new(
        subscription,
        publisher.clone(),
        RecordingSink::broken_internally(),
        peripherals,
        test_session_config(),
        Metrics::new(),
    );
    let running = tokio::spawn(session.run(shutdown.subscribe_guard()));
    publisher.publish("B65BBC19", CHANNEL).await;

    let outcome = timeout(Duration::from_secs(5), running)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Failed);
    assert!(buzzer.beeps().is_empty());
    assert_eq!(indicator.offs(), 1);
    assert_eq!(publisher.subscriber_count(CHANNEL).await, 0);
}

#[tokio::test]
async fn given_idle_session_when_shutdown_then_unsubscribed() {
    let publisher = test_publisher(2, 15);
    let subscription = publisher.subscribe(CHANNEL).await.unwrap();
    let (peripherals, indicator, _) = recording_peripherals();
    let shutdown = ShutdownCoordinator::new();

    let session = SseSession::new(
        subscription,
        publisher.clone(),
        RecordingSink::default(),
        peripherals,
        test_session_config(),
        Metrics::new(),
    );
    let guard = shutdown.subscribe_guard();
    let running = tokio::spawn(session.run(guard));

    shutdown.shutdown();
    let outcome = timeout(Duration::from_secs(5), running)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Shutdown);
    assert_eq!(indicator.offs(), 1);
    assert_eq!(publisher.subscriber_count(CHANNEL).await, 0);
}

#[tokio::test]
async fn given_cancelled_session_when_dropped_then_subscriber_removed() {
    let publisher = test_publisher(2, 15);
    let subscription = publisher.subscribe(CHANNEL).await.unwrap();
    let id = subscription.id;
    let (peripherals, indicator, _) = recording_peripherals();
    let shutdown = ShutdownCoordinator::new();

    let session = SseSession::new(
        subscription,
        publisher.clone(),
        RecordingSink::default(),
        peripherals,
        test_session_config(),
        Metrics::new(),
    );
    assert_eq!(session.subscriber_id(), id);
    let running = tokio::spawn(session.run(shutdown.subscribe_guard()));
    tokio::task::yield_now().await;

    running.abort();
    assert!(running.await.unwrap_err().is_cancelled());

    timeout(Duration::from_secs(1), async {
        while publisher.contains(id, CHANNEL).await {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("dropped session should still unsubscribe");
    assert_eq!(indicator.offs(), 1);
}

#[tokio::test]
async fn given_release_waiting_on_registry_when_cancelled_then_still_unsubscribed() {
    let publisher = test_publisher(1, 15);
    let subscription = publisher.subscribe(CHANNEL).await.unwrap();
    let id = subscription.id;
    let (peripherals, indicator, _) = recording_peripherals();
    let shutdown = ShutdownCoordinator::new();

    let session = SseSession::new(
        subscription,
        publisher.clone(),
        RecordingSink::default(),
        peripherals,
        test_session_config(),
        Metrics::new(),
    );
    let running = tokio::spawn(session.run(shutdown.subscribe_guard()));
    tokio::task::yield_now().await;

    // Hold the registry so the session's unsubscribe has to wait for it.
    let held = publisher.registry.read().await;
    shutdown.shutdown();
    while indicator.offs() == 0 {
        tokio::task::yield_now().await;
    }
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }

    running.abort();
    assert!(running.await.unwrap_err().is_cancelled());
    drop(held);

    timeout(Duration::from_secs(1), async {
        while publisher.contains(id, CHANNEL).await {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("cancelled release should still unsubscribe");

    assert!(publisher.subscribe(CHANNEL).await.is_some());
    assert_eq!(indicator.offs(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_client_gone_while_idle_when_streaming_then_disconnected_without_publish() {
    let publisher = test_publisher(1, 15);
    let subscription = publisher.subscribe(CHANNEL).await.unwrap();
    let id = subscription.id;
    let (peripherals, indicator, buzzer) = recording_peripherals();
    let shutdown = ShutdownCoordinator::new();
    let (sink, receiver) = crate::frame_sink::channel(1);

    let session = SseSession::new(
        subscription,
        publisher.clone(),
        sink,
        peripherals,
        test_session_config(),
        Metrics::new(),
    );
    let running = tokio::spawn(session.run(shutdown.subscribe_guard()));
    drop(receiver);

    let outcome = running.await.unwrap();

    assert_eq!(outcome, SessionOutcome::Disconnected);
    assert_eq!(buzzer.beeps().len(), 3);
    assert_eq!(indicator.ons(), 0);
    assert_eq!(indicator.offs(), 1);
    assert!(!publisher.contains(id, CHANNEL).await);
    assert!(publisher.subscribe(CHANNEL).await.is_some());
}
