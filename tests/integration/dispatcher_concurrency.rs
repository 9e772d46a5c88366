//! Integration tests for the generation dispatcher
//!
//! Tests cover:
//! - Admission ceiling under load
//! - Slot release on success and failure
//! - Disposal with requests in flight

use frame_engine::dispatch::protocol::SynthesisRequest;
use frame_engine::dispatch::{Dispatcher, DispatcherConfig};
use frame_engine::pattern::{self, AspectRatio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn config(max_concurrent: usize) -> DispatcherConfig {
    DispatcherConfig {
        max_concurrent,
        max_dimension: 16,
    }
}

fn slow_dispatcher(max_concurrent: usize, delay: Duration) -> Dispatcher {
    Dispatcher::with_synthesizer(config(max_concurrent), move |request: &SynthesisRequest| {
        std::thread::sleep(delay);
        pattern::synthesize_with_aspect(&request.seed, request.max_dimension, AspectRatio::SQUARE)
    })
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_never_more_than_four_in_flight() {
    let dispatcher = slow_dispatcher(4, Duration::from_millis(5));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.request_image(&format!("frame-{}", i)).await })
        })
        .collect();

    for handle in handles {
        let image = handle.await.unwrap().unwrap();
        assert_eq!((image.width, image.height), (16, 16));
    }

    assert_eq!(dispatcher.peak_in_flight(), 4);
    assert_eq!(dispatcher.in_flight(), 0);
    dispatcher.dispose();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ceiling_follows_configuration() {
    let dispatcher = slow_dispatcher(2, Duration::from_millis(5));
    let requests = (0..8).map(|i| {
        let dispatcher = dispatcher.clone();
        async move { dispatcher.request_image(&format!("f{}", i)).await }
    });
    let results = futures::future::join_all(requests).await;
    assert!(results.iter().all(|r| r.is_ok()));
    assert!(dispatcher.peak_in_flight() <= 2);
}

#[tokio::test]
async fn test_duplicate_ids_are_both_served() {
    let dispatcher = slow_dispatcher(4, Duration::from_millis(1));
    let (a, b) = tokio::join!(
        dispatcher.request_image("same"),
        dispatcher.request_image("same")
    );
    assert_eq!(a.unwrap().data_url, b.unwrap().data_url);
    assert!(dispatcher.in_flight_ids().is_empty());
}

#[tokio::test]
async fn test_failures_do_not_leak_slots() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let dispatcher = Dispatcher::with_synthesizer(config(1), move |request: &SynthesisRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        pattern::synthesize_with_aspect(&request.seed, 0, AspectRatio::SQUARE)
    })
    .unwrap();

    for i in 0..3 {
        assert!(dispatcher.request_image(&format!("f{}", i)).await.is_err());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(dispatcher.in_flight(), 0);
}

#[tokio::test]
async fn test_dispose_mid_flight_never_resolves() {
    let dispatcher = slow_dispatcher(4, Duration::from_millis(200));

    let in_flight = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.request_image("slow").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    dispatcher.dispose();
    assert!(dispatcher.is_disposed());

    let waited = tokio::time::timeout(Duration::from_millis(500), in_flight).await;
    assert!(waited.is_err(), "disposed request must never resolve");

    let after = tokio::time::timeout(Duration::from_millis(50), dispatcher.request_image("late")).await;
    assert!(after.is_err());

    // Disposing twice is harmless.
    dispatcher.dispose();
}

#[tokio::test]
async fn test_default_dispatcher_uses_pattern_synthesizer() {
    let dispatcher = Dispatcher::new(config(4)).unwrap();
    let image = dispatcher.request_image("abcdef").await.unwrap();
    assert!(image.data_url.starts_with("data:image/png;base64,"));
    assert_eq!(image.width.max(image.height), 16);
}
