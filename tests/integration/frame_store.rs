//! Integration tests for the frame store
//!
//! Tests cover:
//! - Frame lifecycle (pending, resolved, refreshed, failed)
//! - Selection mode and bulk deletion
//! - Grid density clamping and stepping
//! - Revision notifications

use crate::integration::test_utils::{resolved_store, GatedSource, StubSource};
use frame_engine::dispatch::{Dispatcher, DispatcherConfig};
use frame_engine::frame::{
    FrameId, FrameStore, FrameUpdate, GenerationOutcome, GridConfig, MAX_COLUMN_WIDTH,
    MIN_COLUMN_WIDTH,
};
use std::sync::Arc;

#[tokio::test]
async fn test_select_two_and_delete_leaves_the_third() {
    let (store, ids, _) = resolved_store(3).await;
    let (a, b, c) = (&ids[0], &ids[1], &ids[2]);

    assert!(store.toggle_selection_mode());
    store.toggle_select(a);
    store.toggle_select(c);
    assert_eq!(store.selection_count(), 2);

    assert_eq!(store.delete_selected(), 2);
    assert_eq!(store.frame_ids(), vec![b.clone()]);
    assert_eq!(store.selection_count(), 0);
    assert!(!store.selection_mode());
}

#[tokio::test]
async fn test_toggle_selection_mode_clears_selection() {
    let (store, ids, _) = resolved_store(2).await;
    store.toggle_selection_mode();
    store.select_all();
    assert_eq!(store.selection_count(), 2);

    assert!(!store.toggle_selection_mode());
    assert_eq!(store.selection_count(), 0);
    assert!(!store.is_selected(&ids[0]));
}

#[tokio::test]
async fn test_bulk_selection_ignores_unknown_ids() {
    let (store, ids, _) = resolved_store(3).await;
    let ghost = FrameId::from("ghost");

    store.select_many(&[ids[0].clone(), ghost.clone()]);
    assert_eq!(store.selection_count(), 1);

    store.toggle_many(&[ids[0].clone(), ids[1].clone(), ghost]);
    assert!(!store.is_selected(&ids[0]));
    assert!(store.is_selected(&ids[1]));

    store.deselect_many(&ids);
    assert_eq!(store.selection_count(), 0);
}

#[tokio::test]
async fn test_snapshot_lists_selection_in_frame_order() {
    let (store, ids, _) = resolved_store(3).await;
    store.toggle_selection_mode();
    store.toggle_select(&ids[2]);
    store.toggle_select(&ids[0]);

    let snapshot = store.snapshot();
    assert!(snapshot.selection_mode);
    assert_eq!(snapshot.selected_ids, vec![ids[0].clone(), ids[2].clone()]);
    assert_eq!(snapshot.frames.len(), 3);
    assert_eq!(snapshot.revision, store.revision());
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_image() {
    let source = Arc::new(StubSource::default());
    let store = FrameStore::new(source.clone());

    let ok = store.add_frame();
    let ok_id = ok.frame_id().clone();
    assert!(matches!(ok.wait().await, GenerationOutcome::Resolved { .. }));

    source.fail_for(&ok_id);
    let refresh = store.refresh_frame_image(&ok_id).unwrap();
    assert_eq!(refresh.wait().await, GenerationOutcome::Failed);

    let frame = store.frame(&ok_id).unwrap();
    assert!(frame.is_resolved(), "failed refresh keeps the previous image");
    assert_eq!((frame.width, frame.height), (320, 240));
}

#[tokio::test]
async fn test_refresh_keeps_old_image_until_new_one_arrives() {
    let source = Arc::new(GatedSource::default());
    let store = FrameStore::new(source.clone());

    let ticket = store.add_frame();
    let id = ticket.frame_id().clone();
    assert_eq!(
        ticket.wait().await,
        GenerationOutcome::Resolved {
            width: 10,
            height: 5
        }
    );
    let first_url = GatedSource::data_url(&id, 1);

    source.hold(&id);
    let refresh = store.refresh_frame_image(&id).unwrap();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert!(!refresh.is_finished());

    let during = store.frame(&id).unwrap();
    assert!(during.is_resolved(), "refresh must not reset the frame to pending");
    assert_eq!(during.image_data_url.as_deref(), Some(first_url.as_str()));
    assert_eq!((during.width, during.height), (10, 5));

    source.release(&id);
    assert_eq!(
        refresh.wait().await,
        GenerationOutcome::Resolved {
            width: 20,
            height: 5
        }
    );

    let after = store.frame(&id).unwrap();
    let second_url = GatedSource::data_url(&id, 2);
    assert_eq!(after.image_data_url.as_deref(), Some(second_url.as_str()));
    assert_eq!((after.width, after.height), (20, 5));
}

#[tokio::test]
async fn test_image_for_removed_frame_is_discarded() {
    let source = Arc::new(StubSource::default());
    let store = FrameStore::new(source);
    let ticket = store.add_frame();
    let id = ticket.frame_id().clone();
    store.remove_frame(&id);

    assert_eq!(ticket.wait().await, GenerationOutcome::Discarded);
    assert!(store.frame(&id).is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_update_frame_changes_label_only() {
    let (store, ids, _) = resolved_store(1).await;
    let before = store.frame(&ids[0]).unwrap();
    assert!(before.label.starts_with("Frame "));

    assert!(store.update_frame(&ids[0], FrameUpdate::label("Harbour")));
    let after = store.frame(&ids[0]).unwrap();
    assert_eq!(after.label, "Harbour");
    assert_eq!(after.image_data_url, before.image_data_url);
}

#[tokio::test]
async fn test_grid_width_clamps_and_steps() {
    let (store, _, _) = resolved_store(0).await;
    assert_eq!(store.set_column_width(50), MIN_COLUMN_WIDTH);
    assert_eq!(store.set_column_width(1000), MAX_COLUMN_WIDTH);

    assert_eq!(store.step_up(), MAX_COLUMN_WIDTH);
    store.set_column_width(MIN_COLUMN_WIDTH);
    assert_eq!(store.step_down(), MIN_COLUMN_WIDTH);

    store.set_column_width(230);
    assert_eq!(store.step_up(), 300);
}

#[tokio::test]
async fn test_initial_column_width_from_config() {
    let store = FrameStore::with_config(
        Arc::new(StubSource::default()),
        &GridConfig {
            initial_column_width: 360,
        },
    );
    assert_eq!(store.column_width(), 360);
}

#[tokio::test]
async fn test_subscribers_see_resolution() {
    let store = FrameStore::new(Arc::new(StubSource::default()));
    let mut changes = store.subscribe();
    let ticket = store.add_frame();
    ticket.wait().await;

    assert!(changes.has_changed().unwrap());
    changes.borrow_and_update();
    store.clear_selection();
    assert!(changes.has_changed().unwrap());
}

#[tokio::test]
async fn test_store_backed_by_real_dispatcher() {
    let dispatcher = Dispatcher::new(DispatcherConfig {
        max_concurrent: 4,
        max_dimension: 48,
    })
    .unwrap();
    let store = FrameStore::new(Arc::new(dispatcher.clone()));

    let tickets: Vec<_> = (0..6).map(|_| store.add_frame()).collect();
    for ticket in tickets {
        match ticket.wait().await {
            GenerationOutcome::Resolved { width, height } => {
                assert_eq!(width.max(height), 48);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert_eq!(store.resolved_ids().len(), 6);
    assert!(dispatcher.peak_in_flight() <= 4);
    dispatcher.dispose();
}
