//! Integration tests for navigation cursors over a shared store

use crate::integration::test_utils::{resolved_store, GatedSource};
use frame_engine::cursor::NavigationCursor;
use frame_engine::frame::FrameStore;
use std::sync::Arc;

#[tokio::test]
async fn test_wrap_around_walk() {
    let (store, ids, _) = resolved_store(3).await;
    let (a, b, c) = (&ids[0], &ids[1], &ids[2]);
    let mut cursor = NavigationCursor::new(store, true);

    assert!(cursor.set_current(a));
    assert!(cursor.go_to_previous());
    assert_eq!(cursor.current().as_ref(), Some(c));

    assert!(cursor.go_to_next());
    assert_eq!(cursor.current().as_ref(), Some(a));
    assert!(cursor.go_to_next());
    assert_eq!(cursor.current().as_ref(), Some(b));
}

#[tokio::test]
async fn test_removing_current_frame_resets_cursor() {
    let (store, ids, _) = resolved_store(3).await;
    let mut cursor = NavigationCursor::new(store.clone(), true);
    cursor.set_current(&ids[1]);

    store.remove_frame(&ids[1]);
    assert_ne!(cursor.current().as_ref(), Some(&ids[1]));
    assert_eq!(cursor.current(), None);
    assert_eq!(cursor.working_set(), vec![ids[0].clone(), ids[2].clone()]);
}

#[tokio::test]
async fn test_deleting_selection_resets_cursor() {
    let (store, ids, _) = resolved_store(3).await;
    let mut cursor = NavigationCursor::new(store.clone(), false);
    cursor.set_current(&ids[0]);

    store.toggle_selection_mode();
    store.toggle_select(&ids[0]);
    store.delete_selected();

    assert!(cursor.revalidate());
    assert_eq!(cursor.current(), None);
    assert!(cursor.go_to_first());
    assert_eq!(cursor.current().as_ref(), Some(&ids[1]));
}

#[tokio::test]
async fn test_pending_frames_are_skipped() {
    let (store, ids, _) = resolved_store(2).await;
    let mut cursor = NavigationCursor::new(store.clone(), true);

    let blocked = FrameStore::new(Arc::new(NeverSource));
    let pending = blocked.add_frame();
    let mut blocked_cursor = NavigationCursor::new(blocked, true);
    assert!(!blocked_cursor.set_current(pending.frame_id()));
    assert!(blocked_cursor.working_set().is_empty());

    cursor.set_current(&ids[1]);
    assert!(cursor.go_to_next());
    assert_eq!(cursor.current().as_ref(), Some(&ids[0]));
}

#[tokio::test]
async fn test_pending_frame_between_resolved_frames_is_skipped() {
    let source = Arc::new(GatedSource::default());
    let store = FrameStore::new(source.clone());

    let a = store.add_frame();
    let a_id = a.frame_id().clone();
    a.wait().await;

    // The spawned generation has not run yet on this single-threaded runtime.
    let b = store.add_frame();
    let b_id = b.frame_id().clone();
    source.hold(&b_id);

    let c = store.add_frame();
    let c_id = c.frame_id().clone();
    c.wait().await;

    assert!(!store.frame(&b_id).unwrap().is_resolved());
    assert_eq!(store.frame_ids(), vec![a_id.clone(), b_id.clone(), c_id.clone()]);

    let mut cursor = NavigationCursor::new(store.clone(), false);
    assert_eq!(cursor.working_set(), vec![a_id.clone(), c_id.clone()]);
    assert!(!cursor.set_current(&b_id));
    assert!(cursor.set_current(&a_id));
    assert!(cursor.go_to_next());
    assert_eq!(cursor.current(), Some(c_id.clone()));

    source.release(&b_id);
    b.wait().await;
    assert!(cursor.go_to_previous());
    assert_eq!(cursor.current(), Some(b_id));
}

#[tokio::test]
async fn test_independent_cursors_share_one_store() {
    let (store, ids, _) = resolved_store(4).await;
    let mut overlay = NavigationCursor::new(store.clone(), true);
    let mut carousel = NavigationCursor::new(store.clone(), false);

    overlay.set_current(&ids[0]);
    carousel.set_current(&ids[3]);
    overlay.go_to_next();

    assert_eq!(overlay.current().as_ref(), Some(&ids[1]));
    assert_eq!(carousel.current().as_ref(), Some(&ids[3]));
    assert!(!carousel.has_next());
    assert!(overlay.has_previous());
    assert_eq!(carousel.adjacent(1), vec![ids[2].clone(), ids[3].clone()]);
}

struct NeverSource;

#[async_trait::async_trait]
impl frame_engine::dispatch::ImageSource for NeverSource {
    async fn generate_image(
        &self,
        _seed: &str,
    ) -> Result<frame_engine::dispatch::GeneratedImage, frame_engine::error::DispatchError> {
        std::future::pending().await
    }
}
