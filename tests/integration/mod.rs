//! Integration tests for the frame engine

mod dispatcher_concurrency;
mod frame_store;
mod navigation;
