//! Frame Engine: Procedural Frame Images and Gallery State
//!
//! Deterministic, seed-driven image synthesis, a bounded generation
//! dispatcher that keeps synthesis off the async runtime, a frame store with
//! selection and grid density, and per-view navigation cursors.

pub mod cli;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod logging;
pub mod pattern;

pub use cursor::NavigationCursor;
pub use dispatch::{Dispatcher, DispatcherConfig, GeneratedImage, ImageSource};
pub use error::{DispatchError, EngineError, SynthesisError};
pub use frame::{Frame, FrameId, FrameStore, FrameUpdate};
