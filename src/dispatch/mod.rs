//! Generation Dispatcher
//!
//! Offloads synthesis to a dedicated worker thread and bounds the number of
//! requests in flight with a counting semaphore. Waiters are woken as soon as
//! a completing request releases its slot.

pub mod protocol;
mod worker;

pub use worker::SynthesizeFn;

use crate::error::{DispatchError, SynthesisError};
use crate::pattern::{self, SynthesizedImage, DEFAULT_MAX_DIMENSION};
use async_trait::async_trait;
use parking_lot::Mutex;
use protocol::SynthesisRequest;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Semaphore, SemaphorePermit};
use tracing::{debug, info, warn};
use worker::{Envelope, SynthesisWorker};

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Admission ceiling: requests allowed in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Longer side of generated images, in pixels
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

fn default_max_concurrent() -> usize {
    4
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            max_dimension: default_max_dimension(),
        }
    }
}

impl DispatcherConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent == 0 {
            return Err("max_concurrent must be at least 1".to_string());
        }
        if self.max_dimension == 0 || self.max_dimension > pattern::MAX_DIMENSION_LIMIT {
            return Err(format!(
                "max_dimension must be between 1 and {}",
                pattern::MAX_DIMENSION_LIMIT
            ));
        }
        Ok(())
    }
}

/// A generated image ready to attach to a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub data_url: Arc<str>,
    pub width: u32,
    pub height: u32,
}

/// Source of frame images.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn generate_image(&self, seed: &str) -> Result<GeneratedImage, DispatchError>;
}

/// Handle to a dispatcher. Clones share the same worker and admission set.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    config: DispatcherConfig,
    worker: SynthesisWorker,
    admission: Semaphore,
    /// Ids currently holding a slot, with multiplicity.
    in_flight: Mutex<HashMap<String, usize>>,
    active: AtomicUsize,
    peak: AtomicUsize,
    disposed: AtomicBool,
}

impl Dispatcher {
    /// Start a dispatcher backed by the pattern synthesizer.
    pub fn new(config: DispatcherConfig) -> Result<Self, DispatchError> {
        let mut rng = StdRng::from_entropy();
        Self::with_synthesizer(config, move |request: &SynthesisRequest| {
            pattern::synthesize(&request.seed, request.max_dimension, &mut rng)
        })
    }

    /// Start a dispatcher with a custom synthesis function.
    pub fn with_synthesizer<F>(config: DispatcherConfig, synthesize: F) -> Result<Self, DispatchError>
    where
        F: FnMut(&SynthesisRequest) -> Result<SynthesizedImage, SynthesisError> + Send + 'static,
    {
        let permits = if config.max_concurrent == 0 {
            warn!("max_concurrent is 0, admitting one request at a time");
            1
        } else {
            config.max_concurrent
        };
        let worker = SynthesisWorker::spawn(Box::new(synthesize))?;
        info!(
            max_concurrent = permits,
            max_dimension = config.max_dimension,
            "Generation dispatcher started"
        );

        Ok(Self {
            inner: Arc::new(DispatcherInner {
                config,
                worker,
                admission: Semaphore::new(permits),
                in_flight: Mutex::new(HashMap::new()),
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                disposed: AtomicBool::new(false),
            }),
        })
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.inner.config
    }

    /// Generate an image for `id`.
    ///
    /// Waits for a free admission slot, then for the worker's reply. After
    /// [`dispose`](Self::dispose) the returned future never completes.
    pub async fn request_image(&self, id: &str) -> Result<GeneratedImage, DispatchError> {
        let inner = &*self.inner;
        if inner.is_disposed() {
            return abandon(id).await;
        }

        let permit = match inner.admission.acquire().await {
            Ok(permit) => permit,
            Err(_) => return abandon(id).await,
        };
        let _slot = AdmissionSlot::register(inner, id, permit);

        let payload = protocol::encode_request(&SynthesisRequest::new(id, inner.config.max_dimension))?;
        let (reply_tx, reply_rx) = oneshot::channel();
        if !inner.worker.submit(Envelope {
            payload,
            reply: reply_tx,
        }) {
            if inner.is_disposed() {
                return abandon(id).await;
            }
            return Err(DispatchError::WorkerUnavailable);
        }

        let reply = match reply_rx.await {
            Ok(reply) => reply,
            Err(_) if inner.is_disposed() => return abandon(id).await,
            Err(_) => return Err(DispatchError::WorkerUnavailable),
        };
        let response = protocol::decode_response(&reply?)?;
        debug!(id, width = response.width, height = response.height, "Image generated");

        Ok(GeneratedImage {
            data_url: Arc::from(pattern::png_data_url(&response.image)),
            width: response.width,
            height: response.height,
        })
    }

    /// Terminate the worker immediately. Requests still waiting are abandoned.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.shutdown();
        info!(
            abandoned = self.in_flight(),
            "Generation dispatcher disposed"
        );
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Number of requests currently holding an admission slot.
    pub fn in_flight(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Highest number of simultaneously admitted requests so far.
    pub fn peak_in_flight(&self) -> usize {
        self.inner.peak.load(Ordering::Acquire)
    }

    /// Ids currently holding an admission slot.
    pub fn in_flight_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.in_flight.lock().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl ImageSource for Dispatcher {
    async fn generate_image(&self, seed: &str) -> Result<GeneratedImage, DispatchError> {
        self.request_image(seed).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.inner.config)
            .field("in_flight", &self.in_flight())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl DispatcherInner {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn shutdown(&self) {
        self.worker.terminate();
        self.admission.close();
    }
}

impl Drop for DispatcherInner {
    fn drop(&mut self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            self.shutdown();
        }
    }
}

/// An occupied admission slot. Dropping it (on success, error or
/// cancellation) removes the id and then returns the permit.
struct AdmissionSlot<'a> {
    inner: &'a DispatcherInner,
    id: String,
    _permit: SemaphorePermit<'a>,
}

impl<'a> AdmissionSlot<'a> {
    fn register(inner: &'a DispatcherInner, id: &str, permit: SemaphorePermit<'a>) -> Self {
        *inner.in_flight.lock().entry(id.to_string()).or_insert(0) += 1;
        let active = inner.active.fetch_add(1, Ordering::AcqRel) + 1;
        inner.peak.fetch_max(active, Ordering::AcqRel);
        debug!(id, active, "Admitted generation request");
        Self {
            inner,
            id: id.to_string(),
            _permit: permit,
        }
    }
}

impl Drop for AdmissionSlot<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.inner.in_flight.lock();
        if let Some(count) = in_flight.get_mut(&self.id) {
            *count -= 1;
            if *count == 0 {
                in_flight.remove(&self.id);
            }
        }
        self.inner.active.fetch_sub(1, Ordering::AcqRel);
    }
}

async fn abandon<T>(id: &str) -> T {
    debug!(id, "Dispatcher disposed, request abandoned");
    std::future::pending().await
}
