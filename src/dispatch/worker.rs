//! Synthesis worker thread.
//!
//! A single long-lived OS thread hosts the synthesizer. Callers hand it an
//! encoded request together with a private reply channel; the worker answers
//! each envelope on the channel it arrived with.

use super::protocol::{self, SynthesisRequest, SynthesisResponse};
use crate::error::{DispatchError, SynthesisError};
use crate::pattern::SynthesizedImage;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;
use tracing::{debug, error};

const WORKER_THREAD_NAME: &str = "frame-synth";

/// Synthesis function run on the worker thread.
pub type SynthesizeFn =
    dyn FnMut(&SynthesisRequest) -> Result<SynthesizedImage, SynthesisError> + Send;

pub(crate) type Reply = Result<Vec<u8>, DispatchError>;

pub(crate) struct Envelope {
    pub payload: Vec<u8>,
    pub reply: oneshot::Sender<Reply>,
}

pub(crate) struct SynthesisWorker {
    sender: Mutex<Option<mpsc::Sender<Envelope>>>,
    terminated: Arc<AtomicBool>,
}

impl SynthesisWorker {
    pub fn spawn(synthesize: Box<SynthesizeFn>) -> Result<Self, DispatchError> {
        let (sender, receiver) = mpsc::channel();
        let terminated = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&terminated);

        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(receiver, synthesize, flag))?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            terminated,
        })
    }

    /// Hand an envelope to the worker. Returns false once the worker is gone.
    pub fn submit(&self, envelope: Envelope) -> bool {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(envelope).is_ok(),
            None => false,
        }
    }

    /// Stop the worker without waiting for it. Replies still owed are dropped.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::Release);
        self.sender.lock().take();
    }
}

fn run(
    receiver: mpsc::Receiver<Envelope>,
    mut synthesize: Box<SynthesizeFn>,
    terminated: Arc<AtomicBool>,
) {
    debug!("Synthesis worker started");
    while let Ok(envelope) = receiver.recv() {
        if terminated.load(Ordering::Acquire) {
            break;
        }
        let reply = handle(&envelope.payload, synthesize.as_mut());
        if terminated.load(Ordering::Acquire) {
            break;
        }
        // The caller may have stopped waiting; nothing to do then.
        let _ = envelope.reply.send(reply);
    }
    debug!("Synthesis worker stopped");
}

fn handle(payload: &[u8], synthesize: &mut SynthesizeFn) -> Reply {
    let request = protocol::decode_request(payload)?;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| synthesize(&request)));
    let image = match outcome {
        Ok(result) => result?,
        Err(_) => {
            error!(seed = %request.seed, "Synthesizer panicked");
            return Err(DispatchError::Synthesis("synthesizer panicked".to_string()));
        }
    };
    protocol::encode_response(&SynthesisResponse::new(image.png, image.width, image.height))
}
