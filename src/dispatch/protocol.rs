//! Message schema between the dispatcher and the synthesis worker.
//!
//! Requests and responses cross the thread boundary as `bincode` payloads and
//! are validated on receipt by each side.

use crate::error::DispatchError;
use crate::pattern::MAX_DIMENSION_LIMIT;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub version: u16,
    pub seed: String,
    pub max_dimension: u32,
}

impl SynthesisRequest {
    pub fn new(seed: impl Into<String>, max_dimension: u32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            seed: seed.into(),
            max_dimension,
        }
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        check_version(self.version)?;
        if self.max_dimension == 0 || self.max_dimension > MAX_DIMENSION_LIMIT {
            return Err(DispatchError::Protocol(format!(
                "max_dimension {} outside 1..={}",
                self.max_dimension, MAX_DIMENSION_LIMIT
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResponse {
    pub version: u16,
    /// PNG bytes.
    pub image: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SynthesisResponse {
    pub fn new(image: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            image,
            width,
            height,
        }
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        check_version(self.version)?;
        if self.image.is_empty() {
            return Err(DispatchError::Protocol("empty image payload".to_string()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(DispatchError::Protocol(format!(
                "non-positive dimensions {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

fn check_version(version: u16) -> Result<(), DispatchError> {
    if version != PROTOCOL_VERSION {
        return Err(DispatchError::Protocol(format!(
            "unsupported protocol version {} (expected {})",
            version, PROTOCOL_VERSION
        )));
    }
    Ok(())
}

pub fn encode_request(request: &SynthesisRequest) -> Result<Vec<u8>, DispatchError> {
    request.validate()?;
    Ok(bincode::serialize(request)?)
}

pub fn decode_request(payload: &[u8]) -> Result<SynthesisRequest, DispatchError> {
    let request: SynthesisRequest = bincode::deserialize(payload)?;
    request.validate()?;
    Ok(request)
}

pub fn encode_response(response: &SynthesisResponse) -> Result<Vec<u8>, DispatchError> {
    response.validate()?;
    Ok(bincode::serialize(response)?)
}

pub fn decode_response(payload: &[u8]) -> Result<SynthesisResponse, DispatchError> {
    let response: SynthesisResponse = bincode::deserialize(payload)?;
    response.validate()?;
    Ok(response)
}
