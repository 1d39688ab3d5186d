//! GRU sequence classifier (Candle)
//!
//! Architecture: embedding -> single-layer GRU over the whole sequence ->
//! dense layer on the final hidden state -> sigmoid.

use crate::classifier::SequenceClassifier;
use candle_core::{DType, Device, Tensor};
use candle_nn::rnn::{gru, GRUConfig, GRU, RNN};
use candle_nn::{embedding, linear, Embedding, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use veracity_core::{Artifact, Error, Result};

/// Layer sizes, read from the architecture JSON shipped with the weights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GruArchitecture {
    /// Rows of the embedding table (highest token ID + 1)
    pub vocab_size: usize,

    /// Embedding width
    pub embedding_dim: usize,

    /// GRU hidden state width
    pub hidden_size: usize,

    /// Sequence length the model was exported for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_length: Option<usize>,
}

impl GruArchitecture {
    /// Load the architecture from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::startup_load(
                Artifact::Classifier,
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            Error::startup_load(
                Artifact::Classifier,
                format!("invalid architecture JSON: {}", e),
            )
        })
    }
}

/// Frozen GRU binary classifier
pub struct GruClassifier {
    name: String,
    architecture: GruArchitecture,
    embedding: Embedding,
    gru: GRU,
    dense: Linear,
    device: Device,
}

impl GruClassifier {
    /// Load weights from a safetensors file
    pub fn load(
        name: impl Into<String>,
        weights_path: impl AsRef<Path>,
        architecture: GruArchitecture,
        device: Device,
    ) -> Result<Self> {
        let weights_path = weights_path.as_ref();
        if !weights_path.exists() {
            return Err(Error::startup_load(
                Artifact::Classifier,
                format!("weights file not found: {}", weights_path.display()),
            ));
        }

        // SAFETY: the weights file is treated as immutable for the process lifetime
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(load_error)?
        };

        Self::from_var_builder(name, architecture, vb)
    }

    /// Build the model from an existing VarBuilder
    pub fn from_var_builder(
        name: impl Into<String>,
        architecture: GruArchitecture,
        vb: VarBuilder,
    ) -> Result<Self> {
        let device = vb.device().clone();

        let embedding = embedding(
            architecture.vocab_size,
            architecture.embedding_dim,
            vb.pp("embedding"),
        )
        .map_err(load_error)?;

        let gru = gru(
            architecture.embedding_dim,
            architecture.hidden_size,
            GRUConfig::default(),
            vb.pp("gru"),
        )
        .map_err(load_error)?;

        let dense = linear(architecture.hidden_size, 1, vb.pp("dense")).map_err(load_error)?;

        let name = name.into();
        tracing::info!(
            "Loaded GRU classifier '{}' (vocab={}, embedding={}, hidden={})",
            name,
            architecture.vocab_size,
            architecture.embedding_dim,
            architecture.hidden_size
        );

        Ok(Self {
            name,
            architecture,
            embedding,
            gru,
            dense,
            device,
        })
    }

    /// Layer sizes
    pub fn architecture(&self) -> &GruArchitecture {
        &self.architecture
    }

    fn forward(&self, ids: &[u32]) -> candle_core::Result<f32> {
        let input = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let embedded = self.embedding.forward(&input)?;

        let states = self.gru.seq(&embedded)?;
        let last = match states.last() {
            Some(state) => state.h().clone(),
            None => self.gru.zero_state(1)?.h().clone(),
        };

        let logits = self.dense.forward(&last)?;
        let probability = candle_nn::ops::sigmoid(&logits)?;
        probability.flatten_all()?.get(0)?.to_scalar::<f32>()
    }
}

impl SequenceClassifier for GruClassifier {
    fn score(&self, ids: &[u32]) -> Result<f32> {
        if let Some(expected) = self.architecture.input_length {
            if ids.len() != expected {
                return Err(Error::inference(format!(
                    "expected {} input IDs, got {}",
                    expected,
                    ids.len()
                )));
            }
        }

        if let Some(&id) = ids.iter().find(|&&id| id as usize >= self.architecture.vocab_size) {
            return Err(Error::inference(format!(
                "token ID {} is outside the embedding table ({} rows)",
                id, self.architecture.vocab_size
            )));
        }

        self.forward(ids)
            .map_err(|e| Error::inference(format!("Model forward pass failed: {}", e)))
    }

    fn input_length(&self) -> Option<usize> {
        self.architecture.input_length
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn load_error(e: candle_core::Error) -> Error {
    Error::startup_load(Artifact::Classifier, format!("Failed to load weights: {}", e))
}
