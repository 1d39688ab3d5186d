//! Vocabulary backed by a Hugging Face `tokenizer.json`

use crate::vocabulary::Vocabulary;
use std::path::Path;
use std::str::FromStr;
use tokenizers::Tokenizer;
use veracity_core::{Artifact, EncodedSequence, Error, Result};

/// Vocabulary whose tokenization policy is the serialized tokenizer's own
/// normalizer and pre-tokenizer. The configured unknown token is the OOV
/// sentinel. Special tokens are never added.
pub struct PretrainedTokenizerVocabulary {
    tokenizer: Tokenizer,
    unk_token: String,
    oov_id: u32,
}

impl PretrainedTokenizerVocabulary {
    /// Wrap a tokenizer, resolving the ID of its unknown token.
    ///
    /// Padding and truncation configured in the tokenizer are cleared so
    /// `encode` yields one ID per token.
    pub fn new(mut tokenizer: Tokenizer, unk_token: impl Into<String>) -> Result<Self> {
        let unk_token = unk_token.into();

        tokenizer.with_padding(None);
        tokenizer.with_truncation(None).map_err(|e| {
            Error::startup_load(
                Artifact::Vocabulary,
                format!("cannot disable tokenizer truncation: {}", e),
            )
        })?;

        let oov_id = tokenizer.token_to_id(&unk_token).ok_or_else(|| {
            Error::startup_load(
                Artifact::Vocabulary,
                format!("unknown token '{}' is not in the tokenizer vocabulary", unk_token),
            )
        })?;

        Ok(Self {
            tokenizer,
            unk_token,
            oov_id,
        })
    }

    /// Load a `tokenizer.json` file
    pub fn from_file(path: impl AsRef<Path>, unk_token: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            Error::startup_load(
                Artifact::Vocabulary,
                format!("failed to load tokenizer {}: {}", path.display(), e),
            )
        })?;
        Self::new(tokenizer, unk_token)
    }

    /// Parse a serialized tokenizer from a JSON string
    pub fn from_json_str(json: &str, unk_token: impl Into<String>) -> Result<Self> {
        let tokenizer = Tokenizer::from_str(json).map_err(|e| {
            Error::startup_load(Artifact::Vocabulary, format!("invalid tokenizer JSON: {}", e))
        })?;
        Self::new(tokenizer, unk_token)
    }

    /// The unknown token string
    pub fn unk_token(&self) -> &str {
        &self.unk_token
    }
}

impl Vocabulary for PretrainedTokenizerVocabulary {
    fn lookup(&self, token: &str) -> u32 {
        self.tokenizer.token_to_id(token).unwrap_or(self.oov_id)
    }

    fn encode(&self, text: &str) -> Result<EncodedSequence> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| Error::inference(format!("Tokenization failed: {}", e)))?;
        Ok(EncodedSequence::new(encoding.get_ids().to_vec()))
    }

    fn oov_id(&self) -> u32 {
        self.oov_id
    }

    fn len(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    fn max_id(&self) -> u32 {
        self.tokenizer
            .get_vocab(true)
            .values()
            .copied()
            .max()
            .map_or(self.oov_id, |id| id.max(self.oov_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENIZER_JSON: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": {"type": "Lowercase"},
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[PAD]": 0, "[UNK]": 1, "stocks": 2, "rally": 3},
            "unk_token": "[UNK]"
        }
    }"#;

    #[test]
    fn test_encode_maps_unknown_words_to_unk() {
        let vocab = PretrainedTokenizerVocabulary::from_json_str(TOKENIZER_JSON, "[UNK]").unwrap();
        assert_eq!(vocab.oov_id(), 1);

        let encoded = vocab.encode("Stocks rally today").unwrap();
        assert_eq!(encoded.as_slice(), &[2, 3, 1]);
    }

    #[test]
    fn test_lookup_unknown_token() {
        let vocab = PretrainedTokenizerVocabulary::from_json_str(TOKENIZER_JSON, "[UNK]").unwrap();
        assert_eq!(vocab.lookup("rally"), 3);
        assert_eq!(vocab.lookup("plunge"), 1);
    }

    #[test]
    fn test_max_id() {
        let vocab = PretrainedTokenizerVocabulary::from_json_str(TOKENIZER_JSON, "[UNK]").unwrap();
        assert_eq!(vocab.max_id(), 3);
    }

    #[test]
    fn test_serialized_padding_and_truncation_are_ignored() {
        let json = TOKENIZER_JSON
            .replace(
                r#""truncation": null"#,
                r#""truncation": {"direction": "Right", "max_length": 2, "strategy": "LongestFirst", "stride": 0}"#,
            )
            .replace(
                r#""padding": null"#,
                r#""padding": {"strategy": {"Fixed": 8}, "direction": "Right", "pad_to_multiple_of": null, "pad_id": 0, "pad_type_id": 0, "pad_token": "[PAD]"}"#,
            );

        let vocab = PretrainedTokenizerVocabulary::from_json_str(&json, "[UNK]").unwrap();
        let encoded = vocab.encode("Stocks rally today").unwrap();
        assert_eq!(encoded.as_slice(), &[2, 3, 1]);
    }

    #[test]
    fn test_missing_unk_token_is_rejected() {
        let err = PretrainedTokenizerVocabulary::from_json_str(TOKENIZER_JSON, "<unk>")
            .err()
            .unwrap();
        assert!(err.is_startup());
    }
}
