//! Vocabulary encoders
//!
//! A vocabulary turns raw text into token IDs using the exact tokenization
//! policy it was built with. Unknown tokens map to the out-of-vocabulary
//! (OOV) ID and are never dropped, so the encoded length always equals the
//! token count. ID 0 is reserved for padding and never assigned to a token.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use veracity_core::{Artifact, EncodedSequence, Error, Result};

/// Characters replaced by the split string before splitting
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Frozen token to ID mapping
pub trait Vocabulary: Send + Sync {
    /// ID for a single token, or the OOV ID when the token is unknown
    fn lookup(&self, token: &str) -> u32;

    /// Encode text into one ID per token, in left-to-right order
    fn encode(&self, text: &str) -> Result<EncodedSequence>;

    /// The out-of-vocabulary sentinel ID
    fn oov_id(&self) -> u32;

    /// Number of known tokens
    fn len(&self) -> usize;

    /// Largest ID `encode` can emit
    fn max_id(&self) -> u32;

    /// Whether the vocabulary knows no tokens
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Word splitting rule the word-index vocabulary was built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationPolicy {
    /// Characters treated as separators
    pub filters: String,

    /// Lowercase text before splitting
    pub lower: bool,

    /// Separator string
    pub split: String,

    /// Every character is a token
    pub char_level: bool,
}

impl Default for TokenizationPolicy {
    fn default() -> Self {
        Self {
            filters: DEFAULT_FILTERS.to_string(),
            lower: true,
            split: " ".to_string(),
            char_level: false,
        }
    }
}

impl TokenizationPolicy {
    /// Split text into tokens.
    ///
    /// Filter characters become the split string, the result is split on
    /// that string and empty pieces are discarded. In character mode
    /// filters do not apply.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_owned()
        };

        if self.char_level {
            return text.chars().map(String::from).collect();
        }

        let mut replaced = String::with_capacity(text.len());
        for c in text.chars() {
            if self.filters.contains(c) {
                replaced.push_str(&self.split);
            } else {
                replaced.push(c);
            }
        }

        replaced
            .split(self.split.as_str())
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Word-index vocabulary with an explicit OOV token
#[derive(Debug, Clone)]
pub struct WordIndexVocabulary {
    word_index: HashMap<String, u32>,
    oov_token: String,
    oov_id: u32,
    num_words: Option<usize>,
    policy: TokenizationPolicy,
}

impl WordIndexVocabulary {
    /// Build a vocabulary from a word index.
    ///
    /// Fails when the OOV token has no ID, when any token is assigned the
    /// padding ID 0, or when the policy cannot split text.
    pub fn new(
        word_index: HashMap<String, u32>,
        oov_token: impl Into<String>,
        policy: TokenizationPolicy,
    ) -> Result<Self> {
        let oov_token = oov_token.into();

        let oov_id = *word_index.get(&oov_token).ok_or_else(|| {
            Error::startup_load(
                Artifact::Vocabulary,
                format!("OOV token '{}' has no ID in the word index", oov_token),
            )
        })?;

        if let Some((token, _)) = word_index.iter().find(|(_, &id)| id == 0) {
            return Err(Error::startup_load(
                Artifact::Vocabulary,
                format!("token '{}' uses ID 0, which is reserved for padding", token),
            ));
        }

        if !policy.char_level && policy.split.is_empty() {
            return Err(Error::startup_load(
                Artifact::Vocabulary,
                "split string must not be empty",
            ));
        }

        Ok(Self {
            word_index,
            oov_token,
            oov_id,
            num_words: None,
            policy,
        })
    }

    /// Keep only IDs below `num_words`; higher IDs encode as OOV.
    /// Zero means no limit.
    pub fn with_num_words(mut self, num_words: Option<usize>) -> Self {
        self.num_words = num_words.filter(|&limit| limit > 0);
        self
    }

    /// Load from a JSON file (see [`WordIndexVocabulary::from_json_str`])
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::startup_load(
                Artifact::Vocabulary,
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a vocabulary from JSON.
    ///
    /// Accepts the tokenizer export shape, whose `config` object carries
    /// `word_index` as either a JSON-encoded string or an object, as well as
    /// a flat object with the same fields at the top level.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(json).map_err(|e| {
            Error::startup_load(Artifact::Vocabulary, format!("invalid vocabulary JSON: {}", e))
        })?;

        let config = match file {
            VocabularyFile::Export { config } => config,
            VocabularyFile::Plain(config) => config,
        };

        let word_index = parse_word_index(config.word_index)?;
        let oov_token = config.oov_token.ok_or_else(|| {
            Error::startup_load(
                Artifact::Vocabulary,
                "vocabulary declares no OOV token; unknown words would be dropped",
            )
        })?;

        let policy = TokenizationPolicy {
            filters: config.filters,
            lower: config.lower,
            split: config.split,
            char_level: config.char_level,
        };

        Ok(Self::new(word_index, oov_token, policy)?.with_num_words(config.num_words))
    }

    /// The OOV token string
    pub fn oov_token(&self) -> &str {
        &self.oov_token
    }

    /// Tokenization policy in force
    pub fn policy(&self) -> &TokenizationPolicy {
        &self.policy
    }

    /// Optional ID ceiling
    pub fn num_words(&self) -> Option<usize> {
        self.num_words
    }

    fn within_limit(&self, id: u32) -> bool {
        self.num_words.map_or(true, |limit| (id as usize) < limit)
    }
}

impl Vocabulary for WordIndexVocabulary {
    fn lookup(&self, token: &str) -> u32 {
        match self.word_index.get(token) {
            Some(&id) if self.within_limit(id) => id,
            _ => self.oov_id,
        }
    }

    fn encode(&self, text: &str) -> Result<EncodedSequence> {
        let ids = self
            .policy
            .tokenize(text)
            .iter()
            .map(|token| self.lookup(token))
            .collect::<Vec<_>>();
        Ok(EncodedSequence::new(ids))
    }

    fn oov_id(&self) -> u32 {
        self.oov_id
    }

    fn len(&self) -> usize {
        match self.num_words {
            Some(limit) => self
                .word_index
                .values()
                .filter(|&&id| (id as usize) < limit)
                .count(),
            None => self.word_index.len(),
        }
    }

    fn max_id(&self) -> u32 {
        self.word_index
            .values()
            .copied()
            .filter(|&id| self.within_limit(id))
            .max()
            .map_or(self.oov_id, |id| id.max(self.oov_id))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VocabularyFile {
    Export { config: WordIndexConfig },
    Plain(WordIndexConfig),
}

#[derive(Deserialize)]
struct WordIndexConfig {
    word_index: serde_json::Value,

    #[serde(default)]
    oov_token: Option<String>,

    #[serde(default = "default_filters")]
    filters: String,

    #[serde(default = "default_true")]
    lower: bool,

    #[serde(default = "default_split")]
    split: String,

    #[serde(default)]
    char_level: bool,

    #[serde(default)]
    num_words: Option<usize>,
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_true() -> bool {
    true
}

fn default_split() -> String {
    " ".to_string()
}

fn parse_word_index(value: serde_json::Value) -> Result<HashMap<String, u32>> {
    let parsed = match value {
        serde_json::Value::String(encoded) => serde_json::from_str(&encoded),
        other => serde_json::from_value(other),
    };

    parsed.map_err(|e| {
        Error::startup_load(Artifact::Vocabulary, format!("invalid word_index: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> WordIndexVocabulary {
        let word_index = [("<OOV>", 1), ("stocks", 2), ("rally", 3), ("on", 4), ("earnings", 5)]
            .into_iter()
            .map(|(token, id)| (token.to_string(), id))
            .collect();
        WordIndexVocabulary::new(word_index, "<OOV>", TokenizationPolicy::default()).unwrap()
    }

    #[test]
    fn test_tokenize_lowercases_and_strips_filters() {
        let policy = TokenizationPolicy::default();
        assert_eq!(
            policy.tokenize("Stocks RALLY, on\tEarnings!!"),
            vec!["stocks", "rally", "on", "earnings"]
        );
    }

    #[test]
    fn test_tokenize_keeps_apostrophes() {
        let policy = TokenizationPolicy::default();
        assert_eq!(policy.tokenize("don't panic"), vec!["don't", "panic"]);
    }

    #[test]
    fn test_tokenize_char_level() {
        let policy = TokenizationPolicy {
            char_level: true,
            ..Default::default()
        };
        assert_eq!(policy.tokenize("Ab!"), vec!["a", "b", "!"]);
    }

    #[test]
    fn test_tokenize_empty_text() {
        assert!(TokenizationPolicy::default().tokenize("").is_empty());
        assert!(TokenizationPolicy::default().tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_unknown_tokens_map_to_oov() {
        let vocab = vocabulary();
        let encoded = vocab.encode("stocks plunge on earnings").unwrap();
        assert_eq!(encoded.as_slice(), &[2, 1, 4, 5]);
    }

    #[test]
    fn test_num_words_limit_maps_high_ids_to_oov() {
        let vocab = vocabulary().with_num_words(Some(4));
        assert_eq!(vocab.lookup("rally"), 3);
        assert_eq!(vocab.lookup("on"), 1);
        assert_eq!(vocab.lookup("earnings"), 1);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_zero_num_words_means_no_limit() {
        let vocab = vocabulary().with_num_words(Some(0));
        assert_eq!(vocab.num_words(), None);
        assert_eq!(vocab.lookup("earnings"), 5);
        assert_eq!(vocab.lookup("<OOV>"), 1);
        assert_eq!(vocab.len(), 5);
    }

    #[test]
    fn test_max_id_respects_num_words() {
        assert_eq!(vocabulary().max_id(), 5);
        assert_eq!(vocabulary().with_num_words(Some(4)).max_id(), 3);
        assert_eq!(vocabulary().with_num_words(Some(1)).max_id(), 1);
    }

    #[test]
    fn test_missing_oov_token_is_rejected() {
        let word_index = [("stocks".to_string(), 2)].into_iter().collect();
        let err = WordIndexVocabulary::new(word_index, "<OOV>", TokenizationPolicy::default())
            .unwrap_err();
        assert!(err.is_startup());
    }

    #[test]
    fn test_padding_id_is_reserved() {
        let word_index = [("<OOV>".to_string(), 1), ("the".to_string(), 0)]
            .into_iter()
            .collect();
        let err = WordIndexVocabulary::new(word_index, "<OOV>", TokenizationPolicy::default())
            .unwrap_err();
        assert!(err.to_string().contains("reserved for padding"));
    }

    #[test]
    fn test_parse_export_with_encoded_word_index() {
        let json = r##"{
            "class_name": "Tokenizer",
            "config": {
                "num_words": 10000,
                "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
                "lower": true,
                "split": " ",
                "char_level": false,
                "oov_token": "<OOV>",
                "document_count": 2,
                "word_counts": "{\"stocks\": 3}",
                "word_index": "{\"<OOV>\": 1, \"stocks\": 2, \"rally\": 3}"
            }
        }"##;

        let vocab = WordIndexVocabulary::from_json_str(json).unwrap();
        assert_eq!(vocab.oov_id(), 1);
        assert_eq!(vocab.num_words(), Some(10000));
        assert_eq!(vocab.encode("Stocks rally.").unwrap().as_slice(), &[2, 3]);
    }

    #[test]
    fn test_parse_plain_object() {
        let json = r#"{
            "oov_token": "[unk]",
            "lower": false,
            "word_index": {"[unk]": 1, "Senate": 2}
        }"#;

        let vocab = WordIndexVocabulary::from_json_str(json).unwrap();
        assert!(!vocab.policy().lower);
        assert_eq!(vocab.encode("Senate senate").unwrap().as_slice(), &[2, 1]);
    }

    #[test]
    fn test_parse_without_oov_token_fails() {
        let json = r#"{"word_index": {"stocks": 1}}"#;
        let err = WordIndexVocabulary::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("no OOV token"));
    }

    #[test]
    fn test_corrupt_json_is_startup_error() {
        let err = WordIndexVocabulary::from_json_str("{not json").unwrap_err();
        assert!(err.is_startup());
    }
}
