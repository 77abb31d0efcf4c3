use std::collections::BTreeMap;

use serde_json::{Value, json};

pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Caller-supplied knobs for one transcription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionOptions {
    pub speech_model: String,
    pub language_code: Option<String>,
    pub speaker_labels: bool,
    pub speakers_expected: Option<u32>,
    pub min_speakers_expected: Option<u32>,
    pub max_speakers_expected: Option<u32>,
    pub keyterms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("unsupported speech model: {model}. Allowed: {allowed}")]
    UnsupportedSpeechModel { model: String, allowed: String },
    #[error("speakers_expected cannot be combined with min_speakers_expected or max_speakers_expected")]
    ConflictingSpeakerBounds,
    #[error("min_speakers_expected ({min}) exceeds max_speakers_expected ({max})")]
    InvertedSpeakerRange { min: u32, max: u32 },
}

/// Resolved speaker-count hint sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerExpectation {
    Unspecified,
    Exact(u32),
    Range { min: Option<u32>, max: Option<u32> },
}

impl TranscriptionOptions {
    pub fn new(speech_model: impl Into<String>) -> Self {
        Self {
            speech_model: speech_model.into(),
            language_code: None,
            speaker_labels: false,
            speakers_expected: None,
            min_speakers_expected: None,
            max_speakers_expected: None,
            keyterms: Vec::new(),
        }
    }

    pub fn validate(&self, allowed_models: &[String]) -> Result<(), OptionsError> {
        if !allowed_models.iter().any(|m| m == &self.speech_model) {
            return Err(OptionsError::UnsupportedSpeechModel {
                model: self.speech_model.clone(),
                allowed: allowed_models.join(", "),
            });
        }
        self.speaker_expectation().map(|_| ())
    }

    pub fn speaker_expectation(&self) -> Result<SpeakerExpectation, OptionsError> {
        let has_range =
            self.min_speakers_expected.is_some() || self.max_speakers_expected.is_some();

        match (self.speakers_expected, has_range) {
            (Some(_), true) => Err(OptionsError::ConflictingSpeakerBounds),
            (Some(count), false) => Ok(SpeakerExpectation::Exact(count)),
            (None, false) => Ok(SpeakerExpectation::Unspecified),
            (None, true) => {
                if let (Some(min), Some(max)) =
                    (self.min_speakers_expected, self.max_speakers_expected)
                {
                    if min > max {
                        return Err(OptionsError::InvertedSpeakerRange { min, max });
                    }
                }
                Ok(SpeakerExpectation::Range {
                    min: self.min_speakers_expected,
                    max: self.max_speakers_expected,
                })
            }
        }
    }

    /// Deterministic JSON descriptor with sorted keys, used for fingerprinting.
    pub fn canonical_descriptor(&self) -> Result<String, serde_json::Error> {
        let mut fields: BTreeMap<&str, Value> = BTreeMap::new();
        fields.insert("speech_model", json!(self.speech_model));
        fields.insert(
            "language_code",
            json!(
                self.language_code
                    .as_deref()
                    .unwrap_or(DEFAULT_LANGUAGE_CODE)
            ),
        );
        fields.insert("speaker_labels", json!(self.speaker_labels));
        fields.insert("speakers_expected", json!(self.speakers_expected));
        fields.insert("min_speakers_expected", json!(self.min_speakers_expected));
        fields.insert("max_speakers_expected", json!(self.max_speakers_expected));
        fields.insert(
            "keyterms_prompt",
            if self.keyterms.is_empty() {
                Value::Null
            } else {
                json!(self.keyterms)
            },
        );

        serde_json::to_string(&fields)
    }
}

/// Splits a comma-separated key-terms prompt, trimming entries and dropping blanks.
pub fn parse_keyterms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(String::from)
        .collect()
}
