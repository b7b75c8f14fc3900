//! Fixed generation settings attached to every chat endpoint.
//!
//! The voice server reads its persona and sampling configuration from the
//! query string of the chat socket. The hub exposes no control over these
//! values: [`ChatParams::DEFAULT`] is the only parameter set ever sent.

use serde::Serialize;

/// Default persona prompt sent to the voice server.
pub const DEFAULT_TEXT_PROMPT: &str = "You enjoy having a good conversation.";

/// Default voice preset identifier.
pub const DEFAULT_VOICE: &str = "NATF0.pt";

/// Number of query parameters appended to the chat endpoint.
pub const CHAT_PARAM_COUNT: usize = 11;

/// Generation and voice settings encoded into the chat endpoint query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChatParams {
    /// Persona prompt text.
    pub text_prompt: &'static str,
    /// Voice preset file name.
    pub voice_prompt: &'static str,
    /// Sampling temperature for the text channel.
    pub text_temperature: f64,
    /// Top-k cutoff for the text channel.
    pub text_topk: u32,
    /// Sampling temperature for the audio channel.
    pub audio_temperature: f64,
    /// Top-k cutoff for the audio channel.
    pub audio_topk: u32,
    /// Padding multiplier.
    pub pad_mult: f64,
    /// Seed for the text sampler.
    pub text_seed: u64,
    /// Seed for the audio sampler.
    pub audio_seed: u64,
    /// Window (in tokens) the repetition penalty looks back over.
    pub repetition_penalty_context: u32,
    /// Repetition penalty factor.
    pub repetition_penalty: f64,
}

impl ChatParams {
    /// The parameter set used for every chat endpoint.
    pub const DEFAULT: Self = Self {
        text_prompt: DEFAULT_TEXT_PROMPT,
        voice_prompt: DEFAULT_VOICE,
        text_temperature: 0.8,
        text_topk: 40,
        audio_temperature: 0.8,
        audio_topk: 40,
        pad_mult: 1.0,
        text_seed: 42,
        audio_seed: 42,
        repetition_penalty_context: 16,
        repetition_penalty: 1.1,
    };

    /// Returns the parameters as ordered `(name, value)` query pairs.
    ///
    /// Floats use Rust's shortest round-trip formatting, so `1.0` renders
    /// as `"1"` and `1.1` as `"1.1"`.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); CHAT_PARAM_COUNT] {
        [
            ("text_prompt", self.text_prompt.to_string()),
            ("voice_prompt", self.voice_prompt.to_string()),
            ("text_temperature", self.text_temperature.to_string()),
            ("text_topk", self.text_topk.to_string()),
            ("audio_temperature", self.audio_temperature.to_string()),
            ("audio_topk", self.audio_topk.to_string()),
            ("pad_mult", self.pad_mult.to_string()),
            ("text_seed", self.text_seed.to_string()),
            ("audio_seed", self.audio_seed.to_string()),
            (
                "repetition_penalty_context",
                self.repetition_penalty_context.to_string(),
            ),
            ("repetition_penalty", self.repetition_penalty.to_string()),
        ]
    }

    /// Returns `true` if `name` is one of the managed query parameters.
    #[must_use]
    pub fn is_managed(&self, name: &str) -> bool {
        self.query_pairs().iter().any(|(key, _)| *key == name)
    }
}

impl Default for ChatParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
