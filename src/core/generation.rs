//! # Generation Settings
//!
//! The optional knobs sent along with a topic: tone, audience, length and
//! keywords. With nothing chosen the topic goes to the backend untouched;
//! otherwise it is expanded into a small structured prompt:
//!
//! ```text
//! Topic: Future of Agentic AI
//! Tone: Witty
//! Audience: Technical
//! Keywords: agents, tooling
//! Length: 1000 words
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::api::GenerateRequest;
use crate::core::state::SessionRef;

/// Word-count presets offered by the console.
pub const LENGTH_PRESETS: [u32; 4] = [500, 1000, 2500, 5000];

const DEFAULT_LENGTH: u32 = 1000;

#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[default]
    Professional,
    Witty,
    Casual,
    Formal,
    Experimental,
}

impl Tone {
    const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Witty,
        Tone::Casual,
        Tone::Formal,
        Tone::Experimental,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Witty => "Witty",
            Tone::Casual => "Casual",
            Tone::Formal => "Formal",
            Tone::Experimental => "Experimental",
        }
    }

    /// Cycles through every tone, then back to "unset".
    pub fn cycle(current: Option<Tone>) -> Option<Tone> {
        cycle_option(&Self::ALL, current)
    }
}

#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    #[default]
    General,
    Technical,
    CSuite,
    Creators,
    VentureScale,
}

impl Audience {
    const ALL: [Audience; 5] = [
        Audience::General,
        Audience::Technical,
        Audience::CSuite,
        Audience::Creators,
        Audience::VentureScale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Audience::General => "General",
            Audience::Technical => "Technical",
            Audience::CSuite => "C-Suite",
            Audience::Creators => "Creators",
            Audience::VentureScale => "Venture Scale",
        }
    }

    pub fn cycle(current: Option<Audience>) -> Option<Audience> {
        cycle_option(&Self::ALL, current)
    }
}

fn cycle_option<T: Copy + PartialEq>(all: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let idx = all.iter().position(|v| *v == value)?;
            all.get(idx + 1).copied()
        }
    }
}

/// Cycles length presets. A custom length from config restarts at the
/// first preset larger than it.
pub fn cycle_length(current: Option<u32>) -> Option<u32> {
    match current {
        None => LENGTH_PRESETS.first().copied(),
        Some(words) => LENGTH_PRESETS.iter().copied().find(|&p| p > words),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationSettings {
    pub tone: Option<Tone>,
    pub audience: Option<Audience>,
    pub length: Option<u32>,
    pub keywords: Option<String>,
}

impl GenerationSettings {
    /// True when no option has been chosen.
    pub fn is_plain(&self) -> bool {
        self.tone.is_none()
            && self.audience.is_none()
            && self.length.is_none()
            && self.keywords.as_deref().is_none_or(|k| k.trim().is_empty())
    }

    /// The text sent as `topic`.
    pub fn compose_topic(&self, topic: &str) -> String {
        let topic = topic.trim();
        if self.is_plain() {
            return topic.to_string();
        }
        format!(
            "Topic: {}\nTone: {}\nAudience: {}\nKeywords: {}\nLength: {} words",
            topic,
            self.tone.unwrap_or_default().label(),
            self.audience.unwrap_or_default().label(),
            self.keywords.as_deref().unwrap_or("").trim(),
            self.length.unwrap_or(DEFAULT_LENGTH),
        )
    }

    /// Short summary for the input box title.
    pub fn summary(&self) -> String {
        if self.is_plain() {
            return "default settings".to_string();
        }
        let mut parts = Vec::new();
        if let Some(tone) = self.tone {
            parts.push(format!("tone {}", tone.label()));
        }
        if let Some(audience) = self.audience {
            parts.push(format!("for {}", audience.label()));
        }
        if let Some(length) = self.length {
            parts.push(format!("{length} words"));
        }
        if let Some(keywords) = self.keywords.as_deref().filter(|k| !k.trim().is_empty()) {
            parts.push(format!("kw: {}", keywords.trim()));
        }
        parts.join(", ")
    }
}

/// Builds the request for one generation call.
pub fn build_request(
    topic: &str,
    settings: &GenerationSettings,
    user_id: i64,
    session: SessionRef,
) -> GenerateRequest {
    GenerateRequest {
        topic: settings.compose_topic(topic),
        user_id,
        chat_id: session.chat_id(),
    }
}
