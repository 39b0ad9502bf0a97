//! Text generation service seam
//!
//! Synthesis only needs "send an instruction and a message, get text back".
//! [`Generator`] is that seam; [`OllamaGenerator`] talks to a local Ollama
//! server and tests plug in scripted generators.

#[cfg(feature = "ollama")]
mod ollama;

use std::fmt;

use crate::error::Result;

#[cfg(feature = "ollama")]
pub use ollama::OllamaGenerator;

/// Which property a request generates. Each role has its own model settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorRole {
    Namer,
    ClassChooser,
    RarityChooser,
    StatChooser,
    StatTuner,
}

impl GeneratorRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namer => "namer",
            Self::ClassChooser => "class_chooser",
            Self::RarityChooser => "rarity_chooser",
            Self::StatChooser => "stat_chooser",
            Self::StatTuner => "stat_tuner",
        }
    }
}

impl fmt::Display for GeneratorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generation request: a system instruction plus one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub role: GeneratorRole,
    pub instruction: String,
    pub user_message: String,
}

impl GenerationRequest {
    pub fn new(
        role: GeneratorRole,
        instruction: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            role,
            instruction: instruction.into(),
            user_message: user_message.into(),
        }
    }
}

/// A text generation backend. One blocking call per request.
pub trait Generator {
    /// Produce free text for `request`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Generation`] when the service cannot answer.
    fn generate(&mut self, request: &GenerationRequest) -> Result<String>;
}

impl<G: Generator + ?Sized> Generator for &mut G {
    fn generate(&mut self, request: &GenerationRequest) -> Result<String> {
        (**self).generate(request)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&mut self, request: &GenerationRequest) -> Result<String> {
        (**self).generate(request)
    }
}
