//! System instruction composition.
//!
//! A [`PromptContext`] is built fresh for every chat request and handed to
//! [`SystemPromptComposer::compose`], which turns it into the single
//! instruction string sent upstream.

pub mod composer;
pub mod date;
pub mod persona;

use chrono::NaiveDate;

use sakai_types::chat::ChatRequest;
use sakai_types::persona::Personality;

pub use composer::SystemPromptComposer;

/// Everything the composer needs for one request.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub base_persona: &'a str,
    pub personality: Option<Personality>,
    /// Developer-mode replacement for the base persona.
    pub override_prompt: Option<&'a str>,
    pub memory: Option<&'a str>,
    pub date: NaiveDate,
}

impl<'a> PromptContext<'a> {
    /// Default persona, no options.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            base_persona: persona::BASE_PERSONA,
            personality: None,
            override_prompt: None,
            memory: None,
            date,
        }
    }

    /// Context for a chat request. Unknown personality tags select the
    /// default persona.
    pub fn from_request(request: &'a ChatRequest, date: NaiveDate) -> Self {
        Self {
            personality: request
                .personality
                .as_deref()
                .and_then(Personality::from_tag),
            override_prompt: request.override_system_prompt.as_deref(),
            memory: request.memory.as_deref(),
            ..Self::new(date)
        }
    }

    /// The override, unless it is absent or blank.
    pub fn effective_override(&self) -> Option<&'a str> {
        self.override_prompt.filter(|text| !text.trim().is_empty())
    }
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Compose the system instruction for a chat request.
pub fn system_instruction_for(request: &ChatRequest, date: NaiveDate) -> String {
    SystemPromptComposer::compose(&PromptContext::from_request(request, date))
}
