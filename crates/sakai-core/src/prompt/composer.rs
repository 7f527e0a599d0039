//! SystemPromptComposer -- assembles the system instruction.
//!
//! Section order:
//! 1. Override text, or the base persona followed by the personality addendum
//! 2. Date notice (skipped when an override already states the date)
//! 3. User memory block, when non-blank

use super::PromptContext;
use super::date::{date_notice, mentions_current_date};
use super::persona::persona_addendum;

/// Opening tag of the user memory block.
pub const MEMORY_OPEN: &str = "<memoire_utilisateur>";

/// Closing tag of the user memory block.
pub const MEMORY_CLOSE: &str = "</memoire_utilisateur>";

const MEMORY_HEADER: &str =
    "Voici ce que tu sais de l'utilisateur. Sers-t'en pour personnaliser tes réponses \
sans le lui rappeler systématiquement :";

/// Builds the instruction string sent as the model's system instruction.
pub struct SystemPromptComposer;

impl SystemPromptComposer {
    /// Compose the full instruction for `ctx`. Pure given `ctx.date`.
    pub fn compose(ctx: &PromptContext<'_>) -> String {
        let mut sections: Vec<String> = Vec::with_capacity(4);

        match ctx.effective_override() {
            Some(text) => {
                sections.push(text.to_string());
                if !mentions_current_date(text) {
                    sections.push(date_notice(ctx.date));
                }
            }
            None => {
                sections.push(ctx.base_persona.to_string());
                if let Some(personality) = ctx.personality {
                    sections.push(persona_addendum(personality).to_string());
                }
                sections.push(date_notice(ctx.date));
            }
        }

        if let Some(memory) = ctx.memory.map(str::trim).filter(|m| !m.is_empty()) {
            sections.push(Self::memory_block(memory));
        }

        sections.join("\n\n")
    }

    fn memory_block(memory: &str) -> String {
        format!("{MEMORY_OPEN}\n{MEMORY_HEADER}\n{memory}\n{MEMORY_CLOSE}")
    }
}
