//! `sakai prompt`: show the composed system instruction.

use chrono::NaiveDate;

use sakai_core::prompt::{system_instruction_for, today};

use super::PromptArgs;

/// Compose the instruction for `args` on `date` (today when `None`) and
/// print it, raw or as `{"date", "systemInstruction"}` JSON.
pub fn print_prompt(args: &PromptArgs, date: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let date = date.unwrap_or_else(today);
    let instruction = system_instruction_for(&args.to_request(None), date);

    if json {
        let value = serde_json::json!({
            "date": date.to_string(),
            "systemInstruction": instruction,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{instruction}");
    }
    Ok(())
}
