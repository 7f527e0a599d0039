//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for the
//! conversation, help, and memory.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Forget the conversation and start over.
    New,
    /// Show the conversation so far.
    History,
    /// Append a fact to the user memory sent with every request.
    Remember(String),
    /// Show the memory sent with every request.
    Memory,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "/help" | "/aide" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" | "/nouveau" => Some(ChatCommand::New),
        "/history" | "/historique" => Some(ChatCommand::History),
        "/memory" | "/memoire" => Some(ChatCommand::Memory),
        "/remember" | "/rem" => {
            if arg.is_empty() {
                Some(ChatCommand::Unknown("/remember exige un fait".to_string()))
            } else {
                Some(ChatCommand::Remember(arg.to_string()))
            }
        }
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Commandes disponibles :").bold());
    println!();
    println!("  {}      Afficher cette aide", style("/help").cyan());
    println!("  {}     Effacer l'écran", style("/clear").cyan());
    println!("  {}      Quitter", style("/exit").cyan());
    println!("  {}       Nouvelle conversation", style("/new").cyan());
    println!("  {}   Afficher la conversation", style("/history").cyan());
    println!("  {}    Afficher la mémoire", style("/memory").cyan());
    println!("  {}  Ajouter un fait à la mémoire", style("/remember").cyan());
    println!();
    println!("  {}", style("Ctrl+D pour quitter").dim());
    println!();
}
