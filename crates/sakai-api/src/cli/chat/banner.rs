//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(model: &str, personality: Option<&str>, has_memory: bool) {
    println!();
    println!("  {} {}", style("*").magenta(), style("Sakai").magenta().bold());
    println!("  {}", style("Ton assistant IA, en français.").dim());
    println!();
    println!("  {}  {}", style("Modèle :").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Personnalité :").bold(),
        style(personality.unwrap_or("par défaut")).dim()
    );
    if has_memory {
        println!("  {}  {}", style("Mémoire :").bold(), style("active").dim());
    }
    println!();
    println!(
        "  {}",
        style("Tape /help pour les commandes, Ctrl+D pour quitter").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
