//! Main chat loop orchestration.
//!
//! Coordinates the terminal conversation: welcome banner, input loop with
//! streamed replies, slash commands, and title generation after the first
//! exchange. History lives only in memory for the duration of the session.

use std::io::Write;
use std::time::{Duration, Instant};

use console::style;
use crossterm::cursor::MoveUp;
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;
use futures_util::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use sakai_core::chat::title::generate_title;
use sakai_core::llm::provider::GenerativeModel;
use sakai_types::chat::{ChatRequest, StreamChunk};
use sakai_types::message::{ConversationMessage, Role};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

const THINKING_MESSAGE: &str = "Sakai réfléchit...";

/// Characters of each message shown by `/history`.
const HISTORY_PREVIEW_CHARS: usize = 100;

/// How one streamed turn ended.
#[derive(Debug, PartialEq)]
pub enum TurnOutcome {
    /// The stream ended normally with this reply (possibly empty).
    Reply(String),
    /// An error chunk arrived after `partial` had been received.
    Failed { partial: String, message: String },
}

/// Drain `chunks`, handing each text fragment to `on_text` as it arrives.
///
/// Stops at the first error chunk.
pub async fn consume_chunks<S>(chunks: S, mut on_text: impl FnMut(&str)) -> TurnOutcome
where
    S: Stream<Item = StreamChunk>,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut reply = String::new();

    while let Some(chunk) = chunks.next().await {
        match chunk {
            StreamChunk::Text(text) => {
                on_text(&text);
                reply.push_str(&text);
            }
            StreamChunk::Error(message) => {
                return TurnOutcome::Failed {
                    partial: reply,
                    message,
                };
            }
        }
    }

    TurnOutcome::Reply(reply)
}

/// In-memory conversation: prompt options plus the history sent each turn.
#[derive(Debug, Clone)]
pub struct Conversation {
    request: ChatRequest,
    title: Option<String>,
}

impl Conversation {
    /// Start a conversation from a request carrying the prompt options.
    /// Any history in `template` is discarded.
    pub fn new(mut template: ChatRequest) -> Self {
        template.history.clear();
        Self {
            request: template,
            title: None,
        }
    }

    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    pub fn history(&self) -> &[ConversationMessage] {
        &self.request.history
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn push_user(&mut self, text: &str) {
        self.request.history.push(ConversationMessage::user(text));
    }

    pub fn push_model(&mut self, text: &str) {
        self.request.history.push(ConversationMessage::model(text));
    }

    /// Store the model's reply to the trailing user turn. A blank reply is
    /// not kept and the user turn is dropped with it, so two user turns
    /// never follow each other. Returns whether the reply was kept.
    pub fn record_reply(&mut self, reply: &str) -> bool {
        if reply.trim().is_empty() {
            self.discard_unanswered();
            return false;
        }
        self.push_model(reply);
        true
    }

    /// Drop the trailing user turn after a failed reply, so the next
    /// message does not follow an unanswered one.
    pub fn discard_unanswered(&mut self) {
        if self
            .request
            .history
            .last()
            .is_some_and(|m| m.role == Role::User)
        {
            self.request.history.pop();
        }
    }

    /// Forget the history and title, keeping prompt options and memory.
    pub fn reset(&mut self) {
        self.request.history.clear();
        self.title = None;
    }

    /// Append a fact to the user memory as a bullet line.
    pub fn remember(&mut self, fact: &str) {
        let line = format!("- {}", fact.trim());
        self.request.memory = Some(match self.request.memory.take() {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}\n{line}", existing.trim_end())
            }
            _ => line,
        });
    }

    /// The first exchange, once it exists and no title was generated yet.
    pub fn untitled_first_exchange(&self) -> Option<(String, String)> {
        match (self.title.as_ref(), self.request.history.as_slice()) {
            (None, [user, model]) if user.role == Role::User && model.role == Role::Model => {
                Some((user.text_content(), model.text_content()))
            }
            _ => None,
        }
    }

    pub fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState, template: ChatRequest) -> anyhow::Result<()> {
    let mut conversation = Conversation::new(template);
    let renderer = ChatRenderer::new();
    let model_name = state.model.model().to_string();

    print_welcome_banner(
        &model_name,
        conversation.request().personality.as_deref(),
        conversation.request().memory.is_some(),
    );

    let prompt = format!("  {} ", style("Toi >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("À bientôt !").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Ctrl+D pour quitter, ou continue à écrire.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("À bientôt !").dim());
                    break;
                }
                ChatCommand::New => {
                    conversation.reset();
                    println!("\n  {} Nouvelle conversation.\n", style("*").magenta().bold());
                }
                ChatCommand::History => print_history(&conversation),
                ChatCommand::Memory => match conversation.request().memory.as_deref() {
                    Some(memory) if !memory.trim().is_empty() => {
                        println!("\n{}\n", style(memory).dim());
                    }
                    _ => println!("\n  {}\n", style("Mémoire vide.").dim()),
                },
                ChatCommand::Remember(fact) => {
                    conversation.remember(&fact);
                    println!(
                        "\n  {} Retenu : {}\n",
                        style("*").magenta().bold(),
                        style(&fact).dim()
                    );
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Commande inconnue : {}. Tape /help pour la liste.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        conversation.push_user(&text);
        let start_time = Instant::now();
        let chunks = state.relay.stream_chat(conversation.request());

        let spinner = thinking_spinner();
        let mut first_token_received = false;
        let outcome = consume_chunks(chunks, |delta| {
            if !first_token_received {
                spinner.finish_and_clear();
                first_token_received = true;
                print!("\n  {} ", style("Sakai").magenta().bold());
            }
            renderer.print_streaming_token(delta);
        })
        .await;
        spinner.finish_and_clear();

        match outcome {
            TurnOutcome::Reply(reply) => {
                println!();
                redraw_as_markdown(&renderer, &reply);
                renderer.print_footer(start_time.elapsed().as_millis() as u64, &model_name);
                println!();
                if !conversation.record_reply(&reply) {
                    println!(
                        "  {}\n",
                        style("Sakai n'a rien répondu. Reformule ton message pour réessayer.").dim()
                    );
                    continue;
                }
            }
            TurnOutcome::Failed { message, .. } => {
                eprintln!("\n  {} {}", style("!").red().bold(), style(&message).red());
                eprintln!(
                    "  {}",
                    style("Renvoie un message pour réessayer, /exit pour quitter.").dim()
                );
                conversation.discard_unanswered();
                continue;
            }
        }

        if let Some((user_msg, model_msg)) = conversation.untitled_first_exchange() {
            let title = generate_title(state.model.as_ref(), &user_msg, &model_msg).await;
            info!(title = %title, "conversation titled");
            println!("  {} {}\n", style("Conversation :").dim(), style(&title).dim().italic());
            conversation.set_title(title);
        }
    }

    debug!(turns = conversation.history().len(), "chat loop finished");
    Ok(())
}

/// Send a single message, stream the reply to stdout, and return.
///
/// An error chunk makes the command fail with its message.
pub async fn run_once(state: &AppState, template: ChatRequest, message: &str) -> anyhow::Result<()> {
    let mut conversation = Conversation::new(template);
    conversation.push_user(message);

    let interactive = std::io::stdout().is_tty();
    let spinner = if interactive {
        thinking_spinner()
    } else {
        ProgressBar::hidden()
    };

    let chunks = state.relay.stream_chat(conversation.request());
    let outcome = consume_chunks(chunks, |delta| {
        spinner.finish_and_clear();
        print!("{delta}");
        let _ = std::io::stdout().flush();
    })
    .await;
    spinner.finish_and_clear();

    match outcome {
        TurnOutcome::Reply(_) => {
            println!();
            Ok(())
        }
        TurnOutcome::Failed { partial, message } => {
            if !partial.is_empty() {
                println!();
            }
            Err(anyhow::anyhow!(message))
        }
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(THINKING_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Replace the raw streamed reply with its rendered markdown.
///
/// Left as is when the raw text no longer fits on screen, since the cursor
/// cannot move above the top row.
fn redraw_as_markdown(renderer: &ChatRenderer, reply: &str) {
    if reply.trim().is_empty() {
        return;
    }
    let Ok((width, height)) = crossterm::terminal::size() else {
        return;
    };

    // "  Sakai " prefix on the first line.
    let printed = format!("  Sakai {reply}");
    let rows = wrapped_rows(&printed, usize::from(width));
    if rows == 0 || rows >= usize::from(height) {
        return;
    }

    let mut stdout = std::io::stdout();
    let rows = u16::try_from(rows).unwrap_or(u16::MAX);
    if crossterm::execute!(stdout, MoveUp(rows), Clear(ClearType::FromCursorDown)).is_err() {
        return;
    }
    println!();
    print!("{}", renderer.render_final(reply));
    let _ = stdout.flush();
}

/// Terminal rows taken by `text` at `width` columns.
fn wrapped_rows(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum()
}

fn print_history(conversation: &Conversation) {
    println!();
    if let Some(title) = conversation.title() {
        println!("  {}\n", style(title).bold());
    }
    if conversation.history().is_empty() {
        println!("  {}\n", style("Aucun message pour l'instant.").dim());
        return;
    }
    for msg in conversation.history() {
        let label = match msg.role {
            Role::User => style("Toi").green().bold(),
            _ => style("Sakai").magenta().bold(),
        };
        println!("  {label} {}", preview(&msg.text_content(), HISTORY_PREVIEW_CHARS));
    }
    println!();
}

/// First `max` characters of `text` on one line, with an ellipsis when cut.
fn preview(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> StreamChunk {
        StreamChunk::Text(s.to_string())
    }

    #[tokio::test]
    async fn test_consume_chunks_collects_reply() {
        let mut seen = Vec::new();
        let outcome = consume_chunks(
            futures_util::stream::iter(vec![text("Bon"), text("jour")]),
            |t| seen.push(t.to_string()),
        )
        .await;
        assert_eq!(outcome, TurnOutcome::Reply("Bonjour".to_string()));
        assert_eq!(seen, vec!["Bon", "jour"]);
    }

    #[tokio::test]
    async fn test_consume_chunks_stops_at_error() {
        let outcome = consume_chunks(
            futures_util::stream::iter(vec![
                text("Bon"),
                StreamChunk::Error("quota dépassé".to_string()),
                text("jamais"),
            ]),
            |_| {},
        )
        .await;
        assert_eq!(
            outcome,
            TurnOutcome::Failed {
                partial: "Bon".to_string(),
                message: "quota dépassé".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_consume_empty_stream() {
        let outcome = consume_chunks(futures_util::stream::empty(), |_| {}).await;
        assert_eq!(outcome, TurnOutcome::Reply(String::new()));
    }

    #[test]
    fn test_conversation_discards_unanswered_user_turn() {
        let mut conversation = Conversation::new(ChatRequest::default());
        conversation.push_user("Salut");
        conversation.push_model("Bonjour !");
        conversation.push_user("Et ensuite ?");
        conversation.discard_unanswered();
        assert_eq!(conversation.history().len(), 2);

        // A trailing model turn is kept.
        conversation.discard_unanswered();
        assert_eq!(conversation.history().len(), 2);
    }

    #[test]
    fn test_blank_reply_is_not_recorded() {
        let mut conversation = Conversation::new(ChatRequest::default());
        conversation.push_user("Salut");
        assert!(conversation.record_reply("Bonjour !"));

        conversation.push_user("Et ensuite ?");
        assert!(!conversation.record_reply("  \n"));
        assert_eq!(conversation.history().len(), 2);
        assert_eq!(conversation.history()[1].role, Role::Model);

        // The next turn follows a model turn, not an unanswered user turn.
        conversation.push_user("Tu es là ?");
        let roles: Vec<&Role> = conversation.history().iter().map(|m| &m.role).collect();
        assert_eq!(roles, vec![&Role::User, &Role::Model, &Role::User]);
    }

    #[test]
    fn test_conversation_remember_appends_lines() {
        let mut conversation = Conversation::new(ChatRequest {
            memory: Some("- Habite à Lyon\n".to_string()),
            ..Default::default()
        });
        conversation.remember("Aime le thé");
        assert_eq!(
            conversation.request().memory.as_deref(),
            Some("- Habite à Lyon\n- Aime le thé")
        );

        let mut empty = Conversation::new(ChatRequest::default());
        empty.remember(" Végétarien ");
        assert_eq!(empty.request().memory.as_deref(), Some("- Végétarien"));
    }

    #[test]
    fn test_conversation_reset_keeps_options() {
        let mut conversation = Conversation::new(ChatRequest {
            personality: Some("casual".to_string()),
            history: vec![ConversationMessage::user("ignoré")],
            ..Default::default()
        });
        assert!(conversation.history().is_empty());

        conversation.push_user("Salut");
        conversation.set_title("Salutations".to_string());
        conversation.reset();
        assert!(conversation.history().is_empty());
        assert!(conversation.title().is_none());
        assert_eq!(conversation.request().personality.as_deref(), Some("casual"));
    }

    #[test]
    fn test_untitled_first_exchange() {
        let mut conversation = Conversation::new(ChatRequest::default());
        assert!(conversation.untitled_first_exchange().is_none());

        conversation.push_user("Salut");
        assert!(conversation.untitled_first_exchange().is_none());

        conversation.push_model("Bonjour !");
        assert_eq!(
            conversation.untitled_first_exchange(),
            Some(("Salut".to_string(), "Bonjour !".to_string()))
        );

        conversation.set_title("Salutations".to_string());
        assert!(conversation.untitled_first_exchange().is_none());
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows("abc", 10), 1);
        assert_eq!(wrapped_rows("abcdefghijk", 10), 2);
        assert_eq!(wrapped_rows("a\n\nb", 10), 3);
        assert_eq!(wrapped_rows("abc", 0), 0);
    }

    #[test]
    fn test_preview_is_char_safe() {
        assert_eq!(preview("court", 10), "court");
        assert_eq!(preview("éééééééééééé", 6), "ééé...");
        assert_eq!(preview("a\nb", 10), "a b");
    }
}
