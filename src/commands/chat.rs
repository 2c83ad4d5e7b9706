//! Interactive chat mode handler.
//!
//! Loads the conversation store, creates the completion provider, and runs a
//! readline-based interactive loop. Regular input is submitted to the
//! provider and the reply is revealed with the typewriter presenter; special
//! commands manage conversations and staged attachments.

use crate::attachments::{validate_attachments, AttachedFile};
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::{JujuError, Result};
use crate::prompt::build_messages;
use crate::providers::{create_provider, Provider};
use crate::reveal::{RevealSink, TerminalSink, TypingPresenter};
use crate::storage::SnapshotStorage;
use crate::store::{ChatMessage, ConversationStore};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// One interactive chat session
///
/// Owns the conversation store, the staged attachments, and the completion
/// provider. The submission flow is on this type rather than in the readline
/// loop so it can be exercised directly in tests.
pub struct ChatSession {
    config: Config,
    store: ConversationStore,
    storage: SnapshotStorage,
    provider: Box<dyn Provider>,
    presenter: TypingPresenter,
    staged: Vec<AttachedFile>,
}

impl ChatSession {
    /// Create a session from pre-built parts
    ///
    /// Used by tests to inject a temporary storage path and a mocked
    /// provider endpoint; [`run_chat`] builds the parts from configuration.
    pub fn new(config: Config, storage: SnapshotStorage, provider: Box<dyn Provider>) -> Self {
        let store = ConversationStore::load(&storage);
        let presenter = TypingPresenter::new(config.chat.reveal_delay_ms);
        Self {
            config,
            store,
            storage,
            provider,
            presenter,
            staged: Vec::new(),
        }
    }

    /// The conversation store
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Files staged for the next submission
    pub fn staged(&self) -> &[AttachedFile] {
        &self.staged
    }

    /// Stage a file for the next submission
    ///
    /// Validates the count and size caps before reading the file.
    ///
    /// # Errors
    ///
    /// Returns error when the staging cap is reached, the file exceeds the
    /// size cap, or the file cannot be read
    pub fn attach(&mut self, path: &str) -> Result<()> {
        if self.staged.len() >= self.config.attachments.max_files {
            return Err(JujuError::Attachment(format!(
                "At most {} files can be attached per message",
                self.config.attachments.max_files
            ))
            .into());
        }

        validate_attachments(&[path], &self.config.attachments)?;
        let file = AttachedFile::load(path, &self.config.attachments)?;
        self.staged.push(file);
        Ok(())
    }

    /// Clear all staged attachments
    pub fn detach_all(&mut self) {
        self.staged.clear();
    }

    /// Submit user input to the completion provider
    ///
    /// Validates the input and staged attachments, commits the user turn,
    /// calls the provider, reveals the reply through `sink`, and commits the
    /// assistant turn. Validation failures abort before any state mutation
    /// or network activity. A provider failure leaves the user turn in place
    /// with no assistant reply.
    ///
    /// # Errors
    ///
    /// Returns error for empty or over-length input, staged attachments over
    /// the caps, or a provider failure
    pub async fn submit<S: RevealSink>(&mut self, input: &str, sink: &mut S) -> Result<()> {
        let text = input.trim();
        if text.is_empty() {
            return Err(JujuError::InvalidInput("Message is empty".to_string()).into());
        }

        let char_count = text.chars().count();
        let max_chars = self.config.chat.max_input_chars;
        if char_count > max_chars {
            return Err(JujuError::InvalidInput(format!(
                "Message is {} characters, the limit is {}",
                char_count, max_chars
            ))
            .into());
        }

        if self.staged.len() > self.config.attachments.max_files {
            return Err(JujuError::Attachment(format!(
                "Too many files: {} attached, at most {} allowed",
                self.staged.len(),
                self.config.attachments.max_files
            ))
            .into());
        }

        let attachments = std::mem::take(&mut self.staged);
        let conversation_id = self.store.active().id.clone();
        let messages = build_messages(
            &self.config.chat.system_prompt,
            &self.store.active().messages,
            text,
            &attachments,
        );

        self.store
            .append_message(&conversation_id, ChatMessage::from_user(text, attachments));
        self.store.rename_if_default(&conversation_id, text);
        self.store.persist(&self.storage);

        let response = self.provider.complete(&messages).await?;

        let reply = ChatMessage::from_assistant(&response.text);
        self.presenter.reveal(&reply.id, &reply.text, sink).await;

        self.store.append_message(&conversation_id, reply);
        self.store.persist(&self.storage);

        if let Some(usage) = response.usage {
            tracing::debug!(
                "Completion used {} prompt + {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(())
    }

    /// Start a new conversation and persist the change
    fn new_conversation(&mut self) -> String {
        let id = self.store.create_conversation();
        self.store.persist(&self.storage);
        id
    }

    /// Switch the active conversation and persist the change
    fn switch_conversation(&mut self, id: &str) -> bool {
        let switched = self.store.set_active(id);
        if switched {
            self.store.persist(&self.storage);
        }
        switched
    }

    /// Delete the active conversation and persist the change
    fn delete_active(&mut self) {
        let id = self.store.active().id.clone();
        self.store.delete_conversation(&id);
        self.store.persist(&self.storage);
    }
}

/// Start interactive chat mode
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
///
/// # Examples
///
/// ```
/// use jujuchat::commands::chat;
/// use jujuchat::config::Config;
///
/// // In application code:
/// // chat::run_chat(Config::default()).await?;
/// ```
pub async fn run_chat(config: Config) -> Result<()> {
    tracing::info!("Starting interactive chat mode");

    let storage = SnapshotStorage::new()?;
    let provider = create_provider(&config)?;
    let mut session = ChatSession::new(config, storage, provider);

    let mut rl = DefaultEditor::new()?;

    print_welcome_banner(&session);

    loop {
        let prompt = format!("{} ", "you>".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                // Check for special commands first
                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::NewConversation) => {
                        let id = session.new_conversation();
                        println!("{}\n", format!("Started conversation {}", id).green());
                        continue;
                    }
                    Ok(SpecialCommand::ListConversations) => {
                        print_conversation_list(&session);
                        continue;
                    }
                    Ok(SpecialCommand::SwitchConversation(id)) => {
                        if session.switch_conversation(&id) {
                            println!(
                                "{}\n",
                                format!("Switched to '{}'", session.store().active().title).green()
                            );
                        } else {
                            eprintln!("{}\n", format!("No conversation with id {}", id).red());
                        }
                        continue;
                    }
                    Ok(SpecialCommand::DeleteConversation) => {
                        let title = session.store().active().title.clone();
                        let answer = rl.readline(&format!("Delete '{}'? [y/N] ", title))?;
                        if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                            session.delete_active();
                            println!("{}\n", format!("Deleted '{}'", title).yellow());
                        } else {
                            println!("Kept '{}'\n", title);
                        }
                        continue;
                    }
                    Ok(SpecialCommand::Attach(path)) => {
                        match session.attach(&path) {
                            Ok(()) => {
                                let file = session.staged().last().map(|f| f.name.clone());
                                println!(
                                    "{}\n",
                                    format!(
                                        "Attached {} ({} staged)",
                                        file.unwrap_or(path),
                                        session.staged().len()
                                    )
                                    .green()
                                );
                            }
                            Err(e) => eprintln!("{}\n", format!("{}", e).red()),
                        }
                        continue;
                    }
                    Ok(SpecialCommand::Detach) => {
                        session.detach_all();
                        println!("{}\n", "Cleared staged attachments".yellow());
                        continue;
                    }
                    Ok(SpecialCommand::ShowStatus) => {
                        print_status(&session);
                        continue;
                    }
                    Ok(SpecialCommand::Help) => {
                        print_help();
                        continue;
                    }
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::None) => {
                        // Regular submission
                    }
                    Err(e) => {
                        eprintln!("{}\n", format!("{}", e).red());
                        continue;
                    }
                }

                print!("{} ", "juju>".magenta().bold());
                let mut sink = TerminalSink;
                match session.submit(trimmed, &mut sink).await {
                    Ok(()) => println!("\n"),
                    Err(e) => {
                        println!();
                        if e.downcast_ref::<JujuError>()
                            .map(|err| matches!(err, JujuError::InvalidInput(_) | JujuError::Attachment(_)))
                            .unwrap_or(false)
                        {
                            eprintln!("{}\n", format!("{}", e).red());
                        } else {
                            tracing::warn!("Completion failed: {}", e);
                            eprintln!(
                                "{}\n",
                                "Sorry, something went wrong. Please try again.".red()
                            );
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                eprintln!("{}", format!("Input error: {}", e).red());
                break;
            }
        }
    }

    Ok(())
}

/// Display the welcome banner with the active conversation
fn print_welcome_banner(session: &ChatSession) {
    println!();
    println!("{}", "jujuchat".magenta().bold());
    println!(
        "Conversation: {} ({} messages)",
        session.store().active().title.bold(),
        session.store().active().messages.len()
    );
    println!("Type '/help' for commands, 'exit' to quit.\n");
}

/// Display all conversations, marking the active one
fn print_conversation_list(session: &ChatSession) {
    let active_id = session.store().active().id.clone();
    for conversation in session.store().conversations() {
        let marker = if conversation.id == active_id { "*" } else { " " };
        println!(
            "{} {}  {} ({} messages)",
            marker,
            conversation.id.dimmed(),
            conversation.title.bold(),
            conversation.messages.len()
        );
    }
    println!();
}

/// Display the session status
fn print_status(session: &ChatSession) {
    let active = session.store().active();
    println!("Conversation: {} ({})", active.title.bold(), active.id.dimmed());
    println!("Messages:     {}", active.messages.len());
    println!("Model:        {}", session.config.provider.groq.model);
    if session.staged().is_empty() {
        println!("Attachments:  none staged");
    } else {
        println!("Attachments:  {} staged", session.staged().len());
        for file in session.staged() {
            println!("  - {} ({})", file.name, file.mime_type);
        }
    }
    println!();
}
