use crate::cli::HistoryCommand;
use crate::error::{JujuError, Result};
use crate::storage::SnapshotStorage;
use crate::store::{ConversationStore, Sender};
use colored::Colorize;
use std::io::Write;

/// Handle history commands
///
/// Operates directly on the persisted snapshot, outside an interactive chat
/// session.
pub fn handle_history(command: HistoryCommand) -> Result<()> {
    let storage = SnapshotStorage::new()?;
    let mut store = ConversationStore::load(&storage);

    match command {
        HistoryCommand::List => {
            println!("\nConversations:");
            for conversation in store.conversations() {
                let marker = if conversation.id == store.active_id() {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {}  {} ({} messages)",
                    marker,
                    conversation.id.dimmed(),
                    conversation.title.bold(),
                    conversation.messages.len()
                );
            }
            println!();
            println!("Use {} to read a transcript.", "jujuchat history show <ID>".cyan());
            println!();
        }
        HistoryCommand::Show { id } => {
            let conversation = store
                .conversations()
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| JujuError::InvalidInput(format!("No conversation with id {}", id)))?;

            println!("\n{} ({})\n", conversation.title.bold(), conversation.id.dimmed());
            for message in &conversation.messages {
                let label = match message.sender {
                    Sender::User => "you>".cyan().bold(),
                    Sender::Assistant => "juju>".magenta().bold(),
                };
                println!("{} {}", label, message.text);
                for file in &message.attachments {
                    println!("      {} {}", "attached:".dimmed(), file.name);
                }
                println!();
            }
        }
        HistoryCommand::Delete { id, yes } => {
            let title = store
                .conversations()
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.title.clone())
                .ok_or_else(|| JujuError::InvalidInput(format!("No conversation with id {}", id)))?;

            if !yes && !confirm(&format!("Delete '{}'? [y/N] ", title))? {
                println!("Kept '{}'", title);
                return Ok(());
            }

            store.delete_conversation(&id);
            store.persist(&storage);
            println!("{}", format!("Deleted conversation {}", id).green());
        }
    }

    Ok(())
}

/// Ask a yes/no question on stdin, defaulting to no
fn confirm(question: &str) -> Result<bool> {
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
