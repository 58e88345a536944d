//! Conversation CLI commands: send, history, clear.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use solace_types::message::{Message, Sender};

use crate::http::handlers::message::MessageView;
use crate::state::AppState;

/// Longest content shown in a history table cell.
const PREVIEW_CHARS: usize = 60;

fn sender_label(sender: Sender) -> String {
    match sender {
        Sender::User => format!("{}", style("you").cyan().bold()),
        Sender::Bot => format!("{}", style("solace").magenta().bold()),
    }
}

fn views(messages: impl IntoIterator<Item = Message>) -> Vec<MessageView> {
    messages.into_iter().map(MessageView::from).collect()
}

/// Run one turn and print both messages.
///
/// ```bash
/// solace send my-session "I couldn't sleep again"
/// ```
pub async fn send(state: &AppState, session: &str, text: &str, json: bool) -> Result<()> {
    let turn = state.orchestrator.submit_turn(session, text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&views(turn.into_messages()))?);
        return Ok(());
    }

    println!();
    println!("  {} {}", sender_label(turn.user.sender), turn.user.content);
    println!();
    println!("  {} {}", sender_label(turn.bot.sender), turn.bot.content);
    println!();
    Ok(())
}

/// Print the ordered history of a session as a table.
pub async fn history(state: &AppState, session: &str, json: bool) -> Result<()> {
    let messages = state.orchestrator.get_history(session).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&views(messages))?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages in session '{}'. Start one with: {}",
            style("i").blue().bold(),
            style(session).cyan(),
            style(format!("solace send {session} \"hello\"")).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for message in &messages {
        let from = match message.sender {
            Sender::User => Cell::new("you").fg(Color::Cyan),
            Sender::Bot => Cell::new("solace").fg(Color::Magenta),
        };
        table.add_row(vec![
            Cell::new(message.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            from,
            Cell::new(preview(&message.content)),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {} message(s) in '{}'",
        style(messages.len()).bold(),
        style(session).cyan()
    );
    println!();
    Ok(())
}

/// Clear a session, asking first unless `force` is set.
pub async fn clear(state: &AppState, session: &str, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete every message in session '{session}'?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.orchestrator.clear_session(session).await?;

    if json {
        println!("{}", serde_json::json!({ "success": true, "session_id": session }));
    } else {
        println!(
            "  {} Cleared session '{}'",
            style("✓").green().bold(),
            style(session).cyan()
        );
    }
    Ok(())
}

fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let cut: String = content.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short"), "short");
        let long = "é".repeat(80);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS);
        assert!(shown.ends_with("..."));
    }
}
