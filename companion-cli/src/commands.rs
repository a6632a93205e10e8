//! Command implementations. Output goes to the given writer so commands can be tested.

use std::io::Write;

use ai_handlers::{TurnOutcome, MSG_MISSING_API_KEY, MSG_NO_RESPONSE};
use anyhow::{bail, Result};
use async_trait::async_trait;
use llm_client::{mask_token, LlmError, StreamObserver};
use memory::NOMINAL_CONTEXT_TOKENS;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::App;

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Prints each fragment as it arrives.
struct PrintObserver<W: Write + Send> {
    out: W,
}

#[async_trait]
impl<W: Write + Send> StreamObserver for PrintObserver<W> {
    async fn on_fragment(&mut self, delta: &str, _full: &str) {
        let _ = write!(self.out, "{delta}");
        let _ = self.out.flush();
    }

    async fn on_complete(&mut self, _full: &str) {
        let _ = writeln!(self.out);
    }

    async fn on_error(&mut self, _error: &LlmError) {
        let _ = writeln!(self.out);
    }
}

async fn require_character(app: &App, character: &str) -> Result<String> {
    match app.characters.get(character).await? {
        Some(profile) => Ok(profile.name),
        None => bail!("Unknown character: {character} (see `companion characters`)"),
    }
}

/// REPL over `input`: every line is one turn, the reply streams to `out`.
pub async fn chat<R, W>(app: &App, character: &str, input: R, mut out: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send,
{
    let name = require_character(app, character).await?;
    writeln!(out, "{name}와(과) 대화를 시작합니다. 종료: /quit")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if QUIT_COMMANDS.contains(&text) {
            break;
        }
        if text.is_empty() {
            continue;
        }

        write!(out, "{name}: ")?;
        let mut observer = PrintObserver { out: &mut out };
        let outcome = app
            .handler
            .send_message(character, text, &mut observer)
            .await?;
        match outcome {
            TurnOutcome::Replied { .. } | TurnOutcome::Skipped => {}
            TurnOutcome::MissingApiKey => writeln!(out, "{MSG_MISSING_API_KEY}")?,
            TurnOutcome::NoResponse => writeln!(out, "{MSG_NO_RESPONSE}")?,
            TurnOutcome::Failed { message, .. } => writeln!(out, "{message}")?,
        }
    }
    Ok(())
}

pub async fn history<W: Write>(app: &App, character: &str, mut out: W) -> Result<()> {
    require_character(app, character).await?;
    let records = app.chats.history(character).await?;
    if records.is_empty() {
        writeln!(out, "(no messages)")?;
        return Ok(());
    }
    for record in records {
        writeln!(out, "[{}] {}: {}", record.time, record.role.as_str(), record.content)?;
    }
    Ok(())
}

/// Dry run of the next turn's prompt; nothing is stored.
pub async fn context<W: Write>(app: &App, character: &str, text: &str, mut out: W) -> Result<()> {
    let Some(context) = app.handler.preview_context(character, text).await? else {
        bail!("Unknown character: {character} (see `companion characters`)");
    };
    for message in &context.messages {
        writeln!(out, "--- {} ---", message.role.as_str())?;
        writeln!(out, "{}", message.content)?;
    }
    let usage = context.usage(NOMINAL_CONTEXT_TOKENS);
    writeln!(out, "---")?;
    writeln!(
        out,
        "type: {} | older context: {:?} | truncated: {}",
        context.metadata.conversation_type.as_str(),
        context.metadata.older_context,
        context.metadata.truncated
    )?;
    writeln!(
        out,
        "tokens: {}/{} ({:.1}%){}",
        usage.used,
        usage.max,
        usage.usage_rate * 100.0,
        if usage.warning { " WARNING" } else { "" }
    )?;
    Ok(())
}

pub async fn characters<W: Write>(app: &App, mut out: W) -> Result<()> {
    for c in app.characters.list().await? {
        writeln!(
            out,
            "{:<12} {} (@{}, {}, {}세) {}",
            c.id,
            c.name,
            c.username,
            c.personality.as_str(),
            c.age,
            c.bio
        )?;
    }
    Ok(())
}

pub async fn set_key<W: Write>(app: &App, key: &str, mut out: W) -> Result<()> {
    if key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    let settings = app.settings.set_api_key(key).await?;
    writeln!(out, "API key saved: {}", mask_token(&settings.api_key))?;
    Ok(())
}

pub async fn set_model<W: Write>(app: &App, model: &str, mut out: W) -> Result<()> {
    let settings = app.settings.set_model_name(model).await?;
    writeln!(out, "Model: {}", settings.model_name)?;
    Ok(())
}

pub async fn clear<W: Write>(app: &App, character: &str, mut out: W) -> Result<()> {
    require_character(app, character).await?;
    app.chats.clear_history(character).await?;
    writeln!(out, "Cleared conversation with {character}")?;
    Ok(())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;
