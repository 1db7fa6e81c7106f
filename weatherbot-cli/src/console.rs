//! Line-based console: one slash command per line, replies written back.

use anyhow::{Context, Result};
use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use weatherbot_core::{Command, CommandHandler};

/// Why the console stopped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The owner's `/shutdown` was accepted.
    Shutdown,
    EndOfInput,
}

/// Handle commands from `input` until EOF or an accepted `/shutdown`.
pub async fn run<R, W>(
    handler: &CommandHandler,
    user_id: u64,
    input: R,
    mut output: W,
) -> Result<Exit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read command")?
    {
        if line.trim().is_empty() {
            continue;
        }

        let (text, stop) = match line.parse::<Command>() {
            Ok(cmd) => {
                let outcome = handler.handle(user_id, cmd).await;
                (outcome.reply.to_string(), outcome.shutdown)
            }
            Err(e) => {
                debug!("Rejected console input {line:?}: {e}");
                (e.to_string(), false)
            }
        };

        output
            .write_all(format!("{text}\n").as_bytes())
            .await
            .context("Failed to write reply")?;
        output.flush().await.context("Failed to write reply")?;

        if stop {
            return Ok(Exit::Shutdown);
        }
    }

    Ok(Exit::EndOfInput)
}
