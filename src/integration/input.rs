use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;

use crate::core::{intent::Intent, notification::NotificationId};

/// One line of runner input
///
/// Intents go through the dispatcher; pointer events go straight to the
/// mounted toaster, the way a view layer would forward them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputEvent {
    Intent(Intent),
    Pointer(PointerEvent),
    Control(Control),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEvent {
    PointerEnter(NotificationId),
    PointerLeave(NotificationId),
    Click(NotificationId),
    Dismiss(NotificationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Quit,
}

impl InputEvent {
    /// Parse a JSON line; blank lines and `#` comments yield `None`
    pub fn parse_line(line: &str) -> Option<Result<Self, serde_json::Error>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(serde_json::from_str(line))
    }
}

/// Read JSON lines from `reader` in a background task
///
/// Malformed lines are logged and skipped. The channel closes at end of input
/// or when `cancel` fires.
pub fn spawn_reader<R>(reader: R, cancel: CancellationToken) -> mpsc::UnboundedReceiver<InputEvent>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.next_line() => match line {
                    Ok(Some(line)) => match InputEvent::parse_line(&line) {
                        Some(Ok(event)) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        Some(Err(e)) => log::warn!("Skipping malformed input line {line:?}: {e}"),
                        None => {}
                    },
                    Ok(None) => {
                        log::info!("Input closed");
                        break;
                    }
                    Err(e) => {
                        log::error!("Failed to read input: {e}");
                        break;
                    }
                },
            }
        }
    });
    rx
}
