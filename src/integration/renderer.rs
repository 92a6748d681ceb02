use std::io::Write;

use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::core::notification::Notification;

/// Width of the text progress bar in cells
const BAR_WIDTH: usize = 20;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One row handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToastView<'a> {
    #[serde(flatten)]
    pub notification: &'a Notification,
    /// Present only for entries showing a progress bar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

/// Display layer collaborator
/// Receives the whole ordered stack every time it changes.
pub trait Renderer {
    fn render(&mut self, toasts: &[ToastView<'_>]) -> Result<()>;
}

/// Plain text, one block per change
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `[#####---------------]  25%`
pub fn progress_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    // Remaining time shrinks the bar.
    let filled = ((1.0 - fraction) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        (fraction * 100.0).round() as u32
    )
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, toasts: &[ToastView<'_>]) -> Result<()> {
        writeln!(self.out, "--- {} toast(s)", toasts.len())?;
        for view in toasts {
            let n = view.notification;
            let icon = n.icon.map(|icon| format!("({icon}) ")).unwrap_or_default();
            let paused = if n.paused { " [paused]" } else { "" };
            write!(self.out, "[{}] {icon}{}", n.id, n.title)?;
            if !n.description.is_empty() {
                write!(self.out, ": {}", n.description)?;
            }
            writeln!(self.out, "{paused}")?;
            if let Some(progress) = view.progress {
                writeln!(self.out, "    {}", progress_bar(progress))?;
            }
            for action in &n.actions {
                writeln!(self.out, "    <{}>", action.label)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON array per change
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, toasts: &[ToastView<'_>]) -> Result<()> {
        serde_json::to_writer(&mut self.out, toasts)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Renderer matching the configured format, writing to stdout
pub fn stdout_renderer(format: OutputFormat) -> Box<dyn Renderer + Send> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::new(std::io::stdout())),
        OutputFormat::Json => Box::new(JsonRenderer::new(std::io::stdout())),
    }
}

impl Renderer for Box<dyn Renderer + Send> {
    fn render(&mut self, toasts: &[ToastView<'_>]) -> Result<()> {
        (**self).render(toasts)
    }
}
