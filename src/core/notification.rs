use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identifier of a notification, either caller supplied or generated
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationId {
    Num(u64),
    Text(String),
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationId::Num(n) => write!(f, "{n}"),
            NotificationId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for NotificationId {
    fn from(value: u64) -> Self {
        NotificationId::Num(value)
    }
}

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        NotificationId::Text(value.to_owned())
    }
}

impl From<String> for NotificationId {
    fn from(value: String) -> Self {
        NotificationId::Text(value)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToastColor {
    #[default]
    White,
    Gray,
    Red,
    None,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProgressColor {
    #[default]
    Gradient,
    Gray,
    Red,
    None,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IconKind {
    Info,
    Success,
    Warning,
    Error,
    Question,
}

/// Button rendered below the toast body.
/// `command` is handed back to the caller untouched when the button is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAction {
    pub label: String,
    pub command: String,
}

/// Behaviour switches of a single notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToastOptions {
    #[serde(default)]
    pub pause_on_hover: bool,
    #[serde(default)]
    pub show_progress: bool,
    #[serde(default)]
    pub close_on_click: bool,
}

/// Defaults applied to fields an add intent leaves out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastDefaults {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default, flatten)]
    pub options: ToastOptions,
}

fn default_duration_ms() -> u64 {
    2000
}

impl Default for ToastDefaults {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            options: ToastOptions::default(),
        }
    }
}

impl ToastDefaults {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Queue-level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,
    #[serde(default)]
    pub defaults: ToastDefaults,
}

pub const DEFAULT_MAX_CAPACITY: usize = 3;

fn default_max_capacity() -> usize {
    DEFAULT_MAX_CAPACITY
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
            defaults: ToastDefaults::default(),
        }
    }
}

impl QueueConfig {
    pub fn with_capacity(max_capacity: usize) -> Self {
        Self {
            max_capacity,
            ..Self::default()
        }
    }
}

/// An active notification in the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub description: String,
    /// Zero disables auto-expiry
    #[serde(with = "millis")]
    pub duration: Duration,
    pub paused: bool,
    #[serde(with = "millis")]
    pub elapsed: Duration,
    #[serde(flatten)]
    pub options: ToastOptions,
    pub color: ToastColor,
    pub title_color: ToastColor,
    pub progress_color: ProgressColor,
    pub icon: Option<IconKind>,
    pub actions: Vec<ToastAction>,
}

impl Notification {
    /// Build a fresh entry from an add payload, filling gaps from `defaults`
    pub fn from_patch(id: NotificationId, patch: NotificationPatch, defaults: &ToastDefaults) -> Self {
        let base = Self {
            id: id.clone(),
            title: String::new(),
            description: String::new(),
            duration: defaults.duration(),
            paused: false,
            elapsed: Duration::ZERO,
            options: defaults.options,
            color: ToastColor::default(),
            title_color: ToastColor::default(),
            progress_color: ProgressColor::default(),
            icon: None,
            actions: Vec::new(),
        };
        let mut notification = base.merged(patch);
        notification.id = id;
        notification
    }

    /// Shallow merge: every field present in `patch` overwrites, the id is kept
    pub fn merged(&self, patch: NotificationPatch) -> Self {
        let mut next = self.clone();
        let NotificationPatch {
            id: _,
            title,
            description,
            duration,
            paused,
            pause_on_hover,
            show_progress,
            close_on_click,
            color,
            title_color,
            progress_color,
            icon,
            actions,
        } = patch;

        if let Some(title) = title {
            next.title = title;
        }
        if let Some(description) = description {
            next.description = description;
        }
        if let Some(duration) = duration {
            next.duration = duration;
            next.elapsed = next.elapsed.min(duration);
        }
        if let Some(paused) = paused {
            next.paused = paused;
        }
        if let Some(pause_on_hover) = pause_on_hover {
            next.options.pause_on_hover = pause_on_hover;
        }
        if let Some(show_progress) = show_progress {
            next.options.show_progress = show_progress;
        }
        if let Some(close_on_click) = close_on_click {
            next.options.close_on_click = close_on_click;
        }
        if let Some(color) = color {
            next.color = color;
        }
        if let Some(title_color) = title_color {
            next.title_color = title_color;
        }
        if let Some(progress_color) = progress_color {
            next.progress_color = progress_color;
        }
        if let Some(icon) = icon {
            next.icon = Some(icon);
        }
        if let Some(actions) = actions {
            next.actions = actions;
        }
        next
    }

    /// Whether a timer should count this entry down
    pub fn expires(&self) -> bool {
        !self.duration.is_zero()
    }

    /// elapsed / duration clamped to [0, 1]; `None` when the entry never expires
    pub fn progress(&self) -> Option<f64> {
        if !self.expires() {
            return None;
        }
        let ratio = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        Some(ratio.clamp(0.0, 1.0))
    }
}

/// Partial notification used as add and update payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NotificationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "opt_millis", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_on_hover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_progress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_on_click: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ToastColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_color: Option<ToastColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_color: Option<ProgressColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ToastAction>>,
}

impl NotificationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch addressed at an existing entry
    pub fn for_id(id: impl Into<NotificationId>) -> Self {
        Self::new().id(id)
    }

    pub fn id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = Some(paused);
        self
    }

    pub fn pause_on_hover(mut self, value: bool) -> Self {
        self.pause_on_hover = Some(value);
        self
    }

    pub fn show_progress(mut self, value: bool) -> Self {
        self.show_progress = Some(value);
        self
    }

    pub fn close_on_click(mut self, value: bool) -> Self {
        self.close_on_click = Some(value);
        self
    }

    pub fn color(mut self, color: ToastColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn icon(mut self, icon: IconKind) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn action(mut self, label: impl Into<String>, command: impl Into<String>) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(ToastAction {
            label: label.into(),
            command: command.into(),
        });
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod opt_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => super::millis::serialize(duration, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}
