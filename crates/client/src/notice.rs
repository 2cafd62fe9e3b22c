//! User-visible notices.
//!
//! Every failure in the client is recovered locally by showing the user a
//! short message and handing control back. Screens push [`Notice`]s into a
//! [`Notices`] channel; whatever renders the UI drains the other end.

use core::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the user, shaped like an alert: a title and an
/// optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    /// Create a notice.
    #[must_use]
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    /// A success confirmation.
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, message)
    }

    /// A blocked action the user can fix (validation).
    #[must_use]
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    /// A failed request.
    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

/// Sending half of the notice channel. Cheap to clone; one per screen.
#[derive(Debug, Clone)]
pub struct Notices {
    sender: mpsc::UnboundedSender<Notice>,
}

impl Notices {
    /// Create a connected sender/receiver pair.
    #[must_use]
    pub fn channel() -> (Self, NoticeReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, NoticeReceiver { receiver })
    }

    /// A sender whose notices go nowhere (they are still traced).
    #[must_use]
    pub fn discard() -> Self {
        Self::channel().0
    }

    /// Show a notice.
    pub fn push(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => warn!(title = %notice.title, message = %notice.message, "Notice"),
            _ => debug!(title = %notice.title, message = %notice.message, "Notice"),
        }
        if self.sender.send(notice).is_err() {
            debug!("Notice receiver dropped");
        }
    }
}

/// Receiving half of the notice channel.
#[derive(Debug)]
pub struct NoticeReceiver {
    receiver: mpsc::UnboundedReceiver<Notice>,
}

impl NoticeReceiver {
    /// Wait for the next notice.
    pub async fn recv(&mut self) -> Option<Notice> {
        self.receiver.recv().await
    }

    /// Take every notice queued so far.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(notice) => notices.push(notice),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return notices,
            }
        }
    }
}
