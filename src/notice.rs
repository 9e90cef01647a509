/// A slot holding at most one undelivered value.
///
/// A second `post` before `drain` replaces the first value; only the latest
/// one is ever delivered.
#[derive(Debug, Clone)]
pub struct OneShot<T> {
    slot: Option<T>,
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        OneShot { slot: None }
    }
}

impl<T> OneShot<T> {
    /// Returns the value that was overwritten, if any.
    pub fn post(&mut self, value: T) -> Option<T> {
        self.slot.replace(value)
    }

    pub fn drain(&mut self) -> Option<T> {
        self.slot.take()
    }

    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message shown to the user in a blocking dialog until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Error, message: message.into() }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Saved",
            NoticeKind::Error => "Something went wrong",
        }
    }
}
