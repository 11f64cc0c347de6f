use crate::view::Notice;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormId {
    Signup,
    Customer,
}

impl FormId {
    pub fn form_element_id(self) -> &'static str {
        match self {
            FormId::Signup => "signup-form",
            FormId::Customer => "customer-form",
        }
    }

    pub fn notice_element_id(self) -> &'static str {
        match self {
            FormId::Signup => "message",
            FormId::Customer => "customer-message",
        }
    }

    pub fn busy_message(self) -> &'static str {
        match self {
            FormId::Signup => "A signup is already being submitted.",
            FormId::Customer => "A customer is already being created.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
    NoticeShown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotice {
    pub notice: Notice,
    pub expires_at: Instant,
    pub visible: bool,
}

#[derive(Debug, Error)]
#[error("a submission is already in flight")]
pub struct AlreadySubmitting;

/// Lifecycle of one form: `idle -> submitting -> notice shown -> idle`.
///
/// Each shown notice gets a new generation. A hide request carrying an older
/// generation is ignored, so only the latest notice's timer can hide it.
#[derive(Debug, Default)]
pub struct FormStatus {
    submitting: bool,
    notice: Option<ShownNotice>,
    generation: u64,
}

impl FormStatus {
    pub fn phase(&self) -> FormPhase {
        if self.submitting {
            FormPhase::Submitting
        } else if self.notice.as_ref().is_some_and(|shown| shown.visible) {
            FormPhase::NoticeShown
        } else {
            FormPhase::Idle
        }
    }

    pub fn begin(&mut self) -> Result<(), AlreadySubmitting> {
        if self.submitting {
            return Err(AlreadySubmitting);
        }
        self.submitting = true;
        Ok(())
    }

    pub fn settle(&mut self) {
        self.submitting = false;
    }

    pub fn show(&mut self, notice: Notice, expires_at: Instant) -> u64 {
        self.generation += 1;
        self.notice = Some(ShownNotice {
            notice,
            expires_at,
            visible: true,
        });
        self.generation
    }

    pub fn hide(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.notice.as_mut() {
            Some(shown) if shown.visible => {
                shown.visible = false;
                true
            }
            _ => false,
        }
    }

    pub fn notice(&self) -> Option<&ShownNotice> {
        self.notice.as_ref()
    }
}
