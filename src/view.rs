//! View state for the page. Rendering reads it, `Page::apply` is the only
//! place that changes it.

use crate::dispatch::Effect;
use crate::forms::{FormId, FormStatus};
use crate::models::{ActivityCatalog, CustomerForm, CustomerRecord, SignupForm};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// Cards and picker options are both derived from this one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CatalogView {
    #[default]
    Loading,
    Loaded(ActivityCatalog),
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RosterView {
    #[default]
    Loading,
    /// The backend answered with a non-success status.
    Failed,
    /// The request itself failed.
    Errored,
    Empty,
    Listed(Vec<CustomerRecord>),
}

impl RosterView {
    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        if records.is_empty() {
            RosterView::Empty
        } else {
            RosterView::Listed(records)
        }
    }
}

#[derive(Debug, Default)]
pub struct FormView<D> {
    pub draft: D,
    pub status: FormStatus,
}

#[derive(Debug, Default)]
pub struct Page {
    pub catalog: CatalogView,
    pub roster: RosterView,
    pub signup: FormView<SignupForm>,
    pub customer: FormView<CustomerForm>,
    pub refresh_control: bool,
    roster_prefetched_at: Option<Instant>,
}

/// How long a roster fetched by a submission stands in for the page load's
/// own fetch.
pub const ROSTER_REUSE_WINDOW: Duration = Duration::from_secs(5);

impl Page {
    pub fn new(refresh_control: bool) -> Self {
        Self {
            refresh_control,
            ..Self::default()
        }
    }

    /// Records that a submission already refreshed the roster, so the page
    /// load after its redirect does not fetch it again.
    pub fn mark_roster_prefetched(&mut self, now: Instant) {
        self.roster_prefetched_at = Some(now);
    }

    pub fn take_roster_prefetched(&mut self, now: Instant) -> bool {
        self.roster_prefetched_at
            .take()
            .is_some_and(|at| now.saturating_duration_since(at) <= ROSTER_REUSE_WINDOW)
    }

    pub fn status(&self, form: FormId) -> &FormStatus {
        match form {
            FormId::Signup => &self.signup.status,
            FormId::Customer => &self.customer.status,
        }
    }

    pub fn status_mut(&mut self, form: FormId) -> &mut FormStatus {
        match form {
            FormId::Signup => &mut self.signup.status,
            FormId::Customer => &mut self.customer.status,
        }
    }

    /// Applies one effect. When a notice is shown, returns the form and the
    /// notice generation so the caller can arm the hide timer.
    pub fn apply(&mut self, effect: Effect, notice_expires_at: Instant) -> Option<(FormId, u64)> {
        match effect {
            Effect::RenderCatalog(view) => {
                self.catalog = view;
                None
            }
            Effect::RenderRoster(view) => {
                self.roster = view;
                None
            }
            Effect::ShowNotice { form, notice } => {
                let generation = self.status_mut(form).show(notice, notice_expires_at);
                Some((form, generation))
            }
            Effect::ResetForm(FormId::Signup) => {
                self.signup.draft = SignupForm::default();
                None
            }
            Effect::ResetForm(FormId::Customer) => {
                self.customer.draft = CustomerForm::default();
                None
            }
        }
    }
}
