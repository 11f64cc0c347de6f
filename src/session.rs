//! Page state for one browser. Drafts, notices, hide timers and the
//! in-flight guard all live here, keyed by the session cookie.

use crate::dispatch::Effect;
use crate::forms::{AlreadySubmitting, FormId};
use crate::view::Page;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use cookie::{Cookie, SameSite};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    runtime::Handle,
    sync::{Mutex, MutexGuard},
    task::AbortHandle,
    time::{sleep, Instant},
};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "portal_session";

pub struct Session {
    page: Mutex<Page>,
    timers: Mutex<HashMap<FormId, AbortHandle>>,
    notice_hide_after: Duration,
}

impl Session {
    pub fn new(refresh_control: bool, notice_hide_after: Duration) -> Self {
        Self {
            page: Mutex::new(Page::new(refresh_control)),
            timers: Mutex::new(HashMap::new()),
            notice_hide_after,
        }
    }

    pub async fn page(&self) -> MutexGuard<'_, Page> {
        self.page.lock().await
    }

    /// Marks the form as submitting and keeps the draft so a rejected
    /// submission can be re-rendered with the user's input. The form stays
    /// busy until the returned guard is settled or dropped.
    pub async fn begin_submit(
        self: &Arc<Self>,
        form: FormId,
        stash: impl FnOnce(&mut Page),
    ) -> Result<SubmitGuard, AlreadySubmitting> {
        let mut page = self.page.lock().await;
        page.status_mut(form).begin()?;
        stash(&mut page);
        Ok(SubmitGuard {
            session: Some(Arc::clone(self)),
            form,
        })
    }

    pub async fn apply_all(self: &Arc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            self.apply(effect).await;
        }
    }

    /// Applies an effect to the page. Showing a notice arms its hide timer
    /// and cancels the timer of the notice it replaces.
    pub async fn apply(self: &Arc<Self>, effect: Effect) {
        let shown = {
            let mut page = self.page.lock().await;
            page.apply(effect, Instant::now() + self.notice_hide_after)
        };
        if let Some((form, generation)) = shown {
            self.arm_hide_timer(form, generation).await;
        }
    }

    async fn arm_hide_timer(self: &Arc<Self>, form: FormId, generation: u64) {
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            sleep(session.notice_hide_after).await;
            if session.page.lock().await.status_mut(form).hide(generation) {
                debug!(?form, generation, "notice hidden");
            }
        });

        if let Some(previous) = self.timers.lock().await.insert(form, handle.abort_handle()) {
            previous.abort();
        }
    }
}

/// Holds a form in its submitting phase. Dropping it without `settle`
/// (a cancelled or panicked submission) still releases the form.
pub struct SubmitGuard {
    session: Option<Arc<Session>>,
    form: FormId,
}

impl SubmitGuard {
    pub async fn settle(mut self) {
        if let Some(session) = &self.session {
            session.page.lock().await.status_mut(self.form).settle();
        }
        self.session = None;
    }
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let form = self.form;
        debug!(?form, "submission abandoned, releasing form");
        let released = match session.page.try_lock() {
            Ok(mut page) => {
                page.status_mut(form).settle();
                true
            }
            Err(_) => false,
        };
        if released {
            return;
        }
        if let Ok(handle) = Handle::try_current() {
            handle.spawn(async move {
                session.page.lock().await.status_mut(form).settle();
            });
        }
    }
}

/// One request's view of its session.
pub struct Visit {
    pub id: Uuid,
    pub session: Arc<Session>,
    pub is_new: bool,
}

impl Visit {
    /// Attaches the session cookie when this request started the session.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&session_cookie(self.id).to_string()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Reads the session id from the request's `Cookie` headers, ignoring other
/// cookies and values that are not ids.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}
