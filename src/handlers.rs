use crate::dispatch::{dispatch, Effect, Event};
use crate::errors::AppError;
use crate::forms::FormId;
use crate::models::{CustomerForm, SignupForm};
use crate::session::Visit;
use crate::state::AppState;
use crate::ui::{render_activities, render_index, render_roster};
use crate::view::{Notice, Page};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, warn};

/// Page load: both collections are requested concurrently, each touching
/// only its own part of the page. A roster fetched moments ago by this
/// browser's customer submission is reused instead of fetched again.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visit = state.visit(&headers).await;
    let roster_prefetched = visit.session.page().await.take_roster_prefetched(Instant::now());

    let (catalog, roster) = tokio::join!(dispatch(&state.client, Event::LoadCatalog), async {
        if roster_prefetched {
            Vec::new()
        } else {
            dispatch(&state.client, Event::LoadRoster).await
        }
    });
    visit.session.apply_all(catalog).await;
    visit.session.apply_all(roster).await;

    render_page(&visit, StatusCode::OK).await
}

/// Fragments carry no drafts or notices, so they render from a throwaway
/// page rather than any browser's session.
pub async fn activities_fragment(State(state): State<AppState>) -> Html<String> {
    let page = fresh_page(dispatch(&state.client, Event::LoadCatalog).await);
    Html(render_activities(&page.catalog))
}

pub async fn customers_fragment(State(state): State<AppState>) -> Html<String> {
    let page = fresh_page(dispatch(&state.client, Event::RefreshRoster).await);
    Html(render_roster(&page.roster))
}

pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SignupForm>,
) -> Response {
    let draft = form.clone();
    submit(&state, &headers, FormId::Signup, Event::SubmitSignup(form), |page| {
        page.signup.draft = draft;
    })
    .await
}

pub async fn create_customer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CustomerForm>,
) -> Response {
    let draft = form.clone();
    submit(&state, &headers, FormId::Customer, Event::SubmitCustomer(form), |page| {
        page.customer.draft = draft;
    })
    .await
}

async fn submit(
    state: &AppState,
    headers: &HeaderMap,
    form: FormId,
    event: Event,
    stash: impl FnOnce(&mut Page),
) -> Response {
    let visit = state.visit(headers).await;
    let guard = match visit.session.begin_submit(form, stash).await {
        Ok(guard) => guard,
        Err(err) => {
            warn!(?form, "{err}");
            visit
                .session
                .apply(Effect::ShowNotice {
                    form,
                    notice: Notice::error(form.busy_message()),
                })
                .await;
            return render_page(&visit, StatusCode::CONFLICT).await;
        }
    };

    // Runs to completion even if the browser goes away, so the outcome is
    // recorded and the form released.
    let client = state.client.clone();
    let session = Arc::clone(&visit.session);
    let outcome = tokio::spawn(async move {
        let effects = dispatch(&client, event).await;
        let refreshed_roster = effects
            .iter()
            .any(|effect| matches!(effect, Effect::RenderRoster(_)));
        session.apply_all(effects).await;
        if refreshed_roster {
            session.page().await.mark_roster_prefetched(Instant::now());
        }
        guard.settle().await;
    })
    .await;

    if let Err(err) = outcome {
        error!(?form, "submission task failed: {err}");
        return visit.respond(AppError::internal("Submission failed. Please try again."));
    }
    visit.respond(Redirect::to(&format!("/#{}", form.form_element_id())))
}

async fn render_page(visit: &Visit, status: StatusCode) -> Response {
    let html = render_index(&*visit.session.page().await, Instant::now());
    visit.respond((status, Html(html)))
}

fn fresh_page(effects: Vec<Effect>) -> Page {
    let mut page = Page::default();
    let now = Instant::now();
    for effect in effects {
        page.apply(effect, now);
    }
    page
}
