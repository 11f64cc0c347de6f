use crate::activities;
use crate::client::BackendClient;
use crate::customers;
use crate::forms::FormId;
use crate::models::{CustomerForm, SignupForm};
use crate::view::{CatalogView, Notice, RosterView};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    LoadCatalog,
    SubmitSignup(SignupForm),
    LoadRoster,
    SubmitCustomer(CustomerForm),
    RefreshRoster,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderCatalog(CatalogView),
    RenderRoster(RosterView),
    ShowNotice { form: FormId, notice: Notice },
    ResetForm(FormId),
}

/// Runs one event against the backend. Every failure is already folded into
/// the returned effects.
pub async fn dispatch(client: &BackendClient, event: Event) -> Vec<Effect> {
    match event {
        Event::LoadCatalog => vec![Effect::RenderCatalog(activities::load_catalog(client).await)],
        Event::SubmitSignup(form) => activities::submit_signup(client, &form).await,
        Event::LoadRoster | Event::RefreshRoster => {
            vec![Effect::RenderRoster(customers::load_roster(client).await)]
        }
        Event::SubmitCustomer(form) => customers::submit_customer(client, &form).await,
    }
}
