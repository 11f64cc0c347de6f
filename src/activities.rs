use crate::client::{BackendClient, Fetched, Submission};
use crate::dispatch::Effect;
use crate::forms::FormId;
use crate::models::SignupForm;
use crate::view::{CatalogView, Notice};
use tracing::{error, warn};

pub const SIGNUP_REJECTED: &str = "An error occurred";
pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";

pub async fn load_catalog(client: &BackendClient) -> CatalogView {
    match client.fetch_activities().await {
        Ok(Fetched::Loaded(catalog)) => CatalogView::Loaded(catalog),
        Ok(Fetched::Unavailable(status)) => {
            error!("error fetching activities: backend answered {status}");
            CatalogView::Failed
        }
        Err(err) => {
            error!("error fetching activities: {err}");
            CatalogView::Failed
        }
    }
}

pub async fn submit_signup(client: &BackendClient, form: &SignupForm) -> Vec<Effect> {
    match client.sign_up(&form.activity, &form.email).await {
        Ok(Submission::Accepted(body)) => vec![
            Effect::ShowNotice {
                form: FormId::Signup,
                notice: Notice::success(body.message.unwrap_or_default()),
            },
            Effect::ResetForm(FormId::Signup),
        ],
        Ok(Submission::Rejected(status, body)) => {
            warn!(%status, activity = %form.activity, "signup rejected");
            let text = body.detail_text().unwrap_or(SIGNUP_REJECTED).to_string();
            vec![Effect::ShowNotice {
                form: FormId::Signup,
                notice: Notice::error(text),
            }]
        }
        Err(err) => {
            error!("error signing up: {err}");
            vec![Effect::ShowNotice {
                form: FormId::Signup,
                notice: Notice::error(SIGNUP_FAILED),
            }]
        }
    }
}
