use crate::client::{BackendClient, Fetched, Submission};
use crate::dispatch::Effect;
use crate::forms::FormId;
use crate::models::CustomerForm;
use crate::view::{Notice, RosterView};
use tracing::{error, warn};

pub const CUSTOMER_CREATED: &str = "Customer created";
pub const CUSTOMER_REJECTED: &str = "Failed to create customer";
pub const CUSTOMER_FAILED: &str = "Failed to create customer. Please try again.";

pub async fn load_roster(client: &BackendClient) -> RosterView {
    match client.fetch_customers().await {
        Ok(Fetched::Loaded(customers)) => RosterView::from_records(customers),
        Ok(Fetched::Unavailable(status)) => {
            warn!(%status, "customer list unavailable");
            RosterView::Failed
        }
        Err(err) => {
            error!("error fetching customers: {err}");
            RosterView::Errored
        }
    }
}

/// On success the roster is fetched again so the new record shows up.
pub async fn submit_customer(client: &BackendClient, form: &CustomerForm) -> Vec<Effect> {
    match client.create_customer(&form.to_payload()).await {
        Ok(Submission::Accepted(body)) => {
            let text = body
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| CUSTOMER_CREATED.to_string());
            vec![
                Effect::ShowNotice {
                    form: FormId::Customer,
                    notice: Notice::success(text),
                },
                Effect::ResetForm(FormId::Customer),
                Effect::RenderRoster(load_roster(client).await),
            ]
        }
        Ok(Submission::Rejected(status, body)) => {
            warn!(%status, "customer creation rejected");
            let text = body.detail_text().unwrap_or(CUSTOMER_REJECTED).to_string();
            vec![Effect::ShowNotice {
                form: FormId::Customer,
                notice: Notice::error(text),
            }]
        }
        Err(err) => {
            error!("error creating customer: {err}");
            vec![Effect::ShowNotice {
                form: FormId::Customer,
                notice: Notice::error(CUSTOMER_FAILED),
            }]
        }
    }
}
