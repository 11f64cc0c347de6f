mod common;

use common::{activity, customer, dead_base_url, StubBackend, StubData};
use mergington_portal::activities::{SIGNUP_FAILED, SIGNUP_REJECTED};
use mergington_portal::customers::CUSTOMER_FAILED;
use mergington_portal::forms::FormId;
use mergington_portal::models::{CustomerForm, SignupForm};
use mergington_portal::ui::{render_activities, render_picker_options, render_roster, CUSTOMERS_EMPTY};
use mergington_portal::view::{CatalogView, Notice, NoticeKind, RosterView};
use mergington_portal::{dispatch, BackendClient, Effect, Event};
use reqwest::{StatusCode, Url};

fn client_for(base_url: &str) -> BackendClient {
    BackendClient::with_base_url(Url::parse(base_url).unwrap())
}

fn adult(first_name: &str) -> CustomerForm {
    CustomerForm {
        first_name: first_name.to_string(),
        middle_name: String::new(),
        last_name: "Doe".to_string(),
        dob: "1985-03-02".to_string(),
        address_line_1: "1 Main St".to_string(),
        zip_code: "12345".to_string(),
        city: "Anytown".to_string(),
        state: "CA".to_string(),
        country: "USA".to_string(),
    }
}

fn catalog_of(effects: Vec<Effect>) -> CatalogView {
    match effects.as_slice() {
        [Effect::RenderCatalog(view)] => view.clone(),
        other => panic!("expected a single catalog render, got {other:?}"),
    }
}

fn roster_of(effects: Vec<Effect>) -> RosterView {
    match effects.as_slice() {
        [Effect::RenderRoster(view)] => view.clone(),
        other => panic!("expected a single roster render, got {other:?}"),
    }
}

#[tokio::test]
async fn catalog_card_and_option_come_from_one_fetch() {
    let backend = StubBackend::start_with(StubData {
        activities: vec![activity(
            "Chess Club",
            "Weekly chess",
            "Fridays",
            10,
            &["a@x.com", "b@x.com"],
        )],
        ..StubData::default()
    })
    .await;
    let client = client_for(&backend.base_url);

    let view = catalog_of(dispatch(&client, Event::LoadCatalog).await);
    let cards = render_activities(&view);
    assert!(cards.contains("<h4>Chess Club</h4>"));
    assert!(cards.contains("8 spots left"));
    assert_eq!(
        render_picker_options(&view, ""),
        r#"<option value="Chess Club">Chess Club</option>"#
    );
}

#[tokio::test]
async fn catalog_failure_status_is_a_failed_view() {
    let backend = StubBackend::start_with(StubData {
        activities_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..StubData::default()
    })
    .await;
    let client = client_for(&backend.base_url);

    let view = catalog_of(dispatch(&client, Event::LoadCatalog).await);
    assert_eq!(view, CatalogView::Failed);
}

#[tokio::test]
async fn empty_and_null_rosters_show_the_empty_state() {
    let backend = StubBackend::start().await;
    let client = client_for(&backend.base_url);

    let view = roster_of(dispatch(&client, Event::LoadRoster).await);
    assert_eq!(view, RosterView::Empty);
    assert_eq!(render_roster(&view), CUSTOMERS_EMPTY);

    backend.data.lock().await.customers_null = true;
    let view = roster_of(dispatch(&client, Event::RefreshRoster).await);
    assert_eq!(view, RosterView::Empty);
}

#[tokio::test]
async fn roster_failure_status_is_distinct_from_transport_error() {
    let backend = StubBackend::start_with(StubData {
        customers_status: Some(StatusCode::SERVICE_UNAVAILABLE),
        ..StubData::default()
    })
    .await;
    let view = roster_of(dispatch(&client_for(&backend.base_url), Event::LoadRoster).await);
    assert_eq!(view, RosterView::Failed);

    let view = roster_of(dispatch(&client_for(&dead_base_url()), Event::LoadRoster).await);
    assert_eq!(view, RosterView::Errored);
}

#[tokio::test]
async fn roster_lists_every_record_escaped() {
    let backend = StubBackend::start_with(StubData {
        customers: vec![
            customer("Ann", "Lee"),
            customer("<script>", "O'Neil & \"Co\""),
            customer("Bo", "Ray"),
        ],
        ..StubData::default()
    })
    .await;
    let client = client_for(&backend.base_url);

    let view = roster_of(dispatch(&client, Event::LoadRoster).await);
    let html = render_roster(&view);
    assert_eq!(html.matches("<li>").count(), 3);
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("O&#039;Neil &amp; &quot;Co&quot;"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn rejected_signup_surfaces_backend_detail() {
    let backend = StubBackend::start().await;
    let client = client_for(&backend.base_url);
    let form = SignupForm {
        email: "michael@mergington.edu".to_string(),
        activity: "Chess Club".to_string(),
    };

    let effects = dispatch(&client, Event::SubmitSignup(form)).await;
    assert_eq!(
        effects,
        vec![Effect::ShowNotice {
            form: FormId::Signup,
            notice: Notice::error("Already signed up"),
        }]
    );
}

#[tokio::test]
async fn accepted_signup_shows_message_and_resets_form() {
    let backend = StubBackend::start_with(StubData {
        activities: vec![activity("Art & Craft/Design", "Paint", "Mondays", 5, &[])],
        ..StubData::default()
    })
    .await;
    let client = client_for(&backend.base_url);
    let form = SignupForm {
        email: "new+kid@mergington.edu".to_string(),
        activity: "Art & Craft/Design".to_string(),
    };

    let effects = dispatch(&client, Event::SubmitSignup(form)).await;
    assert_eq!(
        effects,
        vec![
            Effect::ShowNotice {
                form: FormId::Signup,
                notice: Notice::success("Signed up new+kid@mergington.edu for Art & Craft/Design"),
            },
            Effect::ResetForm(FormId::Signup),
        ]
    );

    // capacity is only ever reflected by the next fetch
    let view = catalog_of(dispatch(&client, Event::LoadCatalog).await);
    assert!(render_activities(&view).contains("4 spots left"));
}

#[tokio::test]
async fn unknown_activity_uses_backend_detail() {
    let backend = StubBackend::start().await;
    let client = client_for(&backend.base_url);
    let form = SignupForm {
        email: "a@x.com".to_string(),
        activity: "Underwater Basket Weaving".to_string(),
    };

    let effects = dispatch(&client, Event::SubmitSignup(form)).await;
    match effects.as_slice() {
        [Effect::ShowNotice { notice, .. }] => {
            assert_eq!(notice.kind, NoticeKind::Error);
            assert_eq!(notice.text, "Activity not found");
            assert_ne!(notice.text, SIGNUP_REJECTED);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[tokio::test]
async fn created_customer_appears_in_refreshed_roster() {
    let backend = StubBackend::start().await;
    let client = client_for(&backend.base_url);

    let effects = dispatch(&client, Event::SubmitCustomer(adult("Jane"))).await;
    assert_eq!(effects.len(), 3);
    assert_eq!(
        effects[0],
        Effect::ShowNotice {
            form: FormId::Customer,
            notice: Notice::success("New Customer created"),
        }
    );
    assert_eq!(effects[1], Effect::ResetForm(FormId::Customer));
    match &effects[2] {
        Effect::RenderRoster(RosterView::Listed(customers)) => {
            assert_eq!(customers.len(), 1);
            assert_eq!(customers[0].first_name, "Jane");
            assert_eq!(customers[0].middle_name, None);
        }
        other => panic!("expected refreshed roster, got {other:?}"),
    }

    let stored = backend.data.lock().await.customers.clone();
    assert_eq!(stored[0]["middle_name"], serde_json::Value::Null);
}

#[tokio::test]
async fn rejected_customer_keeps_form_and_roster() {
    let backend = StubBackend::start().await;
    let client = client_for(&backend.base_url);
    let minor = CustomerForm {
        dob: "2999-01-01".to_string(),
        ..adult("Kid")
    };

    let effects = dispatch(&client, Event::SubmitCustomer(minor)).await;
    assert_eq!(
        effects,
        vec![Effect::ShowNotice {
            form: FormId::Customer,
            notice: Notice::error("DOB cannot be in the future"),
        }]
    );
    assert!(backend.data.lock().await.customers.is_empty());
}

#[tokio::test]
async fn unreachable_backend_yields_generic_notices() {
    let client = client_for(&dead_base_url());

    let view = catalog_of(dispatch(&client, Event::LoadCatalog).await);
    assert_eq!(view, CatalogView::Failed);

    let signup = SignupForm {
        email: "a@x.com".to_string(),
        activity: "Chess Club".to_string(),
    };
    assert_eq!(
        dispatch(&client, Event::SubmitSignup(signup)).await,
        vec![Effect::ShowNotice {
            form: FormId::Signup,
            notice: Notice::error(SIGNUP_FAILED),
        }]
    );

    assert_eq!(
        dispatch(&client, Event::SubmitCustomer(adult("Jane"))).await,
        vec![Effect::ShowNotice {
            form: FormId::Customer,
            notice: Notice::error(CUSTOMER_FAILED),
        }]
    );
}
