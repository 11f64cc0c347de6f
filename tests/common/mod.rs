#![allow(dead_code)]

//! In-process stand-in for the activities/customers REST backend.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::net::TcpListener;
use std::sync::{mpsc, Arc};
use std::time::Duration;
use tokio::sync::Mutex;

pub struct StubData {
    pub activities: Vec<(String, Value)>,
    pub customers: Vec<Value>,
    /// Forces `GET /activities` to answer with this status.
    pub activities_status: Option<StatusCode>,
    /// Forces `GET /customers` to answer with this status.
    pub customers_status: Option<StatusCode>,
    /// Makes a successful `GET /customers` answer `null`.
    pub customers_null: bool,
    /// Holds `POST /customers` for this long before answering.
    pub customer_delay: Option<Duration>,
    /// Number of `GET /customers` requests served.
    pub customer_fetches: usize,
}

impl Default for StubData {
    fn default() -> Self {
        Self {
            activities: vec![
                activity(
                    "Chess Club",
                    "Learn strategies and compete in chess tournaments",
                    "Fridays, 3:30 PM - 5:00 PM",
                    12,
                    &["michael@mergington.edu", "daniel@mergington.edu"],
                ),
                activity(
                    "Programming Class",
                    "Learn programming fundamentals and build software projects",
                    "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                    20,
                    &["emma@mergington.edu", "sophia@mergington.edu"],
                ),
                activity(
                    "Gym Class",
                    "Physical education and sports activities",
                    "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                    30,
                    &["john@mergington.edu", "olivia@mergington.edu"],
                ),
            ],
            customers: Vec::new(),
            activities_status: None,
            customers_status: None,
            customers_null: false,
            customer_delay: None,
            customer_fetches: 0,
        }
    }
}

pub fn activity(
    name: &str,
    description: &str,
    schedule: &str,
    max_participants: i64,
    participants: &[&str],
) -> (String, Value) {
    (
        name.to_string(),
        json!({
            "description": description,
            "schedule": schedule,
            "max_participants": max_participants,
            "participants": participants,
        }),
    )
}

pub fn customer(first_name: &str, last_name: &str) -> Value {
    json!({
        "first_name": first_name,
        "middle_name": null,
        "last_name": last_name,
        "dob": "1990-05-17",
        "address_line_1": "12 Elm St",
        "zip_code": "01234",
        "city": "Mergington",
        "state": "MA",
        "country": "USA",
    })
}

#[derive(Clone)]
pub struct StubBackend {
    pub base_url: String,
    pub data: Arc<Mutex<StubData>>,
}

impl StubBackend {
    /// Serves on the current runtime.
    pub async fn start() -> Self {
        Self::start_with(StubData::default()).await
    }

    pub async fn start_with(data: StubData) -> Self {
        let data = Arc::new(Mutex::new(data));
        let app = Router::new()
            .route("/activities", get(get_activities))
            .route("/activities/:name/signup", axum::routing::post(signup))
            .route("/customers", get(get_customers).post(create_customer))
            .with_state(Arc::clone(&data));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            data,
        }
    }

    /// Serves from a dedicated thread so the backend outlives any single
    /// test runtime.
    pub fn start_detached() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                tx.send(StubBackend::start().await).expect("report stub backend");
                std::future::pending::<()>().await;
            });
        });
        rx.recv().expect("stub backend did not start")
    }
}

/// A base url nothing is listening on.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

type Shared = State<Arc<Mutex<StubData>>>;

async fn get_activities(State(data): Shared) -> (StatusCode, Json<Value>) {
    let data = data.lock().await;
    if let Some(status) = data.activities_status {
        return (status, Json(json!({ "detail": "Activities unavailable" })));
    }
    let mut body = Map::new();
    for (name, details) in &data.activities {
        body.insert(name.clone(), details.clone());
    }
    (StatusCode::OK, Json(Value::Object(body)))
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

async fn signup(
    State(data): Shared,
    Path(name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> (StatusCode, Json<Value>) {
    let mut data = data.lock().await;
    let Some((_, details)) = data.activities.iter_mut().find(|entry| entry.0 == name) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Activity not found" })));
    };
    let participants = details["participants"]
        .as_array_mut()
        .expect("participants array");
    if participants.iter().any(|p| p.as_str() == Some(query.email.as_str())) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Already signed up" })));
    }
    participants.push(Value::String(query.email.clone()));
    (
        StatusCode::OK,
        Json(json!({ "message": format!("Signed up {} for {}", query.email, name) })),
    )
}

async fn get_customers(State(data): Shared) -> (StatusCode, Json<Value>) {
    let mut data = data.lock().await;
    data.customer_fetches += 1;
    if let Some(status) = data.customers_status {
        return (status, Json(json!({ "detail": "Customers unavailable" })));
    }
    if data.customers_null {
        return (StatusCode::OK, Json(Value::Null));
    }
    (StatusCode::OK, Json(Value::Array(data.customers.clone())))
}

async fn create_customer(State(data): Shared, Json(customer): Json<Value>) -> (StatusCode, Json<Value>) {
    let delay = data.lock().await.customer_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let dob = customer["dob"].as_str().unwrap_or_default();
    let Ok(dob) = NaiveDate::parse_from_str(dob, "%Y-%m-%d") else {
        return bad_request("Invalid DOB format. Use YYYY-MM-DD");
    };
    let today = Local::now().date_naive();
    if dob > today {
        return bad_request("DOB cannot be in the future");
    }
    let had_birthday = (today.month(), today.day()) >= (dob.month(), dob.day());
    let age = today.year() - dob.year() - if had_birthday { 0 } else { 1 };
    if age < 18 {
        return bad_request("Customer must be at least 18 years old");
    }

    data.lock().await.customers.push(customer.clone());
    (
        StatusCode::OK,
        Json(json!({ "message": "New Customer created", "customer": customer })),
    )
}

fn bad_request(detail: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail })))
}
