pub mod activities;
pub mod app;
pub mod client;
pub mod config;
pub mod customers;
pub mod dispatch;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod ui;
pub mod view;

pub use app::router;
pub use client::BackendClient;
pub use config::Config;
pub use dispatch::{dispatch, Effect, Event};
pub use state::AppState;
