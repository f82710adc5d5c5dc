pub mod adoption;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pages;
pub mod prompts;
pub mod routes;
pub mod schema;
pub mod transcript;
pub mod transport;
pub mod view_model;

#[cfg(test)]
mod test_support;

pub use crate::config::Config;
pub use crate::controller::{LoadOutcome, ViewController, ViewState};
pub use crate::error::{DecodeError, Result, StudioError};
pub use crate::gateway::{GatewayConfig, ModelGateway};
pub use crate::pages::{DashboardPage, MockupSlot, ProductIdeationPage, TrendForecastingPage};
pub use crate::prompts::{Feature, ForecastRequest, IdeaBrief};
pub use crate::routes::Route;
