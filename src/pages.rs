//! Per-page controllers: each page owns its view state and drives the
//! gateway and decoder on mount or on an explicit user action.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use crate::adoption::{
    BASELINE_ADOPTION, ECO_PACKAGE_RANGE, PRICE_RANGE, adjusted_adoption, clamp_to, format_percent,
};
use crate::controller::{LoadOutcome, ViewController, ViewState};
use crate::decoder::decode;
use crate::error::Result;
use crate::gateway::ModelGateway;
use crate::prompts::{
    DEFAULT_ECO_PACKAGE, DEFAULT_PRICE, Feature, ForecastRequest, IdeaBrief, MockupRequest,
    PromptPair, dashboard_overview_prompt, product_idea_prompt, product_mockup_prompt,
    trend_forecast_prompt,
};
use crate::schema::{DashboardOverview, FeatureSchema, ProductIdea, ProductMockup, TrendForecast};
use crate::transcript::{ChatTranscript, TranscriptMessage};
use crate::view_model::{DashboardView, IdeaView, TrendForecastView};

pub const DASHBOARD_ERROR: &str = "Failed to load AI dashboard overview. Please try again.";
pub const FORECAST_ERROR: &str = "Failed to load AI trend forecast. Please try again.";
pub const IDEA_ERROR: &str =
    "Something went wrong while generating the product idea. Please try again.";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One model round trip: prompt in, typed document out
async fn fetch<T: FeatureSchema>(gateway: &ModelGateway, prompt: &PromptPair) -> Result<T> {
    let raw = gateway.invoke_prompt(prompt).await?;
    Ok(decode::<T>(&raw)?)
}

// ---- Dashboard ----

pub struct DashboardPage {
    gateway: Arc<ModelGateway>,
    view: Arc<ViewController<DashboardOverview>>,
}

impl DashboardPage {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            gateway,
            view: Arc::new(ViewController::new(Feature::DashboardOverview, DASHBOARD_ERROR)),
        }
    }

    /// Start the automatic overview load
    pub fn mount(&self) -> JoinHandle<LoadOutcome> {
        let gateway = Arc::clone(&self.gateway);
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            let prompt = dashboard_overview_prompt();
            view.load(fetch::<DashboardOverview>(&gateway, &prompt)).await
        })
    }

    pub async fn reload(&self) -> LoadOutcome {
        let prompt = dashboard_overview_prompt();
        self.view
            .load(fetch::<DashboardOverview>(&self.gateway, &prompt))
            .await
    }

    pub fn unmount(&self) {
        self.view.unmount();
    }

    pub fn controller(&self) -> &ViewController<DashboardOverview> {
        &self.view
    }

    pub fn state(&self) -> ViewState<DashboardOverview> {
        self.view.state()
    }

    pub fn view(&self) -> Option<DashboardView> {
        self.view.data().as_ref().map(DashboardView::from)
    }
}

// ---- Trend forecasting ----

pub struct TrendForecastingPage {
    gateway: Arc<ModelGateway>,
    view: Arc<ViewController<TrendForecast>>,
}

impl TrendForecastingPage {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            gateway,
            view: Arc::new(ViewController::new(Feature::TrendForecast, FORECAST_ERROR)),
        }
    }

    /// Start the automatic forecast with default parameters
    pub fn mount(&self) -> JoinHandle<LoadOutcome> {
        self.spawn_forecast(ForecastRequest::default())
    }

    /// "Run Forecast": overlapping runs are all sent, the latest issued wins
    pub fn spawn_forecast(&self, request: ForecastRequest) -> JoinHandle<LoadOutcome> {
        let gateway = Arc::clone(&self.gateway);
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            let prompt = trend_forecast_prompt(&request);
            view.load(fetch::<TrendForecast>(&gateway, &prompt)).await
        })
    }

    pub async fn run_forecast(&self, request: ForecastRequest) -> LoadOutcome {
        let prompt = trend_forecast_prompt(&request);
        self.view
            .load(fetch::<TrendForecast>(&self.gateway, &prompt))
            .await
    }

    pub fn unmount(&self) {
        self.view.unmount();
    }

    pub fn controller(&self) -> &ViewController<TrendForecast> {
        &self.view
    }

    pub fn state(&self) -> ViewState<TrendForecast> {
        self.view.state()
    }

    pub fn view(&self) -> Option<TrendForecastView> {
        self.view.data().as_ref().map(TrendForecastView::from)
    }
}

// ---- Product ideation ----

/// Image slot next to the generated concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockupSlot {
    Empty,
    Pending,
    Ready(ProductMockup),
    Unavailable,
}

/// The slot plus the submit generation it belongs to; both change under one lock
#[derive(Debug)]
struct MockupState {
    generation: u64,
    slot: MockupSlot,
}

#[derive(Debug, Clone)]
struct IdeaForm {
    query: String,
    price: f64,
    eco_package: f64,
}

pub struct ProductIdeationPage {
    gateway: Arc<ModelGateway>,
    view: Arc<ViewController<ProductIdea>>,
    form: Mutex<IdeaForm>,
    mockups_enabled: bool,
    mockup: Arc<Mutex<MockupState>>,
    mockup_task: Mutex<Option<JoinHandle<()>>>,
    transcript: Mutex<ChatTranscript>,
}

impl ProductIdeationPage {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            gateway,
            view: Arc::new(ViewController::new(Feature::ProductIdea, IDEA_ERROR)),
            form: Mutex::new(IdeaForm {
                query: String::new(),
                price: DEFAULT_PRICE,
                eco_package: DEFAULT_ECO_PACKAGE,
            }),
            mockups_enabled: true,
            mockup: Arc::new(Mutex::new(MockupState {
                generation: 0,
                slot: MockupSlot::Empty,
            })),
            mockup_task: Mutex::new(None),
            transcript: Mutex::new(ChatTranscript::new()),
        }
    }

    pub fn without_mockups(mut self) -> Self {
        self.mockups_enabled = false;
        self
    }

    pub fn set_query(&self, query: impl Into<String>) {
        lock(&self.form).query = query.into();
    }

    pub fn set_price(&self, price: f64) {
        lock(&self.form).price = clamp_to(&PRICE_RANGE, price);
    }

    pub fn set_eco_package(&self, eco_package: f64) {
        lock(&self.form).eco_package = clamp_to(&ECO_PACKAGE_RANGE, eco_package);
    }

    pub fn price(&self) -> f64 {
        lock(&self.form).price
    }

    pub fn eco_package(&self) -> f64 {
        lock(&self.form).eco_package
    }

    /// Submit is disabled for a blank brief or while a request is running
    pub fn can_submit(&self) -> bool {
        !lock(&self.form).query.trim().is_empty() && !self.view.is_loading()
    }

    /// Send the current brief. Returns `None` when submitting is disabled.
    pub async fn submit(&self) -> Option<LoadOutcome> {
        if !self.can_submit() {
            return None;
        }

        let brief = {
            let form = lock(&self.form);
            IdeaBrief {
                query: form.query.clone(),
                price: form.price,
                eco_package: form.eco_package,
            }
        };
        lock(&self.transcript).push_user(brief.query.trim());
        let generation = {
            let mut mockup = lock(&self.mockup);
            mockup.generation += 1;
            mockup.slot = MockupSlot::Empty;
            mockup.generation
        };

        let prompt = product_idea_prompt(&brief);
        let outcome = self
            .view
            .load(fetch::<ProductIdea>(&self.gateway, &prompt))
            .await;

        match outcome {
            LoadOutcome::Applied => {
                if let Some(idea) = self.view.data() {
                    let reply = self.summarize(&idea);
                    lock(&self.transcript).push_assistant(reply);
                    if self.mockups_enabled {
                        self.spawn_mockup(&idea, generation);
                    }
                }
            }
            LoadOutcome::Failed => {
                lock(&self.transcript).push_assistant(IDEA_ERROR);
            }
            LoadOutcome::Superseded | LoadOutcome::Unmounted => {}
        }
        Some(outcome)
    }

    fn summarize(&self, idea: &ProductIdea) -> String {
        let view = IdeaView::new(idea, self.price(), self.eco_package());
        if view.short_description.is_empty() {
            format!("{} (adoption ~{}%)", view.name, view.adjusted_adoption)
        } else {
            format!(
                "{}: {} (adoption ~{}%)",
                view.name, view.short_description, view.adjusted_adoption
            )
        }
    }

    fn spawn_mockup(&self, idea: &ProductIdea, generation: u64) {
        {
            let mut mockup = lock(&self.mockup);
            if mockup.generation != generation || !self.view.is_mounted() {
                return;
            }
            mockup.slot = MockupSlot::Pending;
        }
        let request = MockupRequest {
            name: idea.name.clone().unwrap_or_default(),
            short_description: idea.short_description.clone().unwrap_or_default(),
        };

        let gateway = Arc::clone(&self.gateway);
        let view = Arc::clone(&self.view);
        let state = Arc::clone(&self.mockup);
        let handle = tokio::spawn(async move {
            let prompt = product_mockup_prompt(&request);
            let res = gateway.generate_image(&prompt).await;

            let mut mockup = lock(&state);
            if !view.is_mounted() || mockup.generation != generation {
                tracing::debug!(generation, "Dropping mockup for a superseded idea");
                return;
            }
            mockup.slot = match res {
                Ok(url) => MockupSlot::Ready(ProductMockup { url }),
                Err(e) => {
                    tracing::warn!(
                        feature = %Feature::ProductMockup,
                        error = %e,
                        "Mockup generation failed, showing placeholder"
                    );
                    MockupSlot::Unavailable
                }
            };
        });

        // An earlier mockup task is left to finish on its own.
        *lock(&self.mockup_task) = Some(handle);
    }

    /// Wait for the most recent mockup fetch, if one is running
    pub async fn wait_for_mockup(&self) {
        let handle = lock(&self.mockup_task).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Mockup task ended abnormally");
            }
        }
    }

    pub fn mockup(&self) -> MockupSlot {
        lock(&self.mockup).slot.clone()
    }

    /// Caption shown in the image slot while no image is available
    pub fn mockup_caption(&self) -> Option<String> {
        self.view.data().as_ref().map(crate::view_model::mockup_caption)
    }

    /// Base probability adjusted by the current slider positions
    pub fn adjusted_adoption(&self) -> f64 {
        let base = self
            .view
            .data()
            .and_then(|idea| idea.adoption_probability)
            .unwrap_or(BASELINE_ADOPTION);
        adjusted_adoption(base, self.price(), self.eco_package())
    }

    pub fn adjusted_adoption_label(&self) -> String {
        format_percent(self.adjusted_adoption())
    }

    pub fn transcript(&self) -> Vec<TranscriptMessage> {
        lock(&self.transcript).messages().to_vec()
    }

    pub fn unmount(&self) {
        let _mockup = lock(&self.mockup);
        self.view.unmount();
    }

    pub fn controller(&self) -> &ViewController<ProductIdea> {
        &self.view
    }

    pub fn state(&self) -> ViewState<ProductIdea> {
        self.view.state()
    }

    pub fn view(&self) -> Option<IdeaView> {
        self.view
            .data()
            .map(|idea| IdeaView::new(&idea, self.price(), self.eco_package()))
    }
}
