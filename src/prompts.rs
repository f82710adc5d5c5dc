/// The four model-backed features of the studio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    DashboardOverview,
    TrendForecast,
    ProductIdea,
    ProductMockup,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Feature::DashboardOverview => "dashboard overview",
            Feature::TrendForecast => "trend forecast",
            Feature::ProductIdea => "product idea",
            Feature::ProductMockup => "product mockup",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// System and user prompt for a single chat-completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Parameters for the trend forecasting agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub category: String,
    pub region: String,
    pub time_horizon: String,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            category: "FMCG beverages (carbonated drinks)".to_string(),
            region: "urban India".to_string(),
            time_horizon: "next 5 weeks".to_string(),
        }
    }
}

impl ForecastRequest {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_time_horizon(mut self, time_horizon: impl Into<String>) -> Self {
        self.time_horizon = time_horizon.into();
        self
    }
}

pub const DEFAULT_PRICE: f64 = 5.99;
pub const DEFAULT_ECO_PACKAGE: f64 = 75.0;

/// A product ideation brief as submitted from the query bar
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaBrief {
    pub query: String,
    /// Target price in USD
    pub price: f64,
    /// Eco-friendly packaging target in percent
    pub eco_package: f64,
}

impl IdeaBrief {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            price: DEFAULT_PRICE,
            eco_package: DEFAULT_ECO_PACKAGE,
        }
    }
}

/// Input for the packaging mockup image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockupRequest {
    pub name: String,
    pub short_description: String,
}

const DASHBOARD_SYSTEM_PROMPT: &str = r#"
You are an AI assistant that prepares a daily overview dashboard
for an FMCG beverage product manager.

You MUST reply with STRICT VALID JSON only.

Use this JSON structure exactly:

{
  "summary": {
    "forecastedRevenueLabel": string,
    "forecastedRevenueChangeLabel": string,
    "activeTrendsTrackedLabel": string,
    "activeTrendsChangeLabel": string,
    "newProductsIdeatedLabel": string,
    "newProductsChangeLabel": string,
    "hotSkuName": string,
    "hotSkuVolumeLabel": string,
    "hotSkuChangeLabel": string
  },
  "salesData": [
    { "name": string, "revenue": number }
  ],
  "topTrends": [
    { "name": string, "probability": number }
  ],
  "aiSummaryBullets": [ string ],
  "alerts": [ string ]
}
"#;

const DASHBOARD_USER_PROMPT: &str = r#"
Generate a 6-month forward-looking revenue forecast, top 3-5 consumer trends,
3-5 short AI summary bullets, and 3-5 alerts/notifications
for an FMCG beverage portfolio in India + Southeast Asia.
Return ONLY the JSON object.
"#;

const TREND_FORECAST_SYSTEM_PROMPT: &str = r#"
You are an AI trend forecasting assistant for FMCG beverage companies.

You MUST reply with STRICT VALID JSON only, NO markdown and NO lists outside JSON.

Use this JSON structure exactly:

{
  "summary": {
    "totalForecastedRevenueLabel": string,
    "totalForecastedRevenueChangeLabel": string,
    "hotSkuName": string,
    "hotSkuUnitsLabel": string,
    "hotSkuChangeLabel": string,
    "emergingTrendsCountLabel": string,
    "emergingTrendsChangeLabel": string,
    "overallSentimentLabel": string,
    "overallSentimentChangeLabel": string
  },
  "forecastSeries": [
    {
      "name": string,
      "Citrus Soda": number,
      "Berry Blast": number
    }
  ],
  "sentimentBreakdown": [
    { "name": "Positive", "value": number },
    { "name": "Neutral", "value": number },
    { "name": "Negative", "value": number }
  ],
  "topTrends": [
    { "name": string, "probability": number }
  ],
  "recommendations": [ string ],
  "pricePromotionInsights": [
    {
      "scenario": string,
      "expectedLiftPercent": number,
      "notes": string
    }
  ],
  "competitorInsights": [
    {
      "event": string,
      "impact": string
    }
  ],
  "alerts": [ string ]
}
"#;

const PRODUCT_IDEA_SYSTEM_PROMPT: &str = r#"
You are an AI product ideation assistant for FMCG brands.

Your job is to:
- Propose new product variants and concepts (flavors, packs, packaging styles).
- Estimate adoption probability and expected sales impact.
- Align ideas with consumer sentiment and emerging trends.
- Highlight competitive differentiation and white-space gaps.
- Provide strategic recommendations and "what-if" simulation notes.

You MUST respond with STRICT VALID JSON only.
No markdown, no headings, no bullet markers, no hashes (#), no asterisks (*).

Use this JSON shape EXACTLY:

{
  "name": string,
  "shortDescription": string,
  "mockupLabel": string,
  "adoptionProbability": number,
  "forecastedSalesUnitsYear1": number,
  "reasoning": string[],

  "variants": [
    {
      "name": string,
      "description": string,
      "adoptionProbability": number,
      "forecastedRevenueLabel": string
    }
  ],

  "sentimentMatchScore": number,
  "trendAlignmentScore": number,
  "buzzPredictionLabel": string,

  "consumerPainPointsCovered": string[],
  "competitiveDifferentiation": string[],
  "strategicRecommendations": string[],
  "proactiveAlerts": string[],

  "cannibalizationRiskLabel": string,
  "sustainabilityAlignmentLabel": string,
  "simulationNotes": string[]
}
"#;

pub fn dashboard_overview_prompt() -> PromptPair {
    PromptPair {
        system: DASHBOARD_SYSTEM_PROMPT.to_string(),
        user: DASHBOARD_USER_PROMPT.to_string(),
    }
}

pub fn trend_forecast_prompt(req: &ForecastRequest) -> PromptPair {
    let user = format!(
        r#"
Prepare a realistic {} SKU demand forecast for two SKUs:
"Citrus Soda" and "Berry Blast" in {}, within the {} category.

Include sentiment breakdown, top trends, price & promotion insights,
competitor insights, and alerts as described in the JSON schema.
Return ONLY the JSON object, nothing else.
"#,
        req.time_horizon, req.region, req.category
    );

    PromptPair {
        system: TREND_FORECAST_SYSTEM_PROMPT.to_string(),
        user,
    }
}

pub fn product_idea_prompt(brief: &IdeaBrief) -> PromptPair {
    let user = format!(
        r#"
User brief: {}

Target price: {} USD
Eco-friendly packaging target: {}%

Assume you conceptually have access to:
- Product images (own + competitor packaging),
- Consumer reviews and social media trends,
- Historical sales and category performance,
- Industry reports, competitor launches and macro trends.

Do NOT describe any training process.
Use these only as background reasoning to support your outputs.

Return ONLY the JSON object. No explanation text.
"#,
        brief.query, brief.price, brief.eco_package
    );

    PromptPair {
        system: PRODUCT_IDEA_SYSTEM_PROMPT.to_string(),
        user,
    }
}

pub fn product_mockup_prompt(req: &MockupRequest) -> String {
    format!(
        r#"
High-end 3D render of FMCG packaging for:
"{}". {}

Style: realistic product photo on dark gradient background,
neon green accent, premium sparkling water / beverage packaging,
front view, centered, no text other than brand elements.
"#,
        req.name, req.short_description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_defaults_are_interpolated() {
        let pair = trend_forecast_prompt(&ForecastRequest::default());
        assert!(pair.user.contains("realistic next 5 weeks SKU demand forecast"));
        assert!(pair.user.contains("in urban India, within the FMCG beverages (carbonated drinks) category"));
        assert!(pair.system.contains("\"forecastSeries\""));
    }

    #[test]
    fn forecast_overrides_replace_defaults() {
        let req = ForecastRequest::default()
            .with_region("coastal Vietnam")
            .with_time_horizon("next quarter");
        let pair = trend_forecast_prompt(&req);
        assert!(pair.user.contains("next quarter"));
        assert!(pair.user.contains("coastal Vietnam"));
        assert!(!pair.user.contains("urban India"));
    }

    #[test]
    fn idea_prompt_embeds_brief_verbatim() {
        let brief = IdeaBrief {
            query: "A \"zero sugar\" yuzu tonic".to_string(),
            price: 4.49,
            eco_package: 90.0,
        };
        let pair = product_idea_prompt(&brief);
        assert!(pair.user.contains("User brief: A \"zero sugar\" yuzu tonic"));
        assert!(pair.user.contains("Target price: 4.49 USD"));
        assert!(pair.user.contains("Eco-friendly packaging target: 90%"));
        assert!(pair.system.contains("\"forecastedSalesUnitsYear1\": number"));
    }

    #[test]
    fn prompts_are_deterministic() {
        assert_eq!(dashboard_overview_prompt(), dashboard_overview_prompt());
        let brief = IdeaBrief::new("Gen Z energy drink");
        assert_eq!(product_idea_prompt(&brief), product_idea_prompt(&brief));
    }

    #[test]
    fn mockup_prompt_quotes_name() {
        let prompt = product_mockup_prompt(&MockupRequest {
            name: "Yuzu Spark".to_string(),
            short_description: "Sparkling yuzu water.".to_string(),
        });
        assert!(prompt.contains("\"Yuzu Spark\". Sparkling yuzu water."));
    }
}
