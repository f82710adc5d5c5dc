//! Flattening of decoded documents into what the stat cards, charts and
//! lists render. Fallback captions match the ones shown when the model
//! leaves a label out.

use serde::Serialize;

use crate::adoption::{BASELINE_ADOPTION, adjusted_adoption, format_percent};
use crate::schema::{
    CompetitorInsight, DashboardOverview, ForecastPoint, IdeaVariant, PricePromotionInsight,
    ProductIdea, SalesPoint, SentimentSlice, TrendForecast, TrendProbability,
};

const MISSING_VALUE: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Positive,
    Negative,
}

impl ChangeDirection {
    /// A change label reads as negative when it starts with a minus sign
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(l) if l.trim().starts_with('-') => ChangeDirection::Negative,
            _ => ChangeDirection::Positive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub change: String,
    pub direction: ChangeDirection,
}

impl StatCard {
    fn new(title: impl Into<String>, value: Option<&str>, change: Option<&str>, fallback: &str) -> Self {
        Self {
            title: title.into(),
            value: non_empty(value).unwrap_or(MISSING_VALUE).to_string(),
            change: non_empty(change).unwrap_or(fallback).to_string(),
            direction: ChangeDirection::Positive,
        }
    }

    fn signed(mut self, change: Option<&str>) -> Self {
        self.direction = ChangeDirection::from_label(change);
        self
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

fn hot_sku_title(name: Option<&str>) -> String {
    match non_empty(name) {
        Some(name) => format!("Hot SKU: {name}"),
        None => "Hot SKU".to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: Vec<StatCard>,
    pub sales: Vec<SalesPoint>,
    pub trends: Vec<TrendProbability>,
    pub bullets: Vec<String>,
    pub alerts: Vec<String>,
}

impl DashboardView {
    pub fn has_data(&self) -> bool {
        !(self.sales.is_empty()
            && self.trends.is_empty()
            && self.bullets.is_empty()
            && self.alerts.is_empty())
    }
}

impl From<&DashboardOverview> for DashboardView {
    fn from(doc: &DashboardOverview) -> Self {
        let s = doc.summary.clone().unwrap_or_default();
        let stats = vec![
            StatCard::new(
                "Forecasted Revenue",
                s.forecasted_revenue_label.as_deref(),
                s.forecasted_revenue_change_label.as_deref(),
                "vs last month",
            ),
            StatCard::new(
                "Active Trends Tracked",
                s.active_trends_tracked_label.as_deref(),
                s.active_trends_change_label.as_deref(),
                "vs last month",
            ),
            StatCard::new(
                "New Products Ideated",
                s.new_products_ideated_label.as_deref(),
                s.new_products_change_label.as_deref(),
                "vs last cycle",
            ),
            StatCard::new(
                hot_sku_title(s.hot_sku_name.as_deref()),
                s.hot_sku_volume_label.as_deref(),
                s.hot_sku_change_label.as_deref(),
                "vs last week",
            )
            .signed(s.hot_sku_change_label.as_deref()),
        ];

        Self {
            stats,
            sales: doc.sales_data.clone(),
            trends: doc.top_trends.clone(),
            bullets: doc.ai_summary_bullets.clone(),
            alerts: doc.alerts.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendForecastView {
    pub stats: Vec<StatCard>,
    pub sku_names: Vec<String>,
    pub series: Vec<ForecastPoint>,
    pub sentiment: Vec<SentimentSlice>,
    pub trends: Vec<TrendProbability>,
    pub recommendations: Vec<String>,
    pub price_insights: Vec<PricePromotionInsight>,
    pub competitor_insights: Vec<CompetitorInsight>,
    pub alerts: Vec<String>,
}

impl TrendForecastView {
    pub fn has_data(&self) -> bool {
        !(self.series.is_empty()
            && self.sentiment.is_empty()
            && self.trends.is_empty()
            && self.recommendations.is_empty()
            && self.price_insights.is_empty()
            && self.competitor_insights.is_empty()
            && self.alerts.is_empty())
    }
}

impl From<&TrendForecast> for TrendForecastView {
    fn from(doc: &TrendForecast) -> Self {
        let s = doc.summary.clone().unwrap_or_default();
        let stats = vec![
            StatCard::new(
                "Total Forecasted Revenue",
                s.total_forecasted_revenue_label.as_deref(),
                s.total_forecasted_revenue_change_label.as_deref(),
                "vs previous period",
            ),
            StatCard::new(
                hot_sku_title(s.hot_sku_name.as_deref()),
                s.hot_sku_units_label.as_deref(),
                s.hot_sku_change_label.as_deref(),
                "vs last week",
            ),
            StatCard::new(
                "Emerging Trends",
                s.emerging_trends_count_label.as_deref(),
                s.emerging_trends_change_label.as_deref(),
                "vs last month",
            ),
            StatCard::new(
                "Overall Sentiment",
                s.overall_sentiment_label.as_deref(),
                s.overall_sentiment_change_label.as_deref(),
                "vs last period",
            )
            .signed(s.overall_sentiment_change_label.as_deref()),
        ];

        Self {
            stats,
            sku_names: doc.sku_names(),
            series: doc.forecast_series.clone(),
            sentiment: doc.sentiment_breakdown.clone(),
            trends: doc.top_trends.clone(),
            recommendations: doc.recommendations.clone(),
            price_insights: doc.price_promotion_insights.clone(),
            competitor_insights: doc.competitor_insights.clone(),
            alerts: doc.alerts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRow {
    pub name: String,
    pub description: String,
    pub adoption: String,
    pub revenue: String,
}

impl From<&IdeaVariant> for VariantRow {
    fn from(v: &IdeaVariant) -> Self {
        Self {
            name: v.name.clone(),
            description: v.description.clone(),
            adoption: v
                .adoption_probability
                .map(|p| format!("{}%", format_percent(p)))
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            revenue: v.forecasted_revenue_label.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaView {
    pub name: String,
    pub short_description: String,
    pub mockup_caption: String,
    pub adoption: String,
    pub adjusted_adoption: String,
    pub sales_units_year1: Option<u64>,
    pub sentiment_match: Option<String>,
    pub trend_alignment: Option<String>,
    pub buzz_prediction: String,
    pub variants: Vec<VariantRow>,
    pub reasoning: Vec<String>,
    pub pain_points: Vec<String>,
    pub differentiation: Vec<String>,
    pub recommendations: Vec<String>,
    pub alerts: Vec<String>,
    pub cannibalization_risk: String,
    pub sustainability_alignment: String,
    pub simulation_notes: Vec<String>,
}

impl IdeaView {
    /// Build the ideation output panel for the current slider positions
    pub fn new(idea: &ProductIdea, price: f64, eco_package: f64) -> Self {
        let base = idea.adoption_probability.unwrap_or(BASELINE_ADOPTION);
        Self {
            name: non_empty(idea.name.as_deref())
                .unwrap_or("New Product Concept")
                .to_string(),
            short_description: idea.short_description.clone().unwrap_or_default(),
            mockup_caption: mockup_caption(idea),
            adoption: idea
                .adoption_probability
                .map(format_percent)
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            adjusted_adoption: format_percent(adjusted_adoption(base, price, eco_package)),
            sales_units_year1: idea.forecasted_sales_units_year1,
            sentiment_match: idea.sentiment_match_score.map(format_percent),
            trend_alignment: idea.trend_alignment_score.map(format_percent),
            buzz_prediction: label_or_missing(&idea.buzz_prediction_label),
            variants: idea.variants.iter().map(VariantRow::from).collect(),
            reasoning: idea.reasoning.clone(),
            pain_points: idea.consumer_pain_points_covered.clone(),
            differentiation: idea.competitive_differentiation.clone(),
            recommendations: idea.strategic_recommendations.clone(),
            alerts: idea.proactive_alerts.clone(),
            cannibalization_risk: label_or_missing(&idea.cannibalization_risk_label),
            sustainability_alignment: label_or_missing(&idea.sustainability_alignment_label),
            simulation_notes: idea.simulation_notes.clone(),
        }
    }
}

pub fn mockup_caption(idea: &ProductIdea) -> String {
    non_empty(idea.mockup_label.as_deref())
        .unwrap_or("Concept packaging preview")
        .to_string()
}

fn label_or_missing(label: &Option<String>) -> String {
    non_empty(label.as_deref()).unwrap_or(MISSING_VALUE).to_string()
}
