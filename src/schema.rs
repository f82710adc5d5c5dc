//! Typed shapes of the JSON documents the model is asked to return.
//!
//! Every sequence field defaults to empty when the model leaves it out or
//! sends `null`, so view code never has to branch on a missing list.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::null_as_default;
use crate::prompts::Feature;

/// A response document tied to the feature that requests it
pub trait FeatureSchema: for<'de> Deserialize<'de> {
    const FEATURE: Feature;
}

/// Unit counts sometimes arrive as floats or numeric strings
fn deserialize_flexible_units<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleUnits {
        Int(u64),
        Float(f64),
        String(String),
    }

    let value = Option::<FlexibleUnits>::deserialize(deserializer)?;
    let units = match value {
        None => return Ok(None),
        Some(FlexibleUnits::Int(i)) => i,
        Some(FlexibleUnits::Float(f)) => {
            if !f.is_finite() || f < 0.0 {
                return Err(serde::de::Error::custom(format!(
                    "unit count must be a non-negative number, got {f}"
                )));
            }
            f.round() as u64
        }
        Some(FlexibleUnits::String(s)) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
            cleaned.trim().parse::<u64>().map_err(serde::de::Error::custom)?
        }
    };
    Ok(Some(units))
}

/// SKU columns of a series row; a `null` reading is left out of the row
fn deserialize_sku_columns<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let columns = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(columns
        .into_iter()
        .filter_map(|(sku, value)| value.map(|v| (sku, v)))
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendProbability {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Percentage in 0..=100
    #[serde(default, deserialize_with = "null_as_default")]
    pub probability: f64,
}

// ---- Dashboard overview ----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub forecasted_revenue_label: Option<String>,
    pub forecasted_revenue_change_label: Option<String>,
    pub active_trends_tracked_label: Option<String>,
    pub active_trends_change_label: Option<String>,
    pub new_products_ideated_label: Option<String>,
    pub new_products_change_label: Option<String>,
    pub hot_sku_name: Option<String>,
    pub hot_sku_volume_label: Option<String>,
    pub hot_sku_change_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub summary: Option<DashboardSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sales_data: Vec<SalesPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_trends: Vec<TrendProbability>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_summary_bullets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<String>,
}

impl FeatureSchema for DashboardOverview {
    const FEATURE: Feature = Feature::DashboardOverview;
}

// ---- Trend forecast ----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub total_forecasted_revenue_label: Option<String>,
    pub total_forecasted_revenue_change_label: Option<String>,
    pub hot_sku_name: Option<String>,
    pub hot_sku_units_label: Option<String>,
    pub hot_sku_change_label: Option<String>,
    pub emerging_trends_count_label: Option<String>,
    pub emerging_trends_change_label: Option<String>,
    pub overall_sentiment_label: Option<String>,
    pub overall_sentiment_change_label: Option<String>,
}

/// One period of the SKU demand series; SKU names are the remaining keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(flatten, deserialize_with = "deserialize_sku_columns")]
    pub skus: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSlice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePromotionInsight {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scenario: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected_lift_percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorInsight {
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendForecast {
    pub summary: Option<ForecastSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forecast_series: Vec<ForecastPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment_breakdown: Vec<SentimentSlice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_trends: Vec<TrendProbability>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_promotion_insights: Vec<PricePromotionInsight>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub competitor_insights: Vec<CompetitorInsight>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<String>,
}

impl FeatureSchema for TrendForecast {
    const FEATURE: Feature = Feature::TrendForecast;
}

impl TrendForecast {
    /// SKU names appearing anywhere in the series, sorted
    pub fn sku_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .forecast_series
            .iter()
            .flat_map(|p| p.skus.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

// ---- Product idea ----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaVariant {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub adoption_probability: Option<f64>,
    pub forecasted_revenue_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdea {
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub mockup_label: Option<String>,
    pub adoption_probability: Option<f64>,
    #[serde(
        default,
        rename = "forecastedSalesUnitsYear1",
        deserialize_with = "deserialize_flexible_units"
    )]
    pub forecasted_sales_units_year1: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<IdeaVariant>,
    pub sentiment_match_score: Option<f64>,
    pub trend_alignment_score: Option<f64>,
    pub buzz_prediction_label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub consumer_pain_points_covered: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub competitive_differentiation: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strategic_recommendations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proactive_alerts: Vec<String>,
    pub cannibalization_risk_label: Option<String>,
    pub sustainability_alignment_label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub simulation_notes: Vec<String>,
}

impl FeatureSchema for ProductIdea {
    const FEATURE: Feature = Feature::ProductIdea;
}

// ---- Product mockup ----

/// Packaging render for an idea, fetched separately from the idea itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMockup {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_lists_default_when_absent_or_null() {
        let overview: DashboardOverview =
            serde_json::from_str(r#"{"salesData":null}"#).expect("should deserialize");
        assert!(overview.summary.is_none());
        assert!(overview.sales_data.is_empty());
        assert!(overview.top_trends.is_empty());
        assert!(overview.ai_summary_bullets.is_empty());
        assert!(overview.alerts.is_empty());
    }

    #[test]
    fn forecast_series_collects_sku_columns() {
        let forecast: TrendForecast = serde_json::from_str(
            r#"{"forecastSeries":[
                {"name":"W1","Citrus Soda":120,"Berry Blast":80.5},
                {"name":"W2","Citrus Soda":130,"Berry Blast":82}
            ]}"#,
        )
        .expect("should deserialize");
        assert_eq!(forecast.forecast_series.len(), 2);
        assert_eq!(forecast.forecast_series[0].name, "W1");
        assert_eq!(forecast.forecast_series[0].skus.get("Berry Blast"), Some(&80.5));
        assert_eq!(forecast.sku_names(), vec!["Berry Blast", "Citrus Soda"]);
    }

    #[test]
    fn null_sku_reading_is_left_out_of_the_row() {
        let forecast: TrendForecast = serde_json::from_str(
            r#"{"forecastSeries":[{"name":"W1","Citrus Soda":null,"Berry Blast":75}]}"#,
        )
        .expect("null reading should deserialize");
        let row = &forecast.forecast_series[0];
        assert_eq!(row.skus.get("Citrus Soda"), None);
        assert_eq!(row.skus.get("Berry Blast"), Some(&75.0));
        assert_eq!(forecast.sku_names(), vec!["Berry Blast"]);
    }

    #[test]
    fn sales_units_accept_float_and_string() {
        let idea: ProductIdea =
            serde_json::from_str(r#"{"forecastedSalesUnitsYear1": 125000.4}"#).expect("float");
        assert_eq!(idea.forecasted_sales_units_year1, Some(125000));

        let idea: ProductIdea =
            serde_json::from_str(r#"{"forecastedSalesUnitsYear1": "1,250,000"}"#).expect("string");
        assert_eq!(idea.forecasted_sales_units_year1, Some(1_250_000));

        let idea: ProductIdea = serde_json::from_str("{}").expect("absent");
        assert_eq!(idea.forecasted_sales_units_year1, None);
    }

    #[test]
    fn negative_sales_units_are_rejected() {
        let res = serde_json::from_str::<ProductIdea>(r#"{"forecastedSalesUnitsYear1": -5}"#);
        assert!(res.is_err());
    }

    #[test]
    fn wrong_list_type_is_rejected() {
        let res = serde_json::from_str::<ProductIdea>(r#"{"reasoning": "because"}"#);
        assert!(res.is_err());
    }
}
