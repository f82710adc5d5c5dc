use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use fmcg_ai_studio::config::Config;
use fmcg_ai_studio::controller::ViewState;
use fmcg_ai_studio::gateway::ModelGateway;
use fmcg_ai_studio::pages::{DashboardPage, MockupSlot, ProductIdeationPage, TrendForecastingPage};
use fmcg_ai_studio::prompts::ForecastRequest;
use fmcg_ai_studio::routes::{DOWNLOAD_FILENAME, DOWNLOAD_PATH, Route};
use fmcg_ai_studio::view_model::{ChangeDirection, StatCard};

#[derive(Parser)]
#[command(name = "fmcg-studio")]
#[command(about = "FMCG AI Studio - AI dashboard, trend forecasting and product ideation")]
#[command(version)]
struct Cli {
    /// Page to open: /, /trend-forecasting or /product-ideation
    #[arg(default_value = "/", value_parser = parse_route)]
    route: Route,

    /// Product category for the trend forecast
    #[arg(long)]
    category: Option<String>,

    /// Market region for the trend forecast
    #[arg(long)]
    region: Option<String>,

    /// Time horizon for the trend forecast
    #[arg(long)]
    horizon: Option<String>,

    /// Target retail price in USD for product ideation
    #[arg(long)]
    price: Option<f64>,

    /// Eco-packaging share in percent for product ideation
    #[arg(long)]
    eco: Option<f64>,

    /// Product brief for ideation
    #[arg(trailing_var_arg = true)]
    brief: Vec<String>,
}

fn parse_route(path: &str) -> Result<Route, String> {
    Route::parse(path).ok_or_else(|| format!("unknown route: {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered pages stay readable on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let gateway = Arc::new(ModelGateway::from_config(&config)?);

    println!(
        "{} {}  {}",
        config.studio.name.bold(),
        config.studio.version.dimmed(),
        cli.route.title().cyan()
    );
    if cli.route.shows_header() {
        println!(
            "{}",
            format!("Download the app: {DOWNLOAD_PATH} ({DOWNLOAD_FILENAME})").dimmed()
        );
    }
    println!();

    match cli.route {
        Route::Home => render_dashboard(gateway).await,
        Route::TrendForecasting => render_forecast(gateway, &cli).await,
        Route::ProductIdeation => render_ideation(gateway, &cli, config.studio.generate_mockups).await,
    }
}

async fn render_dashboard(gateway: Arc<ModelGateway>) -> Result<()> {
    let page = DashboardPage::new(gateway);
    println!("{}", "Loading AI dashboard overview...".dimmed());
    page.mount().await?;

    if let ViewState::Error(msg) = page.state() {
        println!("{}", msg.red());
        return Ok(());
    }
    let Some(view) = page.view() else {
        return Ok(());
    };

    print_stats(&view.stats);
    if !view.has_data() {
        println!("{}", "The AI returned an empty overview.".yellow());
        return Ok(());
    }
    section("Revenue Forecast");
    for p in &view.sales {
        println!("  {:<12} {:>12.1}", p.name, p.revenue);
    }
    section("Top Trends");
    for t in &view.trends {
        println!("  {:<40} {:>5.1}%", t.name, t.probability);
    }
    list("AI Summary", &view.bullets);
    list("Alerts", &view.alerts);
    Ok(())
}

async fn render_forecast(gateway: Arc<ModelGateway>, cli: &Cli) -> Result<()> {
    let mut request = ForecastRequest::default();
    if let Some(category) = &cli.category {
        request = request.with_category(category.as_str());
    }
    if let Some(region) = &cli.region {
        request = request.with_region(region.as_str());
    }
    if let Some(horizon) = &cli.horizon {
        request = request.with_time_horizon(horizon.as_str());
    }

    let page = TrendForecastingPage::new(gateway);
    println!("{}", "Running AI trend forecast...".dimmed());
    page.run_forecast(request).await;

    if let ViewState::Error(msg) = page.state() {
        println!("{}", msg.red());
        return Ok(());
    }
    let Some(view) = page.view() else {
        return Ok(());
    };

    print_stats(&view.stats);
    section("SKU Demand Forecast");
    print!("  {:<12}", "");
    for sku in &view.sku_names {
        print!(" {sku:>14}");
    }
    println!();
    for point in &view.series {
        print!("  {:<12}", point.name);
        for sku in &view.sku_names {
            match point.skus.get(sku) {
                Some(v) => print!(" {v:>14.1}"),
                None => print!(" {:>14}", "—"),
            }
        }
        println!();
    }
    section("Consumer Sentiment");
    for s in &view.sentiment {
        println!("  {:<12} {:>5.1}%", s.name, s.value);
    }
    section("Top Trends");
    for t in &view.trends {
        println!("  {:<40} {:>5.1}%", t.name, t.probability);
    }
    list("Recommendations", &view.recommendations);
    section("Price & Promotion");
    for p in &view.price_insights {
        println!("  {} ({:+.1}%) {}", p.scenario.bold(), p.expected_lift_percent, p.notes.dimmed());
    }
    section("Competitor Watch");
    for c in &view.competitor_insights {
        println!("  {}: {}", c.event.bold(), c.impact);
    }
    list("Alerts", &view.alerts);
    Ok(())
}

async fn render_ideation(gateway: Arc<ModelGateway>, cli: &Cli, mockups: bool) -> Result<()> {
    let page = ProductIdeationPage::new(gateway);
    let page = if mockups { page } else { page.without_mockups() };

    page.set_query(cli.brief.join(" "));
    if let Some(price) = cli.price {
        page.set_price(price);
    }
    if let Some(eco) = cli.eco {
        page.set_eco_package(eco);
    }
    if !page.can_submit() {
        bail!("Provide a product brief, e.g. fmcg-studio /product-ideation Suggest a new energy drink flavor for Gen Z in Asia");
    }

    println!("{}", "Letting the AI simulate your product idea...".dimmed());
    page.submit().await;

    if let ViewState::Error(msg) = page.state() {
        println!("{}", msg.red());
        return Ok(());
    }
    let Some(view) = page.view() else {
        return Ok(());
    };

    println!("{}", view.name.bold().green());
    println!("{}", view.short_description);
    println!();
    println!("  Adoption Probability   {}%", view.adoption);
    println!(
        "  Adjusted (price ${:.2}, eco {:.0}%)   ~{}%",
        page.price(),
        page.eco_package(),
        view.adjusted_adoption.bold()
    );
    if let Some(units) = view.sales_units_year1 {
        println!("  Year-1 Units           {units}");
    }
    println!("  Sentiment Match        {}", view.sentiment_match.as_deref().unwrap_or("—"));
    println!("  Trend Alignment        {}", view.trend_alignment.as_deref().unwrap_or("—"));
    println!("  Buzz Prediction        {}", view.buzz_prediction);
    println!("  Cannibalization Risk   {}", view.cannibalization_risk);
    println!("  Sustainability         {}", view.sustainability_alignment);

    section("Suggested Variants (Flavors / Packs)");
    for v in &view.variants {
        println!("  {:<28} {:>8} {}", v.name.bold(), v.adoption, v.revenue.dimmed());
        if !v.description.is_empty() {
            println!("    {}", v.description.dimmed());
        }
    }
    list("Why this could work", &view.reasoning);
    list("Consumer Pain Points", &view.pain_points);
    list("Competitive Differentiation", &view.differentiation);
    list("Strategic Recommendations", &view.recommendations);
    list("Proactive Alerts", &view.alerts);
    list("What-if Simulation", &view.simulation_notes);

    page.wait_for_mockup().await;
    section("Primary Concept Mockup");
    match page.mockup() {
        MockupSlot::Ready(m) => println!("  {}", m.url.underline()),
        _ => println!("  {}", view.mockup_caption.dimmed()),
    }
    Ok(())
}

fn print_stats(stats: &[StatCard]) {
    for card in stats {
        let change = match card.direction {
            ChangeDirection::Positive => card.change.green(),
            ChangeDirection::Negative => card.change.red(),
        };
        println!("  {:<32} {:>16}  {}", card.title.bold(), card.value, change);
    }
}

fn section(title: &str) {
    println!();
    println!("{}", title.bold().underline());
}

fn list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    section(title);
    for item in items {
        println!("  • {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dashboard() {
        let cli = Cli::try_parse_from(["fmcg-studio"]).expect("no args");
        assert_eq!(cli.route, Route::Home);
        assert!(cli.brief.is_empty());
        assert!(cli.price.is_none());
    }

    #[test]
    fn ideation_takes_flags_and_brief() {
        let cli = Cli::try_parse_from([
            "fmcg-studio",
            "/product-ideation",
            "--price",
            "4.5",
            "--eco",
            "90",
            "Suggest",
            "a",
            "yuzu",
            "soda",
        ])
        .expect("ideation args");
        assert_eq!(cli.route, Route::ProductIdeation);
        assert_eq!(cli.price, Some(4.5));
        assert_eq!(cli.eco, Some(90.0));
        assert_eq!(cli.brief.join(" "), "Suggest a yuzu soda");
    }

    #[test]
    fn forecast_flags_are_optional_strings() {
        let cli = Cli::try_parse_from(["fmcg-studio", "/trend-forecasting", "--region", "Jakarta"])
            .expect("forecast args");
        assert_eq!(cli.route, Route::TrendForecasting);
        assert_eq!(cli.region.as_deref(), Some("Jakarta"));
        assert!(cli.category.is_none());
    }

    #[test]
    fn rejects_unknown_route_and_bad_numbers() {
        assert!(Cli::try_parse_from(["fmcg-studio", "/pricing"]).is_err());
        assert!(Cli::try_parse_from(["fmcg-studio", "/product-ideation", "--price", "cheap"]).is_err());
    }
}
