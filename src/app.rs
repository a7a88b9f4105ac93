use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing::{error, info};

use crate::config::Settings;
use crate::filter::FilterCriteria;
use crate::insight::{build_insight_responder, example_queries};
use crate::metrics::gather_metrics;
use crate::provider::{FixtureProvider, InstrumentedProvider};
use crate::report;
use crate::session::DashboardSession;

pub async fn run(settings: Settings) -> Result<()> {
    let settings = Arc::new(settings);
    let provider = InstrumentedProvider::new(
        Arc::new(FixtureProvider::new(settings.fixture_source.clone())),
        settings.session_id.clone(),
    );
    let insight = build_insight_responder(&settings);
    let mut session = DashboardSession::new(settings.session_id.clone(), provider, insight);

    info!(
        session_id = %settings.session_id,
        category = %settings.category,
        "Dashboard session started"
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        res = render(&settings, &mut session) => {
            if let Err(err) = res {
                error!(error = %err, "Dashboard render failed");
                println!("{} dashboard unavailable: {err}", settings.category.label());
            }
        }
    }

    if settings.print_metrics {
        print!("{}", gather_metrics());
    }

    info!(session_id = %settings.session_id, "Dashboard session finished");
    Ok(())
}

async fn render(settings: &Settings, session: &mut DashboardSession) -> Result<()> {
    session.load(settings.category).await?;
    session.set_sort(settings.sort);
    if let Some(brand) = &settings.drill_down {
        session.drill_down(brand.clone());
    }
    let drilled = session.criteria().clone();
    session.update_criteria(|criteria| merge_criteria(criteria, &drilled, &settings.criteria))?;
    session.go_to_page(settings.page);

    if let Some(summary) = session.summary() {
        println!("{}", report::render_summary(summary));
    }
    println!("{}", report::render_brand_table(&session.sorted_brands(), session.sort_state()));
    println!("{}", report::render_facets(session.facets()));
    let page = session.current_page();
    println!("{}", report::render_comment_page(&page, session.empty_state()));

    match &settings.insight_query {
        Some(query) => {
            if let Some(answer) = session.ask(query).await {
                println!("{answer}");
            }
        }
        None => {
            println!("Try asking:");
            for example in example_queries(settings.category) {
                println!("  - {example}");
            }
        }
    }
    Ok(())
}

/// Layers the configured filters over whatever the drill-down left in place.
fn merge_criteria(target: &mut FilterCriteria, drilled: &FilterCriteria, configured: &FilterCriteria) {
    target.brands = drilled.brands.union(&configured.brands).cloned().collect();
    target.models.clone_from(&configured.models);
    target.platforms.clone_from(&configured.platforms);
    target.sentiment = configured.sentiment;
    target.year = configured.year;
    target.month = configured.month;
}
