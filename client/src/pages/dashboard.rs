//! Dashboard page: system counters and the signed-in account's details.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::net::error::ApiError;
use crate::net::types::DashboardData;
use crate::query::{QueryKey, QueryOptions};
use crate::state::auth::{AuthStore, use_auth};

const PAGE: &str = "dashboard";

/// Loads the dashboard snapshot through the page-data cache.
///
/// # Errors
///
/// Returns the last failure once the default retry policy gives up.
pub async fn load_dashboard(store: &AuthStore) -> Result<DashboardData, ApiError> {
    let api = store.api().clone();
    store
        .queries()
        .fetch_query(QueryKey::page_data(PAGE), QueryOptions::default(), move || {
            let api = api.clone();
            async move { api.page_data::<DashboardData>(PAGE).await }
        })
        .await
}

/// Date part of an ISO 8601 timestamp; other input is shown unchanged.
pub fn account_created_date(raw: &str) -> &str {
    raw.split_once('T').map_or(raw, |(date, _)| date)
}

pub fn error_text(err: &ApiError) -> String {
    format!("Error loading dashboard: {}", err.message_or("Unknown error"))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let snapshot = LocalResource::new(move || {
        let store = auth.store();
        async move {
            load_dashboard(&store)
                .await
                .inspect_err(|err| log::error!("dashboard load failed: {err}"))
        }
    });

    view! {
        <div class="page page--dashboard">
            {move || match snapshot.get() {
                None => view! { <div class="page-loading">"Loading..."</div> }.into_any(),
                Some(Err(err)) => view! { <div class="page-error">{error_text(&err)}</div> }.into_any(),
                Some(Ok(data)) => view! { <DashboardView data=data/> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn DashboardView(data: DashboardData) -> impl IntoView {
    let metrics = data.system_metrics;
    let stats = data.user_stats;
    let created = account_created_date(&stats.account_created).to_owned();

    view! {
        <h1>"Dashboard"</h1>
        <div class="metric-grid">
            <MetricCard label="Total Users" value=metrics.total_users/>
            <MetricCard label="Active Users" value=metrics.active_users/>
            <MetricCard label="Pending Resets" value=metrics.pending_resets/>
        </div>
        <section class="account-card">
            <h2>"Account Information"</h2>
            <p class="account-card__subtitle">"Your account details and status"</p>
            <dl>
                <dt>"Email:"</dt>
                <dd>{stats.email}</dd>
                <dt>"User ID:"</dt>
                <dd>{stats.user_id}</dd>
                <dt>"Account Created:"</dt>
                <dd>{created}</dd>
            </dl>
        </section>
    }
}

#[component]
fn MetricCard(label: &'static str, value: u64) -> impl IntoView {
    view! {
        <div class="metric-card">
            <span class="metric-card__label">{label}</span>
            <span class="metric-card__value">{value}</span>
        </div>
    }
}
