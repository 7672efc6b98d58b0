use crate::{AppState, error::AppError};
use analytics::{DashboardSnapshot, GroupKey, LongShortRatio};
use axum::{
    Json,
    extract::{Query, State},
};
use configuration::DataSources;
use filters::{FilterCriteria, FilterOptions, FilterParams};
use loader::{Dataset, JoinReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct LongShortQuery {
    #[serde(default)]
    pub group_by: GroupKey,
    pub sentiment: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub coin: Option<String>,
}

impl LongShortQuery {
    fn filter_params(&self) -> FilterParams {
        FilterParams {
            sentiment: self.sentiment.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            coin: self.coin.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoadReport {
    pub sources: DataSources,
    pub report: JoinReport,
}

/// Runs `work` against the cached dataset on the blocking pool.
///
/// The first call may parse both input files.
async fn with_dataset<T, F>(state: Arc<AppState>, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&AppState, &Dataset) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let dataset = state.cache.get()?;
        work(state.as_ref(), dataset.as_ref())
    })
    .await?
}

/// # GET /api/filters
/// The sentiments, coins and date bounds present in the dataset.
pub async fn get_filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptions>, AppError> {
    let options = with_dataset(state, |_, dataset| Ok(FilterOptions::from_rows(&dataset.rows))).await?;
    Ok(Json(options))
}

/// # GET /api/dashboard?sentiment=&start=&end=&coin=
/// Every dashboard table for the filtered view.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let criteria = FilterCriteria::try_from(params)?;
    let snapshot = with_dataset(state, move |state, dataset| {
        let view = criteria.apply(&dataset.rows);
        Ok(state.engine.snapshot(&view))
    })
    .await?;
    Ok(Json(snapshot))
}

/// # GET /api/long-short?group_by=classification|coin|account
/// Accepts the same filter parameters as `/api/dashboard`.
pub async fn get_long_short(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LongShortQuery>,
) -> Result<Json<Vec<LongShortRatio>>, AppError> {
    let criteria = FilterCriteria::try_from(query.filter_params())?;
    let group_by = query.group_by;
    let ratios = with_dataset(state, move |state, dataset| {
        let view = criteria.apply(&dataset.rows);
        Ok(state.engine.long_short_ratio(&view, group_by))
    })
    .await?;
    Ok(Json(ratios))
}

/// # GET /api/load-report
pub async fn get_load_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LoadReport>, AppError> {
    let report = with_dataset(state, |state, dataset| {
        Ok(LoadReport {
            sources: state.cache.sources().clone(),
            report: dataset.report.clone(),
        })
    })
    .await?;
    Ok(Json(report))
}

/// # POST /api/reload
/// Re-reads both input files. The previous dataset keeps serving if this fails.
pub async fn reload_dataset(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LoadReport>, AppError> {
    let report = tokio::task::spawn_blocking(move || {
        let dataset = state.cache.reload()?;
        Ok::<_, AppError>(LoadReport {
            sources: state.cache.sources().clone(),
            report: dataset.report.clone(),
        })
    })
    .await??;
    Ok(Json(report))
}
