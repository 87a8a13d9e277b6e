use crate::auth::AuthError;
use crate::dashboard::{build_dashboard, generate_insights};
use crate::errors::AppError;
use crate::models::{
    DashboardResponse, InsightsResponse, MessageResponse, OAuthCallback, TrendResponse,
};
use crate::state::AppState;
use crate::stats::build_trend;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
};
use chrono::{Local, NaiveDate};

pub const HISTORY_DOWNLOAD_NAME: &str = "channel_history.csv";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(
        state.refresh_interval_secs,
        state.settings.top_pool_size,
    ))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = build_dashboard(
        state.channel_api.as_ref(),
        &state.history,
        today(),
        state.settings,
    )
    .await?;
    Ok(Json(dashboard))
}

pub async fn get_history(State(state): State<AppState>) -> Result<Json<TrendResponse>, AppError> {
    let records = state.history.load().await?;
    Ok(Json(build_trend(&records)))
}

pub async fn download_history(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let Some(csv) = state.history.raw_csv().await? else {
        return Err(AppError::not_found("no channel history recorded yet"));
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{HISTORY_DOWNLOAD_NAME}\""),
            ),
        ],
        csv,
    ))
}

pub async fn create_insights(
    State(state): State<AppState>,
) -> Result<Json<InsightsResponse>, AppError> {
    let response = generate_insights(
        state.channel_api.as_ref(),
        state.insights.as_ref(),
        state.settings,
    )
    .await?;
    Ok(Json(response))
}

pub async fn login(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let url = state.session.begin_login().await?;
    Ok(Redirect::to(url.as_str()))
}

pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> Result<Redirect, AppError> {
    if let Some(error) = params.error {
        return Err(AuthError::Denied(error).into());
    }
    let (Some(code), Some(csrf_state)) = (params.code, params.state) else {
        return Err(AppError::bad_request("callback is missing `code` or `state`"));
    };

    state.session.complete_login(code, &csrf_state).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset_account(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.session.sign_out().await?;
    Ok(Json(MessageResponse {
        message: "Token cleared. Please sign in with another account.".to_string(),
    }))
}

pub async fn reset_account_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.session.sign_out().await?;
    Ok(Redirect::to("/"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
