use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use hypertext::prelude::*;

use crate::{
    auth::Admin,
    export::{ExportError, FILE_NAME, teams_to_csv},
    state::AppState,
    util_resp::FailureResponse,
    widgets::alert::WarningAlert,
};

pub async fn export_csv(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<Response, FailureResponse> {
    let teams = state.store.load_teams().await?;

    let csv = match teams_to_csv(&teams) {
        Ok(csv) => csv,
        Err(ExportError::NoTeams) => {
            return Err(FailureResponse::BadRequest(
                state.page().await.admin(true).body(maud! {
                    WarningAlert msg="There are no registrations to export.";
                    a href="/admin" { "Back to the admin page" }
                }).render(),
            ));
        }
        Err(err) => {
            tracing::error!(%err, "could not export registrations");
            return Err(FailureResponse::ServerError(()));
        }
    };

    tracing::info!(teams = teams.len(), "exported registrations");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
