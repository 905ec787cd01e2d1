use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use hypertext::{Rendered, prelude::*};

use crate::{
    store::StoreError, template::Page, widgets::alert::ErrorAlert,
};

pub fn see_other_ok(r: Redirect) -> StandardResponse {
    Ok(SuccessResponse::SeeOther(r))
}

pub fn err_not_found() -> StandardResponse {
    Err(FailureResponse::NotFound(()))
}

pub fn bad_request(html: Rendered<String>) -> StandardResponse {
    Err(FailureResponse::BadRequest(html))
}

pub fn success(html: Rendered<String>) -> StandardResponse {
    Ok(SuccessResponse::Success(html))
}

pub type StandardResponse = Result<SuccessResponse, FailureResponse>;

pub enum SuccessResponse {
    Success(Rendered<String>),
    SeeOther(Redirect),
}

impl IntoResponse for SuccessResponse {
    fn into_response(self) -> Response {
        match self {
            SuccessResponse::Success(html) => {
                Html(html.into_inner()).into_response()
            }
            SuccessResponse::SeeOther(redirect) => redirect.into_response(),
        }
    }
}

#[derive(Debug)]
pub enum FailureResponse {
    BadRequest(Rendered<String>),
    NotFound(()),
    /// The store rejected or could not complete a read or write.
    StoreFailure(Rendered<String>),
    ServerError(()),
}

impl IntoResponse for FailureResponse {
    fn into_response(self) -> Response {
        match self {
            FailureResponse::BadRequest(html) => {
                (StatusCode::BAD_REQUEST, Html(html.into_inner()))
                    .into_response()
            }
            FailureResponse::NotFound(()) => {
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            FailureResponse::StoreFailure(html) => {
                (StatusCode::SERVICE_UNAVAILABLE, Html(html.into_inner()))
                    .into_response()
            }
            FailureResponse::ServerError(()) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response()
            }
        }
    }
}

/// A plain error page; used where the failure happens before there is
/// anything more specific to show.
pub fn error_page(msg: &str) -> Rendered<String> {
    Page::new()
        .body(maud! {
            ErrorAlert msg=(msg);
            a href="javascript:history.back()" { "Go back" }
        })
        .render()
}

impl From<StoreError> for FailureResponse {
    fn from(err: StoreError) -> Self {
        tracing::error!(%err, "store operation failed");
        let msg = if err.is_quota_exceeded() {
            "Could not save: the storage is full. Try using smaller images."
        } else {
            "The registrations could not be loaded or saved right now. \
             Please try again in a moment."
        };
        FailureResponse::StoreFailure(error_page(msg))
    }
}
