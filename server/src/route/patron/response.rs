use application::transfer::PatronDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronResponse {
    id: i64,
    name: String,
    contact_info: String,
}

impl From<PatronDto> for PatronResponse {
    fn from(value: PatronDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            contact_info: value.contact_info,
        }
    }
}

impl IntoResponse for PatronResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct CreatedResponse(PatronResponse);

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<PatronDto> for Presenter {
    type To = PatronResponse;
    fn emit(&self, input: PatronDto) -> Self::To {
        PatronResponse::from(input)
    }
}

impl Exhaust<Vec<PatronDto>> for Presenter {
    type To = Json<Vec<PatronResponse>>;
    fn emit(&self, input: Vec<PatronDto>) -> Self::To {
        Json(input.into_iter().map(PatronResponse::from).collect())
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

pub struct CreatedPresenter;

impl Exhaust<PatronDto> for CreatedPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: PatronDto) -> Self::To {
        CreatedResponse(PatronResponse::from(input))
    }
}
