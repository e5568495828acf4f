use application::transfer::AuthorDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::Date;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    id: i64,
    name: String,
    date_of_birth: Option<Date>,
}

impl From<AuthorDto> for AuthorResponse {
    fn from(value: AuthorDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            date_of_birth: value.date_of_birth,
        }
    }
}

impl IntoResponse for AuthorResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct CreatedResponse(AuthorResponse);

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<AuthorDto> for Presenter {
    type To = AuthorResponse;
    fn emit(&self, input: AuthorDto) -> Self::To {
        AuthorResponse::from(input)
    }
}

impl Exhaust<Vec<AuthorDto>> for Presenter {
    type To = Json<Vec<AuthorResponse>>;
    fn emit(&self, input: Vec<AuthorDto>) -> Self::To {
        Json(input.into_iter().map(AuthorResponse::from).collect())
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

pub struct CreatedPresenter;

impl Exhaust<AuthorDto> for CreatedPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: AuthorDto) -> Self::To {
        CreatedResponse(AuthorResponse::from(input))
    }
}
