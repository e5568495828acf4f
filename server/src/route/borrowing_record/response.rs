use application::transfer::BorrowingRecordDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::Date;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingRecordResponse {
    id: i64,
    book_id: i64,
    patron_id: i64,
    borrow_date: Date,
    due_date: Date,
    return_date: Option<Date>,
}

impl From<BorrowingRecordDto> for BorrowingRecordResponse {
    fn from(value: BorrowingRecordDto) -> Self {
        Self {
            id: value.id,
            book_id: value.book_id,
            patron_id: value.patron_id,
            borrow_date: value.borrow_date,
            due_date: value.due_date,
            return_date: value.return_date,
        }
    }
}

impl IntoResponse for BorrowingRecordResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct CreatedResponse(BorrowingRecordResponse);

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<BorrowingRecordDto> for Presenter {
    type To = BorrowingRecordResponse;
    fn emit(&self, input: BorrowingRecordDto) -> Self::To {
        BorrowingRecordResponse::from(input)
    }
}

impl Exhaust<Vec<BorrowingRecordDto>> for Presenter {
    type To = Json<Vec<BorrowingRecordResponse>>;
    fn emit(&self, input: Vec<BorrowingRecordDto>) -> Self::To {
        Json(
            input
                .into_iter()
                .map(BorrowingRecordResponse::from)
                .collect(),
        )
    }
}

pub struct CreatedPresenter;

impl Exhaust<BorrowingRecordDto> for CreatedPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: BorrowingRecordDto) -> Self::To {
        CreatedResponse(BorrowingRecordResponse::from(input))
    }
}

#[cfg(test)]
mod test {
    use application::transfer::BorrowingRecordDto;
    use serde_json::json;
    use time::macros::date;

    use super::BorrowingRecordResponse;

    #[test]
    fn serializes_as_camel_case_with_iso_dates() {
        let response = BorrowingRecordResponse::from(BorrowingRecordDto {
            id: 7,
            book_id: 3,
            patron_id: 5,
            borrow_date: date!(2024 - 03 - 01),
            due_date: date!(2024 - 03 - 15),
            return_date: None,
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "id": 7,
                "bookId": 3,
                "patronId": 5,
                "borrowDate": "2024-03-01",
                "dueDate": "2024-03-15",
                "returnDate": null
            })
        );
    }
}
