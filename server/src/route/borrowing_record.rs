mod request;
mod response;

use application::service::{
    BorrowBookService, GetBorrowingRecordService, GetOverdueService, ReturnBookService,
};
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::Router;
use axum_extra::extract::Query;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::route::borrowing_record::request::{
    BookRecordsRequest, BorrowRequest, GetRequest, PatronRecordsRequest, ReturnRequest,
    Transformer,
};
use crate::route::borrowing_record::response::{CreatedPresenter, Presenter};

pub trait BorrowingRecordRouter {
    fn route_borrowing_record(self) -> Self;
}

impl BorrowingRecordRouter for Router<AppModule> {
    fn route_borrowing_record(self) -> Self {
        self.route(
            "/api/borrowing-records",
            get(
                |State(module): State<AppModule>, Caller(identity): Caller| async move {
                    Controller::new(Transformer, Presenter)
                        .bypass(|| async move { module.get_all_borrowing_records(&identity).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/borrowing-records/borrow",
            post(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Query(req): Query<BorrowRequest>| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.borrow_book(&identity, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/borrowing-records/overdue",
            get(
                |State(module): State<AppModule>, Caller(identity): Caller| async move {
                    Controller::new(Transformer, Presenter)
                        .bypass(|| async move { module.get_overdue_records(&identity).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/borrowing-records/:id",
            get(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Path(id): Path<i64>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move {
                            module.get_borrowing_record(&identity, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/borrowing-records/:id/return",
            put(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Path(id): Path<i64>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(ReturnRequest::new(id))
                        .handle(|dto| async move { module.return_book(&identity, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/borrowing-records/book/:book_id",
            get(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Path(book_id): Path<i64>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(BookRecordsRequest::new(book_id))
                        .handle(|dto| async move {
                            module.get_records_from_book(&identity, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/borrowing-records/patron/:patron_id",
            get(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Path(patron_id): Path<i64>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(PatronRecordsRequest::new(patron_id))
                        .handle(|dto| async move {
                            module.get_records_from_patron(&identity, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
