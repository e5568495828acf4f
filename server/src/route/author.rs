mod request;
mod response;

use application::service::{
    CreateAuthorService, DeleteAuthorService, GetAuthorService, UpdateAuthorService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::route::author::request::{
    CreateRequest, DeleteRequest, GetRequest, SearchRequest, Transformer, UpdateRequest,
};
use crate::route::author::response::{CreatedPresenter, Presenter};

pub trait AuthorRouter {
    fn route_author(self) -> Self;
}

impl AuthorRouter for Router<AppModule> {
    fn route_author(self) -> Self {
        self.route(
            "/api/authors",
            get(
                |State(module): State<AppModule>, Caller(identity): Caller| async move {
                    Controller::new(Transformer, Presenter)
                        .bypass(|| async move { module.get_all_authors(&identity).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.create_author(&identity, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/authors/search",
            get(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Query(req): Query<SearchRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.search_authors(&identity, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/authors/:id",
            get(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Path(id): Path<i64>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_author(&identity, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Path(id): Path<i64>,
                 Json(req): Json<UpdateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.update_author(&identity, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Caller(identity): Caller,
                 Path(id): Path<i64>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(DeleteRequest::new(id))
                        .handle(|dto| async move { module.delete_author(&identity, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
