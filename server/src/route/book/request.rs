use application::transfer::{
    CreateBookDto, DeleteBookDto, GetBookDto, SearchBookDto, UpdateBookDto,
};
use serde::Deserialize;
use time::Date;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    title: String,
    author: String,
    isbn: String,
    published_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    title: String,
    author: String,
    isbn: String,
    published_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    title: String,
}

#[derive(Debug)]
pub struct GetRequest {
    id: i64,
}

impl GetRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteRequest {
    id: i64,
}

impl DeleteRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            published_date: input.published_date,
        }
    }
}

impl Intake<(i64, UpdateRequest)> for Transformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (i64, UpdateRequest)) -> Self::To {
        let (id, input) = input;
        UpdateBookDto {
            id,
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            published_date: input.published_date,
        }
    }
}

impl Intake<SearchRequest> for Transformer {
    type To = SearchBookDto;
    fn emit(&self, input: SearchRequest) -> Self::To {
        SearchBookDto { title: input.title }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetBookDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<DeleteRequest> for Transformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}
