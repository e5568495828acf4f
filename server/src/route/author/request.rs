use application::transfer::{
    CreateAuthorDto, DeleteAuthorDto, GetAuthorDto, SearchAuthorDto, UpdateAuthorDto,
};
use serde::Deserialize;
use time::Date;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    name: String,
    date_of_birth: Option<Date>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    name: String,
    date_of_birth: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    name: String,
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
    type To = CreateAuthorDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateAuthorDto {
            name: input.name,
            date_of_birth: input.date_of_birth,
        }
    }
}

impl Intake<(i64, UpdateRequest)> for Transformer {
    type To = UpdateAuthorDto;
    fn emit(&self, input: (i64, UpdateRequest)) -> Self::To {
        let (id, input) = input;
        UpdateAuthorDto {
            id,
            name: input.name,
            date_of_birth: input.date_of_birth,
        }
    }
}

impl Intake<SearchRequest> for Transformer {
    type To = SearchAuthorDto;
    fn emit(&self, input: SearchRequest) -> Self::To {
        SearchAuthorDto { name: input.name }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetAuthorDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetAuthorDto { id: input.id }
    }
}

impl Intake<DeleteRequest> for Transformer {
    type To = DeleteAuthorDto;
    fn emit(&self, input: DeleteRequest) -> Self::To {
        DeleteAuthorDto { id: input.id }
    }
}
