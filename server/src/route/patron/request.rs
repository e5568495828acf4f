use application::transfer::{
    CreatePatronDto, DeletePatronDto, GetPatronDto, SearchPatronDto, UpdatePatronDto,
};
use serde::Deserialize;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    name: String,
    contact_info: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    name: String,
    contact_info: String,
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
    type To = CreatePatronDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreatePatronDto {
            name: input.name,
            contact_info: input.contact_info,
        }
    }
}

impl Intake<(i64, UpdateRequest)> for Transformer {
    type To = UpdatePatronDto;
    fn emit(&self, input: (i64, UpdateRequest)) -> Self::To {
        let (id, input) = input;
        UpdatePatronDto {
            id,
            name: input.name,
            contact_info: input.contact_info,
        }
    }
}

impl Intake<SearchRequest> for Transformer {
    type To = SearchPatronDto;
    fn emit(&self, input: SearchRequest) -> Self::To {
        SearchPatronDto { name: input.name }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetPatronDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetPatronDto { id: input.id }
    }
}

impl Intake<DeleteRequest> for Transformer {
    type To = DeletePatronDto;
    fn emit(&self, input: DeleteRequest) -> Self::To {
        DeletePatronDto { id: input.id }
    }
}
