//! In-memory gateway for unit tests.

use std::cell::RefCell;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::listing::{ListQuery, ListResponse};
use crate::domain::types::ResourceId;
use crate::repository::errors::{ApiError, ApiResult};
use crate::repository::{ResourceReader, ResourceWriter};
use crate::resource::ResourceKind;
use crate::session::BearerToken;

type ListHandler = Box<dyn Fn(ResourceKind, &ListQuery) -> ApiResult<Value>>;
type PatchHandler = Box<dyn Fn(ResourceKind, &str, &Value) -> ApiResult<()>>;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Fetch(ResourceKind, ListQuery),
    Patch(ResourceKind, String, Value),
}

pub struct FakeGateway {
    list: ListHandler,
    patch: PatchHandler,
    calls: RefCell<Vec<Call>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            list: Box::new(|_, _| Ok(list_body(json!([]), 0))),
            patch: Box::new(|_, _, _| Ok(())),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_list(
        mut self,
        handler: impl Fn(ResourceKind, &ListQuery) -> ApiResult<Value> + 'static,
    ) -> Self {
        self.list = Box::new(handler);
        self
    }

    pub fn on_patch(
        mut self,
        handler: impl Fn(ResourceKind, &str, &Value) -> ApiResult<()> + 'static,
    ) -> Self {
        self.patch = Box::new(handler);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

/// A list body holding `data` on page one of `total_items` results.
pub fn list_body(data: Value, total_items: u64) -> Value {
    let count = data.as_array().map_or(0, Vec::len);
    json!({
        "message": "ok",
        "data": data,
        "pagination": {
            "page": 1,
            "limit": count.max(1),
            "totalItems": total_items,
            "totalPages": 1,
            "hasNextPage": false,
            "hasPrevPage": false,
        }
    })
}

impl ResourceReader for FakeGateway {
    async fn fetch_page<T>(
        &self,
        kind: ResourceKind,
        _token: &BearerToken,
        query: &ListQuery,
    ) -> ApiResult<ListResponse<T>>
    where
        T: DeserializeOwned,
    {
        self.calls
            .borrow_mut()
            .push(Call::Fetch(kind, query.clone()));
        let body = (self.list)(kind, query)?;
        serde_json::from_value(body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

impl ResourceWriter for FakeGateway {
    async fn patch_item<P>(
        &self,
        kind: ResourceKind,
        _token: &BearerToken,
        id: &ResourceId,
        payload: &P,
    ) -> ApiResult<()>
    where
        P: Serialize,
    {
        let body = serde_json::to_value(payload).map_err(|err| ApiError::Client(err.to_string()))?;
        self.calls
            .borrow_mut()
            .push(Call::Patch(kind, id.as_str().to_string(), body.clone()));
        (self.patch)(kind, id.as_str(), &body)
    }
}
