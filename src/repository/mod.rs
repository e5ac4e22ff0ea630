use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::listing::{ListQuery, ListResponse};
use crate::domain::types::ResourceId;
use crate::repository::errors::ApiResult;
use crate::resource::ResourceKind;
use crate::session::BearerToken;

pub mod errors;
#[cfg(test)]
pub mod fake;
pub mod http;

pub use http::HttpGateway;

/// Read access to the paginated list endpoints of the backend.
#[allow(async_fn_in_trait)]
pub trait ResourceReader {
    /// `GET /{resource}` with the query pairs of `query`.
    async fn fetch_page<T>(
        &self,
        kind: ResourceKind,
        token: &BearerToken,
        query: &ListQuery,
    ) -> ApiResult<ListResponse<T>>
    where
        T: DeserializeOwned;
}

/// Partial updates of single records.
#[allow(async_fn_in_trait)]
pub trait ResourceWriter {
    /// `PATCH /{resource}/{id}` with `payload` as the JSON body. The updated
    /// record the backend returns is not inspected.
    async fn patch_item<P>(
        &self,
        kind: ResourceKind,
        token: &BearerToken,
        id: &ResourceId,
        payload: &P,
    ) -> ApiResult<()>
    where
        P: Serialize;
}
