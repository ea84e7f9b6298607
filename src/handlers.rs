//! Request handlers: the `/stats` scan and the 404 fallback.

use axum::{Json, extract::Query};

use crate::connection::{self, ConnectionDescriptor};
use crate::error::ApiError;
use crate::scan::{self, CollectionStats};

/// `GET /stats` — validate parameters, open one connection, scan the cluster,
/// close the connection, respond.
///
/// Validation failures respond 400 without ever connecting. Connection and
/// list-databases failures respond 500 with a generic body. Everything deeper
/// degrades to partial results inside the scan. The client is shut down
/// exactly once before any response is produced.
pub async fn collection_stats(
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<CollectionStats>>, ApiError> {
    let descriptor = ConnectionDescriptor::from_query(&params).map_err(|err| {
        tracing::error!("{}", err);
        ApiError::from(err)
    })?;
    let db_prefix = connection::first_value(&params, "dbPrefix").map(str::to_string);

    let client = connection::connect(&descriptor)
        .await
        .map_err(ApiError::Connection)?;

    let scan_result = scan::scan_cluster(&client, db_prefix.as_deref()).await;

    client.shutdown().await;
    tracing::info!("Connection closed");

    match scan_result {
        Ok(results) => {
            tracing::info!("Scan completed, returning {} result(s)", results.len());
            Ok(Json(results))
        }
        Err(err) => Err(ApiError::Connection(err)),
    }
}

/// Fallback for every unmatched route and method.
pub async fn endpoint_not_found() -> ApiError {
    tracing::error!("Endpoint not found");
    ApiError::NotFound
}
