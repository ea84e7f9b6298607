//! Cluster metadata walk and per-collection storage stats.
//!
//! The scan is strictly sequential and best-effort: a database whose
//! collections cannot be listed contributes nothing, and a collection whose
//! stats cannot be read is skipped. Both outcomes are logged and the scan
//! continues. Only failing to list the databases themselves aborts the scan.

use anyhow::{Context, Result, bail};
use futures::TryStreamExt;
use mongodb::{
    Client, Database,
    bson::{Bson, Document, doc},
};
use serde::Serialize;

/// One row of the response: the storage footprint of a single collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub database: String,
    pub collection: String,
    #[serde(rename = "storageSize")]
    pub storage_size: i64,
}

/// Walk every database matching the optional name prefix and gather storage
/// stats for each collection, in cluster-reported discovery order.
pub async fn scan_cluster(
    client: &Client,
    db_prefix: Option<&str>,
) -> Result<Vec<CollectionStats>> {
    tracing::info!("Fetching list of databases");
    let databases = client
        .list_databases()
        .await
        .context("Failed to list databases")?;

    let mut results = Vec::new();

    for database in databases {
        let db_name = database.name;

        if !included(&db_name, db_prefix) {
            continue;
        }

        let db = client.database(&db_name);
        let collections = match list_collections(&db).await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!("Skipping database '{}': {:#}", db_name, err);
                continue;
            }
        };

        for collection in collections {
            let step = collect_storage_size(&db, &collection).await;
            accumulate_step(&mut results, &db_name, collection, step);
        }
    }

    Ok(results)
}

/// Fold one per-collection step into the running result set. A successful
/// step appends a row; a failed step is logged and excluded, leaving every
/// other row untouched.
fn accumulate_step(
    results: &mut Vec<CollectionStats>,
    database: &str,
    collection: String,
    step: Result<i64>,
) {
    match step {
        Ok(storage_size) => results.push(CollectionStats {
            database: database.to_string(),
            collection,
            storage_size,
        }),
        Err(err) => {
            tracing::warn!("Skipping collection '{}.{}': {:#}", database, collection, err);
        }
    }
}

/// Case-sensitive, exact-prefix match on the database name. No prefix means
/// every database is scanned.
fn included(db_name: &str, prefix: Option<&str>) -> bool {
    prefix.map_or(true, |p| db_name.starts_with(p))
}

/// Collection names in cluster-reported order. Not sorted: the response
/// preserves discovery order.
async fn list_collections(db: &Database) -> Result<Vec<String>> {
    tracing::info!("Fetching list of collections from database '{}'", db.name());

    let cursor = db
        .list_collections()
        .await
        .context("Failed to list collections")?;
    let specs: Vec<_> = cursor
        .try_collect()
        .await
        .context("Failed to read collection listing")?;

    Ok(specs.into_iter().map(|spec| spec.name).collect())
}

async fn collect_storage_size(db: &Database, collection: &str) -> Result<i64> {
    tracing::debug!(
        "Fetching storage size of collection '{}' from database '{}'",
        collection,
        db.name()
    );

    let reply = db
        .run_command(doc! { "collStats": collection })
        .await
        .context("collStats command failed")?;

    storage_size_bytes(&reply)
}

/// collStats reports storageSize as int32, int64, or double depending on
/// server version and collection size.
fn storage_size_bytes(reply: &Document) -> Result<i64> {
    match reply.get("storageSize") {
        Some(Bson::Int32(size)) => Ok(i64::from(*size)),
        Some(Bson::Int64(size)) => Ok(*size),
        Some(Bson::Double(size)) => Ok(*size as i64),
        Some(other) => bail!("Unexpected storageSize type: {:?}", other),
        None => bail!("collStats reply is missing storageSize"),
    }
}
