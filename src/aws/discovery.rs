// src/aws/discovery.rs

//! Find DB clusters whose tags match a [`TagFilter`].

use std::collections::HashMap;

use aws_sdk_rds::types::{DbCluster, Tag};
use tracing::{debug, info};

use crate::aws::error::classify_sdk_error;
use crate::backup::Resource;
use crate::errors::{Result, SnapctlError};
use crate::filter::TagFilter;

/// Page through every DB cluster in the region and return those matching
/// `filter`, in the order the API lists them.
///
/// No status filtering happens here; callers decide which statuses are
/// eligible for backup.
pub async fn discover_clusters(
    client: &aws_sdk_rds::Client,
    filter: &TagFilter,
) -> Result<Vec<Resource>> {
    let mut matching = Vec::new();
    let mut scanned = 0usize;
    let mut marker: Option<String> = None;

    loop {
        let page = client
            .describe_db_clusters()
            .set_marker(marker.take())
            .send()
            .await
            .map_err(|e| SnapctlError::Aws(classify_sdk_error(&e).to_string()))?;

        for cluster in page.db_clusters() {
            let Some(id) = cluster.db_cluster_identifier() else {
                continue;
            };
            scanned += 1;

            let resource = Resource {
                id: id.to_string(),
                arn: cluster.db_cluster_arn().map(str::to_string),
                status: cluster.status().unwrap_or("unknown").to_string(),
                tags: cluster_tags(client, cluster).await?,
            };

            if resource.matches(filter) {
                debug!(cluster = %resource.id, status = %resource.status, "cluster matches tag filter");
                matching.push(resource);
            } else {
                debug!(cluster = %resource.id, "cluster does not match tag filter");
            }
        }

        marker = page.marker().map(str::to_string);
        if marker.is_none() {
            break;
        }
    }

    info!(scanned, matched = matching.len(), "cluster discovery finished");
    Ok(matching)
}

/// Tags are usually embedded in the describe output; fall back to
/// `ListTagsForResource` when they are not.
async fn cluster_tags(
    client: &aws_sdk_rds::Client,
    cluster: &DbCluster,
) -> Result<HashMap<String, String>> {
    if !cluster.tag_list().is_empty() {
        return Ok(extract_tags(cluster.tag_list()));
    }

    let Some(arn) = cluster.db_cluster_arn() else {
        return Ok(HashMap::new());
    };

    let response = client
        .list_tags_for_resource()
        .resource_name(arn)
        .send()
        .await
        .map_err(|e| SnapctlError::Aws(classify_sdk_error(&e).to_string()))?;

    Ok(extract_tags(response.tag_list()))
}

/// Collapse SDK tags into a map; a repeated key keeps its last value.
fn extract_tags(tags: &[Tag]) -> HashMap<String, String> {
    tags.iter()
        .filter_map(|t| match (t.key(), t.value()) {
            (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
            _ => None,
        })
        .collect()
}
