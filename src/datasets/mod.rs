//! Client for the dataset API.
//!
//! Alongside the usual single-page operations this client carries the batch
//! surface built on [`BatchProcessor`](crate::batch::BatchProcessor): for
//! datasets, instances, versions, dimensions, and dimension options there is
//! a `*_batch_process` hook taking a raw page processor, and a
//! `get_*_in_batches` wrapper that accumulates every item into a `Vec`.
//!
//! Batch wrappers hand pages to the processor in fetch-completion order, not
//! offset order; accumulated items are complete but unordered when
//! `max_workers > 1`.

mod models;

pub use models::{Dataset, Dimension, DimensionOption, Instance, Version};

use std::cmp;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tracing::instrument;

use crate::batch::{BatchProcessor, BatchStep};
use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};
use crate::page::Page;

/// Largest page size the dataset API will serve; requested batch sizes are
/// capped here.
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Client for the dataset API.
#[derive(Debug, Clone)]
pub struct DatasetsClient {
    inner: ServiceClient,
}

impl DatasetsClient {
    /// Creates a dataset API client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("dataset-api", base_url)?,
        })
    }

    // ==================== Single-page operations ====================

    /// Fetches one dataset by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    #[instrument(level = "debug", skip(self, headers))]
    pub async fn get_dataset(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
    ) -> Result<Dataset, ApiError> {
        self.inner
            .get_json(&format!("/datasets/{dataset_id}"), headers, &[])
            .await
    }

    /// Fetches one page of the dataset collection.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_datasets(
        &self,
        headers: &RequestHeaders,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Dataset>, ApiError> {
        self.inner
            .get_json("/datasets", headers, &paging(offset, limit))
            .await
    }

    /// Fetches one page of import instances.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_instances(
        &self,
        headers: &RequestHeaders,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Instance>, ApiError> {
        self.inner
            .get_json("/instances", headers, &paging(offset, limit))
            .await
    }

    /// Fetches one page of an edition's versions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_versions(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Version>, ApiError> {
        self.inner
            .get_json(
                &format!("/datasets/{dataset_id}/editions/{edition}/versions"),
                headers,
                &paging(offset, limit),
            )
            .await
    }

    /// Fetches one page of a version's dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_version_dimensions(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Dimension>, ApiError> {
        self.inner
            .get_json(
                &format!("/datasets/{dataset_id}/editions/{edition}/versions/{version}/dimensions"),
                headers,
                &paging(offset, limit),
            )
            .await
    }

    /// Fetches one page of a dimension's options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    #[allow(clippy::too_many_arguments)]
    pub async fn get_options(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        dimension: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Page<DimensionOption>, ApiError> {
        self.inner
            .get_json(
                &format!(
                    "/datasets/{dataset_id}/editions/{edition}/versions/{version}/dimensions/{dimension}/options"
                ),
                headers,
                &paging(offset, limit),
            )
            .await
    }

    // ==================== Batch operations ====================

    /// Streams every page of the dataset collection through `process_page`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for a zero `batch_size` or
    /// `max_workers`, otherwise the first error from a fetch or from
    /// `process_page`.
    #[instrument(level = "debug", skip(self, headers, process_page))]
    pub async fn datasets_batch_process<P>(
        &self,
        headers: &RequestHeaders,
        batch_size: usize,
        max_workers: usize,
        process_page: P,
    ) -> Result<(), ApiError>
    where
        P: FnMut(Page<Dataset>) -> Result<BatchStep, ApiError> + Send + 'static,
    {
        let (processor, limit) = build_processor(batch_size, max_workers)?;
        let client = self.clone();
        let headers = headers.clone();
        processor
            .run(
                move |offset| {
                    let client = client.clone();
                    let headers = headers.clone();
                    async move {
                        let page = client.get_datasets(&headers, offset, limit).await?;
                        let total_count = page.total_count;
                        Ok((page, total_count))
                    }
                },
                process_page,
            )
            .await
    }

    /// Fetches the full dataset collection, accumulating every item.
    ///
    /// Item order follows fetch completion, not collection order, when
    /// `max_workers > 1`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::datasets_batch_process`].
    pub async fn get_datasets_in_batches(
        &self,
        headers: &RequestHeaders,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<Dataset>, ApiError> {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        self.datasets_batch_process(
            headers,
            batch_size,
            max_workers,
            page_collector(Arc::clone(&collected)),
        )
        .await?;
        Ok(take_accumulated(collected))
    }

    /// Streams every page of import instances through `process_page`.
    ///
    /// # Errors
    ///
    /// Same shape as [`Self::datasets_batch_process`].
    #[instrument(level = "debug", skip(self, headers, process_page))]
    pub async fn instances_batch_process<P>(
        &self,
        headers: &RequestHeaders,
        batch_size: usize,
        max_workers: usize,
        process_page: P,
    ) -> Result<(), ApiError>
    where
        P: FnMut(Page<Instance>) -> Result<BatchStep, ApiError> + Send + 'static,
    {
        let (processor, limit) = build_processor(batch_size, max_workers)?;
        let client = self.clone();
        let headers = headers.clone();
        processor
            .run(
                move |offset| {
                    let client = client.clone();
                    let headers = headers.clone();
                    async move {
                        let page = client.get_instances(&headers, offset, limit).await?;
                        let total_count = page.total_count;
                        Ok((page, total_count))
                    }
                },
                process_page,
            )
            .await
    }

    /// Fetches all import instances, accumulating every item.
    ///
    /// # Errors
    ///
    /// Same as [`Self::instances_batch_process`].
    pub async fn get_instances_in_batches(
        &self,
        headers: &RequestHeaders,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<Instance>, ApiError> {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        self.instances_batch_process(
            headers,
            batch_size,
            max_workers,
            page_collector(Arc::clone(&collected)),
        )
        .await?;
        Ok(take_accumulated(collected))
    }

    /// Streams every page of an edition's versions through `process_page`.
    ///
    /// # Errors
    ///
    /// Same shape as [`Self::datasets_batch_process`].
    #[instrument(level = "debug", skip(self, headers, process_page))]
    pub async fn versions_batch_process<P>(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        batch_size: usize,
        max_workers: usize,
        process_page: P,
    ) -> Result<(), ApiError>
    where
        P: FnMut(Page<Version>) -> Result<BatchStep, ApiError> + Send + 'static,
    {
        let (processor, limit) = build_processor(batch_size, max_workers)?;
        let client = self.clone();
        let headers = headers.clone();
        let dataset_id = dataset_id.to_string();
        let edition = edition.to_string();
        processor
            .run(
                move |offset| {
                    let client = client.clone();
                    let headers = headers.clone();
                    let dataset_id = dataset_id.clone();
                    let edition = edition.clone();
                    async move {
                        let page = client
                            .get_versions(&headers, &dataset_id, &edition, offset, limit)
                            .await?;
                        let total_count = page.total_count;
                        Ok((page, total_count))
                    }
                },
                process_page,
            )
            .await
    }

    /// Fetches every version of an edition, accumulating every item.
    ///
    /// # Errors
    ///
    /// Same as [`Self::versions_batch_process`].
    pub async fn get_versions_in_batches(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<Version>, ApiError> {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        self.versions_batch_process(
            headers,
            dataset_id,
            edition,
            batch_size,
            max_workers,
            page_collector(Arc::clone(&collected)),
        )
        .await?;
        Ok(take_accumulated(collected))
    }

    /// Streams every page of a version's dimensions through `process_page`.
    ///
    /// # Errors
    ///
    /// Same shape as [`Self::datasets_batch_process`].
    #[allow(clippy::too_many_arguments)]
    #[instrument(level = "debug", skip(self, headers, process_page))]
    pub async fn dimensions_batch_process<P>(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        batch_size: usize,
        max_workers: usize,
        process_page: P,
    ) -> Result<(), ApiError>
    where
        P: FnMut(Page<Dimension>) -> Result<BatchStep, ApiError> + Send + 'static,
    {
        let (processor, limit) = build_processor(batch_size, max_workers)?;
        let client = self.clone();
        let headers = headers.clone();
        let dataset_id = dataset_id.to_string();
        let edition = edition.to_string();
        let version = version.to_string();
        processor
            .run(
                move |offset| {
                    let client = client.clone();
                    let headers = headers.clone();
                    let dataset_id = dataset_id.clone();
                    let edition = edition.clone();
                    let version = version.clone();
                    async move {
                        let page = client
                            .get_version_dimensions(
                                &headers,
                                &dataset_id,
                                &edition,
                                &version,
                                offset,
                                limit,
                            )
                            .await?;
                        let total_count = page.total_count;
                        Ok((page, total_count))
                    }
                },
                process_page,
            )
            .await
    }

    /// Fetches every dimension of a version, accumulating every item.
    ///
    /// # Errors
    ///
    /// Same as [`Self::dimensions_batch_process`].
    pub async fn get_dimensions_in_batches(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<Dimension>, ApiError> {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        self.dimensions_batch_process(
            headers,
            dataset_id,
            edition,
            version,
            batch_size,
            max_workers,
            page_collector(Arc::clone(&collected)),
        )
        .await?;
        Ok(take_accumulated(collected))
    }

    /// Streams every page of a dimension's options through `process_page`.
    ///
    /// # Errors
    ///
    /// Same shape as [`Self::datasets_batch_process`].
    #[allow(clippy::too_many_arguments)]
    #[instrument(level = "debug", skip(self, headers, process_page))]
    pub async fn options_batch_process<P>(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        dimension: &str,
        batch_size: usize,
        max_workers: usize,
        process_page: P,
    ) -> Result<(), ApiError>
    where
        P: FnMut(Page<DimensionOption>) -> Result<BatchStep, ApiError> + Send + 'static,
    {
        let (processor, limit) = build_processor(batch_size, max_workers)?;
        let client = self.clone();
        let headers = headers.clone();
        let dataset_id = dataset_id.to_string();
        let edition = edition.to_string();
        let version = version.to_string();
        let dimension = dimension.to_string();
        processor
            .run(
                move |offset| {
                    let client = client.clone();
                    let headers = headers.clone();
                    let dataset_id = dataset_id.clone();
                    let edition = edition.clone();
                    let version = version.clone();
                    let dimension = dimension.clone();
                    async move {
                        let page = client
                            .get_options(
                                &headers,
                                &dataset_id,
                                &edition,
                                &version,
                                &dimension,
                                offset,
                                limit,
                            )
                            .await?;
                        let total_count = page.total_count;
                        Ok((page, total_count))
                    }
                },
                process_page,
            )
            .await
    }

    /// Fetches every option of a dimension, accumulating every item.
    ///
    /// # Errors
    ///
    /// Same as [`Self::options_batch_process`].
    #[allow(clippy::too_many_arguments)]
    pub async fn get_options_in_batches(
        &self,
        headers: &RequestHeaders,
        dataset_id: &str,
        edition: &str,
        version: &str,
        dimension: &str,
        batch_size: usize,
        max_workers: usize,
    ) -> Result<Vec<DimensionOption>, ApiError> {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        self.options_batch_process(
            headers,
            dataset_id,
            edition,
            version,
            dimension,
            batch_size,
            max_workers,
            page_collector(Arc::clone(&collected)),
        )
        .await?;
        Ok(take_accumulated(collected))
    }
}

#[async_trait::async_trait]
impl Healthcheck for DatasetsClient {
    async fn checker(&self, state: &mut CheckState) {
        run_check(&self.inner, state).await;
    }
}

/// Builds the batch core for a hook, capping the page size at the service
/// maximum. The capped size is both the fetch `limit` and the offset stride,
/// so pages stay contiguous.
fn build_processor(
    batch_size: usize,
    max_workers: usize,
) -> Result<(BatchProcessor, usize), ApiError> {
    let batch_size = cmp::min(batch_size, MAX_PAGE_LIMIT);
    let processor = BatchProcessor::new(batch_size, max_workers)
        .map_err(|e| ApiError::invalid_request(e.to_string()))?;
    Ok((processor, batch_size))
}

fn paging(offset: usize, limit: usize) -> [(&'static str, String); 2] {
    [("offset", offset.to_string()), ("limit", limit.to_string())]
}

/// Default processor for the `get_*_in_batches` wrappers: append the page's
/// items to the shared accumulator. Serialized invocation makes the lock
/// uncontended.
fn page_collector<T: Send + 'static>(
    sink: Arc<StdMutex<Vec<T>>>,
) -> impl FnMut(Page<T>) -> Result<BatchStep, ApiError> + Send + 'static {
    move |page: Page<T>| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(page.items);
        Ok(BatchStep::Continue)
    }
}

/// Takes the accumulated items back out of the shared accumulator.
fn take_accumulated<T: Clone>(collected: Arc<StdMutex<Vec<T>>>) -> Vec<T> {
    match Arc::try_unwrap(collected) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
        // A detached worker may briefly hold a clone after an abort; copy
        // out of the shared accumulator instead.
        Err(shared) => shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
    }
}
