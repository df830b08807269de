//! Publishing Clients
//!
//! Typed HTTP client libraries for the publishing platform's backend
//! services, plus the shared plumbing they are built on. Each client
//! marshals typed parameters into an HTTP request and decodes the JSON
//! response, translating non-2xx statuses into typed errors.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`batch`] - Concurrent paginated-batch-fetch core shared by all batch operations
//! - `client` - Shared HTTP client construction policy (internal)
//! - [`error`] - The [`ApiError`] type shared by every client
//! - [`headers`] - Request-header helpers for auth and tracing context
//! - [`health`] - Health-check wrapper implemented by every client
//! - [`page`] - The shared paginated list envelope
//!
//! One module per backend service:
//! - [`datasets`] - Dataset API, including all `get_*_in_batches` operations
//! - [`files`], [`zebedee`], [`interactives`], [`categories`],
//!   [`table_renderer`], [`download`], [`articles`], [`areas`]

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod areas;
pub mod articles;
pub mod batch;
pub mod categories;
pub(crate) mod client;
pub mod datasets;
pub mod download;
pub mod error;
pub mod files;
pub mod headers;
pub mod health;
pub mod interactives;
pub mod page;
pub mod table_renderer;
pub mod zebedee;

// Re-export commonly used types
pub use areas::{Area, AreaRelation, AreasClient};
pub use articles::{ArticlesClient, Bulletin};
pub use batch::{BatchConfigError, BatchProcessor, BatchStep};
pub use categories::{CategoriesClient, Category};
pub use datasets::{
    Dataset, DatasetsClient, Dimension, DimensionOption, Instance, MAX_PAGE_LIMIT, Version,
};
pub use download::DownloadClient;
pub use error::ApiError;
pub use files::{FileMetadata, FilesClient};
pub use headers::RequestHeaders;
pub use health::{CheckState, HealthStatus, Healthcheck};
pub use interactives::{Interactive, InteractiveMetadata, InteractivesClient};
pub use page::Page;
pub use table_renderer::TableRendererClient;
pub use zebedee::{PageTitle, ZebedeeClient};
