//! LLM provider capabilities and model metadata.
//!
//! [`registry`] is the static capability table: which providers exist,
//! whether they can call tools, and which model to prefer for tool-heavy
//! sessions. [`models`] layers live model listing on top, degrading to the
//! static catalogs when a provider's listing endpoint is missing or down.

pub mod models;
pub mod registry;

pub use models::{format_model_list, ModelInfo, ModelListing, ModelService, ProviderError};
pub use registry::ProviderCapabilities;
