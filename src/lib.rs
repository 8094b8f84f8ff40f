//! Content Flux - Cross-platform content metrics and story classification
//!
//! Flux turns heterogeneous platform payloads into comparable content records
//! through a deterministic pipeline: platform field mapping → normalization →
//! derived metrics → (optional) story classification → output encoding.
//!
//! ## Modules
//!
//! - **Normalization**: Map YouTube, Reddit, TikTok, Instagram and Facebook
//!   payloads into `UniversalMetrics`
//! - **Derived metrics**: Engagement, velocity, watch-through, RPI, UCS and
//!   the ranking score
//! - **Classification**: Weighted keyword story detection with an
//!   anti-pattern veto
//!
//! Every stage is a pure function of its inputs; the current time is always
//! passed in by the caller.

pub mod adapters;
pub mod classifier;
pub mod encoder;
pub mod error;
pub mod features;
pub mod normalizer;
pub mod pipeline;
pub mod types;

pub use classifier::{ClassifierConfig, ContentClassifier};
pub use error::{ComputeError, ValidationError};
pub use features::DerivedMetricsCalculator;
pub use normalizer::MetricsNormalizer;
pub use pipeline::{metrics_from_json, ContentProcessor, ProcessorConfig};
pub use types::{
    ClassificationResult, DerivedMetrics, Platform, RawPlatformRecord, ScoreComponents,
    SupplementalMetrics, UniversalMetrics,
};

/// Flux version embedded in all output records
pub const FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for output records
pub const PRODUCER_NAME: &str = "content-flux";
