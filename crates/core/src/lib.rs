//! ProjectROI Core - investment analysis for capital projects.
//!
//! Turns per-period financial records and dated investments into cash flow
//! series, then reports ROI, NPV, IRR, payback, sensitivity and forecast
//! scenarios. The crate is storage-agnostic: data arrives through the
//! `ProjectDataRepositoryTrait` implemented by a storage layer.

pub mod analysis;
pub mod cash_flows;
pub mod constants;
pub mod errors;
pub mod forecast;
pub mod metrics;
pub mod periods;
pub mod settings;

pub use analysis::{
    AnalysisResponse, ProjectAnalysis, ProjectAnalysisService, ProjectAnalysisServiceTrait,
    ProjectDataRepositoryTrait,
};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
