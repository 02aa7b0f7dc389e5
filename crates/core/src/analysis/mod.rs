//! Project analysis orchestration.

pub mod analysis_model;
pub mod analysis_service;
pub mod analysis_traits;


pub use analysis_model::{AnalysisResponse, ProjectAnalysis};
pub use analysis_service::ProjectAnalysisService;
pub use analysis_traits::{ProjectAnalysisServiceTrait, ProjectDataRepositoryTrait};
