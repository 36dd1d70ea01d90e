pub mod explanation_service;
pub mod worksheet_service;

pub use explanation_service::ExplanationService;
pub use worksheet_service::{
    ComplianceVerdict, GenerationOutcome, WorksheetRequest, WorksheetService,
};
