pub mod assessment_flow;
pub mod lesson_flow;

pub use assessment_flow::{AssessmentFlow, AssessmentResult};
pub use lesson_flow::{LessonFlow, LessonMaterials, LessonRequest};
