#![allow(missing_docs)]

pub mod answers;
pub mod mapping;
pub mod render;
pub mod rules;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use answers::{AnswerSet, OwnerCredentials, SubmissionRecord, ValidationError, is_blank};
pub use mapping::map_to_external_record;
pub use render::{
    RenderPayload, RenderProgress, RenderQuestion, RenderStatus, build_render_payload,
    next_question, render_text,
};
pub use rules::{ConditionExpr, ConditionOperator, RuleLogic, RuleSet, should_show};
pub use spec::{Form, Question, QuestionType};
pub use validate::validate;
pub use visibility::{VisibilityMap, resolve_visible, visibility_map};
