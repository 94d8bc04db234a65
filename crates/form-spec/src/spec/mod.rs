pub mod form;
pub mod question;

pub use form::Form;
pub use question::{Question, QuestionType};
