pub mod controller;
pub mod exam_flow;
pub mod navigator;
pub mod wrong_book;

pub use controller::{AnswerOutcome, Category, GroupBy, NavOutcome, QuizController, SubmitStatus};
pub use exam_flow::{ExamRunner, ExamSession};
pub use navigator::{JumpTarget, PracticeCursor, QuestionMode, RandomStep, RandomWalk};
pub use wrong_book::WrongBook;
