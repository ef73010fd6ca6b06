//! 考试流程
//!
//! 生成试卷 → 作答（限时）→ 交卷。交卷之后试卷不可再改。

use crate::api::ExamApi;
use crate::error::{AppResult, ExamError};
use crate::infrastructure::Clock;
use crate::models::{ExamAnswer, ExamRequest, ExamResult, Question};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// 一场考试
#[derive(Debug, Clone, PartialEq)]
pub struct ExamSession {
    pub exam_id: String,
    pub questions: Vec<Question>,
    pub time_limit: Duration,
    pub started_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    answers: BTreeMap<u32, u8>,
    submitted: bool,
    result: Option<ExamResult>,
}

impl ExamSession {
    pub fn new(
        exam_id: impl Into<String>,
        questions: Vec<Question>,
        time_limit: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            exam_id: exam_id.into(),
            questions,
            time_limit,
            started_at,
            deadline: started_at + time_limit,
            answers: BTreeMap::new(),
            submitted: false,
            result: None,
        }
    }

    /// 作答（可以改选）
    ///
    /// # 参数
    /// - `question_id`: 本场考试中的题目
    /// - `option`: 1-4
    /// - `now`: 当前时间，用于判断是否超时
    pub fn answer(&mut self, question_id: u32, option: u8, now: DateTime<Utc>) -> Result<(), ExamError> {
        if self.submitted {
            return Err(ExamError::AlreadySubmitted {
                exam_id: self.exam_id.clone(),
            });
        }
        if self.is_overdue(now) {
            return Err(ExamError::DeadlinePassed {
                exam_id: self.exam_id.clone(),
            });
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(ExamError::UnknownQuestion { question_id });
        }
        if !(1..=4).contains(&option) {
            return Err(ExamError::InvalidOption { option });
        }
        self.answers.insert(question_id, option);
        Ok(())
    }

    pub fn answer_for(&self, question_id: u32) -> Option<u8> {
        self.answers.get(&question_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// 剩余时间，不小于 0
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.deadline - now).max(Duration::zero())
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    // 按试卷顺序，未作答的题不提交
    fn collect_answers(&self) -> Vec<ExamAnswer> {
        self.questions
            .iter()
            .filter_map(|q| {
                self.answers.get(&q.id).map(|&selected_option| ExamAnswer {
                    question_id: q.id,
                    selected_option,
                })
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct ExamRunner {
    api: ExamApi,
    clock: Arc<dyn Clock>,
}

impl ExamRunner {
    pub fn new(api: ExamApi, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// 生成试卷并开始计时；后端没给时限时用请求里的时限
    pub async fn generate(&self, request: &ExamRequest) -> AppResult<ExamSession> {
        let paper = self.api.generate(request).await?;
        let seconds = paper.time_limit.unwrap_or(request.time_limit);
        let time_limit = Duration::seconds(i64::from(u32::try_from(seconds).unwrap_or(u32::MAX)));
        Ok(ExamSession::new(
            paper.exam_id,
            paper.questions,
            time_limit,
            self.clock.now(),
        ))
    }

    pub fn remaining(&self, session: &ExamSession) -> Duration {
        session.remaining(self.clock.now())
    }

    pub fn answer(&self, session: &mut ExamSession, question_id: u32, option: u8) -> Result<(), ExamError> {
        session.answer(question_id, option, self.clock.now())
    }

    /// 交卷；超时后仍可交卷（到点自动提交），交过一次后拒绝
    pub async fn submit(&self, session: &mut ExamSession) -> AppResult<ExamResult> {
        if session.submitted {
            return Err(ExamError::AlreadySubmitted {
                exam_id: session.exam_id.clone(),
            }
            .into());
        }

        let answers = session.collect_answers();
        let answered = answers.len();
        let result = self.api.submit(&session.exam_id, answers).await?;

        session.submitted = true;
        session.result = Some(result.clone());
        info!(
            "🏁 试卷 {} 已提交: 作答 {}/{}，得分 {}",
            session.exam_id,
            answered,
            session.questions.len(),
            result.score
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn question(id: u32) -> Question {
        Question {
            id,
            kind: 1,
            difficulty: 1,
            prompt: format!("题目 {}", id),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_option: 1,
            explanation: String::new(),
            keywords: Vec::new(),
            resource: None,
            picture: false,
        }
    }

    fn session() -> (ExamSession, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
        (
            ExamSession::new("e1", vec![question(1), question(2)], Duration::seconds(900), start),
            start,
        )
    }

    #[test]
    fn answers_are_validated() {
        let (mut exam, start) = session();
        assert_eq!(exam.answer(1, 3, start), Ok(()));
        assert_eq!(exam.answer(1, 2, start), Ok(()));
        assert_eq!(exam.answer_for(1), Some(2));
        assert_eq!(
            exam.answer(9, 1, start),
            Err(ExamError::UnknownQuestion { question_id: 9 })
        );
        assert_eq!(exam.answer(2, 5, start), Err(ExamError::InvalidOption { option: 5 }));
        assert_eq!(exam.answered_count(), 1);
    }

    #[test]
    fn deadline_is_enforced() {
        let (mut exam, start) = session();
        assert_eq!(exam.remaining(start + Duration::seconds(300)), Duration::seconds(600));
        assert!(!exam.is_overdue(start + Duration::seconds(899)));

        let late = start + Duration::seconds(900);
        assert!(exam.is_overdue(late));
        assert_eq!(exam.remaining(late + Duration::seconds(10)), Duration::zero());
        assert_eq!(
            exam.answer(1, 1, late),
            Err(ExamError::DeadlinePassed {
                exam_id: "e1".to_string()
            })
        );
    }

    #[test]
    fn unanswered_questions_are_not_submitted() {
        let (mut exam, start) = session();
        exam.answer(2, 4, start).unwrap();
        let answers = exam.collect_answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].question_id, 2);
        assert_eq!(answers[0].selected_option, 4);
    }
}
