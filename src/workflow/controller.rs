//! 刷题控制器 - 流程层
//!
//! 核心职责：持有题库、培训题、错题本和当前题目，编排导航与作答
//!
//! - 只依赖接口层（api）与会话状态，不关心界面如何渲染
//! - 状态放在内部锁里，方法都是 `&self`，可以在多个任务间共享
//! - 锁只在同步代码段内持有，不跨 `await`
//! - 每次导航开启新纪元，慢请求返回时纪元已变就丢弃结果

use crate::api::{Api, PageQuery};
use crate::error::{AppResult, NavigationError};
use crate::infrastructure::{Clock, NavigationEpoch, Router, Toasts, View};
use crate::models::{
    question, AnswerRecord, AnswerSource, AnswerSubmission, DisplayQuestion, ExamStats, Question,
    QuestionQuery, QuestionStats, WrongQuery,
};
use crate::session::SessionStore;
use crate::workflow::navigator::{
    nearest_above, nearest_below, JumpTarget, PracticeCursor, QuestionMode, RandomStep, RandomWalk,
};
use crate::workflow::wrong_book::WrongBook;
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// 导航结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// 已切换到该题
    Moved(u32),
    /// 已经没有更多题目（已提示用户）
    NoMore,
    /// 没有移动
    Unchanged,
}

/// 后端提交状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// 未提交（未登录）
    Skipped,
    Accepted,
    Failed(String),
}

/// 一次作答的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: u32,
    pub selected_option: u8,
    pub correct_option: u8,
    pub correct: bool,
    /// 是否写入了本地答题记录
    pub recorded: bool,
    /// 是否新加入错题本
    pub added_to_wrong_book: bool,
    pub submission: SubmitStatus,
}

/// 分类依据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Type,
    Difficulty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub code: u8,
    pub name: String,
    pub questions: Vec<Question>,
}

/// 控制器内部状态
#[derive(Debug, Default)]
struct QuizState {
    bank: Vec<Question>,
    training: Vec<Question>,
    mode: QuestionMode,
    current: Option<Question>,
    practice: PracticeCursor,
    random: RandomWalk,
    selected: Option<u8>,
    revealed: bool,
    wrong: WrongBook,
    wrong_details: Vec<Question>,
    records: Vec<AnswerRecord>,
    question_stats: Option<QuestionStats>,
    exam_stats: ExamStats,
    search_results: Vec<Question>,
}

impl QuizState {
    fn bank_ids(&self) -> Vec<u32> {
        self.bank.iter().map(|q| q.id).collect()
    }

    fn training_ids(&self) -> Vec<u32> {
        self.training.iter().map(|q| q.id).collect()
    }

    fn current_id(&self) -> Option<u32> {
        self.current.as_ref().map(|q| q.id)
    }

    /// 换上新题库，顺序练习的游标跟随当前题目的新位置；当前题已不在题库中时回到开头
    fn replace_bank(&mut self, bank: Vec<Question>) {
        self.bank = bank;
        let index = self
            .current_id()
            .and_then(|id| self.bank.iter().position(|q| q.id == id));
        self.practice.set(index.unwrap_or(0));
    }

    fn bank_id_at(&self, index: usize) -> Option<u32> {
        self.bank.get(index).map(|q| q.id)
    }

    /// 切换到新题：清空选择、答案显示和单题统计
    fn show(&mut self, question: Question, mode: QuestionMode) -> u32 {
        let id = question.id;
        self.current = Some(question);
        self.mode = mode;
        self.selected = None;
        self.revealed = false;
        self.question_stats = None;
        id
    }
}

#[derive(Clone)]
pub struct QuizController {
    api: Api,
    session: Arc<SessionStore>,
    router: Arc<Router>,
    toasts: Toasts,
    clock: Arc<dyn Clock>,
    epoch: NavigationEpoch,
    question_page_size: u32,
    training_page_size: u32,
    state: Arc<Mutex<QuizState>>,
}

impl QuizController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api: Api,
        session: Arc<SessionStore>,
        router: Arc<Router>,
        toasts: Toasts,
        clock: Arc<dyn Clock>,
        epoch: NavigationEpoch,
        question_page_size: u32,
        training_page_size: u32,
    ) -> Self {
        Self {
            api,
            session,
            router,
            toasts,
            clock,
            epoch,
            question_page_size,
            training_page_size,
            state: Arc::new(Mutex::new(QuizState::default())),
        }
    }

    // 锁被污染时继续使用内部数据，状态本身没有跨字段不变量会被破坏
    fn state(&self) -> MutexGuard<'_, QuizState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ========== 状态读取 ==========

    pub fn mode(&self) -> QuestionMode {
        self.state().mode
    }

    pub fn current(&self) -> Option<Question> {
        self.state().current.clone()
    }

    /// 当前题目的展示形式（培训模式下类型/难度显示为 入职培训/入门）
    pub fn current_display(&self) -> Option<DisplayQuestion> {
        let state = self.state();
        let training = state.mode.is_training();
        state.current.as_ref().map(|q| q.to_display(training))
    }

    pub fn selected_option(&self) -> Option<u8> {
        self.state().selected
    }

    pub fn is_revealed(&self) -> bool {
        self.state().revealed
    }

    pub fn questions(&self) -> Vec<Question> {
        self.state().bank.clone()
    }

    pub fn training_questions(&self) -> Vec<Question> {
        self.state().training.clone()
    }

    pub fn wrong_ids(&self) -> Vec<u32> {
        self.state().wrong.ids()
    }

    pub fn wrong_questions(&self) -> Vec<Question> {
        self.state().wrong_details.clone()
    }

    pub fn records(&self) -> Vec<AnswerRecord> {
        self.state().records.clone()
    }

    pub fn question_stats(&self) -> Option<QuestionStats> {
        self.state().question_stats.clone()
    }

    pub fn exam_stats(&self) -> ExamStats {
        self.state().exam_stats
    }

    pub fn search_results(&self) -> Vec<Question> {
        self.state().search_results.clone()
    }

    pub fn random_history(&self) -> Vec<u32> {
        self.state().random.history().to_vec()
    }

    // ========== 数据加载 ==========

    /// 加载题库
    ///
    /// # 返回
    /// 题目数量；失败时题库清空并提示
    pub async fn load_questions(&self) -> AppResult<usize> {
        let query = QuestionQuery::page(1, self.question_page_size);
        match self.api.questions.list(&query).await {
            Ok(list) => {
                let count = list.len();
                self.state().replace_bank(list);
                info!("📚 题库加载完成: {} 道题", count);
                Ok(count)
            }
            Err(e) => {
                warn!("加载题库失败: {}", e);
                self.state().replace_bank(Vec::new());
                self.toasts.error("加载题库失败，请检查网络连接");
                Err(e)
            }
        }
    }

    pub async fn load_training_questions(&self) -> AppResult<usize> {
        let query = QuestionQuery::page(1, self.training_page_size);
        match self.api.training.list(&query).await {
            Ok(list) => {
                let count = list.len();
                self.state().training = list;
                info!("🎓 培训题加载完成: {} 道题", count);
                Ok(count)
            }
            Err(e) => {
                warn!("加载培训题目失败: {}", e);
                self.state().training.clear();
                self.toasts.error("加载培训题目失败，请检查网络连接");
                Err(e)
            }
        }
    }

    /// 加载错题本（仅登录时）
    ///
    /// 详情从已加载的题库中查找，题库里没有的 ID 只保留在错题本里。
    pub async fn load_wrong_questions(&self) -> AppResult<usize> {
        if !self.session.is_logged_in() {
            let mut state = self.state();
            state.wrong.clear();
            state.wrong_details.clear();
            return Ok(0);
        }

        let query = WrongQuery {
            page: Some(1),
            size: Some(1000),
            question_type: None,
        };
        match self.api.answers.wrong(&query).await {
            Ok(history) => {
                let mut state = self.state();
                state.wrong = history.wrong_ids().into_iter().collect();
                let details: Vec<Question> = state
                    .bank
                    .iter()
                    .filter(|q| state.wrong.contains(q.id))
                    .cloned()
                    .collect();
                state.wrong_details = details;
                debug!("错题本: {} 道", state.wrong.len());
                Ok(state.wrong.len())
            }
            Err(e) => {
                warn!("加载错题失败: {}", e);
                let mut state = self.state();
                state.wrong.clear();
                state.wrong_details.clear();
                Err(e)
            }
        }
    }

    /// 加载考试统计（考试次数、平均分），失败时归零
    pub async fn load_exam_stats(&self) -> AppResult<ExamStats> {
        let query = PageQuery {
            page: Some(1),
            size: Some(100),
        };
        match self.api.exams.history(&query).await {
            Ok(history) => {
                let stats = ExamStats::from_history(&history);
                self.state().exam_stats = stats;
                Ok(stats)
            }
            Err(e) => {
                warn!("加载考试统计失败: {}", e);
                self.state().exam_stats = ExamStats::default();
                Err(e)
            }
        }
    }

    /// 加载单题统计
    ///
    /// # 返回
    /// 请求期间用户已切换题目时返回 `Ok(None)`，结果被丢弃
    pub async fn load_question_stats(&self, question_id: u32) -> AppResult<Option<QuestionStats>> {
        let ticket = self.epoch.current();
        let result = self.api.stats.question(question_id).await;

        if !self.epoch.is_current(ticket) {
            debug!("题目 {} 的统计已过期，丢弃", question_id);
            return Ok(None);
        }

        match result {
            Ok(stats) => {
                self.state().question_stats = Some(stats.clone());
                Ok(Some(stats))
            }
            Err(e) => {
                self.state().question_stats = None;
                Err(e)
            }
        }
    }

    // ========== 导航 ==========

    /// 打开题库中的某题
    pub fn go_to_question(&self, id: u32, mode: QuestionMode) -> Result<NavOutcome, NavigationError> {
        let mut state = self.state();
        let Some(index) = state.bank.iter().position(|q| q.id == id) else {
            drop(state);
            self.toasts.error("题目不存在");
            return Err(NavigationError::QuestionNotFound { id });
        };

        match mode {
            QuestionMode::Practice => state.practice.set(index),
            QuestionMode::Random => state.random.visit(id),
            _ => {}
        }
        let question = state.bank[index].clone();
        state.show(question, mode);
        drop(state);

        self.moved_to(id)
    }

    pub fn go_to_training_question(&self, id: u32) -> Result<NavOutcome, NavigationError> {
        let mut state = self.state();
        let Some(question) = state.training.iter().find(|q| q.id == id).cloned() else {
            drop(state);
            self.toasts.error("培训题目不存在");
            return Err(NavigationError::TrainingNotFound { id });
        };
        state.show(question, QuestionMode::Training);
        drop(state);

        self.moved_to(id)
    }

    pub fn go_to_wrong_question(&self, id: u32) -> Result<NavOutcome, NavigationError> {
        let mut state = self.state();
        let Some(question) = state.wrong_details.iter().find(|q| q.id == id).cloned() else {
            drop(state);
            self.toasts.error("错题不存在");
            return Err(NavigationError::WrongNotFound { id });
        };
        state.show(question, QuestionMode::Wrong);
        drop(state);

        self.moved_to(id)
    }

    /// 从第一道培训题开始
    pub fn go_to_first_training_question(&self) -> Result<NavOutcome, NavigationError> {
        let first = self.state().training.first().map(|q| q.id);
        match first {
            Some(id) => self.go_to_training_question(id),
            None => {
                self.toasts.info("暂无培训题目");
                Ok(NavOutcome::NoMore)
            }
        }
    }

    /// 开始随机练习（重置历史）
    pub fn start_random(&self) -> Result<NavOutcome, NavigationError> {
        self.start_random_with(&mut rand::thread_rng())
    }

    pub fn start_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NavOutcome, NavigationError> {
        {
            let mut state = self.state();
            if state.bank.is_empty() {
                return Err(NavigationError::EmptyBank);
            }
            state.mode = QuestionMode::Random;
            state.random = RandomWalk::new();
        }
        self.next_question_with(rng)
    }

    /// 按输入跳题，`G` 前缀跳到培训题
    pub fn start_jump(&self, input: &str) -> Result<NavOutcome, NavigationError> {
        let (bank_len, training_len) = {
            let state = self.state();
            (state.bank.len(), state.training.len())
        };

        match JumpTarget::parse(input, bank_len, training_len) {
            Ok(JumpTarget::Training(id)) => self.go_to_training_question(id),
            Ok(JumpTarget::Bank(id)) => self.go_to_question(id, QuestionMode::Jump),
            Err(e) => {
                self.toasts.error(e.to_string());
                Err(e)
            }
        }
    }

    pub fn next_question(&self) -> Result<NavOutcome, NavigationError> {
        self.next_question_with(&mut rand::thread_rng())
    }

    pub fn next_question_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NavOutcome, NavigationError> {
        let mut state = self.state();
        let mode = state.mode;

        let target = match mode {
            QuestionMode::Practice => {
                let len = state.bank.len();
                if state.current.is_none() {
                    return Err(NavigationError::NoCurrentQuestion);
                }
                state.practice.next(len).and_then(|i| state.bank_id_at(i))
            }
            QuestionMode::Random => {
                let pool = state.bank_ids();
                match state.random.next(&pool, rng) {
                    RandomStep::Replayed(id) | RandomStep::Drawn(id) => Some(id),
                    RandomStep::Exhausted => {
                        drop(state);
                        self.toasts.info("所有题目都已练习过！");
                        return Ok(NavOutcome::NoMore);
                    }
                }
            }
            QuestionMode::Jump => {
                let current = state.current_id().ok_or(NavigationError::NoCurrentQuestion)?;
                nearest_above(state.bank_ids(), current)
            }
            QuestionMode::Training => {
                let current = state.current_id().ok_or(NavigationError::NoCurrentQuestion)?;
                match nearest_above(state.training_ids(), current) {
                    Some(id) => Some(id),
                    None => {
                        drop(state);
                        self.toasts.info("所有题目都已练习过！");
                        return Ok(NavOutcome::NoMore);
                    }
                }
            }
            QuestionMode::Wrong => {
                let current = state.current_id().ok_or(NavigationError::NoCurrentQuestion)?;
                match state.wrong.next(current) {
                    Some(id) => Some(id),
                    None => {
                        drop(state);
                        self.toasts.info("已经是最后一题了！");
                        return Ok(NavOutcome::NoMore);
                    }
                }
            }
        };
        drop(state);

        match target {
            Some(id) => self.open(id, mode),
            None => Ok(NavOutcome::NoMore),
        }
    }

    pub fn prev_question(&self) -> Result<NavOutcome, NavigationError> {
        let mut state = self.state();
        let mode = state.mode;
        let current = state.current_id().ok_or(NavigationError::NoCurrentQuestion)?;

        let target = match mode {
            QuestionMode::Practice => state.practice.prev().and_then(|i| state.bank_id_at(i)),
            QuestionMode::Random => state.random.prev(),
            QuestionMode::Jump => nearest_below(state.bank_ids(), current),
            QuestionMode::Training => nearest_below(state.training_ids(), current),
            QuestionMode::Wrong => state.wrong.prev(current),
        };
        drop(state);

        match target {
            Some(id) => self.open(id, mode),
            None => Ok(NavOutcome::Unchanged),
        }
    }

    pub fn has_prev(&self) -> bool {
        let state = self.state();
        let Some(current) = state.current_id() else {
            return false;
        };
        match state.mode {
            QuestionMode::Practice => state.practice.has_prev(),
            QuestionMode::Random => state.random.has_prev(),
            QuestionMode::Jump => nearest_below(state.bank_ids(), current).is_some(),
            QuestionMode::Training => nearest_below(state.training_ids(), current).is_some(),
            QuestionMode::Wrong => state.wrong.prev(current).is_some(),
        }
    }

    pub fn has_next(&self) -> bool {
        let state = self.state();
        let Some(current) = state.current_id() else {
            return false;
        };
        match state.mode {
            QuestionMode::Practice => state.practice.has_next(state.bank.len()),
            QuestionMode::Random => state.random.has_next(&state.bank_ids()),
            QuestionMode::Jump => nearest_above(state.bank_ids(), current).is_some(),
            QuestionMode::Training => nearest_above(state.training_ids(), current).is_some(),
            QuestionMode::Wrong => state.wrong.next(current).is_some(),
        }
    }

    /// 返回当前模式对应的列表页
    pub fn go_back(&self) -> View {
        let view = match self.mode() {
            QuestionMode::Practice => View::Practice,
            QuestionMode::Random | QuestionMode::Jump => View::QuickJump,
            QuestionMode::Training => View::Training,
            QuestionMode::Wrong => View::Wrong,
        };
        self.epoch.begin();
        self.router.go(view);
        view
    }

    fn open(&self, id: u32, mode: QuestionMode) -> Result<NavOutcome, NavigationError> {
        match mode {
            QuestionMode::Training => self.go_to_training_question(id),
            QuestionMode::Wrong => self.go_to_wrong_question(id),
            // 随机模式的历史已由 RandomWalk 更新，这里只切换题目
            QuestionMode::Random => {
                let mut state = self.state();
                let question = state
                    .bank
                    .iter()
                    .find(|q| q.id == id)
                    .cloned()
                    .ok_or(NavigationError::QuestionNotFound { id })?;
                state.show(question, QuestionMode::Random);
                drop(state);
                self.moved_to(id)
            }
            QuestionMode::Practice | QuestionMode::Jump => self.go_to_question(id, mode),
        }
    }

    fn moved_to(&self, id: u32) -> Result<NavOutcome, NavigationError> {
        self.epoch.begin();
        self.router.go(View::Question);
        debug!("➡️ 切换到题目 {}", id);
        Ok(NavOutcome::Moved(id))
    }

    // ========== 作答 ==========

    /// 选择选项；答案已显示时忽略
    ///
    /// # 返回
    /// 是否记录了选择
    pub fn select_option(&self, option: u8) -> bool {
        let mut state = self.state();
        if state.revealed || state.current.is_none() {
            return false;
        }
        state.selected = Some(option);
        true
    }

    /// 检查答案
    ///
    /// 未登录且不在培训模式时只显示答案，不记录；否则记录、判断对错，
    /// 提交到后端并同时加载单题统计。提交失败不影响答案显示。
    pub async fn check_answer(&self) -> AppResult<AnswerOutcome> {
        let logged_in = self.session.is_logged_in();

        let (question, selected, training) = {
            let state = self.state();
            let question = state
                .current
                .clone()
                .ok_or(NavigationError::NoCurrentQuestion)?;
            let Some(selected) = state.selected else {
                drop(state);
                self.toasts.error("请先选择一个答案");
                return Err(NavigationError::NoSelection.into());
            };
            (question, selected, state.mode.is_training())
        };

        let correct = question.is_correct(selected);
        let mut outcome = AnswerOutcome {
            question_id: question.id,
            selected_option: selected,
            correct_option: question.correct_option,
            correct,
            recorded: false,
            added_to_wrong_book: false,
            submission: SubmitStatus::Skipped,
        };

        if !logged_in && !training {
            self.state().revealed = true;
            self.toasts.error("请先登录以保存答题记录");
            return Ok(outcome);
        }

        let source = if training {
            AnswerSource::Training
        } else {
            AnswerSource::Normal
        };

        {
            let mut state = self.state();
            state.revealed = true;
            state.records.push(AnswerRecord {
                question_id: question.id,
                source,
                selected_option: selected,
                correct,
                answered_at: self.clock.now(),
            });
            if !correct && !training && logged_in && state.wrong.insert(question.id) {
                state.wrong_details.push(question.clone());
                outcome.added_to_wrong_book = true;
            }
        }
        outcome.recorded = true;

        let submission = AnswerSubmission {
            question_id: question.id,
            question_type: source,
            selected_option: selected,
            exam_id: None,
        };
        let submit = async {
            if !logged_in {
                return SubmitStatus::Skipped;
            }
            match self.api.answers.submit(&submission).await {
                Ok(_) => SubmitStatus::Accepted,
                Err(e) => {
                    warn!("提交答案失败: {}", e);
                    SubmitStatus::Failed(e.user_message())
                }
            }
        };
        let stats = self.load_question_stats(question.id);
        let (status, stats) = futures::join!(submit, stats);
        if let Err(e) = stats {
            debug!("加载题目统计失败: {}", e);
        }
        outcome.submission = status;

        info!(
            "✍️ 题目 {} 作答: 选 {} / 答案 {} ({})",
            question.id,
            selected,
            question.correct_option,
            if correct { "正确" } else { "错误" }
        );
        Ok(outcome)
    }

    // ========== 错题本 ==========

    /// 移出错题本：先改本地，再调接口
    ///
    /// # 返回
    /// 未登录时返回 `Ok(false)`，不做任何改动
    pub async fn remove_from_wrong_book(&self, question_id: u32) -> AppResult<bool> {
        if !self.session.is_logged_in() {
            return Ok(false);
        }
        {
            let mut state = self.state();
            state.wrong.remove(question_id);
            state.wrong_details.retain(|q| q.id != question_id);
        }
        self.api.answers.remove_wrong(question_id).await?;
        Ok(true)
    }

    /// 删除某一类型的全部错题，返回删除条数
    pub fn delete_wrong_category(&self, kind: u8) -> usize {
        let mut state = self.state();
        let removed: Vec<u32> = state
            .wrong_details
            .iter()
            .filter(|q| q.kind == kind)
            .map(|q| q.id)
            .collect();
        state.wrong_details.retain(|q| q.kind != kind);
        state.wrong.retain(|id| !removed.contains(id));
        removed.len()
    }

    pub fn clear_wrong_records(&self) {
        {
            let mut state = self.state();
            state.wrong.clear();
            state.wrong_details.clear();
        }
        self.toasts.success("已清除所有错题记录");
    }

    /// 错题平均难度，没有错题时为 0
    pub fn wrong_average_difficulty(&self) -> f64 {
        let state = self.state();
        if state.wrong_details.is_empty() {
            return 0.0;
        }
        let sum: u32 = state.wrong_details.iter().map(|q| u32::from(q.difficulty)).sum();
        f64::from(sum) / state.wrong_details.len() as f64
    }

    /// 错得最多的题型，没有错题时为 "无"
    pub fn most_wrong_type(&self) -> String {
        let state = self.state();
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for q in &state.wrong_details {
            let name = question::type_text(q.kind);
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, c)) => *c += 1,
                None => counts.push((name, 1)),
            }
        }

        let mut best: Option<(&'static str, usize)> = None;
        for (name, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((name, count));
            }
        }
        best.map_or_else(|| "无".to_string(), |(name, _)| name.to_string())
    }

    // ========== 浏览 ==========

    /// 按题型或难度分组（五组，可能为空）
    pub fn categories(&self, group_by: GroupBy) -> Vec<Category> {
        let state = self.state();
        group(&state.bank, group_by)
    }

    /// 错题按题型分组，只列出非空的分组
    pub fn wrong_categories(&self) -> Vec<Category> {
        let state = self.state();
        group(&state.wrong_details, GroupBy::Type)
            .into_iter()
            .filter(|c| !c.questions.is_empty())
            .collect()
    }

    /// 关键词搜索题库（题干、选项、关键词、解析，忽略大小写）
    pub fn search(&self, keyword: &str) -> Vec<Question> {
        let keyword = keyword.trim();
        let mut state = self.state();
        let results: Vec<Question> = if keyword.is_empty() {
            Vec::new()
        } else {
            state
                .bank
                .iter()
                .filter(|q| q.matches_keyword(keyword))
                .cloned()
                .collect()
        };
        state.search_results = results.clone();
        results
    }

    pub fn truncate_prompt(&self, prompt: &str) -> String {
        question::truncate_prompt(prompt)
    }

    // ========== 考试入口 ==========

    /// 进入考试页，需要登录
    pub fn start_exam(&self) -> Result<(), NavigationError> {
        if !self.session.is_logged_in() {
            self.toasts.error("请先登录以参加考试");
            self.router.go(View::Login);
            return Err(NavigationError::NotLoggedIn);
        }
        self.epoch.begin();
        self.router.go(View::Exam);
        Ok(())
    }
}

fn group(questions: &[Question], group_by: GroupBy) -> Vec<Category> {
    (1..=5u8)
        .map(|code| {
            let name = match group_by {
                GroupBy::Type => question::type_text(code),
                GroupBy::Difficulty => question::difficulty_text(code),
            };
            let questions = questions
                .iter()
                .filter(|q| match group_by {
                    GroupBy::Type => q.kind == code,
                    GroupBy::Difficulty => q.difficulty == code,
                })
                .cloned()
                .collect();
            Category {
                code,
                name: name.to_string(),
                questions,
            }
        })
        .collect()
}
