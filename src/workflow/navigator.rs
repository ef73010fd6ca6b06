//! 题目导航
//!
//! 五种浏览模式各自维护"当前位置"：
//! - 顺序练习：题库下标
//! - 随机练习：只追加的已访问历史 + 游标
//! - 跳题：按输入的题号直接定位（`G` 前缀表示培训题）
//! - 入职培训 / 错题本：按 ID 找相邻的上一题、下一题（ID 可以不连续）

use crate::error::NavigationError;
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionMode {
    #[default]
    Practice,
    Random,
    Jump,
    Training,
    Wrong,
}

impl QuestionMode {
    pub fn is_training(self) -> bool {
        self == QuestionMode::Training
    }
}

/// 顺序练习游标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PracticeCursor {
    index: usize,
}

impl PracticeCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set(&mut self, index: usize) {
        self.index = index;
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.index + 1 < len
    }

    pub fn prev(&mut self) -> Option<usize> {
        if !self.has_prev() {
            return None;
        }
        self.index -= 1;
        Some(self.index)
    }

    pub fn next(&mut self, len: usize) -> Option<usize> {
        if !self.has_next(len) {
            return None;
        }
        self.index += 1;
        Some(self.index)
    }
}

/// 随机练习的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomStep {
    /// 沿历史向前重放
    Replayed(u32),
    /// 从未访问的题目中新抽取
    Drawn(u32),
    /// 全部题目都已访问过
    Exhausted,
}

/// 随机练习
///
/// 历史只追加不删除；全部题目访问一遍之前不会重复出题。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RandomWalk {
    history: Vec<u32>,
    cursor: usize,
}

impl RandomWalk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[u32] {
        &self.history
    }

    pub fn current(&self) -> Option<u32> {
        self.history.get(self.cursor).copied()
    }

    /// 直接访问某题（追加到历史末尾）
    pub fn visit(&mut self, id: u32) {
        self.history.push(id);
        self.cursor = self.history.len() - 1;
    }

    pub fn has_prev(&self) -> bool {
        self.cursor > 0 && !self.history.is_empty()
    }

    /// 还能前进：历史里有后续，或还有未访问的题
    pub fn has_next(&self, pool: &[u32]) -> bool {
        if self.cursor + 1 < self.history.len() {
            return true;
        }
        let visited: HashSet<u32> = self.history.iter().copied().collect();
        pool.iter().any(|id| !visited.contains(id))
    }

    pub fn prev(&mut self) -> Option<u32> {
        if !self.has_prev() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    pub fn next<R: Rng + ?Sized>(&mut self, pool: &[u32], rng: &mut R) -> RandomStep {
        if self.cursor + 1 < self.history.len() {
            self.cursor += 1;
            return RandomStep::Replayed(self.history[self.cursor]);
        }

        let visited: HashSet<u32> = self.history.iter().copied().collect();
        let available: Vec<u32> = pool
            .iter()
            .copied()
            .filter(|id| !visited.contains(id))
            .collect();

        if available.is_empty() {
            return RandomStep::Exhausted;
        }

        let id = available[rng.gen_range(0..available.len())];
        self.visit(id);
        RandomStep::Drawn(id)
    }
}

/// `ids` 中小于 `current` 的最大 ID
pub fn nearest_below(ids: impl IntoIterator<Item = u32>, current: u32) -> Option<u32> {
    ids.into_iter().filter(|id| *id < current).max()
}

/// `ids` 中大于 `current` 的最小 ID
pub fn nearest_above(ids: impl IntoIterator<Item = u32>, current: u32) -> Option<u32> {
    ids.into_iter().filter(|id| *id > current).min()
}

/// 跳题目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Bank(u32),
    Training(u32),
}

impl JumpTarget {
    /// 解析跳题输入
    ///
    /// # 参数
    /// - `input`: 用户输入，`G5` / `g5` 表示培训题 5，`12` 表示题库题 12
    /// - `bank_len`: 题库题数
    /// - `training_len`: 培训题数
    ///
    /// # 返回
    /// 越界或无法解析时返回对应的校验错误
    pub fn parse(input: &str, bank_len: usize, training_len: usize) -> Result<Self, NavigationError> {
        let input = input.trim();

        if let Some(rest) = input.strip_prefix('G').or_else(|| input.strip_prefix('g')) {
            return match parse_leading_int(rest) {
                Some(id) if id >= 1 && id as usize <= training_len => Ok(JumpTarget::Training(id)),
                _ => Err(NavigationError::TrainingJumpOutOfRange { max: training_len }),
            };
        }

        match parse_leading_int(input) {
            Some(id) if id >= 1 && id as usize <= bank_len => Ok(JumpTarget::Bank(id)),
            _ => Err(NavigationError::JumpOutOfRange { max: bank_len }),
        }
    }
}

// 只取开头的数字部分，"12abc" 视为 12
fn parse_leading_int(s: &str) -> Option<u32> {
    let digits: String = s.trim_start().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn practice_cursor_is_bounds_checked() {
        let mut cursor = PracticeCursor::default();
        assert_eq!(cursor.prev(), None);
        assert_eq!(cursor.next(3), Some(1));
        assert_eq!(cursor.next(3), Some(2));
        assert_eq!(cursor.next(3), None);
        assert_eq!(cursor.prev(), Some(1));
    }

    #[test]
    fn random_walk_never_repeats_before_exhaustion() {
        let pool: Vec<u32> = (1..=25).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut walk = RandomWalk::new();
        let mut seen = HashSet::new();

        for _ in 0..25 {
            match walk.next(&pool, &mut rng) {
                RandomStep::Drawn(id) => assert!(seen.insert(id), "repeated {}", id),
                other => panic!("unexpected step {:?}", other),
            }
        }
        assert_eq!(seen.len(), 25);
        assert!(!walk.has_next(&pool));
        assert_eq!(walk.next(&pool, &mut rng), RandomStep::Exhausted);
    }

    #[test]
    fn random_walk_replays_history_before_drawing() {
        let pool = [10, 20, 30];
        let mut rng = StdRng::seed_from_u64(1);
        let mut walk = RandomWalk::new();
        walk.visit(10);
        let second = match walk.next(&pool, &mut rng) {
            RandomStep::Drawn(id) => id,
            other => panic!("unexpected step {:?}", other),
        };

        assert_eq!(walk.prev(), Some(10));
        assert_eq!(walk.prev(), None);
        assert_eq!(walk.next(&pool, &mut rng), RandomStep::Replayed(second));
        assert!(matches!(walk.next(&pool, &mut rng), RandomStep::Drawn(_)));
        assert_eq!(walk.history().len(), 3);
    }

    #[test]
    fn sparse_neighbours() {
        let ids = [1, 4, 9, 12];
        assert_eq!(nearest_below(ids, 9), Some(4));
        assert_eq!(nearest_above(ids, 9), Some(12));
        assert_eq!(nearest_above(ids, 10), Some(12));
        assert_eq!(nearest_below(ids, 1), None);
        assert_eq!(nearest_above(ids, 12), None);
    }

    #[test]
    fn jump_parsing() {
        assert_eq!(JumpTarget::parse("G5", 25, 10), Ok(JumpTarget::Training(5)));
        assert_eq!(JumpTarget::parse(" g10 ", 25, 10), Ok(JumpTarget::Training(10)));
        assert_eq!(
            JumpTarget::parse("G15", 25, 10),
            Err(NavigationError::TrainingJumpOutOfRange { max: 10 })
        );
        assert_eq!(JumpTarget::parse("7", 25, 10), Ok(JumpTarget::Bank(7)));
        assert_eq!(
            JumpTarget::parse("0", 25, 10),
            Err(NavigationError::JumpOutOfRange { max: 25 })
        );
        assert_eq!(
            JumpTarget::parse("abc", 25, 10),
            Err(NavigationError::JumpOutOfRange { max: 25 })
        );
        assert_eq!(
            JumpTarget::parse("G15", 25, 10).unwrap_err().to_string(),
            "请输入有效的入职培训题目ID（G1-G10）"
        );
    }
}
