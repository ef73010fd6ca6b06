use std::collections::BTreeSet;

/// 错题本：有序、不重复的题目 ID
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrongBook {
    ids: BTreeSet<u32>,
}

impl WrongBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入错题，已存在时不变；返回是否新加入
    pub fn insert(&mut self, id: u32) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: u32) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> Vec<u32> {
        self.ids.iter().copied().collect()
    }

    pub fn first(&self) -> Option<u32> {
        self.ids.iter().next().copied()
    }

    /// 只保留满足条件的 ID
    pub fn retain(&mut self, keep: impl FnMut(&u32) -> bool) {
        self.ids.retain(keep);
    }

    pub fn prev(&self, current: u32) -> Option<u32> {
        if !self.contains(current) {
            return None;
        }
        self.ids.range(..current).next_back().copied()
    }

    pub fn next(&self, current: u32) -> Option<u32> {
        if !self.contains(current) {
            return None;
        }
        let start = current.checked_add(1)?;
        self.ids.range(start..).next().copied()
    }
}

impl FromIterator<u32> for WrongBook {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_is_idempotent() {
        let mut book = WrongBook::new();
        assert!(book.insert(7));
        assert!(!book.insert(7));
        assert_eq!(book.ids(), vec![7]);
    }

    #[test]
    fn neighbours_follow_sorted_order() {
        let book: WrongBook = [9, 3, 15, 3].into_iter().collect();
        assert_eq!(book.ids(), vec![3, 9, 15]);
        assert_eq!(book.next(3), Some(9));
        assert_eq!(book.prev(9), Some(3));
        assert_eq!(book.prev(3), None);
        assert_eq!(book.next(15), None);
        assert_eq!(book.next(4), None);
    }
}
