//! Ordered task list.
//!
//! [`TaskList`] holds the list logic and never touches storage, so it can be
//! exercised directly. [`TaskStore`] wraps it and writes the list through
//! the persistence adapter after every operation that changed it.
//!
//! Operations on unknown ids are silent no-ops. They report `false` so the
//! caller can still tell that nothing happened.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::storage::{self, KeyValueStore, TASKS_KEY};

/// Fixed set of task categories.
///
/// Stored names outside the set are read back as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    #[default]
    Work,
    Personal,
    Urgent,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Urgent,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Urgent => "Urgent",
            Category::Other => "Other",
        }
    }

    /// Marker colour used when rendering the category.
    pub fn color(self) -> &'static str {
        match self {
            Category::Work => "#a18cd1",
            Category::Personal => "#fbc2eb",
            Category::Urgent => "#ff4b4b",
            Category::Other => "#00d2ff",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{s}' (expected work, personal, urgent or other)"))
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Category::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: Category,
}

/// Newest-first list of tasks with unique, time-derived ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    /// Highest numeric id issued or loaded so far.
    last_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing list, e.g. one read back from storage.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let last_id = tasks
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { tasks, last_id }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|t| t.completed)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Id derived from `now_ms`, bumped past the last issued id when the
    /// clock has not moved forward.
    ///
    /// Once the bump overflows (a stored id at `u64::MAX`), the lowest free
    /// id from `now_ms` upward is used instead.
    fn next_id(&mut self, now_ms: u64) -> String {
        if now_ms > self.last_id {
            self.last_id = now_ms;
            return now_ms.to_string();
        }
        if let Some(id) = self.last_id.checked_add(1) {
            self.last_id = id;
            return id.to_string();
        }
        let mut id = now_ms;
        while self.get(&id.to_string()).is_some() {
            id = id.wrapping_add(1);
        }
        id.to_string()
    }

    /// Prepend a new task created at `now_ms`. Blank text is ignored.
    pub fn add(&mut self, text: &str, category: Category, now_ms: u64) -> Option<&Task> {
        if text.trim().is_empty() {
            return None;
        }
        let task = Task {
            id: self.next_id(now_ms),
            text: text.to_string(),
            completed: false,
            category,
        };
        self.tasks.insert(0, task);
        self.tasks.first()
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every completed task, keeping the order of the rest.
    pub fn clear_completed(&mut self) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        self.tasks.len() != before
    }

    /// Move `source` to the index currently held by `target`, shifting the
    /// tasks in between by one.
    pub fn reorder(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(source), self.position(target)) else {
            return false;
        };
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        true
    }
}

/// Persisted task list.
pub struct TaskStore {
    store: Arc<dyn KeyValueStore>,
    list: TaskList,
}

impl TaskStore {
    /// Load the list from `store`; a missing or malformed record is empty.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let tasks: Vec<Task> = storage::load(store.as_ref(), TASKS_KEY, Vec::new());
        Self {
            store,
            list: TaskList::from_tasks(tasks),
        }
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    /// Add a task stamped with the current time. Returns the new task's id.
    pub fn add_task(&mut self, text: &str, category: Category) -> Option<String> {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = self.list.add(text, category, now_ms).map(|t| t.id.clone());
        match &id {
            Some(id) => {
                tracing::debug!(id, %category, "task added");
                self.persist();
            }
            None => tracing::debug!("ignoring blank task text"),
        }
        id
    }

    pub fn toggle_task(&mut self, id: &str) -> bool {
        let changed = self.list.toggle(id);
        self.committed("toggle", id, changed);
        changed
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let changed = self.list.delete(id);
        self.committed("delete", id, changed);
        changed
    }

    pub fn clear_completed(&mut self) -> bool {
        let changed = self.list.clear_completed();
        if changed {
            tracing::debug!(remaining = self.list.len(), "completed tasks cleared");
            self.persist();
        }
        changed
    }

    /// Sink for drag-reorder gestures.
    pub fn reorder(&mut self, source: &str, target: &str) -> bool {
        let changed = self.list.reorder(source, target);
        if changed {
            tracing::debug!(source, target, "task moved");
            self.persist();
        } else {
            tracing::debug!(source, target, "reorder ignored");
        }
        changed
    }

    fn committed(&self, op: &str, id: &str, changed: bool) {
        if changed {
            tracing::debug!(op, id, "task updated");
            self.persist();
        } else {
            tracing::debug!(op, id, "no task with this id");
        }
    }

    fn persist(&self) {
        storage::save(self.store.as_ref(), TASKS_KEY, self.list.tasks());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {id}"),
            completed,
            category: Category::Work,
        }
    }

    fn ids(list: &TaskList) -> Vec<&str> {
        list.tasks().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn add_prepends_newest_first() {
        let mut list = TaskList::new();
        list.add("first", Category::Work, 1000);
        list.add("second", Category::Urgent, 2000);
        assert_eq!(ids(&list), vec!["2000", "1000"]);
        assert_eq!(list.tasks()[0].text, "second");
        assert_eq!(list.tasks()[0].category, Category::Urgent);
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn stored_max_id_does_not_overflow() {
        let mut list = TaskList::from_tasks(vec![task(&u64::MAX.to_string(), false)]);
        let first = list.add("a", Category::Work, 5).map(|t| t.id.clone()).unwrap();
        let second = list.add("b", Category::Work, 5).map(|t| t.id.clone()).unwrap();
        assert_eq!(first, "5");
        assert_eq!(second, "6");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn exhausted_ids_skip_those_in_use() {
        let mut list = TaskList::from_tasks(vec![task(&u64::MAX.to_string(), false), task("7", false)]);
        let id = list.add("a", Category::Work, 7).map(|t| t.id.clone()).unwrap();
        assert_eq!(id, "8");
    }

    #[test]
    fn add_ignores_blank_text() {
        let mut list = TaskList::new();
        assert!(list.add("", Category::Work, 1).is_none());
        assert!(list.add("   ", Category::Work, 2).is_none());
        assert!(list.add("\t\n", Category::Work, 3).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn add_keeps_text_as_entered() {
        let mut list = TaskList::new();
        list.add("  padded  ", Category::Other, 5);
        assert_eq!(list.tasks()[0].text, "  padded  ");
    }

    #[test]
    fn same_millisecond_ids_stay_unique() {
        let mut list = TaskList::new();
        list.add("a", Category::Work, 500);
        list.add("b", Category::Work, 500);
        list.add("c", Category::Work, 499);
        assert_eq!(ids(&list), vec!["502", "501", "500"]);
    }

    #[test]
    fn loaded_ids_seed_the_generator() {
        let mut list = TaskList::from_tasks(vec![task("9000", false), task("legacy", false)]);
        list.add("new", Category::Work, 10);
        assert_eq!(list.tasks()[0].id, "9001");
    }

    #[test]
    fn toggle_twice_restores() {
        let mut list = TaskList::from_tasks(vec![task("1", false)]);
        assert!(list.toggle("1"));
        assert!(list.get("1").unwrap().completed);
        assert!(list.toggle("1"));
        assert!(!list.get("1").unwrap().completed);
        assert!(!list.toggle("nope"));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut list = TaskList::from_tasks(vec![task("1", false), task("2", false)]);
        assert!(list.delete("1"));
        assert!(!list.delete("1"));
        assert_eq!(ids(&list), vec!["2"]);
    }

    #[test]
    fn clear_completed_keeps_survivors_in_order() {
        let mut list = TaskList::from_tasks(vec![task("1", true), task("2", false), task("3", true)]);
        assert!(list.clear_completed());
        assert_eq!(list.tasks(), &[task("2", false)]);
        assert!(!list.clear_completed());
    }

    #[test]
    fn reorder_moves_not_swaps() {
        let mut list = TaskList::from_tasks(vec![task("a", false), task("b", false), task("c", false), task("d", false)]);
        assert!(list.reorder("a", "c"));
        assert_eq!(ids(&list), vec!["b", "c", "a", "d"]);
        assert!(list.reorder("d", "b"));
        assert_eq!(ids(&list), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn degenerate_reorders_are_noops() {
        let mut list = TaskList::from_tasks(vec![task("a", false), task("b", false)]);
        assert!(!list.reorder("a", "a"));
        assert!(!list.reorder("a", "zzz"));
        assert!(!list.reorder("zzz", "a"));
        assert_eq!(ids(&list), vec!["a", "b"]);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("urgent".parse::<Category>().unwrap(), Category::Urgent);
        assert_eq!("Personal".parse::<Category>().unwrap(), Category::Personal);
        assert!("chores".parse::<Category>().is_err());
    }

    #[test]
    fn unknown_stored_category_reads_as_other() {
        let json = r#"[{"id":"1","text":"x","completed":false,"category":"Chores"}]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].category, Category::Other);
    }

    #[test]
    fn task_serializes_with_stored_field_names() {
        let json = serde_json::to_value(task("7", true)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "7", "text": "task 7", "completed": true, "category": "Work"})
        );
    }

    #[test]
    fn store_persists_after_each_change() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = TaskStore::load(backend.clone());
        let id = store.add_task("Write report", Category::Work).unwrap();
        store.toggle_task(&id);

        let reloaded = TaskStore::load(backend);
        assert_eq!(reloaded.tasks().len(), 1);
        assert!(reloaded.tasks()[0].completed);
        assert_eq!(reloaded.tasks()[0].id, id);
    }

    #[test]
    fn store_skips_write_on_noop() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = TaskStore::load(backend.clone());
        assert!(!store.delete_task("missing"));
        assert!(store.add_task("   ", Category::Work).is_none());
        assert!(backend.get(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn malformed_record_loads_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(TASKS_KEY, "{\"not\": \"a list\"}").unwrap();
        assert!(TaskStore::load(backend).tasks().is_empty());
    }

    proptest! {
        #[test]
        fn adds_count_and_newest_first(texts in prop::collection::vec("[a-z]{1,8}", 1..20)) {
            let mut list = TaskList::new();
            for (i, text) in texts.iter().enumerate() {
                list.add(text, Category::Work, 1000 + i as u64);
            }
            prop_assert_eq!(list.len(), texts.len());
            prop_assert_eq!(&list.tasks()[0].text, texts.last().unwrap());
        }

        #[test]
        fn clear_completed_removes_exactly_completed(flags in prop::collection::vec(any::<bool>(), 0..30)) {
            let tasks: Vec<Task> = flags
                .iter()
                .enumerate()
                .map(|(i, &done)| task(&i.to_string(), done))
                .collect();
            let expected: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
            let mut list = TaskList::from_tasks(tasks);
            list.clear_completed();
            prop_assert_eq!(list.tasks(), expected.as_slice());
        }

        #[test]
        fn reorder_is_a_permutation(len in 2usize..15, a in 0usize..15, b in 0usize..15) {
            let tasks: Vec<Task> = (0..len).map(|i| task(&i.to_string(), false)).collect();
            let mut list = TaskList::from_tasks(tasks);
            let (from, to) = (a % len, b % len);
            let moved = list.reorder(&from.to_string(), &to.to_string());
            prop_assert_eq!(moved, from != to);
            if moved {
                prop_assert_eq!(&list.tasks()[to].id, &from.to_string());
            }
            let mut seen: Vec<usize> = list.tasks().iter().map(|t| t.id.parse().unwrap()).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());
        }
    }
}
