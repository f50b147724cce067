/// Tasks waiting for the game clock to reach their due time.
///
/// Polled from the owner's update step; nothing runs on its own.
#[derive(Debug, Clone)]
pub struct DeferredTasks<T> {
    entries: Vec<(f64, T)>,
}

impl<T> Default for DeferredTasks<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> DeferredTasks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: f64, task: T) {
        self.entries.push((due, task));
    }

    /// Remove and return every task due at `now`, earliest first.
    pub fn take_due(&mut self, now: f64) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].0 <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, task)| task).collect()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.entries.iter().map(|(t, _)| *t).min_by(|a, b| a.total_cmp(b))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_once_when_due() {
        let mut tasks = DeferredTasks::new();
        tasks.schedule(2.0, "b");
        tasks.schedule(1.0, "a");
        tasks.schedule(5.0, "c");
        assert!(tasks.take_due(0.5).is_empty());
        assert_eq!(tasks.next_due(), Some(1.0));
        assert_eq!(tasks.take_due(2.0), vec!["a", "b"]);
        assert!(tasks.take_due(2.0).is_empty());
        assert_eq!(tasks.next_due(), Some(5.0));
        assert_eq!(tasks.take_due(10.0), vec!["c"]);
        assert!(tasks.is_empty());
    }
}
