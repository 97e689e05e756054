use super::{Intent, TaskList};
use crate::domain::{TaskFilter, TaskId};

/// One visible task, with the intents its controls fire.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl TaskRow {
    pub fn checkbox(&self) -> &'static str {
        if self.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }

    pub fn toggle(&self) -> Intent {
        Intent::SetCompleted {
            id: self.id.clone(),
            completed: !self.completed,
        }
    }

    pub fn edit(&self, text: impl Into<String>) -> Intent {
        Intent::Edit {
            id: self.id.clone(),
            text: text.into(),
        }
    }

    pub fn delete(&self) -> Intent {
        Intent::Delete { id: self.id.clone() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterTab {
    pub filter: TaskFilter,
    pub active: bool,
}

impl FilterTab {
    pub fn label(&self) -> &'static str {
        self.filter.label()
    }

    pub fn select(&self) -> Intent {
        Intent::SetFilter(self.filter)
    }
}

/// Snapshot of everything the list surface shows.
///
/// Rebuilt from scratch after every change; holds no state of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub rows: Vec<TaskRow>,
    pub filters: Vec<FilterTab>,
    pub remaining: usize,
    pub total: usize,
    /// `None` when nothing is completed, so clearing is a no-op.
    pub clear_completed: Option<Intent>,
}

impl ListView {
    pub fn project(list: &TaskList) -> Self {
        let rows = list
            .visible()
            .into_iter()
            .map(|task| TaskRow {
                id: task.id.clone(),
                text: task.text.clone(),
                completed: task.completed,
            })
            .collect();

        let filters = TaskFilter::ALL
            .iter()
            .map(|&filter| FilterTab {
                filter,
                active: filter == list.filter(),
            })
            .collect();

        let completed = list.completed_ids();
        let clear_completed = if completed.is_empty() {
            None
        } else {
            Some(Intent::ClearCompleted { ids: completed })
        };

        Self {
            rows,
            filters,
            remaining: list.count_remaining(),
            total: list.len(),
            clear_completed,
        }
    }

    pub fn active_filter(&self) -> TaskFilter {
        self.filters
            .iter()
            .find(|tab| tab.active)
            .map(|tab| tab.filter)
            .unwrap_or_default()
    }

    pub fn remaining_label(&self) -> String {
        match self.remaining {
            1 => "1 item left".to_string(),
            n => format!("{n} items left"),
        }
    }

    pub fn empty_message(&self) -> &'static str {
        if self.total == 0 {
            return "Nothing to do yet. Press 'a' to add a task";
        }
        match self.active_filter() {
            TaskFilter::All => "No tasks",
            TaskFilter::Active => "All done!",
            TaskFilter::Completed => "Nothing completed yet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    fn list() -> TaskList {
        TaskList::with_tasks(vec![
            Task::new("1", "a", false),
            Task::new("2", "b", true),
            Task::new("3", "c", true),
        ])
    }

    #[test]
    fn test_rows_follow_filter_and_exactly_one_tab_is_active() {
        let mut list = list();
        for filter in TaskFilter::ALL {
            list.set_filter(filter);
            let view = ListView::project(&list);

            let expected: Vec<_> = list.visible().iter().map(|t| t.id.clone()).collect();
            let shown: Vec<_> = view.rows.iter().map(|r| r.id.clone()).collect();
            assert_eq!(shown, expected);

            assert_eq!(view.filters.iter().filter(|t| t.active).count(), 1);
            assert_eq!(view.active_filter(), filter);
            assert_eq!(view.remaining, 1);
        }
    }

    #[test]
    fn test_row_intents_carry_bound_values() {
        let view = ListView::project(&list());
        let row = &view.rows[1];

        assert_eq!(
            row.toggle(),
            Intent::SetCompleted { id: "2".into(), completed: false }
        );
        assert_eq!(row.edit("  x "), Intent::Edit { id: "2".into(), text: "  x ".into() });
        assert_eq!(row.delete(), Intent::Delete { id: "2".into() });
        assert_eq!(view.filters[2].select(), Intent::SetFilter(TaskFilter::Completed));
    }

    #[test]
    fn test_clear_completed_lists_ids_in_discovery_order() {
        let view = ListView::project(&list());
        assert_eq!(
            view.clear_completed,
            Some(Intent::ClearCompleted { ids: vec!["2".into(), "3".into()] })
        );

        let view = ListView::project(&TaskList::with_tasks(vec![Task::new("1", "a", false)]));
        assert_eq!(view.clear_completed, None);
    }

    #[test]
    fn test_remaining_label() {
        let mut list = list();
        assert_eq!(ListView::project(&list).remaining_label(), "1 item left");

        list.prepend(Task::new("4", "d", false));
        assert_eq!(ListView::project(&list).remaining_label(), "2 items left");

        assert_eq!(ListView::project(&TaskList::new()).remaining_label(), "0 items left");
    }
}
