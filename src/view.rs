use crate::collate::TitleCollator;
use crate::models::{FilterMode, Task};

/// Computes the visible tasks: status filter, then title search, then sort.
///
/// `filter` drives both steps: `Completed`/`Incomplete` narrow the list, `Alphabetical`
/// orders it by title, and every other mode keeps the incoming order. The search is a
/// case-insensitive substring match on the title; an empty query matches everything.
///
/// Returns references into `tasks`, which is never modified.
pub fn derive<'a>(tasks: &'a [Task], filter: &FilterMode, query: &str) -> Vec<&'a Task> {
    let needle = query.to_lowercase();
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| matches_status(task, filter))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .collect();

    if *filter == FilterMode::Alphabetical {
        let collator = TitleCollator::new();
        visible.sort_by(|a, b| collator.compare(&a.title, &b.title));
    }
    visible
}

fn matches_status(task: &Task, filter: &FilterMode) -> bool {
    match filter {
        FilterMode::Completed => task.completed,
        FilterMode::Incomplete => !task.completed,
        _ => true,
    }
}
