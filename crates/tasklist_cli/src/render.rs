use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_core::config::Palette;
use tasklist_core::controller::{StateObserver, TaskListState};
use tasklist_core::model::{DraftTask, Task};

pub const LOADING_MESSAGE: &str = "Loading tasks...";
pub const EMPTY_MESSAGE: &str = "No tasks yet. Add one with: add <title>";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn task_row(task: &Task, palette: &Palette) -> TaskRow {
    let description = task.description.clone().unwrap_or_default();
    if task.completed {
        TaskRow {
            id: palette.mutedize(&task.id.to_string()),
            done: palette.mutedize("[x]"),
            title: palette.mutedize(&task.title),
            description: palette.mutedize(&description),
        }
    } else {
        TaskRow {
            id: task.id.to_string(),
            done: "[ ]".to_string(),
            title: palette.accentize(&task.title),
            description,
        }
    }
}

/// Plain-text view of the whole list, the way the session redraws it.
pub fn render_state(state: &TaskListState, palette: &Palette) -> String {
    let mut out = format!("Tasks ({})\n", state.tasks.len());

    if state.loading {
        out.push_str(LOADING_MESSAGE);
        out.push('\n');
    } else if state.tasks.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        out.push('\n');
    } else {
        let rows: Vec<TaskRow> = state.tasks.iter().map(|task| task_row(task, palette)).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str(&table.to_string());
        out.push('\n');
    }

    if let Some(error) = state.error.as_deref() {
        out.push_str(&format!("! {error}\n"));
    }

    out
}

pub fn state_json(state: &TaskListState) -> serde_json::Value {
    serde_json::json!({
        "tasks": state.tasks,
        "loading": state.loading,
        "error": state.error,
    })
}

pub fn tasks_json(tasks: &[Task]) -> serde_json::Value {
    serde_json::json!(tasks)
}

pub fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!(task)
}

pub fn draft_line(draft: &DraftTask) -> String {
    let title = if draft.title.is_empty() {
        "(empty)"
    } else {
        draft.title.as_str()
    };
    if draft.description.is_empty() {
        format!("Draft: {title}")
    } else {
        format!("Draft: {title} - {}", draft.description)
    }
}

pub fn toggled_line(task: &Task) -> String {
    let verb = if task.completed { "Completed" } else { "Reopened" };
    format!("{verb} task: {} ({})", task.title, task.id)
}

/// Redraws the list whenever tasks, loading or error change.
pub struct ConsoleView {
    palette: Palette,
    json: bool,
    last: Option<TaskListState>,
}

impl ConsoleView {
    pub fn new(palette: Palette, json: bool) -> Self {
        Self {
            palette,
            json,
            last: None,
        }
    }

    fn changed(&self, state: &TaskListState) -> bool {
        match self.last.as_ref() {
            None => true,
            Some(last) => {
                last.tasks != state.tasks
                    || last.loading != state.loading
                    || last.error != state.error
            }
        }
    }
}

impl StateObserver for ConsoleView {
    fn state_changed(&mut self, state: &TaskListState) {
        if !self.changed(state) {
            return;
        }

        if self.json {
            println!("{}", state_json(state));
        } else {
            print!("{}", render_state(state, &self.palette));
        }
        self.last = Some(state.clone());
    }
}
