pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod service;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{DraftTask, Task, TaskId};

    #[test]
    fn task_decodes_numeric_and_text_ids() {
        let numeric: Task = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "A",
            "description": "first",
            "completed": false
        }))
        .unwrap();
        assert_eq!(numeric.id, TaskId::from(1));
        assert_eq!(numeric.description.as_deref(), Some("first"));

        let text: Task = serde_json::from_value(serde_json::json!({
            "id": "task-9",
            "title": "B",
            "completed": true
        }))
        .unwrap();
        assert_eq!(text.id, TaskId::Text("task-9".into()));
        assert_eq!(text.description, None);
        assert!(text.completed);
    }

    #[test]
    fn task_list_decodes_fractional_and_unsigned_ids() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[
                { "id": 1.5, "title": "half" },
                { "id": 18446744073709551615, "title": "big" },
                { "id": 2, "title": "plain" }
            ]"#,
        )
        .unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].id.to_string(), "1.5");
        assert_eq!(tasks[1].id.to_string(), "18446744073709551615");
        assert!(tasks[1].id.matches("18446744073709551615"));
        assert_eq!(tasks[2].id, TaskId::from(2));

        let encoded = serde_json::to_string(&tasks[1].id).unwrap();
        assert_eq!(encoded, "18446744073709551615");
    }

    #[test]
    fn task_encodes_id_in_original_form() {
        let task = Task {
            id: TaskId::from(3),
            title: "A".into(),
            description: None,
            completed: false,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["completed"], false);
    }

    #[test]
    fn task_missing_completed_defaults_to_false() {
        let task: Task =
            serde_json::from_value(serde_json::json!({ "id": 1, "title": "A" })).unwrap();
        assert!(!task.completed);
    }

    #[test]
    fn draft_serializes_title_and_description() {
        let draft = DraftTask::new("Buy milk", "");
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({ "title": "Buy milk", "description": "" })
        );
        assert!(draft.has_title());
        assert!(!DraftTask::new(" \t", "x").has_title());
    }

    #[test]
    fn task_id_parse_prefers_numbers() {
        assert_eq!(TaskId::parse(" 12 "), Some(TaskId::from(12)));
        assert_eq!(TaskId::parse("abc"), Some(TaskId::Text("abc".into())));
        assert_eq!(TaskId::parse("  "), None);
        assert_eq!(TaskId::parse("1.5").map(|id| id.to_string()).as_deref(), Some("1.5"));
        assert!(matches!(TaskId::parse("1.5"), Some(TaskId::Number(_))));
        assert_eq!(TaskId::parse("1e3"), Some(TaskId::Text("1e3".into())));
        assert!(TaskId::Text("12".into()).matches("12"));
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing title");
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.to_string(), "invalid_input - missing title");
        assert!(!err.is_remote());
        assert!(AppError::transport("refused").is_remote());
    }
}
