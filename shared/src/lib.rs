use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod clock;
mod user;

pub use clock::{ClockAndIdGenerator, SystemClock};
pub use user::{is_valid_email, is_valid_username, LoginRequest, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl Task {
    pub fn new(clock: &dyn ClockAndIdGenerator, title: String, description: String) -> Self {
        Self {
            id: clock.new_id(),
            title,
            description,
            is_completed: false,
            created_at: clock.now(),
        }
    }

    /// Copy of this task with the completion flag flipped; every other field is kept.
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }

    /// The four seed tasks shown when nothing has been stored yet.
    pub fn sample_tasks(clock: &dyn ClockAndIdGenerator) -> Vec<Task> {
        [
            ("Learn Rust", "Get comfortable with ownership and the borrow checker"),
            ("Build the shared logic", "Write the API client and the data models"),
            ("Integrate with the app", "Wire the shared library into the mobile client"),
            ("Test on every platform", "Make sure the code behaves the same everywhere"),
        ]
        .into_iter()
        .map(|(title, description)| Task::new(clock, title.to_string(), description.to_string()))
        .collect()
    }
}

impl UpdateTaskRequest {
    /// Applies the fields that are present, leaving identity and creation time untouched.
    pub fn apply(&self, task: &Task) -> Task {
        let mut updated = task.clone();
        if let Some(title) = &self.title {
            updated.title = title.clone();
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(completed) = self.completed {
            updated.is_completed = completed;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_only_flips_completion() {
        let task = Task::new(&SystemClock, "Write docs".into(), "for the store".into());
        let toggled = task.toggled();

        assert!(toggled.is_completed);
        assert_eq!(toggled.id, task.id);
        assert_eq!(toggled.title, task.title);
        assert_eq!(toggled.description, task.description);
        assert_eq!(toggled.created_at, task.created_at);
        assert_eq!(toggled.toggled(), task);
    }

    #[test]
    fn sample_tasks_have_distinct_ids() {
        let samples = Task::sample_tasks(&SystemClock);
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|t| !t.is_completed && !t.title.is_empty()));

        let mut ids: Vec<_> = samples.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn update_request_keeps_missing_fields() {
        let task = Task::new(&SystemClock, "Old".into(), "desc".into());
        let request = UpdateTaskRequest {
            title: Some("New".into()),
            ..Default::default()
        };

        let updated = request.apply(&task);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description, "desc");
        assert!(!updated.is_completed);
        assert_eq!(updated.id, task.id);
    }

    #[test]
    fn task_uses_camel_case_fields() {
        let task = Task::new(&SystemClock, "A".into(), "B".into());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["isCompleted"], false);
        assert!(json.get("createdAt").is_some());
    }
}
