use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use shared::{ClockAndIdGenerator, Task, UpdateTaskRequest};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::SyncError;
use crate::persistence::PersistenceGateway;
use crate::remote::RemoteSource;

/// Owns the authoritative task list.
///
/// Mutations are serialized by a writer lock: the next list is built from the
/// latest one, published, then written through to persistence. The watch
/// channel is only locked for the swap, so readers never wait on storage.
/// Remote calls happen before the writer lock is taken, so concurrent callers
/// interleave and the last one to finish wins.
pub struct TaskService {
    persistence: PersistenceGateway,
    remote: Arc<dyn RemoteSource>,
    clock: Arc<dyn ClockAndIdGenerator>,
    tasks: watch::Sender<Vec<Task>>,
    writer: Mutex<()>,
}

impl TaskService {
    /// With `seed_from_storage_on_init` unset the stored list is ignored and the
    /// service starts from a fresh sample set held only in memory.
    pub fn new(
        persistence: PersistenceGateway,
        remote: Arc<dyn RemoteSource>,
        clock: Arc<dyn ClockAndIdGenerator>,
        seed_from_storage_on_init: bool,
    ) -> Self {
        let initial = if seed_from_storage_on_init {
            persistence.get_tasks()
        } else {
            Task::sample_tasks(clock.as_ref())
        };
        debug!("Task service starting with {} tasks", initial.len());

        let (tasks, _) = watch::channel(initial);
        Self {
            persistence,
            remote,
            clock,
            tasks,
            writer: Mutex::new(()),
        }
    }

    /// Receives the full list after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.subscribe()
    }

    pub fn current_tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>, SyncError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let tasks = self.persistence.get_tasks();
        info!("Loaded {} tasks from storage", tasks.len());
        self.tasks.send_replace(tasks.clone());
        Ok(tasks)
    }

    pub async fn fetch_tasks_from_remote(&self) -> Result<Vec<Task>, SyncError> {
        let fetched = self.remote.fetch_tasks().await.map_err(|e| {
            warn!("Remote fetch failed, keeping current tasks: {}", e);
            e
        })?;
        info!("Replacing task list with {} remote tasks", fetched.len());

        self.mutate(|tasks| {
            *tasks = fetched.clone();
            Some(())
        });
        Ok(fetched)
    }

    pub async fn add_task(&self, title: &str, description: &str) -> Result<Task, SyncError> {
        if title.trim().is_empty() {
            return Err(SyncError::EmptyTitle);
        }

        let task = Task::new(self.clock.as_ref(), title.to_string(), description.to_string());
        let created = self.remote.create_task(task).await?;
        debug!("Adding task {}", created.id);

        self.mutate(|tasks| {
            tasks.retain(|t| t.id != created.id);
            tasks.insert(0, created.clone());
            Some(())
        });
        Ok(created)
    }

    /// Replaces the task carrying the same id.
    pub fn update_task(&self, task: Task) -> Result<Task, SyncError> {
        let id = task.id;
        self.replace_task(id, move |_| task)
    }

    /// Applies the present fields of `update` to the current version of the task.
    pub fn patch_task(&self, id: Uuid, update: &UpdateTaskRequest) -> Result<Task, SyncError> {
        self.replace_task(id, |task| update.apply(task))
    }

    pub fn toggle_task_completion(&self, id: Uuid) -> Result<Task, SyncError> {
        self.replace_task(id, Task::toggled)
    }

    /// Removing an id that is not present still succeeds.
    pub fn delete_task(&self, id: Uuid) -> Result<(), SyncError> {
        self.mutate(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            debug!("Deleted {} task(s) with id {}", before - tasks.len(), id);
            Some(())
        });
        Ok(())
    }

    fn replace_task(
        &self,
        id: Uuid,
        replace: impl FnOnce(&Task) -> Task,
    ) -> Result<Task, SyncError> {
        self.mutate(|tasks| {
            let slot = tasks.iter_mut().find(|t| t.id == id)?;
            let replacement = replace(&*slot);
            *slot = replacement.clone();
            Some(replacement)
        })
        .ok_or(SyncError::TaskNotFound(id))
    }

    // `change` returning None leaves the list unpublished and unsaved.
    fn mutate<T>(&self, change: impl FnOnce(&mut Vec<Task>) -> Option<T>) -> Option<T> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = self.current_tasks();
        let outcome = change(&mut next)?;
        self.tasks.send_replace(next.clone());
        self.persistence.save_tasks(&next);
        Some(outcome)
    }
}
