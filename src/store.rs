//! The task store: sole owner of the task collection and the edit pointer.
//!
//! Every create, update and delete goes through `TaskStore`, which validates the
//! input, keeps dependency references intact, appends to the history log and writes
//! the collection back through its persistence gateway. A failed write is logged and
//! kept as a warning; the in-memory collection stays authoritative.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PersistenceError, StoreError, ValidationError};
use crate::gateway::PersistenceGateway;
use crate::history::{EventKind, HistoryEvent};
use crate::task::{Task, TaskFields, ValidFields};

/// Storage key of the task collection.
pub const TASKS_KEY: &str = "tasks";
/// Storage key of the history log.
pub const HISTORY_KEY: &str = "task_history";

/// Which task, if any, is loaded into the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(String),
}

/// One entry of the dependency selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOption {
    pub value: String,
    pub label: String,
}

impl DependencyOption {
    pub fn none() -> Self {
        DependencyOption {
            value: String::new(),
            label: "None".to_string(),
        }
    }
}

/// Result of `TaskStore::delete_cascade`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeDelete {
    pub removed: Task,
    /// Ids of tasks whose dependency was cleared.
    pub cleared: Vec<String>,
}

/// Millisecond-timestamp ids that never repeat within a process.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn seeded(tasks: &[Task]) -> Self {
        let last = tasks
            .iter()
            .filter_map(|t| t.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        IdGenerator { last }
    }

    /// Past `i64::MAX` this falls back to the clock; callers skip ids already taken.
    fn next(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = match self.last.checked_add(1) {
            Some(after) => now.max(after),
            None => now,
        };
        self.last
    }
}

/// Owns the task collection, the edit pointer and the history log.
pub struct TaskStore<G: PersistenceGateway> {
    gateway: G,
    tasks: Vec<Task>,
    history: Vec<HistoryEvent>,
    edit: EditState,
    ids: IdGenerator,
    persist_warning: Option<PersistenceError>,
}

impl<G: PersistenceGateway> TaskStore<G> {
    /// Load the collection and history from `gateway`; absent keys start empty.
    pub fn open(gateway: G) -> Result<Self, PersistenceError> {
        let tasks: Vec<Task> = load_json(&gateway, TASKS_KEY)?;
        let history: Vec<HistoryEvent> = load_json(&gateway, HISTORY_KEY)?;
        tracing::info!(tasks = tasks.len(), events = history.len(), "task store opened");

        Ok(TaskStore {
            ids: IdGenerator::seeded(&tasks),
            gateway,
            tasks,
            history,
            edit: EditState::Idle,
            persist_warning: None,
        })
    }

    /// The full collection in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.edit {
            EditState::Idle => None,
            EditState::Editing(id) => Some(id),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The last failed write, if any. Taking it clears it.
    pub fn take_persist_warning(&mut self) -> Option<PersistenceError> {
        self.persist_warning.take()
    }

    /// Append a new task with a freshly generated id.
    pub fn create(&mut self, fields: TaskFields) -> Result<Task, StoreError> {
        let valid = fields.validate()?;
        self.check_dependency(&valid, None)?;

        let mut id = self.ids.next().to_string();
        while self.get(&id).is_some() {
            id = self.ids.next().to_string();
        }
        let task = build_task(id, valid);

        self.history
            .push(HistoryEvent::new(&task.id, EventKind::Created { status: task.status }));
        self.tasks.push(task.clone());
        tracing::info!(id = %task.id, report = %task.report, "task created");
        self.persist();
        Ok(task)
    }

    /// Replace every field of task `id` except the id itself.
    pub fn update(&mut self, id: &str, fields: TaskFields) -> Result<Task, StoreError> {
        let idx = self.position(id)?;
        let valid = fields.validate()?;
        self.check_dependency(&valid, Some(id))?;

        let old = self.tasks[idx].clone();
        let repoint = old.report != valid.report
            && !self.tasks.iter().any(|t| t.id != id && t.report == old.report);
        if repoint
            && self
                .tasks
                .iter()
                .any(|t| t.id != id && t.dependency == old.report && t.report == valid.report)
        {
            return Err(ValidationError::RenameCreatesSelfDependency(valid.report).into());
        }
        let task = build_task(old.id.clone(), valid);
        if old.status != task.status {
            self.history.push(HistoryEvent::new(
                id,
                EventKind::StatusChanged {
                    from: old.status,
                    to: task.status,
                },
            ));
        }
        self.tasks[idx] = task.clone();

        if repoint {
            for dependent in self.tasks.iter_mut().filter(|t| t.dependency == old.report) {
                dependent.dependency = task.report.clone();
            }
            tracing::debug!(from = %old.report, to = %task.report, "re-pointed dependents after rename");
        }

        if self.editing_id() == Some(id) {
            self.edit = EditState::Idle;
        }
        tracing::info!(id, "task updated");
        self.persist();
        Ok(task)
    }

    /// Remove task `id` unless another task depends on its report.
    pub fn delete(&mut self, id: &str) -> Result<Task, StoreError> {
        let idx = self.position(id)?;
        let dependents: Vec<String> = self.dependents_of(id).iter().map(|t| t.id.clone()).collect();
        if !dependents.is_empty() {
            let report = self.tasks[idx].report.clone();
            tracing::debug!(id, %report, dependents = dependents.len(), "delete blocked");
            return Err(StoreError::DependencyConflict {
                id: id.to_string(),
                report,
                dependents,
            });
        }
        let removed = self.remove_at(idx);
        self.persist();
        Ok(removed)
    }

    /// Clear every dependency on task `id`'s report, then remove it.
    pub fn delete_cascade(&mut self, id: &str) -> Result<CascadeDelete, StoreError> {
        let idx = self.position(id)?;
        let report = self.tasks[idx].report.clone();

        let mut cleared = Vec::new();
        for t in self.tasks.iter_mut() {
            if t.id != id && t.has_dependency() && t.dependency == report {
                t.dependency.clear();
                cleared.push(t.id.clone());
            }
        }
        let removed = self.remove_at(idx);
        tracing::info!(id, cleared = cleared.len(), "cascading delete");
        self.persist();
        Ok(CascadeDelete { removed, cleared })
    }

    /// Tasks whose dependency names task `id`'s report.
    pub fn dependents_of(&self, id: &str) -> Vec<&Task> {
        let Some(target) = self.get(id) else {
            return Vec::new();
        };
        self.tasks
            .iter()
            .filter(|t| t.id != target.id && t.has_dependency() && t.dependency == target.report)
            .collect()
    }

    /// Load task `id` into the edit form.
    pub fn begin_edit(&mut self, id: &str) -> Result<&Task, StoreError> {
        let idx = self.position(id)?;
        self.edit = EditState::Editing(id.to_string());
        Ok(&self.tasks[idx])
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    /// "None" followed by every report except the one under edit.
    pub fn dependency_candidates(&self) -> Vec<DependencyOption> {
        let editing = self.editing_id();
        std::iter::once(DependencyOption::none())
            .chain(
                self.tasks
                    .iter()
                    .filter(|t| Some(t.id.as_str()) != editing)
                    .map(|t| DependencyOption {
                        value: t.report.clone(),
                        label: t.report.clone(),
                    }),
            )
            .collect()
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn check_dependency(&self, valid: &ValidFields, own_id: Option<&str>) -> Result<(), ValidationError> {
        if valid.dependency.is_empty() {
            return Ok(());
        }
        if valid.dependency == valid.report {
            return Err(ValidationError::SelfDependency);
        }
        let exists = self
            .tasks
            .iter()
            .any(|t| Some(t.id.as_str()) != own_id && t.report == valid.dependency);
        if exists {
            Ok(())
        } else {
            Err(ValidationError::UnknownDependency(valid.dependency.clone()))
        }
    }

    fn remove_at(&mut self, idx: usize) -> Task {
        let removed = self.tasks.remove(idx);
        if self.editing_id() == Some(removed.id.as_str()) {
            self.edit = EditState::Idle;
        }
        self.history.push(HistoryEvent::new(&removed.id, EventKind::Deleted));
        tracing::info!(id = %removed.id, report = %removed.report, "task deleted");
        removed
    }

    fn persist(&mut self) {
        let result = save_json(&mut self.gateway, TASKS_KEY, &self.tasks)
            .and_then(|()| save_json(&mut self.gateway, HISTORY_KEY, &self.history));
        if let Err(e) = result {
            tracing::warn!(error = %e, "write failed; in-memory tasks remain authoritative");
            self.persist_warning = Some(e);
        }
    }
}

fn build_task(id: String, valid: ValidFields) -> Task {
    Task {
        id,
        kind: valid.kind,
        report: valid.report,
        description: valid.description,
        date: valid.date,
        status: valid.status,
        priority: valid.priority,
        dependency: valid.dependency,
    }
}

fn load_json<G: PersistenceGateway, T: DeserializeOwned + Default>(
    gateway: &G,
    key: &str,
) -> Result<T, PersistenceError> {
    match gateway.load(key)? {
        None => Ok(T::default()),
        Some(blob) if blob.trim().is_empty() => Ok(T::default()),
        Some(blob) => serde_json::from_str(&blob).map_err(|source| PersistenceError::Decode {
            key: key.to_string(),
            source,
        }),
    }
}

fn save_json<G: PersistenceGateway, T: Serialize + ?Sized>(
    gateway: &mut G,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let blob = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Encode {
        key: key.to_string(),
        source,
    })?;
    gateway.save(key, &blob)
}
