use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator between a resource path and its scope in claim notation.
const SCOPE_SEPARATOR: &str = "::";

/// Unique identifier for a task, supplied by the caller and stable across a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task id from any string-like value.
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A declared write claim on a resource: a path plus an optional scope naming
/// the sub-region the task exclusively owns.
///
/// Claims use `path::Scope` notation. An absent scope means the task claims
/// the whole resource:
///
/// - `"orders.py"` claims all of `orders.py`
/// - `"orders.py::OrderService"` claims one class
/// - `"orders.py::OrderService.validate"` claims one method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceClaim {
    /// Resource path the claim applies to.
    pub path: String,
    /// Named sub-region of the resource, or `None` for a whole-resource claim.
    pub scope: Option<String>,
}

impl ResourceClaim {
    /// Creates a whole-resource claim.
    pub fn unscoped<T: Into<String>>(path: T) -> Self {
        Self {
            path: path.into(),
            scope: None,
        }
    }

    /// Creates a claim on a named sub-region of a resource.
    pub fn scoped<P: Into<String>, S: Into<String>>(path: P, scope: S) -> Self {
        Self {
            path: path.into(),
            scope: Some(scope.into()),
        }
    }
}

impl FromStr for ResourceClaim {
    type Err = Error;

    /// Parses `path::Scope` notation, trimming whitespace around both parts.
    /// An empty scope after the separator is treated as a whole-resource claim.
    fn from_str(text: &str) -> Result<Self> {
        let (raw_path, raw_scope) = match text.split_once(SCOPE_SEPARATOR) {
            Some((path_part, scope_part)) => (path_part, Some(scope_part)),
            None => (text, None),
        };

        let path = raw_path.trim();
        if path.is_empty() {
            return Err(Error::InvalidClaim(format!("empty path in '{text}'")));
        }

        let scope = raw_scope
            .map(str::trim)
            .filter(|trimmed| !trimmed.is_empty())
            .map(str::to_owned);

        Ok(Self {
            path: path.to_owned(),
            scope,
        })
    }
}

impl TryFrom<String> for ResourceClaim {
    type Error = Error;

    fn try_from(text: String) -> Result<Self> {
        text.parse()
    }
}

impl From<ResourceClaim> for String {
    fn from(claim: ResourceClaim) -> Self {
        claim.to_string()
    }
}

impl Display for ResourceClaim {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match &self.scope {
            Some(scope) => write!(formatter, "{}{SCOPE_SEPARATOR}{scope}", self.path),
            None => write!(formatter, "{}", self.path),
        }
    }
}

/// Immutable work item: dependencies, cost estimate, and declared file ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, stable across the run.
    pub id: TaskId,
    /// Ids of tasks this task must wait for.
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
    /// Non-negative duration estimate in abstract units.
    #[serde(default)]
    pub cost: f64,
    /// Opaque label naming the worker class that should run this task.
    #[serde(default)]
    pub executor: String,
    /// Resource paths this task creates; each path has exactly one creator
    /// across the whole batch.
    #[serde(default)]
    pub creates: Vec<String>,
    /// Resources this task mutates, each claim whole-file or scoped.
    #[serde(default)]
    pub modifies: Vec<ResourceClaim>,
    /// Resource paths this task must not touch. Informational: audited,
    /// never part of conflict validation.
    #[serde(default)]
    pub boundary: Vec<String>,
}

impl Task {
    /// Creates a task with no dependencies, zero cost, and no claims.
    pub fn new<T: Into<TaskId>>(id: T) -> Self {
        Self {
            id: id.into(),
            depends_on: Vec::new(),
            cost: 0.0,
            executor: String::new(),
            creates: Vec::new(),
            modifies: Vec::new(),
            boundary: Vec::new(),
        }
    }

    /// Sets the dependency list.
    #[must_use]
    pub fn with_dependencies(mut self, depends_on: Vec<TaskId>) -> Self {
        self.depends_on = depends_on;
        self
    }

    /// Sets the cost estimate.
    #[must_use]
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the executor label.
    #[must_use]
    pub fn with_executor<T: Into<String>>(mut self, executor: T) -> Self {
        self.executor = executor.into();
        self
    }

    /// Sets the created resource paths.
    #[must_use]
    pub fn with_creates(mut self, creates: Vec<String>) -> Self {
        self.creates = creates;
        self
    }

    /// Sets the modification claims.
    #[must_use]
    pub fn with_modifies(mut self, modifies: Vec<ResourceClaim>) -> Self {
        self.modifies = modifies;
        self
    }

    /// Sets the boundary paths.
    #[must_use]
    pub fn with_boundary(mut self, boundary: Vec<String>) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Input wrapper for a serialized batch file.
#[derive(Debug, Deserialize)]
struct BatchFile {
    tasks: Vec<Task>,
}

/// An immutable batch of tasks, validated at construction.
///
/// The batch is the unit of work for one scheduling run; the pipeline never
/// mutates it, only computes derived properties keyed by task id.
#[derive(Debug, Clone)]
pub struct TaskBatch {
    tasks: Vec<Task>,
}

impl TaskBatch {
    /// Validates and freezes a batch of tasks.
    ///
    /// Rejects tasks with empty ids, negative or non-finite costs, and
    /// duplicate `depends_on` entries. `creates` and `boundary` entries are
    /// normalized through claim notation and reduced to their path, so a
    /// stray `::Scope` suffix on a created file is tolerated.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTask`] for a malformed task, or
    /// [`Error::InvalidClaim`] for an unparseable resource entry.
    pub fn new(tasks: Vec<Task>) -> Result<Self> {
        let tasks = tasks
            .into_iter()
            .map(Self::validate_task)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tasks })
    }

    /// Loads and validates a batch from a JSON string of the form
    /// `{"tasks": [...]}`.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a task fails validation.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: BatchFile = serde_json::from_str(text)?;
        Self::new(file.tasks)
    }

    /// Loads and validates a batch from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the JSON is malformed,
    /// or a task fails validation.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The validated tasks, in input order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the batch.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the batch contains no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn validate_task(mut task: Task) -> Result<Task> {
        if task.id.as_str().trim().is_empty() {
            return Err(Error::InvalidTask("task id is empty".to_owned()));
        }

        if !task.cost.is_finite() || task.cost < 0.0 {
            return Err(Error::InvalidTask(format!(
                "task '{}' has invalid cost {}",
                task.id, task.cost
            )));
        }

        let mut seen_deps: Vec<&TaskId> = Vec::with_capacity(task.depends_on.len());
        for dep in &task.depends_on {
            if seen_deps.contains(&dep) {
                return Err(Error::InvalidTask(format!(
                    "task '{}' lists dependency '{dep}' more than once",
                    task.id
                )));
            }
            seen_deps.push(dep);
        }

        task.creates = Self::normalize_paths(&task.id, &task.creates)?;
        task.boundary = Self::normalize_paths(&task.id, &task.boundary)?;

        Ok(task)
    }

    /// Reduces raw path entries to their path component, dropping any scope
    /// suffix and deduplicating while preserving first-seen order.
    fn normalize_paths(id: &TaskId, entries: &[String]) -> Result<Vec<String>> {
        let mut paths: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            let claim: ResourceClaim = entry
                .parse()
                .map_err(|error| Error::InvalidTask(format!("task '{id}': {error}")))?;
            if !paths.contains(&claim.path) {
                paths.push(claim.path);
            }
        }
        Ok(paths)
    }
}
