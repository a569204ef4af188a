//! Canonical task record and its raw/wire representations.
//!
//! [`TaskRecord::from_raw`] is the only place that reads loosely-typed store
//! fields. Every other component works with the typed accessors.

use super::{Priority, TaskDomainError, TaskNumber, TaskStatus, TaskUuid, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Store attributes that the model owns; anything else is passed through.
const MODELLED_KEYS: [&str; 18] = [
    "id",
    "uuid",
    "description",
    "status",
    "project",
    "priority",
    "tags",
    "urgency",
    "entry",
    "modified",
    "due",
    "start",
    "end",
    "wait",
    "until",
    "annotations",
    "depends",
    "recur",
];

/// Loosely-typed record as exchanged with the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTask(Map<String, Value>);

impl RawTask {
    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns a field by store attribute name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the wrapper and returns the JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawTask {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Timestamped note attached to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    entry: Option<DateTime<Utc>>,
    description: String,
}

impl Annotation {
    /// Creates an annotation.
    #[must_use]
    pub fn new(entry: Option<DateTime<Utc>>, description: impl Into<String>) -> Self {
        Self {
            entry,
            description: description.into(),
        }
    }

    /// Returns the annotation timestamp.
    #[must_use]
    pub const fn entry(&self) -> Option<DateTime<Utc>> {
        self.entry
    }

    /// Returns the annotation text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Normalised, typed view of one stored task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    id: Option<TaskNumber>,
    uuid: Option<TaskUuid>,
    description: String,
    status: TaskStatus,
    project: Option<String>,
    priority: Option<Priority>,
    tags: BTreeSet<String>,
    urgency: f64,
    entry: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    due: Option<DateTime<Utc>>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    wait: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    annotations: Vec<Annotation>,
    depends: BTreeSet<TaskUuid>,
    recur: Option<String>,
    passthrough: Map<String, Value>,
}

impl TaskRecord {
    /// Builds a record from a raw store read.
    ///
    /// Never fails: a missing or mistyped field falls back to its default.
    #[must_use]
    pub fn from_raw(raw: &RawTask) -> Self {
        let passthrough = raw
            .as_map()
            .iter()
            .filter(|(key, _)| !MODELLED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            id: read_number(raw.get("id")),
            uuid: read_string(raw.get("uuid")).and_then(|value| value.parse().ok()),
            description: read_string(raw.get("description")).unwrap_or_default(),
            status: read_string(raw.get("status"))
                .and_then(|value| TaskStatus::try_from(value.as_str()).ok())
                .unwrap_or(TaskStatus::Pending),
            project: read_string(raw.get("project")),
            priority: read_string(raw.get("priority"))
                .and_then(|value| Priority::try_from(value.as_str()).ok()),
            tags: read_string_list(raw.get("tags")).into_iter().collect(),
            urgency: raw.get("urgency").and_then(Value::as_f64).unwrap_or(0.0),
            entry: raw.get("entry").and_then(timestamp::from_store_value),
            modified: raw.get("modified").and_then(timestamp::from_store_value),
            due: raw.get("due").and_then(timestamp::from_store_value),
            start: raw.get("start").and_then(timestamp::from_store_value),
            end: raw.get("end").and_then(timestamp::from_store_value),
            wait: raw.get("wait").and_then(timestamp::from_store_value),
            until: raw.get("until").and_then(timestamp::from_store_value),
            annotations: read_annotations(raw.get("annotations")),
            depends: read_string_list(raw.get("depends"))
                .iter()
                .filter_map(|value| value.parse().ok())
                .collect(),
            recur: read_string(raw.get("recur")),
            passthrough,
        }
    }

    /// Returns the working-set number, if the store assigned one.
    #[must_use]
    pub const fn id(&self) -> Option<TaskNumber> {
        self.id
    }

    /// Returns the stable identifier.
    #[must_use]
    pub const fn uuid(&self) -> Option<TaskUuid> {
        self.uuid
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the project label.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the tag set.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the store-computed urgency.
    #[must_use]
    pub const fn urgency(&self) -> f64 {
        self.urgency
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn entry(&self) -> Option<DateTime<Utc>> {
        self.entry
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// Returns the due timestamp.
    #[must_use]
    pub const fn due(&self) -> Option<DateTime<Utc>> {
        self.due
    }

    /// Returns the time-tracking start timestamp.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Returns the completion or deletion timestamp.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns the wait timestamp.
    #[must_use]
    pub const fn wait(&self) -> Option<DateTime<Utc>> {
        self.wait
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub const fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    /// Returns the annotations in store order.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Returns the UUIDs of tasks this one depends on.
    #[must_use]
    pub const fn depends(&self) -> &BTreeSet<TaskUuid> {
        &self.depends
    }

    /// Returns the recurrence rule.
    #[must_use]
    pub fn recur(&self) -> Option<&str> {
        self.recur.as_deref()
    }

    /// Human-facing reference: the working-set number when present, otherwise
    /// the UUID.
    #[must_use]
    pub fn reference(&self) -> String {
        match (self.id, self.uuid) {
            (Some(id), _) => id.to_string(),
            (None, Some(uuid)) => uuid.to_string(),
            (None, None) => "<unsaved>".to_owned(),
        }
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Sets or clears the project.
    pub fn set_project(&mut self, project: Option<String>) {
        self.project = project;
    }

    /// Sets or clears the priority.
    pub const fn set_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
    }

    /// Sets or clears the due timestamp.
    pub const fn set_due(&mut self, due: Option<DateTime<Utc>>) {
        self.due = due;
    }

    /// Replaces the whole tag set.
    pub fn replace_tags(&mut self, tags: impl IntoIterator<Item = String>) {
        self.tags = tags.into_iter().collect();
    }

    /// Adds tags; tags already present are left alone.
    pub fn add_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) {
        self.tags.extend(tags.into_iter().cloned());
    }

    /// Removes tags; tags not present are ignored.
    pub fn remove_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) {
        for tag in tags {
            self.tags.remove(tag);
        }
    }

    /// Overwrites the status without touching other fields.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Returns a completed task to pending and clears its completion time.
    pub const fn reopen(&mut self) {
        self.status = TaskStatus::Pending;
        self.end = None;
    }

    /// Produces the caller-facing wire form.
    #[must_use]
    pub fn to_wire(&self) -> WireTask {
        let format = |value: &Option<DateTime<Utc>>| value.as_ref().map(timestamp::to_wire);
        WireTask {
            id: self.id.map(TaskNumber::value),
            uuid: self.uuid.map(|uuid| uuid.to_string()),
            description: self.description.clone(),
            status: self.status,
            project: self.project.clone(),
            priority: self.priority,
            tags: self.tags.iter().cloned().collect(),
            urgency: self.urgency,
            entry: format(&self.entry),
            modified: format(&self.modified),
            due: format(&self.due),
            start: format(&self.start),
            end: format(&self.end),
            wait: format(&self.wait),
            until: format(&self.until),
            annotations: self
                .annotations
                .iter()
                .map(|annotation| WireAnnotation {
                    entry: annotation.entry.as_ref().map(timestamp::to_wire),
                    description: annotation.description.clone(),
                })
                .collect(),
            depends: self.depends.iter().map(ToString::to_string).collect(),
            recur: self.recur.clone(),
        }
    }

    /// Produces the store's import form.
    ///
    /// Computed attributes (`id`, `urgency`) are omitted and cleared optional
    /// attributes are left out, so a whole-record import removes them.
    /// Unmodelled attributes are carried through unchanged.
    #[must_use]
    pub fn to_raw(&self) -> RawTask {
        let mut fields = self.passthrough.clone();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(present) = value {
                fields.insert(key.to_owned(), present);
            }
        };
        let stamp = |value: &Option<DateTime<Utc>>| {
            value
                .as_ref()
                .map(|instant| Value::String(timestamp::to_store(instant)))
        };

        put("uuid", self.uuid.map(|uuid| Value::String(uuid.to_string())));
        put("description", Some(Value::String(self.description.clone())));
        put("status", Some(Value::String(self.status.as_str().to_owned())));
        put("entry", stamp(&self.entry));
        put("modified", stamp(&self.modified));
        put("project", self.project.clone().map(Value::String));
        put(
            "priority",
            self.priority
                .map(|priority| Value::String(priority.as_str().to_owned())),
        );
        put("tags", non_empty_array(self.tags.iter().cloned()));
        put("due", stamp(&self.due));
        put("start", stamp(&self.start));
        put("end", stamp(&self.end));
        put("wait", stamp(&self.wait));
        put("until", stamp(&self.until));
        put(
            "annotations",
            (!self.annotations.is_empty()).then(|| {
                Value::Array(
                    self.annotations
                        .iter()
                        .map(|annotation| {
                            let mut note = Map::new();
                            if let Some(entry) = &annotation.entry {
                                note.insert(
                                    "entry".to_owned(),
                                    Value::String(timestamp::to_store(entry)),
                                );
                            }
                            note.insert(
                                "description".to_owned(),
                                Value::String(annotation.description.clone()),
                            );
                            Value::Object(note)
                        })
                        .collect(),
                )
            }),
        );
        put(
            "depends",
            non_empty_array(self.depends.iter().map(ToString::to_string)),
        );
        put("recur", self.recur.clone().map(Value::String));
        RawTask(fields)
    }
}

/// Validated input for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    description: String,
    project: Option<String>,
    priority: Option<Priority>,
    tags: BTreeSet<String>,
    due: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Creates a draft with a required description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the description is
    /// blank.
    pub fn new(description: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = description.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        Ok(Self {
            description: trimmed.to_owned(),
            project: None,
            priority: None,
            tags: BTreeSet::new(),
            due: None,
        })
    }

    /// Sets the project.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the due timestamp.
    #[must_use]
    pub const fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Builds the pending record a store persists for this draft.
    #[must_use]
    pub fn into_record(self, uuid: TaskUuid, entry: DateTime<Utc>) -> TaskRecord {
        TaskRecord {
            id: None,
            uuid: Some(uuid),
            description: self.description,
            status: TaskStatus::Pending,
            project: self.project,
            priority: self.priority,
            tags: self.tags,
            urgency: 0.0,
            entry: Some(entry),
            modified: Some(entry),
            due: self.due,
            start: None,
            end: None,
            wait: None,
            until: None,
            annotations: Vec::new(),
            depends: BTreeSet::new(),
            recur: None,
            passthrough: Map::new(),
        }
    }
}

/// JSON-safe, UTC-normalised record returned to callers.
///
/// Optional fields always serialise, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTask {
    /// Working-set number.
    pub id: Option<u64>,
    /// Stable identifier.
    pub uuid: Option<String>,
    /// Description text.
    pub description: String,
    /// Status.
    pub status: TaskStatus,
    /// Project label.
    pub project: Option<String>,
    /// Priority letter.
    pub priority: Option<Priority>,
    /// Tags in lexical order.
    pub tags: Vec<String>,
    /// Store-computed urgency.
    pub urgency: f64,
    /// Creation time.
    pub entry: Option<String>,
    /// Last modification time.
    pub modified: Option<String>,
    /// Due time.
    pub due: Option<String>,
    /// Time-tracking start.
    pub start: Option<String>,
    /// Completion or deletion time.
    pub end: Option<String>,
    /// Wait-until time.
    pub wait: Option<String>,
    /// Expiry time.
    pub until: Option<String>,
    /// Annotations in store order.
    pub annotations: Vec<WireAnnotation>,
    /// Dependency UUIDs in lexical order.
    pub depends: Vec<String>,
    /// Recurrence rule.
    pub recur: Option<String>,
}

/// Wire form of an [`Annotation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAnnotation {
    /// Annotation time.
    pub entry: Option<String>,
    /// Annotation text.
    pub description: String,
}

fn read_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

fn read_number(value: Option<&Value>) -> Option<TaskNumber> {
    let number = match value? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    number.and_then(TaskNumber::from_store)
}

/// Reads either a JSON array of strings or a comma-separated string.
fn read_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn read_annotations(value: Option<&Value>) -> Vec<Annotation> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|note| Annotation {
            entry: note.get("entry").and_then(timestamp::from_store_value),
            description: note
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
        })
        .collect()
}

fn non_empty_array(items: impl Iterator<Item = String>) -> Option<Value> {
    let values: Vec<Value> = items.map(Value::String).collect();
    (!values.is_empty()).then_some(Value::Array(values))
}
