//! Issue records, path tracking and the shared issue-emission routine.

use super::config::{Config, Message};
use super::contract::Describe;
use super::dataset::Dataset;
use super::value::Value;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// What a schema or action is, and therefore what kind of issue it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// The value's fundamental shape does not match
    Schema,
    /// The value has the right shape but fails a predicate
    Validation,
    /// A conversion step could not complete
    Transformation,
}

/// The container a path step descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    Object,
    Array,
    Tuple,
    Record,
    Map,
    Set,
}

/// Whether a path step points at a key itself or at the value under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOrigin {
    Key,
    Value,
}

/// One step from a container to one of its members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    pub container_type: ContainerType,
    pub origin: PathOrigin,
    /// Property name or index
    pub key: Value,
    /// The value found under `key`
    pub value: Value,
    /// The container itself, shared by every step into it
    #[serde(serialize_with = "serialize_shared")]
    pub input: Arc<Value>,
}

impl PathItem {
    pub fn new(
        container_type: ContainerType,
        origin: PathOrigin,
        key: Value,
        value: Value,
        input: impl Into<Arc<Value>>,
    ) -> Self {
        Self {
            container_type,
            origin,
            key,
            value,
            input: input.into(),
        }
    }
}

fn serialize_shared<S: Serializer>(value: &Arc<Value>, serializer: S) -> Result<S::Ok, S::Error> {
    value.as_ref().serialize(serializer)
}

/// The path of an issue, recorded from the point of failure toward the root.
///
/// Each enclosing composite pushes its own step as the failure propagates
/// upward, so links only ever point toward the root. [`PathChain::flatten`]
/// turns the chain into root-first order.
#[derive(Debug, Clone, Default)]
pub struct PathChain {
    links: Vec<Arc<PathItem>>,
}

impl PathChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding a single step.
    pub fn single(item: PathItem) -> Self {
        Self {
            links: vec![Arc::new(item)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.links.len()
    }

    /// Records the next step toward the root.
    pub fn push_parent(&mut self, item: Arc<PathItem>) {
        self.links.push(item);
    }

    /// Root-first path, or `None` for an issue raised at the root.
    pub fn flatten(&self) -> Option<Vec<PathItem>> {
        if self.links.is_empty() {
            return None;
        }
        Some(self.links.iter().rev().map(|item| (**item).clone()).collect())
    }
}

fn serialize_chain<S: Serializer>(chain: &PathChain, serializer: S) -> Result<S::Ok, S::Error> {
    chain.flatten().serialize(serializer)
}

/// A single structured validation or transformation failure.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub kind: Kind,
    /// Type tag of the schema or action that raised the issue
    #[serde(rename = "type")]
    pub issue_type: String,
    /// The offending value
    pub input: Value,
    pub expected: Option<String>,
    pub received: String,
    /// Final human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Value>,
    #[serde(rename = "path", serialize_with = "serialize_chain")]
    chain: PathChain,
    /// Sub-issues of aggregate failures such as unions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
    pub lang: Option<String>,
    pub abort_early: Option<bool>,
    pub abort_pipe_early: Option<bool>,
}

impl Issue {
    /// Creates a bare issue. Schemas normally go through [`add_issue`] instead,
    /// which fills in expectations and resolves the message.
    pub fn new(
        kind: Kind,
        issue_type: impl Into<String>,
        input: Value,
        message: impl Into<String>,
    ) -> Self {
        let received = input.received();
        Self {
            kind,
            issue_type: issue_type.into(),
            input,
            expected: None,
            received,
            message: message.into(),
            requirement: None,
            chain: PathChain::new(),
            issues: None,
            lang: None,
            abort_early: None,
            abort_pipe_early: None,
        }
    }

    /// The root-first path to the offending value, if it is nested.
    pub fn path(&self) -> Option<Vec<PathItem>> {
        self.chain.flatten()
    }

    pub fn path_chain(&self) -> &PathChain {
        &self.chain
    }

    pub fn push_path(&mut self, item: Arc<PathItem>) {
        self.chain.push_parent(item);
    }

    /// Dot-joined path keys such as `"user.tags.0"`.
    ///
    /// Returns `None` when the issue has no path or a key is not a string or
    /// number (map keys of other kinds).
    pub fn dot_path(&self) -> Option<String> {
        let path = self.path()?;
        let mut segments = Vec::with_capacity(path.len());
        for item in &path {
            match &item.key {
                Value::String(s) => segments.push(s.clone()),
                Value::Number(n) => segments.push(super::value::format_number(*n)),
                _ => return None,
            }
        }
        Some(segments.join("."))
    }
}

/// Optional overrides for a single [`add_issue`] call.
#[derive(Debug, Default)]
pub struct IssueDetails {
    input: Option<Value>,
    expected: Option<String>,
    received: Option<String>,
    message: Option<Message>,
    path: Option<PathChain>,
    issues: Option<Vec<Issue>>,
}

impl IssueDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn received(mut self, received: impl Into<String>) -> Self {
        self.received = Some(received.into());
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn path(mut self, path: PathChain) -> Self {
        self.path = Some(path);
        self
    }

    pub fn issues(mut self, issues: Vec<Issue>) -> Self {
        if !issues.is_empty() {
            self.issues = Some(issues);
        }
        self
    }
}

/// Builds an issue for `context` and appends it to `dataset`.
///
/// `label` names what was invalid (`"type"`, `"length"`, `"value"`, ...) in
/// the default message. The message is resolved in this order: the
/// per-call override in `details`, the schema's own message, the config's
/// message, the registry's message for the schema's identity and locale, the
/// registry's schema-kind message (schema issues only), the registry's global
/// message, and finally the built-in template. Schema issues mark the dataset
/// untyped.
pub fn add_issue<D: Describe + ?Sized>(
    context: &D,
    label: &str,
    dataset: &mut Dataset,
    config: &Config,
    details: IssueDetails,
) {
    let input = details.input.unwrap_or_else(|| dataset.value.clone());
    let expected = details.expected.or_else(|| context.expects());
    let received = details.received.unwrap_or_else(|| input.received());
    let default_message = match &expected {
        Some(expected) => format!("Invalid {label}: Expected {expected} but received {received}"),
        None => format!("Invalid {label}: Received {received}"),
    };
    let kind = context.kind();

    let mut issue = Issue {
        kind,
        issue_type: context.type_tag().to_string(),
        input,
        expected,
        received,
        message: default_message,
        requirement: context.requirement(),
        chain: details.path.unwrap_or_default(),
        issues: details.issues,
        lang: config.lang.clone(),
        abort_early: config.abort_early,
        abort_pipe_early: config.abort_pipe_early,
    };

    let registry = config.registry();
    let lang = issue.lang.as_deref();
    let message = details
        .message
        .or_else(|| context.message().cloned())
        .or_else(|| config.message.clone())
        .or_else(|| registry.specific_message(context.identity(), lang))
        .or_else(|| {
            if kind == Kind::Schema {
                registry.schema_message(lang)
            } else {
                None
            }
        })
        .or_else(|| registry.global_message(lang));
    if let Some(message) = message {
        issue.message = message.render(&issue);
    }

    if kind == Kind::Schema {
        dataset.typed = false;
    }
    dataset.push_issue(issue);
}
