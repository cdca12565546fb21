//! The value/issue carrier threaded through every run contract.

use super::issue::{Issue, PathItem};
use super::value::Value;
use std::ops::ControlFlow;
use std::sync::Arc;

/// A value in flight through a schema, plus what is known about it.
///
/// `typed` and the issue list are independent: a pipe can leave a dataset
/// typed while a validation step has attached issues to it. When issues are
/// present the list is never empty; it can only be appended to.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Whether `value` is established to conform to the schema's output shape
    pub typed: bool,
    /// The input, or the best-effort output produced so far
    pub value: Value,
    issues: Option<Vec<Issue>>,
}

impl Dataset {
    /// Creates an untyped dataset for a raw input.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            typed: false,
            value: value.into(),
            issues: None,
        }
    }

    /// Creates a dataset whose value already conforms.
    pub fn typed(value: impl Into<Value>) -> Self {
        Self {
            typed: true,
            value: value.into(),
            issues: None,
        }
    }

    /// A copy of this dataset's value without its typedness or issues.
    ///
    /// Used whenever a sub-schema must start from the same input
    /// independently of other attempts (union candidates, intersect options).
    pub fn fresh(&self) -> Self {
        Self::new(self.value.clone())
    }

    /// The accumulated issues, if any.
    pub fn issues(&self) -> Option<&[Issue]> {
        self.issues.as_deref()
    }

    pub fn has_issues(&self) -> bool {
        self.issues.is_some()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.as_ref().map_or(0, Vec::len)
    }

    /// True when the value is typed and nothing was reported.
    pub fn is_success(&self) -> bool {
        self.typed && self.issues.is_none()
    }

    /// Appends one issue.
    pub fn push_issue(&mut self, issue: Issue) {
        self.issues.get_or_insert_with(Vec::new).push(issue);
    }

    /// Appends issues in order. An empty iterator leaves the dataset untouched.
    pub fn extend_issues(&mut self, issues: impl IntoIterator<Item = Issue>) {
        let mut issues = issues.into_iter().peekable();
        if issues.peek().is_some() {
            self.issues.get_or_insert_with(Vec::new).extend(issues);
        }
    }

    /// Removes and returns the issue list.
    pub fn take_issues(&mut self) -> Option<Vec<Issue>> {
        self.issues.take()
    }

    pub fn into_issues(self) -> Option<Vec<Issue>> {
        self.issues
    }

    /// Replaces the value, keeping `typed` and the issues gathered so far.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Moves the value out behind an `Arc` so every path step into it can
    /// share one copy. The value is left `Undefined` until the caller stores
    /// its output.
    pub fn share_value(&mut self) -> Arc<Value> {
        Arc::new(std::mem::take(&mut self.value))
    }

    /// Moves a child dataset's issues into this one, recording `item` as the
    /// next step toward the root on each of them.
    pub fn absorb_child_issues(&mut self, child: &mut Dataset, item: Arc<PathItem>) {
        if let Some(issues) = child.take_issues() {
            self.extend_issues(issues.into_iter().map(|mut issue| {
                issue.push_path(Arc::clone(&item));
                issue
            }));
        }
    }

    /// Folds a finished child into this container dataset.
    ///
    /// Child issues get the step built by `item`; an untyped child makes the
    /// container untyped. Returns `Break` when issues were found under
    /// `abort_early`, in which case the container is marked untyped.
    pub fn absorb_child(
        &mut self,
        child: &mut Dataset,
        item: impl FnOnce() -> PathItem,
        abort_early: bool,
    ) -> ControlFlow<()> {
        if child.has_issues() {
            self.absorb_child_issues(child, Arc::new(item()));
            if abort_early {
                self.typed = false;
                return ControlFlow::Break(());
            }
        }
        if !child.typed {
            self.typed = false;
        }
        ControlFlow::Continue(())
    }
}
