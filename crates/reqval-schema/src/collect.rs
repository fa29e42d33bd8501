use reqval_core::{Issue, IssueList};
use serde_json::Value;

/// Accumulates issues for one schema run and honours `abort_early`.
pub(crate) struct IssueCollector {
    issues: Vec<Issue>,
    abort_early: bool,
}

impl IssueCollector {
    pub(crate) fn new(abort_early: bool) -> Self {
        Self {
            issues: Vec::new(),
            abort_early,
        }
    }

    pub(crate) fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub(crate) fn extend(&mut self, issues: IssueList) {
        self.issues.extend(issues.into_vec());
    }

    /// True once an issue is recorded and the caller asked to stop early.
    pub(crate) fn should_stop(&self) -> bool {
        self.abort_early && !self.issues.is_empty()
    }

    pub(crate) fn finish(self, value: Value) -> Result<Value, IssueList> {
        match IssueList::from_vec(self.issues) {
            Some(issues) => Err(issues),
            None => Ok(value),
        }
    }
}
