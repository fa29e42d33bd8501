//! # Field-Level Issues
//!
//! An [`Issue`] is one violated rule at one field path inside one segment.
//! An [`IssueList`] is what a failing [`Schema`](crate::Schema) returns: it
//! can never be empty, so "failed without saying why" is unrepresentable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Dotted field path inside the segment. Empty for the segment root.
    pub path: String,
    /// Machine-readable rule code, e.g. `any.required`, `number.min`.
    pub kind: String,
    /// Human-readable description quoting the field label.
    pub message: String,
}

impl Issue {
    pub fn new(
        path: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// True when the issue concerns the segment value as a whole.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root) [{}]: {}", self.kind, self.message)
        } else {
            write!(f, "{} [{}]: {}", self.path, self.kind, self.message)
        }
    }
}

/// Non-empty list of issues for one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Issue>", into = "Vec<Issue>")]
pub struct IssueList(Vec<Issue>);

impl IssueList {
    /// Build from a vector, `None` if it is empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self(issues))
        }
    }

    pub fn push(&mut self, issue: Issue) {
        self.0.push(issue);
    }

    /// Append every issue of `other`.
    pub fn extend(&mut self, other: IssueList) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    pub fn first(&self) -> &Issue {
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }

    /// Issues grouped by field path, groups ordered by first occurrence.
    pub fn grouped_by_path(&self) -> Vec<(&str, Vec<&Issue>)> {
        let mut groups: Vec<(&str, Vec<&Issue>)> = Vec::new();
        for issue in &self.0 {
            match groups.iter_mut().find(|(path, _)| *path == issue.path) {
                Some((_, group)) => group.push(issue),
                None => groups.push((issue.path.as_str(), vec![issue])),
            }
        }
        groups
    }
}

impl From<Issue> for IssueList {
    fn from(issue: Issue) -> Self {
        Self(vec![issue])
    }
}

impl TryFrom<Vec<Issue>> for IssueList {
    type Error = String;

    fn try_from(issues: Vec<Issue>) -> Result<Self, Self::Error> {
        Self::from_vec(issues).ok_or_else(|| "issue list must not be empty".to_string())
    }
}

impl From<IssueList> for Vec<Issue> {
    fn from(list: IssueList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a IssueList {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for IssueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}
