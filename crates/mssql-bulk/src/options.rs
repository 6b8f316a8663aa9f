//! INSERT BULK options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BulkError, Result};

/// Options controlling the `WITH (...)` clause of `INSERT BULK`.
///
/// Options only affect the SQL text; the binary payload is the same for
/// every combination. All flags default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkOptions {
    /// Check table constraints during the load (`CHECK_CONSTRAINTS`).
    pub check_constraints: bool,

    /// Fire INSERT triggers on the table (`FIRE_TRIGGERS`).
    pub fire_triggers: bool,

    /// Keep NULL values instead of applying column defaults (`KEEP_NULLS`).
    pub keep_nulls: bool,

    /// Hold a table-level lock for the duration of the load (`TABLOCK`).
    pub lock_table: bool,
}

impl BulkOptions {
    /// Create options with every flag disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable constraint checking.
    #[must_use]
    pub fn check_constraints(mut self, enabled: bool) -> Self {
        self.check_constraints = enabled;
        self
    }

    /// Enable or disable trigger firing.
    #[must_use]
    pub fn fire_triggers(mut self, enabled: bool) -> Self {
        self.fire_triggers = enabled;
        self
    }

    /// Enable or disable keeping NULLs.
    #[must_use]
    pub fn keep_nulls(mut self, enabled: bool) -> Self {
        self.keep_nulls = enabled;
        self
    }

    /// Enable or disable the table lock.
    #[must_use]
    pub fn lock_table(mut self, enabled: bool) -> Self {
        self.lock_table = enabled;
        self
    }

    /// Build options from a JSON object such as
    /// `{"fireTriggers": true, "lockTable": true}`.
    ///
    /// Missing keys default to `false` and unknown keys are ignored. A
    /// recognized key holding anything other than a boolean is rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(BulkError::TypeConstraint(format!(
                    "options must be an object, got {other}"
                )));
            }
        };

        let flag = |key: &str| -> Result<bool> {
            match object.get(key) {
                None => Ok(false),
                Some(Value::Bool(b)) => Ok(*b),
                Some(other) => Err(BulkError::TypeConstraint(format!(
                    "options.{key} must be a boolean, got {other}"
                ))),
            }
        };

        Ok(Self {
            check_constraints: flag("checkConstraints")?,
            fire_triggers: flag("fireTriggers")?,
            keep_nulls: flag("keepNulls")?,
            lock_table: flag("lockTable")?,
        })
    }

    /// Hints for the `WITH (...)` clause, in the order SQL Server expects.
    #[must_use]
    pub fn hints(&self) -> Vec<&'static str> {
        [
            (self.check_constraints, "CHECK_CONSTRAINTS"),
            (self.fire_triggers, "FIRE_TRIGGERS"),
            (self.keep_nulls, "KEEP_NULLS"),
            (self.lock_table, "TABLOCK"),
        ]
        .into_iter()
        .filter_map(|(enabled, hint)| enabled.then_some(hint))
        .collect()
    }
}
