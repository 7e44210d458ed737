//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields that change on every write and carry no information in a diff
const IGNORED_FIELDS: &[&str] = &["updated_at"];

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        };
        f.write_str(label)
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Expense,
    Category,
    WorkSession,
    HourlyRate,
    City,
    Vendor,
    PartsPurchase,
    PartsItem,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntityType::Expense => "Expense",
            EntityType::Category => "Category",
            EntityType::WorkSession => "WorkSession",
            EntityType::HourlyRate => "HourlyRate",
            EntityType::City => "City",
            EntityType::Vendor => "Vendor",
            EntityType::PartsPurchase => "PartsPurchase",
            EntityType::PartsItem => "PartsItem",
        };
        f.write_str(label)
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable description of the entity (e.g. expense name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// "field: old -> new" pairs for updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, entity_type, entity_id.into(), entity_name);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    /// Record an update; the diff summary is computed from the two states
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        if let (Some(before), Some(after)) = (&entry.before, &entry.after) {
            let changes = changed_fields(before, after);
            if !changes.is_empty() {
                entry.diff_summary = Some(changes.join(", "));
            }
        }
        entry
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Delete, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// Whether an update actually changed anything worth recording
    pub fn has_changes(&self) -> bool {
        self.operation != Operation::Update || self.diff_summary.is_some()
    }

    /// One or two lines for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

/// List top-level fields that differ between two serialized entities
pub fn changed_fields(before: &Value, after: &Value) -> Vec<String> {
    let (Value::Object(before), Value::Object(after)) = (before, after) else {
        return if before == after {
            Vec::new()
        } else {
            vec![format!("{} -> {}", short(before), short(after))]
        };
    };

    let mut changes = Vec::new();
    for (key, old) in before {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match after.get(key) {
            Some(new) if new != old => {
                changes.push(format!("{}: {} -> {}", key, short(old), short(new)))
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, short(old))),
        }
    }
    for (key, new) in after {
        if !before.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", key, short(new)));
        }
    }
    changes
}

fn short(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(EntityType::PartsItem.to_string(), "PartsItem");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::Expense,
            "exp-12345678",
            Some("Mercado".to_string()),
            &json!({"name": "Mercado", "total_value": "50,00"}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
        assert!(entry.has_changes());
    }

    #[test]
    fn test_update_computes_diff() {
        let before = json!({"name": "Mercado", "total_value": "50,00", "updated_at": "a"});
        let after = json!({"name": "Mercado", "total_value": "75,00", "updated_at": "b"});

        let entry = AuditEntry::update(EntityType::Expense, "exp-1", None, &before, &after);

        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("total_value: \"50,00\" -> \"75,00\"")
        );
    }

    #[test]
    fn test_update_without_changes() {
        let state = json!({"name": "Lazer", "updated_at": "x"});
        let touched = json!({"name": "Lazer", "updated_at": "y"});
        let entry = AuditEntry::update(EntityType::Category, "cat-1", None, &state, &touched);
        assert!(!entry.has_changes());
    }

    #[test]
    fn test_changed_fields_added_and_removed() {
        let changes = changed_fields(&json!({"a": 1}), &json!({"b": [1, 2]}));
        assert_eq!(changes, vec!["a: 1 -> (removed)", "b: (added) -> [2 items]"]);
    }

    #[test]
    fn test_delete_entry_round_trip() {
        let entry = AuditEntry::delete(
            EntityType::City,
            "city-1",
            Some("Curitiba".into()),
            &json!({"description": "Curitiba"}),
        );
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.operation, Operation::Delete);
        assert_eq!(parsed.entity_type, EntityType::City);
        assert!(parsed.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::Vendor,
            "ven-12345678",
            Some("Auto Peças Sul".to_string()),
            &json!({}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Vendor ven-12345678 (Auto Peças Sul)"));
    }
}
