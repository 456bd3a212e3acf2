//! Message history stored in a chat, and the append-only merge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// The `messages` column of a chat.
///
/// Older rows may hold a single non-list value; new writes always produce a
/// list.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum History {
    /// No history yet (SQL NULL or JSON `null`).
    #[default]
    Absent,
    /// A legacy scalar or object that is not a list.
    Single(Value),
    /// An ordered list of exchanges.
    List(Vec<Value>),
}

impl History {
    /// Interpret a JSON value. `null` is absent.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => History::Absent,
            Value::Array(items) => History::List(items),
            other => History::Single(other),
        }
    }

    /// Decode the raw column.
    pub fn from_column(raw: Option<&str>) -> Result<Self> {
        match raw {
            None => Ok(History::Absent),
            Some(text) => Ok(Self::from_value(serde_json::from_str(text)?)),
        }
    }

    /// Encode for the column; absent becomes SQL NULL.
    pub fn to_column(&self) -> Result<Option<String>> {
        match self {
            History::Absent => Ok(None),
            other => Ok(Some(serde_json::to_string(&other.to_value())?)),
        }
    }

    /// The history as a JSON value, as stored.
    pub fn to_value(&self) -> Value {
        match self {
            History::Absent => Value::Null,
            History::Single(value) => value.clone(),
            History::List(items) => Value::Array(items.clone()),
        }
    }

    /// The history viewed as a list; a legacy scalar is a list of one.
    pub fn entries(&self) -> Vec<Value> {
        match self {
            History::Absent => Vec::new(),
            History::Single(value) => vec![value.clone()],
            History::List(items) => items.clone(),
        }
    }

    /// Number of entries, as seen by [`History::entries`].
    pub fn len(&self) -> usize {
        match self {
            History::Absent => 0,
            History::Single(_) => 1,
            History::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for History {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            History::Absent => serializer.serialize_none(),
            History::Single(value) => value.serialize(serializer),
            History::List(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for History {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

/// New entries for a history: one value or an ordered batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryUpdate {
    Many(Vec<Value>),
    One(Value),
}

impl HistoryUpdate {
    /// The entry that ends up last after the merge, if any.
    pub fn latest(&self) -> Option<&Value> {
        match self {
            HistoryUpdate::Many(items) => items.last(),
            HistoryUpdate::One(value) => Some(value),
        }
    }
}

impl From<Value> for HistoryUpdate {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => HistoryUpdate::Many(items),
            other => HistoryUpdate::One(other),
        }
    }
}

/// Result of [`merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Always a list.
    pub history: History,
    /// Last entry contributed by the update.
    pub latest: Option<Value>,
}

/// Append `update` to `current`.
///
/// | current | update | result |
/// |---|---|---|
/// | absent | one | `[update]` |
/// | absent | many | `update` |
/// | list | one | `current + [update]` |
/// | list | many | `current + update` |
/// | scalar | one | `[current, update]` |
/// | scalar | many | `[current] + update` |
pub fn merge(current: History, update: HistoryUpdate) -> MergeOutcome {
    let latest = update.latest().cloned();

    let mut items = match current {
        History::Absent => Vec::new(),
        History::Single(value) => vec![value],
        History::List(items) => items,
    };

    match update {
        HistoryUpdate::One(value) => items.push(value),
        HistoryUpdate::Many(values) => items.extend(values),
    }

    MergeOutcome {
        history: History::List(items),
        latest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_table() {
        let e1 = json!({"message": "hola"});
        let e2 = json!({"message": "adios"});
        let legacy = json!("texto suelto");

        let cases = [
            (History::Absent, HistoryUpdate::One(e1.clone()), vec![e1.clone()]),
            (
                History::Absent,
                HistoryUpdate::Many(vec![e1.clone(), e2.clone()]),
                vec![e1.clone(), e2.clone()],
            ),
            (
                History::List(vec![e1.clone()]),
                HistoryUpdate::One(e2.clone()),
                vec![e1.clone(), e2.clone()],
            ),
            (
                History::List(vec![e1.clone()]),
                HistoryUpdate::Many(vec![e2.clone(), e1.clone()]),
                vec![e1.clone(), e2.clone(), e1.clone()],
            ),
            (
                History::Single(legacy.clone()),
                HistoryUpdate::One(e1.clone()),
                vec![legacy.clone(), e1.clone()],
            ),
            (
                History::Single(legacy.clone()),
                HistoryUpdate::Many(vec![e1.clone(), e2.clone()]),
                vec![legacy.clone(), e1.clone(), e2.clone()],
            ),
        ];

        for (current, update, expected) in cases {
            let outcome = merge(current.clone(), update.clone());
            assert_eq!(
                outcome.history,
                History::List(expected),
                "merging {:?} into {:?}",
                update,
                current
            );
        }
    }

    #[test]
    fn test_latest_comes_from_update() {
        let outcome = merge(
            History::List(vec![json!(1)]),
            HistoryUpdate::Many(vec![json!(2), json!(3)]),
        );
        assert_eq!(outcome.latest, Some(json!(3)));

        let outcome = merge(History::List(vec![json!(1)]), HistoryUpdate::Many(vec![]));
        assert_eq!(outcome.latest, None);
        assert_eq!(outcome.history, History::List(vec![json!(1)]));
    }

    #[test]
    fn test_single_update_always_last() {
        let starts = [
            History::Absent,
            History::Single(json!({"legacy": true})),
            History::List(vec![]),
            History::List(vec![json!("a"), json!("b")]),
        ];
        let entry = json!({"message": "nuevo"});

        for start in starts {
            let outcome = merge(start, HistoryUpdate::One(entry.clone()));
            assert_eq!(outcome.history.entries().last(), Some(&entry));
        }
    }

    #[test]
    fn test_column_encoding() {
        assert_eq!(History::from_column(None).unwrap(), History::Absent);
        assert_eq!(History::from_column(Some("null")).unwrap(), History::Absent);
        assert_eq!(
            History::from_column(Some("\"hola\"")).unwrap(),
            History::Single(json!("hola"))
        );
        assert_eq!(
            History::from_column(Some("[1,2]")).unwrap(),
            History::List(vec![json!(1), json!(2)])
        );
        assert!(History::from_column(Some("{not json")).is_err());

        assert_eq!(History::Absent.to_column().unwrap(), None);
        assert_eq!(
            History::List(vec![json!(1)]).to_column().unwrap(),
            Some("[1]".to_string())
        );
    }

    #[test]
    fn test_update_deserializes_one_or_many() {
        let one: HistoryUpdate = serde_json::from_value(json!({"message": "x"})).unwrap();
        assert!(matches!(one, HistoryUpdate::One(_)));

        let many: HistoryUpdate = serde_json::from_value(json!([{"message": "x"}])).unwrap();
        assert!(matches!(many, HistoryUpdate::Many(ref items) if items.len() == 1));
    }

    #[test]
    fn test_history_serializes_as_stored() {
        assert_eq!(serde_json::to_value(History::Absent).unwrap(), Value::Null);
        assert_eq!(
            serde_json::to_value(History::List(vec![json!(1)])).unwrap(),
            json!([1])
        );
    }
}
