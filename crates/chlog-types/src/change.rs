use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;

/// An untyped value as recorded by the audit log.
///
/// A string may itself hold a text-encoded document; the normalizer decides.
pub type RawValue = serde_json::Value;

/// One field-level before/after pair captured by the audit log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub field_name: String,
    #[serde(rename = "fieldValueOld", default)]
    pub old_value: RawValue,
    #[serde(rename = "fieldValueNew", default)]
    pub new_value: RawValue,
}

impl ChangeRecord {
    pub fn new(field_name: impl Into<String>, old_value: RawValue, new_value: RawValue) -> Self {
        Self {
            field_name: field_name.into(),
            old_value,
            new_value,
        }
    }
}

/// A document change event: who changed what, when, and the per-field records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeLogEntry {
    pub id: Option<String>,
    pub document_id: Option<String>,
    pub document_type: Option<String>,
    pub user_edited: Option<String>,
    pub change_timestamp: Option<String>,
    pub operation: Option<String>,
    pub reference_doc: Option<RawValue>,
    pub info: Option<RawValue>,
    /// A missing or null list means the event recorded no field changes.
    #[serde(deserialize_with = "null_as_empty")]
    pub changes: Vec<ChangeRecord>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A labelled line of change-log metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InfoRow {
    pub label: &'static str,
    pub value: String,
}

impl ChangeLogEntry {
    /// Parse an entry from its JSON wire form.
    pub fn from_json_str(s: &str) -> Result<Self, TypeError> {
        serde_json::from_str(s).map_err(|e| TypeError::MalformedDocument(e.to_string()))
    }

    /// The metadata rows shown above the change cards.
    ///
    /// `Info` and `Reference Doc` appear only when recorded, info first.
    pub fn basic_info(&self) -> Vec<InfoRow> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let mut rows = vec![
            InfoRow { label: "User", value: text(&self.user_edited) },
            InfoRow { label: "Document Id", value: text(&self.document_id) },
            InfoRow { label: "Date", value: text(&self.change_timestamp) },
            InfoRow { label: "Document Type", value: text(&self.document_type) },
            InfoRow { label: "Operation", value: text(&self.operation) },
        ];
        if let Some(info) = self.info.as_ref().filter(|v| !v.is_null()) {
            rows.push(InfoRow { label: "Info", value: display_raw(info) });
        }
        if let Some(doc) = self.reference_doc.as_ref().filter(|v| !v.is_null()) {
            rows.push(InfoRow { label: "Reference Doc", value: display_raw(doc) });
        }
        rows
    }
}

fn display_raw(value: &RawValue) -> String {
    match value {
        RawValue::String(s) => s.clone(),
        other => format!("{:#}", other),
    }
}

/// Anything a change-log file may hold: a full entry or a bare record list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChangeLogDocument {
    Records(Vec<ChangeRecord>),
    Entry(ChangeLogEntry),
}

impl ChangeLogDocument {
    pub fn from_json_str(s: &str) -> Result<Self, TypeError> {
        let raw: RawValue =
            serde_json::from_str(s).map_err(|e| TypeError::MalformedDocument(e.to_string()))?;
        match raw {
            RawValue::Array(_) | RawValue::Object(_) => serde_json::from_value(raw)
                .map_err(|e| TypeError::MalformedDocument(e.to_string())),
            other => Err(TypeError::UnexpectedShape(kind_name(&other).into())),
        }
    }

    /// The change records, whichever form the document took.
    pub fn changes(&self) -> &[ChangeRecord] {
        match self {
            Self::Records(records) => records,
            Self::Entry(entry) => &entry.changes,
        }
    }

    pub fn entry(&self) -> Option<&ChangeLogEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Records(_) => None,
        }
    }
}

fn kind_name(value: &RawValue) -> &'static str {
    match value {
        RawValue::Null => "null",
        RawValue::Bool(_) => "boolean",
        RawValue::Number(_) => "number",
        RawValue::String(_) => "string",
        RawValue::Array(_) => "array",
        RawValue::Object(_) => "object",
    }
}

/// The externally visible output unit: a titled old/new text pair with
/// highlight markers already embedded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCard {
    pub title: String,
    pub old_text: String,
    pub new_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_wire_names() {
        let record: ChangeRecord = serde_json::from_value(json!({
            "fieldName": "comment",
            "fieldValueOld": "a",
            "fieldValueNew": "b"
        }))
        .unwrap();
        assert_eq!(record, ChangeRecord::new("comment", json!("a"), json!("b")));
    }

    #[test]
    fn record_missing_values_are_null() {
        let record: ChangeRecord =
            serde_json::from_value(json!({"fieldName": "tags", "fieldValueNew": ["x"]})).unwrap();
        assert!(record.old_value.is_null());
        assert_eq!(record.new_value, json!(["x"]));
    }

    #[test]
    fn entry_basic_info_without_extras() {
        let entry = ChangeLogEntry::from_json_str(
            r#"{"userEdited":"admin@sw360.org","documentId":"abc","changeTimestamp":"2024-01-02",
                "documentType":"RELEASE","operation":"UPDATE","changes":[]}"#,
        )
        .unwrap();
        let rows = entry.basic_info();
        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["User", "Document Id", "Date", "Document Type", "Operation"]);
        assert_eq!(rows[0].value, "admin@sw360.org");
    }

    #[test]
    fn entry_basic_info_with_info_and_reference() {
        let entry = ChangeLogEntry {
            info: Some(json!({"reason": "merge"})),
            reference_doc: Some(json!("doc-1")),
            ..Default::default()
        };
        let rows = entry.basic_info();
        assert_eq!(rows[5].label, "Info");
        assert!(rows[5].value.contains("\"reason\": \"merge\""));
        assert_eq!(rows[6], InfoRow { label: "Reference Doc", value: "doc-1".into() });
    }

    #[test]
    fn null_info_is_omitted() {
        let entry = ChangeLogEntry {
            info: Some(RawValue::Null),
            ..Default::default()
        };
        assert_eq!(entry.basic_info().len(), 5);
    }

    #[test]
    fn document_accepts_entry_or_records() {
        let doc = ChangeLogDocument::from_json_str(
            r#"[{"fieldName":"name","fieldValueOld":"a","fieldValueNew":"b"}]"#,
        )
        .unwrap();
        assert!(doc.entry().is_none());
        assert_eq!(doc.changes().len(), 1);

        let doc = ChangeLogDocument::from_json_str(
            r#"{"operation":"UPDATE","changes":[{"fieldName":"name"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.entry().and_then(|e| e.operation.as_deref()), Some("UPDATE"));
        assert_eq!(doc.changes()[0].field_name, "name");
    }

    #[test]
    fn null_or_missing_changes_mean_no_records() {
        let doc = ChangeLogDocument::from_json_str(r#"{"operation":"CREATE","changes":null}"#)
            .unwrap();
        assert_eq!(doc.entry().and_then(|e| e.operation.as_deref()), Some("CREATE"));
        assert!(doc.changes().is_empty());

        let doc = ChangeLogDocument::from_json_str(r#"{"operation":"DELETE"}"#).unwrap();
        assert!(doc.changes().is_empty());
    }

    #[test]
    fn document_rejects_scalars_and_garbage() {
        assert_eq!(
            ChangeLogDocument::from_json_str("42"),
            Err(TypeError::UnexpectedShape("number".into()))
        );
        assert!(matches!(
            ChangeLogDocument::from_json_str("{not json"),
            Err(TypeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn card_serializes_camel_case() {
        let card = RenderedCard {
            title: "Field Name: name".into(),
            old_text: "a".into(),
            new_text: "b".into(),
        };
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({"title": "Field Name: name", "oldText": "a", "newText": "b"})
        );
    }
}
