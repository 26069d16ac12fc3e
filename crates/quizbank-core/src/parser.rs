//! Bank file parsing and validation.
//!
//! Live bank files come in two shapes: a bare array of questions, or an
//! object wrapping them under `questions`. Backups and remote payloads must
//! be the bare array.

use std::collections::HashMap;

use serde::Deserialize;

use crate::model::Question;

/// The object-wrapped shape of a live bank file.
#[derive(Debug, Deserialize)]
struct WrappedBank {
    #[serde(default)]
    questions: Vec<Question>,
}

/// Parse a live bank file in either accepted shape.
pub fn parse_bank(content: &[u8]) -> Result<Vec<Question>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(content)?;
    if value.is_array() {
        return serde_json::from_value(value);
    }
    let wrapped: WrappedBank = serde_json::from_value(value)?;
    Ok(wrapped.questions)
}

/// Parse a bare array of questions, rejecting any other shape.
///
/// Used for backups and remote payloads, which must be the array form.
pub fn parse_bank_array(content: &[u8]) -> Result<Vec<Question>, String> {
    let value: serde_json::Value =
        serde_json::from_slice(content).map_err(|e| format!("not valid JSON: {e}"))?;
    if !value.is_array() {
        return Err(format!("expected a list of questions, found {}", kind(&value)));
    }
    serde_json::from_value(value).map_err(|e| format!("not a list of questions: {e}"))
}

fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Bank index of the offending question.
    pub index: usize,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for invariant violations and common authoring mistakes.
pub fn validate_bank(bank: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, q) in bank.iter().enumerate() {
        if let Err(message) = q.check() {
            warnings.push(ValidationWarning { index, message });
        } else if q.choices.len() < 2 {
            warnings.push(ValidationWarning {
                index,
                message: "fewer than two choices".into(),
            });
        }

        let key = q.question.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if let Some(first) = seen.get(&key) {
            warnings.push(ValidationWarning {
                index,
                message: format!("duplicate of question {first}"),
            });
        } else {
            seen.insert(key, index);
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::question;

    const BARE: &str = r#"[
  {
    "ksa": "K3",
    "question": "Which agency certifies nursing homes?",
    "choices": ["A. CMS", "B. FDA", "C. OSHA", "D. CDC"],
    "correct_answers": ["A"],
    "explanation": "CMS certifies facilities.",
    "regulations": [{"id": "F580", "section": "483.10(g)", "title": "Notification of Changes"}]
  }
]"#;

    #[test]
    fn parse_bare_array() {
        let bank = parse_bank(BARE.as_bytes()).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank[0].ksa.as_deref(), Some("K3"));
        assert_eq!(bank[0].citations()[0].id, "F580");
    }

    #[test]
    fn parse_wrapped_object() {
        let wrapped = format!(r#"{{"version": 2, "questions": {BARE}}}"#);
        let bank = parse_bank(wrapped.as_bytes()).unwrap();
        assert_eq!(bank.len(), 1);

        let empty = parse_bank(br#"{"other": 1}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn parse_schema_mismatch() {
        assert!(parse_bank(br#"[{"question": 3}]"#).is_err());
        assert!(parse_bank(b"not json").is_err());
    }

    #[test]
    fn array_form_rejects_objects() {
        let err = parse_bank_array(br#"{"not": "a list"}"#).unwrap_err();
        assert!(err.contains("an object"));
        assert!(parse_bank_array(br#"[{"nope": true}]"#).is_err());
        assert_eq!(parse_bank_array(BARE.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn validate_flags_problems() {
        let mut bad = question("Broken", &["F"]);
        bad.choices.truncate(1);
        let bank = vec![
            question("Fine", &["A", "C"]),
            bad,
            question("fine ", &["B"]),
        ];
        let warnings = validate_bank(&bank);
        assert!(warnings
            .iter()
            .any(|w| w.index == 1 && w.message.contains("not among the choices")));
        assert!(warnings
            .iter()
            .any(|w| w.index == 2 && w.message.contains("duplicate of question 0")));
        assert!(!warnings.iter().any(|w| w.index == 0));
    }
}
