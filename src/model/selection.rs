use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::candidate::CandidateId;

/// One entry on a ballot, exactly as the caller supplied it.
///
/// Callers are not trusted to send well-formed IDs, so a selection may hold
/// any JSON value. Use [`Selection::normalize`] to obtain the canonical
/// [`CandidateId`], if there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    /// An integer, possibly out of range for a candidate ID.
    Integer(i64),
    /// Text, which only names a candidate if it is a canonical decimal ID.
    Text(String),
    /// Anything else: floats, booleans, null, arrays, objects.
    Other(Value),
}

impl Selection {
    /// Convert to the canonical ID type. Returns `None` for anything that can
    /// never be a candidate ID.
    pub fn normalize(&self) -> Option<CandidateId> {
        match self {
            Self::Integer(n) => u32::try_from(*n).ok().map(CandidateId),
            Self::Text(text) => {
                let id = text.parse::<u32>().ok()?;
                // Reject "+4", "04" and friends; only the canonical form names a candidate.
                (id.to_string() == *text).then_some(CandidateId(id))
            }
            Self::Other(_) => None,
        }
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<CandidateId> for Selection {
    fn from(id: CandidateId) -> Self {
        Self::Integer(id.0.into())
    }
}

impl From<i32> for Selection {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<i64> for Selection {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<u32> for Selection {
    fn from(n: u32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<&str> for Selection {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Selection {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for Selection {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(n) => Self::Integer(n),
                None => Self::Other(Value::Number(n)),
            },
            Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn integers_normalize_when_in_range() {
        assert_eq!(Selection::from(4).normalize(), Some(CandidateId(4)));
        assert_eq!(Selection::from(0).normalize(), Some(CandidateId(0)));
        assert_eq!(Selection::from(-1).normalize(), None);
        assert_eq!(Selection::from(i64::from(u32::MAX) + 1).normalize(), None);
    }

    #[test]
    fn only_canonical_text_normalizes() {
        assert_eq!(Selection::from("4").normalize(), Some(CandidateId(4)));
        assert_eq!(Selection::from("04").normalize(), None);
        assert_eq!(Selection::from("+4").normalize(), None);
        assert_eq!(Selection::from(" 4").normalize(), None);
        assert_eq!(Selection::from("invalidIndex").normalize(), None);
        assert_eq!(Selection::from("").normalize(), None);
    }

    #[test]
    fn other_values_never_normalize() {
        assert_eq!(Selection::from(json!(1.5)).normalize(), None);
        assert_eq!(Selection::from(json!(true)).normalize(), None);
        assert_eq!(Selection::from(json!(null)).normalize(), None);
        assert_eq!(Selection::from(json!([1])).normalize(), None);
    }

    #[test]
    fn deserialize_mixed_ballot() {
        let ballot: Vec<Selection> = serde_json::from_str(r#"[1, "4", "lol", 1.5, null]"#).unwrap();
        assert_eq!(
            ballot,
            vec![
                Selection::Integer(1),
                Selection::Text("4".to_string()),
                Selection::Text("lol".to_string()),
                Selection::Other(json!(1.5)),
                Selection::Other(Value::Null),
            ]
        );
    }

    #[test]
    fn display() {
        assert_eq!(Selection::from(3).to_string(), "3");
        assert_eq!(Selection::from("lol").to_string(), "\"lol\"");
        assert_eq!(Selection::from(json!(1.5)).to_string(), "1.5");
    }
}
