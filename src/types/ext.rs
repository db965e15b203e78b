//! Extended type metadata beyond precision and scale

use crate::error::{Error, Result};
use crate::types::kind::ValueKind;
use crate::types::value::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An ordered enumerator label table. The table is shared by reference
/// between a type descriptor and every value of that type, and is never
/// mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDomain(Arc<Vec<String>>);

impl EnumDomain {
    /// Build a domain from its labels. Labels are stored with trailing
    /// spaces trimmed; they must be non-empty and pairwise distinct.
    pub fn new<I, S>(labels: I) -> Result<EnumDomain>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|l| l.into().trim_end().to_string())
            .collect();
        if labels.is_empty() {
            return Err(Error::InvalidValue("ENUM requires at least one label".into()));
        }
        for (i, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(Error::InvalidValue("empty ENUM label".into()));
            }
            if labels[..i].contains(label) {
                return Err(Error::InvalidValue(format!("duplicate ENUM label {label:?}")));
            }
        }
        Ok(EnumDomain(Arc::new(labels)))
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn label(&self, ordinal: i32) -> Option<&str> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| self.0.get(i))
            .map(String::as_str)
    }

    pub fn ordinal(&self, label: &str) -> Option<i32> {
        let label = label.trim_end();
        self.0.iter().position(|l| l == label).map(|i| i as i32)
    }

    /// Shared enumerator domain for a binary operation over two operands.
    /// The left operand's domain keeps its order; labels only the right
    /// operand's domain knows are appended after it.
    pub fn for_binary_operation(left: &Value, right: &Value) -> Result<EnumDomain> {
        match (left, right) {
            (Value::Enum { domain: a, .. }, Value::Enum { domain: b, .. }) => {
                if a == b {
                    Ok(a.clone())
                } else {
                    let mut labels = a.0.as_ref().clone();
                    for label in b.0.iter() {
                        if !labels.contains(label) {
                            labels.push(label.clone());
                        }
                    }
                    EnumDomain::new(labels)
                }
            }
            (Value::Enum { domain, .. }, _) | (_, Value::Enum { domain, .. }) => Ok(domain.clone()),
            _ => Err(Error::DataConversion {
                from: left.kind(),
                to: ValueKind::Enum,
            }),
        }
    }
}

impl PartialEq for EnumDomain {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for EnumDomain {}

impl std::hash::Hash for EnumDomain {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Kind-specific metadata attached to a type descriptor: the enumerator
/// table of an ENUM type, or the SRID constraint of a GEOMETRY type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtTypeInfo {
    Enum(EnumDomain),
    Geometry { srid: Option<i32> },
}

impl ExtTypeInfo {
    /// Re-validate a value of the matching kind against this extension.
    /// Used when converting to a type of the same kind but different
    /// metadata: an enum value is re-resolved by label in the new domain,
    /// a geometry value is checked against the SRID constraint.
    pub fn cast(&self, value: &Value) -> Result<Value> {
        match (self, value) {
            (ExtTypeInfo::Enum(domain), Value::Enum { domain: from, ordinal }) => {
                let label = from.label(*ordinal).ok_or_else(|| Error::InvalidValue(
                    format!("ENUM ordinal {ordinal} has no label"),
                ))?;
                match domain.ordinal(label) {
                    Some(ordinal) => Ok(Value::Enum {
                        domain: domain.clone(),
                        ordinal,
                    }),
                    None => Err(Error::DataConversion {
                        from: ValueKind::Enum,
                        to: ValueKind::Enum,
                    }),
                }
            }
            (ExtTypeInfo::Geometry { srid: Some(srid) }, Value::Geometry { srid: actual, .. })
                if srid != actual =>
            {
                Err(Error::DataConversion {
                    from: ValueKind::Geometry,
                    to: ValueKind::Geometry,
                })
            }
            (ExtTypeInfo::Geometry { .. }, Value::Geometry { .. }) => Ok(value.clone()),
            _ => Err(Error::DataConversion {
                from: value.kind(),
                to: value.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_lookup() {
        let domain = EnumDomain::new(["RED", "GREEN", "BLUE"]).unwrap();
        assert_eq!(domain.ordinal("GREEN"), Some(1));
        assert_eq!(domain.ordinal("GREEN  "), Some(1));
        assert_eq!(domain.label(2), Some("BLUE"));
        assert_eq!(domain.ordinal("PINK"), None);
        assert_eq!(domain.label(-1), None);
    }

    #[test]
    fn test_domain_rejects_duplicates() {
        assert!(EnumDomain::new(["A", "A "]).is_err());
        assert!(EnumDomain::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_binary_operation_merges_domains() {
        let a = EnumDomain::new(["RED", "GREEN"]).unwrap();
        let b = EnumDomain::new(["BLUE", "RED"]).unwrap();
        let left = Value::Enum { domain: a, ordinal: 0 };
        let right = Value::Enum { domain: b, ordinal: 0 };
        let merged = EnumDomain::for_binary_operation(&left, &right).unwrap();
        assert_eq!(merged.labels(), ["RED", "GREEN", "BLUE"]);
    }

    #[test]
    fn test_enum_recast() {
        let a = EnumDomain::new(["RED", "GREEN"]).unwrap();
        let b = EnumDomain::new(["GREEN", "RED"]).unwrap();
        let v = Value::Enum { domain: a, ordinal: 1 };
        let recast = ExtTypeInfo::Enum(b).cast(&v).unwrap();
        assert_eq!(recast, Value::Enum {
            domain: EnumDomain::new(["GREEN", "RED"]).unwrap(),
            ordinal: 0,
        });
    }
}
