//! Data type descriptors: kind plus precision, scale and extended metadata

use crate::error::Result;
use crate::types::ext::ExtTypeInfo;
use crate::types::kind::ValueKind;
use serde::{Deserialize, Serialize};

/// A data type descriptor. Precision and scale are zero for kinds that do
/// not carry them; `ext` holds kind-specific metadata (enum labels,
/// geometry SRID) shared by reference with the values of the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub kind: ValueKind,
    pub precision: u32,
    pub scale: u32,
    pub ext: Option<ExtTypeInfo>,
}

impl TypeInfo {
    pub fn new(kind: ValueKind) -> TypeInfo {
        TypeInfo {
            kind,
            precision: 0,
            scale: 0,
            ext: None,
        }
    }

    pub fn with_precision(kind: ValueKind, precision: u32, scale: u32) -> TypeInfo {
        TypeInfo {
            kind,
            precision,
            scale,
            ext: None,
        }
    }

    /// Promotion target descriptor for two operand types: the higher-ranked
    /// kind, element-wise maximum precision and scale, and the extended
    /// metadata of whichever operand's kind won (ties prefer the first
    /// operand's extension when present).
    pub fn higher(t1: &TypeInfo, t2: &TypeInfo) -> Result<TypeInfo> {
        let kind = ValueKind::higher_order(t1.kind, t2.kind)?;
        let ext = if kind == t1.kind && t1.ext.is_some() {
            t1.ext.clone()
        } else if kind == t2.kind {
            t2.ext.clone()
        } else {
            None
        };
        Ok(TypeInfo {
            kind,
            precision: t1.precision.max(t2.precision),
            scale: t1.scale.max(t2.scale),
            ext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ext::EnumDomain;

    #[test]
    fn test_higher_merges_precision_and_scale() {
        let a = TypeInfo::with_precision(ValueKind::Numeric, 10, 2);
        let b = TypeInfo::with_precision(ValueKind::BigInt, 19, 0);
        let higher = TypeInfo::higher(&a, &b).unwrap();
        assert_eq!(higher.kind, ValueKind::Numeric);
        assert_eq!((higher.precision, higher.scale), (19, 2));
    }

    #[test]
    fn test_higher_inherits_winning_ext() {
        let domain = EnumDomain::new(["A", "B"]).unwrap();
        let mut a = TypeInfo::new(ValueKind::Enum);
        a.ext = Some(ExtTypeInfo::Enum(domain.clone()));
        let b = TypeInfo::new(ValueKind::Varchar);
        let higher = TypeInfo::higher(&b, &a).unwrap();
        assert_eq!(higher.kind, ValueKind::Enum);
        assert_eq!(higher.ext, Some(ExtTypeInfo::Enum(domain)));
    }
}
