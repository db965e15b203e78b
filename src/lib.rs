//! Runtime SQL value representation and conversion/comparison engine.
//!
//! Every column value, literal and expression result is a [`Value`], tagged
//! by one of a closed set of [`ValueKind`]s. This crate provides:
//!
//! - the total promotion order over kinds, used to reconcile the operand
//!   types of binary operations ([`ValueKind::higher_order`],
//!   [`TypeInfo::higher`]);
//! - the any-to-any conversion matrix with explicit range checks
//!   ([`Value::convert_to`]);
//! - the NULL-aware comparison protocol, with a total sort order
//!   ([`compare_to`]) and a three-valued predicate order
//!   ([`compare_with_null`]);
//! - an interning cache for small values ([`ValueCache`]).
//!
//! Session-dependent facts (current timestamp, local offset) and external
//! codecs (geometry) are injected through [`CastContext`]; the engine never
//! reads ambient state.

pub mod cache;
pub mod compare;
pub mod convert;
pub mod error;
pub mod types;

pub use cache::ValueCache;
pub use compare::{compare_to, compare_type_safe, compare_with_null};
pub use convert::{CastContext, CastProvider, FixedCastProvider, GeometryCodec};
pub use error::{Error, Result};
pub use types::{
    EnumDomain, ExtTypeInfo, Interval, IntervalQualifier, RowSet, TypeInfo, Value, ValueKind,
};
