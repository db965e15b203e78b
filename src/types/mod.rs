//! Core type definitions: the value kinds, the runtime value itself, data
//! type descriptors, intervals, and extended type metadata.

pub mod ext;
pub mod interval;
pub mod kind;
pub mod type_info;
pub mod value;

pub use ext::{EnumDomain, ExtTypeInfo};
pub use interval::{Interval, IntervalQualifier};
pub use kind::ValueKind;
pub use type_info::TypeInfo;
pub use value::{RowSet, Value};
