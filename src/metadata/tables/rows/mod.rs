//! Raw row types for the tables read by this crate.
//!
//! Only the tables needed to resolve assembly level custom attributes are decoded; all other
//! tables are sized through their column schema and skipped.

mod assembly;
mod customattribute;
mod field;
mod memberref;
mod methoddef;
mod module;
mod typedef;
mod typeref;

pub use assembly::AssemblyRaw;
pub use customattribute::CustomAttributeRaw;
pub use field::{FieldRaw, FIELD_STATIC};
pub use memberref::MemberRefRaw;
pub use methoddef::MethodDefRaw;
pub use module::ModuleRaw;
pub use typedef::TypeDefRaw;
pub use typeref::TypeRefRaw;
