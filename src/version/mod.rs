//! Version and descriptive metadata of modules.
//!
//! [`VersionInfo`] answers queries for a [`VersionKind`] against a bound module. Modules are
//! anything implementing [`ModuleMetadata`]:
//!
//! - [`crate::CilModule`] - a .NET assembly read from disk or memory
//! - [`ModuleInfo`] - a module described in code, e.g. this crate itself
//!
//! # Lookup
//!
//! The kinds `FileVersion`, `ProductVersion`, `AssemblyVersion`, `Location` and `CodeBase` have
//! dedicated sources. For all others, and whenever a dedicated source comes up empty, the
//! module attributes are scanned by name: `Company` is answered by
//! `System.Reflection.AssemblyCompanyAttribute`, `CompanyAttribute` or `Company`, whichever is
//! declared first with a constructor argument.
//!
//! # Examples
//!
//! ```rust
//! use dotversion::{VersionInfo, VersionKind};
//!
//! // Without a module, the reader describes this crate
//! let info = VersionInfo::default();
//! assert_eq!(info.get_version(VersionKind::ProductVersion), env!("CARGO_PKG_VERSION"));
//! assert_eq!(info.get_version(VersionKind::Title), "dotversion");
//! ```

mod info;
mod kind;
mod module;
mod provider;

pub use info::{normalize_attribute_name, VersionInfo};
pub use kind::VersionKind;
pub use module::ModuleInfo;
pub use provider::{ModuleLocation, ModuleMetadata, ModuleRc, Version};
