//! # dotversion Prelude
//!
//! The types needed to read version metadata from a module, for glob imports.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotversion operations
pub use crate::Error;

/// The result type used throughout dotversion
pub use crate::Result;

// ================================================================================================
// Reader
// ================================================================================================

pub use crate::version::{VersionInfo, VersionKind};

// ================================================================================================
// Providers
// ================================================================================================

pub use crate::version::{ModuleInfo, ModuleLocation, ModuleMetadata, ModuleRc, Version};

/// .NET assemblies loaded from disk or memory
pub use crate::CilModule;

// ================================================================================================
// Custom Attributes
// ================================================================================================

pub use crate::metadata::customattributes::{CustomAttribute, CustomAttributeArgument};
