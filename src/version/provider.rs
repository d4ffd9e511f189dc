//! The provider abstraction: modules that can report their build metadata.

use std::{fmt, path::PathBuf, sync::Arc};

use crate::{metadata::customattributes::CustomAttribute, Result};

/// A shared, dynamically dispatched module.
pub type ModuleRc = Arc<dyn ModuleMetadata>;

/// The built-in version identity of a module, `major.minor.build.revision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl Version {
    /// Create a new version
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Version {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Where a module was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModuleLocation {
    /// Created in memory; there is no backing file
    Dynamic,
    /// Loaded from the given file
    Disk(PathBuf),
    /// Not known
    #[default]
    Unknown,
}

impl ModuleLocation {
    /// The on-disk path, if any
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ModuleLocation::Disk(path) => Some(path),
            _ => None,
        }
    }
}

/// Access to the build-time metadata of a loaded module.
///
/// Implementations read their data live on every call. Missing metadata is not an error:
/// a module without version identity returns `Ok(None)` from [`ModuleMetadata::version`], one
/// without attributes an empty list.
pub trait ModuleMetadata: Send + Sync {
    /// The simple name of the module
    fn name(&self) -> String;

    /// The module level custom attributes, in declaration order
    ///
    /// # Errors
    /// Returns an error if the metadata backing this module can not be read
    fn attributes(&self) -> Result<Vec<CustomAttribute>>;

    /// The version identity of the module
    ///
    /// # Errors
    /// Returns an error if the metadata backing this module can not be read
    fn version(&self) -> Result<Option<Version>>;

    /// Where the module was loaded from
    fn location(&self) -> ModuleLocation;

    /// Returns true if the module has no backing file
    fn is_dynamic(&self) -> bool {
        self.location() == ModuleLocation::Dynamic
    }
}
