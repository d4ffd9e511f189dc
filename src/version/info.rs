//! [`VersionInfo`], the version reader bound to a module.

use std::{fmt, sync::Arc};

use strum::IntoEnumIterator;
use tracing::{debug, warn};
use url::Url;

use crate::{
    metadata::customattributes::CustomAttribute,
    version::{ModuleInfo, ModuleLocation, ModuleRc, VersionKind},
    Error, Result,
};

/// Namespace and type name prefix of the well-known assembly attributes
const ATTRIBUTE_PREFIX: &str = "System.Reflection.Assembly";
/// Type name suffix of attribute types
const ATTRIBUTE_SUFFIX: &str = "Attribute";

const FILE_VERSION_ATTRIBUTE: &str = "System.Reflection.AssemblyFileVersionAttribute";
const INFORMATIONAL_VERSION_ATTRIBUTE: &str =
    "System.Reflection.AssemblyInformationalVersionAttribute";

/// Reads version and descriptive metadata of a module.
///
/// Every query goes to the bound module; nothing is cached. Absent metadata is reported as
/// `None` by the typed accessors and as an empty string by [`VersionInfo::get_version`].
///
/// # Examples
///
/// ```rust,no_run
/// use dotversion::{CilModule, ModuleRc, VersionInfo, VersionKind};
/// use std::{path::Path, sync::Arc};
///
/// let module: ModuleRc = Arc::new(CilModule::from_file(Path::new("Service.dll"))?);
/// let info = VersionInfo::from(module);
///
/// println!("File version:    {}", info.get_version(VersionKind::FileVersion));
/// println!("Product version: {}", info.get_version(VersionKind::ProductVersion));
/// println!("Company:         {}", info.get_version(VersionKind::Company));
/// # Ok::<(), dotversion::Error>(())
/// ```
#[derive(Clone)]
pub struct VersionInfo {
    module: ModuleRc,
    kind: VersionKind,
}

impl VersionInfo {
    /// Create a reader bound to `module`
    ///
    /// Without a module, the reader is bound to this crate's own module, see
    /// [`ModuleInfo::current`].
    #[must_use]
    pub fn new(module: Option<ModuleRc>) -> Self {
        VersionInfo {
            module: module.unwrap_or_else(ModuleInfo::current),
            kind: VersionKind::default(),
        }
    }

    /// The bound module
    #[must_use]
    pub fn module(&self) -> &ModuleRc {
        &self.module
    }

    /// Bind the reader to another module
    pub fn set_module(&mut self, module: ModuleRc) {
        self.module = module;
    }

    /// The kind queried by [`VersionInfo::version`]
    #[must_use]
    pub fn kind(&self) -> VersionKind {
        self.kind
    }

    /// Set the kind queried by [`VersionInfo::version`]
    pub fn set_kind(&mut self, kind: VersionKind) {
        self.kind = kind;
    }

    /// Query the default kind, see [`VersionInfo::get_version`]
    #[must_use]
    pub fn version(&self) -> String {
        self.get_version(self.kind)
    }

    /// The first argument of `AssemblyFileVersionAttribute`
    ///
    /// # Errors
    /// Returns an error if the attributes of the module can not be read
    pub fn file_version(&self) -> Result<Option<String>> {
        self.attribute_value(FILE_VERSION_ATTRIBUTE)
    }

    /// The first argument of `AssemblyInformationalVersionAttribute`
    ///
    /// # Errors
    /// Returns an error if the attributes of the module can not be read
    pub fn product_version(&self) -> Result<Option<String>> {
        self.attribute_value(INFORMATIONAL_VERSION_ATTRIBUTE)
    }

    /// The version identity of the module, dotted
    ///
    /// # Errors
    /// Returns an error if the metadata of the module can not be read
    pub fn assembly_version(&self) -> Result<Option<String>> {
        Ok(self.module.version()?.map(|version| version.to_string()))
    }

    /// The on-disk location of the module as `file://` URI
    ///
    /// `None` for dynamic modules and modules of unknown origin.
    #[must_use]
    pub fn code_base(&self) -> Option<String> {
        let location = self.module.location();
        let path = location.path()?;

        Url::from_file_path(path).ok().map(String::from)
    }

    /// The on-disk location of the module
    ///
    /// `None` for dynamic modules and modules of unknown origin.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.module
            .location()
            .path()
            .map(|path| path.display().to_string())
    }

    /// Look up `kind`
    ///
    /// Kinds with a dedicated accessor are answered by it. If that yields nothing, the module
    /// attributes are scanned for one whose type name, without the `System.Reflection.Assembly`
    /// prefix and `Attribute` suffix, equals the kind name (ignoring case). The first such
    /// attribute with at least one constructor argument provides the value.
    ///
    /// The location of a dynamic module is never looked up in the attributes.
    ///
    /// # Errors
    /// Returns an error if the module metadata can not be read, or
    /// [`crate::Error::NullAttributeValue`] if the matching attribute has a null argument
    pub fn lookup(&self, kind: VersionKind) -> Result<Option<String>> {
        let direct = match kind {
            VersionKind::FileVersion => self.file_version()?,
            VersionKind::ProductVersion => self.product_version()?,
            VersionKind::AssemblyVersion => self.assembly_version()?,
            VersionKind::CodeBase => self.code_base(),
            VersionKind::Location => {
                if self.module.location() == ModuleLocation::Dynamic {
                    return Ok(None);
                }
                self.location()
            }
            _ => None,
        };

        if direct.as_deref().is_some_and(|value| !value.is_empty()) {
            return Ok(direct);
        }

        match self.scan(kind)? {
            Some(value) => Ok(Some(value)),
            None => Ok(direct),
        }
    }

    /// Look up `kind`, as a string
    ///
    /// Absent metadata yields an empty string. Errors are logged and yield an empty string as
    /// well; use [`VersionInfo::lookup`] to tell them apart.
    #[must_use]
    pub fn get_version(&self, kind: VersionKind) -> String {
        match self.lookup(kind) {
            Ok(value) => value.unwrap_or_default(),
            Err(error) => {
                warn!(
                    module = %self.module.name(),
                    kind = %kind,
                    error = %error,
                    "failed to read version metadata"
                );
                String::new()
            }
        }
    }

    /// Every kind together with its value, in label order
    #[must_use]
    pub fn entries(&self) -> Vec<(VersionKind, String)> {
        VersionKind::iter()
            .map(|kind| (kind, self.get_version(kind)))
            .collect()
    }

    fn attribute_value(&self, type_name: &str) -> Result<Option<String>> {
        let attributes = self.module.attributes()?;

        Ok(attributes
            .iter()
            .find(|attribute| attribute.type_name == type_name)
            .and_then(CustomAttribute::first_argument)
            .filter(|argument| !argument.is_null())
            .map(ToString::to_string))
    }

    fn scan(&self, kind: VersionKind) -> Result<Option<String>> {
        let kind_name = kind.name().to_lowercase();

        for attribute in self.module.attributes()? {
            if normalize_attribute_name(&attribute.type_name) != kind_name {
                continue;
            }

            let Some(argument) = attribute.first_argument() else {
                continue;
            };

            if argument.is_null() {
                return Err(Error::NullAttributeValue(attribute.type_name));
            }

            debug!(
                kind = %kind,
                attribute = %attribute.type_name,
                "resolved through attribute scan"
            );
            return Ok(Some(argument.to_string()));
        }

        Ok(None)
    }
}

/// Reduce an attribute type name to the kind name it describes, lower case
///
/// `System.Reflection.AssemblyCompanyAttribute`, `CompanyAttribute` and `Company` all reduce
/// to `company`.
#[must_use]
pub fn normalize_attribute_name(type_name: &str) -> String {
    let name = type_name.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(type_name);
    let name = name.strip_suffix(ATTRIBUTE_SUFFIX).unwrap_or(name);

    name.to_lowercase()
}

impl Default for VersionInfo {
    fn default() -> Self {
        VersionInfo::new(None)
    }
}

impl From<ModuleRc> for VersionInfo {
    fn from(module: ModuleRc) -> Self {
        VersionInfo::new(Some(module))
    }
}

impl fmt::Debug for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionInfo")
            .field("module", &self.module.name())
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for VersionInfo {
    /// Readers are equal if they are bound to the same module instance and default kind
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.module, &other.module) && self.kind == other.kind
    }
}
