//! Modules described in code, and the module describing this crate.

use std::sync::{Arc, OnceLock};

use crate::{
    metadata::customattributes::{CustomAttribute, CustomAttributeArgument, CustomAttributeValue},
    version::{ModuleLocation, ModuleMetadata, ModuleRc, Version},
    Result,
};

/// Describe the calling crate as a [`ModuleInfo`].
///
/// The description is taken from the Cargo package metadata of the crate the macro is expanded
/// in, see [`ModuleInfo::from_package`].
///
/// ```rust
/// use dotversion::{crate_module, VersionInfo, VersionKind};
/// use std::sync::Arc;
///
/// let info = VersionInfo::from(Arc::new(crate_module!()) as dotversion::ModuleRc);
/// assert_eq!(info.get_version(VersionKind::Product), "dotversion");
/// ```
#[macro_export]
macro_rules! crate_module {
    () => {
        $crate::ModuleInfo::from_package(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION"),
            env!("CARGO_PKG_AUTHORS"),
            if cfg!(debug_assertions) {
                "Debug"
            } else {
                "Release"
            },
        )
    };
}

/// A module described in code rather than read from an image.
///
/// Used for the crate itself (see [`ModuleInfo::current`]), for Rust binaries that want to
/// report their own build metadata, and as a stand-in module in tests.
///
/// ```rust
/// use dotversion::{ModuleInfo, ModuleLocation, Version, VersionInfo, VersionKind};
/// use std::sync::Arc;
///
/// let module = ModuleInfo::new("Service")
///     .with_version(Version::new(2, 1, 0, 0))
///     .with_location(ModuleLocation::Dynamic)
///     .with_string_attribute("System.Reflection.AssemblyCompanyAttribute", "Acme");
///
/// let info = VersionInfo::from(Arc::new(module) as dotversion::ModuleRc);
/// assert_eq!(info.get_version(VersionKind::AssemblyVersion), "2.1.0.0");
/// assert_eq!(info.get_version(VersionKind::Company), "Acme");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleInfo {
    name: String,
    version: Option<Version>,
    location: ModuleLocation,
    attributes: Vec<CustomAttribute>,
}

impl ModuleInfo {
    /// Create a module named `name`, without version, location or attributes
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ModuleInfo {
            name: name.into(),
            ..ModuleInfo::default()
        }
    }

    /// Set the version identity
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the location
    #[must_use]
    pub fn with_location(mut self, location: ModuleLocation) -> Self {
        self.location = location;
        self
    }

    /// Append a custom attribute
    #[must_use]
    pub fn with_attribute(mut self, attribute: CustomAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Append a custom attribute with a single string constructor argument
    #[must_use]
    pub fn with_string_attribute(self, type_name: &str, value: impl Into<String>) -> Self {
        self.with_attribute(CustomAttribute::new(
            type_name,
            CustomAttributeValue {
                fixed_args: vec![CustomAttributeArgument::String(value.into())],
                named_args: Vec::new(),
            },
        ))
    }

    /// Describe a Cargo package
    ///
    /// The package version becomes the informational version as is. Its semver core becomes
    /// the version identity and file version, provided every part fits a `u16`. Authors are reported as company,
    /// the package name as product and title. The location is the running executable.
    ///
    /// ## Arguments
    /// * `name`          - Package name
    /// * `version`       - Package version, semver
    /// * `description`   - Package description, may be empty
    /// * `authors`       - Colon separated list of authors, as in `CARGO_PKG_AUTHORS`
    /// * `configuration` - Build configuration, e.g. `Debug` or `Release`
    #[must_use]
    pub fn from_package(
        name: &str,
        version: &str,
        description: &str,
        authors: &str,
        configuration: &str,
    ) -> Self {
        let numeric_version = semver::Version::parse(version)
            .ok()
            .and_then(|package| {
                Some(Version::new(
                    u16::try_from(package.major).ok()?,
                    u16::try_from(package.minor).ok()?,
                    u16::try_from(package.patch).ok()?,
                    0,
                ))
            });

        let location = match std::env::current_exe() {
            Ok(path) => ModuleLocation::Disk(path),
            Err(_) => ModuleLocation::Unknown,
        };

        let mut module = ModuleInfo::new(name).with_location(location);

        if !authors.is_empty() {
            let company = authors.split(':').collect::<Vec<_>>().join(", ");
            module = module.with_string_attribute(COMPANY, company);
        }

        module = module.with_string_attribute(CONFIGURATION, configuration);

        if !description.is_empty() {
            module = module.with_string_attribute(DESCRIPTION, description);
        }

        if let Some(numeric_version) = numeric_version {
            module = module
                .with_version(numeric_version)
                .with_string_attribute(FILE_VERSION, numeric_version.to_string());
        }

        module
            .with_string_attribute(INFORMATIONAL_VERSION, version)
            .with_string_attribute(PRODUCT, name)
            .with_string_attribute(TITLE, name)
    }

    /// The module describing this crate
    ///
    /// The same instance is returned on every call.
    #[must_use]
    pub fn current() -> ModuleRc {
        static CURRENT: OnceLock<ModuleRc> = OnceLock::new();

        CURRENT
            .get_or_init(|| Arc::new(crate::crate_module!()))
            .clone()
    }
}

const COMPANY: &str = "System.Reflection.AssemblyCompanyAttribute";
const CONFIGURATION: &str = "System.Reflection.AssemblyConfigurationAttribute";
const DESCRIPTION: &str = "System.Reflection.AssemblyDescriptionAttribute";
const FILE_VERSION: &str = "System.Reflection.AssemblyFileVersionAttribute";
const INFORMATIONAL_VERSION: &str = "System.Reflection.AssemblyInformationalVersionAttribute";
const PRODUCT: &str = "System.Reflection.AssemblyProductAttribute";
const TITLE: &str = "System.Reflection.AssemblyTitleAttribute";

impl ModuleMetadata for ModuleInfo {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Result<Vec<CustomAttribute>> {
        Ok(self.attributes.clone())
    }

    fn version(&self) -> Result<Option<Version>> {
        Ok(self.version)
    }

    fn location(&self) -> ModuleLocation {
        self.location.clone()
    }
}
