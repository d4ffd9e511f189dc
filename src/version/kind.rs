//! The kinds of version information a reader can look up.

use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// The kinds of version and descriptive metadata a module can be queried for.
///
/// The numeric labels are stable and exposed through [`VersionKind::code`]. `InformationalVersion`
/// shares its label with [`VersionKind::ProductVersion`] and is available as the alias
/// [`VersionKind::INFORMATIONAL_VERSION`]; both names parse to the same kind.
///
/// ```rust
/// use dotversion::VersionKind;
///
/// assert_eq!(VersionKind::INFORMATIONAL_VERSION, VersionKind::ProductVersion);
/// assert_eq!("company".parse::<VersionKind>()?, VersionKind::Company);
/// assert_eq!(VersionKind::from_code(7), Some(VersionKind::CodeBase));
/// # Ok::<(), strum::ParseError>(())
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum VersionKind {
    /// The file version, `AssemblyFileVersionAttribute`
    FileVersion = 1,
    /// The product version, `AssemblyInformationalVersionAttribute`
    #[default]
    #[strum(to_string = "ProductVersion", serialize = "InformationalVersion")]
    ProductVersion = 2,
    /// The version identity of the module
    AssemblyVersion = 3,
    /// The on-disk path of the module
    Location = 6,
    /// The on-disk path of the module as `file://` URI
    CodeBase = 7,
    /// `AssemblyCompanyAttribute`
    Company = 11,
    /// `AssemblyConfigurationAttribute`
    Configuration = 12,
    /// `AssemblyCopyrightAttribute`
    Copyright = 13,
    /// `AssemblyDescriptionAttribute`
    Description = 14,
    /// `AssemblyProductAttribute`
    Product = 15,
    /// `AssemblyTitleAttribute`
    Title = 16,
    /// `AssemblyTrademarkAttribute`
    Trademark = 17,
}

impl VersionKind {
    /// Alias of [`VersionKind::ProductVersion`], named after the attribute it is read from
    pub const INFORMATIONAL_VERSION: VersionKind = VersionKind::ProductVersion;

    /// The numeric label of this kind
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a kind by its numeric label
    #[must_use]
    pub fn from_code(code: u8) -> Option<VersionKind> {
        use strum::IntoEnumIterator;

        VersionKind::iter().find(|kind| kind.code() == code)
    }

    /// The name used to match attributes during the fallback scan
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}
