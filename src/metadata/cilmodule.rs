//! .NET assemblies as metadata providers.
//!
//! [`CilModule`] owns a loaded PE image and implements [`ModuleMetadata`] on top of it. The
//! metadata is walked on every query through a short-lived [`MetadataView`]:
//!
//! 1. the CLI header, located through the CLR runtime header data directory
//! 2. the metadata root and its stream directory
//! 3. the `#~`, `#Strings` and `#Blob` streams
//! 4. the `Assembly`, `CustomAttribute`, `MemberRef`, `MethodDef`, `TypeRef` and `TypeDef`
//!    tables, and `Field` for the underlying type of enums defined in the image
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotversion::{CilModule, ModuleMetadata};
//! use std::path::Path;
//!
//! let module = CilModule::from_file(Path::new("Service.dll"))?;
//! println!("{} {:?}", module.name(), module.version()?);
//! for attribute in module.attributes()? {
//!     println!("  {} {:?}", attribute.type_name, attribute.value.fixed_args);
//! }
//! # Ok::<(), dotversion::Error>(())
//! ```

use std::path::Path;

use tracing::{debug, warn};

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        customattributes::{parse_custom_attribute_blob, CustomAttribute, TypeResolver},
        root::Root,
        signatures::{
            parse_field_signature, parse_method_signature, SignatureMethod, TypeSignature,
        },
        streams::{Blob, Strings, TablesHeader},
        tables::{
            AssemblyRaw, CodedIndex, CustomAttributeRaw, FieldRaw, MemberRefRaw, MethodDefRaw,
            ModuleRaw, TableId, TypeDefRaw, TypeRefRaw,
        },
    },
    version::{ModuleLocation, ModuleMetadata, Version},
    Error::OutOfBounds,
    Result,
};

/// Resolved references into the streams of one image.
///
/// A view borrows the image it was read from and is cheap to construct: only the headers are
/// parsed, rows and blobs are decoded on access.
pub struct MetadataView<'a> {
    /// The CLI header
    pub cor20header: Cor20Header,
    /// The metadata root
    pub root: Root,
    /// The `#~` stream
    pub tables: TablesHeader<'a>,
    /// The `#Strings` heap
    pub strings: Strings<'a>,
    /// The `#Blob` heap, absent in images without any blobs
    pub blobs: Option<Blob<'a>>,
}

impl<'a> MetadataView<'a> {
    /// Locate the metadata of `file`
    ///
    /// # Errors
    /// Returns an error if the CLI header, the metadata root or one of the required streams is
    /// missing or malformed
    pub fn read(file: &'a File) -> Result<MetadataView<'a>> {
        let (clr_rva, clr_size) = file.clr()?;
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata = file.data_slice(metadata_offset, cor20header.meta_data_size as usize)?;
        let root = Root::read(metadata)?;

        let mut tables = None;
        let mut strings = None;
        let mut blobs = None;

        for stream in &root.stream_headers {
            let start = stream.offset as usize;
            let Some(stream_data) = metadata.get(start..start + stream.size as usize) else {
                return Err(OutOfBounds);
            };

            match stream.name.as_str() {
                "#~" | "#-" => tables = Some(TablesHeader::from(stream_data)?),
                "#Strings" => strings = Some(Strings::from(stream_data)?),
                "#Blob" => blobs = Some(Blob::from(stream_data)?),
                _ => {}
            }
        }

        let Some(tables) = tables else {
            return Err(malformed_error!("Metadata does not contain a #~ stream"));
        };

        let Some(strings) = strings else {
            return Err(malformed_error!("Metadata does not contain a #Strings stream"));
        };

        Ok(MetadataView {
            cor20header,
            root,
            tables,
            strings,
            blobs,
        })
    }

    /// The single row of the `Assembly` table, if this image is an assembly manifest
    #[must_use]
    pub fn assembly(&self) -> Option<AssemblyRaw> {
        self.tables.table::<AssemblyRaw>()?.get(1)
    }

    /// The name of the assembly, or of the module for images without manifest
    ///
    /// # Errors
    /// Returns an error if the name can not be read from `#Strings`
    pub fn name(&self) -> Result<String> {
        if let Some(assembly) = self.assembly() {
            return Ok(self.strings.get(assembly.name as usize)?.to_string());
        }

        match self.tables.table::<ModuleRaw>().and_then(|table| table.get(1)) {
            Some(module) => Ok(self.strings.get(module.name as usize)?.to_string()),
            None => Err(malformed_error!("Metadata contains neither Assembly nor Module")),
        }
    }

    /// Get a blob, the empty blob for index 0
    ///
    /// # Errors
    /// Returns an error if the index lies outside of `#Blob`
    pub fn blob(&self, index: u32) -> Result<&'a [u8]> {
        match &self.blobs {
            Some(blobs) => blobs.get(index as usize),
            None if index == 0 => Ok(&[]),
            None => Err(malformed_error!("Blob index {} without #Blob stream", index)),
        }
    }

    /// The full name of a `TypeDef` or `TypeRef`, `Namespace.Name`
    ///
    /// Nested type references are reported as `Namespace.Outer+Inner`. Returns `None` for
    /// rows which do not exist and for `TypeSpec` references.
    #[must_use]
    pub fn type_name(&self, table: TableId, row: u32) -> Option<String> {
        self.type_name_nested(table, row, 0)
    }

    fn type_name_nested(&self, table: TableId, row: u32, depth: usize) -> Option<String> {
        // Resolution scopes can form cycles in malformed images
        if depth > 16 {
            return None;
        }

        let (scope, namespace, name) = match table {
            TableId::TypeDef => {
                let type_def = self.tables.table::<TypeDefRaw>()?.get(row)?;
                (None, type_def.type_namespace, type_def.type_name)
            }
            TableId::TypeRef => {
                let type_ref = self.tables.table::<TypeRefRaw>()?.get(row)?;
                (
                    Some(type_ref.resolution_scope),
                    type_ref.type_namespace,
                    type_ref.type_name,
                )
            }
            _ => return None,
        };

        let name = self.strings.get(name as usize).ok()?;

        if let Some(scope) = scope {
            if scope.tag == TableId::TypeRef {
                let outer = self.type_name_nested(TableId::TypeRef, scope.row, depth + 1)?;
                return Some(format!("{outer}+{name}"));
            }
        }

        let namespace = self.strings.get(namespace as usize).ok()?;
        if namespace.is_empty() {
            Some(name.to_string())
        } else {
            Some(format!("{namespace}.{name}"))
        }
    }

    /// The `TypeDef` with the full name `full_name`
    #[must_use]
    pub fn type_def_by_name(&self, full_name: &str) -> Option<u32> {
        self.tables
            .table::<TypeDefRaw>()?
            .iter()
            .map(|type_def| type_def.rid)
            .find(|rid| self.type_name(TableId::TypeDef, *rid).as_deref() == Some(full_name))
    }

    /// The underlying type of the enum `type_def`, taken from the signature of its instance
    /// field `value__`
    ///
    /// Returns `None` if the type has no such field, e.g. because it is not an enum.
    #[must_use]
    pub fn underlying_type(&self, type_def: u32) -> Option<TypeSignature> {
        let type_defs = self.tables.table::<TypeDefRaw>()?;
        let fields = self.tables.table::<FieldRaw>()?;

        // A type owns its fields up to the first field of the next type
        let first = type_defs.get(type_def)?.field_list;
        let end = type_def
            .checked_add(1)
            .and_then(|next| type_defs.get(next))
            .map_or(fields.row_count() + 1, |next| next.field_list);

        let value_field = (first..end).filter_map(|rid| fields.get(rid)).find(|field| {
            !field.is_static()
                && self
                    .strings
                    .get(field.name as usize)
                    .is_ok_and(|name| name == "value__")
        })?;

        parse_field_signature(self.blob(value_field.signature).ok()?).ok()
    }

    /// The `TypeDef` owning the method `method_rid`
    #[must_use]
    pub fn method_owner(&self, method_rid: u32) -> Option<u32> {
        let type_defs = self.tables.table::<TypeDefRaw>()?;

        // Method lists are ascending, empty ranges share their start with the next type
        type_defs
            .iter()
            .filter(|type_def| type_def.method_list != 0 && type_def.method_list <= method_rid)
            .last()
            .map(|type_def| type_def.rid)
    }

    /// Resolve an attribute constructor to the full name of the attribute type and the
    /// constructor signature
    ///
    /// # Errors
    /// Returns an error if the constructor row does not exist, or its signature can not be read
    pub fn constructor(&self, constructor: CodedIndex) -> Result<(String, SignatureMethod)> {
        let (owner, signature) = match constructor.tag {
            TableId::MemberRef => {
                let Some(member_ref) = self
                    .tables
                    .table::<MemberRefRaw>()
                    .and_then(|table| table.get(constructor.row))
                else {
                    return Err(malformed_error!("Invalid MemberRef - {}", constructor.row));
                };

                (
                    self.type_name(member_ref.class.tag, member_ref.class.row),
                    member_ref.signature,
                )
            }
            TableId::MethodDef => {
                let Some(method_def) = self
                    .tables
                    .table::<MethodDefRaw>()
                    .and_then(|table| table.get(constructor.row))
                else {
                    return Err(malformed_error!("Invalid MethodDef - {}", constructor.row));
                };

                (
                    self.method_owner(method_def.rid)
                        .and_then(|owner| self.type_name(TableId::TypeDef, owner)),
                    method_def.signature,
                )
            }
            _ => return Err(malformed_error!("Invalid constructor - {:?}", constructor)),
        };

        let Some(owner) = owner else {
            return Err(malformed_error!(
                "Constructor {:?} has no resolvable type",
                constructor
            ));
        };

        Ok((owner, parse_method_signature(self.blob(signature)?)?))
    }

    /// Decode a single custom attribute row
    ///
    /// # Errors
    /// Returns an error if the constructor can not be resolved or the value blob can not be
    /// decoded
    pub fn custom_attribute(&self, row: &CustomAttributeRaw) -> Result<CustomAttribute> {
        let (type_name, signature) = self.constructor(row.constructor)?;
        let value = parse_custom_attribute_blob(
            self.blob(row.value)?,
            &signature.params,
            self,
        )?;

        Ok(CustomAttribute::new(type_name, value))
    }

    /// Decode all custom attributes attached to `parent`, in table order
    ///
    /// Attributes which can not be decoded are skipped.
    #[must_use]
    pub fn custom_attributes(&self, parent: CodedIndex) -> Vec<CustomAttribute> {
        let Some(table) = self.tables.table::<CustomAttributeRaw>() else {
            return Vec::new();
        };

        table
            .iter()
            .filter(|row| row.parent == parent)
            .filter_map(|row| match self.custom_attribute(&row) {
                Ok(attribute) => Some(attribute),
                Err(error) => {
                    warn!(rid = row.rid, error = %error, "skipping undecodable custom attribute");
                    None
                }
            })
            .collect()
    }
}

impl TypeResolver for MetadataView<'_> {
    fn type_name(&self, table: TableId, row: u32) -> Option<String> {
        MetadataView::type_name(self, table, row)
    }

    fn enum_underlying_type(&self, table: TableId, row: u32) -> Option<TypeSignature> {
        match table {
            TableId::TypeDef => self.underlying_type(row),
            // References to enums of this module, e.g. from a netmodule of the same assembly
            TableId::TypeRef => {
                let name = MetadataView::type_name(self, table, row)?;
                self.underlying_type(self.type_def_by_name(&name)?)
            }
            _ => None,
        }
    }

    fn enum_underlying_type_by_name(&self, name: &str) -> Option<TypeSignature> {
        self.underlying_type(self.type_def_by_name(name)?)
    }
}

/// A .NET assembly, loaded from disk or from memory.
///
/// Only the assembly name is read on load; attributes and version are read from the image on
/// every call.
pub struct CilModule {
    file: File,
    name: String,
    location: ModuleLocation,
}

impl CilModule {
    /// Load the assembly at `path`
    ///
    /// # Errors
    /// Returns an error if the file can not be read or is not a .NET assembly
    pub fn from_file(path: &Path) -> Result<CilModule> {
        let file = File::from_file(path)?;
        let location = ModuleLocation::Disk(std::path::absolute(path)?);

        Self::load(file, location)
    }

    /// Load an assembly from memory
    ///
    /// The module is considered dynamic; it has no location.
    ///
    /// # Errors
    /// Returns an error if `data` is not a .NET assembly
    pub fn from_mem(data: Vec<u8>) -> Result<CilModule> {
        let file = File::from_mem(data)?;

        Self::load(file, ModuleLocation::Dynamic)
    }

    fn load(file: File, location: ModuleLocation) -> Result<CilModule> {
        let name = MetadataView::read(&file)?.name()?;
        debug!(name = %name, location = ?location, "loaded module");

        Ok(CilModule {
            file,
            name,
            location,
        })
    }

    /// A fresh view of the metadata of this module
    ///
    /// # Errors
    /// Returns an error if the metadata can not be located
    pub fn view(&self) -> Result<MetadataView<'_>> {
        MetadataView::read(&self.file)
    }

    /// The underlying image
    #[must_use]
    pub fn file(&self) -> &File {
        &self.file
    }
}

impl ModuleMetadata for CilModule {
    fn name(&self) -> String {
        self.name.clone()
    }

    /// The custom attributes of the assembly manifest
    ///
    /// Images without manifest carry no assembly level attributes.
    fn attributes(&self) -> Result<Vec<CustomAttribute>> {
        let view = self.view()?;
        if view.assembly().is_none() {
            return Ok(Vec::new());
        }

        Ok(view.custom_attributes(CodedIndex::new(TableId::Assembly, 1)))
    }

    fn version(&self) -> Result<Option<Version>> {
        Ok(self.view()?.assembly().map(|assembly| {
            Version::new(
                assembly.major_version,
                assembly.minor_version,
                assembly.build_number,
                assembly.revision_number,
            )
        }))
    }

    fn location(&self) -> ModuleLocation {
        self.location.clone()
    }
}
