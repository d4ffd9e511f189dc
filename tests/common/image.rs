//! Synthetic .NET images.
//!
//! [`ImageBuilder`] lays out a minimal PE32 file with a single `.text` section holding the CLI
//! header and the metadata. Table and coded indexes are always 2 bytes wide. Heap indexes are
//! 2 bytes, or 4 bytes for builders created through [`ImageBuilder::large_heaps`].

use std::collections::{BTreeMap, HashMap};

/// Table numbers of the tables the builder can populate
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Table {
    Module = 0x00,
    TypeRef = 0x01,
    TypeDef = 0x02,
    Field = 0x04,
    MethodDef = 0x06,
    MemberRef = 0x0A,
    CustomAttribute = 0x0C,
    Assembly = 0x20,
    AssemblyRef = 0x23,
}

#[derive(Clone, Copy, Debug)]
enum Cell {
    U16(u16),
    U32(u32),
    Heap(u32),
}

/// A single table row
#[derive(Clone, Debug, Default)]
pub struct Row(Vec<Cell>);

impl Row {
    pub fn new() -> Row {
        Row::default()
    }

    /// A 2 byte constant, table index or coded index
    pub fn u16(mut self, value: u16) -> Row {
        self.0.push(Cell::U16(value));
        self
    }

    /// A 4 byte constant
    pub fn u32(mut self, value: u32) -> Row {
        self.0.push(Cell::U32(value));
        self
    }

    /// A `#Strings`, `#Blob` or `#GUID` index
    pub fn heap(mut self, index: u32) -> Row {
        self.0.push(Cell::Heap(index));
        self
    }

    fn write(&self, stream: &mut Vec<u8>, large_heaps: bool) {
        for cell in &self.0 {
            match *cell {
                Cell::U16(value) => stream.extend_from_slice(&value.to_le_bytes()),
                Cell::U32(value) => stream.extend_from_slice(&value.to_le_bytes()),
                Cell::Heap(index) if large_heaps => stream.extend_from_slice(&index.to_le_bytes()),
                Cell::Heap(index) => {
                    let index = u16::try_from(index).expect("heap index needs large heaps");
                    stream.extend_from_slice(&index.to_le_bytes());
                }
            }
        }
    }
}

/// Builder for a minimal PE32 image carrying ECMA-335 metadata
#[derive(Clone, Debug)]
pub struct ImageBuilder {
    strings: Vec<u8>,
    string_index: HashMap<String, u32>,
    blobs: Vec<u8>,
    tables: BTreeMap<Table, Vec<Row>>,
    large_heaps: bool,
    extra_streams: Vec<(String, Vec<u8>)>,
}

const PE_OFFSET: usize = 0x80;
const SECTION_TABLE_OFFSET: usize = 0x178;
const HEADERS_SIZE: usize = 0x200;
const TEXT_RVA: u32 = 0x2000;
const CLI_HEADER_SIZE: usize = 72;
const FILE_ALIGNMENT: usize = 0x200;
const RUNTIME_VERSION: &[u8; 12] = b"v4.0.30319\0\0";

impl ImageBuilder {
    /// File offset of the CLR runtime header data directory
    pub const CLR_DIRECTORY_OFFSET: usize = 0x168;
    /// File offset of the CLI header
    pub const CLI_HEADER_OFFSET: usize = HEADERS_SIZE;
    /// File offset of the metadata root
    pub const METADATA_OFFSET: usize = HEADERS_SIZE + CLI_HEADER_SIZE;

    /// `HasCustomAttribute` coded index of Assembly #1
    pub const ASSEMBLY_PARENT: u16 = (1 << 5) | 14;
    /// `HasCustomAttribute` coded index of Module #1
    pub const MODULE_PARENT: u16 = (1 << 5) | 7;
    /// `ResolutionScope` coded index of AssemblyRef #1
    pub const MSCORLIB_SCOPE: u16 = (1 << 2) | 2;

    /// `instance void .ctor()`
    pub const CTOR_VOID: &[u8] = &[0x20, 0x00, 0x01];
    /// `instance void .ctor(string)`
    pub const CTOR_STRING: &[u8] = &[0x20, 0x01, 0x01, 0x0E];
    /// `instance void .ctor(int32)`
    pub const CTOR_INT: &[u8] = &[0x20, 0x01, 0x01, 0x08];

    /// `FieldAttributes` of the `value__` field of an enum
    pub const ENUM_VALUE_FIELD: u16 = 0x0606;

    /// An image with empty heaps and no table rows
    pub fn new() -> ImageBuilder {
        ImageBuilder {
            strings: vec![0],
            string_index: HashMap::new(),
            blobs: vec![0],
            tables: BTreeMap::new(),
            large_heaps: false,
            extra_streams: Vec::new(),
        }
    }

    /// An image with 4 byte heap indexes
    ///
    /// `#Strings` and `#Blob` start with 64 KiB of empty entries, so every index handed out
    /// exceeds the 2 byte range.
    pub fn large_heaps() -> ImageBuilder {
        let mut builder = ImageBuilder::new();
        builder.large_heaps = true;
        builder.strings.resize(0x1_0000, 0);
        builder.blobs.resize(0x1_0000, 0);
        builder
    }

    /// [`ImageBuilder::sample`], laid out with 4 byte heap indexes
    pub fn sample_large_heaps() -> ImageBuilder {
        Self::populate(ImageBuilder::large_heaps())
    }

    /// A class library `Sample` 1.2.3.4 referencing `mscorlib`, carrying:
    ///
    /// 1. `CompilationRelaxations(8)`
    /// 2. `RuntimeCompatibility(WrapNonExceptionThrows = true)`
    /// 3. `AssemblyCompany("Acme Corp")`
    /// 4. `AssemblyFileVersion("1.2.3.0")`
    /// 5. `AssemblyInformationalVersion("1.2.3-beta+5f2e")`
    /// 6. `AssemblyTitle("Sample Library")`
    /// 7. `AssemblyTrademark(null)`
    /// 8. `Sample.BuildStamp("2024-05-01")`, constructed through a `MethodDef`
    ///
    /// plus `UnverifiableCode` on the module, which is not an assembly level attribute.
    pub fn sample() -> ImageBuilder {
        Self::populate(ImageBuilder::new())
    }

    fn populate(mut builder: ImageBuilder) -> ImageBuilder {
        let module_name = builder.string("Sample.dll");
        builder.row(
            Table::Module,
            Row::new().u16(0).heap(module_name).heap(1).heap(0).heap(0),
        );

        let mscorlib = builder.string("mscorlib");
        builder.row(
            Table::AssemblyRef,
            Row::new()
                .u16(4)
                .u16(0)
                .u16(0)
                .u16(0)
                .u32(0)
                .heap(0)
                .heap(mscorlib)
                .heap(0)
                .heap(0),
        );

        let sample = builder.string("Sample");
        builder.row(
            Table::Assembly,
            Row::new()
                .u32(0x8004)
                .u16(1)
                .u16(2)
                .u16(3)
                .u16(4)
                .u32(0)
                .heap(0)
                .heap(sample)
                .heap(0),
        );

        let system_attribute = builder.type_ref(Self::MSCORLIB_SCOPE, "System", "Attribute");
        let module_type = builder.string("<Module>");
        builder.row(
            Table::TypeDef,
            Row::new().u32(0).heap(module_type).heap(0).u16(0).u16(1).u16(1),
        );
        let build_stamp = builder.string("BuildStampAttribute");
        builder.row(
            Table::TypeDef,
            Row::new()
                .u32(0x0010_0101)
                .heap(build_stamp)
                .heap(sample)
                .u16((system_attribute << 2) | 1)
                .u16(1)
                .u16(1),
        );

        let ctor = builder.string(".ctor");
        let ctor_signature = builder.blob(Self::CTOR_STRING);
        let build_stamp_ctor = builder.row(
            Table::MethodDef,
            Row::new()
                .u32(0)
                .u16(0)
                .u16(0x1886)
                .heap(ctor)
                .heap(ctor_signature)
                .u16(1),
        );

        let unverifiable = builder.member_ref_ctor(
            "System.Security",
            "UnverifiableCodeAttribute",
            Self::CTOR_VOID,
        );
        builder.attribute(Self::MODULE_PARENT, unverifiable, &[0x01, 0x00, 0x00, 0x00]);

        let relaxations = builder.member_ref_ctor(
            "System.Runtime.CompilerServices",
            "CompilationRelaxationsAttribute",
            Self::CTOR_INT,
        );
        builder.attribute(
            Self::ASSEMBLY_PARENT,
            relaxations,
            &[0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00],
        );

        let compatibility = builder.member_ref_ctor(
            "System.Runtime.CompilerServices",
            "RuntimeCompatibilityAttribute",
            Self::CTOR_VOID,
        );
        let mut value = vec![0x01, 0x00, 0x01, 0x00, 0x54, 0x02, 0x16];
        value.extend_from_slice(b"WrapNonExceptionThrows");
        value.push(0x01);
        builder.attribute(Self::ASSEMBLY_PARENT, compatibility, &value);

        builder.string_attribute("AssemblyCompanyAttribute", Some("Acme Corp"));
        builder.string_attribute("AssemblyFileVersionAttribute", Some("1.2.3.0"));
        builder.string_attribute("AssemblyInformationalVersionAttribute", Some("1.2.3-beta+5f2e"));
        builder.string_attribute("AssemblyTitleAttribute", Some("Sample Library"));
        builder.string_attribute("AssemblyTrademarkAttribute", None);

        builder.attribute(
            Self::ASSEMBLY_PARENT,
            (build_stamp_ctor << 3) | 2,
            &Self::string_value(Some("2024-05-01")),
        );

        builder
    }

    /// Add a string to `#Strings`, returning its index
    pub fn string(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }

        if let Some(index) = self.string_index.get(value) {
            return *index;
        }

        let index = self.strings.len() as u32;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        self.string_index.insert(value.to_string(), index);
        index
    }

    /// Add a blob to `#Blob`, returning its index
    pub fn blob(&mut self, value: &[u8]) -> u32 {
        let index = self.blobs.len() as u32;
        compress(&mut self.blobs, value.len());
        self.blobs.extend_from_slice(value);
        index
    }

    /// Append a row, returning its 1-based row id
    pub fn row(&mut self, table: Table, row: Row) -> u16 {
        let rows = self.tables.entry(table).or_default();
        rows.push(row);
        rows.len() as u16
    }

    /// Remove all rows of `table`
    pub fn clear(&mut self, table: Table) {
        self.tables.remove(&table);
    }

    /// The number of rows in `table`
    pub fn row_count(&self, table: Table) -> u16 {
        self.tables.get(&table).map_or(0, |rows| rows.len() as u16)
    }

    /// Add a stream after the standard ones
    pub fn stream(&mut self, name: &str, data: &[u8]) {
        self.extra_streams.push((name.to_string(), padded(data.to_vec())));
    }

    /// Add a `TypeRef`, returning its row id
    pub fn type_ref(&mut self, scope: u16, namespace: &str, name: &str) -> u16 {
        let name = self.string(name);
        let namespace = self.string(namespace);
        self.row(Table::TypeRef, Row::new().u16(scope).heap(name).heap(namespace))
    }

    /// Add an enum `namespace.name` deriving from `System.Enum`, with a `value__` field of
    /// the element type `underlying`, returning its `TypeDef` row id
    pub fn enum_type(&mut self, namespace: &str, name: &str, underlying: u8) -> u16 {
        let system_enum = self.type_ref(Self::MSCORLIB_SCOPE, "System", "Enum");
        let field_list = self.row_count(Table::Field) + 1;
        let method_list = self.row_count(Table::MethodDef) + 1;

        let name = self.string(name);
        let namespace = self.string(namespace);
        let type_def = self.row(
            Table::TypeDef,
            Row::new()
                .u32(0x0000_0101)
                .heap(name)
                .heap(namespace)
                .u16((system_enum << 2) | 1)
                .u16(field_list)
                .u16(method_list),
        );

        let value_name = self.string("value__");
        let signature = self.blob(&[0x06, underlying]);
        self.row(
            Table::Field,
            Row::new()
                .u16(Self::ENUM_VALUE_FIELD)
                .heap(value_name)
                .heap(signature),
        );

        type_def
    }

    /// Add a constructor reference on a `mscorlib` type, returning the `CustomAttributeType`
    /// coded index of it
    pub fn member_ref_ctor(&mut self, namespace: &str, name: &str, signature: &[u8]) -> u16 {
        let type_ref = self.type_ref(Self::MSCORLIB_SCOPE, namespace, name);
        let ctor = self.string(".ctor");
        let signature = self.blob(signature);
        let member_ref = self.row(
            Table::MemberRef,
            Row::new().u16((type_ref << 3) | 1).heap(ctor).heap(signature),
        );

        (member_ref << 3) | 3
    }

    /// Add a `CustomAttribute` row, returning its row id
    pub fn attribute(&mut self, parent: u16, constructor: u16, value: &[u8]) -> u16 {
        let value = self.blob(value);
        self.row(
            Table::CustomAttribute,
            Row::new().u16(parent).u16(constructor).heap(value),
        )
    }

    /// Add an assembly level `System.Reflection.<name>(string)` attribute
    pub fn string_attribute(&mut self, name: &str, value: Option<&str>) -> u16 {
        let ctor = self.member_ref_ctor("System.Reflection", name, Self::CTOR_STRING);
        self.attribute(Self::ASSEMBLY_PARENT, ctor, &Self::string_value(value))
    }

    /// The value blob of an attribute with a single string argument and no named arguments
    pub fn string_value(value: Option<&str>) -> Vec<u8> {
        let mut blob = vec![0x01, 0x00];
        match value {
            Some(value) => {
                compress(&mut blob, value.len());
                blob.extend_from_slice(value.as_bytes());
            }
            None => blob.push(0xFF),
        }
        blob.extend_from_slice(&[0x00, 0x00]);
        blob
    }

    /// Lay out the complete image
    pub fn build(&self) -> Vec<u8> {
        let metadata = self.metadata();
        let text_size = CLI_HEADER_SIZE + metadata.len();
        let text_raw_size = align(text_size, FILE_ALIGNMENT);

        let mut image = vec![0_u8; HEADERS_SIZE + text_raw_size];

        // DOS header
        image[0..2].copy_from_slice(b"MZ");
        put_u32(&mut image, 0x3C, PE_OFFSET as u32);

        // COFF header
        image[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");
        put_u16(&mut image, PE_OFFSET + 4, 0x014C);
        put_u16(&mut image, PE_OFFSET + 6, 1);
        put_u16(&mut image, PE_OFFSET + 20, 0xE0);
        put_u16(&mut image, PE_OFFSET + 22, 0x2102);

        // PE32 optional header
        let optional = PE_OFFSET + 24;
        put_u16(&mut image, optional, 0x010B);
        image[optional + 2] = 8;
        put_u32(&mut image, optional + 4, text_raw_size as u32);
        put_u32(&mut image, optional + 20, TEXT_RVA);
        put_u32(&mut image, optional + 24, 0x4000);
        put_u32(&mut image, optional + 28, 0x0040_0000);
        put_u32(&mut image, optional + 32, 0x2000);
        put_u32(&mut image, optional + 36, FILE_ALIGNMENT as u32);
        put_u16(&mut image, optional + 40, 4);
        put_u16(&mut image, optional + 48, 4);
        put_u32(&mut image, optional + 56, TEXT_RVA + align(text_size, 0x2000) as u32);
        put_u32(&mut image, optional + 60, HEADERS_SIZE as u32);
        put_u16(&mut image, optional + 68, 3);
        put_u16(&mut image, optional + 70, 0x8540);
        put_u32(&mut image, optional + 72, 0x0010_0000);
        put_u32(&mut image, optional + 76, 0x1000);
        put_u32(&mut image, optional + 80, 0x0010_0000);
        put_u32(&mut image, optional + 84, 0x1000);
        put_u32(&mut image, optional + 92, 16);

        put_u32(&mut image, Self::CLR_DIRECTORY_OFFSET, TEXT_RVA);
        put_u32(&mut image, Self::CLR_DIRECTORY_OFFSET + 4, CLI_HEADER_SIZE as u32);

        // .text section header
        let section = SECTION_TABLE_OFFSET;
        image[section..section + 5].copy_from_slice(b".text");
        put_u32(&mut image, section + 8, text_size as u32);
        put_u32(&mut image, section + 12, TEXT_RVA);
        put_u32(&mut image, section + 16, text_raw_size as u32);
        put_u32(&mut image, section + 20, HEADERS_SIZE as u32);
        put_u32(&mut image, section + 36, 0x6000_0020);

        // CLI header
        let cli = Self::CLI_HEADER_OFFSET;
        put_u32(&mut image, cli, CLI_HEADER_SIZE as u32);
        put_u16(&mut image, cli + 4, 2);
        put_u16(&mut image, cli + 6, 5);
        put_u32(&mut image, cli + 8, TEXT_RVA + CLI_HEADER_SIZE as u32);
        put_u32(&mut image, cli + 12, metadata.len() as u32);
        put_u32(&mut image, cli + 16, 0x0000_0001);

        image[Self::METADATA_OFFSET..Self::METADATA_OFFSET + metadata.len()]
            .copy_from_slice(&metadata);
        image
    }

    fn metadata(&self) -> Vec<u8> {
        let mut streams: Vec<(&str, Vec<u8>)> = vec![
            ("#~", self.tables_stream()),
            ("#Strings", padded(self.strings.clone())),
            ("#US", vec![0, 0, 0, 0]),
            ("#GUID", (1..=16).collect()),
            ("#Blob", padded(self.blobs.clone())),
        ];
        streams.extend(
            self.extra_streams
                .iter()
                .map(|(name, data)| (name.as_str(), data.clone())),
        );

        let header_size: usize = streams
            .iter()
            .map(|(name, _)| 8 + align(name.len() + 1, 4))
            .sum();

        let mut metadata = Vec::new();
        metadata.extend_from_slice(&0x424A_5342_u32.to_le_bytes());
        metadata.extend_from_slice(&1_u16.to_le_bytes());
        metadata.extend_from_slice(&1_u16.to_le_bytes());
        metadata.extend_from_slice(&0_u32.to_le_bytes());
        metadata.extend_from_slice(&(RUNTIME_VERSION.len() as u32).to_le_bytes());
        metadata.extend_from_slice(RUNTIME_VERSION);
        metadata.extend_from_slice(&0_u16.to_le_bytes());
        metadata.extend_from_slice(&(streams.len() as u16).to_le_bytes());

        let mut offset = metadata.len() + header_size;
        for (name, data) in &streams {
            metadata.extend_from_slice(&(offset as u32).to_le_bytes());
            metadata.extend_from_slice(&(data.len() as u32).to_le_bytes());

            let mut stored_name = name.as_bytes().to_vec();
            stored_name.resize(align(name.len() + 1, 4), 0);
            metadata.extend_from_slice(&stored_name);

            offset += data.len();
        }

        for (_, data) in &streams {
            metadata.extend_from_slice(data);
        }

        metadata
    }

    fn tables_stream(&self) -> Vec<u8> {
        let valid = self
            .tables
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .fold(0_u64, |valid, (table, _)| valid | (1 << *table as u8));

        // Large #Strings, #GUID and #Blob
        let heap_sizes = if self.large_heaps { 0x07 } else { 0x00 };

        let mut stream = vec![0x00, 0x00, 0x00, 0x00, 0x02, 0x00, heap_sizes, 0x01];
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0x0000_1600_3301_FA00_u64.to_le_bytes());

        for rows in self.tables.values().filter(|rows| !rows.is_empty()) {
            stream.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        }

        for rows in self.tables.values() {
            for row in rows {
                row.write(&mut stream, self.large_heaps);
            }
        }

        padded(stream)
    }
}

impl Default for ImageBuilder {
    fn default() -> Self {
        ImageBuilder::new()
    }
}

fn align(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

fn padded(mut data: Vec<u8>) -> Vec<u8> {
    data.resize(align(data.len(), 4), 0);
    data
}

fn compress(data: &mut Vec<u8>, value: usize) {
    if value < 0x80 {
        data.push(value as u8);
    } else {
        data.push(0x80 | (value >> 8) as u8);
        data.push(value as u8);
    }
}

fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
