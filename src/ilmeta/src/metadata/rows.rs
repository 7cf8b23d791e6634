use super::error::{Error, Result};
use super::flags::*;
use super::index::{BlobIndex, CodedIndex, CodedIndexTag, GuidIndex, StringIndex};
use super::io::{Reader, Writer};
use super::kind::TableKind;
use super::layout::TableLayout;

#[macro_export]
macro_rules! cast_row {
    (Some($row:path), $expr:expr) => {
        match $expr {
            Some($row(x)) => Some(x),
            _ => None
        }
    };

    ($row:path, $expr:expr) => {
        match $expr {
            $row(x) => x,
            _ => panic!("failed to cast row to {}", stringify!($row))
        }
    };
}

/// One decoded row, tagged with the table it came from. Every variant
/// corresponds to a non-[`TableKind::is_opaque`] table.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Assembly(AssemblyRow),
    AssemblyRef(AssemblyRefRow),
    ClassLayout(ClassLayoutRow),
    Constant(ConstantRow),
    CustomAttribute(CustomAttributeRow),
    DeclSecurity(DeclSecurityRow),
    EventMap(EventMapRow),
    Event(EventRow),
    ExportedType(ExportedTypeRow),
    Field(FieldRow),
    FieldLayout(FieldLayoutRow),
    FieldMarshal(FieldMarshalRow),
    FieldRVA(FieldRVARow),
    File(FileRow),
    GenericParam(GenericParamRow),
    GenericParamConstraint(GenericParamConstraintRow),
    ImplMap(ImplMapRow),
    InterfaceImpl(InterfaceImplRow),
    ManifestResource(ManifestResourceRow),
    MemberRef(MemberRefRow),
    MethodDef(MethodDefRow),
    MethodImpl(MethodImplRow),
    MethodSemantics(MethodSemanticsRow),
    MethodSpec(MethodSpecRow),
    Module(ModuleRow),
    ModuleRef(ModuleRefRow),
    NestedClass(NestedClassRow),
    Param(ParamRow),
    Property(PropertyRow),
    PropertyMap(PropertyMapRow),
    StandAloneSig(StandAloneSigRow),
    TypeDef(TypeDefRow),
    TypeRef(TypeRefRow),
    TypeSpec(TypeSpecRow),
}

impl Row {
    pub fn decode(reader: &mut Reader, kind: TableKind, layout: &TableLayout) -> Result<Row> {
        Ok(match kind {
            TableKind::Assembly => Row::Assembly(AssemblyRow::decode(reader, layout)?),
            TableKind::AssemblyRef => Row::AssemblyRef(AssemblyRefRow::decode(reader, layout)?),
            TableKind::ClassLayout => Row::ClassLayout(ClassLayoutRow::decode(reader, layout)?),
            TableKind::Constant => Row::Constant(ConstantRow::decode(reader, layout)?),
            TableKind::CustomAttribute => Row::CustomAttribute(CustomAttributeRow::decode(reader, layout)?),
            TableKind::DeclSecurity => Row::DeclSecurity(DeclSecurityRow::decode(reader, layout)?),
            TableKind::EventMap => Row::EventMap(EventMapRow::decode(reader, layout)?),
            TableKind::Event => Row::Event(EventRow::decode(reader, layout)?),
            TableKind::ExportedType => Row::ExportedType(ExportedTypeRow::decode(reader, layout)?),
            TableKind::Field => Row::Field(FieldRow::decode(reader, layout)?),
            TableKind::FieldLayout => Row::FieldLayout(FieldLayoutRow::decode(reader, layout)?),
            TableKind::FieldMarshal => Row::FieldMarshal(FieldMarshalRow::decode(reader, layout)?),
            TableKind::FieldRVA => Row::FieldRVA(FieldRVARow::decode(reader, layout)?),
            TableKind::File => Row::File(FileRow::decode(reader, layout)?),
            TableKind::GenericParam => Row::GenericParam(GenericParamRow::decode(reader, layout)?),
            TableKind::GenericParamConstraint => {
                Row::GenericParamConstraint(GenericParamConstraintRow::decode(reader, layout)?)
            }
            TableKind::ImplMap => Row::ImplMap(ImplMapRow::decode(reader, layout)?),
            TableKind::InterfaceImpl => Row::InterfaceImpl(InterfaceImplRow::decode(reader, layout)?),
            TableKind::ManifestResource => Row::ManifestResource(ManifestResourceRow::decode(reader, layout)?),
            TableKind::MemberRef => Row::MemberRef(MemberRefRow::decode(reader, layout)?),
            TableKind::MethodDef => Row::MethodDef(MethodDefRow::decode(reader, layout)?),
            TableKind::MethodImpl => Row::MethodImpl(MethodImplRow::decode(reader, layout)?),
            TableKind::MethodSemantics => Row::MethodSemantics(MethodSemanticsRow::decode(reader, layout)?),
            TableKind::MethodSpec => Row::MethodSpec(MethodSpecRow::decode(reader, layout)?),
            TableKind::Module => Row::Module(ModuleRow::decode(reader, layout)?),
            TableKind::ModuleRef => Row::ModuleRef(ModuleRefRow::decode(reader, layout)?),
            TableKind::NestedClass => Row::NestedClass(NestedClassRow::decode(reader, layout)?),
            TableKind::Param => Row::Param(ParamRow::decode(reader, layout)?),
            TableKind::Property => Row::Property(PropertyRow::decode(reader, layout)?),
            TableKind::PropertyMap => Row::PropertyMap(PropertyMapRow::decode(reader, layout)?),
            TableKind::StandAloneSig => Row::StandAloneSig(StandAloneSigRow::decode(reader, layout)?),
            TableKind::TypeDef => Row::TypeDef(TypeDefRow::decode(reader, layout)?),
            TableKind::TypeRef => Row::TypeRef(TypeRefRow::decode(reader, layout)?),
            TableKind::TypeSpec => Row::TypeSpec(TypeSpecRow::decode(reader, layout)?),
            other if other.is_opaque() => {
                return Err(Error::malformed_encoding(format!("{:?} has no row schema", other)))
            }
            other => return Err(Error::malformed_encoding(format!("unhandled table kind {:?}", other))),
        })
    }

    pub fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        match self {
            Row::Assembly(row) => row.encode(writer, layout),
            Row::AssemblyRef(row) => row.encode(writer, layout),
            Row::ClassLayout(row) => row.encode(writer, layout),
            Row::Constant(row) => row.encode(writer, layout),
            Row::CustomAttribute(row) => row.encode(writer, layout),
            Row::DeclSecurity(row) => row.encode(writer, layout),
            Row::EventMap(row) => row.encode(writer, layout),
            Row::Event(row) => row.encode(writer, layout),
            Row::ExportedType(row) => row.encode(writer, layout),
            Row::Field(row) => row.encode(writer, layout),
            Row::FieldLayout(row) => row.encode(writer, layout),
            Row::FieldMarshal(row) => row.encode(writer, layout),
            Row::FieldRVA(row) => row.encode(writer, layout),
            Row::File(row) => row.encode(writer, layout),
            Row::GenericParam(row) => row.encode(writer, layout),
            Row::GenericParamConstraint(row) => row.encode(writer, layout),
            Row::ImplMap(row) => row.encode(writer, layout),
            Row::InterfaceImpl(row) => row.encode(writer, layout),
            Row::ManifestResource(row) => row.encode(writer, layout),
            Row::MemberRef(row) => row.encode(writer, layout),
            Row::MethodDef(row) => row.encode(writer, layout),
            Row::MethodImpl(row) => row.encode(writer, layout),
            Row::MethodSemantics(row) => row.encode(writer, layout),
            Row::MethodSpec(row) => row.encode(writer, layout),
            Row::Module(row) => row.encode(writer, layout),
            Row::ModuleRef(row) => row.encode(writer, layout),
            Row::NestedClass(row) => row.encode(writer, layout),
            Row::Param(row) => row.encode(writer, layout),
            Row::Property(row) => row.encode(writer, layout),
            Row::PropertyMap(row) => row.encode(writer, layout),
            Row::StandAloneSig(row) => row.encode(writer, layout),
            Row::TypeDef(row) => row.encode(writer, layout),
            Row::TypeRef(row) => row.encode(writer, layout),
            Row::TypeSpec(row) => row.encode(writer, layout),
        }
    }

    pub fn kind(&self) -> TableKind {
        match self {
            Row::Assembly(_) => TableKind::Assembly,
            Row::AssemblyRef(_) => TableKind::AssemblyRef,
            Row::ClassLayout(_) => TableKind::ClassLayout,
            Row::Constant(_) => TableKind::Constant,
            Row::CustomAttribute(_) => TableKind::CustomAttribute,
            Row::DeclSecurity(_) => TableKind::DeclSecurity,
            Row::EventMap(_) => TableKind::EventMap,
            Row::Event(_) => TableKind::Event,
            Row::ExportedType(_) => TableKind::ExportedType,
            Row::Field(_) => TableKind::Field,
            Row::FieldLayout(_) => TableKind::FieldLayout,
            Row::FieldMarshal(_) => TableKind::FieldMarshal,
            Row::FieldRVA(_) => TableKind::FieldRVA,
            Row::File(_) => TableKind::File,
            Row::GenericParam(_) => TableKind::GenericParam,
            Row::GenericParamConstraint(_) => TableKind::GenericParamConstraint,
            Row::ImplMap(_) => TableKind::ImplMap,
            Row::InterfaceImpl(_) => TableKind::InterfaceImpl,
            Row::ManifestResource(_) => TableKind::ManifestResource,
            Row::MemberRef(_) => TableKind::MemberRef,
            Row::MethodDef(_) => TableKind::MethodDef,
            Row::MethodImpl(_) => TableKind::MethodImpl,
            Row::MethodSemantics(_) => TableKind::MethodSemantics,
            Row::MethodSpec(_) => TableKind::MethodSpec,
            Row::Module(_) => TableKind::Module,
            Row::ModuleRef(_) => TableKind::ModuleRef,
            Row::NestedClass(_) => TableKind::NestedClass,
            Row::Param(_) => TableKind::Param,
            Row::Property(_) => TableKind::Property,
            Row::PropertyMap(_) => TableKind::PropertyMap,
            Row::StandAloneSig(_) => TableKind::StandAloneSig,
            Row::TypeDef(_) => TableKind::TypeDef,
            Row::TypeRef(_) => TableKind::TypeRef,
            Row::TypeSpec(_) => TableKind::TypeSpec,
        }
    }
}

pub trait TableRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<Self>
    where
        Self: Sized;
    fn encode(&self, writer: &mut Writer, layout: &TableLayout);
}

/// # II.22.2 Assembly : 0x20
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyRow {
    pub hash_alg_id: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub build_number: u16,
    pub revision_number: u16,
    pub flags: AssemblyFlags,
    pub public_key: BlobIndex,
    pub name: StringIndex,
    pub culture: StringIndex,
}

impl TableRow for AssemblyRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<AssemblyRow> {
        Ok(AssemblyRow {
            hash_alg_id: reader.read_u32()?,
            major_version: reader.read_u16()?,
            minor_version: reader.read_u16()?,
            build_number: reader.read_u16()?,
            revision_number: reader.read_u16()?,
            flags: AssemblyFlags::new(reader.read_u32()? as u16),
            public_key: BlobIndex::decode(reader, layout.heap_sizes())?,
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            culture: StringIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.hash_alg_id);
        writer.write_u16(self.major_version);
        writer.write_u16(self.minor_version);
        writer.write_u16(self.build_number);
        writer.write_u16(self.revision_number);
        writer.write_u32(self.flags.raw() as u32);
        self.public_key.encode(writer, layout.heap_sizes());
        self.name.encode(writer, layout.heap_sizes());
        self.culture.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.5 AssemblyRef : 0x23
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyRefRow {
    pub major_version: u16,
    pub minor_version: u16,
    pub build_number: u16,
    pub revision_number: u16,
    pub flags: AssemblyFlags,
    pub public_key_or_token: BlobIndex,
    pub name: StringIndex,
    pub culture: StringIndex,
    pub hash_value: BlobIndex,
}

impl TableRow for AssemblyRefRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<AssemblyRefRow> {
        Ok(AssemblyRefRow {
            major_version: reader.read_u16()?,
            minor_version: reader.read_u16()?,
            build_number: reader.read_u16()?,
            revision_number: reader.read_u16()?,
            flags: AssemblyFlags::new(reader.read_u32()? as u16),
            public_key_or_token: BlobIndex::decode(reader, layout.heap_sizes())?,
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            culture: StringIndex::decode(reader, layout.heap_sizes())?,
            hash_value: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.major_version);
        writer.write_u16(self.minor_version);
        writer.write_u16(self.build_number);
        writer.write_u16(self.revision_number);
        writer.write_u32(self.flags.raw() as u32);
        self.public_key_or_token.encode(writer, layout.heap_sizes());
        self.name.encode(writer, layout.heap_sizes());
        self.culture.encode(writer, layout.heap_sizes());
        self.hash_value.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.8 ClassLayout : 0x0F
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassLayoutRow {
    pub packing_size: u16,
    pub class_size: u32,
    pub parent: u32,
}

impl TableRow for ClassLayoutRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ClassLayoutRow> {
        Ok(ClassLayoutRow {
            packing_size: reader.read_u16()?,
            class_size: reader.read_u32()?,
            parent: layout.read_simple_index(reader, TableKind::TypeDef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.packing_size);
        writer.write_u32(self.class_size);
        layout.write_simple_index(writer, TableKind::TypeDef, self.parent);
    }
}

/// # II.22.9 Constant : 0x0B
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRow {
    pub type_: u16,
    pub parent: CodedIndex,
    pub value: BlobIndex,
}

impl TableRow for ConstantRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ConstantRow> {
        Ok(ConstantRow {
            type_: reader.read_u16()?,
            parent: layout.read_coded_index(reader, CodedIndexTag::HasConstant)?,
            value: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.type_);
        layout.write_coded_index(writer, CodedIndexTag::HasConstant, self.parent).unwrap();
        self.value.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.10 CustomAttribute : 0x0C
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomAttributeRow {
    pub parent: CodedIndex,
    pub type_: CodedIndex,
    pub value: BlobIndex,
}

impl TableRow for CustomAttributeRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<CustomAttributeRow> {
        Ok(CustomAttributeRow {
            parent: layout.read_coded_index(reader, CodedIndexTag::HasCustomAttribute)?,
            type_: layout.read_coded_index(reader, CodedIndexTag::CustomAttributeType)?,
            value: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_coded_index(writer, CodedIndexTag::HasCustomAttribute, self.parent).unwrap();
        layout.write_coded_index(writer, CodedIndexTag::CustomAttributeType, self.type_).unwrap();
        self.value.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.11 DeclSecurity : 0x0E
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeclSecurityRow {
    pub action: u16,
    pub parent: CodedIndex,
    pub permission_set: BlobIndex,
}

impl TableRow for DeclSecurityRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<DeclSecurityRow> {
        Ok(DeclSecurityRow {
            action: reader.read_u16()?,
            parent: layout.read_coded_index(reader, CodedIndexTag::HasDeclSecurity)?,
            permission_set: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.action);
        layout.write_coded_index(writer, CodedIndexTag::HasDeclSecurity, self.parent).unwrap();
        self.permission_set.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.12 EventMap : 0x12
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventMapRow {
    pub parent: u32,
    pub event_list: u32,
}

impl TableRow for EventMapRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<EventMapRow> {
        Ok(EventMapRow {
            parent: layout.read_simple_index(reader, TableKind::TypeDef)?,
            event_list: layout.read_simple_index(reader, TableKind::Event)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_simple_index(writer, TableKind::TypeDef, self.parent);
        layout.write_simple_index(writer, TableKind::Event, self.event_list);
    }
}

/// # II.22.13 Event : 0x14
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRow {
    pub event_flags: EventAttributes,
    pub name: StringIndex,
    pub event_type: CodedIndex,
}

impl TableRow for EventRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<EventRow> {
        Ok(EventRow {
            event_flags: EventAttributes::new(reader.read_u16()?),
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            event_type: layout.read_coded_index(reader, CodedIndexTag::TypeDefOrRef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.event_flags.raw());
        self.name.encode(writer, layout.heap_sizes());
        layout.write_coded_index(writer, CodedIndexTag::TypeDefOrRef, self.event_type).unwrap();
    }
}

/// # II.22.14 ExportedType : 0x27
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportedTypeRow {
    pub flags: TypeAttributes,
    pub type_def_id: u32,
    pub type_name: StringIndex,
    pub type_namespace: StringIndex,
    pub implementation: CodedIndex,
}

impl TableRow for ExportedTypeRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ExportedTypeRow> {
        Ok(ExportedTypeRow {
            flags: TypeAttributes::new(reader.read_u32()?),
            type_def_id: reader.read_u32()?,
            type_name: StringIndex::decode(reader, layout.heap_sizes())?,
            type_namespace: StringIndex::decode(reader, layout.heap_sizes())?,
            implementation: layout.read_coded_index(reader, CodedIndexTag::Implementation)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.flags.raw());
        writer.write_u32(self.type_def_id);
        self.type_name.encode(writer, layout.heap_sizes());
        self.type_namespace.encode(writer, layout.heap_sizes());
        layout.write_coded_index(writer, CodedIndexTag::Implementation, self.implementation).unwrap();
    }
}

/// # II.22.15 Field : 0x04
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRow {
    pub flags: FieldAttributes,
    pub name: StringIndex,
    pub signature: BlobIndex,
}

impl TableRow for FieldRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<FieldRow> {
        Ok(FieldRow {
            flags: FieldAttributes::new(reader.read_u16()?),
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            signature: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.flags.raw());
        self.name.encode(writer, layout.heap_sizes());
        self.signature.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.16 FieldLayout : 0x10
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayoutRow {
    pub offset: u32,
    pub field: u32,
}

impl TableRow for FieldLayoutRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<FieldLayoutRow> {
        Ok(FieldLayoutRow {
            offset: reader.read_u32()?,
            field: layout.read_simple_index(reader, TableKind::Field)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.offset);
        layout.write_simple_index(writer, TableKind::Field, self.field);
    }
}

/// # II.22.17 FieldMarshal : 0x0D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMarshalRow {
    pub parent: CodedIndex,
    pub native_type: BlobIndex,
}

impl TableRow for FieldMarshalRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<FieldMarshalRow> {
        Ok(FieldMarshalRow {
            parent: layout.read_coded_index(reader, CodedIndexTag::HasFieldMarshal)?,
            native_type: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_coded_index(writer, CodedIndexTag::HasFieldMarshal, self.parent).unwrap();
        self.native_type.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.18 FieldRVA : 0x1D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRVARow {
    pub rva: u32,
    pub field: u32,
}

impl TableRow for FieldRVARow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<FieldRVARow> {
        Ok(FieldRVARow {
            rva: reader.read_u32()?,
            field: layout.read_simple_index(reader, TableKind::Field)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.rva);
        layout.write_simple_index(writer, TableKind::Field, self.field);
    }
}

/// # II.22.19 File : 0x26
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileRow {
    pub flags: FileAttributes,
    pub name: StringIndex,
    pub hash_value: BlobIndex,
}

impl TableRow for FileRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<FileRow> {
        Ok(FileRow {
            flags: FileAttributes::new(reader.read_u32()?),
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            hash_value: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.flags.raw());
        self.name.encode(writer, layout.heap_sizes());
        self.hash_value.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.20 GenericParam : 0x2A
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericParamRow {
    pub number: u16,
    pub flags: GenericParamAttributes,
    pub owner: CodedIndex,
    pub name: StringIndex,
}

impl TableRow for GenericParamRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<GenericParamRow> {
        Ok(GenericParamRow {
            number: reader.read_u16()?,
            flags: GenericParamAttributes::new(reader.read_u16()?),
            owner: layout.read_coded_index(reader, CodedIndexTag::TypeOrMethodDef)?,
            name: StringIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.number);
        writer.write_u16(self.flags.raw());
        layout.write_coded_index(writer, CodedIndexTag::TypeOrMethodDef, self.owner).unwrap();
        self.name.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.21 GenericParamConstraint : 0x2C
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericParamConstraintRow {
    pub owner: u32,
    pub constraint: CodedIndex,
}

impl TableRow for GenericParamConstraintRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<GenericParamConstraintRow> {
        Ok(GenericParamConstraintRow {
            owner: layout.read_simple_index(reader, TableKind::GenericParam)?,
            constraint: layout.read_coded_index(reader, CodedIndexTag::TypeDefOrRef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_simple_index(writer, TableKind::GenericParam, self.owner);
        layout.write_coded_index(writer, CodedIndexTag::TypeDefOrRef, self.constraint).unwrap();
    }
}

/// # II.22.22 ImplMap : 0x1C
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplMapRow {
    pub mapping_flags: PInvokeAttributes,
    pub member_forwarded: CodedIndex,
    pub import_name: StringIndex,
    pub import_scope: u32,
}

impl TableRow for ImplMapRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ImplMapRow> {
        Ok(ImplMapRow {
            mapping_flags: PInvokeAttributes::new(reader.read_u16()?),
            member_forwarded: layout.read_coded_index(reader, CodedIndexTag::MemberForwarded)?,
            import_name: StringIndex::decode(reader, layout.heap_sizes())?,
            import_scope: layout.read_simple_index(reader, TableKind::ModuleRef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.mapping_flags.raw());
        layout.write_coded_index(writer, CodedIndexTag::MemberForwarded, self.member_forwarded).unwrap();
        self.import_name.encode(writer, layout.heap_sizes());
        layout.write_simple_index(writer, TableKind::ModuleRef, self.import_scope);
    }
}

/// # II.22.23 InterfaceImpl : 0x09
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceImplRow {
    pub class: u32,
    pub interface: CodedIndex,
}

impl TableRow for InterfaceImplRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<InterfaceImplRow> {
        Ok(InterfaceImplRow {
            class: layout.read_simple_index(reader, TableKind::TypeDef)?,
            interface: layout.read_coded_index(reader, CodedIndexTag::TypeDefOrRef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_simple_index(writer, TableKind::TypeDef, self.class);
        layout.write_coded_index(writer, CodedIndexTag::TypeDefOrRef, self.interface).unwrap();
    }
}

/// # II.22.24 ManifestResource : 0x28
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifestResourceRow {
    pub offset: u32,
    pub flags: ManifestResourceAttributes,
    pub name: StringIndex,
    pub implementation: CodedIndex,
}

impl TableRow for ManifestResourceRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ManifestResourceRow> {
        Ok(ManifestResourceRow {
            offset: reader.read_u32()?,
            flags: ManifestResourceAttributes::new(reader.read_u32()?),
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            implementation: layout.read_coded_index(reader, CodedIndexTag::Implementation)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.offset);
        writer.write_u32(self.flags.raw());
        self.name.encode(writer, layout.heap_sizes());
        layout.write_coded_index(writer, CodedIndexTag::Implementation, self.implementation).unwrap();
    }
}

/// # II.22.25 MemberRef : 0x0A
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberRefRow {
    pub class: CodedIndex,
    pub name: StringIndex,
    pub signature: BlobIndex,
}

impl TableRow for MemberRefRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<MemberRefRow> {
        Ok(MemberRefRow {
            class: layout.read_coded_index(reader, CodedIndexTag::MemberRefParent)?,
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            signature: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_coded_index(writer, CodedIndexTag::MemberRefParent, self.class).unwrap();
        self.name.encode(writer, layout.heap_sizes());
        self.signature.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.26 MethodDef : 0x06
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDefRow {
    pub rva: u32,
    pub impl_flags: MethodImplAttributes,
    pub flags: MethodAttributes,
    pub name: StringIndex,
    pub signature: BlobIndex,
    pub param_list: u32,
}

impl TableRow for MethodDefRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<MethodDefRow> {
        Ok(MethodDefRow {
            rva: reader.read_u32()?,
            impl_flags: MethodImplAttributes::new(reader.read_u16()?),
            flags: MethodAttributes::new(reader.read_u16()?),
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            signature: BlobIndex::decode(reader, layout.heap_sizes())?,
            param_list: layout.read_simple_index(reader, TableKind::Param)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.rva);
        writer.write_u16(self.impl_flags.raw());
        writer.write_u16(self.flags.raw());
        self.name.encode(writer, layout.heap_sizes());
        self.signature.encode(writer, layout.heap_sizes());
        layout.write_simple_index(writer, TableKind::Param, self.param_list);
    }
}

/// # II.22.27 MethodImpl : 0x19
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodImplRow {
    pub class: u32,
    pub method_body: CodedIndex,
    pub method_declaration: CodedIndex,
}

impl TableRow for MethodImplRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<MethodImplRow> {
        Ok(MethodImplRow {
            class: layout.read_simple_index(reader, TableKind::TypeDef)?,
            method_body: layout.read_coded_index(reader, CodedIndexTag::MethodDefOrRef)?,
            method_declaration: layout.read_coded_index(reader, CodedIndexTag::MethodDefOrRef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_simple_index(writer, TableKind::TypeDef, self.class);
        layout.write_coded_index(writer, CodedIndexTag::MethodDefOrRef, self.method_body).unwrap();
        layout.write_coded_index(writer, CodedIndexTag::MethodDefOrRef, self.method_declaration).unwrap();
    }
}

/// # II.22.28 MethodSemantics : 0x18
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodSemanticsRow {
    pub semantics: MethodSemanticsAttributes,
    pub method: u32,
    pub association: CodedIndex,
}

impl TableRow for MethodSemanticsRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<MethodSemanticsRow> {
        Ok(MethodSemanticsRow {
            semantics: MethodSemanticsAttributes::new(reader.read_u16()?),
            method: layout.read_simple_index(reader, TableKind::MethodDef)?,
            association: layout.read_coded_index(reader, CodedIndexTag::HasSemantics)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.semantics.raw());
        layout.write_simple_index(writer, TableKind::MethodDef, self.method);
        layout.write_coded_index(writer, CodedIndexTag::HasSemantics, self.association).unwrap();
    }
}

/// # II.22.29 MethodSpec : 0x2B
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodSpecRow {
    pub method: CodedIndex,
    pub instantiation: BlobIndex,
}

impl TableRow for MethodSpecRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<MethodSpecRow> {
        Ok(MethodSpecRow {
            method: layout.read_coded_index(reader, CodedIndexTag::MethodDefOrRef)?,
            instantiation: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_coded_index(writer, CodedIndexTag::MethodDefOrRef, self.method).unwrap();
        self.instantiation.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.30 Module : 0x00
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleRow {
    pub generation: u16,
    pub name: StringIndex,
    pub mvid: GuidIndex,
    pub enc_id: GuidIndex,
    pub enc_base_id: GuidIndex,
}

impl TableRow for ModuleRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ModuleRow> {
        Ok(ModuleRow {
            generation: reader.read_u16()?,
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            mvid: GuidIndex::decode(reader, layout.heap_sizes())?,
            enc_id: GuidIndex::decode(reader, layout.heap_sizes())?,
            enc_base_id: GuidIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.generation);
        self.name.encode(writer, layout.heap_sizes());
        self.mvid.encode(writer, layout.heap_sizes());
        self.enc_id.encode(writer, layout.heap_sizes());
        self.enc_base_id.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.31 ModuleRef : 0x1A
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleRefRow {
    pub name: StringIndex,
}

impl TableRow for ModuleRefRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ModuleRefRow> {
        Ok(ModuleRefRow { name: StringIndex::decode(reader, layout.heap_sizes())? })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        self.name.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.32 NestedClass : 0x29
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestedClassRow {
    pub nested_class: u32,
    pub enclosing_class: u32,
}

impl TableRow for NestedClassRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<NestedClassRow> {
        Ok(NestedClassRow {
            nested_class: layout.read_simple_index(reader, TableKind::TypeDef)?,
            enclosing_class: layout.read_simple_index(reader, TableKind::TypeDef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_simple_index(writer, TableKind::TypeDef, self.nested_class);
        layout.write_simple_index(writer, TableKind::TypeDef, self.enclosing_class);
    }
}

/// # II.22.33 Param : 0x08
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRow {
    pub flags: ParamAttributes,
    pub sequence: u16,
    pub name: StringIndex,
}

impl TableRow for ParamRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<ParamRow> {
        Ok(ParamRow {
            flags: ParamAttributes::new(reader.read_u16()?),
            sequence: reader.read_u16()?,
            name: StringIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.flags.raw());
        writer.write_u16(self.sequence);
        self.name.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.34 Property : 0x17
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyRow {
    pub flags: PropertyAttributes,
    pub name: StringIndex,
    pub type_: BlobIndex,
}

impl TableRow for PropertyRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<PropertyRow> {
        Ok(PropertyRow {
            flags: PropertyAttributes::new(reader.read_u16()?),
            name: StringIndex::decode(reader, layout.heap_sizes())?,
            type_: BlobIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u16(self.flags.raw());
        self.name.encode(writer, layout.heap_sizes());
        self.type_.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.35 PropertyMap : 0x15
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyMapRow {
    pub parent: u32,
    pub property_list: u32,
}

impl TableRow for PropertyMapRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<PropertyMapRow> {
        Ok(PropertyMapRow {
            parent: layout.read_simple_index(reader, TableKind::TypeDef)?,
            property_list: layout.read_simple_index(reader, TableKind::Property)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_simple_index(writer, TableKind::TypeDef, self.parent);
        layout.write_simple_index(writer, TableKind::Property, self.property_list);
    }
}

/// # II.22.36 StandAloneSig : 0x11
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandAloneSigRow {
    pub signature: BlobIndex,
}

impl TableRow for StandAloneSigRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<StandAloneSigRow> {
        Ok(StandAloneSigRow { signature: BlobIndex::decode(reader, layout.heap_sizes())? })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        self.signature.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.37 TypeDef : 0x02
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDefRow {
    pub flags: TypeAttributes,
    pub type_name: StringIndex,
    pub type_namespace: StringIndex,
    pub extends: CodedIndex,
    pub field_list: u32,
    pub method_list: u32,
}

impl TableRow for TypeDefRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<TypeDefRow> {
        Ok(TypeDefRow {
            flags: TypeAttributes::new(reader.read_u32()?),
            type_name: StringIndex::decode(reader, layout.heap_sizes())?,
            type_namespace: StringIndex::decode(reader, layout.heap_sizes())?,
            extends: layout.read_coded_index(reader, CodedIndexTag::TypeDefOrRef)?,
            field_list: layout.read_simple_index(reader, TableKind::Field)?,
            method_list: layout.read_simple_index(reader, TableKind::MethodDef)?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        writer.write_u32(self.flags.raw());
        self.type_name.encode(writer, layout.heap_sizes());
        self.type_namespace.encode(writer, layout.heap_sizes());
        layout.write_coded_index(writer, CodedIndexTag::TypeDefOrRef, self.extends).unwrap();
        layout.write_simple_index(writer, TableKind::Field, self.field_list);
        layout.write_simple_index(writer, TableKind::MethodDef, self.method_list);
    }
}

/// # II.22.38 TypeRef : 0x01
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeRefRow {
    pub resolution_scope: CodedIndex,
    pub type_name: StringIndex,
    pub type_namespace: StringIndex,
}

impl TableRow for TypeRefRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<TypeRefRow> {
        Ok(TypeRefRow {
            resolution_scope: layout.read_coded_index(reader, CodedIndexTag::ResolutionScope)?,
            type_name: StringIndex::decode(reader, layout.heap_sizes())?,
            type_namespace: StringIndex::decode(reader, layout.heap_sizes())?,
        })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        layout.write_coded_index(writer, CodedIndexTag::ResolutionScope, self.resolution_scope).unwrap();
        self.type_name.encode(writer, layout.heap_sizes());
        self.type_namespace.encode(writer, layout.heap_sizes());
    }
}

/// # II.22.39 TypeSpec : 0x1B
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeSpecRow {
    pub signature: BlobIndex,
}

impl TableRow for TypeSpecRow {
    fn decode(reader: &mut Reader, layout: &TableLayout) -> Result<TypeSpecRow> {
        Ok(TypeSpecRow { signature: BlobIndex::decode(reader, layout.heap_sizes())? })
    }

    fn encode(&self, writer: &mut Writer, layout: &TableLayout) {
        self.signature.encode(writer, layout.heap_sizes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::heaps::HeapSizes;

    fn layout() -> TableLayout {
        TableLayout::new(Default::default(), HeapSizes::new(0), false)
    }

    #[test]
    fn module_row_round_trips() {
        let row = ModuleRow {
            generation: 0,
            name: StringIndex(1),
            mvid: GuidIndex(1),
            enc_id: GuidIndex(0),
            enc_base_id: GuidIndex(0),
        };
        let layout = layout();
        let mut writer = Writer::new();
        row.encode(&mut writer, &layout);
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert_eq!(ModuleRow::decode(&mut reader, &layout).unwrap(), row);
    }

    #[test]
    fn type_def_row_round_trips_with_simple_and_coded_indices() {
        let row = TypeDefRow {
            flags: TypeAttributes::new(0x100001),
            type_name: StringIndex(4),
            type_namespace: StringIndex(0),
            extends: CodedIndex::new(TableKind::TypeRef, 3),
            field_list: 1,
            method_list: 1,
        };
        let layout = layout();
        let mut writer = Writer::new();
        row.encode(&mut writer, &layout);
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert_eq!(TypeDefRow::decode(&mut reader, &layout).unwrap(), row);
    }

    #[test]
    fn row_dispatch_round_trips_through_enum() {
        let row = Row::ModuleRef(ModuleRefRow { name: StringIndex(2) });
        let layout = layout();
        let mut writer = Writer::new();
        row.encode(&mut writer, &layout);
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert_eq!(Row::decode(&mut reader, TableKind::ModuleRef, &layout).unwrap(), row);
    }

    #[test]
    fn opaque_table_decode_is_rejected() {
        let layout = layout();
        let bytes = [0u8; 8];
        let mut reader = Reader::new(&bytes);
        assert!(Row::decode(&mut reader, TableKind::EncLog, &layout).is_err());
    }
}
