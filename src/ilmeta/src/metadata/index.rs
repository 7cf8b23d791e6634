use super::error::{Error, Result};
use super::heaps::HeapSizes;
use super::io::{Reader, Writer};
use super::kind::TableKind;

macro_rules! define_heap_index {
    ($name:ident, $flag:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $name(value)
            }
        }

        impl $name {
            /// # II.24.2.6 #~ stream
            ///
            /// If *e* is an index into the GUID, Blob, or String heap, it is
            /// stored using the number of bytes given by `HeapSizes`.
            pub fn decode(reader: &mut Reader, heap_sizes: HeapSizes) -> Result<$name> {
                if heap_sizes.check_flag($flag) {
                    Ok($name(reader.read_u32()?))
                } else {
                    Ok($name(reader.read_u16()? as u32))
                }
            }

            pub fn encode(&self, writer: &mut Writer, heap_sizes: HeapSizes) {
                if heap_sizes.check_flag($flag) {
                    writer.write_u32(self.0);
                } else {
                    writer.write_u16(self.0 as u16);
                }
            }
        }
    };
}

define_heap_index!(StringIndex, HeapSizes::STRING_FLAG);
define_heap_index!(GuidIndex, HeapSizes::GUID_FLAG);
define_heap_index!(BlobIndex, HeapSizes::BLOB_FLAG);

/// # II.24.2.6 #~ stream
///
/// The thirteen coded-index families. Each tag selects a small fixed set
/// of tables; the low bits of the physical value pick which table in the
/// set, the remaining bits are the row number within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodedIndexTag {
    TypeDefOrRef,
    HasConstant,
    HasCustomAttribute,
    HasFieldMarshal,
    HasDeclSecurity,
    MemberRefParent,
    HasSemantics,
    MethodDefOrRef,
    MemberForwarded,
    Implementation,
    CustomAttributeType,
    ResolutionScope,
    TypeOrMethodDef,
}

impl CodedIndexTag {
    pub const ALL: [CodedIndexTag; 13] = [
        CodedIndexTag::TypeDefOrRef,
        CodedIndexTag::HasConstant,
        CodedIndexTag::HasCustomAttribute,
        CodedIndexTag::HasFieldMarshal,
        CodedIndexTag::HasDeclSecurity,
        CodedIndexTag::MemberRefParent,
        CodedIndexTag::HasSemantics,
        CodedIndexTag::MethodDefOrRef,
        CodedIndexTag::MemberForwarded,
        CodedIndexTag::Implementation,
        CodedIndexTag::CustomAttributeType,
        CodedIndexTag::ResolutionScope,
        CodedIndexTag::TypeOrMethodDef,
    ];

    /// The ordered table list this tag's low bits select into. `NotUsed`
    /// slots in `CustomAttributeType` (tags 0, 1, 4) are represented as
    /// `None`.
    pub fn tables(&self) -> &'static [Option<TableKind>] {
        use TableKind::*;
        match self {
            CodedIndexTag::TypeDefOrRef => &[Some(TypeDef), Some(TypeRef), Some(TypeSpec)],
            CodedIndexTag::HasConstant => &[Some(Field), Some(Param), Some(Property)],
            CodedIndexTag::HasCustomAttribute => &[
                Some(MethodDef), Some(Field), Some(TypeRef), Some(TypeDef), Some(Param),
                Some(InterfaceImpl), Some(MemberRef), Some(Module), None, Some(Property),
                Some(Event), Some(StandAloneSig), Some(ModuleRef), Some(TypeSpec), Some(Assembly),
                Some(AssemblyRef), Some(File), Some(ExportedType), Some(ManifestResource),
                Some(GenericParam), Some(GenericParamConstraint), Some(MethodSpec),
            ],
            CodedIndexTag::HasFieldMarshal => &[Some(Field), Some(Param)],
            CodedIndexTag::HasDeclSecurity => &[Some(TypeDef), Some(MethodDef), Some(Assembly)],
            CodedIndexTag::MemberRefParent => {
                &[Some(TypeDef), Some(TypeRef), Some(ModuleRef), Some(MethodDef), Some(TypeSpec)]
            }
            CodedIndexTag::HasSemantics => &[Some(Event), Some(Property)],
            CodedIndexTag::MethodDefOrRef => &[Some(MethodDef), Some(MemberRef)],
            CodedIndexTag::MemberForwarded => &[Some(Field), Some(MethodDef)],
            CodedIndexTag::Implementation => &[Some(File), Some(AssemblyRef), Some(ExportedType)],
            CodedIndexTag::CustomAttributeType => {
                &[None, None, Some(MethodDef), Some(MemberRef), None]
            }
            CodedIndexTag::ResolutionScope => {
                &[Some(Module), Some(ModuleRef), Some(AssemblyRef), Some(TypeRef)]
            }
            CodedIndexTag::TypeOrMethodDef => &[Some(TypeDef), Some(MethodDef)],
        }
    }

    /// Number of bits of the physical value spent on the table tag, i.e.
    /// `ceil(log2(self.tables().len()))`.
    pub fn tag_size(&self) -> u32 {
        let n = self.tables().len() as u32;
        (u32::BITS - (n - 1).leading_zeros()).max(1)
    }

    pub fn table_for_tag(&self, tag: u32) -> Result<TableKind> {
        self.tables()
            .get(tag as usize)
            .and_then(|slot| *slot)
            .ok_or_else(|| Error::malformed_encoding(format!("unused {:?} tag {}", self, tag)))
    }

    pub fn tag_for_table(&self, table: TableKind) -> Result<u32> {
        self.tables()
            .iter()
            .position(|slot| *slot == Some(table))
            .map(|pos| pos as u32)
            .ok_or_else(|| Error::malformed_encoding(format!("{:?} is not part of {:?}", table, self)))
    }

    /// # II.24.2.6 #~ stream
    ///
    /// A coded index is stored in 2 bytes if the largest of its candidate
    /// tables' row counts fits in `16 - tag_size` bits, and 4 bytes
    /// otherwise.
    pub fn is_big_index(&self, row_count: impl Fn(TableKind) -> u32) -> bool {
        let max = self
            .tables()
            .iter()
            .filter_map(|slot| *slot)
            .map(row_count)
            .max()
            .unwrap_or(0);
        max >= 1u32 << (16 - self.tag_size())
    }

    pub fn decode(&self, reader: &mut Reader, is_big: bool) -> Result<CodedIndex> {
        let physical = if is_big { reader.read_u32()? } else { reader.read_u16()? as u32 };
        let tag_size = self.tag_size();
        let tag = physical & ((1 << tag_size) - 1);
        let row = physical >> tag_size;
        let table = self.table_for_tag(tag)?;
        Ok(CodedIndex { table, row })
    }

    pub fn encode(&self, writer: &mut Writer, value: CodedIndex, is_big: bool) -> Result<()> {
        let tag = self.tag_for_table(value.table)?;
        let physical = (value.row << self.tag_size()) | tag;
        if is_big {
            writer.write_u32(physical);
        } else {
            writer.write_u16(physical as u16);
        }
        Ok(())
    }
}

/// A decoded coded index: which table it names, and the (1-based) row
/// within it. `row == 0` conventionally means "null reference".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodedIndex {
    pub table: TableKind,
    pub row: u32,
}

impl CodedIndex {
    pub fn new(table: TableKind, row: u32) -> CodedIndex {
        CodedIndex { table, row }
    }

    pub fn is_null(&self) -> bool {
        self.row == 0
    }
}

/// A `(table, row)` metadata token, or a `0x70`-prefixed `#US` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataToken {
    UserString(u32),
    Table(TableKind, u32),
}

impl MetadataToken {
    const USER_STRING_TAG: u32 = 0x70;

    pub fn from_raw(raw: u32) -> Result<MetadataToken> {
        let tag = raw >> 24;
        let row = raw & 0x00FF_FFFF;
        if tag == Self::USER_STRING_TAG {
            Ok(MetadataToken::UserString(row))
        } else {
            Ok(MetadataToken::Table(TableKind::from_index(tag as usize)?, row))
        }
    }

    pub fn to_raw(&self) -> u32 {
        match self {
            MetadataToken::UserString(row) => (Self::USER_STRING_TAG << 24) | row,
            MetadataToken::Table(table, row) => ((table.as_index() as u32) << 24) | row,
        }
    }

    pub fn decode(reader: &mut Reader) -> Result<MetadataToken> {
        MetadataToken::from_raw(reader.read_u32()?)
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u32(self.to_raw());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_index_switches_width_with_flag() {
        let small = HeapSizes::new(0);
        let large = HeapSizes::new(HeapSizes::STRING_FLAG);

        let mut writer = Writer::new();
        StringIndex(0x1234).encode(&mut writer, large);
        assert_eq!(writer.as_bytes().len(), 4);

        let mut writer = Writer::new();
        StringIndex(0x12).encode(&mut writer, small);
        assert_eq!(writer.as_bytes().len(), 2);
    }

    #[test]
    fn coded_index_round_trips_small_and_big() {
        let tag = CodedIndexTag::TypeDefOrRef;
        let value = CodedIndex::new(TableKind::TypeRef, 7);

        let mut writer = Writer::new();
        tag.encode(&mut writer, value, false).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert_eq!(tag.decode(&mut reader, false).unwrap(), value);

        let mut writer = Writer::new();
        tag.encode(&mut writer, value, true).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert_eq!(tag.decode(&mut reader, true).unwrap(), value);
    }

    #[test]
    fn has_custom_attribute_rejects_unused_tag() {
        let tag = CodedIndexTag::CustomAttributeType;
        assert!(tag.table_for_tag(0).is_err());
        assert!(tag.table_for_tag(2).is_ok());
    }

    #[test]
    fn is_big_index_respects_row_counts() {
        let tag = CodedIndexTag::HasSemantics;
        assert!(!tag.is_big_index(|_| 10));
        assert!(tag.is_big_index(|_| 1 << 15));
    }

    #[test]
    fn metadata_token_round_trips() {
        let token = MetadataToken::Table(TableKind::MethodDef, 0x42);
        let raw = token.to_raw();
        assert_eq!(MetadataToken::from_raw(raw).unwrap(), token);

        let us = MetadataToken::UserString(5);
        assert_eq!(MetadataToken::from_raw(us.to_raw()).unwrap(), us);
    }
}
