use super::error::{Error, Result};

/// Every slot of the ECMA-335 tables-stream `Valid` bitmask, indices
/// `0x00..=0x2C` (45 slots). Most are the well-known tables implemented in
/// [`super::rows`]; a handful are recognized but structurally opaque:
///
/// - the four tables ECMA-335 reserves but no production tool emits rows
///   into (`AssemblyProcessor`, `AssemblyOS`, `AssemblyRefProcessor`,
///   `AssemblyRefOS`);
/// - the five "Ptr" indirection tables (`FieldPtr`, `MethodPtr`,
///   `ParamPtr`, `EventPtr`, `PropertyPtr`) and the two Edit-and-Continue
///   bookkeeping tables (`EncLog`, `EncMap`), which exist in the tag space
///   but whose row layout is not part of the public ECMA-335 schema.
///
/// [`TableKind::is_opaque`] marks this second group; `Row::decode` (see
/// `rows.rs`) refuses a nonzero row count for an opaque table rather than
/// guessing at a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    Module,
    TypeRef,
    TypeDef,
    FieldPtr,
    Field,
    MethodPtr,
    MethodDef,
    ParamPtr,
    Param,
    InterfaceImpl,
    MemberRef,
    Constant,
    CustomAttribute,
    FieldMarshal,
    DeclSecurity,
    ClassLayout,
    FieldLayout,
    StandAloneSig,
    EventMap,
    EventPtr,
    Event,
    PropertyMap,
    PropertyPtr,
    Property,
    MethodSemantics,
    MethodImpl,
    ModuleRef,
    TypeSpec,
    ImplMap,
    FieldRVA,
    EncLog,
    EncMap,
    Assembly,
    AssemblyProcessor,
    AssemblyOS,
    AssemblyRef,
    AssemblyRefProcessor,
    AssemblyRefOS,
    File,
    ExportedType,
    ManifestResource,
    NestedClass,
    GenericParam,
    MethodSpec,
    GenericParamConstraint,
}

impl TableKind {
    pub const NUM_TABLES: usize = 45;

    pub const ALL: [TableKind; TableKind::NUM_TABLES] = [
        TableKind::Module,
        TableKind::TypeRef,
        TableKind::TypeDef,
        TableKind::FieldPtr,
        TableKind::Field,
        TableKind::MethodPtr,
        TableKind::MethodDef,
        TableKind::ParamPtr,
        TableKind::Param,
        TableKind::InterfaceImpl,
        TableKind::MemberRef,
        TableKind::Constant,
        TableKind::CustomAttribute,
        TableKind::FieldMarshal,
        TableKind::DeclSecurity,
        TableKind::ClassLayout,
        TableKind::FieldLayout,
        TableKind::StandAloneSig,
        TableKind::EventMap,
        TableKind::EventPtr,
        TableKind::Event,
        TableKind::PropertyMap,
        TableKind::PropertyPtr,
        TableKind::Property,
        TableKind::MethodSemantics,
        TableKind::MethodImpl,
        TableKind::ModuleRef,
        TableKind::TypeSpec,
        TableKind::ImplMap,
        TableKind::FieldRVA,
        TableKind::EncLog,
        TableKind::EncMap,
        TableKind::Assembly,
        TableKind::AssemblyProcessor,
        TableKind::AssemblyOS,
        TableKind::AssemblyRef,
        TableKind::AssemblyRefProcessor,
        TableKind::AssemblyRefOS,
        TableKind::File,
        TableKind::ExportedType,
        TableKind::ManifestResource,
        TableKind::NestedClass,
        TableKind::GenericParam,
        TableKind::MethodSpec,
        TableKind::GenericParamConstraint,
    ];

    pub fn from_bitmask(bitmask: u64) -> Vec<TableKind> {
        let mut kinds = Vec::new();
        for i in 0..64 {
            if (bitmask & (1 << i)) != 0 {
                if let Ok(kind) = TableKind::from_index(i) {
                    kinds.push(kind);
                }
            }
        }
        kinds
    }

    pub fn to_bitmask(kinds: &[TableKind]) -> u64 {
        kinds.iter().fold(0u64, |mask, kind| mask | (1 << kind.as_index()))
    }

    pub fn from_index(index: usize) -> Result<TableKind> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.as_index() == index)
            .ok_or_else(|| Error::malformed_encoding(format!("unknown table index 0x{:02x}", index)))
    }

    pub fn as_index(&self) -> usize {
        match self {
            TableKind::Module => 0x00,
            TableKind::TypeRef => 0x01,
            TableKind::TypeDef => 0x02,
            TableKind::FieldPtr => 0x03,
            TableKind::Field => 0x04,
            TableKind::MethodPtr => 0x05,
            TableKind::MethodDef => 0x06,
            TableKind::ParamPtr => 0x07,
            TableKind::Param => 0x08,
            TableKind::InterfaceImpl => 0x09,
            TableKind::MemberRef => 0x0a,
            TableKind::Constant => 0x0b,
            TableKind::CustomAttribute => 0x0c,
            TableKind::FieldMarshal => 0x0d,
            TableKind::DeclSecurity => 0x0e,
            TableKind::ClassLayout => 0x0f,
            TableKind::FieldLayout => 0x10,
            TableKind::StandAloneSig => 0x11,
            TableKind::EventMap => 0x12,
            TableKind::EventPtr => 0x13,
            TableKind::Event => 0x14,
            TableKind::PropertyMap => 0x15,
            TableKind::PropertyPtr => 0x16,
            TableKind::Property => 0x17,
            TableKind::MethodSemantics => 0x18,
            TableKind::MethodImpl => 0x19,
            TableKind::ModuleRef => 0x1a,
            TableKind::TypeSpec => 0x1b,
            TableKind::ImplMap => 0x1c,
            TableKind::FieldRVA => 0x1d,
            TableKind::EncLog => 0x1e,
            TableKind::EncMap => 0x1f,
            TableKind::Assembly => 0x20,
            TableKind::AssemblyProcessor => 0x21,
            TableKind::AssemblyOS => 0x22,
            TableKind::AssemblyRef => 0x23,
            TableKind::AssemblyRefProcessor => 0x24,
            TableKind::AssemblyRefOS => 0x25,
            TableKind::File => 0x26,
            TableKind::ExportedType => 0x27,
            TableKind::ManifestResource => 0x28,
            TableKind::NestedClass => 0x29,
            TableKind::GenericParam => 0x2a,
            TableKind::MethodSpec => 0x2b,
            TableKind::GenericParamConstraint => 0x2c,
        }
    }

    /// Tables whose row schema this crate does not model: the four
    /// obsolete/reserved assembly tables and the Ptr/EnC-only indices. A
    /// nonzero row count for one of these is a [`Error::MalformedEncoding`],
    /// not a silent skip, since desyncing the row cursor would corrupt
    /// every table decoded after it.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            TableKind::FieldPtr
                | TableKind::MethodPtr
                | TableKind::ParamPtr
                | TableKind::EventPtr
                | TableKind::PropertyPtr
                | TableKind::EncLog
                | TableKind::EncMap
                | TableKind::AssemblyProcessor
                | TableKind::AssemblyOS
                | TableKind::AssemblyRefProcessor
                | TableKind::AssemblyRefOS
        )
    }

    /// # II.22
    ///
    /// Tables whose rows are required to be sorted by a particular
    /// (generally owner-reference) column so that readers can resolve a
    /// contiguous run via binary search.
    pub fn has_canonical_sort_order(&self) -> bool {
        matches!(
            self,
            TableKind::ClassLayout
                | TableKind::Constant
                | TableKind::CustomAttribute
                | TableKind::DeclSecurity
                | TableKind::FieldLayout
                | TableKind::FieldMarshal
                | TableKind::FieldRVA
                | TableKind::GenericParam
                | TableKind::GenericParamConstraint
                | TableKind::ImplMap
                | TableKind::InterfaceImpl
                | TableKind::MethodImpl
                | TableKind::MethodSemantics
                | TableKind::NestedClass
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_for_every_kind() {
        for kind in TableKind::ALL {
            assert_eq!(TableKind::from_index(kind.as_index()).unwrap(), kind);
        }
    }

    #[test]
    fn bitmask_round_trips() {
        let kinds = vec![TableKind::Module, TableKind::TypeDef, TableKind::MethodDef];
        let mask = TableKind::to_bitmask(&kinds);
        let mut decoded = TableKind::from_bitmask(mask);
        decoded.sort_by_key(TableKind::as_index);
        let mut expected = kinds;
        expected.sort_by_key(TableKind::as_index);
        assert_eq!(decoded, expected);
    }

    #[test]
    fn unknown_index_is_an_error() {
        assert!(TableKind::from_index(0x30).is_err());
    }
}
