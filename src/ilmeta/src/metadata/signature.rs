use super::error::{Error, Result};
use super::io::{Reader, Writer};
use super::kind::TableKind;

/// # [II.23.1.16] Element types used in signatures
///
/// The leading byte of a type in a signature blob, before any compressed
/// coded index or nested signature that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElementType {
    End = 0x00,
    Void = 0x01,
    Boolean = 0x02,
    Char = 0x03,
    I1 = 0x04,
    U1 = 0x05,
    I2 = 0x06,
    U2 = 0x07,
    I4 = 0x08,
    U4 = 0x09,
    I8 = 0x0a,
    U8 = 0x0b,
    R4 = 0x0c,
    R8 = 0x0d,
    String = 0x0e,
    Ptr = 0x0f,
    ByRef = 0x10,
    ValueType = 0x11,
    Class = 0x12,
    Var = 0x13,
    Array = 0x14,
    GenericInst = 0x15,
    TypedByRef = 0x16,
    I = 0x18,
    U = 0x19,
    FnPtr = 0x1b,
    Object = 0x1c,
    SzArray = 0x1d,
    MVar = 0x1e,
    CModReqd = 0x1f,
    CModOpt = 0x20,
    Internal = 0x21,
    Modifier = 0x40,
    Sentinel = 0x41,
    Pinned = 0x45,
}

impl ElementType {
    fn from_byte(byte: u8) -> Result<ElementType> {
        use ElementType::*;
        Ok(match byte {
            0x00 => End,
            0x01 => Void,
            0x02 => Boolean,
            0x03 => Char,
            0x04 => I1,
            0x05 => U1,
            0x06 => I2,
            0x07 => U2,
            0x08 => I4,
            0x09 => U4,
            0x0a => I8,
            0x0b => U8,
            0x0c => R4,
            0x0d => R8,
            0x0e => String,
            0x0f => Ptr,
            0x10 => ByRef,
            0x11 => ValueType,
            0x12 => Class,
            0x13 => Var,
            0x14 => Array,
            0x15 => GenericInst,
            0x16 => TypedByRef,
            0x18 => I,
            0x19 => U,
            0x1b => FnPtr,
            0x1c => Object,
            0x1d => SzArray,
            0x1e => MVar,
            0x1f => CModReqd,
            0x20 => CModOpt,
            0x21 => Internal,
            0x40 => Modifier,
            0x41 => Sentinel,
            0x45 => Pinned,
            other => return Err(Error::UnknownElementType { byte: other }),
        })
    }
}

/// # [II.23.2.8] TypeDefOrRefOrSpecEncoded
///
/// Unlike a tables-stream coded index (`CodedIndexTag::TypeDefOrRef`,
/// `index.rs`), a reference to a type embedded in a signature blob packs
/// its table tag into the low 2 bits of a single compressed integer:
/// `0` = `TypeDef`, `1` = `TypeRef`, `2` = `TypeSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDefOrRefOrSpec {
    pub table: TableKind,
    pub row: u32,
}

impl TypeDefOrRefOrSpec {
    pub fn decode(reader: &mut Reader) -> Result<TypeDefOrRefOrSpec> {
        let encoded = reader.read_compressed_u32()?;
        let tag = encoded & 0x3;
        let row = encoded >> 2;
        let table = match tag {
            0 => TableKind::TypeDef,
            1 => TableKind::TypeRef,
            2 => TableKind::TypeSpec,
            other => return Err(Error::malformed_encoding(format!("TypeDefOrRefOrSpecEncoded tag {other}"))),
        };
        Ok(TypeDefOrRefOrSpec { table, row })
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        let tag = match self.table {
            TableKind::TypeDef => 0,
            TableKind::TypeRef => 1,
            TableKind::TypeSpec => 2,
            other => return Err(Error::malformed_encoding(format!("{other:?} cannot appear in a signature"))),
        };
        writer.write_compressed_u32((self.row << 2) | tag);
        Ok(())
    }
}

/// # [II.23.2.13] ArrayShape
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayShape {
    pub rank: u32,
    pub sizes: Vec<u32>,
    pub lower_bounds: Vec<i32>,
}

impl ArrayShape {
    fn decode(reader: &mut Reader) -> Result<ArrayShape> {
        let rank = reader.read_compressed_u32()?;
        let num_sizes = reader.read_compressed_u32()?;
        let sizes = (0..num_sizes).map(|_| reader.read_compressed_u32()).collect::<Result<Vec<_>>>()?;
        let num_lower_bounds = reader.read_compressed_u32()?;
        let lower_bounds =
            (0..num_lower_bounds).map(|_| reader.read_compressed_i32()).collect::<Result<Vec<_>>>()?;
        Ok(ArrayShape { rank, sizes, lower_bounds })
    }

    fn encode(&self, writer: &mut Writer) {
        writer.write_compressed_u32(self.rank);
        writer.write_compressed_u32(self.sizes.len() as u32);
        for size in &self.sizes {
            writer.write_compressed_u32(*size);
        }
        writer.write_compressed_u32(self.lower_bounds.len() as u32);
        for bound in &self.lower_bounds {
            writer.write_compressed_i32(*bound);
        }
    }
}

/// # [II.23.2.12] CustomMod
///
/// `CModReqd`/`CModOpt` attached ahead of a type or parameter; the encoded
/// type reference is the custom modifier's class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomMod {
    pub required: bool,
    pub type_ref: TypeDefOrRefOrSpec,
}

/// # [II.23.2.12, II.23.2.9-16] Type
///
/// A fully parsed type embedded in a signature blob. Parsing is mutually
/// recursive through `Ptr`/`ByRef`/`Array`/`SzArray`/`GenericInst`/`FnPtr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    String,
    Object,
    IntPtr,
    UIntPtr,
    TypedByRef,
    Ptr(Vec<CustomMod>, Box<TypeSignature>),
    ByRef(Box<TypeSignature>),
    ValueType(TypeDefOrRefOrSpec),
    Class(TypeDefOrRefOrSpec),
    Var(u32),
    MVar(u32),
    Array(Box<TypeSignature>, ArrayShape),
    SzArray(Vec<CustomMod>, Box<TypeSignature>),
    GenericInst { is_value_type: bool, base: TypeDefOrRefOrSpec, args: Vec<TypeSignature> },
    FnPtr(Box<MethodSignature>),
    Pinned(Box<TypeSignature>),
}

impl TypeSignature {
    /// Reads any custom modifiers prefixing a type, then the type itself.
    fn decode_mods_then(reader: &mut Reader) -> Result<(Vec<CustomMod>, u8)> {
        let mut mods = Vec::new();
        loop {
            let byte = reader.peek_u8()?;
            match ElementType::from_byte(byte) {
                Ok(ElementType::CModReqd) => {
                    reader.read_u8()?;
                    mods.push(CustomMod { required: true, type_ref: TypeDefOrRefOrSpec::decode(reader)? });
                }
                Ok(ElementType::CModOpt) => {
                    reader.read_u8()?;
                    mods.push(CustomMod { required: false, type_ref: TypeDefOrRefOrSpec::decode(reader)? });
                }
                _ => {
                    reader.read_u8()?;
                    return Ok((mods, byte));
                }
            }
        }
    }

    pub fn decode(reader: &mut Reader) -> Result<TypeSignature> {
        let byte = reader.read_u8()?;
        Self::decode_from_byte(reader, byte)
    }

    fn decode_from_byte(reader: &mut Reader, byte: u8) -> Result<TypeSignature> {
        use ElementType::*;
        match ElementType::from_byte(byte)? {
            Void => Ok(TypeSignature::Void),
            Boolean => Ok(TypeSignature::Boolean),
            Char => Ok(TypeSignature::Char),
            I1 => Ok(TypeSignature::I1),
            U1 => Ok(TypeSignature::U1),
            I2 => Ok(TypeSignature::I2),
            U2 => Ok(TypeSignature::U2),
            I4 => Ok(TypeSignature::I4),
            U4 => Ok(TypeSignature::U4),
            I8 => Ok(TypeSignature::I8),
            U8 => Ok(TypeSignature::U8),
            R4 => Ok(TypeSignature::R4),
            R8 => Ok(TypeSignature::R8),
            String => Ok(TypeSignature::String),
            Object => Ok(TypeSignature::Object),
            I => Ok(TypeSignature::IntPtr),
            U => Ok(TypeSignature::UIntPtr),
            TypedByRef => Ok(TypeSignature::TypedByRef),
            ByRef => Ok(TypeSignature::ByRef(Box::new(TypeSignature::decode(reader)?))),
            ValueType => Ok(TypeSignature::ValueType(TypeDefOrRefOrSpec::decode(reader)?)),
            Class => Ok(TypeSignature::Class(TypeDefOrRefOrSpec::decode(reader)?)),
            Var => Ok(TypeSignature::Var(reader.read_compressed_u32()?)),
            MVar => Ok(TypeSignature::MVar(reader.read_compressed_u32()?)),
            Array => {
                let element = TypeSignature::decode(reader)?;
                let shape = ArrayShape::decode(reader)?;
                Ok(TypeSignature::Array(Box::new(element), shape))
            }
            GenericInst => {
                let is_value_type = match ElementType::from_byte(reader.read_u8()?)? {
                    ValueType => true,
                    Class => false,
                    other => return Err(Error::malformed_encoding(format!("GenericInst over {other:?}"))),
                };
                let base = TypeDefOrRefOrSpec::decode(reader)?;
                let arg_count = reader.read_compressed_u32()?;
                let args = (0..arg_count).map(|_| TypeSignature::decode(reader)).collect::<Result<Vec<_>>>()?;
                Ok(TypeSignature::GenericInst { is_value_type, base, args })
            }
            FnPtr => Ok(TypeSignature::FnPtr(Box::new(MethodSignature::decode(reader)?))),
            Pinned => Ok(TypeSignature::Pinned(Box::new(TypeSignature::decode(reader)?))),
            Ptr | SzArray | CModReqd | CModOpt => {
                // These three carry custom mods before the underlying
                // type; re-enter with the byte already consumed so the
                // mod loop sees it.
                let mut mods = Vec::new();
                let mut next = byte;
                loop {
                    match ElementType::from_byte(next)? {
                        CModReqd => mods.push(CustomMod { required: true, type_ref: TypeDefOrRefOrSpec::decode(reader)? }),
                        CModOpt => mods.push(CustomMod { required: false, type_ref: TypeDefOrRefOrSpec::decode(reader)? }),
                        Ptr => return Ok(TypeSignature::Ptr(mods, Box::new(TypeSignature::decode(reader)?))),
                        SzArray => return Ok(TypeSignature::SzArray(mods, Box::new(TypeSignature::decode(reader)?))),
                        other => return Err(Error::malformed_encoding(format!("unexpected {other:?} in mod chain"))),
                    }
                    next = reader.read_u8()?;
                }
            }
            other => Err(Error::malformed_encoding(format!("{other:?} cannot start a type"))),
        }
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        match self {
            TypeSignature::Void => writer.write_u8(ElementType::Void as u8),
            TypeSignature::Boolean => writer.write_u8(ElementType::Boolean as u8),
            TypeSignature::Char => writer.write_u8(ElementType::Char as u8),
            TypeSignature::I1 => writer.write_u8(ElementType::I1 as u8),
            TypeSignature::U1 => writer.write_u8(ElementType::U1 as u8),
            TypeSignature::I2 => writer.write_u8(ElementType::I2 as u8),
            TypeSignature::U2 => writer.write_u8(ElementType::U2 as u8),
            TypeSignature::I4 => writer.write_u8(ElementType::I4 as u8),
            TypeSignature::U4 => writer.write_u8(ElementType::U4 as u8),
            TypeSignature::I8 => writer.write_u8(ElementType::I8 as u8),
            TypeSignature::U8 => writer.write_u8(ElementType::U8 as u8),
            TypeSignature::R4 => writer.write_u8(ElementType::R4 as u8),
            TypeSignature::R8 => writer.write_u8(ElementType::R8 as u8),
            TypeSignature::String => writer.write_u8(ElementType::String as u8),
            TypeSignature::Object => writer.write_u8(ElementType::Object as u8),
            TypeSignature::IntPtr => writer.write_u8(ElementType::I as u8),
            TypeSignature::UIntPtr => writer.write_u8(ElementType::U as u8),
            TypeSignature::TypedByRef => writer.write_u8(ElementType::TypedByRef as u8),
            TypeSignature::ByRef(inner) => {
                writer.write_u8(ElementType::ByRef as u8);
                inner.encode(writer)?;
            }
            TypeSignature::ValueType(t) => {
                writer.write_u8(ElementType::ValueType as u8);
                t.encode(writer)?;
            }
            TypeSignature::Class(t) => {
                writer.write_u8(ElementType::Class as u8);
                t.encode(writer)?;
            }
            TypeSignature::Var(n) => {
                writer.write_u8(ElementType::Var as u8);
                writer.write_compressed_u32(*n);
            }
            TypeSignature::MVar(n) => {
                writer.write_u8(ElementType::MVar as u8);
                writer.write_compressed_u32(*n);
            }
            TypeSignature::Array(element, shape) => {
                writer.write_u8(ElementType::Array as u8);
                element.encode(writer)?;
                shape.encode(writer);
            }
            TypeSignature::Ptr(mods, inner) => {
                Self::encode_mods(mods, writer);
                writer.write_u8(ElementType::Ptr as u8);
                inner.encode(writer)?;
            }
            TypeSignature::SzArray(mods, inner) => {
                Self::encode_mods(mods, writer);
                writer.write_u8(ElementType::SzArray as u8);
                inner.encode(writer)?;
            }
            TypeSignature::GenericInst { is_value_type, base, args } => {
                writer.write_u8(ElementType::GenericInst as u8);
                writer.write_u8(if *is_value_type { ElementType::ValueType as u8 } else { ElementType::Class as u8 });
                base.encode(writer)?;
                writer.write_compressed_u32(args.len() as u32);
                for arg in args {
                    arg.encode(writer)?;
                }
            }
            TypeSignature::FnPtr(signature) => {
                writer.write_u8(ElementType::FnPtr as u8);
                signature.encode(writer)?;
            }
            TypeSignature::Pinned(inner) => {
                writer.write_u8(ElementType::Pinned as u8);
                inner.encode(writer)?;
            }
        }
        Ok(())
    }

    fn encode_mods(mods: &[CustomMod], writer: &mut Writer) {
        for m in mods {
            writer.write_u8(if m.required { ElementType::CModReqd as u8 } else { ElementType::CModOpt as u8 });
            let _ = m.type_ref.encode(writer);
        }
    }
}

/// # [II.23.2.1] MethodDefSig / MethodRefSig
///
/// Calling-convention bits share a byte with the `VARARG`/`GENERIC`/
/// `HASTHIS`/`EXPLICITTHIS` flags (II.23.2.1's first byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallingConvention(pub u8);

impl CallingConvention {
    pub const DEFAULT: u8 = 0x0;
    pub const VARARG: u8 = 0x5;
    pub const GENERIC: u8 = 0x10;
    pub const HAS_THIS: u8 = 0x20;
    pub const EXPLICIT_THIS: u8 = 0x40;

    pub fn kind(&self) -> u8 {
        self.0 & 0x0F
    }

    pub fn is_vararg(&self) -> bool {
        self.kind() == Self::VARARG
    }

    pub fn is_generic(&self) -> bool {
        self.0 & Self::GENERIC != 0
    }

    pub fn has_this(&self) -> bool {
        self.0 & Self::HAS_THIS != 0
    }

    pub fn is_explicit_this(&self) -> bool {
        self.0 & Self::EXPLICIT_THIS != 0
    }
}

/// A parameter or return type, plus the custom modifiers and `byref`/
/// `typedbyref` markers that may precede the underlying [`TypeSignature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub custom_mods: Vec<CustomMod>,
    pub by_ref: bool,
    pub ty: TypeSignature,
}

impl Param {
    fn decode(reader: &mut Reader) -> Result<Param> {
        let (custom_mods, byte) = TypeSignature::decode_mods_then(reader)?;
        if byte == ElementType::ByRef as u8 {
            Ok(Param { custom_mods, by_ref: true, ty: TypeSignature::decode(reader)? })
        } else {
            Ok(Param { custom_mods, by_ref: false, ty: TypeSignature::decode_from_byte(reader, byte)? })
        }
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        TypeSignature::encode_mods(&self.custom_mods, writer);
        if self.by_ref {
            writer.write_u8(ElementType::ByRef as u8);
        }
        self.ty.encode(writer)
    }
}

/// # [II.23.2.1-3] Method, property, and local-variable signatures
///
/// Parameters past a `Sentinel` marker are the vararg tail supplied at a
/// call site; `sentinel_at` records where it sits, if present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub calling_convention: CallingConvention,
    pub generic_param_count: u32,
    pub return_type: Param,
    pub params: Vec<Param>,
    pub sentinel_at: Option<usize>,
}

impl MethodSignature {
    pub fn decode(reader: &mut Reader) -> Result<MethodSignature> {
        let calling_convention = CallingConvention(reader.read_u8()?);
        let generic_param_count =
            if calling_convention.is_generic() { reader.read_compressed_u32()? } else { 0 };
        let param_count = reader.read_compressed_u32()?;
        let return_type = Param::decode(reader)?;

        let mut params = Vec::with_capacity(param_count as usize);
        let mut sentinel_at = None;
        while (params.len() as u32) < param_count {
            if reader.peek_u8()? == ElementType::Sentinel as u8 {
                reader.read_u8()?;
                sentinel_at = Some(params.len());
                continue;
            }
            params.push(Param::decode(reader)?);
        }

        Ok(MethodSignature { calling_convention, generic_param_count, return_type, params, sentinel_at })
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u8(self.calling_convention.0);
        if self.calling_convention.is_generic() {
            writer.write_compressed_u32(self.generic_param_count);
        }
        writer.write_compressed_u32(self.params.len() as u32);
        self.return_type.encode(writer)?;
        for (index, param) in self.params.iter().enumerate() {
            if self.sentinel_at == Some(index) {
                writer.write_u8(ElementType::Sentinel as u8);
            }
            param.encode(writer)?;
        }
        Ok(())
    }
}

/// # [II.23.2.4] FieldSig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSignature {
    pub custom_mods: Vec<CustomMod>,
    pub ty: TypeSignature,
}

impl FieldSignature {
    const CALLING_CONVENTION: u8 = 0x06;

    pub fn decode(reader: &mut Reader) -> Result<FieldSignature> {
        let tag = reader.read_u8()?;
        if tag != Self::CALLING_CONVENTION {
            return Err(Error::malformed_encoding(format!("FIELD calling convention byte {tag:#04x}")));
        }
        let (custom_mods, byte) = TypeSignature::decode_mods_then(reader)?;
        Ok(FieldSignature { custom_mods, ty: TypeSignature::decode_from_byte(reader, byte)? })
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u8(Self::CALLING_CONVENTION);
        TypeSignature::encode_mods(&self.custom_mods, writer);
        self.ty.encode(writer)
    }
}

/// # [II.23.2.5] PropertySig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySignature {
    pub has_this: bool,
    pub ty: TypeSignature,
    pub params: Vec<Param>,
}

impl PropertySignature {
    const CALLING_CONVENTION: u8 = 0x08;

    pub fn decode(reader: &mut Reader) -> Result<PropertySignature> {
        let tag = reader.read_u8()?;
        if tag & 0x0F != Self::CALLING_CONVENTION {
            return Err(Error::malformed_encoding(format!("PROPERTY calling convention byte {tag:#04x}")));
        }
        let has_this = tag & CallingConvention::HAS_THIS != 0;
        let param_count = reader.read_compressed_u32()?;
        let ty = TypeSignature::decode(reader)?;
        let params = (0..param_count).map(|_| Param::decode(reader)).collect::<Result<Vec<_>>>()?;
        Ok(PropertySignature { has_this, ty, params })
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        let tag = Self::CALLING_CONVENTION | if self.has_this { CallingConvention::HAS_THIS } else { 0 };
        writer.write_u8(tag);
        writer.write_compressed_u32(self.params.len() as u32);
        self.ty.encode(writer)?;
        for param in &self.params {
            param.encode(writer)?;
        }
        Ok(())
    }
}

/// # [II.23.2.6] LocalVarSig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVarSignature {
    pub locals: Vec<Param>,
}

impl LocalVarSignature {
    const CALLING_CONVENTION: u8 = 0x07;

    pub fn decode(reader: &mut Reader) -> Result<LocalVarSignature> {
        let tag = reader.read_u8()?;
        if tag != Self::CALLING_CONVENTION {
            return Err(Error::malformed_encoding(format!("LOCAL_SIG calling convention byte {tag:#04x}")));
        }
        let count = reader.read_compressed_u32()?;
        let locals = (0..count).map(|_| Param::decode(reader)).collect::<Result<Vec<_>>>()?;
        Ok(LocalVarSignature { locals })
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u8(Self::CALLING_CONVENTION);
        writer.write_compressed_u32(self.locals.len() as u32);
        for local in &self.locals {
            local.encode(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(ty: &TypeSignature) -> TypeSignature {
        let mut writer = Writer::new();
        ty.encode(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        TypeSignature::decode(&mut Reader::new(&bytes)).unwrap()
    }

    #[test]
    fn primitive_types_round_trip() {
        for ty in [TypeSignature::Void, TypeSignature::I4, TypeSignature::String, TypeSignature::Object] {
            assert_eq!(round_trip(&ty), ty);
        }
    }

    #[test]
    fn szarray_with_custom_mods_round_trips() {
        let ty = TypeSignature::SzArray(
            vec![CustomMod { required: true, type_ref: TypeDefOrRefOrSpec { table: TableKind::TypeRef, row: 3 } }],
            Box::new(TypeSignature::I4),
        );
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn generic_inst_round_trips_with_args() {
        let ty = TypeSignature::GenericInst {
            is_value_type: false,
            base: TypeDefOrRefOrSpec { table: TableKind::TypeDef, row: 1 },
            args: vec![TypeSignature::String, TypeSignature::Object],
        };
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn array_with_shape_round_trips() {
        let ty = TypeSignature::Array(
            Box::new(TypeSignature::I4),
            ArrayShape { rank: 2, sizes: vec![10, 20], lower_bounds: vec![0, 0] },
        );
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn method_signature_round_trips_with_vararg_sentinel() {
        let signature = MethodSignature {
            calling_convention: CallingConvention(CallingConvention::VARARG),
            generic_param_count: 0,
            return_type: Param { custom_mods: Vec::new(), by_ref: false, ty: TypeSignature::Void },
            params: vec![
                Param { custom_mods: Vec::new(), by_ref: false, ty: TypeSignature::I4 },
                Param { custom_mods: Vec::new(), by_ref: false, ty: TypeSignature::String },
            ],
            sentinel_at: Some(1),
        };

        let mut writer = Writer::new();
        signature.encode(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        let decoded = MethodSignature::decode(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, signature);
    }

    #[test]
    fn generic_method_signature_round_trips() {
        let signature = MethodSignature {
            calling_convention: CallingConvention(CallingConvention::GENERIC),
            generic_param_count: 2,
            return_type: Param { custom_mods: Vec::new(), by_ref: false, ty: TypeSignature::MVar(0) },
            params: vec![Param { custom_mods: Vec::new(), by_ref: true, ty: TypeSignature::MVar(1) }],
            sentinel_at: None,
        };

        let mut writer = Writer::new();
        signature.encode(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        let decoded = MethodSignature::decode(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, signature);
    }

    #[test]
    fn field_signature_round_trips() {
        let signature = FieldSignature {
            custom_mods: Vec::new(),
            ty: TypeSignature::ValueType(TypeDefOrRefOrSpec { table: TableKind::TypeDef, row: 5 }),
        };
        let mut writer = Writer::new();
        signature.encode(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(FieldSignature::decode(&mut Reader::new(&bytes)).unwrap(), signature);
    }

    #[test]
    fn property_signature_round_trips() {
        let signature = PropertySignature {
            has_this: true,
            ty: TypeSignature::I4,
            params: vec![Param { custom_mods: Vec::new(), by_ref: false, ty: TypeSignature::String }],
        };
        let mut writer = Writer::new();
        signature.encode(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(PropertySignature::decode(&mut Reader::new(&bytes)).unwrap(), signature);
    }

    #[test]
    fn local_var_signature_round_trips() {
        let signature = LocalVarSignature {
            locals: vec![
                Param { custom_mods: Vec::new(), by_ref: false, ty: TypeSignature::I4 },
                Param { custom_mods: Vec::new(), by_ref: true, ty: TypeSignature::Object },
            ],
        };
        let mut writer = Writer::new();
        signature.encode(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(LocalVarSignature::decode(&mut Reader::new(&bytes)).unwrap(), signature);
    }

    #[test]
    fn unknown_element_type_byte_is_an_error() {
        let bytes = [0xfeu8];
        assert!(matches!(
            TypeSignature::decode(&mut Reader::new(&bytes)),
            Err(Error::UnknownElementType { byte: 0xfe })
        ));
    }
}
