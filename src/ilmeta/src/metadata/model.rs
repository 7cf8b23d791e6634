use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::error::{Error, Result};
use super::flags::AssemblyFlags;
use super::index::CodedIndex;
use super::kind::TableKind;
use super::metadata::Metadata;
use super::rows::{AssemblyRefRow, AssemblyRow, Row};
use super::signature::{MethodSignature, Param, TypeDefOrRefOrSpec, TypeSignature};

/// # [II.22.2, II.22.5] Assembly / AssemblyRef identity
///
/// The four-part name ECMA-335 uses to identify an assembly: simple name,
/// version, culture, and public key (or its token). `Assembly` rows carry
/// the full public key; `AssemblyRef` rows usually carry only its token
/// (§II.22.5's "unless culture-invariant" note applies to culture, not the
/// key, but both fields are optional in practice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyIdentity {
    pub name: String,
    pub version: (u16, u16, u16, u16),
    pub culture: Option<String>,
    pub public_key_or_token: Vec<u8>,
    pub flags: AssemblyFlags,
}

impl AssemblyIdentity {
    pub fn from_assembly_row(metadata: &Metadata, row: &AssemblyRow) -> Result<AssemblyIdentity> {
        Ok(AssemblyIdentity {
            name: metadata.strings.get(row.name.0)?.to_string(),
            version: (row.major_version, row.minor_version, row.build_number, row.revision_number),
            culture: Self::optional_string(metadata, row.culture.0)?,
            public_key_or_token: metadata.blobs.get(row.public_key.0)?.to_vec(),
            flags: row.flags,
        })
    }

    pub fn from_assembly_ref_row(metadata: &Metadata, row: &AssemblyRefRow) -> Result<AssemblyIdentity> {
        Ok(AssemblyIdentity {
            name: metadata.strings.get(row.name.0)?.to_string(),
            version: (row.major_version, row.minor_version, row.build_number, row.revision_number),
            culture: Self::optional_string(metadata, row.culture.0)?,
            public_key_or_token: metadata.blobs.get(row.public_key_or_token.0)?.to_vec(),
            flags: row.flags,
        })
    }

    fn optional_string(metadata: &Metadata, offset: u32) -> Result<Option<String>> {
        if offset == 0 {
            Ok(None)
        } else {
            Ok(Some(metadata.strings.get(offset)?.to_string()))
        }
    }
}

/// # [II.22.31] ModuleRef identity — just a file name, no version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    pub name: String,
}

/// # [II.22.38] ResolutionScope of a TypeRef
///
/// `TypeRef` names a scope to look the type name up in: the defining
/// module itself, another module of the same assembly, a different
/// assembly, or — for a nested type — the enclosing type, recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionScope {
    Module,
    ModuleRef(ModuleReference),
    AssemblyRef(AssemblyIdentity),
    TypeRef(Box<TypeReference>),
}

/// # [II.22.38] TypeRef
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub namespace: Option<String>,
    pub name: String,
    pub scope: ResolutionScope,
}

impl TypeReference {
    /// Builds the descriptor for the `TypeRef` at 1-based `row_index`,
    /// following `ResolutionScope::TypeRef` recursively for nested types.
    pub fn from_row_index(metadata: &Metadata, row_index: u32) -> Result<TypeReference> {
        let row = match metadata.tables.rows(TableKind::TypeRef).get(row_index as usize - 1) {
            Some(Row::TypeRef(row)) => *row,
            _ => return Err(Error::invalid_token(row_index)),
        };

        let namespace = if row.type_namespace.0 == 0 {
            None
        } else {
            Some(metadata.strings.get(row.type_namespace.0)?.to_string())
        };
        let name = metadata.strings.get(row.type_name.0)?.to_string();

        let scope = if row.resolution_scope.is_null() {
            ResolutionScope::Module
        } else {
            match row.resolution_scope.table {
                TableKind::Module => ResolutionScope::Module,
                TableKind::ModuleRef => {
                    let module_row = match metadata.tables.rows(TableKind::ModuleRef).get(row.resolution_scope.row as usize - 1) {
                        Some(Row::ModuleRef(module_row)) => *module_row,
                        _ => return Err(Error::invalid_token(row.resolution_scope.row)),
                    };
                    ResolutionScope::ModuleRef(ModuleReference { name: metadata.strings.get(module_row.name.0)?.to_string() })
                }
                TableKind::AssemblyRef => {
                    let assembly_ref_row = match metadata.tables.rows(TableKind::AssemblyRef).get(row.resolution_scope.row as usize - 1) {
                        Some(Row::AssemblyRef(assembly_ref_row)) => *assembly_ref_row,
                        _ => return Err(Error::invalid_token(row.resolution_scope.row)),
                    };
                    ResolutionScope::AssemblyRef(AssemblyIdentity::from_assembly_ref_row(metadata, &assembly_ref_row)?)
                }
                TableKind::TypeRef => {
                    ResolutionScope::TypeRef(Box::new(TypeReference::from_row_index(metadata, row.resolution_scope.row)?))
                }
                other => return Err(Error::malformed_encoding(format!("{other:?} cannot be a ResolutionScope"))),
            }
        };

        Ok(TypeReference { namespace, name, scope })
    }
}

/// # [II.22.37] TypeDef
///
/// `declaring_type` is `Some` for a type nested per the `NestedClass`
/// table; `assembly` is always the identity of the module's own manifest
/// assembly (there is exactly one per module, §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub namespace: Option<String>,
    pub name: String,
    pub assembly: AssemblyIdentity,
    pub declaring_type: Option<Box<TypeDefinition>>,
}

impl TypeDefinition {
    pub fn from_row_index(metadata: &Metadata, row_index: u32) -> Result<TypeDefinition> {
        let row = match metadata.tables.rows(TableKind::TypeDef).get(row_index as usize - 1) {
            Some(Row::TypeDef(row)) => *row,
            _ => return Err(Error::invalid_token(row_index)),
        };

        let namespace = if row.type_namespace.0 == 0 {
            None
        } else {
            Some(metadata.strings.get(row.type_namespace.0)?.to_string())
        };
        let name = metadata.strings.get(row.type_name.0)?.to_string();
        let assembly = module_assembly_identity(metadata)?;

        let declaring_type = enclosing_type_row(metadata, row_index)?
            .map(|enclosing| TypeDefinition::from_row_index(metadata, enclosing).map(Box::new))
            .transpose()?;

        Ok(TypeDefinition { namespace, name, assembly, declaring_type })
    }
}

/// The identity of the single assembly a module's own `Assembly` table
/// row (if present — modules that are not manifest modules have none)
/// describes.
fn module_assembly_identity(metadata: &Metadata) -> Result<AssemblyIdentity> {
    match metadata.tables.rows(TableKind::Assembly).first() {
        Some(Row::Assembly(row)) => AssemblyIdentity::from_assembly_row(metadata, row),
        _ => Err(Error::resolution_failure("module has no Assembly row")),
    }
}

/// `NestedClass.enclosing_class` for the `TypeDef` at `row_index`, if any.
fn enclosing_type_row(metadata: &Metadata, row_index: u32) -> Result<Option<u32>> {
    for row in metadata.tables.rows(TableKind::NestedClass) {
        if let Row::NestedClass(nested) = row {
            if nested.nested_class == row_index {
                return Ok(Some(nested.enclosing_class));
            }
        }
    }
    Ok(None)
}

/// The `TypeDef` row whose `MethodList`/`FieldList` run covers `member_row`,
/// found by locating the last row whose run starts at or before it (§II.22,
/// "owner-of-range" pattern shared by `TypeDef.MethodList`/`FieldList`).
fn owning_type_def(metadata: &Metadata, member_row: u32, list: impl Fn(&super::rows::TypeDefRow) -> u32) -> Result<u32> {
    let type_defs = metadata.tables.rows(TableKind::TypeDef);
    let mut owner = None;
    for (index, row) in type_defs.iter().enumerate() {
        if let Row::TypeDef(type_def) = row {
            if list(type_def) <= member_row && list(type_def) != 0 {
                owner = Some(index as u32 + 1);
            }
        }
    }
    owner.ok_or_else(|| Error::resolution_failure(format!("no TypeDef owns row {member_row}")))
}

/// # [II.22.26] MethodDef, resolved against its declaring type and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub declaring_type: TypeDefinition,
    pub name: String,
    pub signature: MethodSignature,
}

impl MethodDescriptor {
    pub fn from_row_index(metadata: &Metadata, row_index: u32) -> Result<MethodDescriptor> {
        let row = match metadata.tables.rows(TableKind::MethodDef).get(row_index as usize - 1) {
            Some(Row::MethodDef(row)) => *row,
            _ => return Err(Error::invalid_token(row_index)),
        };
        let owner = owning_type_def(metadata, row_index, |t| t.method_list)?;
        let declaring_type = TypeDefinition::from_row_index(metadata, owner)?;
        let name = metadata.strings.get(row.name.0)?.to_string();
        let blob = metadata.blobs.get(row.signature.0)?;
        let signature = MethodSignature::decode(&mut super::io::Reader::new(blob))?;
        Ok(MethodDescriptor { declaring_type, name, signature })
    }
}

/// An instantiation of a generic method (`MethodSpec`). Distinct from
/// [`MethodDescriptor`] by construction: a method specification and its
/// base generic method are never equal under [`SignatureComparer`], since
/// the comparer has no method that treats the two types as interchangeable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpecDescriptor {
    pub base_method: MethodDescriptor,
    pub type_arguments: Vec<TypeSignature>,
}

/// # [II.22.15] Field, resolved against its declaring type and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub declaring_type: TypeDefinition,
    pub name: String,
    pub signature: TypeSignature,
}

impl FieldDescriptor {
    pub fn from_row_index(metadata: &Metadata, row_index: u32) -> Result<FieldDescriptor> {
        let row = match metadata.tables.rows(TableKind::Field).get(row_index as usize - 1) {
            Some(Row::Field(row)) => *row,
            _ => return Err(Error::invalid_token(row_index)),
        };
        let owner = owning_type_def(metadata, row_index, |t| t.field_list)?;
        let declaring_type = TypeDefinition::from_row_index(metadata, owner)?;
        let name = metadata.strings.get(row.name.0)?.to_string();
        let blob = metadata.blobs.get(row.signature.0)?;
        let field_signature = super::signature::FieldSignature::decode(&mut super::io::Reader::new(blob))?;
        Ok(FieldDescriptor { declaring_type, name, signature: field_signature.ty })
    }
}

/// A resolved `TypeDefOrRefOrSpec`: either lands on a concrete definition
/// (same module) or a reference that must be followed further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Definition(TypeDefinition),
    Reference(TypeReference),
}

/// Resolves a signature-embedded [`TypeDefOrRefOrSpec`] against the
/// module it was read from. `TypeSpec` is not resolvable this way (it
/// names a signature, not a row with a name) and yields `None`.
pub fn resolve_type_def_or_ref(metadata: &Metadata, coded: &TypeDefOrRefOrSpec) -> Result<Option<ResolvedType>> {
    match coded.table {
        TableKind::TypeDef => Ok(Some(ResolvedType::Definition(TypeDefinition::from_row_index(metadata, coded.row)?))),
        TableKind::TypeRef => Ok(Some(ResolvedType::Reference(TypeReference::from_row_index(metadata, coded.row)?))),
        TableKind::TypeSpec => Ok(None),
        other => Err(Error::malformed_encoding(format!("{other:?} is not a type"))),
    }
}

/// # [§4.8] External collaborator: resolves an assembly reference to its
/// decoded metadata. Implementations decide where bytes come from (file
/// system, GAC, an in-memory test fixture); this crate only defines the
/// contract and a caching adapter.
pub trait AssemblyResolver {
    fn load(&self, reference: &AssemblyIdentity) -> Option<Metadata>;
}

/// A resolved assembly: its identity plus the metadata `load` produced.
#[derive(Debug)]
pub struct ResolvedAssembly {
    pub identity: AssemblyIdentity,
    pub metadata: Metadata,
}

/// Wraps an [`AssemblyResolver`] with a name-keyed cache so repeated
/// lookups for the same reference (common when resolving many `TypeRef`s
/// against the same core library) do not re-decode metadata. Negative
/// results (`None`) are cached too, so an unresolvable reference is not
/// retried.
pub struct CachingAssemblyResolver<R> {
    inner: R,
    cache: RefCell<HashMap<String, Option<Rc<ResolvedAssembly>>>>,
}

impl<R: AssemblyResolver> CachingAssemblyResolver<R> {
    pub fn new(inner: R) -> CachingAssemblyResolver<R> {
        CachingAssemblyResolver { inner, cache: RefCell::new(HashMap::new()) }
    }

    pub fn resolve(&self, reference: &AssemblyIdentity) -> Option<Rc<ResolvedAssembly>> {
        if let Some(cached) = self.cache.borrow().get(&reference.name) {
            return cached.clone();
        }
        let resolved = self
            .inner
            .load(reference)
            .map(|metadata| Rc::new(ResolvedAssembly { identity: reference.clone(), metadata }));
        self.cache.borrow_mut().insert(reference.name.clone(), resolved.clone());
        resolved
    }

    pub fn add_to_cache(&self, reference: AssemblyIdentity, assembly: ResolvedAssembly) {
        self.cache.borrow_mut().insert(reference.name, Some(Rc::new(assembly)));
    }
}

/// # [§4.8] Structural comparer over the descriptor types above.
///
/// `version_agnostic` mutates both [`SignatureComparer::assembly_eq`] and
/// [`SignatureComparer::assembly_hash`] identically, so that two
/// `AssemblyIdentity`s differing only by version dedupe into the same
/// bucket when the flag is set — required for matching references across
/// side-by-side corlib versions.
pub struct SignatureComparer<'a, R> {
    pub version_agnostic: bool,
    pub resolver: &'a CachingAssemblyResolver<R>,
}

impl<'a, R: AssemblyResolver> SignatureComparer<'a, R> {
    pub fn assembly_eq(&self, a: &AssemblyIdentity, b: &AssemblyIdentity) -> bool {
        a.name == b.name
            && (self.version_agnostic || a.version == b.version)
            && a.culture == b.culture
            && a.public_key_or_token == b.public_key_or_token
    }

    pub fn assembly_hash(&self, identity: &AssemblyIdentity) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        identity.name.hash(&mut hasher);
        if !self.version_agnostic {
            identity.version.hash(&mut hasher);
        }
        identity.culture.hash(&mut hasher);
        identity.public_key_or_token.hash(&mut hasher);
        hasher.finish()
    }

    fn namespace_eq(a: Option<&str>, b: Option<&str>) -> bool {
        a.unwrap_or("") == b.unwrap_or("")
    }

    /// Follows `ExportedType` forwarding from `scope` for `namespace`/
    /// `name`, returning the assembly the type actually lives in. Returns
    /// `None` for scopes that are not themselves assembly references
    /// (`Module`, `ModuleRef`, nested `TypeRef`) — those compare
    /// structurally instead, see [`SignatureComparer::scope_eq`].
    fn resolve_forwarded_scope(&self, scope: &ResolutionScope, namespace: Option<&str>, name: &str) -> Option<AssemblyIdentity> {
        let identity = match scope {
            ResolutionScope::AssemblyRef(identity) => identity.clone(),
            _ => return None,
        };
        let resolved = self.resolver.resolve(&identity)?;
        for row in resolved.metadata.tables.rows(TableKind::ExportedType) {
            let Row::ExportedType(exported) = row else { continue };
            if !exported.flags.is_type_forwarder() {
                continue;
            }
            let exported_name = resolved.metadata.strings.get(exported.type_name.0).ok()?;
            let exported_namespace = resolved.metadata.strings.get(exported.type_namespace.0).ok();
            if exported_name != name || !Self::namespace_eq(namespace, exported_namespace) {
                continue;
            }
            if let CodedIndex { table: TableKind::AssemblyRef, row } = exported.implementation {
                if let Some(Row::AssemblyRef(target)) =
                    resolved.metadata.tables.rows(TableKind::AssemblyRef).get(row as usize - 1)
                {
                    return AssemblyIdentity::from_assembly_ref_row(&resolved.metadata, target).ok();
                }
            }
        }
        Some(identity)
    }

    fn scope_eq(&self, a: &ResolutionScope, b: &ResolutionScope) -> bool {
        match (a, b) {
            (ResolutionScope::Module, ResolutionScope::Module) => true,
            (ResolutionScope::ModuleRef(x), ResolutionScope::ModuleRef(y)) => x == y,
            (ResolutionScope::AssemblyRef(x), ResolutionScope::AssemblyRef(y)) => self.assembly_eq(x, y),
            (ResolutionScope::TypeRef(x), ResolutionScope::TypeRef(y)) => self.type_ref_eq(x, y),
            _ => false,
        }
    }

    /// Equality per §4.8: namespace (null/empty equal) and name match
    /// exactly; for a nested reference, declaring-type equality (i.e. the
    /// enclosing `TypeRef`) replaces scope equality; otherwise the scope's
    /// *resolved* assembly identity is compared — which is how a forwarded
    /// type stays equal to a reference naming its original assembly, but
    /// two references sharing a name in two different, unrelated
    /// forwarders do not collapse into each other.
    pub fn type_ref_eq(&self, a: &TypeReference, b: &TypeReference) -> bool {
        if !Self::namespace_eq(a.namespace.as_deref(), b.namespace.as_deref()) || a.name != b.name {
            return false;
        }
        if let (ResolutionScope::TypeRef(decl_a), ResolutionScope::TypeRef(decl_b)) = (&a.scope, &b.scope) {
            return self.type_ref_eq(decl_a, decl_b);
        }
        match (
            self.resolve_forwarded_scope(&a.scope, a.namespace.as_deref(), &a.name),
            self.resolve_forwarded_scope(&b.scope, b.namespace.as_deref(), &b.name),
        ) {
            (Some(ia), Some(ib)) => self.assembly_eq(&ia, &ib),
            _ => self.scope_eq(&a.scope, &b.scope),
        }
    }

    /// A `TypeDef` equals a `TypeRef` when names match and the
    /// definition's declaring assembly equals the reference's resolution
    /// scope (§4.8); nested types recurse through declaring types on both
    /// sides instead of comparing assemblies directly.
    pub fn type_def_ref_eq(&self, def: &TypeDefinition, reference: &TypeReference) -> bool {
        if !Self::namespace_eq(def.namespace.as_deref(), reference.namespace.as_deref()) || def.name != reference.name {
            return false;
        }
        match (&def.declaring_type, &reference.scope) {
            (Some(declaring_def), ResolutionScope::TypeRef(declaring_ref)) => {
                self.type_def_ref_eq(declaring_def, declaring_ref)
            }
            (None, ResolutionScope::AssemblyRef(identity)) => self.assembly_eq(&def.assembly, identity),
            (None, ResolutionScope::Module) | (None, ResolutionScope::ModuleRef(_)) => true,
            _ => false,
        }
    }

    pub fn type_def_eq(&self, a: &TypeDefinition, b: &TypeDefinition) -> bool {
        if !Self::namespace_eq(a.namespace.as_deref(), b.namespace.as_deref()) || a.name != b.name {
            return false;
        }
        match (&a.declaring_type, &b.declaring_type) {
            (Some(da), Some(db)) => self.type_def_eq(da, db),
            (None, None) => self.assembly_eq(&a.assembly, &b.assembly),
            _ => false,
        }
    }

    fn resolved_type_eq(&self, a: &ResolvedType, b: &ResolvedType) -> bool {
        match (a, b) {
            (ResolvedType::Reference(x), ResolvedType::Reference(y)) => self.type_ref_eq(x, y),
            (ResolvedType::Definition(x), ResolvedType::Definition(y)) => self.type_def_eq(x, y),
            (ResolvedType::Definition(x), ResolvedType::Reference(y)) => self.type_def_ref_eq(x, y),
            (ResolvedType::Reference(x), ResolvedType::Definition(y)) => self.type_def_ref_eq(y, x),
        }
    }

    /// Structural signature equality per §4.8. `resolve_a`/`resolve_b`
    /// resolve each side's `ValueType`/`Class`/`GenericInst` base against
    /// the module that signature came from (see
    /// [`resolve_type_def_or_ref`]); unresolvable references (a `TypeSpec`
    /// base, or a lookup failure) fall back to comparing the raw coded
    /// index, which is sound within a single module but not across two.
    pub fn signature_eq(
        &self,
        a: &TypeSignature,
        b: &TypeSignature,
        resolve_a: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
        resolve_b: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
    ) -> bool {
        use TypeSignature::*;
        match (a, b) {
            (ValueType(ra), ValueType(rb)) | (Class(ra), Class(rb)) => match (resolve_a(ra), resolve_b(rb)) {
                (Some(x), Some(y)) => self.resolved_type_eq(&x, &y),
                _ => ra == rb,
            },
            (Ptr(_, ia), Ptr(_, ib)) | (ByRef(ia), ByRef(ib)) | (Pinned(ia), Pinned(ib)) => {
                self.signature_eq(ia, ib, resolve_a, resolve_b)
            }
            (SzArray(_, ia), SzArray(_, ib)) => self.signature_eq(ia, ib, resolve_a, resolve_b),
            (Array(ea, sa), Array(eb, sb)) => {
                sa.rank == sb.rank
                    && sa.sizes == sb.sizes
                    && sa.lower_bounds == sb.lower_bounds
                    && self.signature_eq(ea, eb, resolve_a, resolve_b)
            }
            (GenericInst { is_value_type: va, base: ba, args: aa }, GenericInst { is_value_type: vb, base: bb, args: ab }) => {
                va == vb
                    && aa.len() == ab.len()
                    && match (resolve_a(ba), resolve_b(bb)) {
                        (Some(x), Some(y)) => self.resolved_type_eq(&x, &y),
                        _ => ba == bb,
                    }
                    && aa.iter().zip(ab).all(|(x, y)| self.signature_eq(x, y, resolve_a, resolve_b))
            }
            (FnPtr(sa), FnPtr(sb)) => self.method_signature_eq(sa, sb, resolve_a, resolve_b),
            _ => a == b,
        }
    }

    fn param_eq(
        &self,
        a: &Param,
        b: &Param,
        resolve_a: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
        resolve_b: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
    ) -> bool {
        a.by_ref == b.by_ref && self.signature_eq(&a.ty, &b.ty, resolve_a, resolve_b)
    }

    pub fn method_signature_eq(
        &self,
        a: &MethodSignature,
        b: &MethodSignature,
        resolve_a: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
        resolve_b: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
    ) -> bool {
        a.calling_convention.0 == b.calling_convention.0
            && a.generic_param_count == b.generic_param_count
            && a.params.len() == b.params.len()
            && self.param_eq(&a.return_type, &b.return_type, resolve_a, resolve_b)
            && a.params.iter().zip(&b.params).all(|(pa, pb)| self.param_eq(pa, pb, resolve_a, resolve_b))
    }

    /// Declaring type, name, and signature must all match (§4.8).
    pub fn method_eq(
        &self,
        a: &MethodDescriptor,
        b: &MethodDescriptor,
        resolve_a: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
        resolve_b: &impl Fn(&TypeDefOrRefOrSpec) -> Option<ResolvedType>,
    ) -> bool {
        a.name == b.name
            && self.type_def_eq(&a.declaring_type, &b.declaring_type)
            && self.method_signature_eq(&a.signature, &b.signature, resolve_a, resolve_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::flags::{AssemblyFlags, TypeAttributes};
    use super::super::heaps::{BlobHeapBuilder, StringHeapBuilder};
    use super::super::index::{BlobIndex, StringIndex};
    use super::super::rows::{AssemblyRefRow, AssemblyRow, ExportedTypeRow, ModuleRow};

    struct NoAssemblies;
    impl AssemblyResolver for NoAssemblies {
        fn load(&self, _reference: &AssemblyIdentity) -> Option<Metadata> {
            None
        }
    }

    fn identity(name: &str, version: (u16, u16, u16, u16)) -> AssemblyIdentity {
        AssemblyIdentity { name: name.to_string(), version, culture: None, public_key_or_token: Vec::new(), flags: AssemblyFlags::new(0) }
    }

    #[test]
    fn version_agnostic_flag_drives_both_eq_and_hash() {
        let resolver = CachingAssemblyResolver::new(NoAssemblies);
        let strict = SignatureComparer { version_agnostic: false, resolver: &resolver };
        let agnostic = SignatureComparer { version_agnostic: true, resolver: &resolver };

        let v1 = identity("mscorlib", (4, 0, 0, 0));
        let v2 = identity("mscorlib", (2, 0, 0, 0));

        assert!(!strict.assembly_eq(&v1, &v2));
        assert!(agnostic.assembly_eq(&v1, &v2));
        assert_eq!(agnostic.assembly_hash(&v1), agnostic.assembly_hash(&v2));
    }

    /// Builds a one-assembly module whose manifest `Assembly` row is
    /// `assembly_name`, with an `ExportedType` row that forwards
    /// `type_name` to `forwarded_to` (an `AssemblyRef` also in this
    /// module).
    fn forwarding_module(assembly_name: &str, type_name: &str, forwarded_to: &str) -> Metadata {
        let mut strings = StringHeapBuilder::new();
        let assembly_name_off = strings.insert(assembly_name);
        let type_name_off = strings.insert(type_name);
        let empty_namespace_off = strings.insert("");
        let forwarded_name_off = strings.insert(forwarded_to);

        let mut metadata = Metadata::new("v4.0.30319");
        metadata.tables.insert(
            TableKind::Module,
            vec![Row::Module(ModuleRow {
                generation: 0,
                name: StringIndex(assembly_name_off),
                mvid: super::super::index::GuidIndex(0),
                enc_id: super::super::index::GuidIndex(0),
                enc_base_id: super::super::index::GuidIndex(0),
            })],
        );
        metadata.tables.insert(
            TableKind::Assembly,
            vec![Row::Assembly(AssemblyRow {
                hash_alg_id: 0x8004,
                major_version: 1,
                minor_version: 0,
                build_number: 0,
                revision_number: 0,
                flags: AssemblyFlags::new(0),
                public_key: BlobIndex(0),
                name: StringIndex(assembly_name_off),
                culture: StringIndex(0),
            })],
        );
        metadata.tables.insert(
            TableKind::AssemblyRef,
            vec![Row::AssemblyRef(AssemblyRefRow {
                major_version: 1,
                minor_version: 0,
                build_number: 0,
                revision_number: 0,
                flags: AssemblyFlags::new(0),
                public_key_or_token: BlobIndex(0),
                name: StringIndex(forwarded_name_off),
                culture: StringIndex(0),
                hash_value: BlobIndex(0),
            })],
        );
        metadata.tables.insert(
            TableKind::ExportedType,
            vec![Row::ExportedType(ExportedTypeRow {
                flags: TypeAttributes::new(0x0020_0000),
                type_def_id: 0,
                type_name: StringIndex(type_name_off),
                type_namespace: StringIndex(empty_namespace_off),
                implementation: CodedIndex::new(TableKind::AssemblyRef, 1),
            })],
        );
        metadata.strings = strings.into_heap();
        metadata
    }

    struct StaticResolver {
        by_name: HashMap<String, Metadata>,
    }
    impl AssemblyResolver for StaticResolver {
        fn load(&self, reference: &AssemblyIdentity) -> Option<Metadata> {
            self.by_name.get(&reference.name).cloned()
        }
    }

    #[test]
    fn forwarded_type_reference_resolves_to_same_identity_as_direct_reference() {
        let original = forwarding_module("Original", "Widget", "NewHome");
        let mut by_name = HashMap::new();
        by_name.insert("Original".to_string(), original);
        let resolver = CachingAssemblyResolver::new(StaticResolver { by_name });
        let comparer = SignatureComparer { version_agnostic: false, resolver: &resolver };

        let via_forwarder = TypeReference {
            namespace: None,
            name: "Widget".to_string(),
            scope: ResolutionScope::AssemblyRef(identity("Original", (1, 0, 0, 0))),
        };
        let direct = TypeReference {
            namespace: None,
            name: "Widget".to_string(),
            scope: ResolutionScope::AssemblyRef(identity("NewHome", (1, 0, 0, 0))),
        };

        assert!(comparer.type_ref_eq(&via_forwarder, &direct));
    }

    #[test]
    fn unrelated_assemblies_sharing_a_type_name_are_not_equal() {
        let resolver = CachingAssemblyResolver::new(NoAssemblies);
        let comparer = SignatureComparer { version_agnostic: false, resolver: &resolver };

        let a = TypeReference {
            namespace: None,
            name: "Widget".to_string(),
            scope: ResolutionScope::AssemblyRef(identity("VendorA", (1, 0, 0, 0))),
        };
        let b = TypeReference {
            namespace: None,
            name: "Widget".to_string(),
            scope: ResolutionScope::AssemblyRef(identity("VendorB", (1, 0, 0, 0))),
        };

        assert!(!comparer.type_ref_eq(&a, &b));
    }
}
