mod error;
mod io;
mod segment;
mod heaps;
mod layout;
mod kind;
mod index;
mod flags;
mod rows;
mod tables_stream;

mod headers;
mod metadata;
mod image;
mod signature;
mod model;

pub use error::{Error, Result};
pub use io::{Reader, Writer};
pub use segment::{RelocationParameters, align_up};
pub use heaps::{BlobHeap, BlobHeapBuilder, GuidHeap, GuidHeapBuilder, HeapSizes, StringHeap, StringHeapBuilder, UserStringHeap, UserStringHeapBuilder};
pub use layout::TableLayout;
pub use kind::TableKind;
pub use index::*;
pub use flags::*;
pub use rows::*;
pub use tables_stream::{TablesStream, TablesStreamHeader};

pub use headers::*;
pub use metadata::Metadata;
pub use image::{PeImage, PeSection};
pub use signature::{
    ArrayShape, CallingConvention, CustomMod, ElementType, FieldSignature, LocalVarSignature,
    MethodSignature, Param, PropertySignature, TypeDefOrRefOrSpec, TypeSignature,
};
pub use model::{
    AssemblyIdentity, AssemblyResolver, CachingAssemblyResolver, FieldDescriptor,
    MethodDescriptor, MethodSpecDescriptor, ModuleReference, ResolutionScope, ResolvedAssembly,
    ResolvedType, SignatureComparer, TypeDefinition, TypeReference, resolve_type_def_or_ref,
};
