use super::error::{Error, Result};
use super::flags::{FileCharacteristics, RuntimeFlags, SectionCharacteristics};
use super::index::MetadataToken;
use super::io::{Reader, Writer};

/// # [II.25.2.2] PE file header
///
/// Immediately after the PE signature is the PE File header consisting of the following:
///
/// | Offset | Size | Field                   | Description |
/// | ------ | ---- | ----------------------- | ----------- |
/// | 0x00   | 2    | Machine                 | Always `0x14c`. |
/// | 0x02   | 2    | Number of Sections      | Number of sections; indicates size of the Section Table, which immediately follows the headers. |
/// | 0x04   | 4    | Time/Date Stamp         | Time and date the file was created in seconds since `January 1st 1970 00:00:00` or `0`. |
/// | 0x08   | 4    | Pointer to Symbol Table | Always `0` ([§II.24.1]). |
/// | 0x0c   | 4    | Number of Symbols       | Always `0` ([§II.24.1]). |
/// | 0x10   | 2    | Optional Header Size    | Size of the optional header, the format is described below. |
/// | 0x12   | 2    | Characteristics         | Flags indicating attributes of the file, see [`FileCharacteristics`]. |
///
/// [§II.24.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeHeader {
    pub machine: u16,
    pub number_of_sections: u16,
    pub time_date_stamp: u32,
    pub pointer_to_symbol_table: u32,
    pub number_of_symbols: u32,
    pub optional_header_size: u16,
    pub characteristics: FileCharacteristics,
}

impl PeHeader {
    pub const SIZE: usize = 20;

    pub const MACHINE_I386: u16 = 0x014c;
    pub const MACHINE_AMD64: u16 = 0x8664;
    pub const MACHINE_ARM64: u16 = 0xAA64;

    pub fn decode(reader: &mut Reader) -> Result<PeHeader> {
        Ok(PeHeader {
            machine: reader.read_u16()?,
            number_of_sections: reader.read_u16()?,
            time_date_stamp: reader.read_u32()?,
            pointer_to_symbol_table: reader.read_u32()?,
            number_of_symbols: reader.read_u32()?,
            optional_header_size: reader.read_u16()?,
            characteristics: FileCharacteristics::new(reader.read_u16()?),
        })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u16(self.machine);
        writer.write_u16(self.number_of_sections);
        writer.write_u32(self.time_date_stamp);
        writer.write_u32(self.pointer_to_symbol_table);
        writer.write_u32(self.number_of_symbols);
        writer.write_u16(self.optional_header_size);
        writer.write_u16(self.characteristics.raw());
    }
}

/// # [II.24.2] File headers
/// ## [II.24.2.1] Metadata root
///
/// The root of the physical metadata starts with a magic signature, several bytes of version and other
/// miscellaneous information, followed by a count and an array of stream headers, one for each stream
/// that is present. The actual encoded tables and heaps are stored in the streams, which immediately
/// follow this array of headers.
///
/// | Offset       | Size     | Field         | Description |
/// | ------------ | -------- | -----------   | ----------- |
/// | 0            | 4        | Signature     | Magic signature for physical metadata : `0x424A5342`. |
/// | 4            | 2        | MajorVersion  | Major version, 1 (ignore on read) |
/// | 6            | 2        | MinorVersion  | Minor version, 1 (ignore on read) |
/// | 8            | 4        | Reserved      | Reserved, always 0 ([§II.24.1]). |
/// | 12           | 4        | Length        | Number of bytes allocated to hold version string (including null terminator), call this *x*. Call the length of the string (including the terminator) *m* (we require *m* <= 255); the length *x* is *m* rounded up to a multiple of four. |
/// | 16           | *m*      | Version       | UTF8-encoded null-terminated version string of length *m* (see above) |
/// | 16+*m*       | *x*-*m*  | Padding       | Padding to next 4 byte boundary. |
/// | 16+*x*       | 2        | Flags         | Reserved, always 0 ([§II.24.1]). |
/// | 16+*x*+2     | 2        | Streams       | Number of streams, say *n*. |
/// | 16+*x*+4     | -        | StreamHeaders | Array of *n* [`StreamHeader`] structures. |
///
/// [§II.24.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataHeader {
    pub major_version: u16,
    pub minor_version: u16,
    pub version: String,
    pub flags: u16,
    pub stream_headers: Vec<StreamHeader>,
}

impl MetadataHeader {
    pub const SIGNATURE: u32 = 0x424A5342;

    pub fn decode(reader: &mut Reader) -> Result<MetadataHeader> {
        let signature = reader.read_u32()?;
        if signature != Self::SIGNATURE {
            return Err(Error::invalid_pe(format!("bad metadata root signature {:#010x}", signature)));
        }

        let major_version = reader.read_u16()?;
        let minor_version = reader.read_u16()?;
        reader.read_u32()?; // reserved, always 0
        let length = reader.read_u32()?;

        let version_bytes = reader.read_bytes(length as usize)?;
        let nul_at = version_bytes.iter().position(|&b| b == 0).unwrap_or(version_bytes.len());
        let version = String::from_utf8(version_bytes[..nul_at].to_vec())
            .map_err(|_| Error::malformed_encoding("non-UTF-8 metadata version string"))?;

        let flags = reader.read_u16()?;
        let stream_count = reader.read_u16()?;

        let mut stream_headers = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            stream_headers.push(StreamHeader::decode(reader)?);
        }

        Ok(MetadataHeader { major_version, minor_version, version, flags, stream_headers })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u32(Self::SIGNATURE);
        writer.write_u16(self.major_version);
        writer.write_u16(self.minor_version);
        writer.write_u32(0);

        let mut version_bytes = self.version.as_bytes().to_vec();
        version_bytes.push(0);
        while version_bytes.len() % 4 != 0 {
            version_bytes.push(0);
        }
        writer.write_u32(version_bytes.len() as u32);
        writer.write_bytes(&version_bytes);

        writer.write_u16(self.flags);
        writer.write_u16(self.stream_headers.len() as u16);
        for header in &self.stream_headers {
            header.encode(writer);
        }
    }
}

/// # [II.24.2.2] Stream header
///
/// A stream header gives the names, and the position and length of a particular table or heap. Note that the
/// length of a Stream header structure is not fixed, but depends on the length of its name field (a variable
/// length null-terminated string).
///
/// | Offset | Size | Field  | Description |
/// | ------ | ---- | ------ | ----------- |
/// | 0      | 4    | Offset | Memory offset to start of this stream from start of the metadata root ([`MetadataHeader`]) |
/// | 4      | 4    | Size   | Size of this stream in bytes, shall be a multiple of 4. |
/// | 8      | -    | Name   | Name of the stream as null-terminated variable length array of ASCII characters, padded to the next 4-byte boundary with `\0` characters. The name is limited to 32 characters. |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    pub offset: u32,
    pub size: u32,
    pub name: String,
}

impl StreamHeader {
    pub fn decode(reader: &mut Reader) -> Result<StreamHeader> {
        let offset = reader.read_u32()?;
        let size = reader.read_u32()?;
        let name = reader.read_c_str()?;
        let padding = (4 - ((name.len() + 1) % 4)) % 4;
        reader.skip(padding)?;
        Ok(StreamHeader { offset, size, name })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u32(self.offset);
        writer.write_u32(self.size);
        writer.write_c_str(&self.name);
        let padding = (4 - ((self.name.len() + 1) % 4)) % 4;
        for _ in 0..padding {
            writer.write_u8(0);
        }
    }
}

/// # [II.25.2.3] PE optional header
///
/// Immediately after the PE Header is the PE Optional Header. This header contains the following information:
///
/// | Offset | Size        | Header part         | Description |
/// |--------|-------------|---------------------|-------------|
/// | 0      | 28 or 24    | Standard fields     | These define general properties of the PE file, see [`StandardFields`]. A PE32+ image omits `BaseOfData`, shortening this block by 4 bytes. |
/// | -      | 68 or 88    | NT-specific fields  | These include additional fields to support specific features of Windows, see [`NtSpecificFields`]. A PE32+ image widens the image base and the four reserve/commit sizes to 8 bytes each. |
/// | -      | 128         | Data directories    | These fields are address/size pairs for special tables, found in the image file (for example, Import Table and Export Table). |
///
/// Managed images in the wild are overwhelmingly PE32 (`Magic == 0x10B`); PE32+ (`Magic == 0x20B`,
/// used by native AMD64/IA64 images) is supported here for completeness rather than because the CLI
/// commonly emits it — §II.25.2.3.1 allows it, and some cross-compiled AnyCPU-on-native-host tools do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeOptionalHeader {
    pub standard_fields: StandardFields,
    pub nt_specific_fields: NtSpecificFields,
    pub data_directories: DataDirectories,
}

impl PeOptionalHeader {
    pub fn decode(reader: &mut Reader) -> Result<PeOptionalHeader> {
        let standard_fields = StandardFields::decode(reader)?;
        let nt_specific_fields = NtSpecificFields::decode(reader, standard_fields.is_pe32_plus())?;
        let data_directories = DataDirectories::decode(reader)?;
        Ok(PeOptionalHeader { standard_fields, nt_specific_fields, data_directories })
    }

    pub fn encode(&self, writer: &mut Writer) {
        self.standard_fields.encode(writer);
        self.nt_specific_fields.encode(writer, self.standard_fields.is_pe32_plus());
        self.data_directories.encode(writer);
    }

    pub fn is_pe32_plus(&self) -> bool {
        self.standard_fields.is_pe32_plus()
    }
}

/// # [II.25.2.3.1] PE header standard fields
///
/// These fields are required for all PE files and contain the following information:
///
/// | Offset | Size | Field         | Description |
/// | ------ | ---- | ------------- | ----------- |
/// | 0      | 2    | Magic         | `0x10B` for PE32, `0x20B` for PE32+. |
/// | 2      | 1    | LMajor        | Always `6` ([§II.24.1]). |
/// | 3      | 1    | LMinor        | Always `0` ([§II.24.1]). |
/// | 4      | 4    | Code Size     | Size of the code (text) section, or the sum of all code sections if there are multiple sections. |
/// | 8      | 4    | Initialized Data Size   | Size of the initialized data section, or the sum of all such sections. |
/// | 12     | 4    | Uninitialized Data Size | Size of the uninitialized data section, or the sum of all such sections. |
/// | 16     | 4    | Entry Point RVA | RVA of entry point, needs to point to bytes `0xFF` `0x25` followed by the RVA in a section marked execute/read for EXEs or 0 for DLLs |
/// | 20     | 4    | Base Of Code  | RVA of the code section. (This is a hint to the loader.) |
/// | 24     | 4    | Base Of Data  | RVA of the data section (this is a hint to the loader); absent in PE32+. |
///
/// The entry point RVA shall always be either the `x86` entry point stub or be `0`. On non-CLI aware
/// platforms, this stub will call the entry point API of `mscoree` (`_CorExeMain` or `_CorDllMain`). The
/// `mscoree` entry point will use the module handle to load the metadata from the image, and invoke the
/// entry point specified in the CLI header.
///
/// [§II.24.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFields {
    pub magic: u16,
    pub l_major: u8,
    pub l_minor: u8,
    pub code_size: u32,
    pub initialized_data_size: u32,
    pub uninitialized_data_size: u32,
    pub entry_point_rva: u32,
    pub base_of_code: u32,
    pub base_of_data: Option<u32>,
}

impl StandardFields {
    pub const PE32_MAGIC: u16 = 0x10B;
    pub const PE32_PLUS_MAGIC: u16 = 0x20B;

    pub fn decode(reader: &mut Reader) -> Result<StandardFields> {
        let magic = reader.read_u16()?;
        if magic != Self::PE32_MAGIC && magic != Self::PE32_PLUS_MAGIC {
            return Err(Error::invalid_pe(format!("unrecognized optional header magic {:#06x}", magic)));
        }
        let l_major = reader.read_u8()?;
        let l_minor = reader.read_u8()?;
        let code_size = reader.read_u32()?;
        let initialized_data_size = reader.read_u32()?;
        let uninitialized_data_size = reader.read_u32()?;
        let entry_point_rva = reader.read_u32()?;
        let base_of_code = reader.read_u32()?;
        let base_of_data = if magic == Self::PE32_MAGIC { Some(reader.read_u32()?) } else { None };

        Ok(StandardFields {
            magic,
            l_major,
            l_minor,
            code_size,
            initialized_data_size,
            uninitialized_data_size,
            entry_point_rva,
            base_of_code,
            base_of_data,
        })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u16(self.magic);
        writer.write_u8(self.l_major);
        writer.write_u8(self.l_minor);
        writer.write_u32(self.code_size);
        writer.write_u32(self.initialized_data_size);
        writer.write_u32(self.uninitialized_data_size);
        writer.write_u32(self.entry_point_rva);
        writer.write_u32(self.base_of_code);
        if let Some(base_of_data) = self.base_of_data {
            writer.write_u32(base_of_data);
        }
    }

    pub fn is_pe32_plus(&self) -> bool {
        self.magic == Self::PE32_PLUS_MAGIC
    }
}

/// # [II.25.2.3.2] PE header Windows NT-specific fields
///
/// These fields are Windows NT specific. `image_base`, and the four reserve/commit sizes, are 4 bytes
/// wide in a PE32 image and 8 bytes wide in a PE32+ image; every other field keeps the same width in
/// both formats.
///
/// | Offset | Size    | Field                      | Description |
/// | ------ | ------- | -------------------------- | ----------- |
/// | -      | 4 or 8  | Image Base                 | Shall be a multiple of `0x10000`. |
/// | -      | 4       | Section Alignment          | Shall be greater than File Alignment. |
/// | -      | 4       | File Alignment             | Should be `0x200` ([§II.24.1]). |
/// | -      | 2       | OS Major                   | Should be 5 ([§II.24.1]). |
/// | -      | 2       | OS Minor                   | Should be 0 ([§II.24.1]). |
/// | -      | 2       | User Major                 | Should be 0 ([§II.24.1]). |
/// | -      | 2       | User Minor                 | Should be 0 ([§II.24.1]). |
/// | -      | 2       | SubSys Major                | Should be 5 ([§II.24.1]). |
/// | -      | 2       | SubSys Minor                | Should be 0 ([§II.24.1]). |
/// | -      | 4       | Reserved                   | Shall be zero |
/// | -      | 4       | Image Size                 | Size, in bytes, of image, including all headers and padding; shall be a multiple of Section Alignment. |
/// | -      | 4       | Header Size                | Combined size of MS-DOS Header, PE Header, PE Optional Header and padding; shall be a multiple of the file alignment. |
/// | -      | 4       | File Checksum              | Should be 0 ([§II.24.1]). |
/// | -      | 2       | SubSystem                  | Shall be either `IMAGE_SUBSYSTEM_WINDOWS_CUI` (`0x3`) or `IMAGE_SUBSYSTEM_WINDOWS_GUI` (`0x2`). |
/// | -      | 2       | DLL Flags                  | Bits `0x100f` shall be zero. |
/// | -      | 4 or 8  | Stack Reserve Size         | Should be `0x100000` (1Mb) ([§II.24.1]). |
/// | -      | 4 or 8  | Stack Commit Size          | Should be `0x1000` (4Kb) ([§II.24.1]). |
/// | -      | 4 or 8  | Heap Reserve Size          | Should be `0x100000` (1Mb) ([§II.24.1]). |
/// | -      | 4 or 8  | Heap Commit Size           | Should be `0x1000` (4Kb) ([§II.24.1]). |
/// | -      | 4       | Loader Flags               | Shall be 0 |
/// | -      | 4       | Number of Data Directories | Shall be `0x10` |
///
/// [§II.24.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NtSpecificFields {
    pub image_base: u64,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub os_major: u16,
    pub os_minor: u16,
    pub user_major: u16,
    pub user_minor: u16,
    pub sub_sys_major: u16,
    pub sub_sys_minor: u16,
    pub reserved: u32,
    pub image_size: u32,
    pub header_size: u32,
    pub file_checksum: u32,
    pub sub_system: u16,
    pub dll_flags: u16,
    pub stack_reserve_size: u64,
    pub stack_commit_size: u64,
    pub heap_reserve_size: u64,
    pub heap_commit_size: u64,
    pub loader_flags: u32,
    pub number_of_data_directories: u32,
}

impl NtSpecificFields {
    fn decode_size(reader: &mut Reader, is_pe32_plus: bool) -> Result<u64> {
        if is_pe32_plus { reader.read_u64() } else { Ok(reader.read_u32()? as u64) }
    }

    fn encode_size(writer: &mut Writer, value: u64, is_pe32_plus: bool) {
        if is_pe32_plus {
            writer.write_u64(value);
        } else {
            writer.write_u32(value as u32);
        }
    }

    pub fn decode(reader: &mut Reader, is_pe32_plus: bool) -> Result<NtSpecificFields> {
        let image_base = Self::decode_size(reader, is_pe32_plus)?;
        let section_alignment = reader.read_u32()?;
        let file_alignment = reader.read_u32()?;
        let os_major = reader.read_u16()?;
        let os_minor = reader.read_u16()?;
        let user_major = reader.read_u16()?;
        let user_minor = reader.read_u16()?;
        let sub_sys_major = reader.read_u16()?;
        let sub_sys_minor = reader.read_u16()?;
        let reserved = reader.read_u32()?;
        let image_size = reader.read_u32()?;
        let header_size = reader.read_u32()?;
        let file_checksum = reader.read_u32()?;
        let sub_system = reader.read_u16()?;
        let dll_flags = reader.read_u16()?;
        let stack_reserve_size = Self::decode_size(reader, is_pe32_plus)?;
        let stack_commit_size = Self::decode_size(reader, is_pe32_plus)?;
        let heap_reserve_size = Self::decode_size(reader, is_pe32_plus)?;
        let heap_commit_size = Self::decode_size(reader, is_pe32_plus)?;
        let loader_flags = reader.read_u32()?;
        let number_of_data_directories = reader.read_u32()?;

        Ok(NtSpecificFields {
            image_base,
            section_alignment,
            file_alignment,
            os_major,
            os_minor,
            user_major,
            user_minor,
            sub_sys_major,
            sub_sys_minor,
            reserved,
            image_size,
            header_size,
            file_checksum,
            sub_system,
            dll_flags,
            stack_reserve_size,
            stack_commit_size,
            heap_reserve_size,
            heap_commit_size,
            loader_flags,
            number_of_data_directories,
        })
    }

    pub fn encode(&self, writer: &mut Writer, is_pe32_plus: bool) {
        Self::encode_size(writer, self.image_base, is_pe32_plus);
        writer.write_u32(self.section_alignment);
        writer.write_u32(self.file_alignment);
        writer.write_u16(self.os_major);
        writer.write_u16(self.os_minor);
        writer.write_u16(self.user_major);
        writer.write_u16(self.user_minor);
        writer.write_u16(self.sub_sys_major);
        writer.write_u16(self.sub_sys_minor);
        writer.write_u32(self.reserved);
        writer.write_u32(self.image_size);
        writer.write_u32(self.header_size);
        writer.write_u32(self.file_checksum);
        writer.write_u16(self.sub_system);
        writer.write_u16(self.dll_flags);
        Self::encode_size(writer, self.stack_reserve_size, is_pe32_plus);
        Self::encode_size(writer, self.stack_commit_size, is_pe32_plus);
        Self::encode_size(writer, self.heap_reserve_size, is_pe32_plus);
        Self::encode_size(writer, self.heap_commit_size, is_pe32_plus);
        writer.write_u32(self.loader_flags);
        writer.write_u32(self.number_of_data_directories);
    }
}

/// # [II.25.2.3.3] PE header data directories
///
/// The optional header data directories give the address and size of several tables that appear in the
/// sections of the PE file. Each data directory entry contains the RVA and Size of the structure it
/// describes, in that order.
///
/// | Offset | Size | Field                   | Description |
/// | ------ | ---- | ----------------------- | ----------- |
/// | 96     | 8    | Export Table            | Always 0 ([§II.24.1]). |
/// | 104    | 8    | Import Table            | RVA and Size of Import Table, ([§II.25.3.1]). |
/// | 112    | 8    | Resource Table          | Always 0 ([§II.24.1]). |
/// | 120    | 8    | Exception Table         | Always 0 ([§II.24.1]). |
/// | 128    | 8    | Certificate Table       | Always 0 ([§II.24.1]). |
/// | 136    | 8    | Base Relocation Table   | Relocation Table; set to 0 if unused. |
/// | 144    | 8    | Debug                   | Always 0 ([§II.24.1]). |
/// | 152    | 8    | Copyright               | Always 0 ([§II.24.1]). |
/// | 160    | 8    | Global Ptr              | Always 0 ([§II.24.1]). |
/// | 168    | 8    | TLS Table               | Always 0 ([§II.24.1]). |
/// | 176    | 8    | Load Config Table       | Always 0 ([§II.24.1]). |
/// | 184    | 8    | Bound Import            | Always 0 ([§II.24.1]). |
/// | 192    | 8    | IAT                     | RVA and Size of Import Address Table, ([§II.25.3.1]). |
/// | 200    | 8    | Delay Import Descriptor | Always 0 ([§II.24.1]). |
/// | 208    | 8    | CLI Header              | CLI Header with directories for runtime data, ([§II.25.3.1]). |
/// | 216    | 8    | Reserved                | Always 0 ([§II.24.1]). |
///
/// The tables pointed to by the directory entries are stored in one of the PE file's sections; these sections
/// themselves are described by section headers.
///
/// [§II.25.3.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=305
/// [§II.24.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDirectories {
    pub export_table: DataDirectory,
    pub import_table: DataDirectory,
    pub resource_table: DataDirectory,
    pub exception_table: DataDirectory,
    pub certificate_table: DataDirectory,
    pub base_relocation_table: DataDirectory,
    pub debug: DataDirectory,
    pub copyright: DataDirectory,
    pub global_ptr: DataDirectory,
    pub tls_table: DataDirectory,
    pub load_config_table: DataDirectory,
    pub bound_import: DataDirectory,
    pub iat: DataDirectory,
    pub delay_import_descriptor: DataDirectory,
    pub cli_header: DataDirectory,
    pub reserved: DataDirectory,
}

impl DataDirectories {
    pub fn decode(reader: &mut Reader) -> Result<DataDirectories> {
        Ok(DataDirectories {
            export_table: DataDirectory::decode(reader)?,
            import_table: DataDirectory::decode(reader)?,
            resource_table: DataDirectory::decode(reader)?,
            exception_table: DataDirectory::decode(reader)?,
            certificate_table: DataDirectory::decode(reader)?,
            base_relocation_table: DataDirectory::decode(reader)?,
            debug: DataDirectory::decode(reader)?,
            copyright: DataDirectory::decode(reader)?,
            global_ptr: DataDirectory::decode(reader)?,
            tls_table: DataDirectory::decode(reader)?,
            load_config_table: DataDirectory::decode(reader)?,
            bound_import: DataDirectory::decode(reader)?,
            iat: DataDirectory::decode(reader)?,
            delay_import_descriptor: DataDirectory::decode(reader)?,
            cli_header: DataDirectory::decode(reader)?,
            reserved: DataDirectory::decode(reader)?,
        })
    }

    pub fn encode(&self, writer: &mut Writer) {
        self.export_table.encode(writer);
        self.import_table.encode(writer);
        self.resource_table.encode(writer);
        self.exception_table.encode(writer);
        self.certificate_table.encode(writer);
        self.base_relocation_table.encode(writer);
        self.debug.encode(writer);
        self.copyright.encode(writer);
        self.global_ptr.encode(writer);
        self.tls_table.encode(writer);
        self.load_config_table.encode(writer);
        self.bound_import.encode(writer);
        self.iat.encode(writer);
        self.delay_import_descriptor.encode(writer);
        self.cli_header.encode(writer);
        self.reserved.encode(writer);
    }

    /// All 16 directories in on-disk order, for rewriting RVAs during a
    /// rebuild without repeating every field name at each call site.
    pub fn iter_mut(&mut self) -> [&mut DataDirectory; 16] {
        [
            &mut self.export_table,
            &mut self.import_table,
            &mut self.resource_table,
            &mut self.exception_table,
            &mut self.certificate_table,
            &mut self.base_relocation_table,
            &mut self.debug,
            &mut self.copyright,
            &mut self.global_ptr,
            &mut self.tls_table,
            &mut self.load_config_table,
            &mut self.bound_import,
            &mut self.iat,
            &mut self.delay_import_descriptor,
            &mut self.cli_header,
            &mut self.reserved,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataDirectory {
    pub rva: u32,
    pub size: u32,
}

impl DataDirectory {
    pub fn new(rva: u32, size: u32) -> DataDirectory {
        DataDirectory { rva, size }
    }

    pub fn decode(reader: &mut Reader) -> Result<DataDirectory> {
        Ok(DataDirectory { rva: reader.read_u32()?, size: reader.read_u32()? })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u32(self.rva);
        writer.write_u32(self.size);
    }

    pub fn is_empty(&self) -> bool {
        self.rva == 0 && self.size == 0
    }
}

/// # [II.25.3] Section headers
///
/// Immediately following the optional header is the Section Table, which contains a number of section
/// headers. This positioning is required because the file header does not contain a direct pointer to the
/// section table; the location of the section table is determined by calculating the location of the first byte
/// after the headers.
///
/// Each section header has the following format, for a total of `40` bytes per entry:
///
/// | Offset | Size | Field                 | Description |
/// | ------ | ---- | --------------------- | ----------- |
/// | 0      | 8    | Name                  | An 8-byte, null-padded ASCII string. There is no terminating null if the string is exactly eight characters long. |
/// | 8      | 4    | VirtualSize           | Total size of the section in bytes. If this value is greater than SizeOfRawData, the section is zero-padded. |
/// | 12     | 4    | VirtualAddress        | For executable images this is the address of the first byte of the section, when loaded into memory, relative to the image base. |
/// | 16     | 4    | SizeOfRawData         | Size of the initialized data on disk in bytes, shall be a multiple of FileAlignment from the PE header. |
/// | 20     | 4    | PointerToRawData      | Offset of section's first page within the PE file. This shall be a multiple of FileAlignment from the optional header. |
/// | 24     | 4    | PointerToRelocations  | Should be 0 ([§II.24.1]). |
/// | 28     | 4    | PointerToLinenumbers  | Should be 0 ([§II.24.1]). |
/// | 32     | 2    | NumberOfRelocations   | Should be 0 ([§II.24.1]). |
/// | 34     | 2    | NumberOfLinenumbers   | Should be 0 ([§II.24.1]). |
/// | 36     | 4    | Characteristics       | Flags describing section's characteristics; see [`SectionCharacteristics`]. |
///
/// [§II.24.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub name: [u8; 8],
    pub virtual_size: u32,
    pub virtual_address: u32,
    pub size_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
    pub pointer_to_relocations: u32,
    pub pointer_to_linenumbers: u32,
    pub number_of_relocations: u16,
    pub number_of_linenumbers: u16,
    pub characteristics: SectionCharacteristics,
}

impl SectionHeader {
    pub const SIZE: usize = 40;

    pub fn decode(reader: &mut Reader) -> Result<SectionHeader> {
        Ok(SectionHeader {
            name: reader.read_array::<8>()?,
            virtual_size: reader.read_u32()?,
            virtual_address: reader.read_u32()?,
            size_of_raw_data: reader.read_u32()?,
            pointer_to_raw_data: reader.read_u32()?,
            pointer_to_relocations: reader.read_u32()?,
            pointer_to_linenumbers: reader.read_u32()?,
            number_of_relocations: reader.read_u16()?,
            number_of_linenumbers: reader.read_u16()?,
            characteristics: SectionCharacteristics::new(reader.read_u32()?),
        })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_bytes(&self.name);
        writer.write_u32(self.virtual_size);
        writer.write_u32(self.virtual_address);
        writer.write_u32(self.size_of_raw_data);
        writer.write_u32(self.pointer_to_raw_data);
        writer.write_u32(self.pointer_to_relocations);
        writer.write_u32(self.pointer_to_linenumbers);
        writer.write_u16(self.number_of_relocations);
        writer.write_u16(self.number_of_linenumbers);
        writer.write_u32(self.characteristics.raw());
    }

    /// The section name with trailing NUL padding trimmed, lossily decoded
    /// as ASCII (the ECMA-335 data directories this crate cares about only
    /// ever name sections `.text`/`.rsrc`/`.reloc`).
    pub fn name_str(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(self.name.len());
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }
}

/// # [II.25.3.3] CLI header
///
/// The CLI header contains all of the runtime-specific data entries and other information. The header
/// should be placed in a read-only, sharable section of the image. This header is defined as follows:
///
/// | Offset | Size | Field                     | Description |
/// | ------ | ---- | ------------------------- | ----------- |
/// | 0      | 4    | Cb                        | Size of the header in bytes |
/// | 4      | 2    | MajorRuntimeVersion       | The minimum version of the runtime required to run this program, currently 2. |
/// | 6      | 2    | MinorRuntimeVersion       | The minor portion of the version, currently 0. |
/// | 8      | 8    | MetaData                  | RVA and size of the physical metadata ([§II.24]). |
/// | 16     | 4    | Flags                     | Flags describing this runtime image ([`RuntimeFlags`]). |
/// | 20     | 4    | EntryPointToken           | Token for the `MethodDef` or `File` of the entry point for the image. |
/// | 24     | 8    | Resources                 | RVA and size of implementation-specific resources. |
/// | 32     | 8    | StrongNameSignature       | RVA of the hash data for this PE file used by the CLI loader for binding and versioning |
/// | 40     | 8    | CodeManagerTable          | Always 0 ([§II.24.1]). |
/// | 48     | 8    | VTableFixups              | RVA of an array of locations in the file that contain an array of function pointers (e.g., vtable slots). |
/// | 56     | 8    | ExportAddressTableJumps   | Always 0 ([§II.24.1]). |
/// | 64     | 8    | ManagedNativeHeader       | Always 0 ([§II.24.1]). |
///
/// [§II.24]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
/// [§II.24.1]: https://www.ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf#page=297
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliHeader {
    pub cb: u32,
    pub major_runtime_version: u16,
    pub minor_runtime_version: u16,
    pub meta_data: DataDirectory,
    pub flags: RuntimeFlags,
    pub entry_point_token: MetadataToken,
    pub resources: DataDirectory,
    pub strong_name_signature: DataDirectory,
    pub code_manager_table: DataDirectory,
    pub vtable_fixups: DataDirectory,
    pub export_address_table_jumps: DataDirectory,
    pub managed_native_header: DataDirectory,
}

impl CliHeader {
    pub const SIZE: usize = 72;

    pub fn decode(reader: &mut Reader) -> Result<CliHeader> {
        let cb = reader.read_u32()?;
        let major_runtime_version = reader.read_u16()?;
        let minor_runtime_version = reader.read_u16()?;
        let meta_data = DataDirectory::decode(reader)?;
        let flags = RuntimeFlags::new(reader.read_u32()?);
        let entry_point_token = MetadataToken::from_raw(reader.read_u32()?)?;
        let resources = DataDirectory::decode(reader)?;
        let strong_name_signature = DataDirectory::decode(reader)?;
        let code_manager_table = DataDirectory::decode(reader)?;
        let vtable_fixups = DataDirectory::decode(reader)?;
        let export_address_table_jumps = DataDirectory::decode(reader)?;
        let managed_native_header = DataDirectory::decode(reader)?;

        Ok(CliHeader {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data,
            flags,
            entry_point_token,
            resources,
            strong_name_signature,
            code_manager_table,
            vtable_fixups,
            export_address_table_jumps,
            managed_native_header,
        })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u32(self.cb);
        writer.write_u16(self.major_runtime_version);
        writer.write_u16(self.minor_runtime_version);
        self.meta_data.encode(writer);
        writer.write_u32(self.flags.raw());
        self.entry_point_token.encode(writer);
        self.resources.encode(writer);
        self.strong_name_signature.encode(writer);
        self.code_manager_table.encode(writer);
        self.vtable_fixups.encode(writer);
        self.export_address_table_jumps.encode(writer);
        self.managed_native_header.encode(writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::kind::TableKind;

    fn sample_pe_header() -> PeHeader {
        PeHeader {
            machine: 0x14c,
            number_of_sections: 2,
            time_date_stamp: 0,
            pointer_to_symbol_table: 0,
            number_of_symbols: 0,
            optional_header_size: (2 + 26 + 68 + 128) as u16,
            characteristics: FileCharacteristics::new(
                FileCharacteristics::IMAGE_FILE_EXECUTABLE_IMAGE,
            ),
        }
    }

    #[test]
    fn pe_header_round_trips() {
        let header = sample_pe_header();
        let mut writer = Writer::new();
        header.encode(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), PeHeader::SIZE);
        let mut reader = Reader::new(&bytes);
        assert_eq!(PeHeader::decode(&mut reader).unwrap(), header);
    }

    #[test]
    fn metadata_header_round_trips_with_odd_length_version() {
        let header = MetadataHeader {
            major_version: 1,
            minor_version: 1,
            version: "v4.0.30319".to_string(),
            flags: 0,
            stream_headers: vec![
                StreamHeader { offset: 0x6c, size: 0x1a0, name: "#~".to_string() },
                StreamHeader { offset: 0x20c, size: 0x50, name: "#Strings".to_string() },
            ],
        };
        let mut writer = Writer::new();
        header.encode(&mut writer);
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert_eq!(MetadataHeader::decode(&mut reader).unwrap(), header);
    }

    #[test]
    fn metadata_header_rejects_bad_signature() {
        let mut writer = Writer::new();
        writer.write_u32(0xDEAD_BEEF);
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert!(MetadataHeader::decode(&mut reader).is_err());
    }

    #[test]
    fn pe32_optional_header_round_trips() {
        let optional = PeOptionalHeader {
            standard_fields: StandardFields {
                magic: StandardFields::PE32_MAGIC,
                l_major: 6,
                l_minor: 0,
                code_size: 0x200,
                initialized_data_size: 0x200,
                uninitialized_data_size: 0,
                entry_point_rva: 0x2050,
                base_of_code: 0x2000,
                base_of_data: Some(0x4000),
            },
            nt_specific_fields: NtSpecificFields {
                image_base: 0x0040_0000,
                section_alignment: 0x2000,
                file_alignment: 0x200,
                os_major: 5,
                os_minor: 0,
                user_major: 0,
                user_minor: 0,
                sub_sys_major: 5,
                sub_sys_minor: 0,
                reserved: 0,
                image_size: 0x6000,
                header_size: 0x200,
                file_checksum: 0,
                sub_system: 3,
                dll_flags: 0,
                stack_reserve_size: 0x10_0000,
                stack_commit_size: 0x1000,
                heap_reserve_size: 0x10_0000,
                heap_commit_size: 0x1000,
                loader_flags: 0,
                number_of_data_directories: 16,
            },
            data_directories: DataDirectories::decode(&mut Reader::new(&[0u8; 128])).unwrap(),
        };
        assert!(!optional.is_pe32_plus());

        let mut writer = Writer::new();
        optional.encode(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 2 + 26 + 68 + 128);
        let mut reader = Reader::new(&bytes);
        assert_eq!(PeOptionalHeader::decode(&mut reader).unwrap(), optional);
    }

    #[test]
    fn pe32_plus_optional_header_drops_base_of_data_and_widens_sizes() {
        let mut optional = pe32_sample();
        optional.standard_fields.magic = StandardFields::PE32_PLUS_MAGIC;
        optional.standard_fields.base_of_data = None;
        optional.nt_specific_fields.image_base = 0x1_4000_0000;
        optional.nt_specific_fields.stack_reserve_size = 0x40_0000;

        let mut writer = Writer::new();
        optional.encode(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 2 + 22 + 88 + 128);
        let mut reader = Reader::new(&bytes);
        let decoded = PeOptionalHeader::decode(&mut reader).unwrap();
        assert!(decoded.is_pe32_plus());
        assert_eq!(decoded.nt_specific_fields.image_base, 0x1_4000_0000);
        assert_eq!(decoded, optional);
    }

    fn pe32_sample() -> PeOptionalHeader {
        PeOptionalHeader {
            standard_fields: StandardFields {
                magic: StandardFields::PE32_MAGIC,
                l_major: 6,
                l_minor: 0,
                code_size: 0x200,
                initialized_data_size: 0x200,
                uninitialized_data_size: 0,
                entry_point_rva: 0,
                base_of_code: 0x2000,
                base_of_data: Some(0x4000),
            },
            nt_specific_fields: NtSpecificFields {
                image_base: 0x0040_0000,
                section_alignment: 0x2000,
                file_alignment: 0x200,
                os_major: 5,
                os_minor: 0,
                user_major: 0,
                user_minor: 0,
                sub_sys_major: 5,
                sub_sys_minor: 0,
                reserved: 0,
                image_size: 0x6000,
                header_size: 0x200,
                file_checksum: 0,
                sub_system: 3,
                dll_flags: 0,
                stack_reserve_size: 0x10_0000,
                stack_commit_size: 0x1000,
                heap_reserve_size: 0x10_0000,
                heap_commit_size: 0x1000,
                loader_flags: 0,
                number_of_data_directories: 16,
            },
            data_directories: DataDirectories::decode(&mut Reader::new(&[0u8; 128])).unwrap(),
        }
    }

    #[test]
    fn section_header_round_trips() {
        let mut name = [0u8; 8];
        name[..6].copy_from_slice(b".text\0".get(..6).unwrap());
        let header = SectionHeader {
            name,
            virtual_size: 0x1000,
            virtual_address: 0x2000,
            size_of_raw_data: 0x200,
            pointer_to_raw_data: 0x400,
            pointer_to_relocations: 0,
            pointer_to_linenumbers: 0,
            number_of_relocations: 0,
            number_of_linenumbers: 0,
            characteristics: SectionCharacteristics::new(
                SectionCharacteristics::IMAGE_SCN_CNT_CODE | SectionCharacteristics::IMAGE_SCN_MEM_EXECUTE,
            ),
        };
        assert_eq!(header.name_str(), ".text");

        let mut writer = Writer::new();
        header.encode(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), SectionHeader::SIZE);
        let mut reader = Reader::new(&bytes);
        assert_eq!(SectionHeader::decode(&mut reader).unwrap(), header);
    }

    #[test]
    fn cli_header_round_trips_and_propagates_token_errors() {
        let header = CliHeader {
            cb: 72,
            major_runtime_version: 2,
            minor_runtime_version: 0,
            meta_data: DataDirectory::new(0x2000, 0x100),
            flags: RuntimeFlags::new(RuntimeFlags::COM_IMAGE_FLAGS_IL_ONLY),
            entry_point_token: MetadataToken::Table(TableKind::MethodDef, 1),
            resources: DataDirectory::default(),
            strong_name_signature: DataDirectory::default(),
            code_manager_table: DataDirectory::default(),
            vtable_fixups: DataDirectory::default(),
            export_address_table_jumps: DataDirectory::default(),
            managed_native_header: DataDirectory::default(),
        };
        let mut writer = Writer::new();
        header.encode(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), CliHeader::SIZE);
        let mut reader = Reader::new(&bytes);
        assert_eq!(CliHeader::decode(&mut reader).unwrap(), header);

        let mut bad = bytes.clone();
        bad[20..24].copy_from_slice(&0xFF00_0001u32.to_le_bytes());
        let mut reader = Reader::new(&bad);
        assert!(CliHeader::decode(&mut reader).is_err());
    }
}
