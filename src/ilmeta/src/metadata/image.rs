use super::error::{Error, Result};
use super::headers::{CliHeader, DataDirectory, PeHeader, PeOptionalHeader, SectionHeader};
use super::io::{Reader, Writer};
use super::metadata::Metadata;
use super::segment::{align_up, RelocationParameters};

/// "MZ"
const DOS_SIGNATURE: [u8; 2] = [0x4d, 0x5a];
/// Offset of `e_lfanew` in the MS-DOS header, II.25.2.1.
const E_LFANEW_OFFSET: usize = 0x3c;
/// "PE\0\0"
const PE_SIGNATURE: [u8; 4] = [0x50, 0x45, 0x00, 0x00];

/// A section, decoded header plus its raw on-disk body. The body may be
/// shorter than `header.virtual_size` (§3's Section invariant); the tail is
/// conceptually zero-filled once mapped but is not materialized here.
#[derive(Debug, Clone)]
pub struct PeSection {
    pub header: SectionHeader,
    pub body: Vec<u8>,
}

/// # [II.25] File format extensions to PE
///
/// A fully decoded PE/CLI image: the section-independent header block plus
/// every section's raw bytes. RVA resolution is a linear scan over
/// [`PeSection::header`] (§4.3) — small section counts make this cheap, and
/// it never panics: an RVA outside every section is `Err`, not the index
/// teacher's `seek_rva` used to assume was always found.
///
/// In mapped mode (`parse_mapped`), file offset and RVA coincide, matching
/// how a loader exposes the already-relocated image in memory.
#[derive(Debug, Clone)]
pub struct PeImage {
    pub dos_stub: Vec<u8>,
    pub pe_header: PeHeader,
    pub optional_header: PeOptionalHeader,
    pub sections: Vec<PeSection>,
    /// Bytes between the last section header and the first section body,
    /// e.g. attribute certificates or loader-specific padding.
    pub extra_header_data: Vec<u8>,
    /// Bytes after the last section's raw data, e.g. an authenticode
    /// signature appended after the image proper.
    pub eof_data: Vec<u8>,
    mapped: bool,
}

impl PeImage {
    /// Builds an image from its constituent parts, as an on-disk (unmapped)
    /// image. Callers that assemble a fresh image field-by-field (rather
    /// than parsing one) should call [`PeImage::rebuild`] before
    /// [`PeImage::encode`] to stamp section offsets/RVAs.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        dos_stub: Vec<u8>,
        pe_header: PeHeader,
        optional_header: PeOptionalHeader,
        sections: Vec<PeSection>,
        extra_header_data: Vec<u8>,
        eof_data: Vec<u8>,
    ) -> PeImage {
        PeImage { dos_stub, pe_header, optional_header, sections, extra_header_data, eof_data, mapped: false }
    }

    /// Parses `bytes` as an on-disk PE image: RVAs are resolved through the
    /// section table.
    pub fn parse(bytes: &[u8]) -> Result<PeImage> {
        Self::parse_inner(bytes, false)
    }

    /// Parses `bytes` as an already-mapped image: file offset and RVA are
    /// the same value.
    pub fn parse_mapped(bytes: &[u8]) -> Result<PeImage> {
        Self::parse_inner(bytes, true)
    }

    fn parse_inner(bytes: &[u8], mapped: bool) -> Result<PeImage> {
        if bytes.len() < E_LFANEW_OFFSET + 4 || bytes[..2] != DOS_SIGNATURE {
            return Err(Error::invalid_pe("missing MZ DOS signature"));
        }
        let lfanew = u32::from_le_bytes(bytes[E_LFANEW_OFFSET..E_LFANEW_OFFSET + 4].try_into().unwrap()) as usize;
        let dos_stub = bytes.get(..lfanew).ok_or_else(|| Error::insufficient_data(lfanew))?.to_vec();

        let mut reader = Reader::new(bytes.get(lfanew..).ok_or_else(|| Error::insufficient_data(lfanew))?);
        let signature = reader.read_array::<4>()?;
        if signature != PE_SIGNATURE {
            return Err(Error::invalid_pe("missing PE\\0\\0 signature"));
        }

        let pe_header = PeHeader::decode(&mut reader)?;
        match pe_header.machine {
            PeHeader::MACHINE_I386 | PeHeader::MACHINE_AMD64 | PeHeader::MACHINE_ARM64 => {}
            other => return Err(Error::invalid_pe(format!("unrecognized machine type {other:#06x}"))),
        }

        let optional_header_bytes = reader.read_bytes(pe_header.optional_header_size as usize)?;
        let optional_header = PeOptionalHeader::decode(&mut Reader::new(optional_header_bytes))?;

        let mut section_headers = Vec::with_capacity(pe_header.number_of_sections as usize);
        for _ in 0..pe_header.number_of_sections {
            section_headers.push(SectionHeader::decode(&mut reader)?);
        }

        let headers_end = lfanew + 4 + PeHeader::SIZE + pe_header.optional_header_size as usize
            + section_headers.len() * SectionHeader::SIZE;
        let first_section_offset =
            section_headers.iter().map(|s| s.pointer_to_raw_data as usize).min().unwrap_or(headers_end);
        let extra_header_data = if first_section_offset > headers_end {
            bytes
                .get(headers_end..first_section_offset)
                .ok_or_else(|| Error::insufficient_data(first_section_offset))?
                .to_vec()
        } else {
            Vec::new()
        };

        let mut sections = Vec::with_capacity(section_headers.len());
        let mut end_of_sections = first_section_offset;
        for header in section_headers {
            let start = header.pointer_to_raw_data as usize;
            let end = start
                .checked_add(header.size_of_raw_data as usize)
                .ok_or_else(|| Error::malformed_encoding(format!("section {:?} overflows", header.name_str())))?;
            let body = bytes.get(start..end).ok_or_else(|| Error::insufficient_data(end))?.to_vec();
            end_of_sections = end_of_sections.max(end);
            sections.push(PeSection { header, body });
        }

        let eof_data = bytes.get(end_of_sections..).unwrap_or(&[]).to_vec();

        Ok(PeImage { dos_stub, pe_header, optional_header, sections, extra_header_data, eof_data, mapped })
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Maps an RVA to the corresponding file offset by locating the
    /// section whose virtual range contains it.
    pub fn rva_to_offset(&self, rva: u32) -> Result<u32> {
        if self.mapped {
            return Ok(rva);
        }
        for section in &self.sections {
            let h = &section.header;
            if rva >= h.virtual_address && rva < h.virtual_address + h.virtual_size.max(h.size_of_raw_data) {
                return Ok(h.pointer_to_raw_data + (rva - h.virtual_address));
            }
        }
        Err(Error::invalid_pe(format!("rva {rva:#x} not found in any section")))
    }

    /// The inverse of [`PeImage::rva_to_offset`].
    pub fn offset_to_rva(&self, offset: u32) -> Result<u32> {
        if self.mapped {
            return Ok(offset);
        }
        for section in &self.sections {
            let h = &section.header;
            if offset >= h.pointer_to_raw_data && offset < h.pointer_to_raw_data + h.size_of_raw_data {
                return Ok(h.virtual_address + (offset - h.pointer_to_raw_data));
            }
        }
        Err(Error::invalid_pe(format!("file offset {offset:#x} not found in any section")))
    }

    fn section_containing_offset(&self, offset: u32) -> Option<&PeSection> {
        self.sections
            .iter()
            .find(|s| offset >= s.header.pointer_to_raw_data && offset < s.header.pointer_to_raw_data + s.header.size_of_raw_data)
    }

    /// Slices `size` bytes starting at file `offset`, bounds-checked against
    /// the owning section's raw body.
    pub fn slice_at_offset(&self, offset: u32, size: u32) -> Result<&[u8]> {
        let section = self
            .section_containing_offset(offset)
            .ok_or_else(|| Error::invalid_pe(format!("file offset {offset:#x} not found in any section")))?;
        let start = (offset - section.header.pointer_to_raw_data) as usize;
        let end = start
            .checked_add(size as usize)
            .ok_or_else(|| Error::malformed_encoding(format!("slice at offset {offset:#x} overflows")))?;
        section.body.get(start..end).ok_or_else(|| Error::insufficient_data(end))
    }

    /// Slices `size` bytes starting at `rva`.
    pub fn slice_at_rva(&self, rva: u32, size: u32) -> Result<&[u8]> {
        let offset = self.rva_to_offset(rva)?;
        self.slice_at_offset(offset, size)
    }

    /// Resolves a data directory to its bytes; an empty directory (RVA and
    /// size both zero) yields an empty slice rather than an error.
    pub fn directory_bytes(&self, directory: DataDirectory) -> Result<&[u8]> {
        if directory.is_empty() {
            return Ok(&[]);
        }
        self.slice_at_rva(directory.rva, directory.size)
    }

    /// Decodes the CLI header from the optional header's CLI data
    /// directory, if present.
    pub fn cli_header(&self) -> Result<Option<CliHeader>> {
        let directory = self.optional_header.data_directories.cli_header;
        if directory.is_empty() {
            return Ok(None);
        }
        let bytes = self.slice_at_rva(directory.rva, CliHeader::SIZE as u32)?;
        Ok(Some(CliHeader::decode(&mut Reader::new(bytes))?))
    }

    /// Decodes the metadata directory pointed to by the CLI header.
    pub fn metadata(&self) -> Result<Metadata> {
        let cli_header =
            self.cli_header()?.ok_or_else(|| Error::invalid_pe("image has no CLI header"))?;
        let root = self.slice_at_rva(cli_header.meta_data.rva, cli_header.meta_data.size)?;
        Metadata::decode(root)
    }

    /// Re-stamps section file offsets/RVAs, header sizes, and the image's
    /// data directories after the section list or a section's body has
    /// changed, following the layout algorithm in §4.3's write path:
    /// headers, then each section aligned to `FileAlignment`/
    /// `SectionAlignment`, then data-directory RVAs shifted by however far
    /// their owning section moved.
    pub fn rebuild(&mut self) {
        let file_alignment = self.optional_header.nt_specific_fields.file_alignment.max(1);
        let section_alignment = self.optional_header.nt_specific_fields.section_alignment.max(1);
        let is_32bit = !self.optional_header.is_pe32_plus();

        self.pe_header.number_of_sections = self.sections.len() as u16;

        let mut probe = Writer::new();
        self.optional_header.encode(&mut probe);
        self.pe_header.optional_header_size = probe.position() as u16;

        let headers_len = self.dos_stub.len()
            + 4
            + PeHeader::SIZE
            + self.pe_header.optional_header_size as usize
            + self.sections.len() * SectionHeader::SIZE
            + self.extra_header_data.len();
        let size_of_headers = align_up(headers_len as u32, file_alignment);

        let mut params = RelocationParameters::new(self.optional_header.nt_specific_fields.image_base, is_32bit);
        params.file_offset_cursor = size_of_headers;
        params.rva_cursor = align_up(size_of_headers, section_alignment);

        let old_layout: Vec<(u32, u32)> = self
            .sections
            .iter()
            .map(|s| (s.header.virtual_address, s.header.virtual_size.max(s.body.len() as u32).max(1)))
            .collect();

        for section in &mut self.sections {
            let physical = section.body.len() as u32;
            let virtual_size = section.header.virtual_size.max(physical).max(1);
            section.header.pointer_to_raw_data = params.file_offset_cursor;
            section.header.virtual_address = params.rva_cursor;
            section.header.size_of_raw_data = align_up(physical, file_alignment);
            section.header.virtual_size = virtual_size;
            params.advance(physical, virtual_size, file_alignment, section_alignment);
        }

        for ((old_rva, old_size), section) in old_layout.iter().zip(self.sections.iter()) {
            let delta = section.header.virtual_address as i64 - *old_rva as i64;
            if delta == 0 {
                continue;
            }
            for directory in self.optional_header.data_directories.iter_mut() {
                if !directory.is_empty() && directory.rva >= *old_rva && directory.rva < old_rva + old_size {
                    directory.rva = (directory.rva as i64 + delta) as u32;
                }
            }
        }

        self.optional_header.nt_specific_fields.header_size = size_of_headers;
        self.optional_header.nt_specific_fields.image_size = match self.sections.last() {
            Some(section) => align_up(section.header.virtual_address + section.header.virtual_size, section_alignment),
            None => align_up(size_of_headers, section_alignment),
        };
    }

    /// Serializes the image back to bytes. Callers that changed section
    /// contents should call [`PeImage::rebuild`] first so the stamped
    /// offsets and directory RVAs match the new layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_bytes(&self.dos_stub);
        writer.write_bytes(&PE_SIGNATURE);
        self.pe_header.encode(&mut writer);
        self.optional_header.encode(&mut writer);
        for section in &self.sections {
            section.header.encode(&mut writer);
        }
        writer.write_bytes(&self.extra_header_data);
        let file_alignment = self.optional_header.nt_specific_fields.file_alignment.max(1);
        writer.align(file_alignment as usize, 0);

        for section in &self.sections {
            writer.write_bytes(&section.body);
            writer.align(file_alignment as usize, 0);
        }
        writer.write_bytes(&self.eof_data);
        writer.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::flags::FileCharacteristics;
    use super::super::headers::{DataDirectories, NtSpecificFields, StandardFields};

    fn minimal_dos_stub() -> Vec<u8> {
        let mut stub = vec![0u8; 0x40];
        stub[0] = DOS_SIGNATURE[0];
        stub[1] = DOS_SIGNATURE[1];
        stub[E_LFANEW_OFFSET..E_LFANEW_OFFSET + 4].copy_from_slice(&(stub.len() as u32).to_le_bytes());
        stub
    }

    fn minimal_image(sections: Vec<PeSection>) -> PeImage {
        PeImage {
            dos_stub: minimal_dos_stub(),
            pe_header: PeHeader {
                machine: PeHeader::MACHINE_I386,
                number_of_sections: sections.len() as u16,
                time_date_stamp: 0,
                pointer_to_symbol_table: 0,
                number_of_symbols: 0,
                optional_header_size: 0,
                characteristics: FileCharacteristics::new(0x0102),
            },
            optional_header: PeOptionalHeader {
                standard_fields: StandardFields {
                    magic: StandardFields::PE32_MAGIC,
                    l_major: 6,
                    l_minor: 0,
                    code_size: 0,
                    initialized_data_size: 0,
                    uninitialized_data_size: 0,
                    entry_point_rva: 0,
                    base_of_code: 0x2000,
                    base_of_data: Some(0),
                },
                nt_specific_fields: NtSpecificFields {
                    image_base: 0x00400000,
                    section_alignment: 0x2000,
                    file_alignment: 0x200,
                    os_major: 5,
                    os_minor: 0,
                    user_major: 0,
                    user_minor: 0,
                    sub_sys_major: 5,
                    sub_sys_minor: 0,
                    reserved: 0,
                    image_size: 0,
                    header_size: 0,
                    file_checksum: 0,
                    sub_system: 3,
                    dll_flags: 0,
                    stack_reserve_size: 0x100000,
                    stack_commit_size: 0x1000,
                    heap_reserve_size: 0x100000,
                    heap_commit_size: 0x1000,
                    loader_flags: 0,
                    number_of_data_directories: 16,
                },
                data_directories: DataDirectories::decode(&mut Reader::new(&[0u8; 128])).unwrap(),
            },
            sections,
            extra_header_data: Vec::new(),
            eof_data: Vec::new(),
            mapped: false,
        }
    }

    #[test]
    fn rebuild_then_encode_then_parse_round_trips_section_body() {
        let mut image = minimal_image(vec![PeSection {
            header: SectionHeader {
                name: *b".text\0\0\0",
                virtual_size: 0,
                virtual_address: 0,
                size_of_raw_data: 0,
                pointer_to_raw_data: 0,
                pointer_to_relocations: 0,
                pointer_to_linenumbers: 0,
                number_of_relocations: 0,
                number_of_linenumbers: 0,
                characteristics: super::super::flags::SectionCharacteristics::new(0x6000_0020),
            },
            body: b"hello cli image".to_vec(),
        }]);
        image.optional_header.data_directories.cli_header = DataDirectory::new(0, 0);

        image.rebuild();
        let bytes = image.encode();
        let reparsed = PeImage::parse(&bytes).unwrap();

        assert_eq!(reparsed.sections.len(), 1);
        assert_eq!(reparsed.sections[0].header.name_str(), ".text");
        let rva = reparsed.sections[0].header.virtual_address;
        assert_eq!(reparsed.slice_at_rva(rva, 15).unwrap(), b"hello cli image");
        assert_eq!(reparsed.rva_to_offset(rva).unwrap(), reparsed.sections[0].header.pointer_to_raw_data);
        assert_eq!(reparsed.offset_to_rva(reparsed.sections[0].header.pointer_to_raw_data).unwrap(), rva);
    }

    #[test]
    fn rva_outside_every_section_is_an_error() {
        let image = minimal_image(Vec::new());
        assert!(matches!(image.rva_to_offset(0x1000), Err(Error::InvalidPE { .. })));
    }

    #[test]
    fn mapped_image_uses_identity_mapping() {
        let mut image = minimal_image(Vec::new());
        image.mapped = true;
        assert_eq!(image.rva_to_offset(0x1234).unwrap(), 0x1234);
        assert_eq!(image.offset_to_rva(0x1234).unwrap(), 0x1234);
    }

    #[test]
    fn data_directory_realigns_after_section_moves() {
        let mut image = minimal_image(vec![
            PeSection {
                header: SectionHeader {
                    name: *b".text\0\0\0",
                    virtual_size: 0x2000,
                    virtual_address: 0x2000,
                    size_of_raw_data: 0x200,
                    pointer_to_raw_data: 0x200,
                    pointer_to_relocations: 0,
                    pointer_to_linenumbers: 0,
                    number_of_relocations: 0,
                    number_of_linenumbers: 0,
                    characteristics: super::super::flags::SectionCharacteristics::new(0x6000_0020),
                },
                body: vec![0u8; 0x10],
            },
        ]);
        // CLI header lives 0x10 bytes into .text, at its original layout.
        image.optional_header.data_directories.cli_header = DataDirectory::new(0x2010, CliHeader::SIZE as u32);

        // Insert a second section ahead of it so the headers block grows
        // and .text necessarily shifts.
        image.sections.insert(
            0,
            PeSection {
                header: SectionHeader {
                    name: *b".extra\0\0",
                    virtual_size: 0,
                    virtual_address: 0,
                    size_of_raw_data: 0,
                    pointer_to_raw_data: 0,
                    pointer_to_relocations: 0,
                    pointer_to_linenumbers: 0,
                    number_of_relocations: 0,
                    number_of_linenumbers: 0,
                    characteristics: super::super::flags::SectionCharacteristics::new(0x4000_0040),
                },
                body: vec![0u8; 0x300],
            },
        );

        let old_text_rva = image.sections[1].header.virtual_address;
        image.rebuild();
        let new_text_rva = image.sections[1].header.virtual_address;

        assert_ne!(old_text_rva, new_text_rva);
        assert_eq!(
            image.optional_header.data_directories.cli_header.rva,
            new_text_rva + 0x10
        );
    }
}
