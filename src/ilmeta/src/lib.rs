mod metadata;

pub use metadata::*;

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal one-section PE32 image with `body` as `.text`'s raw
    /// contents. Headers fixed at 0x40/0x200/0x2000 (dos stub / file
    /// alignment / section alignment) place `.text` at RVA 0x2000
    /// deterministically, so callers can pre-compute RVAs into `body`
    /// before constructing the image.
    fn build_pe_image(body: Vec<u8>, cli_directory_rva: u32, cli_directory_size: u32) -> PeImage {
        let dos_stub_len = 0x40usize;
        let mut dos_stub = vec![0u8; dos_stub_len];
        dos_stub[0] = b'M';
        dos_stub[1] = b'Z';
        dos_stub[0x3c..0x40].copy_from_slice(&(dos_stub_len as u32).to_le_bytes());

        let mut data_directories = DataDirectories::decode(&mut Reader::new(&[0u8; 128])).unwrap();
        data_directories.cli_header = DataDirectory::new(cli_directory_rva, cli_directory_size);

        let pe_header = PeHeader {
            machine: PeHeader::MACHINE_I386,
            number_of_sections: 1,
            time_date_stamp: 0,
            pointer_to_symbol_table: 0,
            number_of_symbols: 0,
            optional_header_size: 0,
            characteristics: FileCharacteristics::new(0x0102),
        };
        let optional_header = PeOptionalHeader {
            standard_fields: StandardFields {
                magic: StandardFields::PE32_MAGIC,
                l_major: 6,
                l_minor: 0,
                code_size: body.len() as u32,
                initialized_data_size: 0,
                uninitialized_data_size: 0,
                entry_point_rva: 0,
                base_of_code: 0x2000,
                base_of_data: Some(0),
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
                image_size: 0,
                header_size: 0,
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
            data_directories,
        };
        let sections = vec![PeSection {
            header: SectionHeader {
                name: *b".text\0\0\0",
                virtual_size: body.len() as u32,
                virtual_address: 0,
                size_of_raw_data: 0,
                pointer_to_raw_data: 0,
                pointer_to_relocations: 0,
                pointer_to_linenumbers: 0,
                number_of_relocations: 0,
                number_of_linenumbers: 0,
                characteristics: SectionCharacteristics::new(0x6000_0020),
            },
            body,
        }];

        let mut image = PeImage::from_parts(dos_stub, pe_header, optional_header, sections, Vec::new(), Vec::new());
        image.rebuild();
        image
    }

    #[test]
    fn reads_module_and_assembly_name_through_a_rebuilt_image() {
        let text_rva = 0x2000u32;

        let mut strings = StringHeapBuilder::new();
        let module_name_offset = strings.insert("HelloWorld.dll");
        let mut guids = GuidHeapBuilder::new();
        let mvid = guids.insert([0x11; 16]);

        let mut metadata = Metadata::new("v4.0.30319");
        metadata.strings = strings.into_heap();
        metadata.guids = guids.into_heap();
        metadata.tables.insert(
            TableKind::Module,
            vec![Row::Module(ModuleRow {
                generation: 0,
                name: StringIndex(module_name_offset),
                mvid: GuidIndex(mvid),
                enc_id: GuidIndex(0),
                enc_base_id: GuidIndex(0),
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
                name: StringIndex(module_name_offset),
                culture: StringIndex(0),
            })],
        );
        let metadata_bytes = metadata.encode();

        let cli = CliHeader {
            cb: CliHeader::SIZE as u32,
            major_runtime_version: 2,
            minor_runtime_version: 0,
            meta_data: DataDirectory::new(text_rva + CliHeader::SIZE as u32, metadata_bytes.len() as u32),
            flags: RuntimeFlags::new(RuntimeFlags::COM_IMAGE_FLAGS_IL_ONLY),
            entry_point_token: MetadataToken::Table(TableKind::Module, 1),
            resources: DataDirectory::default(),
            strong_name_signature: DataDirectory::default(),
            code_manager_table: DataDirectory::default(),
            vtable_fixups: DataDirectory::default(),
            export_address_table_jumps: DataDirectory::default(),
            managed_native_header: DataDirectory::default(),
        };
        let mut cli_writer = Writer::new();
        cli.encode(&mut cli_writer);

        let mut body = cli_writer.into_bytes();
        body.extend_from_slice(&metadata_bytes);

        let image = build_pe_image(body, text_rva, CliHeader::SIZE as u32);
        let bytes = image.encode();
        let reparsed = PeImage::parse(&bytes).unwrap();

        let cli_header = reparsed.cli_header().unwrap().unwrap();
        assert!(cli_header.flags.is_il_only());

        let decoded = reparsed.metadata().unwrap();
        let module = match &decoded.tables.rows(TableKind::Module)[0] {
            Row::Module(row) => row,
            other => panic!("expected a Module row, got {other:?}"),
        };
        assert_eq!(decoded.strings.get(module.name.0).unwrap(), "HelloWorld.dll");

        let assembly = match &decoded.tables.rows(TableKind::Assembly)[0] {
            Row::Assembly(row) => row,
            other => panic!("expected an Assembly row, got {other:?}"),
        };
        assert_eq!(decoded.strings.get(assembly.name.0).unwrap(), "HelloWorld.dll");
    }
}
