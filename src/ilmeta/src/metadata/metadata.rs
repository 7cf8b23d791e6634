use super::error::{Error, Result};
use super::headers::{MetadataHeader, StreamHeader};
use super::heaps::{BlobHeap, GuidHeap, StringHeap, UserStringHeap};
use super::io::{Reader, Writer};
use super::tables_stream::TablesStream;

fn pad4(mut bytes: Vec<u8>) -> Vec<u8> {
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
    bytes
}

/// # [II.24.2] File headers
///
/// The fully decoded physical metadata root: the heaps and the tables
/// stream, resolved from the stream header list. A CLI image is free to
/// list more than one stream under the same name — Partition II §24 says
/// nothing about what to do then, but in practice two conventions exist:
///
/// - "normal" metadata matches by exact, case-sensitive name, and the
///   *last* matching header wins (later tools commonly append a corrected
///   stream rather than patch the original in place);
/// - Edit-and-Continue delta metadata matches case-insensitively, and the
///   *first* matching header wins.
///
/// This crate tells the two apart by the presence of `#-`, `#Schema`, or
/// `#JTD` (any of the three puts every named stream under the EnC
/// resolution policy). `#JTD` specifically also forces every table/coded
/// index to 4 bytes regardless of `HeapSizes`/row counts (see
/// `layout.rs`); that is a separate, narrower flag, since a `#-`/`#Schema`
/// image without `#JTD` still uses the heap-size-derived index widths.
///
/// Streams present in the root but not one of the five named heaps/tables
/// stream above are opaque to this crate but not dropped: their raw bytes
/// are kept in `extra_streams` and re-emitted by `encode`.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub header: MetadataHeader,
    pub strings: StringHeap,
    pub blobs: BlobHeap,
    pub user_strings: UserStringHeap,
    pub guids: GuidHeap,
    pub tables: TablesStream,
    pub force_wide_indices: bool,
    pub extra_streams: Vec<(String, Vec<u8>)>,
}

impl Metadata {
    const JTD_STREAM: &'static str = "#JTD";
    const SCHEMA_STREAM: &'static str = "#Schema";
    const TABLES_STREAM_COMPRESSED: &'static str = "#~";
    const TABLES_STREAM_UNCOMPRESSED: &'static str = "#-";
    const STRINGS_STREAM: &'static str = "#Strings";
    const BLOB_STREAM: &'static str = "#Blob";
    const GUID_STREAM: &'static str = "#GUID";
    const USER_STRING_STREAM: &'static str = "#US";

    /// An empty metadata root ready to have tables/heaps populated and
    /// then [`Metadata::encode`]d.
    pub fn new(version: impl Into<String>) -> Metadata {
        Metadata {
            header: MetadataHeader {
                major_version: 1,
                minor_version: 1,
                version: version.into(),
                flags: 0,
                stream_headers: Vec::new(),
            },
            strings: StringHeap::default(),
            blobs: BlobHeap::default(),
            user_strings: UserStringHeap::default(),
            guids: GuidHeap::default(),
            tables: TablesStream::default(),
            force_wide_indices: false,
            extra_streams: Vec::new(),
        }
    }

    /// Decodes a complete metadata root, `root` being the bytes starting
    /// at the root's own signature (the directory slice pointed to by the
    /// CLI header's `MetaData` data directory, not the whole PE image).
    pub fn decode(root: &[u8]) -> Result<Metadata> {
        let mut reader = Reader::new(root);
        let header = MetadataHeader::decode(&mut reader)?;

        let force_wide_indices =
            header.stream_headers.iter().any(|s| s.name.eq_ignore_ascii_case(Self::JTD_STREAM));

        // §4.6: EnC (first-wins, case-insensitive) applies whenever `#-`,
        // `#Schema`, or `#JTD` is present, not only when heap indices are
        // forced wide by `#JTD`.
        let is_enc = header.stream_headers.iter().any(|s| {
            s.name.eq_ignore_ascii_case(Self::TABLES_STREAM_UNCOMPRESSED)
                || s.name.eq_ignore_ascii_case(Self::SCHEMA_STREAM)
                || s.name.eq_ignore_ascii_case(Self::JTD_STREAM)
        });

        let tables_header = Self::find_stream(&header.stream_headers, Self::TABLES_STREAM_COMPRESSED, is_enc)
            .or_else(|| Self::find_stream(&header.stream_headers, Self::TABLES_STREAM_UNCOMPRESSED, is_enc))
            .ok_or_else(|| Error::missing_stream(Self::TABLES_STREAM_COMPRESSED))?;
        let tables_bytes = Self::slice_for(root, tables_header)?;
        let mut tables_reader = Reader::new(tables_bytes);
        let tables = TablesStream::decode(&mut tables_reader, force_wide_indices)?;

        let strings_header = Self::find_stream(&header.stream_headers, Self::STRINGS_STREAM, is_enc);
        let blob_header = Self::find_stream(&header.stream_headers, Self::BLOB_STREAM, is_enc);
        let guid_header = Self::find_stream(&header.stream_headers, Self::GUID_STREAM, is_enc);
        let user_string_header = Self::find_stream(&header.stream_headers, Self::USER_STRING_STREAM, is_enc);

        let strings = strings_header
            .map(|h| Self::slice_for(root, h).map(StringHeap::from_bytes))
            .transpose()?
            .unwrap_or_default();
        let blobs = blob_header
            .map(|h| Self::slice_for(root, h).map(BlobHeap::from_bytes))
            .transpose()?
            .unwrap_or_default();
        let guids = guid_header
            .map(|h| Self::slice_for(root, h).and_then(GuidHeap::from_bytes))
            .transpose()?
            .unwrap_or_default();
        let user_strings = user_string_header
            .map(|h| Self::slice_for(root, h).map(UserStringHeap::from_bytes))
            .transpose()?
            .unwrap_or_default();

        let consumed: Vec<*const StreamHeader> = [Some(tables_header), strings_header, blob_header, guid_header, user_string_header]
            .into_iter()
            .flatten()
            .map(|h| h as *const StreamHeader)
            .collect();
        let mut extra_streams = Vec::new();
        for stream_header in &header.stream_headers {
            if consumed.contains(&(stream_header as *const StreamHeader)) {
                continue;
            }
            extra_streams.push((stream_header.name.clone(), Self::slice_for(root, stream_header)?.to_vec()));
        }

        Ok(Metadata { header, strings, blobs, user_strings, guids, tables, force_wide_indices, extra_streams })
    }

    /// Re-serializes the root: tables stream, `#Strings`, `#GUID`, `#Blob`,
    /// (only if non-empty) `#US`, and any unmodeled streams retained from a
    /// prior decode (`extra_streams`), each padded to a 4-byte boundary,
    /// with stream offsets recomputed from the actual header size rather
    /// than copied from whatever was decoded.
    pub fn encode(&self) -> Vec<u8> {
        let mut bodies: Vec<(String, Vec<u8>)> = vec![
            (Self::TABLES_STREAM_COMPRESSED.to_string(), pad4(self.tables.encode(self.force_wide_indices, 2, 0))),
            (Self::STRINGS_STREAM.to_string(), pad4(self.strings.as_bytes().to_vec())),
            (Self::GUID_STREAM.to_string(), pad4(self.guids.as_bytes())),
            (Self::BLOB_STREAM.to_string(), pad4(self.blobs.as_bytes().to_vec())),
        ];
        if self.user_strings.len() > 0 {
            bodies.push((Self::USER_STRING_STREAM.to_string(), pad4(self.user_strings.as_bytes().to_vec())));
        }
        for (name, bytes) in &self.extra_streams {
            bodies.push((name.clone(), pad4(bytes.clone())));
        }

        let mut stream_headers: Vec<StreamHeader> = bodies
            .iter()
            .map(|(name, bytes)| StreamHeader { offset: 0, size: bytes.len() as u32, name: name.clone() })
            .collect();

        let mut header = self.header.clone();
        header.stream_headers = stream_headers.clone();
        let mut probe = Writer::new();
        header.encode(&mut probe);
        let mut offset = probe.position() as u32;
        for (stream_header, (_, bytes)) in stream_headers.iter_mut().zip(bodies.iter()) {
            stream_header.offset = offset;
            offset += bytes.len() as u32;
        }
        header.stream_headers = stream_headers;

        let mut writer = Writer::new();
        header.encode(&mut writer);
        for (_, bytes) in &bodies {
            writer.write_bytes(bytes);
        }
        writer.into_bytes()
    }

    fn find_stream<'a>(headers: &'a [StreamHeader], name: &str, is_enc: bool) -> Option<&'a StreamHeader> {
        if is_enc {
            headers.iter().find(|h| h.name.eq_ignore_ascii_case(name))
        } else {
            headers.iter().rev().find(|h| h.name == name)
        }
    }

    fn slice_for<'a>(root: &'a [u8], header: &StreamHeader) -> Result<&'a [u8]> {
        let start = header.offset as usize;
        let end = start
            .checked_add(header.size as usize)
            .ok_or_else(|| Error::malformed_encoding(format!("stream {:?} overflows", header.name)))?;
        root.get(start..end).ok_or_else(|| Error::insufficient_data(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::index::StringIndex;
    use super::super::kind::TableKind;
    use super::super::rows::{ModuleRow, Row};

    fn module_row() -> Row {
        Row::Module(ModuleRow {
            generation: 0,
            name: StringIndex(0),
            mvid: super::super::index::GuidIndex(1),
            enc_id: super::super::index::GuidIndex(0),
            enc_base_id: super::super::index::GuidIndex(0),
        })
    }

    #[test]
    fn round_trips_through_encode_and_decode() {
        let mut metadata = Metadata::new("v4.0.30319");
        let mut strings = super::super::heaps::StringHeapBuilder::new();
        let name_offset = strings.insert("Program");
        metadata.strings = strings.into_heap();
        let mut guids = super::super::heaps::GuidHeapBuilder::new();
        guids.insert([9u8; 16]);
        metadata.guids = guids.into_heap();
        metadata.tables.insert(
            TableKind::Module,
            vec![Row::Module(ModuleRow {
                generation: 0,
                name: StringIndex(name_offset),
                mvid: super::super::index::GuidIndex(1),
                enc_id: super::super::index::GuidIndex(0),
                enc_base_id: super::super::index::GuidIndex(0),
            })],
        );

        let bytes = metadata.encode();
        let decoded = Metadata::decode(&bytes).unwrap();

        assert_eq!(decoded.header.version, "v4.0.30319");
        assert_eq!(decoded.strings.get(name_offset).unwrap(), "Program");
        assert_eq!(decoded.tables.rows(TableKind::Module).len(), 1);
        assert!(!decoded.force_wide_indices);
    }

    /// Builds a root naming the `#Strings` heap twice, under `first_name`
    /// and then `second_name` (`"AAAA\0"` and `"BBBB\0"` respectively), plus
    /// `#~`/`#JTD` as requested. Exercises the normal-vs-EnC stream
    /// resolution rule directly against `Metadata::decode`.
    fn root_with_duplicate_strings_stream(first_name: &str, second_name: &str, include_jtd: bool) -> Vec<u8> {
        let tables_bytes = pad4(TablesStream::default().encode(false, 2, 0));
        let first_bytes = pad4(b"AAAA\0".to_vec());
        let second_bytes = pad4(b"BBBB\0".to_vec());

        let mut stream_headers = vec![
            StreamHeader { offset: 0, size: tables_bytes.len() as u32, name: "#~".to_string() },
            StreamHeader { offset: 0, size: first_bytes.len() as u32, name: first_name.to_string() },
            StreamHeader { offset: 0, size: second_bytes.len() as u32, name: second_name.to_string() },
        ];
        if include_jtd {
            stream_headers.push(StreamHeader { offset: 0, size: 0, name: "#JTD".to_string() });
        }

        let mut header = MetadataHeader {
            major_version: 1,
            minor_version: 1,
            version: "v4.0.30319".to_string(),
            flags: 0,
            stream_headers,
        };
        let mut probe = Writer::new();
        header.encode(&mut probe);
        let mut offset = probe.position() as u32;
        for (header, bytes) in header.stream_headers.iter_mut().zip(
            [tables_bytes.len(), first_bytes.len(), second_bytes.len()].iter().chain(std::iter::repeat(&0)),
        ) {
            header.offset = offset;
            offset += *bytes as u32;
        }

        let mut writer = Writer::new();
        header.encode(&mut writer);
        writer.write_bytes(&tables_bytes);
        writer.write_bytes(&first_bytes);
        writer.write_bytes(&second_bytes);
        writer.into_bytes()
    }

    #[test]
    fn normal_metadata_prefers_last_exact_case_match() {
        let bytes = root_with_duplicate_strings_stream("#Strings", "#Strings", false);
        let decoded = Metadata::decode(&bytes).unwrap();
        assert_eq!(decoded.strings.get(0).unwrap(), "BBBB");
    }

    #[test]
    fn enc_metadata_prefers_first_case_insensitive_match() {
        let bytes = root_with_duplicate_strings_stream("#strings", "#Strings", true);
        let decoded = Metadata::decode(&bytes).unwrap();
        assert!(decoded.force_wide_indices);
        assert_eq!(decoded.strings.get(0).unwrap(), "AAAA");
    }

    #[test]
    fn missing_tables_stream_is_an_error() {
        let mut metadata = Metadata::new("v4.0.30319");
        metadata.tables.insert(TableKind::Module, vec![module_row()]);
        let bytes = metadata.encode();

        let mut reader = Reader::new(&bytes);
        let mut header = MetadataHeader::decode(&mut reader).unwrap();
        header.stream_headers.retain(|h| h.name != "#~");
        let mut writer = Writer::new();
        header.encode(&mut writer);
        let patched = writer.into_bytes();

        assert!(matches!(Metadata::decode(&patched), Err(Error::MissingStream { .. })));
    }

    #[test]
    fn dash_marker_triggers_enc_policy_without_jtd() {
        let tables_bytes = pad4(TablesStream::default().encode(false, 2, 0));
        let first_bytes = pad4(b"AAAA\0".to_vec());
        let second_bytes = pad4(b"BBBB\0".to_vec());

        let stream_headers = vec![
            StreamHeader { offset: 0, size: tables_bytes.len() as u32, name: "#-".to_string() },
            StreamHeader { offset: 0, size: first_bytes.len() as u32, name: "#strings".to_string() },
            StreamHeader { offset: 0, size: second_bytes.len() as u32, name: "#Strings".to_string() },
        ];
        let mut header = MetadataHeader {
            major_version: 1,
            minor_version: 1,
            version: "v4.0.30319".to_string(),
            flags: 0,
            stream_headers,
        };
        let mut probe = Writer::new();
        header.encode(&mut probe);
        let mut offset = probe.position() as u32;
        for (header, bytes) in header
            .stream_headers
            .iter_mut()
            .zip([tables_bytes.len(), first_bytes.len(), second_bytes.len()].iter())
        {
            header.offset = offset;
            offset += *bytes as u32;
        }

        let mut writer = Writer::new();
        header.encode(&mut writer);
        writer.write_bytes(&tables_bytes);
        writer.write_bytes(&first_bytes);
        writer.write_bytes(&second_bytes);
        let bytes = writer.into_bytes();

        let decoded = Metadata::decode(&bytes).unwrap();
        // `#-` alone (no `#JTD`) puts the root under the EnC resolution
        // policy (first case-insensitive match wins) but does not force
        // wide heap indices.
        assert_eq!(decoded.strings.get(0).unwrap(), "AAAA");
        assert!(!decoded.force_wide_indices);
    }

    #[test]
    fn unmodeled_stream_survives_encode_and_decode() {
        let mut metadata = Metadata::new("v4.0.30319");
        metadata.tables.insert(TableKind::Module, vec![module_row()]);
        metadata.extra_streams.push(("#Test".to_string(), vec![1, 2, 3, 4]));

        let bytes = metadata.encode();
        let decoded = Metadata::decode(&bytes).unwrap();

        assert_eq!(decoded.extra_streams.len(), 1);
        assert_eq!(decoded.extra_streams[0].0, "#Test");
        assert_eq!(decoded.extra_streams[0].1, vec![1, 2, 3, 4]);

        let re_encoded = decoded.encode();
        let re_decoded = Metadata::decode(&re_encoded).unwrap();
        assert_eq!(re_decoded.extra_streams[0].1, vec![1, 2, 3, 4]);
    }
}
