use std::collections::HashMap;

use super::error::Result;
use super::heaps::HeapSizes;
use super::index::{CodedIndex, CodedIndexTag};
use super::io::{Reader, Writer};
use super::kind::TableKind;

/// Everything a row decoder/encoder needs to know about column widths for
/// one tables-stream: the row count of every present table, whether each
/// heap uses 2- or 4-byte indices, and whether `#JTD` is forcing every
/// index to 4 bytes regardless of what `HeapSizes`/row counts would
/// otherwise imply.
#[derive(Debug, Clone)]
pub struct TableLayout {
    row_counts: HashMap<TableKind, u32>,
    heap_sizes: HeapSizes,
    force_wide_indices: bool,
}

impl TableLayout {
    pub fn new(row_counts: HashMap<TableKind, u32>, heap_sizes: HeapSizes, force_wide_indices: bool) -> TableLayout {
        TableLayout { row_counts, heap_sizes, force_wide_indices }
    }

    pub fn row_count(&self, table: TableKind) -> u32 {
        self.row_counts.get(&table).copied().unwrap_or(0)
    }

    pub fn heap_sizes(&self) -> HeapSizes {
        self.heap_sizes
    }

    /// Width in bytes of a simple index into `table`'s row space: 2 bytes
    /// unless `#JTD` forces width, or the table has more than `u16::MAX`
    /// rows.
    pub fn simple_index_size(&self, table: TableKind) -> usize {
        if self.force_wide_indices || self.row_count(table) > u16::MAX as u32 {
            4
        } else {
            2
        }
    }

    /// Width in bytes of a coded index using `tag`, per the per-tag
    /// threshold in `CodedIndexTag::is_big_index`.
    pub fn coded_index_size(&self, tag: CodedIndexTag) -> usize {
        if self.force_wide_indices || tag.is_big_index(|table| self.row_count(table)) {
            4
        } else {
            2
        }
    }

    /// A simple (single-table) row reference, e.g. `TypeDef::FieldList`.
    pub fn read_simple_index(&self, reader: &mut Reader, table: TableKind) -> Result<u32> {
        if self.simple_index_size(table) == 4 {
            reader.read_u32()
        } else {
            Ok(reader.read_u16()? as u32)
        }
    }

    pub fn write_simple_index(&self, writer: &mut Writer, table: TableKind, value: u32) {
        if self.simple_index_size(table) == 4 {
            writer.write_u32(value);
        } else {
            writer.write_u16(value as u16);
        }
    }

    pub fn read_coded_index(&self, reader: &mut Reader, tag: CodedIndexTag) -> Result<CodedIndex> {
        tag.decode(reader, self.coded_index_size(tag) == 4)
    }

    pub fn write_coded_index(&self, writer: &mut Writer, tag: CodedIndexTag, value: CodedIndex) -> Result<()> {
        tag.encode(writer, value, self.coded_index_size(tag) == 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_index_widens_past_u16_max() {
        let mut counts = HashMap::new();
        counts.insert(TableKind::TypeDef, 70_000);
        let layout = TableLayout::new(counts, HeapSizes::new(0), false);
        assert_eq!(layout.simple_index_size(TableKind::TypeDef), 4);
        assert_eq!(layout.simple_index_size(TableKind::MethodDef), 2);
    }

    #[test]
    fn jtd_forces_every_index_to_four_bytes() {
        let layout = TableLayout::new(HashMap::new(), HeapSizes::new(0), true);
        assert_eq!(layout.simple_index_size(TableKind::Module), 4);
        assert_eq!(layout.coded_index_size(CodedIndexTag::TypeDefOrRef), 4);
    }

    #[test]
    fn coded_index_widens_with_candidate_row_counts() {
        let mut counts = HashMap::new();
        counts.insert(TableKind::MethodDef, 1 << 15);
        let layout = TableLayout::new(counts, HeapSizes::new(0), false);
        assert_eq!(layout.coded_index_size(CodedIndexTag::MethodDefOrRef), 4);
    }
}
