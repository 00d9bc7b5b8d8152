//! Pipe tables: a header row, an underline of dashes with optional `:`
//! alignment markers, then every following line that holds a pipe.

use smallvec::SmallVec;

use crate::ctype::is_md_space;
use crate::nodes::{AstNode, NodeTable, NodeTableCell, NodeValue, TableAlignment};
use crate::parser::{Parser, MAX_TABLE_COLUMNS};

struct Header {
    alignments: SmallVec<[TableAlignment; 8]>,
    /// End of the header row, trailing whitespace excluded.
    row_end: usize,
    /// Offset just past the underline.
    len: usize,
}

/// Parse a table at the start of `data`, returning the number of bytes it
/// spans.
pub(super) fn try_parse<'a>(
    parser: &Parser<'a>,
    parent: &'a AstNode<'a>,
    data: &[u8],
) -> Option<usize> {
    let header = parse_header(data)?;
    let size = data.len();

    let table = parser.add_child(
        parent,
        NodeValue::Table(NodeTable {
            alignments: header.alignments.clone(),
        }),
    );
    add_row(parser, table, &data[..header.row_end], &header.alignments, true);

    let mut i = header.len;
    while i < size {
        let row_start = i;
        let mut pipes = 0;
        while i < size && data[i] != b'\n' {
            if data[i] == b'|' {
                pipes += 1;
            }
            i += 1;
        }

        if pipes == 0 || i == size {
            i = row_start;
            break;
        }

        add_row(parser, table, &data[row_start..i], &header.alignments, false);
        i += 1;
    }

    Some(i)
}

fn parse_header(data: &[u8]) -> Option<Header> {
    let size = data.len();

    let mut i = 0;
    let mut pipes = 0;
    while i < size && data[i] != b'\n' {
        if data[i] == b'|' {
            pipes += 1;
        }
        i += 1;
    }

    if i == size || pipes == 0 {
        return None;
    }

    let mut row_end = i;
    while row_end > 0 && is_md_space(data[row_end - 1]) {
        row_end -= 1;
    }

    // Outer pipes don't separate columns. A lone pipe is one column.
    if data[0] == b'|' {
        pipes -= 1;
    }
    if row_end > 1 && data[row_end - 1] == b'|' {
        pipes -= 1;
    }

    let columns = pipes + 1;
    if columns > MAX_TABLE_COLUMNS {
        tracing::debug!(columns, "too many table columns, leaving as text");
        return None;
    }

    i += 1;
    if i < size && data[i] == b'|' {
        i += 1;
    }

    let mut under_end = i;
    while under_end < size && data[under_end] != b'\n' {
        under_end += 1;
    }

    let mut alignments = SmallVec::with_capacity(columns);
    while alignments.len() < columns && i < under_end {
        let mut dashes = 0;
        let mut left = false;
        let mut right = false;

        while i < under_end && data[i] == b' ' {
            i += 1;
        }
        if i < under_end && data[i] == b':' {
            i += 1;
            left = true;
            dashes += 1;
        }
        while i < under_end && data[i] == b'-' {
            i += 1;
            dashes += 1;
        }
        if i < under_end && data[i] == b':' {
            i += 1;
            right = true;
            dashes += 1;
        }
        while i < under_end && data[i] == b' ' {
            i += 1;
        }

        if (i < under_end && data[i] != b'|') || dashes == 0 {
            break;
        }

        alignments.push(match (left, right) {
            (true, true) => TableAlignment::Center,
            (true, false) => TableAlignment::Left,
            (false, true) => TableAlignment::Right,
            (false, false) => TableAlignment::None,
        });
        i += 1;
    }

    if alignments.len() < columns {
        return None;
    }

    Some(Header {
        alignments,
        row_end,
        len: (under_end + 1).min(size),
    })
}

/// One cell per column. A short row ends in an empty cell spanning the
/// missing columns.
fn add_row<'a>(
    parser: &Parser<'a>,
    table: &'a AstNode<'a>,
    row: &[u8],
    alignments: &[TableAlignment],
    header: bool,
) {
    let node = parser.add_child(table, NodeValue::TableRow(header));
    let size = row.len();
    let columns = alignments.len();

    let mut i = 0;
    if i < size && row[i] == b'|' {
        i += 1;
    }

    let mut col = 0;
    while col < columns && i < size {
        while i < size && is_md_space(row[i]) {
            i += 1;
        }
        let cell_start = i;

        while i < size && row[i] != b'|' {
            i += 1;
        }
        let mut cell_end = i;
        while cell_end > cell_start && is_md_space(row[cell_end - 1]) {
            cell_end -= 1;
        }

        parser.add_child(
            node,
            NodeValue::TableCell(NodeTableCell {
                alignment: alignments[col],
                colspan: 1,
                content: row[cell_start..cell_end].to_vec(),
            }),
        );

        i += 1;
        col += 1;
    }

    if col < columns {
        parser.add_child(
            node,
            NodeValue::TableCell(NodeTableCell {
                alignment: alignments[col],
                colspan: columns - col,
                content: Vec::new(),
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_columns() {
        let header = parse_header(b"|a|b|\n|:-|-:|\n").unwrap();
        assert_eq!(
            header.alignments.as_slice(),
            &[TableAlignment::Left, TableAlignment::Right]
        );
        assert_eq!(header.row_end, 5);
        assert_eq!(header.len, 14);

        let header = parse_header(b"a | b | c\n:-: | - | -\n").unwrap();
        assert_eq!(header.alignments[0], TableAlignment::Center);
        assert_eq!(header.alignments.len(), 3);
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(parse_header(b"a | b\n").is_none());
        assert!(parse_header(b"a | b\n- | x\n").is_none());
        assert!(parse_header(b"a | b\n-\n").is_none());
        assert!(parse_header(b"no pipes\n---\n").is_none());

        let wide = format!("{}\n{}\n", "|".repeat(66), "-|".repeat(66));
        assert!(parse_header(wide.as_bytes()).is_none());
        let widest = format!("{}\n{}\n", "|".repeat(65), "-|".repeat(65));
        assert_eq!(parse_header(widest.as_bytes()).unwrap().alignments.len(), 64);
    }
}
