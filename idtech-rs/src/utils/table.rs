//! Table formatting utilities

use prettytable::{Cell, Row, Table, format};

/// Create a table with bold headers
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|header| Cell::new(header).style_spec("b"))
        .collect();
    table.set_titles(Row::new(header_cells));

    table
}

/// Add a row to a table
pub fn add_table_row(table: &mut Table, cells: &[String]) {
    let row_cells: Vec<Cell> = cells.iter().map(|cell| Cell::new(cell)).collect();
    table.add_row(Row::new(row_cells));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_line_up_with_headers() {
        let mut table = create_table(&["Name", "Frames"]);
        add_table_row(&mut table, &["walk".to_string(), "28".to_string()]);
        let rendered = table.to_string();
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("walk"));
        assert!(rendered.contains("28"));
    }
}
