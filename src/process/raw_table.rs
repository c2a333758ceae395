#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names, from the header row of the file.
    pub headers: Vec<String>,
    /// Each data row, padded or cut to `headers.len()` fields.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Position of the header named `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}
