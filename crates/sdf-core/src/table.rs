//! Output rows in the comma-space CSV layout consumers diff against.

use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Row {
    /// Synthetic `0.00, 0.0000` origin row.
    Origin,
    /// One histogram bin at its centre coordinate.
    Bin { coord: f64, value: f64 },
    /// Closing row at the effective cutoff, printed with one decimal.
    Cutoff { coord: f64, value: f64 },
    /// One cell of a planar grid.
    Cell { x: f64, y: f64, value: f64 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            rows: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in &self.rows {
            match *row {
                Row::Origin => writeln!(out, "0.00, 0.0000")?,
                Row::Bin { coord, value } => writeln!(out, "{coord:.2}, {value:.4} ")?,
                Row::Cutoff { coord, value } => writeln!(out, "{coord:.1}, {value:.4} ")?,
                Row::Cell { x, y, value } => writeln!(out, "{x:.2}, {y:.2}, {value:.4}")?,
            }
        }
        Ok(())
    }

    pub fn to_csv_string(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_csv(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_use_reference_formatting() {
        let mut table = Table::default();
        table.push(Row::Origin);
        table.push(Row::Bin { coord: 0.25, value: 1.23456 });
        table.push(Row::Cutoff { coord: 2.0, value: 0.5 });
        table.push(Row::Cell { x: 0.05, y: 1.15, value: 3.0 });
        assert_eq!(
            table.to_csv_string(),
            "0.00, 0.0000\n0.25, 1.2346 \n2.0, 0.5000 \n0.05, 1.15, 3.0000\n"
        );
    }
}
