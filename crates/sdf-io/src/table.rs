use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sdf_core::error::SdfResult;
use sdf_core::table::Table;

/// Writes `table` to `path` with a `.csv` suffix appended unless already
/// present, returning the path actually written.
pub fn write_table(path: &Path, table: &Table) -> SdfResult<PathBuf> {
    let has_csv = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    let target = if has_csv {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".csv");
        PathBuf::from(name)
    };
    let file = File::create(&target)?;
    let mut out = BufWriter::new(file);
    table.write_csv(&mut out)?;
    out.flush()?;
    tracing::debug!(path = %target.display(), rows = table.len(), "wrote table");
    Ok(target)
}
