// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Plain-text persistence of tabulated results.

Tables are written as `#`-prefixed comment lines followed by one row per
sample, with columns separated by tabs. Reading accepts any whitespace
between columns.

*/

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use errors::{FluxError, FluxResult};


/// Write equal-length `columns` to `path`, preceded by `comment`. Each line
/// of the comment becomes its own header line.
pub fn save_to_file<P: AsRef<Path>>(path: P, columns: &[&[f64]], comment: &str) -> FluxResult<()> {
    let path = path.as_ref();
    let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);

    if columns.iter().any(|c| c.len() != n_rows) {
        return Err(FluxError::range(format!(
            "cannot save \"{}\": columns have unequal lengths", path.display()
        )));
    }

    let mut out = BufWriter::new(File::create(path).map_err(|e| {
        FluxError::io(format!("cannot create \"{}\": {}", path.display(), e))
    })?);

    for line in comment.lines() {
        writeln!(out, "# {}", line)?;
    }

    for i in 0..n_rows {
        let row: Vec<String> = columns.iter().map(|c| format!("{:.16e}", c[i])).collect();
        writeln!(out, "{}", row.join("\t"))?;
    }

    out.flush()?;
    Ok(())
}


/// The contents of a table file.
#[derive(Clone,Debug,PartialEq)]
pub struct Table {
    /// The header comment lines, without their `#` prefix.
    pub comments: Vec<String>,

    /// The numeric columns.
    pub columns: Vec<Vec<f64>>,
}

impl Table {
    /// The number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


/// Read a table written by `save_to_file`, or any whitespace-separated
/// numeric table with `#` comments.
pub fn load_table<P: AsRef<Path>>(path: P) -> FluxResult<Table> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        FluxError::io(format!("cannot open \"{}\": {}", path.display(), e))
    })?;

    let mut comments = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (lineno, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            comments.push(line[1..].trim_start().to_owned());
            continue;
        }

        let mut row = Vec::new();

        for item in line.split_whitespace() {
            row.push(item.parse::<f64>().map_err(|_| {
                FluxError::io(format!(
                    "\"{}\" line {}: cannot parse \"{}\" as a number", path.display(), lineno + 1, item
                ))
            })?);
        }

        if columns.is_empty() {
            columns = vec![Vec::new(); row.len()];
        } else if row.len() != columns.len() {
            return Err(FluxError::io(format!(
                "\"{}\" line {}: expected {} columns, found {}",
                path.display(), lineno + 1, columns.len(), row.len()
            )));
        }

        for (col, v) in columns.iter_mut().zip(row) {
            col.push(v);
        }
    }

    Ok(Table { comments: comments, columns: columns })
}


/// A computed spectrum: energies with flux values and error estimates.
#[derive(Clone,Debug,PartialEq)]
pub struct Spectrum {
    /// The energies, in keV, strictly increasing.
    pub ergs: Vec<f64>,

    /// The flux at each energy.
    pub values: Vec<f64>,

    /// The non-negative error estimate of each flux value.
    pub errors: Vec<f64>,

    /// Describes how the spectrum was computed; written as the table header.
    pub header: String,
}

impl Spectrum {
    /// The number of samples.
    pub fn len(&self) -> usize {
        self.ergs.len()
    }

    /// Whether the spectrum has no samples.
    pub fn is_empty(&self) -> bool {
        self.ergs.is_empty()
    }

    /// Save the spectrum as a three-column table.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> FluxResult<()> {
        save_to_file(path, &[&self.ergs, &self.values, &self.errors], &self.header)
    }
}


#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use super::*;
    use errors::FluxErrorKind;

    fn scratch(name: &str) -> PathBuf {
        env::temp_dir().join(format!("solaxflux-table-{}-{}", ::std::process::id(), name))
    }

    #[test]
    fn save_then_load() {
        let path = scratch("roundtrip.dat");
        let x = [1., 2., 3.];
        let y = [0.1, 1e-30, 7.25e12];
        save_to_file(&path, &[&x, &y], "first line\nsecond line").unwrap();

        let t = load_table(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(t.comments, vec!["first line".to_owned(), "second line".to_owned()]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.columns[0], x.to_vec());
        assert_eq!(t.columns[1], y.to_vec());
    }

    #[test]
    fn ragged_columns_rejected() {
        let path = scratch("ragged-save.dat");
        let e = save_to_file(&path, &[&[1., 2.][..], &[1.][..]], "").unwrap_err();
        assert_eq!(e.kind(), FluxErrorKind::Range);
        assert!(!path.exists());
    }

    #[test]
    fn bad_rows_rejected() {
        let path = scratch("ragged-load.dat");
        fs::write(&path, "# c\n1 2\n\n3\n").unwrap();
        let e = load_table(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(e.kind(), FluxErrorKind::Io);
        assert!(e.message().contains("line 4"));

        let path = scratch("garbage.dat");
        fs::write(&path, "1 two\n").unwrap();
        let e = load_table(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(e.kind(), FluxErrorKind::Io);
    }

    #[test]
    fn missing_file() {
        let e = load_table(scratch("does-not-exist.dat")).unwrap_err();
        assert_eq!(e.kind(), FluxErrorKind::Io);
    }
}
