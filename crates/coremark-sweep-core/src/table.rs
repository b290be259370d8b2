//! Append-only result table, rendered once as CSV.

use crate::configuration::Configuration;
use crate::error::TableError;
use crate::metrics::MetricsRecord;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Column header: configuration name followed by the record fields in order.
pub const HEADER: [&str; 18] = [
    "Architecture",
    "MTIME",
    "MINSTRET",
    "CM / MHz",
    "CPI",
    "Load Stalls",
    "Store Stalls",
    "D$ Accesses",
    "D$ Misses",
    "I$ Accesses",
    "I$ Misses",
    "Branches",
    "Branch Mispredicts",
    "BTB Misses",
    "Jump/JR",
    "RAS Wrong",
    "Returns",
    "BP Class Pred Wrong",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub configuration: Configuration,
    pub record: MetricsRecord,
}

impl ResultRow {
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(HEADER.len());
        cells.push(self.configuration.to_string());
        cells.extend(self.record.cells());
        cells
    }
}

/// Rows in sweep order. No sorting, deduplication or in-place edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &'static [&'static str; 18] {
        &HEADER
    }

    pub fn append(&mut self, configuration: Configuration, record: MetricsRecord) {
        self.rows.push(ResultRow {
            configuration,
            record,
        });
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders header and rows as CSV into `writer` and hands the writer back.
    pub fn finalize<W: Write>(self, writer: W) -> Result<W, TableError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(HEADER)?;
        for row in &self.rows {
            wtr.write_record(row.cells())?;
        }
        wtr.flush()?;
        wtr.into_inner()
            .map_err(|e| TableError::Io(e.into_error()))
    }

    /// Finalizes into a file, creating parent directories as needed.
    pub fn write_to_path(self, path: &Path) -> Result<(), TableError> {
        let create = |source| TableError::Create {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(create)?;
            }
        }
        let file = fs::File::create(path).map_err(create)?;
        self.finalize(file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Field, FixedPoint};

    fn record(seed: u64) -> MetricsRecord {
        MetricsRecord {
            mtime: seed * 1000,
            minstret: seed * 500,
            coremark_per_mhz: FixedPoint::new(350, 2),
            cpi: FixedPoint::new(150, 2),
            load_stalls: 5,
            store_stalls: 2,
            dcache_accesses: 200,
            dcache_misses: 10,
            icache_accesses: 300,
            icache_misses: 5,
            branches: 80,
            branch_mispredicts: 4,
            btb_misses: 1,
            jump_jr: 3,
            ras_wrong: 0,
            returns: 2,
            bp_class_wrong: 1,
        }
    }

    fn render(table: ResultTable) -> String {
        String::from_utf8(table.finalize(Vec::new()).unwrap()).unwrap()
    }

    #[test]
    fn header_matches_record_fields() {
        assert_eq!(HEADER[0], "Architecture");
        let fields: Vec<_> = Field::ALL.iter().map(|f| f.column()).collect();
        assert_eq!(&HEADER[1..], fields.as_slice());
    }

    #[test]
    fn empty_table_renders_header_only() {
        let table = ResultTable::new();
        assert_eq!(table.header().len(), 18);
        let out = render(table);
        assert_eq!(out.lines().count(), 1);
        assert_eq!(
            out.lines().next().unwrap(),
            "Architecture,MTIME,MINSTRET,CM / MHz,CPI,Load Stalls,Store Stalls,\
             D$ Accesses,D$ Misses,I$ Accesses,I$ Misses,Branches,Branch Mispredicts,\
             BTB Misses,Jump/JR,RAS Wrong,Returns,BP Class Pred Wrong"
        );
    }

    #[test]
    fn rows_keep_append_order_and_duplicates() {
        let mut table = ResultTable::new();
        table.append("rv32gc".into(), record(2));
        table.append("rv32i_zicsr".into(), record(1));
        table.append("rv32gc".into(), record(3));
        assert_eq!(table.len(), 3);

        let out = render(table);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "rv32gc,2000,1000,3.50,1.50,5,2,200,10,300,5,80,4,1,3,0,2,1"
        );
        assert!(lines[2].starts_with("rv32i_zicsr,1000,500,"));
        assert!(lines[3].starts_with("rv32gc,3000,1500,"));
    }

    #[test]
    fn write_to_path_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/coremark_results.csv");
        let mut table = ResultTable::new();
        table.append("rv64gc".into(), record(1));
        table.write_to_path(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().nth(1).unwrap().starts_with("rv64gc,"));
    }
}
