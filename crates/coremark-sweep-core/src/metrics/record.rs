use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One column of the metrics record, in the order the run log prints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Mtime,
    Minstret,
    CoremarkPerMhz,
    Cpi,
    LoadStalls,
    StoreStalls,
    DcacheAccesses,
    DcacheMisses,
    IcacheAccesses,
    IcacheMisses,
    Branches,
    BranchMispredicts,
    BtbMisses,
    JumpJr,
    RasWrong,
    Returns,
    BpClassWrong,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Mtime,
        Field::Minstret,
        Field::CoremarkPerMhz,
        Field::Cpi,
        Field::LoadStalls,
        Field::StoreStalls,
        Field::DcacheAccesses,
        Field::DcacheMisses,
        Field::IcacheAccesses,
        Field::IcacheMisses,
        Field::Branches,
        Field::BranchMispredicts,
        Field::BtbMisses,
        Field::JumpJr,
        Field::RasWrong,
        Field::Returns,
        Field::BpClassWrong,
    ];

    /// Column label used in the result table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Mtime => "MTIME",
            Field::Minstret => "MINSTRET",
            Field::CoremarkPerMhz => "CM / MHz",
            Field::Cpi => "CPI",
            Field::LoadStalls => "Load Stalls",
            Field::StoreStalls => "Store Stalls",
            Field::DcacheAccesses => "D$ Accesses",
            Field::DcacheMisses => "D$ Misses",
            Field::IcacheAccesses => "I$ Accesses",
            Field::IcacheMisses => "I$ Misses",
            Field::Branches => "Branches",
            Field::BranchMispredicts => "Branch Mispredicts",
            Field::BtbMisses => "BTB Misses",
            Field::JumpJr => "Jump/JR",
            Field::RasWrong => "RAS Wrong",
            Field::Returns => "Returns",
            Field::BpClassWrong => "BP Class Pred Wrong",
        }
    }

    /// Anchored pattern locating the field in the run log. Group 1 is the value.
    pub fn pattern(self) -> &'static str {
        match self {
            Field::Mtime => r"Elapsed MTIME: (\d+)",
            Field::Minstret => r"Elapsed MINSTRET: (\d+)",
            Field::CoremarkPerMhz => r"COREMARK/MHz Score: [\d,]+ / [\d,]+ = (\d+\.\d+)",
            Field::Cpi => r"CPI: \d+ / \d+ = (\d+\.\d+)",
            Field::LoadStalls => r"Load Stalls (\d+)",
            Field::StoreStalls => r"Store Stalls (\d+)",
            Field::DcacheAccesses => r"D-Cache Accesses (\d+)",
            Field::DcacheMisses => r"D-Cache Misses (\d+)",
            Field::IcacheAccesses => r"I-Cache Accesses (\d+)",
            Field::IcacheMisses => r"I-Cache Misses (\d+)",
            Field::Branches => r"Branches (\d+)",
            Field::BranchMispredicts => r"Branches Miss Predictions (\d+)",
            Field::BtbMisses => r"BTB Misses (\d+)",
            Field::JumpJr => r"Jump and JR (\d+)",
            Field::RasWrong => r"RAS Wrong (\d+)",
            Field::Returns => r"Returns (\d+)",
            Field::BpClassWrong => r"BP Class Wrong (\d+)",
        }
    }

    pub fn is_decimal(self) -> bool {
        matches!(self, Field::CoremarkPerMhz | Field::Cpi)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Non-negative decimal kept exactly as printed: `3.50` renders back as `3.50`.
///
/// Equality is on the printed form, so `3.5` and `3.50` are distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    units: u64,
    scale: u32,
}

/// Largest scale whose power of ten still fits in `u64`.
const MAX_SCALE: u32 = 19;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fixed-point number: {0:?}")]
pub struct ParseFixedPointError(String);

impl FixedPoint {
    /// `units / 10^scale`. Scales above 19 are clamped.
    pub fn new(units: u64, scale: u32) -> Self {
        Self {
            units,
            scale: scale.min(MAX_SCALE),
        }
    }

    pub fn units(self) -> u64 {
        self.units
    }

    pub fn scale(self) -> u32 {
        self.scale
    }

    pub fn to_f64(self) -> f64 {
        self.units as f64 / 10f64.powi(self.scale as i32)
    }
}

impl FromStr for FixedPoint {
    type Err = ParseFixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFixedPointError(s.to_string());
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        if int.is_empty() || s.ends_with('.') {
            return Err(err());
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let scale = u32::try_from(frac.len()).map_err(|_| err())?;
        if scale > MAX_SCALE {
            return Err(err());
        }
        let units = int
            .bytes()
            .chain(frac.bytes())
            .try_fold(0u64, |acc, b| {
                acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
            })
            .ok_or_else(err)?;
        Ok(Self { units, scale })
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }
        let pow = 10u64.pow(self.scale);
        write!(
            f,
            "{}.{:0width$}",
            self.units / pow,
            self.units % pow,
            width = self.scale as usize
        )
    }
}

impl Serialize for FixedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single cell of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Count(u64),
    Decimal(FixedPoint),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Decimal(d) => write!(f, "{d}"),
        }
    }
}

/// Performance counters of one configuration's run. Always complete: the
/// extractor either fills every field or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsRecord {
    pub mtime: u64,
    pub minstret: u64,
    pub coremark_per_mhz: FixedPoint,
    pub cpi: FixedPoint,
    pub load_stalls: u64,
    pub store_stalls: u64,
    pub dcache_accesses: u64,
    pub dcache_misses: u64,
    pub icache_accesses: u64,
    pub icache_misses: u64,
    pub branches: u64,
    pub branch_mispredicts: u64,
    pub btb_misses: u64,
    pub jump_jr: u64,
    pub ras_wrong: u64,
    pub returns: u64,
    pub bp_class_wrong: u64,
}

impl MetricsRecord {
    pub fn get(&self, field: Field) -> MetricValue {
        use MetricValue::{Count, Decimal};
        match field {
            Field::Mtime => Count(self.mtime),
            Field::Minstret => Count(self.minstret),
            Field::CoremarkPerMhz => Decimal(self.coremark_per_mhz),
            Field::Cpi => Decimal(self.cpi),
            Field::LoadStalls => Count(self.load_stalls),
            Field::StoreStalls => Count(self.store_stalls),
            Field::DcacheAccesses => Count(self.dcache_accesses),
            Field::DcacheMisses => Count(self.dcache_misses),
            Field::IcacheAccesses => Count(self.icache_accesses),
            Field::IcacheMisses => Count(self.icache_misses),
            Field::Branches => Count(self.branches),
            Field::BranchMispredicts => Count(self.branch_mispredicts),
            Field::BtbMisses => Count(self.btb_misses),
            Field::JumpJr => Count(self.jump_jr),
            Field::RasWrong => Count(self.ras_wrong),
            Field::Returns => Count(self.returns),
            Field::BpClassWrong => Count(self.bp_class_wrong),
        }
    }

    /// Rendered cells in column order.
    pub fn cells(&self) -> Vec<String> {
        Field::ALL
            .iter()
            .map(|field| self.get(*field).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_keeps_printed_digits() {
        let fp: FixedPoint = "3.50".parse().unwrap();
        assert_eq!(fp, FixedPoint::new(350, 2));
        assert_eq!(fp.to_string(), "3.50");
        assert!((fp.to_f64() - 3.5).abs() < f64::EPSILON);

        let small: FixedPoint = "0.05".parse().unwrap();
        assert_eq!(small.to_string(), "0.05");

        let whole: FixedPoint = "42".parse().unwrap();
        assert_eq!(whole.scale(), 0);
        assert_eq!(whole.to_string(), "42");
    }

    #[test]
    fn fixed_point_rejects_malformed() {
        for bad in ["", ".5", "5.", "1.2.3", "-1.0", "1,000.5", "abc"] {
            assert!(bad.parse::<FixedPoint>().is_err(), "{bad:?} must not parse");
        }
        assert!("99999999999999999999.0".parse::<FixedPoint>().is_err());
    }

    #[test]
    fn columns_are_unique() {
        let mut cols: Vec<_> = Field::ALL.iter().map(|f| f.column()).collect();
        cols.sort_unstable();
        cols.dedup();
        assert_eq!(cols.len(), Field::ALL.len());
    }

    #[test]
    fn only_score_and_cpi_are_decimal() {
        let decimals: Vec<_> = Field::ALL.iter().filter(|f| f.is_decimal()).collect();
        assert_eq!(decimals, vec![&Field::CoremarkPerMhz, &Field::Cpi]);
    }
}
