use crate::pricing::Price;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of data columns before the optional status column
pub const DATA_COLUMNS: usize = 9;

/// Title given to the status column when a header row is present
pub const STATUS_TITLE: &str = "Status";

/// Outcome recorded for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    #[default]
    Unset,
    Success,
    Failed,
    Skipped,
    NonEnglish,
    Foil,
}

impl RowStatus {
    /// Text stored in the status cell
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Unset => "",
            RowStatus::Success => "SUCCESS",
            RowStatus::Failed => "FAILED",
            RowStatus::Skipped => "SKIPPED",
            RowStatus::NonEnglish => "NON_ENGLISH",
            RowStatus::Foil => "FOIL",
        }
    }

    /// Whether the row already has a final outcome from some run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RowStatus::Unset)
    }

    /// Every status, in reporting order
    pub fn all() -> [RowStatus; 6] {
        [
            RowStatus::Unset,
            RowStatus::Success,
            RowStatus::Failed,
            RowStatus::Skipped,
            RowStatus::NonEnglish,
            RowStatus::Foil,
        ]
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Unset => f.write_str("UNSET"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for RowStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "" | "UNSET" => Ok(RowStatus::Unset),
            "SUCCESS" => Ok(RowStatus::Success),
            "FAILED" => Ok(RowStatus::Failed),
            "SKIPPED" => Ok(RowStatus::Skipped),
            "NON_ENGLISH" => Ok(RowStatus::NonEnglish),
            "FOIL" => Ok(RowStatus::Foil),
            _ => Err(Error::Load(format!("unknown status '{}'", s.trim()))),
        }
    }
}

/// One inventory line item
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub product_line: String,
    pub set_name: String,
    pub product_name: String,
    pub number: String,
    pub rarity: String,
    pub quantity: u32,
    pub marketplace_price: Option<Price>,
    pub foil: Option<String>,
    pub language: String,
    pub status: RowStatus,
}

impl InventoryRow {
    /// Build a row from raw cells; `line` is only used in error messages
    pub fn from_cells(cells: &[&str], line: usize) -> Result<Self> {
        // Spreadsheet exports can pad rows with empty trailing cells
        let used = cells.len()
            - cells
                .iter()
                .rev()
                .take(cells.len().saturating_sub(DATA_COLUMNS + 1))
                .take_while(|c| c.trim().is_empty())
                .count();

        if used < DATA_COLUMNS || used > DATA_COLUMNS + 1 {
            return Err(Error::Load(format!(
                "line {}: expected {} or {} columns, found {}",
                line,
                DATA_COLUMNS,
                DATA_COLUMNS + 1,
                used
            )));
        }

        let quantity = parse_quantity(cells[5])
            .map_err(|msg| Error::Load(format!("line {}: {}", line, msg)))?;

        let price_cell = cells[6].trim();
        let marketplace_price = if price_cell.is_empty() {
            None
        } else {
            Some(Price::parse_currency(price_cell).map_err(|_| {
                Error::Load(format!("line {}: invalid price '{}'", line, price_cell))
            })?)
        };

        let foil = Some(cells[7].trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let status = match cells.get(DATA_COLUMNS) {
            Some(cell) => cell
                .parse()
                .map_err(|e| Error::Load(format!("line {}: {}", line, e)))?,
            None => RowStatus::Unset,
        };

        Ok(Self {
            product_line: cells[0].trim().to_string(),
            set_name: cells[1].trim().to_string(),
            product_name: cells[2].trim().to_string(),
            number: cells[3].trim().to_string(),
            rarity: cells[4].trim().to_string(),
            quantity,
            marketplace_price,
            foil,
            language: cells[8].trim().to_string(),
            status,
        })
    }

    pub fn is_english(&self) -> bool {
        self.language.trim().eq_ignore_ascii_case("english")
    }

    pub fn is_foil(&self) -> bool {
        self.foil.as_deref().is_some_and(|f| !f.trim().is_empty())
    }

    /// Human readable identifier used in logs and summaries
    pub fn label(&self) -> String {
        format!("{} ({})", self.product_name, self.set_name)
    }
}

fn parse_quantity(cell: &str) -> std::result::Result<u32, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0);
    }
    if let Ok(qty) = cell.parse::<u32>() {
        return Ok(qty);
    }

    // Spreadsheet exports sometimes render integers as "4.0"
    match cell.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
        _ => Err(format!("invalid quantity '{}'", cell)),
    }
}
