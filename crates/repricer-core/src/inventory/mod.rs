mod row;
mod table;

pub use row::{DATA_COLUMNS, InventoryRow, RowStatus, STATUS_TITLE};
pub use table::{InventoryTable, backup_path_for};
