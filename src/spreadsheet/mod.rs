//! Reading and writing `.xlsx` spreadsheets.
//!
//! Reading is done with calamine and writing with rust_xlsxwriter, both work
//! on in-memory buffers so nothing touches the disk.

mod reader;
mod writer;

pub use reader::read_contributions;
pub use writer::{CellValue, SheetColumn, write_workbook};
