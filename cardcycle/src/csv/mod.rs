//! Модуль чтения и записи расходов в формате CSV.

pub mod parser;
pub mod writer;

pub use parser::{parse_amount, parse_expense_date, ExpenseLedger};
pub use writer::ExpenseWriter;
