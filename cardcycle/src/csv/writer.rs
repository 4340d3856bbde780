//! Запись расходов в CSV.

use crate::csv::parser::{ExpenseLedger, ExpenseRow, COLUMNS};
use crate::error::Result;
use crate::types::{format_amount, EntryKind, ExpenseRecord};
use std::io::Write;

/// Writer для CSV расходов.
pub struct ExpenseWriter;

impl ExpenseWriter {
    /// Записывает расходы в любой приемник, реализующий трейт Write.
    pub fn write_to<'a, I, W>(records: I, writer: W) -> Result<()>
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
        W: Write,
    {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(COLUMNS)?;

        for record in records {
            wtr.serialize(Self::to_row(record))?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn to_row(record: &ExpenseRecord) -> ExpenseRow {
        let kind = match record.kind {
            EntryKind::Expense => "expense",
            EntryKind::Income => "income",
        };

        ExpenseRow {
            id: record.id.clone(),
            expense_date: record
                .expense_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            payment_method: record.payment_method.to_string(),
            card_id: record.card_id.clone(),
            amount: format_amount(record.amount),
            description: record.description.clone(),
            kind: Some(kind.to_string()),
        }
    }
}

impl ExpenseLedger {
    /// Записывает расходы в любой приемник, реализующий трейт Write.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        ExpenseWriter::write_to(&self.records, writer)
    }
}
