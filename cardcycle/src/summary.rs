//! Итоги по набору записей: суммы расходов и доходов, разбивка по способам
//! оплаты и картам.

use crate::types::{format_amount, EntryKind, ExpenseRecord, PaymentMethod, NO_CARD};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Сводка по записям. Суммы в минимальных единицах.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub expenses_total: i64,
    pub incomes_total: i64,
    /// Доходы минус расходы.
    pub balance: i64,
    /// Расходы по способу оплаты.
    pub by_method: BTreeMap<PaymentMethod, i64>,
    /// Расходы по карте; без карты — под ключом [`NO_CARD`].
    pub by_card: BTreeMap<String, i64>,
}

/// Считает сводку. Суммы насыщаются на границах `i64`.
pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut summary = Summary::default();

    for record in records {
        summary.count += 1;
        match record.kind {
            EntryKind::Income => {
                summary.incomes_total = summary.incomes_total.saturating_add(record.amount)
            }
            EntryKind::Expense => {
                summary.expenses_total = summary.expenses_total.saturating_add(record.amount);
                let by_method = summary.by_method.entry(record.payment_method).or_insert(0);
                *by_method = by_method.saturating_add(record.amount);
                let card = record.card_id.as_deref().unwrap_or(NO_CARD);
                let by_card = summary.by_card.entry(card.to_string()).or_insert(0);
                *by_card = by_card.saturating_add(record.amount);
            }
        }
    }

    summary.balance = summary.incomes_total.saturating_sub(summary.expenses_total);
    summary
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Записей: {}", self.count)?;
        writeln!(f, "Расходы: {}", format_amount(self.expenses_total))?;
        writeln!(f, "Доходы: {}", format_amount(self.incomes_total))?;
        writeln!(f, "Баланс: {}", format_amount(self.balance))?;

        for (method, total) in &self.by_method {
            writeln!(f, "  {}: {}", method, format_amount(*total))?;
        }
        for (card, total) in &self.by_card {
            writeln!(f, "  карта {}: {}", card, format_amount(*total))?;
        }
        Ok(())
    }
}
