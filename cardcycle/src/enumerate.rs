//! Перечисление расчетных периодов, которые реально встречаются в расходах.

use crate::period::billing_period;
use crate::types::{BillingPeriod, CardConfigs, ExpenseRecord};
use std::collections::HashSet;

/// Период расхода, если его можно вычислить.
///
/// Нужны способ оплаты `credit`, разобранная дата и конфигурация карты
/// (собственная или общая).
pub fn classify(expense: &ExpenseRecord, configs: &CardConfigs) -> Option<BillingPeriod> {
    if !expense.is_credit() {
        return None;
    }
    let date = expense.expense_date?;
    let config = configs.resolve(expense.card_id.as_deref())?;
    Some(billing_period(config, date))
}

/// Уникальные периоды по всем расходам, от новых к старым.
///
/// Если у разных карт совпадает ключ периода, подпись берется у первого
/// встретившегося расхода.
pub fn enumerate_periods<'a, I>(expenses: I, configs: &CardConfigs) -> Vec<BillingPeriod>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut seen = HashSet::new();
    let mut periods = Vec::new();
    let mut skipped = 0usize;

    for expense in expenses {
        match classify(expense, configs) {
            Some(period) => {
                if seen.insert(period.key) {
                    periods.push(period);
                }
            }
            None => {
                if expense.is_credit() {
                    skipped += 1;
                }
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(
            "Пропущено {} кредитных расходов без даты или конфигурации карты",
            skipped
        );
    }

    // Стабильная сортировка сохраняет порядок первых вхождений.
    periods.sort_by(|a, b| b.key.cmp(&a.key));
    periods
}

/// Периоды одной карты.
pub fn enumerate_card_periods<'a, I>(
    expenses: I,
    card_id: &str,
    configs: &CardConfigs,
) -> Vec<BillingPeriod>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    enumerate_periods(
        expenses
            .into_iter()
            .filter(|e| e.card_id.as_deref() == Some(card_id)),
        configs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreditCardConfig, PaymentMethod};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn credit(id: &str, d: Option<NaiveDate>) -> ExpenseRecord {
        ExpenseRecord::new(id, d, PaymentMethod::Credit, 1000)
    }

    #[test]
    fn test_fifty_expenses_three_periods() {
        let configs = CardConfigs::legacy(CreditCardConfig::new(1, 31).unwrap());
        let expenses: Vec<_> = (0..50)
            .map(|i| {
                let month = 1 + (i % 3) as u32;
                let day = 1 + (i % 28) as u32;
                credit(&format!("e{}", i), date(2024, month, day))
            })
            .collect();

        let periods = enumerate_periods(&expenses, &configs);
        let values: Vec<_> = periods.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, vec!["2024-03", "2024-02", "2024-01"]);
    }

    #[test]
    fn test_skips_unclassifiable() {
        let configs = CardConfigs::new().with_card("nubank", CreditCardConfig::new(20, 15).unwrap());
        let expenses = vec![
            credit("1", date(2024, 3, 25)).with_card("nubank"),
            credit("2", None).with_card("nubank"),
            credit("3", date(2024, 1, 5)).with_card("inter"),
            ExpenseRecord::new("4", date(2023, 5, 1), PaymentMethod::Pix, 500),
            ExpenseRecord::new("5", date(2023, 6, 1), PaymentMethod::Debit, 500).with_card("nubank"),
        ];

        let periods = enumerate_periods(&expenses, &configs);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].value, "2024-03");
    }

    #[test]
    fn test_per_card_cycles() {
        let configs = CardConfigs::legacy(CreditCardConfig::new(1, 31).unwrap())
            .with_card("nubank", CreditCardConfig::new(20, 15).unwrap());
        let expenses = vec![
            credit("1", date(2024, 3, 10)).with_card("nubank"),
            credit("2", date(2024, 3, 10)),
            credit("3", date(2024, 4, 1)).with_card("nubank"),
        ];

        let all = enumerate_periods(&expenses, &configs);
        let values: Vec<_> = all.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, vec!["2024-03", "2024-02"]);

        let nubank = enumerate_card_periods(&expenses, "nubank", &configs);
        let values: Vec<_> = nubank.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, vec!["2024-03", "2024-02"]);
        assert_eq!(nubank[0].label, "20 Mar – 15 Abr");
    }

    #[test]
    fn test_first_label_wins_on_collision() {
        let configs = CardConfigs::legacy(CreditCardConfig::new(1, 31).unwrap())
            .with_card("nubank", CreditCardConfig::new(20, 15).unwrap());
        let expenses = vec![
            credit("1", date(2024, 3, 25)).with_card("nubank"),
            credit("2", date(2024, 3, 5)),
        ];

        let periods = enumerate_periods(&expenses, &configs);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].label, "20 Mar – 15 Abr");
    }
}
