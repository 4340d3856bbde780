//! Фильтрация расходов по выбранному расчетному периоду.

use crate::calendar::YearMonth;
use crate::enumerate::classify;
use crate::types::{CardConfigs, ExpenseRecord};

/// Расходы, чей период совпадает с `target` (`YYYY-MM`).
///
/// Попадают только кредитные расходы с датой и конфигурацией карты.
/// Некорректный ключ дает пустой результат.
pub fn filter_by_period<'a>(
    target: &str,
    configs: &CardConfigs,
    expenses: &'a [ExpenseRecord],
) -> Vec<&'a ExpenseRecord> {
    let key: YearMonth = match target.parse() {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!("Ключ периода '{}' не распознан: {}", target, e);
            return Vec::new();
        }
    };

    expenses
        .iter()
        .filter(|e| classify(e, configs).is_some_and(|p| p.key == key))
        .collect()
}

/// Применяет фильтр периода, если он выбран.
///
/// Без фильтра возвращаются все записи, включая pix, debit и расходы
/// с неразобранной датой.
pub fn apply_period_filter<'a>(
    target: Option<&str>,
    configs: &CardConfigs,
    expenses: &'a [ExpenseRecord],
) -> Vec<&'a ExpenseRecord> {
    match target {
        Some(target) => filter_by_period(target, configs, expenses),
        None => expenses.iter().collect(),
    }
}
