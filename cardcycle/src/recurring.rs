//! Напоминания о фиксированных (ежемесячных) расходах.
//!
//! Только расчет дат: доставка уведомлений и регистрация токенов
//! происходят вне библиотеки.

use crate::calendar::{clamp_day, YearMonth};
use crate::error::{Error, Result};
use crate::types::{MAX_CYCLE_DAY, MIN_CYCLE_DAY};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Лимит отложенных уведомлений на устройстве.
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 64;

fn default_offsets() -> Vec<u32> {
    vec![0]
}

fn default_active() -> bool {
    true
}

/// Фиксированный ежемесячный расход.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedExpense {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Сумма в минимальных единицах.
    pub amount: i64,
    /// День месяца, когда наступает платеж (1-31).
    pub due_day: u32,
    /// За сколько дней до платежа напоминать; 0 — в день платежа.
    #[serde(default = "default_offsets")]
    pub reminder_offsets: Vec<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl FixedExpense {
    pub fn new(id: impl Into<String>, amount: i64, due_day: u32) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            amount,
            due_day,
            reminder_offsets: default_offsets(),
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_offsets(mut self, offsets: Vec<u32>) -> Self {
        self.reminder_offsets = offsets;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_CYCLE_DAY..=MAX_CYCLE_DAY).contains(&self.due_day) {
            return Err(Error::InvalidConfig(format!(
                "расход '{}': день платежа {} вне диапазона 1-31",
                self.id, self.due_day
            )));
        }
        Ok(())
    }
}

/// Одна позиция в напоминании.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderItem {
    pub expense_id: String,
    pub description: String,
    pub amount: i64,
    pub due_date: NaiveDate,
    pub days_before: u32,
}

/// Уведомление на конкретную дату; напоминания одного дня объединяются.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub date: NaiveDate,
    pub items: Vec<ReminderItem>,
}

impl Reminder {
    /// Сумма платежей дня; насыщается на границах `i64`.
    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.amount))
    }
}

/// Ближайшая дата платежа не раньше `today`.
pub fn next_due_date(due_day: u32, today: NaiveDate) -> NaiveDate {
    let this_month = clamp_day(today.year(), today.month(), due_day);
    if this_month >= today {
        this_month
    } else {
        YearMonth::of(today).next().day(due_day)
    }
}

/// Строит напоминания на `horizon_months` ближайших платежей каждого
/// активного расхода.
///
/// Напоминания в прошлом отбрасываются, напоминания одного дня
/// группируются, результат отсортирован по дате и обрезан до `limit`.
pub fn schedule_reminders(
    expenses: &[FixedExpense],
    today: NaiveDate,
    horizon_months: u32,
    limit: usize,
) -> Vec<Reminder> {
    let mut by_date: BTreeMap<NaiveDate, Vec<ReminderItem>> = BTreeMap::new();

    for expense in expenses.iter().filter(|e| e.active) {
        let first_due = next_due_date(expense.due_day, today);
        let first_month = YearMonth::of(first_due);

        let mut offsets = expense.reminder_offsets.clone();
        if offsets.is_empty() {
            offsets = default_offsets();
        }
        offsets.sort_unstable();
        offsets.dedup();

        for k in 0..horizon_months {
            let due_date = first_month.add_months(k as i32).day(expense.due_day);

            for &offset in &offsets {
                let Some(date) = due_date.checked_sub_days(Days::new(u64::from(offset))) else {
                    continue;
                };
                if date < today {
                    continue;
                }
                by_date.entry(date).or_default().push(ReminderItem {
                    expense_id: expense.id.clone(),
                    description: expense.description.clone(),
                    amount: expense.amount,
                    due_date,
                    days_before: offset,
                });
            }
        }
    }

    let total = by_date.len();
    if total > limit {
        tracing::warn!(
            "Запланировано {} уведомлений, лимит {}; лишние отброшены",
            total,
            limit
        );
    }

    by_date
        .into_iter()
        .take(limit)
        .map(|(date, mut items)| {
            items.sort_by(|a, b| {
                (a.due_date, &a.expense_id).cmp(&(b.due_date, &b.expense_id))
            });
            Reminder { date, items }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_due_date() {
        assert_eq!(next_due_date(10, date(2024, 3, 5)), date(2024, 3, 10));
        assert_eq!(next_due_date(10, date(2024, 3, 10)), date(2024, 3, 10));
        assert_eq!(next_due_date(10, date(2024, 3, 11)), date(2024, 4, 10));
        assert_eq!(next_due_date(31, date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(next_due_date(5, date(2024, 12, 20)), date(2025, 1, 5));
    }

    #[test]
    fn test_offsets_and_past_reminders() {
        let rent = FixedExpense::new("rent", 150000, 10).with_offsets(vec![3, 0]);
        let reminders = schedule_reminders(&[rent], date(2024, 3, 8), 2, DEFAULT_NOTIFICATION_LIMIT);

        let dates: Vec<_> = reminders.iter().map(|r| r.date).collect();
        // 7 марта уже прошло.
        assert_eq!(dates, vec![date(2024, 3, 10), date(2024, 4, 7), date(2024, 4, 10)]);
        assert_eq!(reminders[1].items[0].days_before, 3);
        assert_eq!(reminders[1].items[0].due_date, date(2024, 4, 10));
    }

    #[test]
    fn test_same_day_reminders_grouped() {
        let expenses = vec![
            FixedExpense::new("internet", 9990, 15).with_description("Интернет"),
            FixedExpense::new("gym", 12000, 18)
                .with_description("Академия")
                .with_offsets(vec![3]),
        ];
        let reminders = schedule_reminders(&expenses, date(2024, 3, 1), 1, DEFAULT_NOTIFICATION_LIMIT);

        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].date, date(2024, 3, 15));
        assert_eq!(reminders[0].items.len(), 2);
        assert_eq!(reminders[0].total(), 21990);
        assert_eq!(reminders[0].items[0].description, "Интернет");
        assert_eq!(reminders[0].items[1].description, "Академия");
        assert_eq!(reminders[0].items[1].days_before, 3);
    }

    #[test]
    fn test_reminder_total_saturates() {
        let expenses = vec![
            FixedExpense::new("loan", i64::MAX, 10),
            FixedExpense::new("rent", i64::MAX, 10),
        ];
        let reminders = schedule_reminders(&expenses, date(2024, 3, 1), 1, DEFAULT_NOTIFICATION_LIMIT);

        assert_eq!(reminders[0].items.len(), 2);
        assert_eq!(reminders[0].total(), i64::MAX);
    }

    #[test]
    fn test_limit_and_inactive() {
        let mut paused = FixedExpense::new("paused", 100, 2);
        paused.active = false;
        let expenses = vec![FixedExpense::new("phone", 5000, 20), paused];

        let reminders = schedule_reminders(&expenses, date(2024, 1, 1), 12, 5);
        assert_eq!(reminders.len(), 5);
        assert!(reminders.iter().all(|r| r.items[0].expense_id == "phone"));
        assert_eq!(reminders[4].date, date(2024, 5, 20));
    }

    #[test]
    fn test_validate_due_day() {
        assert!(FixedExpense::new("x", 1, 31).validate().is_ok());
        assert!(FixedExpense::new("x", 1, 0).validate().is_err());
    }
}
