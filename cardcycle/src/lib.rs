//! # cardcycle
//!
//! Библиотека расчетных периодов кредитных карт для учета расходов:
//! по дню открытия и закрытия цикла карты определяет, к какой выписке
//! относится расход, перечисляет периоды и фильтрует расходы по ним.
//!
//! ## Модули
//!
//! - **calendar** - длина месяца и прижатие дня к короткому месяцу
//! - **period** - расчет периода по дате расхода
//! - **enumerate** - уникальные периоды набора расходов
//! - **filter** - фильтрация расходов по периоду
//! - **summary** - итоги по расходам и доходам
//! - **recurring** - напоминания о фиксированных расходах
//! - **csv**, **config** - чтение расходов и конфигурации
//!
//! ## Пример использования
//!
//! ```rust
//! use cardcycle::{billing_period, CreditCardConfig};
//! use chrono::NaiveDate;
//!
//! let config = CreditCardConfig::new(20, 15).unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
//! let period = billing_period(&config, date);
//! assert_eq!(period.value, "2024-03");
//! assert_eq!(period.label, "20 Mar – 15 Abr");
//! ```

pub mod calendar;
pub mod config;
pub mod csv;
pub mod enumerate;
pub mod error;
pub mod filter;
pub mod period;
pub mod recurring;
pub mod summary;
pub mod types;

pub use calendar::{clamp_day, days_in_month, YearMonth};
pub use crate::csv::{ExpenseLedger, ExpenseWriter};
pub use enumerate::{classify, enumerate_card_periods, enumerate_periods};
pub use error::{Error, Result};
pub use filter::{apply_period_filter, filter_by_period};
pub use period::{billing_period, period_for_key};
pub use recurring::{
    next_due_date, schedule_reminders, FixedExpense, Reminder, DEFAULT_NOTIFICATION_LIMIT,
};
pub use summary::{summarize, Summary};
pub use types::*;
