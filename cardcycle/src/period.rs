//! Расчет расчетного периода кредитной карты по дате расхода.
//!
//! Период идентифицируется месяцем открытия цикла (`YYYY-MM`). Даты закрытия
//! делят календарь без пропусков и пересечений: дата относится к первому
//! циклу, который закрывается не раньше нее. Дни между закрытием и следующим
//! открытием поэтому уходят в следующий цикл.
//!
//! Это касается и високосного февраля: при дне закрытия 28 дата 29 февраля
//! попадает в мартовский цикл.

use crate::calendar::YearMonth;
use crate::types::{BillingPeriod, CreditCardConfig};
use chrono::{Datelike, NaiveDate};

/// Сокращения месяцев для подписей периодов.
const MONTH_ABBR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Сокращенное название месяца (1-12).
pub fn month_abbr(month: u32) -> &'static str {
    MONTH_ABBR[(month.clamp(1, 12) - 1) as usize]
}

/// Дата закрытия цикла, открывающегося в месяце `anchor`.
fn cycle_end(config: &CreditCardConfig, anchor: YearMonth) -> NaiveDate {
    let closing_month = if config.is_wrapping() {
        anchor.next()
    } else {
        anchor
    };
    closing_month.day(config.closing_day)
}

/// Месяц открытия цикла, в который попадает дата.
pub fn anchor_for(config: &CreditCardConfig, date: NaiveDate) -> YearMonth {
    let month = YearMonth::of(date);

    // Цикл, закрывающийся в месяце самой даты.
    let candidate = if config.is_wrapping() {
        month.prev()
    } else {
        month
    };

    if date <= cycle_end(config, candidate) {
        candidate
    } else {
        candidate.next()
    }
}

/// Период, открывающийся в месяце `key`.
pub fn period_for_key(config: &CreditCardConfig, key: YearMonth) -> BillingPeriod {
    let end = cycle_end(config, key);
    let previous_end = cycle_end(config, key.prev());
    let start = previous_end.succ_opt().unwrap_or(previous_end);
    let opening = key.day(config.opening_day).max(start);

    BillingPeriod {
        value: key.to_string(),
        label: format_label(opening, end),
        key,
        opening,
        start,
        end,
    }
}

/// Период, к которому относится расход с датой `date`.
pub fn billing_period(config: &CreditCardConfig, date: NaiveDate) -> BillingPeriod {
    period_for_key(config, anchor_for(config, date))
}

fn format_label(opening: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} {} – {} {}",
        opening.day(),
        month_abbr(opening.month()),
        end.day(),
        month_abbr(end.month())
    )
}
