//! Чтение расходов из CSV выгрузки бэкенда.

use crate::error::{Error, Result};
use crate::types::{EntryKind, ExpenseRecord, PaymentMethod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Колонки, без которых файл не разбирается.
pub const REQUIRED_COLUMNS: [&str; 3] = ["expense_date", "payment_method", "amount"];

/// Колонки в порядке записи.
pub const COLUMNS: [&str; 7] = [
    "id",
    "expense_date",
    "payment_method",
    "card_id",
    "amount",
    "description",
    "kind",
];

/// Строка CSV в том виде, в каком ее отдает бэкенд.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ExpenseRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub expense_date: String,
    pub payment_method: String,
    #[serde(default)]
    pub card_id: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: Option<String>,
}

/// Набор расходов, прочитанный из CSV.
#[derive(Debug, Clone, Default)]
pub struct ExpenseLedger {
    pub records: Vec<ExpenseRecord>,
}

impl ExpenseLedger {
    /// Парсит CSV из любого источника, реализующего трейт Read.
    pub fn from_read<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::InvalidFormat(format!(
                    "в CSV нет обязательной колонки '{}'",
                    column
                )));
            }
        }

        let mut records = Vec::new();
        for (index, row) in rdr.deserialize::<ExpenseRow>().enumerate() {
            // Строка 1 — заголовок.
            let line = index + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Строка {}: не удалось прочитать запись: {}", line, e);
                    continue;
                }
            };

            match row.into_record(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Строка {}: запись пропущена: {}", line, e),
            }
        }

        Ok(Self { records })
    }

    /// Парсит CSV из строки.
    pub fn parse(content: &str) -> Result<Self> {
        Self::from_read(content.as_bytes())
    }

    /// Записи с неразобранной датой.
    pub fn undated(&self) -> impl Iterator<Item = &ExpenseRecord> {
        self.records.iter().filter(|r| r.expense_date.is_none())
    }
}

impl ExpenseRow {
    fn into_record(self, line: usize) -> Result<ExpenseRecord> {
        let payment_method: PaymentMethod = self.payment_method.parse()?;
        let amount = parse_amount(&self.amount)?;
        let kind = parse_kind(self.kind.as_deref())?;

        let expense_date = parse_expense_date(&self.expense_date);
        if expense_date.is_none() {
            tracing::warn!(
                "Строка {}: некорректная дата '{}', запись останется без периода",
                line,
                self.expense_date
            );
        }

        let id = if self.id.is_empty() {
            format!("row-{}", line)
        } else {
            self.id
        };

        Ok(ExpenseRecord {
            id,
            expense_date,
            payment_method,
            card_id: self.card_id.filter(|c| !c.is_empty()),
            amount,
            description: self.description,
            kind,
        })
    }
}

/// Разбирает дату `YYYY-MM-DD`; у ISO даты-времени берется только дата,
/// без сдвига часового пояса.
pub fn parse_expense_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10)?;
    if s.len() > 10 && !s[10..].starts_with(|c: char| c == 'T' || c == ' ') {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Знаки валюты, допустимые перед суммой.
const CURRENCY_SYMBOLS: [&str; 2] = ["R$", "$"];

/// Разбирает сумму вида `123.45` или `123,45` в минимальные единицы.
///
/// Допускаются знак `-`, символ валюты и пробелы вокруг них. Дробная часть
/// не длиннее двух цифр; все остальное считается ошибкой.
pub fn parse_amount(s: &str) -> Result<i64> {
    let original = s.trim();
    if original.is_empty() {
        return Err(Error::Parse("Пустая сумма".to_string()));
    }
    let invalid = || Error::Parse(format!("Некорректная сумма: {}", original));
    let out_of_range = || Error::Parse(format!("Сумма вне допустимого диапазона: {}", original));

    let mut rest = original;
    let mut negative = false;
    if let Some(r) = rest.strip_prefix('-') {
        negative = true;
        rest = r.trim_start();
    }
    for symbol in CURRENCY_SYMBOLS {
        if let Some(r) = rest.strip_prefix(symbol) {
            rest = r.trim_start();
            break;
        }
    }
    if !negative {
        if let Some(r) = rest.strip_prefix('-') {
            negative = true;
            rest = r;
        }
    }

    let (units, fraction) = match rest.find(|c: char| c == '.' || c == ',') {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
        None => (rest, None),
    };
    if units.is_empty() || !units.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let cents = match fraction {
        None => 0,
        Some(f) if (1..=2).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()) => {
            let value: i64 = f.parse().map_err(|_| invalid())?;
            if f.len() == 1 {
                value * 10
            } else {
                value
            }
        }
        Some(_) => return Err(invalid()),
    };

    let units: i64 = units.parse().map_err(|_| out_of_range())?;
    let total = units
        .checked_mul(100)
        .and_then(|u| u.checked_add(cents))
        .ok_or_else(out_of_range)?;

    Ok(if negative { -total } else { total })
}

fn parse_kind(s: Option<&str>) -> Result<EntryKind> {
    match s.map(|k| k.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("expense") => Ok(EntryKind::Expense),
        Some("income") => Ok(EntryKind::Income),
        Some(other) => Err(Error::Parse(format!("Неизвестный тип записи: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expense_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 25);
        assert_eq!(parse_expense_date("2024-03-25"), expected);
        assert_eq!(parse_expense_date("2024-03-25T23:30:00-03:00"), expected);
        assert_eq!(parse_expense_date(" 2024-03-25 "), expected);
        assert_eq!(parse_expense_date("25/03/2024"), None);
        assert_eq!(parse_expense_date("2024-02-30"), None);
        assert_eq!(parse_expense_date(""), None);
        assert_eq!(parse_expense_date("2024-03-251"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("444.29").unwrap(), 44429);
        assert_eq!(parse_amount("12,5").unwrap(), 1250);
        assert_eq!(parse_amount("R$ 10.00").unwrap(), 1000);
        assert_eq!(parse_amount("-3.10").unwrap(), -310);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("R$10").unwrap(), 1000);
        assert_eq!(parse_amount("-R$ 7,05").unwrap(), -705);
        assert_eq!(parse_amount("R$ -7.05").unwrap(), -705);
        assert_eq!(parse_amount("15").unwrap(), 1500);
        assert_eq!(parse_amount("0.07").unwrap(), 7);
    }

    #[test]
    fn test_parse_amount_rejects_malformed() {
        for bad in [
            "1e3", "12abc34", "1.2.3", "1,2,3", "1.234", "12.", ".5", "-", "--5", "1 000", "R$",
            "US$ 5", "5-",
        ] {
            assert!(
                matches!(parse_amount(bad), Err(Error::Parse(_))),
                "сумма '{}' должна быть отклонена",
                bad
            );
        }
    }

    #[test]
    fn test_parse_amount_out_of_range() {
        assert!(matches!(parse_amount("99999999999999999999"), Err(Error::Parse(_))));
        assert!(matches!(parse_amount("92233720368547758.08"), Err(Error::Parse(_))));
        assert_eq!(parse_amount("92233720368547758.07").unwrap(), i64::MAX);
        assert_eq!(parse_amount("-92233720368547758.07").unwrap(), -i64::MAX);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind(None).unwrap(), EntryKind::Expense);
        assert_eq!(parse_kind(Some("Income")).unwrap(), EntryKind::Income);
        assert!(parse_kind(Some("transfer")).is_err());
    }
}
