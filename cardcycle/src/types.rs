//! Базовые типы данных: способы оплаты, конфигурация карт, расходы
//! и вычисляемые расчетные периоды.

use crate::calendar::YearMonth;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Константы
// =============================================================================

/// Минимальный допустимый день открытия/закрытия цикла.
pub const MIN_CYCLE_DAY: u32 = 1;
/// Максимальный допустимый день открытия/закрытия цикла.
pub const MAX_CYCLE_DAY: u32 = 31;

/// Ключ в сводке по картам для расходов без карты.
pub const NO_CARD: &str = "-";

// =============================================================================
// Перечисления
// =============================================================================

/// Способ оплаты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Мгновенный перевод PIX
    Pix,
    /// Дебетовая карта
    Debit,
    /// Кредитная карта
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pix" => Ok(PaymentMethod::Pix),
            "debit" => Ok(PaymentMethod::Debit),
            "credit" => Ok(PaymentMethod::Credit),
            other => Err(Error::Parse(format!("Неизвестный способ оплаты: {}", other))),
        }
    }
}

/// Тип записи: расход или доход.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Expense,
    Income,
}

// =============================================================================
// Конфигурация карт
// =============================================================================

/// Расчетный цикл кредитной карты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardConfig {
    /// День открытия цикла (1-31).
    pub opening_day: u32,
    /// День закрытия выписки (1-31).
    pub closing_day: u32,
}

impl CreditCardConfig {
    /// Создает конфигурацию, проверяя диапазон дней.
    pub fn new(opening_day: u32, closing_day: u32) -> Result<Self> {
        let config = Self {
            opening_day,
            closing_day,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let range = MIN_CYCLE_DAY..=MAX_CYCLE_DAY;
        if !range.contains(&self.opening_day) {
            return Err(Error::InvalidConfig(format!(
                "день открытия {} вне диапазона 1-31",
                self.opening_day
            )));
        }
        if !range.contains(&self.closing_day) {
            return Err(Error::InvalidConfig(format!(
                "день закрытия {} вне диапазона 1-31",
                self.closing_day
            )));
        }
        Ok(())
    }

    /// Цикл переходит через границу месяца (закрытие раньше открытия).
    pub fn is_wrapping(&self) -> bool {
        self.closing_day < self.opening_day
    }
}

/// Набор конфигураций: по картам и общая (legacy) для остальных.
///
/// Передается в расчеты явно, без глобального состояния.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfigs {
    /// Общая конфигурация аккаунта.
    #[serde(default)]
    pub legacy: Option<CreditCardConfig>,
    /// Конфигурации по идентификатору карты.
    #[serde(default)]
    pub cards: BTreeMap<String, CreditCardConfig>,
}

impl CardConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Набор только с общей конфигурацией.
    pub fn legacy(config: CreditCardConfig) -> Self {
        Self {
            legacy: Some(config),
            cards: BTreeMap::new(),
        }
    }

    pub fn with_card(mut self, card_id: impl Into<String>, config: CreditCardConfig) -> Self {
        self.cards.insert(card_id.into(), config);
        self
    }

    /// Конфигурация для карты; при ее отсутствии используется общая.
    pub fn resolve(&self, card_id: Option<&str>) -> Option<&CreditCardConfig> {
        card_id
            .and_then(|id| self.cards.get(id))
            .or(self.legacy.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.legacy.is_none() && self.cards.is_empty()
    }

    /// Проверяет все конфигурации набора.
    pub fn validate(&self) -> Result<()> {
        if let Some(legacy) = &self.legacy {
            legacy.validate()?;
        }
        for (card_id, config) in &self.cards {
            config
                .validate()
                .map_err(|e| Error::InvalidConfig(format!("карта '{}': {}", card_id, e)))?;
        }
        Ok(())
    }
}

// =============================================================================
// Расходы
// =============================================================================

/// Запись о расходе или доходе.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Идентификатор записи.
    pub id: String,
    /// Дата расхода; `None`, если дату не удалось разобрать.
    pub expense_date: Option<NaiveDate>,
    /// Способ оплаты.
    pub payment_method: PaymentMethod,
    /// Карта, чей цикл определяет период.
    pub card_id: Option<String>,
    /// Сумма в минимальных единицах (сентаво, копейки).
    pub amount: i64,
    /// Описание.
    pub description: String,
    /// Расход или доход.
    pub kind: EntryKind,
}

impl ExpenseRecord {
    pub fn new(
        id: impl Into<String>,
        expense_date: Option<NaiveDate>,
        payment_method: PaymentMethod,
        amount: i64,
    ) -> Self {
        Self {
            id: id.into(),
            expense_date,
            payment_method,
            card_id: None,
            amount,
            description: String::new(),
            kind: EntryKind::Expense,
        }
    }

    pub fn with_card(mut self, card_id: impl Into<String>) -> Self {
        self.card_id = Some(card_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_credit(&self) -> bool {
        self.payment_method == PaymentMethod::Credit
    }
}

// =============================================================================
// Расчетный период
// =============================================================================

/// Расчетный период карты. Вычисляется, не хранится.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingPeriod {
    /// Стабильный ключ `YYYY-MM` (месяц открытия цикла).
    pub value: String,
    /// Подпись для отображения, например "15 Fev – 14 Mar".
    pub label: String,
    /// Месяц открытия цикла.
    #[serde(skip)]
    pub key: YearMonth,
    /// Номинальная дата открытия по конфигурации.
    pub opening: NaiveDate,
    /// Первый день, попадающий в период (день после предыдущего закрытия).
    pub start: NaiveDate,
    /// Дата закрытия выписки, последний день периода.
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// Попадает ли дата в период.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Форматирует сумму в минимальных единицах как `123.45`.
pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(CreditCardConfig::new(1, 31).is_ok());
        assert!(CreditCardConfig::new(0, 10).is_err());
        assert!(CreditCardConfig::new(10, 32).is_err());
    }

    #[test]
    fn test_config_wrapping() {
        assert!(CreditCardConfig::new(20, 15).unwrap().is_wrapping());
        assert!(!CreditCardConfig::new(1, 28).unwrap().is_wrapping());
        assert!(!CreditCardConfig::new(10, 10).unwrap().is_wrapping());
    }

    #[test]
    fn test_resolve_falls_back_to_legacy() {
        let legacy = CreditCardConfig::new(1, 31).unwrap();
        let nubank = CreditCardConfig::new(20, 15).unwrap();
        let configs = CardConfigs::legacy(legacy).with_card("nubank", nubank);

        assert_eq!(configs.resolve(Some("nubank")), Some(&nubank));
        assert_eq!(configs.resolve(Some("inter")), Some(&legacy));
        assert_eq!(configs.resolve(None), Some(&legacy));

        let only_cards = CardConfigs::new().with_card("nubank", nubank);
        assert_eq!(only_cards.resolve(None), None);
        assert_eq!(only_cards.resolve(Some("inter")), None);
    }

    #[test]
    fn test_configs_validate_reports_card() {
        let configs = CardConfigs::new().with_card(
            "broken",
            CreditCardConfig {
                opening_day: 40,
                closing_day: 5,
            },
        );
        let err = configs.validate().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("Credit".parse::<PaymentMethod>().unwrap(), PaymentMethod::Credit);
        assert_eq!(" pix ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Pix);
        assert!("boleto".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12345), "123.45");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(-250), "-2.50");
    }
}
