//! Загрузка конфигурации карт и фиксированных расходов из JSON.
//!
//! ```json
//! {
//!   "legacy": { "opening_day": 1, "closing_day": 31 },
//!   "cards": { "nubank": { "opening_day": 20, "closing_day": 15 } }
//! }
//! ```

use crate::error::Result;
use crate::recurring::FixedExpense;
use crate::types::CardConfigs;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

impl CardConfigs {
    /// Читает и проверяет конфигурацию из JSON строки.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let configs: Self = serde_json::from_str(content)?;
        configs.validate()?;
        Ok(configs)
    }

    /// Читает и проверяет конфигурацию из любого источника, реализующего трейт Read.
    pub fn from_read<R: Read>(reader: R) -> Result<Self> {
        let configs: Self = serde_json::from_reader(reader)?;
        configs.validate()?;
        Ok(configs)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let configs = Self::from_read(BufReader::new(File::open(path)?))?;
        tracing::debug!(
            "Загружена конфигурация карт из {:?}: {} карт",
            path,
            configs.cards.len()
        );
        Ok(configs)
    }
}

/// Читает список фиксированных расходов (JSON массив).
pub fn fixed_expenses_from_read<R: Read>(reader: R) -> Result<Vec<FixedExpense>> {
    let expenses: Vec<FixedExpense> = serde_json::from_reader(reader)?;
    for expense in &expenses {
        expense.validate()?;
    }
    Ok(expenses)
}

pub fn fixed_expenses_from_path(path: impl AsRef<Path>) -> Result<Vec<FixedExpense>> {
    let file = File::open(path)?;
    fixed_expenses_from_read(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::CreditCardConfig;

    #[test]
    fn test_load_configs() {
        let json = r#"{
            "legacy": { "opening_day": 1, "closing_day": 31 },
            "cards": { "nubank": { "opening_day": 20, "closing_day": 15 } }
        }"#;
        let configs = CardConfigs::from_json_str(json).unwrap();
        assert_eq!(configs.legacy, Some(CreditCardConfig::new(1, 31).unwrap()));
        assert_eq!(
            configs.resolve(Some("nubank")),
            Some(&CreditCardConfig::new(20, 15).unwrap())
        );
    }

    #[test]
    fn test_missing_sections_default() {
        let configs = CardConfigs::from_json_str("{}").unwrap();
        assert!(configs.is_empty());
    }

    #[test]
    fn test_invalid_day_rejected() {
        let json = r#"{ "cards": { "x": { "opening_day": 0, "closing_day": 15 } } }"#;
        assert!(matches!(
            CardConfigs::from_json_str(json),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CardConfigs::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_load_fixed_expenses() {
        let json = r#"[
            { "id": "rent", "amount": 150000, "due_day": 10, "reminder_offsets": [3, 0] },
            { "id": "gym", "amount": 12000, "due_day": 5, "active": false }
        ]"#;
        let expenses = fixed_expenses_from_read(json.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].reminder_offsets, vec![3, 0]);
        assert_eq!(expenses[1].reminder_offsets, vec![0]);
        assert!(!expenses[1].active);

        let bad = r#"[{ "id": "x", "amount": 1, "due_day": 32 }]"#;
        assert!(fixed_expenses_from_read(bad.as_bytes()).is_err());
    }
}
