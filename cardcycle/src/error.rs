//! Модуль обработки ошибок библиотеки.

use thiserror::Error;

/// Основной тип ошибки библиотеки.
#[derive(Debug, Error)]
pub enum Error {
    /// Ошибка ввода/вывода
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),
    /// Ошибка чтения или записи CSV
    #[error("Ошибка CSV: {0}")]
    Csv(#[from] csv::Error),
    /// Ошибка разбора JSON конфигурации
    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Ошибка парсинга значения
    #[error("Ошибка парсинга: {0}")]
    Parse(String),
    /// Некорректная конфигурация карты (день вне диапазона 1-31)
    #[error("Некорректная конфигурация карты: {0}")]
    InvalidConfig(String),
    /// Неверный формат данных
    #[error("Неверный формат: {0}")]
    InvalidFormat(String),
}

/// Тип Result с ошибкой библиотеки.
pub type Result<T> = std::result::Result<T, Error>;
