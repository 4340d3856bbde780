//! CLI-утилита: расходы выбранного расчетного периода и напоминания
//! о фиксированных расходах.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process;

use cardcycle::config::fixed_expenses_from_path;
use cardcycle::types::format_amount;
use cardcycle::{
    apply_period_filter, schedule_reminders, summarize, CardConfigs, ExpenseLedger,
    ExpenseWriter, Reminder, Result, DEFAULT_NOTIFICATION_LIMIT,
};
use tracing_subscriber::EnvFilter;

/// cardcycle-report - отчеты по расходам.
#[derive(Parser)]
#[command(name = "cardcycle-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Расходы периода в CSV и итоги
    Statement {
        /// CSV файл расходов (по умолчанию stdin)
        #[arg(long = "expenses", short = 'e')]
        expenses: Option<String>,

        /// JSON файл с конфигурацией карт
        #[arg(long = "config", short = 'c')]
        config: Option<String>,

        /// Ключ периода YYYY-MM; без него выводятся все записи
        #[arg(long = "period", short = 'p')]
        period: Option<String>,

        /// Выходной файл (по умолчанию stdout)
        #[arg(long = "output", short = 'o')]
        output: Option<String>,

        /// Печатать итоги в stderr
        #[arg(long)]
        summary: bool,
    },
    /// Ближайшие напоминания о фиксированных расходах
    Reminders {
        /// JSON файл со списком фиксированных расходов
        #[arg(long = "fixed", short = 'f')]
        fixed: String,

        /// Текущая дата YYYY-MM-DD (по умолчанию сегодня)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Сколько ближайших платежей учитывать
        #[arg(long, default_value_t = 3)]
        months: u32,

        /// Максимум уведомлений
        #[arg(long, default_value_t = DEFAULT_NOTIFICATION_LIMIT)]
        limit: usize,
    },
}

fn read_expenses(path: Option<&str>) -> Result<ExpenseLedger> {
    match path {
        Some(path) => ExpenseLedger::from_read(BufReader::new(File::open(path)?)),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            ExpenseLedger::parse(&content)
        }
    }
}

fn statement(
    expenses: Option<&str>,
    config: Option<&str>,
    period: Option<&str>,
    output: Option<&str>,
    print_summary: bool,
) -> Result<()> {
    let configs = match config {
        Some(path) => CardConfigs::from_path(path)?,
        None => CardConfigs::new(),
    };
    if period.is_some() && configs.is_empty() {
        tracing::warn!("Конфигурация карт не задана, фильтр периода ничего не найдет");
    }

    let ledger = read_expenses(expenses)?;
    let selected = apply_period_filter(period, &configs, &ledger.records);
    tracing::info!(
        "Отобрано {} из {} записей",
        selected.len(),
        ledger.records.len()
    );

    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            ExpenseWriter::write_to(selected.iter().copied(), file)?;
        }
        None => {
            let stdout = io::stdout();
            ExpenseWriter::write_to(selected.iter().copied(), stdout.lock())?;
        }
    }

    if print_summary {
        eprint!("{}", summarize(selected.iter().copied()));
    }

    Ok(())
}

fn write_reminders<W: Write>(reminders: &[Reminder], writer: &mut W) -> Result<()> {
    if reminders.is_empty() {
        writeln!(writer, "Напоминаний нет")?;
        return Ok(());
    }

    for reminder in reminders {
        writeln!(
            writer,
            "{}  всего: {}",
            reminder.date,
            format_amount(reminder.total())
        )?;
        for item in &reminder.items {
            let name = if item.description.is_empty() {
                &item.expense_id
            } else {
                &item.description
            };
            writeln!(
                writer,
                "  {} {} (платеж {}, за {} дн.)",
                name,
                format_amount(item.amount),
                item.due_date,
                item.days_before
            )?;
        }
    }

    Ok(())
}

fn reminders(fixed: &str, today: Option<NaiveDate>, months: u32, limit: usize) -> Result<()> {
    let expenses = fixed_expenses_from_path(fixed)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let reminders = schedule_reminders(&expenses, today, months, limit);
    let stdout = io::stdout();
    write_reminders(&reminders, &mut stdout.lock())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Statement {
            expenses,
            config,
            period,
            output,
            summary,
        } => statement(
            expenses.as_deref(),
            config.as_deref(),
            period.as_deref(),
            output.as_deref(),
            summary,
        ),
        Command::Reminders {
            fixed,
            today,
            months,
            limit,
        } => reminders(&fixed, today, months, limit),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Ошибка: {}", e);
        process::exit(1);
    }
}
