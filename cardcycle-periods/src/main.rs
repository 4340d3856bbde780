//! CLI-утилита для вывода расчетных периодов, встречающихся в расходах.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::process;

use cardcycle::{
    enumerate_card_periods, enumerate_periods, filter_by_period, BillingPeriod, CardConfigs,
    ExpenseLedger, Result,
};
use tracing_subscriber::EnvFilter;

/// cardcycle-periods - расчетные периоды кредитных карт.
///
/// Читает CSV с расходами и JSON с циклами карт и печатает периоды,
/// от новых к старым.
#[derive(Parser)]
#[command(name = "cardcycle-periods")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV файл расходов (по умолчанию stdin)
    #[arg(long = "expenses", short = 'e')]
    expenses: Option<String>,

    /// JSON файл с конфигурацией карт
    #[arg(long = "config", short = 'c')]
    config: String,

    /// Только периоды указанной карты
    #[arg(long = "card")]
    card: Option<String>,

    /// Вывод в JSON
    #[arg(long)]
    json: bool,
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

fn print_table(
    periods: &[BillingPeriod],
    ledger: &ExpenseLedger,
    configs: &CardConfigs,
    card: Option<&str>,
) {
    if periods.is_empty() {
        println!("Периодов не найдено");
        return;
    }

    for period in periods {
        let count = filter_by_period(&period.value, configs, &ledger.records)
            .iter()
            .filter(|r| card.is_none() || r.card_id.as_deref() == card)
            .count();
        println!(
            "{}  {:<20} {} - {}  расходов: {}",
            period.value, period.label, period.start, period.end, count
        );
    }
}

fn run(args: &Args) -> Result<()> {
    let configs = CardConfigs::from_path(&args.config)?;
    let ledger = read_expenses(args.expenses.as_deref())?;

    let periods = match &args.card {
        Some(card) => enumerate_card_periods(&ledger.records, card, &configs),
        None => enumerate_periods(&ledger.records, &configs),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&periods)?);
    } else {
        print_table(&periods, &ledger, &configs, args.card.as_deref());
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Ошибка: {}", e);
        process::exit(1);
    }
}
