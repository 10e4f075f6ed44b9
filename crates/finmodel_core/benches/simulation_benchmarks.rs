//! Criterion benchmarks for finmodel_core simulation
//!
//! Run with: cargo bench -p finmodel_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use finmodel_core::config::ScenarioConfig;
use finmodel_core::ledger::{LotLedger, ShareLot};
use finmodel_core::model::{CashStream, Category, TransactionLog};
use finmodel_core::simulation::{ScenarioInputs, simulate};

const YEARS: usize = 35;
const WEEKS: usize = YEARS * 52;

fn weekly_log(category: Category, every: usize, line: impl Fn(usize) -> String) -> TransactionLog {
    let text: String = (0..WEEKS)
        .step_by(every)
        .map(|week| line(week) + "\n")
        .collect();
    TransactionLog::parse(category, &text).expect("benchmark log parses")
}

fn create_household() -> (ScenarioConfig, ScenarioInputs) {
    let config = ScenarioConfig::new()
        .with_weeks(WEEKS)
        .with_starting_cash(200_000.0);

    let inputs = ScenarioInputs::new()
        .with_log(weekly_log(Category::Shares, 2, |week| {
            if week % 104 == 100 {
                format!("{week} SELL 5000")
            } else {
                format!("{week} BUY 300")
            }
        }))
        .with_log(weekly_log(Category::Super, 1, |week| format!("{week} BUY CC 150")))
        .with_log(
            TransactionLog::parse(Category::Home, "52 BUY 650000\n1500 SELL").expect("home log"),
        )
        .with_log(
            TransactionLog::parse(Category::HomeLoan, "52 START 550000 30").expect("loan log"),
        )
        .with_log(
            TransactionLog::parse(Category::CarLoan, "10 START 40000 8000 5").expect("car log"),
        )
        .with_log(TransactionLog::parse(Category::Hecs, "0 START 30000").expect("hecs log"))
        .with_income(CashStream::constant(Category::Income, 2_400.0, WEEKS))
        .with_expenses(CashStream::constant(Category::Expenses, -600.0, WEEKS));

    (config, inputs)
}

fn bench_household_simulation(c: &mut Criterion) {
    let (config, inputs) = create_household();

    c.bench_function("household_35yr_simulation", |b| {
        b.iter(|| simulate(black_box(&config), black_box(&inputs)))
    });
}

fn bench_lot_sales(c: &mut Criterion) {
    let mut group = c.benchmark_group("fifo_sell");

    for lots in [10, 100, 1000].iter() {
        let mut ledger = LotLedger::new();
        for week in 0..*lots {
            ledger.push(ShareLot::new(week, 100.0));
        }
        let amount = ledger.total_value() * 0.75;

        group.bench_with_input(BenchmarkId::new("lots", lots), lots, |b, _| {
            b.iter(|| {
                let mut ledger = ledger.clone();
                ledger.sell(black_box(amount), black_box(5000))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_household_simulation, bench_lot_sales);
criterion_main!(benches);
