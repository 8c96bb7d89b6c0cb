//! Farm dashboard walkthrough: records, filters, and a profit/loss report

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use farm_ledger::filter::{FilterQuery, SortDirection};
use farm_ledger::utils::{parse_amount, parse_date, MemoryStorage};
use farm_ledger::{
    Crop, CropDraft, CropType, DashboardConfig, ExpenseCategory, ExpenseDraft, Expense, Farm,
    FarmDraft, FarmManager, Harvest, Priority, ReportScope, SizeUnit, Task, TaskDraft, TaskType,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🌾 Farm Ledger - Dashboard Example\n");

    let config = DashboardConfig::from_toml_str(
        r#"
        trend_months = 6
        recent_task_count = 3
        "#,
    )?;
    let mut manager = FarmManager::new(MemoryStorage::new()).with_config(config);

    // 1. Farms
    println!("📍 Adding farms...");
    let north: Farm = manager.add(FarmDraft::new(
        "North Field",
        "Valley District",
        parse_amount("50"),
        SizeUnit::Acres,
    ))?;
    let south: Farm = manager.add(FarmDraft::new(
        "South Field",
        "Ridge Road",
        parse_amount("12.5"),
        SizeUnit::Hectares,
    ))?;
    for farm in [&north, &south] {
        println!("  ✓ {} ({} {})", farm.name, farm.size, farm.size_unit);
    }

    // 2. Crops and tasks
    println!("\n🌱 Logging crops and tasks...");
    let corn: Crop = manager.add(
        CropDraft::new(
            &north.id,
            CropType::Corn,
            "Sweet Corn",
            parse_date("2024-04-01")?,
            parse_date("2024-07-01")?,
        )
        .notes("First planting of the season"),
    )?;
    manager.add::<Task>(
        TaskDraft::new(&north.id, "Water crops", parse_date("2024-04-02")?)
            .crop(&corn.id)
            .description("Morning irrigation")
            .priority(Priority::High)
            .task_type(TaskType::Watering),
    )?;
    manager.add::<Task>(
        TaskDraft::new(&south.id, "Repair fence", parse_date("2024-04-05")?)
            .priority(Priority::Low)
            .task_type(TaskType::Maintenance),
    )?;

    // 3. Expenses
    println!("\n💸 Recording expenses...");
    let expenses = [
        (&north.id, "150", ExpenseCategory::Seeds, "Corn seeds purchase", "2024-04-01"),
        (&north.id, "85.40", ExpenseCategory::Fuel, "Tractor diesel", "2024-05-12"),
        (&south.id, "320", ExpenseCategory::Equipment, "Fence posts", "2024-04-06"),
        (&north.id, "not a number", ExpenseCategory::Other, "Mistyped entry", "2024-06-01"),
    ];
    let policy = manager.config().input_policy;
    for (farm_id, amount, category, description, on) in expenses {
        let expense: Expense = manager.add(ExpenseDraft::new(
            farm_id,
            policy.amount(amount)?,
            category,
            description,
            parse_date(on)?,
        ))?;
        println!("  ✓ {}: {} ({})", expense.description, expense.amount, expense.category);
    }

    // 4. Harvest
    println!("\n🚜 Recording harvest...");
    if let Some(revenue) = manager.record_harvest(
        &corn.id,
        Harvest {
            yield_amount: BigDecimal::from(120),
            yield_unit: "bushels".to_string(),
            price_per_unit: parse_amount("4.75"),
            harvest_date: parse_date("2024-07-03")?,
        },
    )? {
        println!(
            "  ✓ {} {} of {} → {}",
            revenue.yield_amount, revenue.yield_unit, revenue.crop_type, revenue.total_revenue
        );
    }

    // 5. Dashboard
    let stats = manager.dashboard_stats()?;
    println!("\n📊 Dashboard");
    println!("  Farms:          {}", stats.total_farms);
    println!("  Crops:          {}", stats.total_crops);
    println!("  Pending tasks:  {}", stats.pending_tasks);
    println!("  Total expenses: {}", stats.total_expenses);

    let by_priority: Vec<Task> =
        manager.filter(&FilterQuery::new().sort_by("priority", SortDirection::Descending))?;
    println!("\n✅ Tasks by priority");
    for task in &by_priority {
        println!("  [{}] {} (due {})", task.priority, task.title, task.due_date);
    }

    // 6. Reports
    let reports = manager.reports()?;
    let season = ReportScope::new(parse_date("2024-04-01")?, parse_date("2024-07-31")?);
    let summary = reports.profit_loss(&season);

    println!("\n📈 Profit & Loss ({} to {})", season.date_from, season.date_to);
    println!("  Revenue:  {}", summary.total_revenue);
    println!("  Expenses: {}", summary.total_expenses);
    println!("  Net:      {}", summary.net_profit);
    println!("  Margin:   {}%", summary.profit_margin);

    let chart = reports.expense_chart(&summary.expense_by_category);
    println!("\n🥧 Expenses by category");
    for (label, value) in chart.labels.iter().zip(&chart.values) {
        println!("  {:<12} {}", label, value);
    }

    println!("\n📉 Profit trend");
    let today = NaiveDate::from_ymd_opt(2024, 7, 15).ok_or("invalid date")?;
    for point in reports.profit_trend(today).points {
        println!("  {} {}", point.label, point.net_profit);
    }

    println!("\n🏡 Farm comparison");
    for row in reports.farm_comparison(season.date_from, season.date_to) {
        println!(
            "  {:<12} revenue {:>8} expenses {:>8} net {:>8}",
            row.farm_name, row.revenue, row.expenses, row.net_profit
        );
    }

    let snapshot = reports.snapshot(&season, Utc::now());
    println!("\n💾 {}", reports.export_file_name(&snapshot));
    println!("{}", snapshot.to_json()?);

    Ok(())
}
