// Entry point and high-level CLI flow.
//
// - Option [1] loads every CSV of the data directory, derives the analytical
//   columns and prints the column descriptions.
// - Option [2] generates the vacation-period reports and a JSON summary.
// - After generating reports, the user can go back to the menu or exit.
use anac_flights::catalog::describe_columns;
use anac_flights::output;
use anac_flights::reports::{self, OverviewQuery, RankingQuery, ReasonQuery, STATUS_RATES};
use anac_flights::rules::format_elapsed;
use anac_flights::util;
use anac_flights::types::FlightPreviewRow;
use anac_flights::FlightDataset;
use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "anac_flights")]
#[command(about = "Vacation-period analysis of ANAC flight records", long_about = None)]
struct Cli {
    /// Directory containing the ANAC CSV files
    #[arg(short, long, default_value = "bases")]
    data_dir: PathBuf,

    /// Load this single CSV file instead of the whole data directory
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Decimal places of the rate columns
    #[arg(short, long, default_value_t = 2)]
    precision: u32,

    /// Number of routes kept in each ranking
    #[arg(short, long, default_value_t = 10)]
    ranking: usize,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask whether to go back to the menu after generating reports.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and transform the CSV directory.
fn handle_load(cli: &Cli) -> Option<FlightDataset> {
    let loaded = match &cli.file {
        Some(path) => FlightDataset::load_file(path),
        None => FlightDataset::load(&cli.data_dir),
    };
    match loaded {
        Ok(ds) => {
            let report = ds.report();
            println!(
                "Processing dataset... ({} files, {} rows loaded, {} flights kept)",
                util::format_int(report.total_files),
                util::format_int(report.total_rows),
                util::format_int(ds.len())
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse errors.",
                    util::format_int(report.parse_errors)
                );
            }
            println!("Elapsed: {}\n", format_elapsed(report.elapsed));
            output::preview_table(&describe_columns(ds.headers()), usize::MAX);
            if let Ok(head) = ds.head(5) {
                let rows: Vec<FlightPreviewRow> = head.iter().map(FlightPreviewRow::from).collect();
                output::preview_table(&rows, 5);
            }
            Some(ds)
        }
        Err(e) => {
            error!(error = %e, "dataset load failed");
            eprintln!("Failed to load data: {}\n", e);
            None
        }
    }
}

fn export(cli: &Cli, file: &str, title: &str, table: &anac_flights::SummaryTable, preview: usize) {
    let path = cli.output_dir.join(file);
    if let Err(e) = output::write_csv(&path, table) {
        eprintln!("Write error: {}", e);
    }
    println!("{}\n", title);
    output::preview_summary(table, preview);
    println!("(Full table exported to {})\n", path.display());
}

/// Handle option [2]: generate every report and the JSON summary.
fn handle_generate_reports(cli: &Cli, ds: &FlightDataset) -> Result<(), Box<dyn Error>> {
    println!("Generating reports...\n");

    let overview = reports::flights_overview(
        ds,
        &OverviewQuery {
            only_vacation: true,
            group_by: vec!["periodo_ferias", "codigo_tipo_linha"],
            percentages: STATUS_RATES.to_vec(),
            precision: cli.precision,
        },
    )?;
    export(
        cli,
        "report1_vacation_overview.csv",
        "Report 1: Vacation Flights by Line Type",
        &overview,
        9,
    );

    for line in ds.line_types() {
        let ranking = reports::route_ranking(
            ds,
            &RankingQuery {
                group_by: vec!["codigo_tipo_linha", "rota"],
                percentages: STATUS_RATES.to_vec(),
                precision: cli.precision,
                ranking: cli.ranking,
                line: Some(line.as_str()),
                period: None,
            },
        )?;
        let file = format!("report2_route_ranking_{}.csv", line.to_lowercase().replace(' ', "_"));
        let title = format!("Report 2: Top {} Routes ({})", cli.ranking, line);
        export(cli, &file, &title, &ranking, 5);
    }

    let delays = reports::delays_by_reason(
        ds,
        &ReasonQuery {
            group_by: vec!["justificativa_atraso", "periodo_ferias"],
            period: None,
            line: None,
            as_duration: true,
        },
    )?;
    export(
        cli,
        "report3_delay_reasons.csv",
        "Report 3: Delay Reasons in Vacation Periods",
        &delays,
        5,
    );

    let cancellations = reports::cancellations_by_reason(
        ds,
        &ReasonQuery {
            group_by: vec!["justificativa_cancelamento", "periodo_ferias"],
            period: None,
            line: None,
            as_duration: false,
        },
    )?;
    export(
        cli,
        "report4_cancellation_reasons.csv",
        "Report 4: Cancellation Reasons in Vacation Periods",
        &cancellations,
        5,
    );

    let summary_table =
        reports::vacation_summary(ds, &["periodo_ferias"], &STATUS_RATES, cli.precision)?;
    export(
        cli,
        "report5_vacation_summary.csv",
        "Report 5: Vacation Period Summary",
        &summary_table,
        3,
    );

    let stats = reports::dataset_summary(ds)?;
    let summary_path = cli.output_dir.join("summary.json");
    let json = serde_json::json!({
        "stats": stats,
        "vacation_summary": output::table_to_json(&summary_table),
    });
    output::write_json(&summary_path, &json)?;
    println!("Summary Stats ({}):", summary_path.display());
    println!(
        "{{\"total_records\": {}, \"delayed_pct\": {}, \"cancelled_pct\": {}}}\n",
        util::format_int(stats.total_records),
        util::format_number(stats.delayed_pct, 2),
        util::format_number(stats.cancelled_pct, 2)
    );
    info!(dir = %cli.output_dir.display(), "reports written");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn ensure_output_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    ensure_output_dir(&cli.output_dir)?;

    // Loaded once, reused for every report run.
    let mut dataset = FlightDataset::default();

    loop {
        println!("Select an option:");
        println!("[1] Load the files");
        println!("[2] Generate Reports\n");
        match read_choice().as_str() {
            "1" => {
                if let Some(ds) = handle_load(&cli) {
                    dataset = ds;
                }
            }
            "2" => {
                println!();
                if !dataset.is_solid() {
                    println!(
                        "Error: No data loaded. Please load the CSV files first (option 1).\n"
                    );
                    continue;
                }
                if let Err(e) = handle_generate_reports(&cli, &dataset) {
                    error!(error = %e, "report generation failed");
                    eprintln!("Failed to generate reports: {}\n", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
    Ok(())
}
