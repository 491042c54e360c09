use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use sip::api::{AppState, build_project_response, run_http_server};
use sip::core::{Calculator, ProjectionInputs, YearlySnapshot, format_inr};
use sip::donation::DonationPrompt;
use sip::session::InMemorySession;

#[derive(Parser, Debug)]
#[command(
    name = "sip",
    about = "Systematic Investment Plan calculator (monthly contributions, monthly compounding)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web calculator and JSON API
    Serve(ServeArgs),
    /// Print a year-by-year projection
    Project(ProjectArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "SIP_PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, env = "SIP_UPI_ID", help = "UPI id shown in the donation prompt")]
    upi_id: Option<String>,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[arg(long, default_value = "5000", help = "Monthly contribution; empty or negative means 0")]
    monthly_contribution: String,
    #[arg(long, default_value_t = 5, help = "Investment period in years (1-30)")]
    years: u32,
    #[arg(long, default_value_t = 12.0, help = "Expected annual return in percent (1-50)")]
    rate: f64,
    #[arg(long, default_value = "0", help = "Starting balance; empty or negative means 0")]
    starting_balance: String,
    #[arg(long, help = "Print the JSON body served by /api/project")]
    json: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => {
            let state = AppState {
                session: Arc::new(InMemorySession::new()),
                donation: DonationPrompt::from_config(args.upi_id.as_deref()),
            };
            if state.donation.is_none() {
                log::warn!("no UPI id configured; donation prompt disabled");
            }
            if let Err(e) = run_http_server(args.port, state).await {
                log::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project(args) => {
            let calculator = calculator_from_args(&args);
            if args.json {
                let response = build_project_response(*calculator.inputs());
                match serde_json::to_string_pretty(&response) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        log::error!("failed to serialize projection: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", render_report(&calculator));
            }
        }
    }
}

fn calculator_from_args(args: &ProjectArgs) -> Calculator {
    let mut calculator = Calculator::new(ProjectionInputs::default());
    calculator.set_monthly_contribution(&args.monthly_contribution);
    calculator.set_horizon_years(args.years);
    calculator.set_annual_rate_percent(args.rate);
    calculator.set_starting_balance(&args.starting_balance);
    calculator
}

fn render_report(calculator: &Calculator) -> String {
    let inputs = calculator.inputs();
    let summary = calculator.summary();

    let mut out = format!(
        "Total value after {} years: {}\n",
        inputs.horizon_years,
        format_inr(summary.total_value)
    );
    out.push_str(&format!("Total investment: {}\n", format_inr(summary.invested)));
    out.push_str(&format!("Total returns: {}\n\n", format_inr(summary.returns)));
    out.push_str(&format!(
        "{:<6}{:>16}{:>16}{:>16}\n",
        "Year", "Invested", "Returns", "Value"
    ));
    for row in calculator.breakdown() {
        out.push_str(&render_row(row));
    }
    out
}

fn render_row(row: &YearlySnapshot) -> String {
    format!(
        "{:<6}{:>16}{:>16}{:>16}\n",
        row.year,
        format_inr(row.invested),
        format_inr(row.returns),
        format_inr(row.total_value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_project(args: &[&str]) -> ProjectArgs {
        let cli = Cli::try_parse_from(args).expect("valid args");
        match cli.command {
            Command::Project(args) => args,
            other => panic!("expected project command, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn project_defaults_match_calculator_defaults() {
        let args = parse_project(&["sip", "project"]);
        let calculator = calculator_from_args(&args);
        assert_eq!(*calculator.inputs(), ProjectionInputs::default());
    }

    #[test]
    fn project_args_are_sanitized() {
        let args = parse_project(&[
            "sip",
            "project",
            "--monthly-contribution",
            "",
            "--years",
            "40",
            "--rate",
            "0.5",
            "--starting-balance=-100",
        ]);
        let inputs = *calculator_from_args(&args).inputs();
        assert_eq!(inputs.monthly_contribution, 0.0);
        assert_eq!(inputs.horizon_years, 30);
        assert_eq!(inputs.annual_rate_percent, 1.0);
        assert_eq!(inputs.starting_balance, 0.0);
    }

    #[test]
    fn report_lists_summary_and_every_year() {
        let args = parse_project(&["sip", "project", "--years", "1"]);
        let report = render_report(&calculator_from_args(&args));

        assert!(report.starts_with("Total value after 1 years: ₹64,047\n"));
        assert!(report.contains("Total investment: ₹60,000\n"));
        assert!(report.contains("Total returns: ₹4,047\n"));
        assert_eq!(report.lines().count(), 6);
        let last = report.lines().last().expect("table row");
        assert!(last.starts_with("1 "));
        assert!(last.ends_with("₹64,047"));
    }
}
