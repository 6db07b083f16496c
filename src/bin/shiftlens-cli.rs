#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shiftlens::{
    compliance::{self, sort_violations_for_display},
    diagnosis,
    fte,
    io,
    model::Month,
    staffing::{self, CareServiceType, StaffingStandardConfig},
    DiagnosisStatus,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Compliance and diagnosis reports over a shift dataset (no database)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Dataset JSON file
    #[arg(long, global = true, default_value = "dataset.json")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import staff from a CSV into the dataset
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Per-staff and per-role full-time equivalents
    Fte {
        /// Use realized shifts instead of planned ones
        #[arg(long)]
        actual: bool,
        /// CSV export (optional)
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Break-time and rest-interval checks for one month
    Check {
        /// Target month, YYYY-MM
        #[arg(long)]
        month: String,
        #[arg(long)]
        actual: bool,
        /// JSON report (optional)
        #[arg(long)]
        out_json: Option<String>,
        /// CSV export of violations (optional)
        #[arg(long)]
        report: Option<String>,
    },

    /// Daily staffing-standard fulfillment and monthly summary
    Fulfillment {
        /// Target month, YYYY-MM
        #[arg(long)]
        month: String,
        #[arg(long)]
        actual: bool,
        /// JSON report (optional)
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Pre-generation diagnosis for the dataset's requirement
    Diagnose {
        /// JSON report (optional)
        #[arg(long)]
        out_json: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::ImportStaff { csv } => {
            let mut dataset = io::load_dataset(&cli.data).unwrap_or_else(|_| io::Dataset {
                staff: Vec::new(),
                schedules: Vec::new(),
                shift_settings: shiftlens::FacilityShiftSettings::with_default_slots(),
                requirement: None,
                leave_requests: Default::default(),
                staffing_standard: None,
                standard_weekly_hours: shiftlens::DEFAULT_STANDARD_WEEKLY_HOURS,
            });
            let imported = io::import_staff_csv(csv)?;
            println!("Imported {} staff", imported.len());
            dataset.staff.extend(imported);
            io::write_json(&cli.data, &dataset)?;
            0
        }
        Commands::Fte { actual, out_csv } => {
            let dataset = io::load_dataset(&cli.data)?;
            let entries = fte::calculate_full_time_equivalents(
                &dataset.schedules,
                &dataset.staff,
                &dataset.shift_settings,
                dataset.standard_weekly_hours,
                actual,
            );
            for e in &entries {
                println!(
                    "{} | {} | {:.1}h/month | {:.2} FTE",
                    e.staff_name, e.role, e.monthly_hours, e.fte_value
                );
            }
            for (role, total) in fte::fte_total_by_role(&entries) {
                println!("total {role}: {total:.2} FTE");
            }
            if let Some(path) = out_csv {
                io::export_fte_csv(path, &entries)?;
            }
            0
        }
        Commands::Check {
            month,
            actual,
            out_json,
            report,
        } => {
            let dataset = io::load_dataset(&cli.data)?;
            let target_month: Month = month.parse()?;
            let mut result = compliance::run_compliance_check(
                &dataset.schedules,
                &dataset.staff,
                &dataset.shift_settings,
                target_month,
                dataset.standard_weekly_hours,
                actual,
            );
            sort_violations_for_display(&mut result.violations);
            if let Some(path) = &out_json {
                io::write_json(path, &result)?;
            }
            if result.violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", result.violations.len());
                for v in &result.violations {
                    eprintln!("{:?} | {} | {}", v.severity, v.staff_name, v.description);
                }
                if let Some(path) = report {
                    io::export_violations_csv(path, &result.violations)?;
                }
                2
            }
        }
        Commands::Fulfillment {
            month,
            actual,
            out_json,
        } => {
            let dataset = io::load_dataset(&cli.data)?;
            let target_month: Month = month.parse()?;
            let standard = dataset
                .staffing_standard
                .clone()
                .unwrap_or_else(|| StaffingStandardConfig::default_for(CareServiceType::DayCare));
            let daily = staffing::calculate_daily_fulfillment(
                &dataset.schedules,
                &dataset.staff,
                &dataset.shift_settings,
                &standard,
                target_month,
                dataset.standard_weekly_hours,
                actual,
            );
            let summary = staffing::calculate_monthly_fulfillment_summary(&daily, target_month);
            println!(
                "{}: avg {:.1}% over {} day(s), {} shortfall day(s)",
                summary.target_month,
                summary.average_fulfillment_rate,
                summary.total_days,
                summary.shortfall_days
            );
            for role in &summary.by_role {
                println!(
                    "  {}: avg {:.1}%, {} shortfall day(s)",
                    role.role, role.average_fulfillment_rate, role.shortfall_days
                );
            }
            if let Some(path) = out_json {
                io::write_json(path, &(daily, summary.clone()))?;
            }
            if summary.shortfall_days > 0 {
                2
            } else {
                0
            }
        }
        Commands::Diagnose { out_json } => {
            let dataset = io::load_dataset(&cli.data)?;
            let Some(requirement) = dataset.requirement.as_ref() else {
                bail!("dataset has no shift requirement to diagnose");
            };
            let result =
                diagnosis::diagnose(&dataset.staff, requirement, &dataset.leave_requests);
            println!("status: {:?}", result.status);
            println!("{}", result.summary);
            for issue in &result.issues {
                println!("- [{:?}] {}: {}", issue.severity, issue.title, issue.description);
            }
            for suggestion in &result.suggestions {
                println!("* [{:?}] {}", suggestion.priority, suggestion.action);
            }
            if let Some(path) = out_json {
                io::write_json(path, &result)?;
            }
            match result.status {
                DiagnosisStatus::Ok => 0,
                DiagnosisStatus::Warning | DiagnosisStatus::Error => 2,
            }
        }
    };

    std::process::exit(code);
}
