use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use groupos::ops::{self, DEFAULT_DROP_THRESHOLD};
use groupos::{
    Deal, DealFilter, Entity, Identity, NewDeal, Probability, Promotion, Prospect,
    ProspectFilter, ProspectStatus, Region, Sector, Session, SessionConfig, Stage, Zar,
};

#[derive(Parser)]
#[command(name = "groupos")]
#[command(about = "Group operating dashboard: pipeline, prospecting and site monitoring")]
struct Cli {
    /// Identity to sign in as (simulated, no credentials)
    #[arg(short, long, value_enum, default_value_t = IdentityArg::Admin)]
    identity: IdentityArg,

    /// Share of prospect turnover booked as deal value on promotion
    #[arg(long, env = "GROUPOS_VALUATION_RATIO", default_value_t = Promotion::DEFAULT_VALUATION_RATIO)]
    valuation_ratio: f64,

    /// Log filter, e.g. "info" or "groupos=debug"
    #[arg(long, env = "GROUPOS_LOG", default_value = "warn")]
    log_level: String,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum IdentityArg {
    Admin,
    Client,
}

impl From<IdentityArg> for Identity {
    fn from(arg: IdentityArg) -> Self {
        match arg {
            IdentityArg::Admin => Identity::AdminVas,
            IdentityArg::Client => Identity::ClientSr,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List the views the signed-in identity may open
    Views,
    /// List pipeline deals
    Deals {
        #[arg(long = "entity")]
        entities: Vec<Entity>,
        #[arg(long = "stage")]
        stages: Vec<Stage>,
        #[arg(long)]
        min_value: Option<Zar>,
        #[arg(long)]
        min_probability: Option<Probability>,
    },
    /// Total pipeline, weighted forecast and deal count
    Pipeline,
    /// Move a deal to a new stage and probability
    EditDeal {
        name: String,
        #[arg(long)]
        stage: Stage,
        #[arg(long)]
        probability: Probability,
    },
    /// Add a manual pipeline entry
    AddDeal {
        name: String,
        #[arg(long)]
        entity: Entity,
        #[arg(long)]
        value: Zar,
        #[arg(long, default_value = "Lead")]
        stage: Stage,
    },
    /// List prospects matching every given filter
    Prospects {
        #[arg(long = "sector")]
        sectors: Vec<Sector>,
        #[arg(long = "region")]
        regions: Vec<Region>,
        #[arg(long = "status")]
        statuses: Vec<ProspectStatus>,
        #[arg(long)]
        min_turnover: Option<Zar>,
    },
    /// Promote a prospect into the pipeline
    Promote { company: String },
    /// Central command summary
    CommandCenter,
    /// Fuel flow status and drop detection
    Fuel {
        #[arg(long, default_value_t = DEFAULT_DROP_THRESHOLD)]
        threshold: f64,
    },
    /// Safety document processing queue
    Safety {
        #[arg(long)]
        flagged: bool,
    },
    /// Group cockpit alerts
    Alerts,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut session = Session::new(SessionConfig {
        valuation_ratio: cli.valuation_ratio,
    });
    session.select_identity(cli.identity.into())?;

    run(&session, cli.command, cli.json)
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

fn run(session: &Session, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Views => {
            let views: Vec<String> = session.views().iter().map(ToString::to_string).collect();
            if json {
                return print_json(&views);
            }
            if let Some(role) = session.role() {
                println!("Identity: {} ({})", role.title(), role);
            }
            for view in views {
                println!("  {view}");
            }
        }
        Command::Deals {
            entities,
            stages,
            min_value,
            min_probability,
        } => {
            let deals = session.deals(&DealFilter {
                entities: non_empty(entities),
                stages: non_empty(stages),
                min_value,
                min_probability,
            })?;
            if json {
                return print_json(&deals);
            }
            print_deals(&deals);
        }
        Command::Pipeline => {
            let summary = session.pipeline()?;
            if json {
                return print_json(&summary);
            }
            println!("Total Pipeline:    {} ({} deals)", summary.total_value, summary.deal_count);
            println!(
                "Weighted Forecast: {}",
                Zar::new(summary.weighted_forecast.round() as u64)
            );
        }
        Command::EditDeal {
            name,
            stage,
            probability,
        } => {
            let deal = session.edit_deal(&name, stage, probability)?;
            if json {
                return print_json(&deal);
            }
            println!("Updated {}", deal.name);
            print_deals(&[deal]);
        }
        Command::AddDeal {
            name,
            entity,
            value,
            stage,
        } => {
            let deal = session.add_deal(NewDeal {
                name,
                entity,
                value,
                stage,
            })?;
            if json {
                return print_json(&deal);
            }
            println!("Deal Added");
            print_deals(&[deal]);
        }
        Command::Prospects {
            sectors,
            regions,
            statuses,
            min_turnover,
        } => {
            let prospects = session.filter_prospects(&ProspectFilter {
                sectors: non_empty(sectors),
                regions: non_empty(regions),
                statuses: non_empty(statuses),
                min_turnover,
            })?;
            if json {
                return print_json(&prospects);
            }
            print_prospects(&prospects);
        }
        Command::Promote { company } => {
            let deal = session.promote(&company)?;
            if json {
                return print_json(&deal);
            }
            println!("Promoted {company} to DealStream");
            print_deals(&[deal]);
        }
        Command::CommandCenter => {
            let summary = session.central_command()?;
            if json {
                return print_json(&summary);
            }
            println!(
                "Total System Value: {} ({} deals)",
                summary.total_system_value, summary.deal_count
            );
            println!("Active Nodes: {}", summary.sites.len());
            for site in &summary.sites {
                println!(
                    "  {:<12} {:>9.4} {:>9.4}  {:?}",
                    site.name, site.latitude, site.longitude, site.status
                );
            }
        }
        Command::Fuel { threshold } => {
            let status = session.liquid_automation(threshold)?;
            if json {
                return print_json(&status);
            }
            let Some(status) = status else {
                println!("No flow readings.");
                return Ok(());
            };
            println!(
                "Current Flow Rate: {} L/hr ({:+} L/hr)",
                status.current.flow_lph, status.change_lph
            );
            match status.anomaly {
                Some(anomaly) => println!(
                    "ANOMALY DETECTED: {} L/hr on {}, {:.1}% below baseline of {:.0} L/hr",
                    anomaly.flow_lph,
                    anomaly.date,
                    anomaly.drop_ratio * 100.0,
                    anomaly.baseline_lph
                ),
                None => println!("Flow within expected range"),
            }
        }
        Command::Safety { flagged } => {
            let mut documents = session.sturrock_safety()?;
            if flagged {
                documents = ops::flagged(&documents);
            }
            if json {
                return print_json(&documents);
            }
            println!("{:<30} {:<10} {:<6} {}", "Document", "Status", "Risk", "Date");
            for doc in &documents {
                println!(
                    "{:<30} {:<10} {:<6} {}",
                    doc.name,
                    doc.status.to_string(),
                    doc.risk.to_string(),
                    doc.received
                );
            }
        }
        Command::Alerts => {
            let alerts = session.group_cockpit()?;
            if json {
                return print_json(&alerts);
            }
            for alert in &alerts {
                println!("[{:?}] {:?}: {}", alert.severity, alert.source, alert.message);
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_deals(deals: &[Deal]) {
    println!(
        "{:<34} {:<13} {:<14} {:>14} {:>6}  {}",
        "Deal Name", "Entity", "Stage", "Value", "Prob", "Next Action"
    );
    for deal in deals {
        println!(
            "{:<34} {:<13} {:<14} {:>14} {:>6}  {}",
            deal.name,
            deal.entity.label(),
            deal.stage.label(),
            deal.value.to_string(),
            deal.probability.to_string(),
            deal.next_action
        );
    }
}

fn print_prospects(prospects: &[Prospect]) {
    if prospects.is_empty() {
        println!("No prospects match the filters.");
        return;
    }
    println!(
        "{:<18} {:<12} {:>16} {:<14} {}",
        "Company", "Sector", "Turnover", "Region", "Status"
    );
    for prospect in prospects {
        println!(
            "{:<18} {:<12} {:>16} {:<14} {}",
            prospect.company,
            prospect.sector.label(),
            prospect.turnover.to_string(),
            prospect.region.label(),
            prospect.status.label()
        );
    }
}
