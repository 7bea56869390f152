use anyhow::Context;
use questline::cli::{
    Args, ConfigDiscovery, ExecutionMode, ListConfig, PlanConfig, RegistryOptions, load_registry,
    plan_quest, quest_summaries, validate_registry,
};
use questline::controller::{decode_priority, encode_priority};
use questline::env;
use questline::task::StepCompiler;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(env::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    match mode {
        ExecutionMode::List(config) => run_list(config),
        ExecutionMode::Validate(options) => run_validate(options),
        ExecutionMode::Plan(config) => run_plan(config),
        ExecutionMode::EncodePriority(quest_ids) => {
            println!("{}", encode_priority(&quest_ids));
            Ok(())
        }
        ExecutionMode::DecodePriority(encoded) => {
            let quest_ids = decode_priority(&encoded).context("Invalid priority string")?;
            for quest_id in quest_ids {
                println!("{}", quest_id);
            }
            Ok(())
        }
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            Ok(())
        }
        ExecutionMode::InitConfig => {
            let path = ConfigDiscovery::create_default_user_config()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
    }
}

fn run_list(config: ListConfig) -> anyhow::Result<()> {
    let (_, registry) = load_registry(&config.options)?;
    let summaries = quest_summaries(&registry, config.include_disabled);
    for summary in &summaries {
        println!("{}", summary);
    }
    info!("{} quest(s) listed", summaries.len());
    Ok(())
}

fn run_validate(options: RegistryOptions) -> anyhow::Result<()> {
    let (_, registry) = load_registry(&options)?;
    let report = validate_registry(&registry, &StepCompiler::default());

    for problem in &report.problems {
        println!("{}", problem);
    }
    println!(
        "Checked {} quest(s), {} step(s): {} problem(s)",
        report.quests_checked,
        report.steps_checked,
        report.problems.len()
    );

    if !report.is_ok() {
        error!("Validation failed");
        std::process::exit(1);
    }
    Ok(())
}

fn run_plan(config: PlanConfig) -> anyhow::Result<()> {
    let (_, registry) = load_registry(&config.options)?;
    let plan = plan_quest(
        &registry,
        &StepCompiler::default(),
        config.quest_id,
        config.sequence,
    )?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", plan);
    }
    Ok(())
}
