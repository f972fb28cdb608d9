//! CLI command definitions for profile-diversity.
//!
//! `compute` scores a profile request read from a JSON file; `simulate`
//! generates a synthetic population and searches alternative teams.

use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::diversity::{
    default_schema, Agent, Attribute, ChangeDirection, DiversityEngine,
    DiversityReport, EngineConfig, PopulationSampler,
};
use crate::profile::{
    self, build_agents, build_requirements, DiversityRequest, DiversityResponse,
    UserDiversityRequest,
};

/// Default number of agents generated by `simulate`.
const DEFAULT_POPULATION_SIZE: usize = 2000;

/// Default team size sampled by `simulate`.
const DEFAULT_TEAM_SIZE: usize = 30;

/// Team diversity over agent profiles.
#[derive(Parser)]
#[command(name = "profile-diversity")]
#[command(about = "Compute team diversity over agent profiles")]
#[command(version)]
#[command(
    long_about = "profile-diversity scores how heterogeneous a set of agent profiles is across quantitative and qualitative attributes.\n\nExample usage:\n  profile-diversity compute --input agents.json\n  profile-diversity simulate --agents 500 --team-size 20 --seed 42 --direction increase"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// YAML file with engine settings. Falls back to DIVERSITY_* environment variables.
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Compute the normalized diversity of a profile request.
    Compute(ComputeArgs),

    /// Generate a synthetic population and search alternative teams.
    #[command(alias = "sim")]
    Simulate(SimulateArgs),
}

/// Arguments for `profile-diversity compute`.
#[derive(Parser, Debug)]
pub struct ComputeArgs {
    /// JSON request file, or '-' for standard input.
    #[arg(short = 'i', long, default_value = "-")]
    pub input: String,

    /// Treat the input as a users request (quantitative attributes only).
    #[arg(long)]
    pub users: bool,

    /// Print the per-attribute breakdown instead of the bare score.
    #[arg(long, conflicts_with = "users")]
    pub report: bool,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `profile-diversity simulate`.
#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Number of agents to generate.
    #[arg(short = 'n', long, default_value_t = DEFAULT_POPULATION_SIZE)]
    pub agents: usize,

    /// Number of agents in the sampled team.
    #[arg(short = 't', long, default_value_t = DEFAULT_TEAM_SIZE)]
    pub team_size: usize,

    /// Random seed for reproducible runs.
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Minimum diversity shift (defaults to the configured change epsilon).
    #[arg(short = 'e', long)]
    pub epsilon: Option<f64>,

    /// Acceptance rule on diff = team diversity - new team diversity
    /// (increase: diff >= epsilon, decrease: diff <= -epsilon).
    #[arg(short = 'd', long, default_value = "decrease")]
    pub direction: ChangeDirection,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses CLI arguments and runs the selected command.
pub fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli())
}

/// Runs the selected command.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let engine = DiversityEngine::new(load_config(cli.config.as_deref())?);

    match cli.command {
        Commands::Compute(args) => run_compute_command(&engine, args),
        Commands::Simulate(args) => run_simulate_command(&engine, args),
    }
}

fn load_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_yaml_file(path),
        None => EngineConfig::from_env(),
    };
    config.map_err(|e| anyhow::anyhow!("Failed to load engine configuration: {}", e))
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        std::io::read_to_string(std::io::stdin())
            .map_err(|e| anyhow::anyhow!("Failed to read standard input: {}", e))
    } else {
        if !Path::new(input).exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {}", input));
        }
        std::fs::read_to_string(input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input, e))
    }
}

// ============================================================================
// Compute Command Implementation
// ============================================================================

fn run_compute_command(engine: &DiversityEngine, args: ComputeArgs) -> anyhow::Result<()> {
    let content = read_input(&args.input)?;

    if args.users {
        let request: UserDiversityRequest = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse users request: {}", e))?;
        let value = profile::compute_user_diversity_with(engine, &request);
        return print_score(value, args.json);
    }

    let request: DiversityRequest = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse diversity request: {}", e))?;

    if args.report {
        let report = compute_report(engine, &request)?;
        if args.json {
            let json_output = serde_json::to_string_pretty(&report)
                .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
            println!("{}", json_output);
        } else {
            println!("{}", report.summary());
        }
        return Ok(());
    }

    let value = profile::compute_diversity_with(engine, &request);
    print_score(value, args.json)
}

fn compute_report(
    engine: &DiversityEngine,
    request: &DiversityRequest,
) -> anyhow::Result<DiversityReport> {
    let requirements = build_requirements(request);
    let pool = build_agents(request).map_err(|e| anyhow::anyhow!("Invalid request: {}", e))?;
    let team: Vec<&Agent> = pool.agents().iter().collect();

    engine
        .report(&team, &requirements)
        .map_err(|e| anyhow::anyhow!("Diversity computation failed: {}", e))
}

fn print_score(value: f64, json: bool) -> anyhow::Result<()> {
    if json {
        let json_output = serde_json::to_string(&DiversityResponse { value })
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
    } else {
        println!("{:.6}", value);
    }
    Ok(())
}

// ============================================================================
// Simulate Command Implementation
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct AlternativeTeam {
    members: Vec<String>,
    diversity: f64,
}

#[derive(Debug, Clone, Serialize)]
struct SimulateOutput {
    population: usize,
    population_diversity: f64,
    team: Vec<String>,
    team_diversity: f64,
    attribute: String,
    direction: ChangeDirection,
    epsilon: f64,
    alternatives: Vec<AlternativeTeam>,
}

fn simulate(engine: &DiversityEngine, args: &SimulateArgs) -> anyhow::Result<SimulateOutput> {
    if args.team_size == 0 || args.team_size > args.agents {
        return Err(anyhow::anyhow!(
            "team size must be between 1 and the population size ({}), got {}",
            args.agents,
            args.team_size
        ));
    }
    let epsilon = args.epsilon.unwrap_or(engine.config().change_epsilon);
    let engine = DiversityEngine::new(engine.config().clone().with_change_epsilon(epsilon));
    engine
        .config()
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid epsilon: {}", e))?;

    let sampler = match args.seed {
        Some(seed) => PopulationSampler::new().with_seed(seed),
        None => PopulationSampler::new(),
    };

    let schema = default_schema();
    let requirements: Vec<Attribute> = vec![schema[0].clone(), schema[2].clone()];
    let target = requirements[0].clone();

    info!(agents = args.agents, "Generating population");
    let mut pool = sampler.generate(args.agents, &schema);

    info!("Finding equivalences");
    pool.populate_equivalents(&requirements, engine.config().equivalence_epsilon);

    let population: Vec<&Agent> = pool.agents().iter().collect();
    let population_diversity = engine.diversity(&population, &requirements)?;

    let team = sampler.sample_team(&pool, args.team_size);
    let team_diversity = engine.diversity(&team, &requirements)?;

    let alternatives = engine.change_diversity(&team, &target, &pool, args.direction)?;

    let mut scored = Vec::with_capacity(alternatives.len());
    for alternative in &alternatives {
        scored.push(AlternativeTeam {
            members: alternative.iter().map(|a| a.id().to_string()).collect(),
            diversity: engine.diversity(alternative, &requirements)?,
        });
    }

    Ok(SimulateOutput {
        population: pool.len(),
        population_diversity,
        team: team.iter().map(|a| a.id().to_string()).collect(),
        team_diversity,
        attribute: target.id().to_string(),
        direction: args.direction,
        epsilon,
        alternatives: scored,
    })
}

fn run_simulate_command(engine: &DiversityEngine, args: SimulateArgs) -> anyhow::Result<()> {
    let output = simulate(engine, &args)?;

    if args.json {
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("\n=== Simulation ===");
    println!("Population:           {}", output.population);
    println!("Population diversity: {:.4}", output.population_diversity);
    println!("Team:                 [{}]", output.team.join(", "));
    println!("Team diversity:       {:.4}", output.team_diversity);
    println!(
        "Search:               {:?} on '{}' by >= {}",
        output.direction, output.attribute, output.epsilon
    );
    println!("{}", "-".repeat(50));
    for alternative in &output.alternatives {
        println!(
            "[{}] {:.4}",
            alternative.members.join(", "),
            alternative.diversity
        );
    }
    println!("Alternatives:         {}", output.alternatives.len());

    Ok(())
}
