use clap::{Parser, Subcommand};
use hn_core::units::pa;
use hn_project::{ProjectResult, build_network, network_to_def};
use hn_solver::report::{
    balancing_valve_table, conduit_table, control_valve_table, flow_path_table,
    hydraulic_resistance,
};
use hn_solver::{CorrectionOrder, FlowBasis, HardyCrossConfig, PipeNetwork, analyze};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "hn-cli")]
#[command(about = "hydronet CLI - Hardy Cross analysis and balancing of pipe networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a network file and build its graph
    Validate {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
    },
    /// Solve the loop flows with the Hardy Cross method
    Analyze {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Largest acceptable loop imbalance in Pa
        #[arg(long, default_value_t = 1.0)]
        tolerance_pa: f64,
        /// Iteration budget
        #[arg(long, default_value_t = 500)]
        max_iterations: usize,
        /// Correct loops one after another instead of all at once
        #[arg(long)]
        sequential: bool,
        /// Write the solved network to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Preset the balancing valves at design flow
    Balance {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Write the balanced network to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// List flow paths from the start node to the end node with their losses
    Paths {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Use the stored flows instead of the design flows
        #[arg(long)]
        current: bool,
    },
    /// List conduits with their flows and pressure drop parts
    Conduits {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
    },
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { network_path } => cmd_validate(&network_path),
        Commands::Analyze {
            network_path,
            tolerance_pa,
            max_iterations,
            sequential,
            save,
        } => {
            let config = HardyCrossConfig {
                tolerance: pa(tolerance_pa),
                max_iterations,
                order: if sequential {
                    CorrectionOrder::Sequential
                } else {
                    CorrectionOrder::Simultaneous
                },
            };
            cmd_analyze(&network_path, &config, save.as_deref())
        }
        Commands::Balance { network_path, save } => cmd_balance(&network_path, save.as_deref()),
        Commands::Paths {
            network_path,
            current,
        } => {
            let basis = if current {
                FlowBasis::Current
            } else {
                FlowBasis::Design
            };
            cmd_paths(&network_path, basis)
        }
        Commands::Conduits { network_path } => cmd_conduits(&network_path),
    }
}

fn load_network(path: &Path) -> ProjectResult<PipeNetwork> {
    let def = hn_project::load(path)?;
    build_network(&def)
}

fn save_network(path: Option<&Path>, network: &PipeNetwork) -> ProjectResult<()> {
    if let Some(path) = path {
        hn_project::save(path, &network_to_def(network))?;
        println!("✓ Saved to {}", path.display());
    }
    Ok(())
}

fn cmd_validate(network_path: &Path) -> ProjectResult<()> {
    println!("Validating network: {}", network_path.display());
    let network = load_network(network_path)?;
    let graph = network.graph();
    println!("✓ Network '{}' is valid", network.name());
    println!("  Nodes: {}", graph.nodes().len());
    println!("  Conduits: {}", graph.conduits().len());
    println!("  Loops: {}", graph.loops().len());
    println!("  Flow paths: {}", network.flow_paths().len());
    Ok(())
}

fn cmd_analyze(
    network_path: &Path,
    config: &HardyCrossConfig,
    save: Option<&Path>,
) -> ProjectResult<()> {
    let mut network = load_network(network_path)?;
    let report = analyze(&mut network, config)?;
    info!(iterations = report.iterations, "analysis finished");
    println!(
        "✓ Converged after {} iterations (largest loop imbalance {:.3} Pa)",
        report.iterations,
        report.max_imbalance().value
    );
    println!(
        "  Hydraulic resistance: {:.4e} Pa·s²/m⁶",
        hydraulic_resistance(&network, FlowBasis::Current)?
    );

    println!("{:<10} {:>14}", "Loop", "Imbalance [Pa]");
    for (name, dp) in &report.final_loop_imbalances {
        println!("{:<10} {:>14.3}", name, dp.value);
    }
    println!();
    print_conduits(&network)?;
    save_network(save, &network)
}

fn cmd_balance(network_path: &Path, save: Option<&Path>) -> ProjectResult<()> {
    let mut network = load_network(network_path)?;
    let report = network.balance_network_at_design()?;
    println!("✓ Balanced; critical path {}", report.critical_path);
    println!("  Reference loss: {:.1} Pa", report.reference_loss.value);
    println!(
        "  Hydraulic resistance: {:.4e} Pa·s²/m⁶",
        hydraulic_resistance(&network, FlowBasis::Design)?
    );

    println!();
    println!(
        "{:<10} {:>8} {:>8} {:>12}",
        "Valve", "Kvs", "Kvr", "Drop [Pa]"
    );
    for row in balancing_valve_table(&network)? {
        let kvr = row.kvr.map_or_else(|| "-".to_string(), |kv| format!("{kv:.3}"));
        println!(
            "{:<10} {:>8.3} {:>8} {:>12.1}",
            row.conduit, row.kvs, kvr, row.pressure_drop.value
        );
    }

    let control = control_valve_table(&network)?;
    if !control.is_empty() {
        println!();
        println!(
            "{:<10} {:>8} {:>9} {:>12} {:>10}",
            "Valve", "Kvs", "Open [%]", "Drop [Pa]", "Authority"
        );
        for row in control {
            println!(
                "{:<10} {:>8.3} {:>9.1} {:>12.1} {:>10.3}",
                row.conduit, row.kvs, row.opening_pct, row.pressure_drop.value, row.authority
            );
        }
    }
    save_network(save, &network)
}

fn cmd_paths(network_path: &Path, basis: FlowBasis) -> ProjectResult<()> {
    let network = load_network(network_path)?;
    let rows = flow_path_table(&network, basis)?;
    if rows.is_empty() {
        println!("No flow paths between the start node and the end node");
        return Ok(());
    }
    println!(
        "{:>12} {:>12} {:>12}  {}",
        "Total [Pa]", "Dynamic [Pa]", "Deficit [Pa]", "Path"
    );
    for row in rows {
        println!(
            "{:>12.1} {:>12.1} {:>12.1}  {}",
            row.dp_total.value, row.dp_dynamic.value, row.dp_deficit.value, row.path
        );
    }
    Ok(())
}

fn cmd_conduits(network_path: &Path) -> ProjectResult<()> {
    let network = load_network(network_path)?;
    print_conduits(&network)
}

fn print_conduits(network: &PipeNetwork) -> ProjectResult<()> {
    println!(
        "{:<8} {:<15} {:>10} {:>8} {:>9} {:>10} {:>10} {:>10} {:>10}",
        "Conduit", "Kind", "Q [L/s]", "v [m/s]", "Re", "Fric [Pa]", "Fitt [Pa]", "Valve [Pa]",
        "Total [Pa]"
    );
    for row in conduit_table(network)? {
        println!(
            "{:<8} {:<15} {:>10.4} {:>8.3} {:>9.0} {:>10.1} {:>10.1} {:>10.1} {:>10.1}",
            row.name,
            format!("{:?}", row.kind),
            row.flow.value * 1000.0,
            row.velocity,
            row.reynolds,
            row.friction.value,
            row.fittings.value,
            row.valves.value,
            row.total.value
        );
    }
    Ok(())
}
