//! Hardy Cross analysis and design-point balancing of closed pipe networks.
//!
//! A [`PipeNetwork`] owns the validated graph, one [`Conduit`] model per
//! graph conduit and the fluid. [`hardy_cross::analyze`] corrects the loop
//! flows until every loop's pressure drops sum to zero;
//! [`PipeNetwork::balance_network_at_design`] presets the balancing valves so
//! that every flow path loses the same pressure at design flow.
//!
//! [`Conduit`]: hn_components::Conduit

pub mod balance;
pub mod error;
pub mod hardy_cross;
pub mod network;
pub mod report;

pub use balance::{BalanceReport, DEFAULT_FULL_OPEN_DROP_PA};
pub use error::{SolverError, SolverResult};
pub use hardy_cross::{
    CorrectionOrder, HardyCrossConfig, IterationReport, SolverState, analyze, analyze_all,
    loop_imbalances,
};
pub use network::{FlowBasis, PathLoss, PipeNetwork, ValvePosition};
pub use report::SystemCurve;
