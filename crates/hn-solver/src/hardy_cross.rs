//! Hardy Cross loop-flow correction.
//!
//! Every conduit flow is relative to the positive sense of the conduit's first
//! loop. One iteration computes, for each loop `L`,
//!
//! ```text
//! ΔP_L = Σ s_c · dp(Q_c)        D_L = Σ |2·dp(Q_c) / Q_c|        δQ_L = -ΔP_L / D_L
//! ```
//!
//! and adds `s_c · δQ_L` to every member flow, with `s_c = +1` in the
//! conduit's first loop and `-1` in its second. Because every loop is closed,
//! a correction adds as much flow to a node as it removes, so node balances
//! are never disturbed.

use std::collections::BTreeMap;

use hn_components::common::EPSILON_FLOW;
use hn_components::{ComponentResult, Conduit};
use hn_core::units::{Pressure, m3ps, pa};
use hn_fluids::PropertyPack;
use hn_graph::{Graph, Loop};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{SolverError, SolverResult};
use crate::network::PipeNetwork;

/// How the loop corrections of one iteration are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionOrder {
    /// All corrections from the flows at the start of the iteration, then
    /// applied together.
    #[default]
    Simultaneous,
    /// Each loop sees the corrections of the loops before it.
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardyCrossConfig {
    /// Converged when every loop's pressure imbalance is at most this.
    pub tolerance: Pressure,
    pub max_iterations: usize,
    pub order: CorrectionOrder,
}

impl Default for HardyCrossConfig {
    fn default() -> Self {
        Self {
            tolerance: pa(1.0),
            max_iterations: 500,
            order: CorrectionOrder::Simultaneous,
        }
    }
}

/// Solver lifecycle, reported through `tracing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Initialized,
    Iterating { iteration: usize },
    Converged { iterations: usize },
    Diverged { iterations: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub iterations: usize,
    pub converged: bool,
    /// Pressure imbalance of every loop after the last iteration, by loop name.
    pub final_loop_imbalances: BTreeMap<String, Pressure>,
}

impl IterationReport {
    pub fn max_imbalance(&self) -> Pressure {
        pa(self
            .final_loop_imbalances
            .values()
            .map(|p| p.value.abs())
            .fold(0.0, f64::max))
    }
}

/// Run Hardy Cross on `network` until every loop balances.
///
/// The flows reached so far are written back to the network whether or not
/// the iteration converged.
pub fn analyze(
    network: &mut PipeNetwork,
    config: &HardyCrossConfig,
) -> SolverResult<IterationReport> {
    let props = network.properties()?;
    let mut flows: Vec<f64> = network.conduits().iter().map(|c| c.flow_rate.value).collect();

    let result = iterate(network.graph(), network.conduits(), &props, config, &mut flows);
    network.store_flows(&flows);
    result
}

/// Analyze independent networks on the rayon thread pool.
pub fn analyze_all(
    networks: &mut [PipeNetwork],
    config: &HardyCrossConfig,
) -> Vec<SolverResult<IterationReport>> {
    networks
        .par_iter_mut()
        .map(|network| analyze(network, config))
        .collect()
}

/// Pressure imbalance of every loop at the current flows, by loop name.
pub fn loop_imbalances(network: &PipeNetwork) -> SolverResult<BTreeMap<String, Pressure>> {
    let props = network.properties()?;
    let flows: Vec<f64> = network.conduits().iter().map(|c| c.flow_rate.value).collect();
    let kernel = Kernel {
        graph: network.graph(),
        conduits: network.conduits(),
        props: &props,
    };
    let values = kernel.imbalances(&flows)?;
    Ok(kernel.named(&values))
}

fn iterate(
    graph: &Graph,
    conduits: &[Conduit],
    props: &PropertyPack,
    config: &HardyCrossConfig,
    flows: &mut [f64],
) -> SolverResult<IterationReport> {
    let kernel = Kernel {
        graph,
        conduits,
        props,
    };
    let tolerance = config.tolerance.value;

    let mut state = SolverState::Initialized;
    debug!(?state, loops = graph.loops().len(), "Hardy Cross");

    let mut imbalances = kernel.imbalances(flows)?;
    let mut iteration = 0;
    loop {
        let worst = max_abs(&imbalances);
        if worst <= tolerance {
            state = SolverState::Converged {
                iterations: iteration,
            };
            info!(?state, max_imbalance_pa = worst, "Hardy Cross converged");
            return Ok(IterationReport {
                iterations: iteration,
                converged: true,
                final_loop_imbalances: kernel.named(&imbalances),
            });
        }
        if iteration >= config.max_iterations {
            state = SolverState::Diverged {
                iterations: iteration,
            };
            warn!(?state, max_imbalance_pa = worst, "Hardy Cross stopped");
            return Err(SolverError::MaxIterationsExceeded {
                iterations: iteration,
                imbalances: kernel.named(&imbalances),
            });
        }

        iteration += 1;
        state = SolverState::Iterating { iteration };
        match config.order {
            CorrectionOrder::Simultaneous => {
                let mut corrections = Vec::with_capacity(graph.loops().len());
                for lp in graph.loops() {
                    corrections.push(kernel.correction(lp, flows)?);
                }
                for (lp, dq) in graph.loops().iter().zip(corrections) {
                    if let Some(dq) = dq {
                        apply(lp, dq, flows);
                    }
                }
            }
            CorrectionOrder::Sequential => {
                for lp in graph.loops() {
                    if let Some(dq) = kernel.correction(lp, flows)? {
                        apply(lp, dq, flows);
                    }
                }
            }
        }
        imbalances = kernel.imbalances(flows)?;
        debug!(?state, max_imbalance_pa = max_abs(&imbalances));
    }
}

fn apply(lp: &Loop, dq: f64, flows: &mut [f64]) {
    for member in &lp.members {
        flows[member.conduit.slot()] += member.sign * dq;
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().map(|v| v.abs()).fold(0.0, f64::max)
}

struct Kernel<'a> {
    graph: &'a Graph,
    conduits: &'a [Conduit],
    props: &'a PropertyPack,
}

impl Kernel<'_> {
    /// Conduit drop in its first-loop frame.
    fn relative_drop(&self, slot: usize, q: f64) -> ComponentResult<f64> {
        let conduit = &self.conduits[slot];
        match conduit.fixed_pressure_drop() {
            Some(fixed) => Ok(self.graph.conduits()[slot].sense.factor() * fixed.value),
            None => Ok(conduit.pressure_drop(self.props, m3ps(q))?.value),
        }
    }

    /// Loop imbalance `ΔP_L` and derivative sum `D_L`.
    fn loop_terms(&self, lp: &Loop, flows: &[f64]) -> ComponentResult<(f64, f64)> {
        let mut imbalance = 0.0;
        let mut derivative = 0.0;
        for member in &lp.members {
            let slot = member.conduit.slot();
            let q = flows[slot];
            let dp = self.relative_drop(slot, q)?;
            imbalance += member.sign * dp;
            if !self.conduits[slot].is_pseudo() && q.abs() > EPSILON_FLOW {
                derivative += (2.0 * dp / q).abs();
            }
        }
        Ok((imbalance, derivative))
    }

    /// `δQ_L`, or `None` for a loop without any flowing pipe.
    fn correction(&self, lp: &Loop, flows: &[f64]) -> ComponentResult<Option<f64>> {
        let (imbalance, derivative) = self.loop_terms(lp, flows)?;
        if derivative == 0.0 || !derivative.is_finite() {
            warn!(loop_name = %lp.name, "degenerate loop skipped");
            return Ok(None);
        }
        Ok(Some(-imbalance / derivative))
    }

    fn imbalances(&self, flows: &[f64]) -> ComponentResult<Vec<f64>> {
        self.graph
            .loops()
            .iter()
            .map(|lp| Ok(self.loop_terms(lp, flows)?.0))
            .collect()
    }

    fn named(&self, values: &[f64]) -> BTreeMap<String, Pressure> {
        self.graph
            .loops()
            .iter()
            .zip(values)
            .map(|(lp, &v)| (lp.name.clone(), pa(v)))
            .collect()
    }
}

impl PipeNetwork {
    /// Hardy Cross with the given tolerance and iteration budget, applying
    /// loop corrections simultaneously.
    pub fn analyze(
        &mut self,
        tolerance: Pressure,
        max_iterations: usize,
    ) -> SolverResult<IterationReport> {
        let config = HardyCrossConfig {
            tolerance,
            max_iterations,
            ..HardyCrossConfig::default()
        };
        analyze(self, &config)
    }
}
