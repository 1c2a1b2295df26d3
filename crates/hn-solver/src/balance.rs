//! Valve sizing and static balancing at the design point.
//!
//! Every flow path from the start node to the end node must lose the same
//! pressure at design flow. The path with the largest loss with every
//! balancing valve fully open is the critical path; its valves stay fully
//! open and its loss is the reference. Every other path is throttled up to
//! the reference with one balancing valve that is not on the critical path,
//! preferring the valve that serves the fewest paths.

use std::collections::BTreeMap;

use hn_components::valve::{kv_for_pressure_drop, valve_pressure_drop};
use hn_components::{BalancingValve, ControlValve};
use hn_core::ConduitId;
use hn_core::units::{Pressure, pa};
use tracing::{debug, info};

use crate::error::{SolverError, SolverResult};
use crate::network::{FlowBasis, PipeNetwork};

/// Customary pressure drop across a fully open balancing valve [Pa].
pub const DEFAULT_FULL_OPEN_DROP_PA: f64 = 3000.0;

/// Path deficits smaller than this need no valve [Pa].
const BALANCE_TOL_PA: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReport {
    /// Conduit names of the critical path joined by `-`.
    pub critical_path: String,
    /// Loss every path has after balancing.
    pub reference_loss: Pressure,
    /// `Kvr` of every balancing valve on a flow path, by conduit name.
    pub settings: BTreeMap<String, f64>,
}

impl PipeNetwork {
    /// Size a balancing valve for `full_open_drop` at the conduit's design
    /// flow and attach it. Returns the preliminary `Kvs`.
    pub fn add_balancing_valve(
        &mut self,
        conduit: &str,
        full_open_drop: Pressure,
    ) -> SolverResult<f64> {
        let props = self.properties()?;
        let design = self.conduit_by_name(conduit)?.design_flow_rate;
        let kvs = kv_for_pressure_drop(design, full_open_drop, props.rho)?;
        self.conduit_mut(conduit)?
            .attach_balancing_valve(BalancingValve::new(kvs)?)?;
        debug!(conduit, kvs, "balancing valve attached");
        Ok(kvs)
    }

    /// Size a control valve for `target_authority` against the critical path
    /// loss at design flow and attach it. Returns the preliminary `Kvs`.
    ///
    /// The valve drop is `a/(1-a)·ΔP_crit`, so that with the valve added the
    /// valve takes the share `a` of the circuit loss.
    pub fn add_control_valve(
        &mut self,
        conduit: &str,
        target_authority: f64,
    ) -> SolverResult<f64> {
        let a = target_authority;
        if a.is_nan() || a <= 0.0 || a >= 1.0 {
            return Err(SolverError::InvalidTargetAuthority {
                authority: a,
                what: "authority must lie strictly between 0 and 1",
            });
        }
        let design = self.conduit_by_name(conduit)?.design_flow_rate;
        let reference = self
            .critical_path(FlowBasis::Design)?
            .map_or(0.0, |(_, loss)| loss.value);
        if reference <= 0.0 {
            return Err(SolverError::InvalidTargetAuthority {
                authority: a,
                what: "critical path has no pressure loss at design flow",
            });
        }

        let props = self.properties()?;
        let valve_drop = pa(a / (1.0 - a) * reference);
        let kvs = kv_for_pressure_drop(design, valve_drop, props.rho)?;
        self.conduit_mut(conduit)?
            .attach_control_valve(ControlValve::new(kvs)?)?;
        debug!(
            conduit,
            kvs,
            valve_drop_pa = valve_drop.value,
            "control valve attached"
        );
        Ok(kvs)
    }

    /// Preset every balancing valve so that all flow paths lose the same
    /// pressure at design flow.
    ///
    /// Nothing is changed when balancing fails.
    pub fn balance_network_at_design(&mut self) -> SolverResult<BalanceReport> {
        let props = self.properties()?;
        let paths = self.flow_paths();
        if paths.is_empty() {
            return Err(SolverError::ProblemSetup {
                what: "no flow path between the start node and the end node".into(),
            });
        }

        let mut losses = Vec::with_capacity(paths.len());
        for path in &paths {
            losses.push(self.path_loss(path, FlowBasis::Design, &props)?);
        }
        // same selection as `heaviest_path(Design, FullyOpen)`
        let mut critical_idx = 0;
        for (i, loss) in losses.iter().enumerate() {
            if loss.full_open_total() > losses[critical_idx].full_open_total() {
                critical_idx = i;
            }
        }
        let critical = &paths[critical_idx];

        let mut paths_served: BTreeMap<ConduitId, usize> = BTreeMap::new();
        for path in &paths {
            for &id in &path.conduits {
                if self.conduit(id).balancing_valve().is_some() {
                    *paths_served.entry(id).or_default() += 1;
                }
            }
        }

        let valve_drop = |id: ConduitId, kv: f64| {
            let q = self.conduit(id).design_flow_rate;
            valve_pressure_drop(q, kv, props.rho).value
        };

        let mut settings: BTreeMap<ConduitId, f64> = BTreeMap::new();
        let reference = losses[critical_idx].full_open_total().value;
        for &id in &critical.conduits {
            if let Some(valve) = self.conduit(id).balancing_valve() {
                settings.insert(id, valve.kvs());
            }
        }

        for (path, loss) in paths.iter().zip(&losses) {
            if path == critical {
                continue;
            }
            let label = path.label(self.graph());
            let mut fixed = loss.without_balancing.value;
            let mut open: Vec<ConduitId> = Vec::new();
            let mut preset_own = false;
            for &id in &path.conduits {
                if self.conduit(id).balancing_valve().is_none() {
                    continue;
                }
                if let Some(&kv) = settings.get(&id) {
                    fixed += valve_drop(id, kv);
                    preset_own |= !critical.contains(id);
                } else {
                    open.push(id);
                }
            }
            let free = open
                .iter()
                .copied()
                .min_by_key(|id| paths_served.get(id).copied().unwrap_or(0));
            for &id in &open {
                if Some(id) == free {
                    continue;
                }
                // further valves on the path stay fully open
                let kvs = self.conduit(id).balancing_valve().map_or(0.0, |v| v.kvs());
                settings.insert(id, kvs);
                fixed += valve_drop(id, kvs);
            }

            let required = reference - fixed;
            let Some(id) = free else {
                if required.abs() > BALANCE_TOL_PA {
                    let what = if preset_own {
                        format!(
                            "a balancing valve on path {label} is shared with another path \
                             and would need two settings ({required:.1} Pa off)"
                        )
                    } else {
                        format!(
                            "path {label} lacks {required:.1} Pa and has no balancing valve \
                             of its own"
                        )
                    };
                    return Err(SolverError::InfeasibleBalancing { what });
                }
                continue;
            };

            let name = self.graph().conduit_name(id).to_string();
            let kvs = self
                .conduit(id)
                .balancing_valve()
                .map_or(0.0, |v| v.kvs());
            if required <= 0.0 {
                return Err(SolverError::InfeasibleBalancing {
                    what: format!(
                        "path {label} already loses more than the critical path; \
                         valve {name} cannot open beyond Kvs {kvs:.3}"
                    ),
                });
            }
            let design = self.conduit(id).design_flow_rate;
            let kvr = kv_for_pressure_drop(design, pa(required), props.rho)?;
            if kvr > kvs * (1.0 + 1e-9) {
                return Err(SolverError::InfeasibleBalancing {
                    what: format!(
                        "valve {name} on path {label} needs Kvr {kvr:.3} > Kvs {kvs:.3}"
                    ),
                });
            }
            debug!(path = %label, valve = %name, required_pa = required, kvr, "path balanced");
            settings.insert(id, kvr.min(kvs));
        }

        for (&id, &kvr) in &settings {
            self.conduit_at_mut(id).set_balancing_valve_kvr(kvr)?;
        }

        let critical_path = critical.label(self.graph());
        info!(critical_path = %critical_path, reference_pa = reference, "network balanced");
        Ok(BalanceReport {
            critical_path,
            reference_loss: pa(reference),
            settings: settings
                .into_iter()
                .map(|(id, kvr)| (self.graph().conduit_name(id).to_string(), kvr))
                .collect(),
        })
    }
}
