//! Goal candidate sampling.
//!
//! A goal candidate is a pair of configurations: the gripper at the approach
//! distance from the target (pre-grasp) and the gripper holding the target
//! (grasp). Candidates are found by rejection sampling:
//!
//! 1. draw a random configuration,
//! 2. project it onto the pre-grasp state, anchored at the reference,
//! 3. project the result onto the grasp state, anchored at itself,
//! 4. keep the pair if the straight line between them is collision-free.

use tracing::{debug, info};

use motion_types::{GoalCandidate, PlanningConfiguration, SamplerConfig};

use crate::planner::{ConfigurationSampler, PlanOutcome, PlannerSession, SymbolicState};

/// Acceptance statistics of one sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplingStats {
    /// Random draws made.
    pub attempts: usize,
    /// Draws rejected by the pre-grasp projection.
    pub pre_grasp_rejected: usize,
    /// Draws rejected by the grasp projection.
    pub grasp_rejected: usize,
    /// Draws rejected by the connection check.
    pub connection_rejected: usize,
    /// Candidates kept.
    pub accepted: usize,
}

/// Rejection sampler of goal candidates.
///
/// Stops after [`SamplerConfig::max_attempts`] draws, or earlier once
/// [`SamplerConfig::accept_target`] candidates are kept. Candidates are
/// returned in draw order.
///
/// # Example
///
/// ```ignore
/// let sampler = GoalSampler::new(SamplerConfig::new().with_max_attempts(50));
/// let candidates = sampler.sample(&mut session, &mut shooter, &q_init);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalSampler {
    config: SamplerConfig,
}

impl GoalSampler {
    /// Creates a sampler.
    #[must_use]
    pub const fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Samples goal candidates around `reference`.
    ///
    /// An empty result is a valid outcome. The connection paths created by
    /// the checks are released immediately.
    pub fn sample<P, C>(
        &self,
        session: &mut P,
        shooter: &mut C,
        reference: &PlanningConfiguration,
    ) -> Vec<GoalCandidate>
    where
        P: PlannerSession + ?Sized,
        C: ConfigurationSampler + ?Sized,
    {
        self.sample_with_stats(session, shooter, reference).0
    }

    /// [`GoalSampler::sample`], also returning acceptance statistics.
    pub fn sample_with_stats<P, C>(
        &self,
        session: &mut P,
        shooter: &mut C,
        reference: &PlanningConfiguration,
    ) -> (Vec<GoalCandidate>, SamplingStats)
    where
        P: PlannerSession + ?Sized,
        C: ConfigurationSampler + ?Sized,
    {
        let mut candidates = Vec::new();
        let mut stats = SamplingStats::default();

        while stats.attempts < self.config.max_attempts()
            && candidates.len() < self.config.accept_target()
        {
            stats.attempts += 1;
            let random = shooter.sample();

            let pre_grasp =
                match session.project_onto_node(SymbolicState::PreGrasp, reference, &random) {
                    PlanOutcome::Success(q) => q,
                    PlanOutcome::Failure { reason } => {
                        debug!(attempt = stats.attempts, %reason, "Pre-grasp projection failed");
                        stats.pre_grasp_rejected += 1;
                        continue;
                    }
                };

            let grasp = match session.project_onto_node(SymbolicState::Grasp, &pre_grasp, &pre_grasp)
            {
                PlanOutcome::Success(q) => q,
                PlanOutcome::Failure { reason } => {
                    debug!(attempt = stats.attempts, %reason, "Grasp projection failed");
                    stats.grasp_rejected += 1;
                    continue;
                }
            };

            match session.check_direct_connection(&pre_grasp, &grasp) {
                PlanOutcome::Success(path) => {
                    session.release_path(path);
                    candidates.push(GoalCandidate::new(pre_grasp, grasp));
                }
                PlanOutcome::Failure { reason } => {
                    debug!(attempt = stats.attempts, %reason, "Approach connection rejected");
                    stats.connection_rejected += 1;
                }
            }
        }

        stats.accepted = candidates.len();
        info!(
            attempts = stats.attempts,
            accepted = stats.accepted,
            pre_grasp_rejected = stats.pre_grasp_rejected,
            grasp_rejected = stats.grasp_rejected,
            connection_rejected = stats.connection_rejected,
            "Sampled goal candidates"
        );
        (candidates, stats)
    }
}
