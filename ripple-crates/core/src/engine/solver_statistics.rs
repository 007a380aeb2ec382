use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of the propagation engine.
    pub SolverStatistics {
        /// The number of moves which were started
        num_moves: u64,
        /// The number of probes which were evaluated
        num_probes: u64,
        /// The number of moves which were committed
        num_commits: u64,
        /// The number of probes and commits which failed due to a dynamic cycle
        num_topological_order_errors: u64,
        /// The number of times an invariant was notified of a changed input
        num_notifications: u64,
        /// The number of times an invariant recomputed its outputs from scratch
        num_recomputations: u64,
        /// The number of variables taken off the propagation queue
        num_dequeued_vars: u64,
        /// The number of times a layer containing a dynamic cycle was ordered
        num_layer_orderings: u64,
        /// The number of invariants expanded during output-to-input propagation
        num_invariant_expansions: u64,
});
