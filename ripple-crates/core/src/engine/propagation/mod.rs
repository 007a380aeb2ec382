//! The data structures which drive propagation: the invariant graph, its layered topology and the
//! two propagation strategies built on top of it.
mod arcs;
mod commit_tracker;
mod invariant_runner;
mod marking;
mod output_to_input_explorer;
mod propagation_graph;
mod propagation_queue;
mod topology;

pub(crate) use arcs::OutgoingArc;
pub(crate) use commit_tracker::CommitTracker;
pub(crate) use invariant_runner::InvariantRunner;
pub(crate) use output_to_input_explorer::OutputToInputExplorer;
pub(crate) use propagation_graph::PropagationGraph;
pub(crate) use propagation_queue::PropagationQueue;
pub(crate) use topology::Topology;
