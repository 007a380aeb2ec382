#[cfg(doc)]
use crate::Solver;

/// The direction in which a probe evaluates a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PropagationMode {
    /// Changes are pushed from the modified search variables through every affected invariant.
    #[default]
    InputToOutput,
    /// Only the queried variables are computed by pulling values from their inputs. A commit is
    /// always performed input-to-output.
    OutputToInput,
}

/// Determines which variables output-to-input propagation skips because they cannot have been
/// affected by the modified search variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputToInputMarkingMode {
    /// Every input is explored.
    #[default]
    None,
    /// The search variables every variable depends on are computed when the model is closed.
    OutputToInputStatic,
    /// Before each probe, the variables reachable from the modified search variables are marked.
    InputToOutputExploration,
}

/// Options for the [`Solver`] which determine how it behaves.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// The propagation mode used by [`Solver::end_probe`].
    pub propagation_mode: PropagationMode,
    /// The marking strategy used in [`PropagationMode::OutputToInput`].
    pub marking_mode: OutputToInputMarkingMode,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            propagation_mode: PropagationMode::InputToOutput,
            marking_mode: OutputToInputMarkingMode::None,
        }
    }
}
