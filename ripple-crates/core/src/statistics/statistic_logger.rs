use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;

/// Responsible for logging the statistics with the provided prefix; the prefix is used to group
/// the statistics of one component, e.g. the propagation engine.
#[derive(Debug, Default)]
pub struct StatisticLogger {
    /// The prefix which will be attached to the statistic name
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new(name_prefix: impl Display) -> Self {
        Self {
            name_prefix: name_prefix.to_string(),
        }
    }

    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        Self {
            name_prefix: [self.name_prefix.clone(), addition_to_prefix.to_string()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .join("_"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name_prefix
    }
}

impl std::fmt::Write for StatisticLogger {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        log_statistic(&self.name_prefix, s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StatisticLogger;

    #[test]
    fn prefixes_are_joined_with_underscores() {
        let logger = StatisticLogger::new("engine");

        assert_eq!(logger.attach_to_prefix("numMoves").name(), "engine_numMoves");
        assert_eq!(
            StatisticLogger::default()
                .attach_to_prefix("numMoves")
                .name(),
            "numMoves"
        );
    }
}
