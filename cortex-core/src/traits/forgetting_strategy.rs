use chrono::Duration;

/// Which memories `RelevanceForgettingEngine::perform_forgetting` targets.
/// A tagged variant rather than a trait object: there is a small, closed
/// set of strategies and each carries different data.
#[derive(Debug, Clone, PartialEq)]
pub enum ForgettingStrategy {
    Age { max_age: Duration },
    LeastUsed { retain_count: usize },
    LowScore { threshold: f64 },
    Explicit { ids: Vec<String> },
}

impl ForgettingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ForgettingStrategy::Age { .. } => "age",
            ForgettingStrategy::LeastUsed { .. } => "least_used",
            ForgettingStrategy::LowScore { .. } => "low_score",
            ForgettingStrategy::Explicit { .. } => "explicit",
        }
    }
}
