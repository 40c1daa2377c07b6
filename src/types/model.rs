use std::fmt;

/// Number of tokens in one unit of published pricing.
pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// A model the service can answer with, and what it costs to use.
///
/// Costs are USD per single token.  Published pricing is per million tokens;
/// use [`Model::from_per_million`] to construct from those figures.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    input_cost_per_token: f64,
    output_cost_per_token: f64,
}

impl Model {
    /// Create a new model with per-token costs.
    pub fn new(name: impl Into<String>, input_cost_per_token: f64, output_cost_per_token: f64) -> Self {
        Self {
            name: name.into(),
            input_cost_per_token,
            output_cost_per_token,
        }
    }

    /// Create a new model from per-million-token prices.
    pub fn from_per_million(name: impl Into<String>, input_per_million: f64, output_per_million: f64) -> Self {
        Self::new(
            name,
            input_per_million / TOKENS_PER_MILLION,
            output_per_million / TOKENS_PER_MILLION,
        )
    }

    /// The identifier sent to the service.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// USD per input token.
    pub fn input_cost_per_token(&self) -> f64 {
        self.input_cost_per_token
    }

    /// USD per output token.
    pub fn output_cost_per_token(&self) -> f64 {
        self.output_cost_per_token
    }

    /// USD per million input tokens.
    pub fn input_cost_per_million(&self) -> f64 {
        self.input_cost_per_token * TOKENS_PER_MILLION
    }

    /// USD per million output tokens.
    pub fn output_cost_per_million(&self) -> f64 {
        self.output_cost_per_token * TOKENS_PER_MILLION
    }

    /// Cost of `tokens` input tokens.
    pub fn input_cost(&self, tokens: u64) -> f64 {
        tokens as f64 * self.input_cost_per_token
    }

    /// Cost of `tokens` output tokens.
    pub fn output_cost(&self, tokens: u64) -> f64 {
        tokens as f64 * self.output_cost_per_token
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_million_round_trip() {
        let model = Model::from_per_million("gpt-4o-mini", 0.15, 0.60);
        assert!((model.input_cost_per_token() - 0.000_000_15).abs() < 1e-15);
        assert!((model.input_cost_per_million() - 0.15).abs() < 1e-9);
        assert!((model.output_cost_per_million() - 0.60).abs() < 1e-9);
    }

    #[test]
    fn cost_scales_with_tokens() {
        let model = Model::from_per_million("gpt-4o", 2.50, 10.00);
        assert!((model.input_cost(1_000_000) - 2.50).abs() < 1e-9);
        assert!((model.output_cost(500_000) - 5.00).abs() < 1e-9);
        assert_eq!(model.input_cost(0), 0.0);
    }

    #[test]
    fn display_is_name() {
        let model = Model::new("o3-mini", 0.0, 0.0);
        assert_eq!(model.to_string(), "o3-mini");
    }
}
