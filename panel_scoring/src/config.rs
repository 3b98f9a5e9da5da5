// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The lowest score an expert may submit. A zero is read as "not scored".
pub const MIN_SCORE: f64 = 0.0;
/// The highest score an expert may submit.
pub const MAX_SCORE: f64 = 10.0;

/// A team taking part in the contest.
///
/// The order number is the display order of the teams before any scoring
/// happened. It is also the default key to break ties between equal totals.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub order_number: i64,
}

/// A judge. Each expert submits at most one score per (team, category).
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct Expert {
    pub id: u32,
    pub name: String,
}

/// An additive scoring dimension.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// A single judgment by one expert, for one team, in one category.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Score {
    pub team_id: u32,
    pub expert_id: u32,
    pub category_id: u32,
    pub score: f64,
}

impl Score {
    /// True if the value can be accepted by the engine.
    pub fn is_in_range(&self) -> bool {
        self.score.is_finite() && self.score >= MIN_SCORE && self.score <= MAX_SCORE
    }

    pub(crate) fn key(&self) -> (u32, u32, u32) {
        (self.team_id, self.expert_id, self.category_id)
    }
}

/// A score received by a team, with the names of the expert and the category.
#[derive(PartialEq, Debug, Clone)]
pub struct TeamScore {
    pub team_id: u32,
    pub expert_id: u32,
    pub expert_name: String,
    pub category_id: u32,
    pub category_name: String,
    pub score: f64,
}

// ******** Output data structures *********

/// A raw score, with the expert that submitted it.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ExpertScore {
    pub score: f64,
    pub expert_id: u32,
}

/// The outcome for one team in one category.
#[derive(PartialEq, Debug, Clone)]
pub struct CategoryResult {
    pub id: u32,
    pub name: String,
    /// The raw scores, in the order they were received.
    pub scores: Vec<f64>,
    pub scores_with_experts: Vec<ExpertScore>,
    /// The trimmed average of the scores.
    pub average: f64,
}

/// The outcome for one team.
#[derive(PartialEq, Debug, Clone)]
pub struct TeamResult {
    pub id: u32,
    pub name: String,
    pub order_number: i64,
    pub categories: BTreeMap<u32, CategoryResult>,
    /// The sum of the category averages.
    pub overall_score: f64,
}

/// Errors that prevent the scores from being accepted or aggregated.
#[derive(PartialEq, Debug, Clone)]
pub enum ScoringErrors {
    InvalidScore {
        team_id: u32,
        expert_id: u32,
        category_id: u32,
        score: f64,
    },
    UnknownTeam(u32),
    UnknownExpert(u32),
    UnknownCategory(u32),
    DuplicateTeam(u32),
    DuplicateExpert(u32),
    DuplicateCategory(u32),
    /// The contest needs at least one category at all times.
    LastCategory,
    /// The contest needs at least one expert at all times.
    LastExpert,
    EmptyName,
    /// No identifier is left to assign.
    IdsExhausted,
    StoreUnavailable,
}

impl Error for ScoringErrors {}

impl Display for ScoringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringErrors::InvalidScore {
                team_id,
                expert_id,
                category_id,
                score,
            } => write!(
                f,
                "score {} for team {} by expert {} in category {} must be between {} and {}",
                score, team_id, expert_id, category_id, MIN_SCORE, MAX_SCORE
            ),
            ScoringErrors::UnknownTeam(id) => write!(f, "team {} not found", id),
            ScoringErrors::UnknownExpert(id) => write!(f, "expert {} not found", id),
            ScoringErrors::UnknownCategory(id) => write!(f, "category {} not found", id),
            ScoringErrors::DuplicateTeam(id) => write!(f, "team id {} is declared twice", id),
            ScoringErrors::DuplicateExpert(id) => write!(f, "expert id {} is declared twice", id),
            ScoringErrors::DuplicateCategory(id) => {
                write!(f, "category id {} is declared twice", id)
            }
            ScoringErrors::LastCategory => {
                write!(f, "the contest must keep at least one scoring category")
            }
            ScoringErrors::LastExpert => write!(f, "the contest must keep at least one expert"),
            ScoringErrors::EmptyName => write!(f, "names may not be empty"),
            ScoringErrors::IdsExhausted => write!(f, "no identifier is left to assign"),
            ScoringErrors::StoreUnavailable => write!(f, "the score store is unavailable"),
        }
    }
}

// ********* Configuration **********

/// How to order teams that have exactly the same total.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// Lower order number first, then lower id.
    UseTeamOrder,
    /// A permutation that is hard to guess in advance but fully determined by
    /// the seed. It hashes the seed with the name and id of each tied team.
    Random(u32),
}

/// Whether the engine checks the range of the scores it is given.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ValidationMode {
    /// Fail the whole computation on the first out-of-range score.
    Strict,
    /// The scores were already checked at ingestion.
    Trusted,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoringRules {
    pub tiebreak_mode: TieBreakMode,
    pub validation: ValidationMode,
}

impl ScoringRules {
    pub const DEFAULT_RULES: ScoringRules = ScoringRules {
        tiebreak_mode: TieBreakMode::UseTeamOrder,
        validation: ValidationMode::Strict,
    };
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules::DEFAULT_RULES
    }
}
