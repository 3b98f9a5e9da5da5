mod config;
pub mod manual;
pub mod store;

use log::{debug, info, warn};

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap, HashSet},
    ops::{Add, AddAssign},
};

pub use crate::config::*;

// **** Private structures ****

// The grouping key of the raw scores.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CellKey {
    team_id: u32,
    category_id: u32,
}

#[derive(PartialEq, Debug, Clone, Copy, PartialOrd)]
struct Points(f64);

impl Points {
    const ZERO: Points = Points(0.0);
}

impl std::iter::Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Points(iter.map(|p| p.0).sum())
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl Add for Points {
    type Output = Points;
    fn add(self: Points, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

/// The average of a set of scores, after removing the outliers.
///
/// Zeros are "not scored" and are dropped first. If at least three scores
/// remain, exactly one lowest and one highest score are dropped. The result
/// is the mean of what is left, or zero if nothing is left.
///
/// ```
/// use panel_scoring::trimmed_average;
///
/// assert_eq!(trimmed_average(&[0.0, 4.0, 6.0, 8.0]), 6.0);
/// assert_eq!(trimmed_average(&[4.0, 6.0]), 5.0);
/// ```
pub fn trimmed_average(scores: &[f64]) -> f64 {
    let mut kept: Vec<f64> = scores.iter().cloned().filter(|s| *s != 0.0).collect();
    kept.sort_by(|a, b| a.total_cmp(b));
    match kept.as_slice() {
        [] => 0.0,
        [single] => *single,
        [_, _] => mean(&kept),
        [_, middle @ .., _] => mean(middle),
    }
}

fn mean(values: &[f64]) -> f64 {
    let total: Points = values.iter().map(|v| Points(*v)).sum();
    total.0 / values.len() as f64
}

/// Computes the results of all the teams, best team first.
///
/// Arguments:
/// * `teams` the teams to rank. Every team appears in the output, even without scores.
/// * `categories` the scoring categories. The total of a team is the sum of its
/// category averages.
/// * `scores` the raw scores. Scores for teams or categories that are not listed are ignored.
/// * `rules` the tiebreak and validation rules
///
/// Nothing is returned if one score is rejected: the results always cover all the teams.
pub fn compute_results(
    teams: &[Team],
    categories: &[Category],
    scores: &[Score],
    rules: &ScoringRules,
) -> Result<Vec<TeamResult>, ScoringErrors> {
    info!(
        "Processing {:?} scores, {:?} teams, {:?} categories, rules: {:?}",
        scores.len(),
        teams.len(),
        categories.len(),
        rules
    );

    if teams.is_empty() || categories.is_empty() {
        debug!("compute_results: no team or no category, nothing to rank");
        return Ok(Vec::new());
    }

    let cells = checks(teams, categories, scores, rules)?;

    // Teams are processed in display order.
    let mut ordered_teams: Vec<&Team> = teams.iter().collect();
    ordered_teams.sort_by_key(|t| (t.order_number, t.id));

    let mut results: Vec<TeamResult> = Vec::with_capacity(teams.len());
    for team in ordered_teams {
        let mut category_results: BTreeMap<u32, CategoryResult> = BTreeMap::new();
        let mut total = Points::ZERO;
        for category in categories.iter() {
            let key = CellKey {
                team_id: team.id,
                category_id: category.id,
            };
            let scores_with_experts: Vec<ExpertScore> =
                cells.get(&key).cloned().unwrap_or_default();
            let raw: Vec<f64> = scores_with_experts.iter().map(|es| es.score).collect();
            let average = trimmed_average(&raw);
            debug!(
                "compute_results: team {:?} category {:?} scores {:?} -> {:?}",
                team.id, category.id, raw, average
            );
            total += Points(average);
            category_results.insert(
                category.id,
                CategoryResult {
                    id: category.id,
                    name: category.name.clone(),
                    scores: raw,
                    scores_with_experts,
                    average,
                },
            );
        }
        results.push(TeamResult {
            id: team.id,
            name: team.name.clone(),
            order_number: team.order_number,
            categories: category_results,
            overall_score: total.0,
        });
    }

    sort_results(&mut results, rules.tiebreak_mode);

    for (rank, tr) in rank_positions(&results).iter().zip(results.iter()) {
        info!("{:>4} {:>10.3} {}", rank, tr.overall_score, tr.name);
    }
    Ok(results)
}

/// The position of each team in a list sorted by `compute_results`.
///
/// Teams with the same total share a position, and the following position is
/// skipped: four teams where the middle two are tied get `1, 2, 2, 4`.
pub fn rank_positions(results: &[TeamResult]) -> Vec<u32> {
    let mut positions: Vec<u32> = Vec::with_capacity(results.len());
    let mut previous: Option<f64> = None;
    let mut current: u32 = 0;
    for (idx, tr) in results.iter().enumerate() {
        if previous != Some(tr.overall_score) {
            current = (idx + 1) as u32;
        }
        previous = Some(tr.overall_score);
        positions.push(current);
    }
    positions
}

fn sort_results(results: &mut [TeamResult], tiebreak: TieBreakMode) {
    match tiebreak {
        TieBreakMode::UseTeamOrder => {
            results.sort_by(|a, b| {
                compare_totals(a, b)
                    .then(a.order_number.cmp(&b.order_number))
                    .then(a.id.cmp(&b.id))
            });
        }
        TieBreakMode::Random(seed) => {
            let keys: HashMap<u32, String> = results
                .iter()
                .map(|tr| (tr.id, team_permutation_key(seed, tr.id, &tr.name)))
                .collect();
            results.sort_by(|a, b| {
                compare_totals(a, b)
                    .then_with(|| keys.get(&a.id).cmp(&keys.get(&b.id)))
                    .then(a.id.cmp(&b.id))
            });
        }
    }
}

// Higher totals first.
fn compare_totals(a: &TeamResult, b: &TeamResult) -> Ordering {
    b.overall_score.total_cmp(&a.overall_score)
}

/// A key that is hard to guess in advance. It uses a cryptographic hash so
/// that renaming a team does not move it to a predictable position.
fn team_permutation_key(seed: u32, team_id: u32, name: &str) -> String {
    let data = format!("{:08}{:08}{}", seed, team_id, name);
    sha256::digest(data.as_str())
}

// Groups the scores by (team, category), keeping the order of submission.
fn checks(
    teams: &[Team],
    categories: &[Category],
    scores: &[Score],
    rules: &ScoringRules,
) -> Result<HashMap<CellKey, Vec<ExpertScore>>, ScoringErrors> {
    debug!("checks: scores size: {:?}", scores.len());

    let mut team_ids: HashSet<u32> = HashSet::new();
    for t in teams.iter() {
        if !team_ids.insert(t.id) {
            return Err(ScoringErrors::DuplicateTeam(t.id));
        }
    }
    let mut category_ids: HashSet<u32> = HashSet::new();
    for c in categories.iter() {
        if !category_ids.insert(c.id) {
            return Err(ScoringErrors::DuplicateCategory(c.id));
        }
    }

    let mut cells: HashMap<CellKey, Vec<ExpertScore>> = HashMap::new();
    // Position of each (team, expert, category) in its cell.
    let mut positions: HashMap<(u32, u32, u32), usize> = HashMap::new();

    for s in scores.iter() {
        if rules.validation == ValidationMode::Strict && !s.is_in_range() {
            return Err(ScoringErrors::InvalidScore {
                team_id: s.team_id,
                expert_id: s.expert_id,
                category_id: s.category_id,
                score: s.score,
            });
        }
        if !team_ids.contains(&s.team_id) || !category_ids.contains(&s.category_id) {
            debug!("checks: ignoring score for a team or category not in the contest: {:?}", s);
            continue;
        }

        let key = CellKey {
            team_id: s.team_id,
            category_id: s.category_id,
        };
        let cell = cells.entry(key).or_default();
        let es = ExpertScore {
            score: s.score,
            expert_id: s.expert_id,
        };
        if let Some(&pos) = positions.get(&s.key()) {
            // A later submission replaces the earlier one in place.
            warn!(
                "checks: expert {} scored team {} in category {} twice, keeping the last score {}",
                s.expert_id, s.team_id, s.category_id, s.score
            );
            cell[pos] = es;
        } else {
            positions.insert(s.key(), cell.len());
            cell.push(es);
        }
    }

    debug!("checks: {:?} scored cells", cells.len());
    Ok(cells)
}
