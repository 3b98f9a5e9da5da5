use crate::config::*;

use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::compute_results;

/// An in-memory store for the contest: teams, experts, categories and one
/// score per (team, expert, category).
///
/// Submitting a score for a triple that was already scored replaces the
/// previous value.
///
/// ```
/// use panel_scoring::store::ScoreStore;
/// use panel_scoring::{Score, ScoringRules};
/// # use panel_scoring::ScoringErrors;
///
/// let mut store = ScoreStore::new(&ScoringRules::DEFAULT_RULES);
/// let anna = store.add_team("Anna's team", 1)?;
/// let judge = store.add_expert("Judge 1")?;
/// let design = store.add_category("Design")?;
///
/// store.submit_score(&Score { team_id: anna.id, expert_id: judge.id, category_id: design.id, score: 4.0 })?;
/// store.submit_score(&Score { team_id: anna.id, expert_id: judge.id, category_id: design.id, score: 7.0 })?;
///
/// let results = store.snapshot().results()?;
/// assert_eq!(results[0].overall_score, 7.0);
/// # Ok::<(), ScoringErrors>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScoreStore {
    rules: ScoringRules,
    teams: BTreeMap<u32, Team>,
    experts: BTreeMap<u32, Expert>,
    categories: BTreeMap<u32, Category>,
    // The sequence number records the first submission for a key.
    scores: BTreeMap<(u32, u32, u32), (u64, f64)>,
    next_seq: u64,
    // The highest id ever used. Ids of removed entries are not reused.
    last_team_id: u32,
    last_expert_id: u32,
    last_category_id: u32,
}

/// A consistent copy of the contents of a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSnapshot {
    pub teams: Vec<Team>,
    pub categories: Vec<Category>,
    pub scores: Vec<Score>,
    pub rules: ScoringRules,
}

impl ScoreSnapshot {
    pub fn results(&self) -> Result<Vec<TeamResult>, ScoringErrors> {
        compute_results(&self.teams, &self.categories, &self.scores, &self.rules)
    }
}

fn check_name(name: &str) -> Result<String, ScoringErrors> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ScoringErrors::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

fn next_id(last_id: &mut u32) -> Result<u32, ScoringErrors> {
    let id = last_id.checked_add(1).ok_or(ScoringErrors::IdsExhausted)?;
    *last_id = id;
    Ok(id)
}

impl ScoreStore {
    pub fn new(rules: &ScoringRules) -> ScoreStore {
        ScoreStore {
            rules: rules.clone(),
            teams: BTreeMap::new(),
            experts: BTreeMap::new(),
            categories: BTreeMap::new(),
            scores: BTreeMap::new(),
            next_seq: 0,
            last_team_id: 0,
            last_expert_id: 0,
            last_category_id: 0,
        }
    }

    /// Registers teams with known ids.
    pub fn teams(mut self, teams: &[Team]) -> Result<ScoreStore, ScoringErrors> {
        for t in teams {
            if self.teams.insert(t.id, t.clone()).is_some() {
                return Err(ScoringErrors::DuplicateTeam(t.id));
            }
            self.last_team_id = self.last_team_id.max(t.id);
        }
        Ok(self)
    }

    /// Registers experts with known ids.
    pub fn experts(mut self, experts: &[Expert]) -> Result<ScoreStore, ScoringErrors> {
        for e in experts {
            if self.experts.insert(e.id, e.clone()).is_some() {
                return Err(ScoringErrors::DuplicateExpert(e.id));
            }
            self.last_expert_id = self.last_expert_id.max(e.id);
        }
        Ok(self)
    }

    /// Registers categories with known ids.
    pub fn categories(mut self, categories: &[Category]) -> Result<ScoreStore, ScoringErrors> {
        for c in categories {
            if self.categories.insert(c.id, c.clone()).is_some() {
                return Err(ScoringErrors::DuplicateCategory(c.id));
            }
            self.last_category_id = self.last_category_id.max(c.id);
        }
        Ok(self)
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    // ******** Teams ********

    pub fn add_team(&mut self, name: &str, order_number: i64) -> Result<Team, ScoringErrors> {
        let team = Team {
            name: check_name(name)?,
            id: next_id(&mut self.last_team_id)?,
            order_number,
        };
        debug!("add_team: {:?}", team);
        self.teams.insert(team.id, team.clone());
        Ok(team)
    }

    /// Removes a team and all the scores it received.
    pub fn remove_team(&mut self, team_id: u32) -> Result<Team, ScoringErrors> {
        let team = self
            .teams
            .remove(&team_id)
            .ok_or(ScoringErrors::UnknownTeam(team_id))?;
        self.scores.retain(|(tid, _, _), _| *tid != team_id);
        info!("remove_team: removed team {} ({})", team.id, team.name);
        Ok(team)
    }

    /// The teams in display order.
    pub fn list_teams(&self) -> Vec<Team> {
        let mut res: Vec<Team> = self.teams.values().cloned().collect();
        res.sort_by_key(|t| (t.order_number, t.id));
        res
    }

    // ******** Experts ********

    pub fn add_expert(&mut self, name: &str) -> Result<Expert, ScoringErrors> {
        let expert = Expert {
            name: check_name(name)?,
            id: next_id(&mut self.last_expert_id)?,
        };
        debug!("add_expert: {:?}", expert);
        self.experts.insert(expert.id, expert.clone());
        Ok(expert)
    }

    pub fn rename_expert(&mut self, expert_id: u32, name: &str) -> Result<Expert, ScoringErrors> {
        let name = check_name(name)?;
        let expert = self
            .experts
            .get_mut(&expert_id)
            .ok_or(ScoringErrors::UnknownExpert(expert_id))?;
        expert.name = name;
        Ok(expert.clone())
    }

    /// Removes an expert and all the scores they submitted.
    /// The last expert cannot be removed.
    pub fn remove_expert(&mut self, expert_id: u32) -> Result<Expert, ScoringErrors> {
        if !self.experts.contains_key(&expert_id) {
            return Err(ScoringErrors::UnknownExpert(expert_id));
        }
        if self.experts.len() <= 1 {
            return Err(ScoringErrors::LastExpert);
        }
        self.scores.retain(|(_, eid, _), _| *eid != expert_id);
        let expert = self
            .experts
            .remove(&expert_id)
            .ok_or(ScoringErrors::UnknownExpert(expert_id))?;
        info!("remove_expert: removed expert {} ({})", expert.id, expert.name);
        Ok(expert)
    }

    pub fn list_experts(&self) -> Vec<Expert> {
        self.experts.values().cloned().collect()
    }

    // ******** Categories ********

    pub fn add_category(&mut self, name: &str) -> Result<Category, ScoringErrors> {
        let category = Category {
            name: check_name(name)?,
            id: next_id(&mut self.last_category_id)?,
        };
        debug!("add_category: {:?}", category);
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub fn rename_category(
        &mut self,
        category_id: u32,
        name: &str,
    ) -> Result<Category, ScoringErrors> {
        let name = check_name(name)?;
        let category = self
            .categories
            .get_mut(&category_id)
            .ok_or(ScoringErrors::UnknownCategory(category_id))?;
        category.name = name;
        Ok(category.clone())
    }

    /// Removes a category and all the scores given in it.
    /// The last category cannot be removed.
    pub fn remove_category(&mut self, category_id: u32) -> Result<Category, ScoringErrors> {
        if !self.categories.contains_key(&category_id) {
            return Err(ScoringErrors::UnknownCategory(category_id));
        }
        if self.categories.len() <= 1 {
            return Err(ScoringErrors::LastCategory);
        }
        self.scores.retain(|(_, _, cid), _| *cid != category_id);
        let category = self
            .categories
            .remove(&category_id)
            .ok_or(ScoringErrors::UnknownCategory(category_id))?;
        info!(
            "remove_category: removed category {} ({})",
            category.id, category.name
        );
        Ok(category)
    }

    /// The categories, by increasing id.
    pub fn list_categories(&self) -> Vec<Category> {
        self.categories.values().cloned().collect()
    }

    // ******** Scores ********

    /// Validates and records a score.
    ///
    /// The score must be between 0 and 10, and the team, expert and category
    /// must exist. A previous score for the same triple is replaced.
    pub fn submit_score(&mut self, score: &Score) -> Result<Score, ScoringErrors> {
        if !score.is_in_range() {
            return Err(ScoringErrors::InvalidScore {
                team_id: score.team_id,
                expert_id: score.expert_id,
                category_id: score.category_id,
                score: score.score,
            });
        }
        if !self.teams.contains_key(&score.team_id) {
            return Err(ScoringErrors::UnknownTeam(score.team_id));
        }
        if !self.experts.contains_key(&score.expert_id) {
            return Err(ScoringErrors::UnknownExpert(score.expert_id));
        }
        if !self.categories.contains_key(&score.category_id) {
            return Err(ScoringErrors::UnknownCategory(score.category_id));
        }

        match self.scores.get_mut(&score.key()) {
            Some(entry) => {
                debug!(
                    "submit_score: replacing {:?} with {:?} for {:?}",
                    entry.1,
                    score.score,
                    score.key()
                );
                entry.1 = score.score;
            }
            None => {
                debug!("submit_score: new score {:?}", score);
                self.scores
                    .insert(score.key(), (self.next_seq, score.score));
                self.next_seq += 1;
            }
        }
        Ok(*score)
    }

    /// All the scores received by a team, in order of submission, with the
    /// names of the experts and categories.
    pub fn scores_for_team(&self, team_id: u32) -> Result<Vec<TeamScore>, ScoringErrors> {
        if !self.teams.contains_key(&team_id) {
            return Err(ScoringErrors::UnknownTeam(team_id));
        }
        Ok(self
            .ordered_scores()
            .into_iter()
            .filter(|s| s.team_id == team_id)
            .filter_map(|s| {
                let expert = self.experts.get(&s.expert_id)?;
                let category = self.categories.get(&s.category_id)?;
                Some(TeamScore {
                    team_id: s.team_id,
                    expert_id: s.expert_id,
                    expert_name: expert.name.clone(),
                    category_id: s.category_id,
                    category_name: category.name.clone(),
                    score: s.score,
                })
            })
            .collect())
    }

    /// Every expert, with their score for this team and category if they gave one.
    pub fn expert_grid(
        &self,
        team_id: u32,
        category_id: u32,
    ) -> Result<Vec<(Expert, Option<f64>)>, ScoringErrors> {
        if !self.teams.contains_key(&team_id) {
            return Err(ScoringErrors::UnknownTeam(team_id));
        }
        if !self.categories.contains_key(&category_id) {
            return Err(ScoringErrors::UnknownCategory(category_id));
        }
        Ok(self
            .experts
            .values()
            .map(|e| {
                let s = self
                    .scores
                    .get(&(team_id, e.id, category_id))
                    .map(|(_, value)| *value);
                (e.clone(), s)
            })
            .collect())
    }

    fn ordered_scores(&self) -> Vec<Score> {
        let mut entries: Vec<(u64, Score)> = self
            .scores
            .iter()
            .map(|(&(team_id, expert_id, category_id), &(seq, score))| {
                (
                    seq,
                    Score {
                        team_id,
                        expert_id,
                        category_id,
                        score,
                    },
                )
            })
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, s)| s).collect()
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            teams: self.list_teams(),
            categories: self.list_categories(),
            scores: self.ordered_scores(),
            rules: self.rules.clone(),
        }
    }
}

/// A store that can be shared between threads.
///
/// Writes are serialized. The results are computed on a snapshot taken
/// under the read lock, so the lock is not held during the aggregation.
#[derive(Debug, Clone)]
pub struct SharedScoreStore {
    inner: Arc<RwLock<ScoreStore>>,
}

impl SharedScoreStore {
    pub fn new(store: ScoreStore) -> SharedScoreStore {
        SharedScoreStore {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn submit_score(&self, score: &Score) -> Result<Score, ScoringErrors> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| ScoringErrors::StoreUnavailable)?;
        store.submit_score(score)
    }

    /// Runs an update (adding a team, removing a category, ...) under the write lock.
    pub fn update<T, F>(&self, f: F) -> Result<T, ScoringErrors>
    where
        F: FnOnce(&mut ScoreStore) -> Result<T, ScoringErrors>,
    {
        let mut store = self
            .inner
            .write()
            .map_err(|_| ScoringErrors::StoreUnavailable)?;
        f(&mut store)
    }

    pub fn snapshot(&self) -> Result<ScoreSnapshot, ScoringErrors> {
        let store = self
            .inner
            .read()
            .map_err(|_| ScoringErrors::StoreUnavailable)?;
        Ok(store.snapshot())
    }

    pub fn results(&self) -> Result<Vec<TeamResult>, ScoringErrors> {
        self.snapshot()?.results()
    }
}
