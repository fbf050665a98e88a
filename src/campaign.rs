//! Campaign progression across mode runs
//!
//! A fresh campaign starts with the tutorial, run 1 and three attempts per
//! difficulty. Passing a normal run raises the run index; run 10 summons the
//! boss. The boss result decides what the campaign offers afterwards.

use std::fmt;

use crate::modes::BossOutcome;
use crate::persistence::{PersistenceError, SaveRecord, SaveStore, Success};
use crate::sim::Difficulty;
use crate::sim::state::ENDLESS_RUN_INDEX;

/// Attempts granted per difficulty
pub const ATTEMPTS_PER_DIFFICULTY: u32 = 3;

/// Run index that summons the boss
pub const BOSS_RUN_INDEX: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignError {
    NoAttemptsLeft { difficulty: Difficulty },
}

impl fmt::Display for CampaignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAttemptsLeft { difficulty } => {
                write!(f, "no {} attempts left", difficulty.as_str())
            }
        }
    }
}

impl std::error::Error for CampaignError {}

/// What the campaign offers next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Tutorial,
    Normal { run_index: u32 },
    Boss,
    /// Post-escape normal runs at the boss run index
    Rematch,
    /// Post-defeat hard runs without a goal
    Endless,
    /// All attempts spent
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    record: SaveRecord,
    needs_tutorial: bool,
}

impl Campaign {
    pub fn fresh() -> Self {
        Self {
            record: SaveRecord {
                times: 1,
                easy_left: ATTEMPTS_PER_DIFFICULTY,
                medium_left: ATTEMPTS_PER_DIFFICULTY,
                hard_left: ATTEMPTS_PER_DIFFICULTY,
                success: Success::Pending,
            },
            needs_tutorial: true,
        }
    }

    /// Resume the stored campaign, or start a fresh one
    pub fn load(store: &mut dyn SaveStore) -> Result<Self, PersistenceError> {
        match store.load_record()? {
            Some(record) => {
                log::info!("Resuming campaign at run {} ({:?})", record.times, record.success);
                Ok(Self {
                    record,
                    needs_tutorial: false,
                })
            }
            None => {
                log::info!("Starting a fresh campaign");
                Ok(Self::fresh())
            }
        }
    }

    pub fn save(&self, store: &mut dyn SaveStore) -> Result<(), PersistenceError> {
        store.save_record(&self.record)
    }

    pub fn record(&self) -> &SaveRecord {
        &self.record
    }

    pub fn next_stage(&self) -> Stage {
        if self.needs_tutorial {
            return Stage::Tutorial;
        }
        match self.record.success {
            Success::Defeated => Stage::Endless,
            _ if self.total_attempts() == 0 => Stage::Exhausted,
            Success::Escaped => Stage::Rematch,
            Success::Pending if self.record.times >= BOSS_RUN_INDEX => Stage::Boss,
            Success::Pending => Stage::Normal {
                run_index: self.record.times,
            },
        }
    }

    /// Run index to play the next normal run at
    pub fn run_index(&self) -> u32 {
        match self.record.success {
            Success::Pending => self.record.times,
            Success::Escaped => BOSS_RUN_INDEX,
            Success::Defeated => ENDLESS_RUN_INDEX,
        }
    }

    pub fn complete_tutorial(&mut self) {
        self.needs_tutorial = false;
    }

    pub fn attempts_left(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.record.easy_left,
            Difficulty::Medium => self.record.medium_left,
            Difficulty::Hard => self.record.hard_left,
        }
    }

    fn attempts_mut(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::Easy => &mut self.record.easy_left,
            Difficulty::Medium => &mut self.record.medium_left,
            Difficulty::Hard => &mut self.record.hard_left,
        }
    }

    pub fn total_attempts(&self) -> u32 {
        Difficulty::ALL.iter().map(|d| self.attempts_left(*d)).sum()
    }

    /// Pay for a normal run up front
    pub fn spend_attempt(&mut self, difficulty: Difficulty) -> Result<(), CampaignError> {
        let left = self.attempts_mut(difficulty);
        if *left == 0 {
            return Err(CampaignError::NoAttemptsLeft { difficulty });
        }
        *left -= 1;
        Ok(())
    }

    /// A pass advances the run index; a failure refunds the attempt
    pub fn record_normal(&mut self, difficulty: Difficulty, passed: bool) {
        if passed {
            if self.record.success == Success::Pending {
                self.record.times += 1;
            }
        } else {
            *self.attempts_mut(difficulty) += 1;
        }
        log::info!(
            "{} run {}: {} (attempts left {}/{}/{})",
            difficulty.as_str(),
            self.run_index(),
            if passed { "passed" } else { "failed" },
            self.record.easy_left,
            self.record.medium_left,
            self.record.hard_left
        );
    }

    pub fn record_boss(&mut self, outcome: BossOutcome) {
        self.record.times = BOSS_RUN_INDEX;
        match outcome {
            BossOutcome::PlayerEscaped => {
                self.record.success = Success::Escaped;
                // Rematches get a fresh set of attempts
                for difficulty in Difficulty::ALL {
                    *self.attempts_mut(difficulty) = ATTEMPTS_PER_DIFFICULTY;
                }
            }
            BossOutcome::PlayerDefeated => {
                self.record.success = Success::Defeated;
                for difficulty in Difficulty::ALL {
                    *self.attempts_mut(difficulty) = 0;
                }
            }
        }
        log::info!("Boss result recorded: {outcome:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_fresh_campaign_starts_with_tutorial() {
        let mut store = MemoryStore::default();
        let mut campaign = Campaign::load(&mut store).unwrap();
        assert_eq!(campaign.next_stage(), Stage::Tutorial);
        campaign.complete_tutorial();
        assert_eq!(campaign.next_stage(), Stage::Normal { run_index: 1 });
        assert_eq!(campaign.total_attempts(), 9);
    }

    #[test]
    fn test_failure_refunds_attempt() {
        let mut campaign = Campaign::fresh();
        campaign.complete_tutorial();
        campaign.spend_attempt(Difficulty::Hard).unwrap();
        assert_eq!(campaign.attempts_left(Difficulty::Hard), 2);
        campaign.record_normal(Difficulty::Hard, false);
        assert_eq!(campaign.attempts_left(Difficulty::Hard), 3);
        assert_eq!(campaign.run_index(), 1);
    }

    #[test]
    fn test_pass_advances_run() {
        let mut campaign = Campaign::fresh();
        campaign.complete_tutorial();
        campaign.spend_attempt(Difficulty::Easy).unwrap();
        campaign.record_normal(Difficulty::Easy, true);
        assert_eq!(campaign.attempts_left(Difficulty::Easy), 2);
        assert_eq!(campaign.next_stage(), Stage::Normal { run_index: 2 });
    }

    #[test]
    fn test_spending_empty_difficulty_fails() {
        let mut campaign = Campaign::fresh();
        for _ in 0..3 {
            campaign.spend_attempt(Difficulty::Medium).unwrap();
        }
        assert_eq!(
            campaign.spend_attempt(Difficulty::Medium),
            Err(CampaignError::NoAttemptsLeft {
                difficulty: Difficulty::Medium
            })
        );
    }

    #[test]
    fn test_exhaustion() {
        let mut campaign = Campaign::fresh();
        campaign.complete_tutorial();
        for difficulty in Difficulty::ALL {
            for _ in 0..3 {
                campaign.spend_attempt(difficulty).unwrap();
                campaign.record_normal(difficulty, true);
            }
        }
        assert_eq!(campaign.next_stage(), Stage::Exhausted);
    }

    #[test]
    fn test_run_ten_summons_boss() {
        let mut campaign = Campaign::fresh();
        campaign.complete_tutorial();
        for _ in 0..9 {
            campaign.record_normal(Difficulty::Easy, true);
        }
        assert_eq!(campaign.run_index(), 10);
        assert_eq!(campaign.next_stage(), Stage::Boss);
    }

    #[test]
    fn test_boss_results_persist() {
        let mut store = MemoryStore::default();
        let mut campaign = Campaign::fresh();
        campaign.record_boss(BossOutcome::PlayerEscaped);
        campaign.save(&mut store).unwrap();

        let resumed = Campaign::load(&mut store).unwrap();
        assert_eq!(resumed.record().success, Success::Escaped);
        assert_eq!(resumed.next_stage(), Stage::Rematch);
        assert_eq!(resumed.run_index(), BOSS_RUN_INDEX);

        let mut campaign = resumed;
        campaign.record_boss(BossOutcome::PlayerDefeated);
        assert_eq!(campaign.next_stage(), Stage::Endless);
        assert_eq!(campaign.run_index(), ENDLESS_RUN_INDEX);
        assert_eq!(campaign.total_attempts(), 0);
    }
}
