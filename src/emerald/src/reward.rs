//! Shaped reward for reinforcement learning
//!
//! The reward is a weighted sum of progress terms computed from the merged
//! game state. Each step returns the change in that sum since the previous
//! step, so an agent is paid once for each bit of progress.
//!
//! `RewardTracker` holds the bookkeeping and is pure; `RewardEngine` pairs it
//! with a `GameStateReader` for one emulator session.

use crate::config::RewardConfig;
use crate::flags::{count_changed_bits, count_set_bits, FlagSection};
use crate::memory::MemorySource;
use crate::reader::GameStateReader;
use crate::rom::GrowthTables;
use crate::state::GameState;
use serde::Serialize;

/// Contribution of each reward term
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewardBreakdown {
    pub visit_city: f64,
    pub seen_pokemon: f64,
    pub caught_pokemon: f64,
    pub money: f64,
    pub pokedex: f64,
    pub pokenav: f64,
    pub badges: f64,
    pub champion: f64,
    pub trainers: f64,
    pub events: f64,
    pub experience: f64,
    pub total: f64,
}

impl RewardBreakdown {
    /// Named terms in summation order, excluding the total
    pub fn terms(&self) -> [(&'static str, f64); 11] {
        [
            ("visit_city", self.visit_city),
            ("seen_pokemon", self.seen_pokemon),
            ("caught_pokemon", self.caught_pokemon),
            ("money", self.money),
            ("pokedex", self.pokedex),
            ("pokenav", self.pokenav),
            ("badges", self.badges),
            ("champion", self.champion),
            ("trainers", self.trainers),
            ("events", self.events),
            ("experience", self.experience),
        ]
    }
}

/// Read-only view for logging
#[derive(Debug, Serialize)]
pub struct RewardInfo<'a> {
    pub game_state: &'a GameState,
    pub prev_reward: f64,
    pub total_script_flags: u64,
    pub rewards: &'a RewardBreakdown,
}

fn weight_if(flag: bool, weight: f64) -> f64 {
    if flag {
        weight
    } else {
        0.0
    }
}

/// Money term relative to the starting money
fn money_reward(config: &RewardConfig, money: Option<u32>) -> f64 {
    let money = money.unwrap_or(config.starting_money);
    let earned = i64::from(money) - i64::from(config.starting_money);

    if earned > 0 && earned < i64::from(config.money_glitch_threshold) {
        earned as f64 * config.money_gained
    } else if earned < 0 {
        earned as f64 * config.money_lost
    } else {
        if earned > 0 {
            tracing::warn!(earned, "ignoring implausible money gain");
        }
        0.0
    }
}

/// Experience term, concave in the total so grinding pays less and less
fn experience_reward(config: &RewardConfig, state: &GameState, growth: Option<&GrowthTables>) -> f64 {
    let Some(growth) = growth else {
        return 0.0;
    };
    let total: i64 = state
        .all_pokemon()
        .map(|mon| growth.gained_experience(mon))
        .sum();
    config.exp_scale * (total.max(0) as f64).powf(config.exp_shape)
}

/// Reward bookkeeping across one episode
#[derive(Debug, Clone)]
pub struct RewardTracker {
    config: RewardConfig,
    /// Latest known value of every field
    state: GameState,
    /// Merged state as of the last counted step
    prev_state: Option<GameState>,
    prev_reward: f64,
    /// Script flag transitions seen so far; never decreases
    total_script_flags: u64,
    breakdown: RewardBreakdown,
}

impl RewardTracker {
    pub fn new(config: RewardConfig) -> Self {
        Self {
            config,
            state: GameState::default(),
            prev_state: None,
            prev_reward: 0.0,
            total_script_flags: 0,
            breakdown: RewardBreakdown::default(),
        }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn prev_reward(&self) -> f64 {
        self.prev_reward
    }

    pub fn total_script_flags(&self) -> u64 {
        self.total_script_flags
    }

    pub fn breakdown(&self) -> &RewardBreakdown {
        &self.breakdown
    }

    pub fn info(&self) -> RewardInfo<'_> {
        RewardInfo {
            game_state: &self.state,
            prev_reward: self.prev_reward,
            total_script_flags: self.total_script_flags,
            rewards: &self.breakdown,
        }
    }

    /// Start a new episode from `snapshot`
    ///
    /// The baseline reward is computed against an empty prior, so the first
    /// step afterwards only pays for what changed since the reset.
    pub fn reset(&mut self, snapshot: GameState, growth: Option<&GrowthTables>) {
        self.state = snapshot;
        self.prev_state = None;
        self.prev_reward = 0.0;
        self.total_script_flags = 0;

        self.prev_reward = self.evaluate(growth);
        self.prev_state = Some(self.state.clone());
        tracing::debug!(baseline = self.prev_reward, "reward reset");
    }

    /// Fold in a new snapshot and return the reward earned since the last step
    ///
    /// An invalid observation (e.g. a blank frame during a transition)
    /// returns 0 and leaves all bookkeeping untouched.
    pub fn step(&mut self, snapshot: GameState, valid: bool, growth: Option<&GrowthTables>) -> f64 {
        if !valid {
            return 0.0;
        }

        self.state.merge_from(snapshot);
        let reward = self.evaluate(growth);
        let delta = reward - self.prev_reward;

        self.prev_reward = reward;
        self.prev_state = Some(self.state.clone());
        tracing::trace!(delta, total = reward, "reward step");
        delta
    }

    /// Total reward for the merged state, updating the script flag counter
    fn evaluate(&mut self, growth: Option<&GrowthTables>) -> f64 {
        let state = &self.state;
        let config = &self.config;

        let prev_script = self
            .prev_state
            .as_ref()
            .and_then(|prev| prev.flag_section(FlagSection::Script));
        let changed = count_changed_bits(prev_script, state.flag_section(FlagSection::Script));
        self.total_script_flags += u64::from(changed);

        let trainers = state
            .flag_section(FlagSection::Trainer)
            .map_or(0, count_set_bits);
        let cities = state
            .num_visited_cities()
            .saturating_sub(config.starting_towns);

        let mut breakdown = RewardBreakdown {
            visit_city: f64::from(cities) * config.visit_city,
            seen_pokemon: f64::from(state.num_seen()) * config.seen_pokemon,
            caught_pokemon: f64::from(state.num_caught()) * config.caught_pokemon,
            money: money_reward(config, state.money),
            pokedex: weight_if(state.has_pokedex(), config.pokedex),
            pokenav: weight_if(state.has_pokenav(), config.pokenav),
            badges: f64::from(state.num_badges()) * config.badge,
            champion: weight_if(state.is_champion(), config.champion),
            trainers: f64::from(trainers) * config.trainer_beat,
            events: self.total_script_flags as f64 * config.event,
            experience: experience_reward(config, state, growth),
            total: 0.0,
        };
        breakdown.total = breakdown.terms().iter().map(|(_, value)| value).sum();
        tracing::debug!(?breakdown, "reward terms");

        let total = breakdown.total;
        self.breakdown = breakdown;
        total
    }
}

/// Reward source for one emulator session
pub struct RewardEngine<S> {
    reader: GameStateReader<S>,
    tracker: RewardTracker,
}

impl<S: MemorySource> RewardEngine<S> {
    pub fn new(source: S, config: RewardConfig) -> Self {
        Self::with_reader(GameStateReader::new(source), config)
    }

    pub fn with_reader(reader: GameStateReader<S>, config: RewardConfig) -> Self {
        Self {
            reader,
            tracker: RewardTracker::new(config),
        }
    }

    pub fn reader(&self) -> &GameStateReader<S> {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut GameStateReader<S> {
        &mut self.reader
    }

    pub fn tracker(&self) -> &RewardTracker {
        &self.tracker
    }

    /// Start a new episode from the current memory
    pub fn reset(&mut self) {
        let snapshot = self.reader.snapshot();
        let growth = self.reader.growth_tables();
        self.tracker.reset(snapshot, growth);
    }

    /// Reward earned since the previous step
    ///
    /// `observation_valid` is the host's judgement of the current frame, e.g.
    /// false when the screen is blank. Invalid frames are not read at all.
    pub fn step(&mut self, observation_valid: bool) -> f64 {
        if !observation_valid {
            return 0.0;
        }
        let snapshot = self.reader.snapshot();
        let growth = self.reader.growth_tables();
        self.tracker.step(snapshot, true, growth)
    }

    pub fn info(&self) -> RewardInfo<'_> {
        self.tracker.info()
    }
}
