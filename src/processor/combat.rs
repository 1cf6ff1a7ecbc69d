use rand::seq::IndexedRandom;
use rand::Rng;
use std::fmt;
use troutslap_shared::ParticipantSet;

pub const MIN_SLAPS: usize = 1;
pub const MAX_SLAPS: usize = 9;

pub const WEAPONS: [&str; 8] = [
    "trout",
    "pair of sardines",
    "salmon",
    "barramundi",
    "sturgeon",
    "ocean sunfish",
    "shark",
    "guppy",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlapEvent {
    pub slapper: String,
    pub slappee: String,
    pub weapon: &'static str,
}

impl fmt::Display for SlapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<@{}> slaps <@{}> with a {}",
            self.slapper, self.slappee, self.weapon
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerEvent {
    pub winner: String,
}

impl fmt::Display for WinnerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}> wins!", self.winner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatResult {
    pub slaps: Vec<SlapEvent>,
    pub winner: WinnerEvent,
}

impl CombatResult {
    /// One channel message per slap, then the winner line.
    pub fn messages(&self) -> Vec<String> {
        self.slaps
            .iter()
            .map(ToString::to_string)
            .chain(std::iter::once(self.winner.to_string()))
            .collect()
    }
}

/// Play out a fight between `participants`, started by `initiator`.
///
/// Each victim strikes back at someone else in the next round, so the slaps
/// form a chain rather than independent pairs. The winner is drawn from
/// everyone, independent of the chain. Returns `None` when there is nobody
/// to fight.
pub fn generate<R: Rng>(
    initiator: &str,
    participants: &ParticipantSet,
    rng: &mut R,
) -> Option<CombatResult> {
    if participants.len() < 2 {
        return None;
    }

    let num_slaps = rng.random_range(MIN_SLAPS..=MAX_SLAPS);
    let mut slapper = initiator.to_string();
    let mut slaps = Vec::with_capacity(num_slaps);

    for _ in 0..num_slaps {
        let targets: Vec<&String> = participants.iter().filter(|p| **p != slapper).collect();
        let slappee = (*targets.choose(rng)?).clone();
        let weapon = *WEAPONS.choose(rng)?;

        slaps.push(SlapEvent {
            slapper,
            slappee: slappee.clone(),
            weapon,
        });
        slapper = slappee;
    }

    let winner = participants.as_slice().choose(rng)?.clone();

    Some(CombatResult {
        slaps,
        winner: WinnerEvent { winner },
    })
}
