//! Prediction duel sub-machine:
//! choose_opponent -> commit -> predict -> winner_choice -> resolved.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::damage::{apply_damage, DamageResult};
use crate::domain::interactions::close_and_advance;
use crate::domain::log::LogAction;
use crate::domain::pending::{
    require_duel, DuelChoice, DuelPhase, DuelReveal, DuelReward, DuelSide, DuelState,
    PendingInteraction,
};
use crate::domain::state::{CardInstanceId, Game, GameStatus, ParticipantId};
use crate::errors::domain::{DomainError, ValidationKind};

pub const DUEL_COIN_REWARD: u32 = 3;
pub const DUEL_HP_REWARD: u32 = 1;
/// Coins a Defend commit costs.
pub const DEFEND_COST: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelStepOutcome {
    pub participant: ParticipantId,
    pub phase: DuelPhase,
    pub reveal: Option<DuelReveal>,
    pub winner: Option<ParticipantId>,
    pub draw: bool,
    pub next_participant: Option<ParticipantId>,
}

impl DuelStepOutcome {
    fn in_phase(participant: ParticipantId, phase: DuelPhase) -> Self {
        Self {
            participant,
            phase,
            reveal: None,
            winner: None,
            draw: false,
            next_participant: None,
        }
    }
}

fn duel_mut(game: &mut Game) -> Result<&mut DuelState, DomainError> {
    match game.pending.as_mut() {
        Some(PendingInteraction::Duel(d)) => Ok(d),
        _ => Err(DomainError::validation(
            ValidationKind::NoPendingInteraction,
            "no pending duel",
        )),
    }
}

pub fn choose_opponent(
    game: &mut Game,
    pid: ParticipantId,
    opponent: ParticipantId,
) -> Result<DuelStepOutcome, DomainError> {
    game.require_status(GameStatus::Active, "duel_choose_opponent")?;
    require_duel(&mut game.pending, pid, DuelPhase::ChooseOpponent)?;
    game.require_valid_target(pid, opponent)?;

    let duel = duel_mut(game)?;
    duel.opponent = Some(DuelSide::new(opponent));
    duel.phase = DuelPhase::Commit;
    game.push_log(
        LogAction::DuelStart,
        Some(pid),
        format!("challenged participant {opponent}"),
    );
    Ok(DuelStepOutcome::in_phase(pid, DuelPhase::Commit))
}

/// Private commit. Defend costs a coin; Bluff burns an unused support card.
pub fn commit(
    game: &mut Game,
    pid: ParticipantId,
    choice: DuelChoice,
) -> Result<DuelStepOutcome, DomainError> {
    game.require_status(GameStatus::Active, "duel_commit")?;
    let duel = require_duel(&mut game.pending, pid, DuelPhase::Commit)?;
    if duel.side(pid).is_some_and(|s| s.choice.is_some()) {
        return Err(DomainError::validation(
            ValidationKind::AlreadyCommitted,
            "choice already committed",
        ));
    }

    let p = game.participant_mut(pid)?;
    match choice {
        DuelChoice::Defend => {
            if p.coins < DEFEND_COST {
                return Err(DomainError::validation(
                    ValidationKind::InsufficientCoins,
                    "defend needs at least 1 coin",
                ));
            }
            p.coins -= DEFEND_COST;
        }
        DuelChoice::Bluff => {
            let card = p.support_cards.iter_mut().find(|c| !c.is_used).ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::NoCardsAvailable,
                    "bluff needs an unused support card",
                )
            })?;
            card.is_used = true;
        }
        DuelChoice::Attack => {}
    }

    let duel = duel_mut(game)?;
    if let Some(side) = duel.side_mut(pid) {
        side.choice = Some(choice);
    }
    let both = duel.initiator.choice.is_some() && duel.opponent.is_some_and(|o| o.choice.is_some());
    if both {
        duel.phase = DuelPhase::Predict;
    }
    let phase = duel.phase;
    game.push_log(LogAction::DuelStart, Some(pid), "committed");
    Ok(DuelStepOutcome::in_phase(pid, phase))
}

fn score(side: &DuelSide, other: &DuelSide) -> u8 {
    let (Some(mine), Some(theirs), Some(guess)) = (side.choice, other.choice, side.prediction) else {
        return 0;
    };
    u8::from(guess == theirs) + u8::from(mine.beats(theirs))
}

/// Private prediction of the other side's choice. The second prediction
/// scores the duel: a tie closes it with no reward.
pub fn predict(
    game: &mut Game,
    pid: ParticipantId,
    prediction: DuelChoice,
) -> Result<DuelStepOutcome, DomainError> {
    game.require_status(GameStatus::Active, "duel_predict")?;
    let duel = require_duel(&mut game.pending, pid, DuelPhase::Predict)?;
    let Some(side) = duel.side_mut(pid) else {
        return Err(DomainError::validation(ValidationKind::NotInteractionOwner, "not a duelist"));
    };
    if side.prediction.is_some() {
        return Err(DomainError::validation(
            ValidationKind::AlreadyPredicted,
            "prediction already submitted",
        ));
    }
    side.prediction = Some(prediction);

    let initiator = duel.initiator;
    let Some(opponent) = duel.opponent else {
        return Err(DomainError::validation_other("Invariant violated: duel opponent must be set (predict)"));
    };
    if initiator.prediction.is_none() || opponent.prediction.is_none() {
        return Ok(DuelStepOutcome::in_phase(pid, DuelPhase::Predict));
    }

    let (Some(ic), Some(oc), Some(ip), Some(op)) = (
        initiator.choice,
        opponent.choice,
        initiator.prediction,
        opponent.prediction,
    ) else {
        return Err(DomainError::validation_other("Invariant violated: duel sides incomplete (predict)"));
    };
    let reveal = DuelReveal {
        initiator_choice: ic,
        opponent_choice: oc,
        initiator_prediction: ip,
        opponent_prediction: op,
        initiator_score: score(&initiator, &opponent),
        opponent_score: score(&opponent, &initiator),
    };
    duel.reveal = Some(reveal);

    if reveal.initiator_score == reveal.opponent_score {
        duel.phase = DuelPhase::Resolved;
        game.push_log(
            LogAction::DuelResult,
            Some(initiator.participant),
            format!("duel with participant {} ended in a draw", opponent.participant),
        );
        let next_participant = close_and_advance(game);
        return Ok(DuelStepOutcome {
            participant: pid,
            phase: DuelPhase::Resolved,
            reveal: Some(reveal),
            winner: None,
            draw: true,
            next_participant,
        });
    }

    let (winner, loser) = if reveal.initiator_score > reveal.opponent_score {
        (initiator.participant, opponent.participant)
    } else {
        (opponent.participant, initiator.participant)
    };
    duel.winner = Some(winner);
    duel.loser = Some(loser);
    duel.phase = DuelPhase::WinnerChoice;
    game.push_log(
        LogAction::DuelResult,
        Some(winner),
        format!(
            "won the duel {}-{} against participant {loser}",
            reveal.initiator_score.max(reveal.opponent_score),
            reveal.initiator_score.min(reveal.opponent_score)
        ),
    );
    Ok(DuelStepOutcome {
        participant: pid,
        phase: DuelPhase::WinnerChoice,
        reveal: Some(reveal),
        winner: Some(winner),
        draw: false,
        next_participant: None,
    })
}

/// Timeout flavor: either duelist closes an unfinished duel. Nobody is paid
/// and the turn moves on past the initiator.
pub fn duel_timeout(game: &mut Game, pid: ParticipantId) -> Result<DuelStepOutcome, DomainError> {
    game.require_status(GameStatus::Active, "duel_timeout")?;
    let duel = duel_mut(game)?;
    if !duel.is_duelist(pid) {
        return Err(DomainError::validation(ValidationKind::NotInteractionOwner, "not a duelist"));
    }
    if duel.phase == DuelPhase::Resolved {
        return Err(DomainError::validation(
            ValidationKind::InteractionPhaseMismatch,
            "duel already resolved",
        ));
    }
    let stalled_in = duel.phase;
    let reveal = duel.reveal;
    duel.phase = DuelPhase::Resolved;
    let initiator = duel.initiator.participant;
    game.push_log(
        LogAction::DuelResult,
        Some(initiator),
        format!("duel timed out in {stalled_in:?}, no reward"),
    );
    let next_participant = close_and_advance(game);
    Ok(DuelStepOutcome {
        participant: pid,
        phase: DuelPhase::Resolved,
        reveal,
        winner: None,
        draw: false,
        next_participant,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelRewardOutcome {
    pub winner: ParticipantId,
    pub loser: ParticipantId,
    pub reward: DuelReward,
    pub coins_gained: u32,
    pub damage: Option<DamageResult>,
    pub pushed_to: Option<usize>,
    pub stolen_card: Option<CardInstanceId>,
    pub next_participant: Option<ParticipantId>,
    pub finished: bool,
    pub winner_of_game: Option<ParticipantId>,
}

pub fn choose_reward(
    game: &mut Game,
    pid: ParticipantId,
    reward: DuelReward,
    rng: &mut impl Rng,
) -> Result<DuelRewardOutcome, DomainError> {
    game.require_status(GameStatus::Active, "duel_reward")?;
    let duel = require_duel(&mut game.pending, pid, DuelPhase::WinnerChoice)?;
    if duel.winner != Some(pid) {
        return Err(DomainError::validation(
            ValidationKind::NotInteractionOwner,
            "only the duel winner picks the reward",
        ));
    }
    let loser = duel.loser.ok_or_else(|| {
        DomainError::validation_other("Invariant violated: duel loser must be set (reward)")
    })?;

    let mut out = DuelRewardOutcome {
        winner: pid,
        loser,
        reward,
        coins_gained: 0,
        damage: None,
        pushed_to: None,
        stolen_card: None,
        next_participant: None,
        finished: false,
        winner_of_game: None,
    };

    match reward {
        DuelReward::Coins => {
            let w = game.participant_mut(pid)?;
            w.coins = w.coins.saturating_add(DUEL_COIN_REWARD);
            out.coins_gained = DUEL_COIN_REWARD;
        }
        DuelReward::Hp => {
            let result = apply_damage(game.participant_mut(loser)?, DUEL_HP_REWARD);
            if result.died {
                game.push_log(LogAction::Elimination, Some(loser), "eliminated");
            }
            out.damage = Some(result);
        }
        DuelReward::PushBack => {
            let l = game.participant_mut(loser)?;
            l.position = l.position.saturating_sub(1);
            out.pushed_to = Some(l.position);
        }
        DuelReward::StealCard => {
            let l = game.participant_mut(loser)?;
            let candidates: Vec<usize> = l
                .support_cards
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.is_used)
                .map(|(i, _)| i)
                .collect();
            let Some(&idx) = candidates.choose(rng) else {
                return Err(DomainError::validation(
                    ValidationKind::NoCardsAvailable,
                    format!("participant {loser} has no unused cards to steal"),
                ));
            };
            let card = l.support_cards.remove(idx);
            out.stolen_card = Some(card.id);
            game.participant_mut(pid)?.support_cards.push(card);
        }
    }

    if let Ok(duel) = duel_mut(game) {
        duel.phase = DuelPhase::Resolved;
    }
    game.push_log(LogAction::DuelResult, Some(pid), format!("took {reward:?} from participant {loser}"));

    out.next_participant = close_and_advance(game);
    out.finished = game.status == GameStatus::Finished;
    out.winner_of_game = game.winner;
    Ok(out)
}
