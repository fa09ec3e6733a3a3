//! Candidate moves derived from a participant's own snapshot.

use super::trait_def::BotAction;
use crate::domain::card_duel::MAX_PICKS;
use crate::domain::cards::{duel_card, support_card, CardSlot, SupportEffect};
use crate::domain::duel::DEFEND_COST;
use crate::domain::pending::{DuelChoice, DuelPhase, DuelReward};
use crate::domain::snapshot::{DuelView, GameSnapshot, ParticipantPublic, PendingDetail, ViewerPrivate};
use crate::domain::state::{GameMode, GameStatus, ParticipantId};

const DUEL_CHOICES: [DuelChoice; 3] = [DuelChoice::Attack, DuelChoice::Defend, DuelChoice::Bluff];

/// Every action the viewer could reasonably take right now. Empty when
/// nothing is theirs to do. Candidates pass the obvious gates; the engine
/// still has the final word.
pub fn candidate_actions(view: &GameSnapshot) -> Vec<BotAction> {
    let Some(me) = view.viewer.as_ref() else {
        return Vec::new();
    };
    let Some(my_seat) = view.participants.iter().find(|p| p.id == me.participant) else {
        return Vec::new();
    };

    match view.status {
        GameStatus::Waiting | GameStatus::Finished => Vec::new(),
        GameStatus::Ordering => match &view.ordering {
            Some(o) if o.contenders.contains(&me.participant) && !o.rolled.contains(&me.participant) => {
                vec![BotAction::RollForOrder]
            }
            _ => Vec::new(),
        },
        GameStatus::Drafting => me
            .draft_options
            .iter()
            .map(|&code| BotAction::DraftPick { code })
            .collect(),
        GameStatus::Active if view.mode == GameMode::CardDuel => card_duel_actions(view, me),
        GameStatus::Active => board_actions(view, me, my_seat),
    }
}

fn living_others(view: &GameSnapshot, me: ParticipantId) -> impl Iterator<Item = ParticipantId> + '_ {
    view.participants
        .iter()
        .filter(move |p| p.is_alive && p.id != me)
        .map(|p| p.id)
}

fn board_actions(view: &GameSnapshot, me: &ViewerPrivate, seat: &ParticipantPublic) -> Vec<BotAction> {
    if !seat.is_alive {
        return Vec::new();
    }
    let pid = me.participant;

    if let Some(pending) = &view.pending {
        return match &pending.detail {
            Some(PendingDetail::Question { choices, changed_once, .. }) => {
                let mut out: Vec<BotAction> = (0..choices.len())
                    .map(|i| BotAction::AnswerQuestion { choice: Some(i) })
                    .collect();
                if !changed_once {
                    out.extend(
                        me.support_cards
                            .iter()
                            .filter(|c| !c.is_used)
                            .filter(|c| {
                                support_card(c.code).is_some_and(|d| d.effect == SupportEffect::ChangeQuestion)
                            })
                            .map(|c| BotAction::UseSupportCard {
                                card_id: c.id,
                                target: None,
                            }),
                    );
                }
                out
            }
            Some(PendingDetail::Shop { offers }) => {
                let mut out: Vec<BotAction> = offers
                    .iter()
                    .filter(|o| o.cost <= seat.coins)
                    .map(|o| BotAction::ShopBuy { code: o.code })
                    .collect();
                out.push(BotAction::ShopClose);
                out
            }
            Some(PendingDetail::Gun { .. }) => {
                let mut out: Vec<BotAction> = living_others(view, pid)
                    .map(|target| BotAction::GunAttack { target })
                    .collect();
                out.push(BotAction::GunSkip);
                out
            }
            Some(PendingDetail::Duel(duel)) => duel_actions(view, me, seat, duel),
            None => Vec::new(),
        };
    }

    if view.current_turn != Some(pid) {
        return Vec::new();
    }
    let mut out = vec![BotAction::Roll];
    for card in me.support_cards.iter().filter(|c| !c.is_used) {
        let Some(def) = support_card(card.code) else {
            continue;
        };
        match def.effect {
            SupportEffect::ChangeQuestion => {}
            SupportEffect::SwapPosition => out.extend(living_others(view, pid).map(|target| {
                BotAction::UseSupportCard {
                    card_id: card.id,
                    target: Some(target),
                }
            })),
            _ => out.push(BotAction::UseSupportCard {
                card_id: card.id,
                target: None,
            }),
        }
    }
    out
}

fn duel_actions(view: &GameSnapshot, me: &ViewerPrivate, seat: &ParticipantPublic, duel: &DuelView) -> Vec<BotAction> {
    let pid = me.participant;
    match duel.phase {
        DuelPhase::ChooseOpponent if duel.initiator == pid => living_others(view, pid)
            .map(|opponent| BotAction::DuelChooseOpponent { opponent })
            .collect(),
        DuelPhase::Commit if duel.my_choice.is_none() => DUEL_CHOICES
            .into_iter()
            .filter(|c| match c {
                DuelChoice::Attack => true,
                DuelChoice::Defend => seat.coins >= DEFEND_COST,
                DuelChoice::Bluff => me.support_cards.iter().any(|c| !c.is_used),
            })
            .map(|choice| BotAction::DuelCommit { choice })
            .collect(),
        DuelPhase::Predict if duel.my_prediction.is_none() => DUEL_CHOICES
            .into_iter()
            .map(|prediction| BotAction::DuelPredict { prediction })
            .collect(),
        DuelPhase::WinnerChoice if duel.winner == Some(pid) => {
            let loser = if duel.initiator == pid { duel.opponent } else { Some(duel.initiator) };
            let loser_has_cards = loser
                .and_then(|l| view.participants.iter().find(|p| p.id == l))
                .is_some_and(|p| p.unused_cards > 0);
            let mut out = vec![
                BotAction::DuelChooseReward { reward: DuelReward::Coins },
                BotAction::DuelChooseReward { reward: DuelReward::Hp },
                BotAction::DuelChooseReward { reward: DuelReward::PushBack },
            ];
            if loser_has_cards {
                out.push(BotAction::DuelChooseReward {
                    reward: DuelReward::StealCard,
                });
            }
            out
        }
        _ => Vec::new(),
    }
}

fn card_duel_actions(view: &GameSnapshot, me: &ViewerPrivate) -> Vec<BotAction> {
    let pid = me.participant;
    if !me.pick_options.is_empty() {
        return me
            .pick_options
            .iter()
            .map(|&code| BotAction::PickStartingCard { code })
            .collect();
    }
    let everyone_picked = view
        .participants
        .iter()
        .all(|p| p.card_duel.as_ref().is_some_and(|cd| cd.picks_done >= MAX_PICKS));
    if !everyone_picked || view.current_turn != Some(pid) {
        return Vec::new();
    }
    let Some(flags) = view
        .participants
        .iter()
        .find(|p| p.id == pid)
        .and_then(|p| p.card_duel.as_ref())
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    if !flags.silenced {
        for &code in &me.hand {
            let playable = match duel_card(code).map(|d| d.slot()) {
                Some(CardSlot::Action) => !flags.action_used && !flags.stunned,
                Some(CardSlot::Bonus) => !flags.bonus_used,
                None => true,
            };
            if playable {
                out.push(BotAction::PlayCard {
                    code,
                    discard: Vec::new(),
                });
            }
        }
    }
    out.push(BotAction::EndTurn);
    out
}
