//! Per-viewer projection of a game. Hidden information (other players'
//! hands and cards, pending payloads they don't own, the correct answer)
//! never leaves the engine.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::domain::card_duel::CardDuelState;
use crate::domain::cards::{DuelCardCode, SupportCardCode};
use crate::domain::log::{GameLogEntry, SNAPSHOT_LOG_LEN};
use crate::domain::ordering::OrderingState;
use crate::domain::pending::{
    DuelChoice, DuelPhase, DuelReveal, DuelState, InteractionKind, PendingInteraction, ShopOffer,
};
use crate::domain::state::{
    Game, GameId, GameMode, GameRules, GameStatus, Participant, ParticipantId,
    SupportCardInstance, UserId,
};
use crate::domain::status::StatusList;
use crate::domain::tiles::Tile;

/// Top-level snapshot for one viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub join_code: String,
    pub mode: GameMode,
    pub status: GameStatus,
    pub version: u64,
    pub host: UserId,
    pub board_length: usize,
    pub max_players: usize,
    pub current_turn: Option<ParticipantId>,
    pub winner: Option<ParticipantId>,
    pub rules: GameRules,
    pub tiles: Vec<Tile>,
    pub participants: Vec<ParticipantPublic>,
    pub pending: Option<PendingView>,
    pub ordering: Option<OrderingState>,
    pub viewer: Option<ViewerPrivate>,
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
    pub log: Vec<GameLogEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPublic {
    pub id: ParticipantId,
    pub user_id: UserId,
    pub turn_order: usize,
    pub hp: u32,
    pub coins: u32,
    pub position: usize,
    pub shield_points: u32,
    pub extra_rolls: u32,
    pub is_alive: bool,
    pub unused_cards: usize,
    pub draft_picks_done: Option<u8>,
    pub card_duel: Option<CardDuelPublic>,
}

/// What an opponent can see of a Card-Duel seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDuelPublic {
    pub hand_size: usize,
    pub deck_size: usize,
    pub discard: Vec<DuelCardCode>,
    pub statuses: StatusList,
    pub picks_done: u8,
    pub action_used: bool,
    pub bonus_used: bool,
    pub last_played: Option<DuelCardCode>,
    pub silenced: bool,
    pub stunned: bool,
}

impl CardDuelPublic {
    fn of(cd: &CardDuelState) -> Self {
        Self {
            hand_size: cd.hand.len(),
            deck_size: cd.deck.len(),
            discard: cd.discard.clone(),
            statuses: cd.statuses.clone(),
            picks_done: cd.picks_done,
            action_used: cd.turn_flags.action_used,
            bonus_used: cd.turn_flags.bonus_used,
            last_played: cd.turn_flags.last_played,
            silenced: cd.turn_flags.silenced,
            stunned: cd.turn_flags.stunned,
        }
    }
}

/// Only ever built for the viewer's own seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerPrivate {
    pub participant: ParticipantId,
    pub support_cards: Vec<SupportCardInstance>,
    pub draft_options: Vec<SupportCardCode>,
    pub hand: Vec<DuelCardCode>,
    pub pick_options: Vec<DuelCardCode>,
}

/// Everyone learns that something is pending and whose it is; the detail
/// is only filled for those allowed to see it.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingView {
    pub kind: InteractionKind,
    pub owner: ParticipantId,
    pub active: bool,
    pub detail: Option<PendingDetail>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingDetail {
    Question {
        prompt: String,
        choices: Vec<String>,
        reward_coins: u32,
        changed_once: bool,
    },
    Shop {
        offers: Vec<ShopOffer>,
    },
    Gun {
        damage: u32,
    },
    Duel(DuelView),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuelView {
    pub phase: DuelPhase,
    pub initiator: ParticipantId,
    pub opponent: Option<ParticipantId>,
    pub my_choice: Option<DuelChoice>,
    pub my_prediction: Option<DuelChoice>,
    pub initiator_committed: bool,
    pub opponent_committed: bool,
    pub initiator_predicted: bool,
    pub opponent_predicted: bool,
    pub reveal: Option<DuelReveal>,
    pub winner: Option<ParticipantId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub participant: ParticipantId,
    pub user_id: UserId,
    pub is_winner: bool,
    pub is_alive: bool,
    pub position: usize,
    pub hp: u32,
    pub coins: u32,
}

/// Entry point: project `game` for `viewer` (None = spectator).
/// Never panics; inconsistent states project with empty defaults.
pub fn snapshot(game: &Game, viewer: Option<UserId>) -> GameSnapshot {
    let me = viewer.and_then(|u| game.participant_for_user(u));

    let log_start = game.log.len().saturating_sub(SNAPSHOT_LOG_LEN);
    GameSnapshot {
        game_id: game.id,
        join_code: game.join_code.clone(),
        mode: game.mode,
        status: game.status,
        version: game.version,
        host: game.host,
        board_length: game.board_length,
        max_players: game.max_players,
        current_turn: game.current_participant_id(),
        winner: game.winner,
        rules: game.rules.clone(),
        tiles: game.tiles.clone(),
        participants: game.participants.iter().map(participant_public).collect(),
        pending: game
            .pending
            .as_ref()
            .map(|p| pending_view(p, me.map(|m| m.id))),
        ordering: game.ordering.clone(),
        viewer: me.map(viewer_private),
        leaderboard: (game.status == GameStatus::Finished).then(|| leaderboard(game)),
        log: game.log[log_start..].to_vec(),
    }
}

fn participant_public(p: &Participant) -> ParticipantPublic {
    ParticipantPublic {
        id: p.id,
        user_id: p.user_id,
        turn_order: p.turn_order,
        hp: p.hp,
        coins: p.coins,
        position: p.position,
        shield_points: p.shield_points,
        extra_rolls: p.extra_rolls,
        is_alive: p.is_alive,
        unused_cards: p.unused_cards().count(),
        draft_picks_done: p.draft.as_ref().map(|d| d.picks_done),
        card_duel: p.card_duel.as_ref().map(CardDuelPublic::of),
    }
}

fn viewer_private(p: &Participant) -> ViewerPrivate {
    let (hand, pick_options) = p
        .card_duel
        .as_ref()
        .map(|cd| (cd.hand.clone(), cd.pick_options.clone()))
        .unwrap_or_default();
    ViewerPrivate {
        participant: p.id,
        support_cards: p.support_cards.clone(),
        draft_options: p
            .draft
            .as_ref()
            .map(|d| d.options.clone())
            .unwrap_or_default(),
        hand,
        pick_options,
    }
}

fn pending_view(pending: &PendingInteraction, viewer: Option<ParticipantId>) -> PendingView {
    let owns = viewer.is_some_and(|v| pending.involves(v));
    let detail = match pending {
        PendingInteraction::Question(q) if owns => Some(PendingDetail::Question {
            prompt: q.question.prompt.clone(),
            choices: q.question.choices.clone(),
            reward_coins: q.reward_coins,
            changed_once: q.changed_once,
        }),
        PendingInteraction::Shop(s) if owns => Some(PendingDetail::Shop {
            offers: s.offers.clone(),
        }),
        PendingInteraction::Gun(g) if owns => Some(PendingDetail::Gun { damage: g.damage }),
        PendingInteraction::Duel(d) if owns || d.reveal.is_some() => {
            Some(PendingDetail::Duel(duel_view(d, viewer)))
        }
        _ => None,
    };
    PendingView {
        kind: pending.kind(),
        owner: pending.owner(),
        active: true,
        detail,
    }
}

fn duel_view(d: &DuelState, viewer: Option<ParticipantId>) -> DuelView {
    let mine = viewer.and_then(|v| d.side(v));
    DuelView {
        phase: d.phase,
        initiator: d.initiator.participant,
        opponent: d.opponent.map(|o| o.participant),
        my_choice: mine.and_then(|s| s.choice),
        my_prediction: mine.and_then(|s| s.prediction),
        initiator_committed: d.initiator.choice.is_some(),
        opponent_committed: d.opponent.is_some_and(|o| o.choice.is_some()),
        initiator_predicted: d.initiator.prediction.is_some(),
        opponent_predicted: d.opponent.is_some_and(|o| o.prediction.is_some()),
        reveal: d.reveal,
        winner: d.winner,
    }
}

/// Winner first, then survivors, then by progress: board position in board
/// modes, hp in Card-Duel; coins break ties.
fn leaderboard(game: &Game) -> Vec<LeaderboardEntry> {
    let mut seats: Vec<&Participant> = game.participants.iter().collect();
    let progress = |p: &Participant| match game.mode {
        GameMode::CardDuel | GameMode::Survival => p.hp as usize,
        _ => p.position,
    };
    seats.sort_by(|a, b| {
        let key = |p: &Participant| (game.winner == Some(p.id), p.is_alive, progress(p), p.coins);
        key(b).cmp(&key(a)).then(a.id.cmp(&b.id))
    });
    seats
        .into_iter()
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i + 1,
            participant: p.id,
            user_id: p.user_id,
            is_winner: game.winner == Some(p.id),
            is_alive: p.is_alive,
            position: p.position,
            hp: p.hp,
            coins: p.coins,
        })
        .collect()
}
