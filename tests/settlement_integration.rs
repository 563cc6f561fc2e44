//! Settlement paths: refunds after a win by play, refunds by
//! forfeiture, structural checks on the payout, and the both-stakes
//! economic invariant.

use chrono::{DateTime, Duration, Utc};
use cornhole_engine::{
    Address, AtomicGroup, GameConfig, GameId, GameStatus, Payment, RejectReason, SettlementError,
    StateStore,
};

fn stake(from: &Address, escrow: &Address, amount: u64) -> Payment {
    Payment::transfer(from.clone(), escrow.clone(), amount)
}

fn setup_group(a: &Address, b: &Address, escrow: &Address, bet: u64) -> AtomicGroup {
    AtomicGroup::setup(a.clone(), stake(a, escrow, bet), stake(b, escrow, bet))
}

/// Store with one started match on `config`: A is X and holds the turn.
fn started_match(
    config: GameConfig,
    start: DateTime<Utc>,
) -> (StateStore, GameId, Address, Address, Address) {
    let mut store = StateStore::new();
    let bet = config.bet_amount;
    let id = store.create(config);
    let (a, b, escrow) = (
        Address::new("addr-a"),
        Address::new("addr-b"),
        Address::new("addr-escrow"),
    );
    store
        .submit(id, &setup_group(&a, &b, &escrow, bet), start)
        .expect("setup group should start the match");
    (store, id, a, b, escrow)
}

/// Started match that A has already won with a single 3-point throw.
fn won_by_play(start: DateTime<Utc>) -> (StateStore, GameId, Address, Address, Address) {
    let (mut store, id, a, b, escrow) = started_match(GameConfig::default(), start);
    store
        .submit(id, &AtomicGroup::action_move(a.clone(), 3), start)
        .expect("a 3-point throw should win outright");
    (store, id, a, b, escrow)
}

#[test]
fn test_refund_after_a_win_by_play_releases_both_stakes() {
    let start = Utc::now();
    let (mut store, id, a, _b, escrow) = won_by_play(start);
    let payout = stake(&escrow, &a, GameConfig::default().payout_amount());

    let view = store
        .submit(id, &AtomicGroup::refund(a, payout), start)
        .expect("payout of both stakes to the winner should settle");
    assert_eq!(view.status, GameStatus::XWon);
}

#[test]
fn test_refund_by_forfeiture_pays_the_waiting_player() {
    let start = Utc::now();
    let (mut store, id, a, b, escrow) = started_match(GameConfig::default(), start);

    // A throws a single, then B sits on the turn until the clock runs out.
    store
        .submit(id, &AtomicGroup::action_move(a.clone(), 1), start)
        .unwrap();
    let expired = start + Duration::seconds(3601);

    let payout = stake(&escrow, &a, GameConfig::default().payout_amount());
    let view = store
        .submit(id, &AtomicGroup::refund(b, payout), expired)
        .expect("the waiting player collects once the turn holder times out");
    assert_eq!(view.status, GameStatus::XWon, "A is X and wins by forfeiture");
    assert_eq!(
        store.read(id).unwrap().score_x,
        1,
        "forfeiture settles the status without inventing points"
    );
}

#[test]
fn test_refund_to_the_turn_holder_is_rejected() {
    let start = Utc::now();
    let (mut store, id, a, b, escrow) = started_match(GameConfig::default(), start);
    store
        .submit(id, &AtomicGroup::action_move(a.clone(), 1), start)
        .unwrap();
    let expired = start + Duration::seconds(3601);
    let before = store.read(id).unwrap();

    // B held the turn past the deadline, so B forfeited; a payout
    // routed back to B must bounce.
    let payout = stake(&escrow, &b, GameConfig::default().payout_amount());
    let result = store.submit(id, &AtomicGroup::refund(a, payout), expired);

    assert_eq!(
        result.unwrap_err(),
        RejectReason::PayoutInvalid(SettlementError::WrongReceiver)
    );
    assert_eq!(
        store.read(id).unwrap(),
        before,
        "a rejected settlement leaves the record in play"
    );
}

#[test]
fn test_refund_without_a_winner_is_rejected() {
    let start = Utc::now();
    let (mut store, id, a, b, escrow) = started_match(GameConfig::default(), start);
    let payout_amount = GameConfig::default().payout_amount();

    // No throw has landed and the clock is still running; nobody can
    // collect, no matter how the payout is shaped.
    let test_cases = vec![
        (stake(&escrow, &a, payout_amount), "clean payout to A"),
        (stake(&escrow, &b, payout_amount), "clean payout to B"),
        (stake(&escrow, &a, 1), "underpaying payout"),
        (
            stake(&Address::new("addr-mallory"), &a, payout_amount),
            "payout from a stranger",
        ),
    ];

    for (payout, label) in test_cases {
        let result = store.submit(id, &AtomicGroup::refund(a.clone(), payout), start);
        assert_eq!(
            result.unwrap_err(),
            RejectReason::NoWinnerYet,
            "{label} should fail on the missing winner, not its shape"
        );
    }

    // Same story on a record that has not even been set up.
    let mut fresh = StateStore::new();
    let fresh_id = fresh.create(GameConfig::default());
    let result = fresh.submit(
        fresh_id,
        &AtomicGroup::refund(a, stake(&escrow, &b, payout_amount)),
        start,
    );
    assert_eq!(result.unwrap_err(), RejectReason::NoWinnerYet);
}

#[test]
fn test_the_deadline_instant_is_not_yet_a_forfeit() {
    let start = Utc::now();
    let (mut store, id, a, _b, escrow) = started_match(GameConfig::default(), start);
    let deadline = start + Duration::seconds(3600);

    let payout = stake(&escrow, &a, GameConfig::default().payout_amount());
    let result = store.submit(id, &AtomicGroup::refund(a, payout), deadline);
    assert_eq!(
        result.unwrap_err(),
        RejectReason::NoWinnerYet,
        "forfeiture begins strictly after the deadline"
    );
}

#[test]
fn test_payout_structure_violations_are_rejected() {
    let start = Utc::now();
    let (mut store, id, a, _b, escrow) = won_by_play(start);
    let before = store.read(id).unwrap();
    let payout_amount = GameConfig::default().payout_amount();
    let bet = GameConfig::default().bet_amount;
    let clean = stake(&escrow, &a, payout_amount);

    let mut closing = clean.clone();
    closing.close_remainder_to = Some(Address::new("addr-mallory"));
    let mut rekeyed = clean.clone();
    rekeyed.rekey_to = Some(Address::new("addr-mallory"));

    let test_cases = vec![
        (
            clean.clone().with_fee(1_001),
            SettlementError::FeeTooHigh {
                fee: 1_001,
                max: 1_000,
            },
        ),
        (closing, SettlementError::RemainderRedirected),
        (rekeyed, SettlementError::AuthorityReassigned),
        (
            stake(&Address::new("addr-mallory"), &a, payout_amount),
            SettlementError::NotFromEscrow,
        ),
        (
            stake(&escrow, &a, bet),
            SettlementError::WrongAmount {
                got: bet,
                expected: payout_amount,
            },
        ),
        (
            stake(&escrow, &a, payout_amount + 1),
            SettlementError::WrongAmount {
                got: payout_amount + 1,
                expected: payout_amount,
            },
        ),
    ];

    for (payout, expected) in test_cases {
        let result = store.submit(id, &AtomicGroup::refund(a.clone(), payout), start);
        assert_eq!(result.unwrap_err(), RejectReason::PayoutInvalid(expected));
        assert_eq!(
            store.read(id).unwrap(),
            before,
            "a rejected payout leaves the record untouched"
        );
    }

    // The fee bound is inclusive; a payout at the bound still settles.
    let at_bound = clean.with_fee(1_000);
    assert!(store.submit(id, &AtomicGroup::refund(a, at_bound), start).is_ok());
}

#[test]
fn test_settlement_is_idempotent() {
    let start = Utc::now();
    let (mut store, id, a, _b, escrow) = won_by_play(start);
    let payout = stake(&escrow, &a, GameConfig::default().payout_amount());

    store
        .submit(id, &AtomicGroup::refund(a.clone(), payout.clone()), start)
        .unwrap();
    let settled = store.read(id).unwrap();

    let view = store
        .submit(id, &AtomicGroup::refund(a, payout), start)
        .expect("a replayed refund is accepted");
    assert_eq!(view.status, GameStatus::XWon);
    assert_eq!(
        store.read(id).unwrap(),
        settled,
        "replaying the refund changes nothing"
    );
}

#[test]
fn test_a_forfeited_match_rejects_late_throws_but_still_settles() {
    let start = Utc::now();
    let (mut store, id, a, b, escrow) = started_match(GameConfig::default(), start);
    let expired = start + Duration::seconds(7200);

    for caller in [a.clone(), b.clone()] {
        let result = store.submit(id, &AtomicGroup::action_move(caller, 1), expired);
        assert_eq!(result.unwrap_err(), RejectReason::DeadlinePassed);
    }

    // A held the turn the whole time, so B collects.
    let payout = stake(&escrow, &b, GameConfig::default().payout_amount());
    let view = store
        .submit(id, &AtomicGroup::refund(b.clone(), payout), expired)
        .unwrap();
    assert_eq!(view.status, GameStatus::OWon);

    let result = store.submit(id, &AtomicGroup::action_move(b, 1), expired);
    assert_eq!(result.unwrap_err(), RejectReason::GameAlreadyOver);
}

#[test]
fn test_the_payout_always_equals_the_stakes_paid_in() {
    let start = Utc::now();
    let test_cases = vec![1u64, 250, 1_000_000, u64::MAX / 4];

    for bet in test_cases {
        let config = GameConfig::new(bet, 3_600, 1_000);
        let staked = 2 * bet;
        assert_eq!(config.payout_amount(), staked);

        let (mut store, id, a, _b, escrow) = started_match(config, start);
        store
            .submit(id, &AtomicGroup::action_move(a.clone(), 3), start)
            .unwrap();

        let short = store.submit(
            id,
            &AtomicGroup::refund(a.clone(), stake(&escrow, &a, staked - 1)),
            start,
        );
        assert!(
            matches!(
                short.unwrap_err(),
                RejectReason::PayoutInvalid(SettlementError::WrongAmount { .. })
            ),
            "bet {bet}: the escrow may release exactly what was staked"
        );

        let exact = store.submit(
            id,
            &AtomicGroup::refund(a.clone(), stake(&escrow, &a, staked)),
            start,
        );
        assert!(exact.is_ok(), "bet {bet}: both stakes go back out whole");
    }
}

#[test]
fn test_an_oversized_bet_saturates_the_payout() {
    let start = Utc::now();
    let bet = u64::MAX / 2 + 1;
    let config = GameConfig::new(bet, 3_600, 1_000);
    assert!(
        config.validate().is_err(),
        "a bet past half the credit range never passes validation"
    );

    // A store fed the config anyway must still settle, comparing the
    // payout against the saturated doubling rather than a wrapped one.
    let (mut store, id, a, _b, escrow) = started_match(config, start);
    store
        .submit(id, &AtomicGroup::action_move(a.clone(), 3), start)
        .unwrap();

    let wrapped = 2u64.wrapping_mul(bet);
    let short = store.submit(
        id,
        &AtomicGroup::refund(a.clone(), stake(&escrow, &a, wrapped)),
        start,
    );
    assert_eq!(
        short.unwrap_err(),
        RejectReason::PayoutInvalid(SettlementError::WrongAmount {
            got: wrapped,
            expected: u64::MAX,
        })
    );

    let view = store
        .submit(
            id,
            &AtomicGroup::refund(a.clone(), stake(&escrow, &a, u64::MAX)),
            start,
        )
        .expect("the saturated payout settles");
    assert_eq!(view.status, GameStatus::XWon);
}
