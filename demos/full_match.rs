//! Plays one complete wagered match from stakes to settlement, printing
//! the record's view after every accepted group.
//!
//! Set `RUST_LOG=debug` to also see the store's own transition log.

use anyhow::Error;
use chrono::{Duration, Utc};
use cornhole_engine::{Address, AtomicGroup, GameConfig, Payment, StateStore};

fn main() -> Result<(), Error> {
    env_logger::builder().format_target(false).init();

    let config = GameConfig::default();
    config.validate().map_err(Error::msg)?;
    let bet = config.bet_amount;
    let payout = config.payout_amount();

    let mut store = StateStore::new();
    let id = store.create(config);

    let alice = Address::new("alice");
    let bob = Address::new("bob");
    let escrow = Address::new("escrow-7");
    let mut now = Utc::now();

    // Both stakes land in one atomic group; Alice paid first, so she
    // is X and throws first.
    let setup = AtomicGroup::setup(
        alice.clone(),
        Payment::transfer(alice.clone(), escrow.clone(), bet),
        Payment::transfer(bob.clone(), escrow.clone(), bet),
    );
    let view = store.submit(id, &setup, now).map_err(Error::new)?;
    println!("stakes in escrow     {view}");

    let throws = [(alice.clone(), 1u8), (bob.clone(), 2)];
    for (caller, point) in throws {
        now += Duration::seconds(30);
        let view = store
            .submit(id, &AtomicGroup::action_move(caller.clone(), point), now)
            .map_err(Error::new)?;
        println!("{caller} throws {point}       {view}");
    }

    // Bob tries to throw twice in a row; the group bounces and the
    // record stays exactly as it was.
    now += Duration::seconds(30);
    if let Err(reason) = store.submit(id, &AtomicGroup::action_move(bob.clone(), 3), now) {
        println!("bob throws again     rejected: {reason}");
    }

    // Play on: a single, a miss, and the single that makes it 3:2.
    let throws = [(alice.clone(), 1u8), (bob.clone(), 0), (alice.clone(), 1)];
    for (caller, point) in throws {
        now += Duration::seconds(30);
        let view = store
            .submit(id, &AtomicGroup::action_move(caller.clone(), point), now)
            .map_err(Error::new)?;
        println!("{caller} throws {point}       {view}");
    }

    // Anyone may submit the settlement, but the payout itself must move
    // both stakes from the escrow to the winner.
    now += Duration::seconds(30);
    let refund = AtomicGroup::refund(
        bob.clone(),
        Payment::transfer(escrow.clone(), alice.clone(), payout),
    );
    let view = store.submit(id, &refund, now).map_err(Error::new)?;
    println!("escrow pays {payout}  {view}");

    let final_view = store.view(id).ok_or_else(|| Error::msg("record vanished"))?;
    println!("\nfinal record as served to pollers:");
    println!("{}", serde_json::to_string_pretty(&final_view)?);

    Ok(())
}
