//! Atomic grouping of operations.
//!
//! A group commits or rejects as a unit. The constructors here build the
//! well-formed shapes the rules expect: setup travels with both stakes,
//! a throw travels alone, and a refund travels with its payout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ops::{ActionMove, AppCall, GameOp, MoneyRefund, Operation, Payment, SetupPlayers};
use crate::game::entities::{Address, Score};

/// An ordered set of operations that commit or reject together.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AtomicGroup {
    ops: Vec<Operation>,
}

impl AtomicGroup {
    #[must_use]
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Setup group: the call leading both stake payments.
    #[must_use]
    pub fn setup(caller: Address, stake_x: Payment, stake_o: Payment) -> Self {
        Self::new(vec![
            Operation::AppCall(AppCall {
                sender: caller,
                op: GameOp::SetupPlayers(SetupPlayers),
            }),
            Operation::Payment(stake_x),
            Operation::Payment(stake_o),
        ])
    }

    /// Move group: the throw travels alone.
    #[must_use]
    pub fn action_move(caller: Address, point: Score) -> Self {
        Self::new(vec![Operation::AppCall(AppCall {
            sender: caller,
            op: GameOp::ActionMove(ActionMove { point }),
        })])
    }

    /// Refund group: the call leading the payout.
    #[must_use]
    pub fn refund(caller: Address, payout: Payment) -> Self {
        Self::new(vec![
            Operation::AppCall(AppCall {
                sender: caller,
                op: GameOp::MoneyRefund(MoneyRefund),
            }),
            Operation::Payment(payout),
        ])
    }

    #[must_use]
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The application calls in the group, in order.
    #[must_use]
    pub fn app_calls(&self) -> Vec<&AppCall> {
        self.ops.iter().filter_map(Operation::as_app_call).collect()
    }

    /// The payments in the group, in order.
    #[must_use]
    pub fn payments(&self) -> Vec<&Payment> {
        self.ops.iter().filter_map(Operation::as_payment).collect()
    }
}

/// Read-only view handed to each operation while its group validates:
/// the whole group, the operation's own index, and the submission
/// instant.
#[derive(Clone, Copy, Debug)]
pub struct GroupContext<'a> {
    pub group: &'a AtomicGroup,
    pub index: usize,
    pub now: DateTime<Utc>,
}

impl<'a> GroupContext<'a> {
    #[must_use]
    pub fn new(group: &'a AtomicGroup, index: usize, now: DateTime<Utc>) -> Self {
        Self { group, index, now }
    }

    /// Payments travelling alongside the operation under validation.
    #[must_use]
    pub fn sibling_payments(&self) -> Vec<&'a Payment> {
        self.group
            .ops()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self.index)
            .filter_map(|(_, op)| op.as_payment())
            .collect()
    }
}
