//! Operations a caller may submit: application calls carrying game
//! actions, and payments moving staked funds.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::group::GroupContext;
use crate::game::entities::{Address, Credits, GameState, Score};
use crate::game::state_machine::{TransitionResult, TransitionRule};

/// Starts a match. Pairs with the two stake payments in its group.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SetupPlayers;

/// A throw by the player holding the turn, worth `point` points.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionMove {
    pub point: Score,
}

/// Settles the stakes. Pairs with the payout payment in its group.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MoneyRefund;

/// Game actions an application call can carry.
#[enum_dispatch(TransitionRule)]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameOp {
    SetupPlayers(SetupPlayers),
    ActionMove(ActionMove),
    MoneyRefund(MoneyRefund),
}

impl fmt::Display for GameOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::SetupPlayers(_) => "setup players".to_string(),
            Self::ActionMove(action) => format!("a throw for {} points", action.point),
            Self::MoneyRefund(_) => "money refund".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// An application call against the match record.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppCall {
    pub sender: Address,
    pub op: GameOp,
}

/// A funds transfer between two identities.
///
/// `close_remainder_to` and `rekey_to` mirror the ledger's settlement
/// side channels; both must stay empty on any payout the engine accepts.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payment {
    pub sender: Address,
    pub receiver: Address,
    pub amount: Credits,
    pub fee: Credits,
    pub close_remainder_to: Option<Address>,
    pub rekey_to: Option<Address>,
}

impl Payment {
    /// Plain transfer with no fee and no side channels.
    #[must_use]
    pub fn transfer(sender: Address, receiver: Address, amount: Credits) -> Self {
        Self {
            sender,
            receiver,
            amount,
            fee: 0,
            close_remainder_to: None,
            rekey_to: None,
        }
    }

    /// Attach a fee to the transfer.
    #[must_use]
    pub fn with_fee(mut self, fee: Credits) -> Self {
        self.fee = fee;
        self
    }
}

/// One submitted operation: a game call or a payment.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Operation {
    AppCall(AppCall),
    Payment(Payment),
}

impl Operation {
    /// The identity that signed the operation.
    #[must_use]
    pub fn sender(&self) -> &Address {
        match self {
            Self::AppCall(call) => &call.sender,
            Self::Payment(payment) => &payment.sender,
        }
    }

    #[must_use]
    pub fn as_app_call(&self) -> Option<&AppCall> {
        match self {
            Self::AppCall(call) => Some(call),
            Self::Payment(_) => None,
        }
    }

    #[must_use]
    pub fn as_payment(&self) -> Option<&Payment> {
        match self {
            Self::AppCall(_) => None,
            Self::Payment(payment) => Some(payment),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::AppCall(call) => format!("{} submits {}", call.sender, call.op),
            Self::Payment(payment) => format!(
                "{} pays {} to {}",
                payment.sender, payment.amount, payment.receiver
            ),
        };
        write!(f, "{repr}")
    }
}
