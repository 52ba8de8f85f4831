// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{Address, U256};
use thiserror::Error;

/// Specialisation of `std::Result`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Errors raised while authorizing, transporting or relaying a transfer.
pub enum Error {
    #[error("Could not obtain key material from the entropy source: {0}")]
    EntropyError(String),
    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),
    #[error("Malformed authorization encoding: {0}")]
    MalformedEncoding(String),
    #[error("The ledger has already been initialized")]
    AlreadyInitialized,
    #[error("The ledger has not been initialized yet")]
    NotInitialized,
    #[error("Signature does not recover the sender {0}")]
    BadSignature(Address),
    #[error("Insufficient funds for {address}: {available} available, {required} required")]
    InsufficientFunds {
        address: Address,
        available: U256,
        required: U256,
    },
    #[error("Sequence {got} of {address} is not above the last used sequence {last}")]
    SequenceConflict { address: Address, last: u64, got: u64 },
    #[error("Submission became invalid before block production: {0}")]
    StaleSubmission(String),
    #[error("Unknown height {requested}, the chain is at height {current}")]
    UnknownHeight { requested: u64, current: u64 },
    #[error("Authorization is for chain {got}, this ledger runs chain {expected}")]
    WrongChain { expected: u64, got: u64 },
    #[error("Gas limit {gas_limit} exceeds the block gas limit {block_gas_limit}")]
    GasLimitExceeded { gas_limit: u64, block_gas_limit: u64 },
    #[error("Ledger state lock was poisoned")]
    StatePoisoned,
    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<alloy_rlp::Error> for Error {
    fn from(err: alloy_rlp::Error) -> Self {
        Self::MalformedEncoding(err.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::MalformedEncoding(format!("bad hex: {err}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
