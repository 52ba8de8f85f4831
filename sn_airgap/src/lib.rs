// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Detached transfer authorization.
//!
//! An [`Account`] signs a [`TransferIntent`] in one context. The resulting
//! [`SignedAuthorization`] crosses the air gap as bytes or hex through the
//! [`AuthorizationCodec`], and is relayed to a [`LedgerSimulator`] in another
//! context, which applies it when a block is produced.

#[macro_use]
extern crate tracing;

mod account;
mod authorization;
mod codec;
mod config;
mod error;
mod genesis;
mod intent;
mod ledger;

/// Types used in the public API
pub use crate::{
    account::Account,
    authorization::{AuthSignature, SignedAuthorization},
    codec::AuthorizationCodec,
    config::{FeePolicy, LedgerConfig, DEFAULT_BLOCK_GAS_LIMIT, DEFAULT_CHAIN_ID},
    error::{Error, Result},
    genesis::{Genesis, GenesisAccount, GenesisAlloc},
    intent::{FeeParams, IntentKind, TransferIntent},
    ledger::{Block, LedgerSimulator, PendingHandle, Receipt, ReceiptStatus},
};

/// Gas schedule and limits
pub use crate::intent::{
    INIT_CODE_WORD_GAS, MAX_PAYLOAD_SIZE, TX_DATA_NON_ZERO_GAS, TX_DATA_ZERO_GAS, TX_GAS,
    TX_GAS_CONTRACT_CREATION,
};

// re-export primitives used in our public API
pub use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
