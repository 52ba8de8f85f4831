// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{codec, Address, Bytes, Error, Result, B256, U256};
use alloy::primitives::keccak256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gas charged for every plain transfer.
pub const TX_GAS: u64 = 21_000;
/// Gas charged for every deployment.
pub const TX_GAS_CONTRACT_CREATION: u64 = 53_000;
/// Gas per zero byte of payload.
pub const TX_DATA_ZERO_GAS: u64 = 4;
/// Gas per non-zero byte of payload.
pub const TX_DATA_NON_ZERO_GAS: u64 = 16;
/// Gas per 32 byte word of deployment init code.
pub const INIT_CODE_WORD_GAS: u64 = 2;
/// Largest payload accepted, on either side of the air gap.
pub const MAX_PAYLOAD_SIZE: usize = 2 * 24_576;

/// What a [`TransferIntent`] does with its amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    /// Move the amount to an existing identifier.
    Transfer { to: Address },
    /// Create a new contract account from the payload, funded with the amount.
    Deploy,
}

impl IntentKind {
    /// The recipient, if this is a plain transfer.
    pub fn to(&self) -> Option<Address> {
        match self {
            Self::Transfer { to } => Some(*to),
            Self::Deploy => None,
        }
    }

    pub fn is_deploy(&self) -> bool {
        matches!(self, Self::Deploy)
    }
}

/// Gas price and gas limit of an intent. Their product is the most the sender can be charged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeParams {
    pub gas_price: U256,
    pub gas_limit: u64,
}

impl FeeParams {
    pub fn new(gas_price: U256, gas_limit: u64) -> Self {
        Self {
            gas_price,
            gas_limit,
        }
    }

    /// `gas_price * gas_limit`, `None` on overflow.
    pub fn ceiling(&self) -> Option<U256> {
        self.gas_price.checked_mul(U256::from(self.gas_limit))
    }

    /// Fee owed for `gas_used`, `None` on overflow.
    pub fn charge(&self, gas_used: u64) -> Option<U256> {
        self.gas_price.checked_mul(U256::from(gas_used))
    }
}

/// An unsigned description of a value movement.
///
/// Once signed into a [`crate::SignedAuthorization`] it cannot be changed without
/// invalidating the signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferIntent {
    /// Chain the intent is valid on. Bound into the signature.
    pub chain_id: u64,
    pub sender: Address,
    pub kind: IntentKind,
    pub amount: U256,
    /// Unique per sender, strictly increasing.
    pub sequence: u64,
    pub fee: FeeParams,
    /// Opaque to the ledger. Init code for deployments.
    pub payload: Bytes,
}

impl TransferIntent {
    /// A plain value transfer with no payload.
    pub fn transfer(
        chain_id: u64,
        sender: Address,
        to: Address,
        amount: U256,
        sequence: u64,
        fee: FeeParams,
    ) -> Self {
        Self {
            chain_id,
            sender,
            kind: IntentKind::Transfer { to },
            amount,
            sequence,
            fee,
            payload: Bytes::new(),
        }
    }

    /// A deployment carrying `init_code` as its payload.
    pub fn deploy(
        chain_id: u64,
        sender: Address,
        init_code: Bytes,
        amount: U256,
        sequence: u64,
        fee: FeeParams,
    ) -> Self {
        Self {
            chain_id,
            sender,
            kind: IntentKind::Deploy,
            amount,
            sequence,
            fee,
            payload: init_code,
        }
    }

    /// Attach a payload, replacing any present.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Gas consumed by this intent regardless of what the payload is.
    pub fn intrinsic_gas(&self) -> u64 {
        let base = if self.kind.is_deploy() {
            TX_GAS_CONTRACT_CREATION
        } else {
            TX_GAS
        };

        let data_gas: u64 = self
            .payload
            .iter()
            .map(|byte| {
                if *byte == 0 {
                    TX_DATA_ZERO_GAS
                } else {
                    TX_DATA_NON_ZERO_GAS
                }
            })
            .sum();

        let init_code_gas = if self.kind.is_deploy() {
            (self.payload.len() as u64).div_ceil(32) * INIT_CODE_WORD_GAS
        } else {
            0
        };

        base + data_gas + init_code_gas
    }

    /// Fee actually charged when the intent is applied.
    pub fn fee(&self) -> Option<U256> {
        self.fee.charge(self.intrinsic_gas())
    }

    /// `amount + fee ceiling`, the balance a sender needs to have the intent accepted.
    pub fn max_cost(&self) -> Option<U256> {
        self.fee
            .ceiling()
            .and_then(|ceiling| ceiling.checked_add(self.amount))
    }

    /// `amount + fee`, what the sender is debited when the intent is applied.
    pub fn cost(&self) -> Option<U256> {
        self.fee().and_then(|fee| fee.checked_add(self.amount))
    }

    /// Address the deployed payload will live at, for deployments.
    pub fn contract_address(&self) -> Option<Address> {
        if self.kind.is_deploy() {
            Some(self.sender.create(self.sequence))
        } else {
            None
        }
    }

    /// Where the amount ends up once applied.
    pub fn beneficiary(&self) -> Address {
        match self.kind {
            IntentKind::Transfer { to } => to,
            IntentKind::Deploy => self.sender.create(self.sequence),
        }
    }

    /// Canonical bytes the signature is computed over.
    pub fn bytes_for_signing(&self) -> Vec<u8> {
        codec::encode_intent(self)
    }

    /// Keccak-256 of [`Self::bytes_for_signing`].
    pub fn signing_hash(&self) -> B256 {
        keccak256(self.bytes_for_signing())
    }

    /// Checks that do not need ledger state. Used before signing and on submission.
    pub fn validate(&self) -> Result<()> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::InvalidIntent(format!(
                "payload of {} bytes exceeds the {MAX_PAYLOAD_SIZE} byte limit",
                self.payload.len()
            )));
        }
        let intrinsic_gas = self.intrinsic_gas();
        if self.fee.gas_limit < intrinsic_gas {
            return Err(Error::InvalidIntent(format!(
                "gas limit {} is below the intrinsic gas {intrinsic_gas}",
                self.fee.gas_limit
            )));
        }
        if self.max_cost().is_none() {
            return Err(Error::InvalidIntent(
                "amount plus fee ceiling overflows".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for TransferIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IntentKind::Transfer { to } => write!(
                f,
                "transfer of {} from {} to {to} (seq {}, chain {})",
                self.amount, self.sender, self.sequence, self.chain_id
            ),
            IntentKind::Deploy => write!(
                f,
                "deployment of {} bytes by {} funded with {} (seq {}, chain {})",
                self.payload.len(),
                self.sender,
                self.amount,
                self.sequence,
                self.chain_id
            ),
        }
    }
}
