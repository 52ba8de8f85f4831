// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Returned by a successful submission. The transfer is queued, not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingHandle {
    pub tx_hash: B256,
    pub sender: Address,
    pub sequence: u64,
    /// Position in the pending queue at the time of submission.
    pub queue_position: usize,
}

/// Outcome of a queued transfer once a block has dealt with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Applied {
        gas_used: u64,
        fee: U256,
        /// Set for deployments.
        contract_address: Option<Address>,
    },
    Dropped {
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: B256,
    pub sender: Address,
    pub sequence: u64,
    /// Height of the block that applied or dropped the transfer.
    pub height: u64,
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn is_applied(&self) -> bool {
        matches!(self.status, ReceiptStatus::Applied { .. })
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ReceiptStatus::Applied {
                gas_used,
                fee,
                contract_address: Some(contract),
            } => write!(
                f,
                "{} applied at height {}: deployed {contract}, gas {gas_used}, fee {fee}",
                self.tx_hash, self.height
            ),
            ReceiptStatus::Applied { gas_used, fee, .. } => write!(
                f,
                "{} applied at height {}: gas {gas_used}, fee {fee}",
                self.tx_hash, self.height
            ),
            ReceiptStatus::Dropped { reason } => write!(
                f,
                "{} dropped at height {}: {reason}",
                self.tx_hash, self.height
            ),
        }
    }
}

/// Record of one produced block. Height 0 is the genesis record and carries no transfers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub applied: Vec<B256>,
    pub dropped: Vec<B256>,
    /// Transfers left in the queue for a later block.
    pub deferred: usize,
}
