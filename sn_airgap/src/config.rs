// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::Address;
use serde::{Deserialize, Serialize};

/// Chain id of the simulated ledger unless configured otherwise.
pub const DEFAULT_CHAIN_ID: u64 = 1337;
/// Block gas limit of the simulated ledger unless configured otherwise.
pub const DEFAULT_BLOCK_GAS_LIMIT: u64 = 4_712_388;

/// What happens to the fee of an applied transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeePolicy {
    /// The fee leaves circulation.
    Burn,
    /// The fee is credited to this collector.
    Collect(Address),
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::Collect(Address::ZERO)
    }
}

/// Static parameters of a [`crate::LedgerSimulator`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Authorizations for any other chain are rejected.
    pub chain_id: u64,
    pub fee_policy: FeePolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            fee_policy: FeePolicy::default(),
        }
    }
}

impl LedgerConfig {
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_fee_policy(mut self, fee_policy: FeePolicy) -> Self {
        self.fee_policy = fee_policy;
        self
    }
}
