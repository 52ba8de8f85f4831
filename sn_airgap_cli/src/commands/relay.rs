// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::Result;
use sn_airgap::{
    Address, AuthorizationCodec, FeePolicy, Genesis, LedgerConfig, LedgerSimulator, Receipt,
};
use std::{collections::BTreeSet, path::Path};

/// What one relay run did.
pub(super) struct RelayReport {
    pub(super) ledger: LedgerSimulator,
    pub(super) height: u64,
    pub(super) receipts: Vec<Receipt>,
    /// Input index and reason, for authorizations the ledger refused outright.
    pub(super) rejected: Vec<(usize, String)>,
    /// Genesis accounts plus everyone the authorizations touch.
    pub(super) addresses: BTreeSet<Address>,
}

pub fn run(genesis: &Path, burn_fees: bool, authorizations: &[String]) -> Result<()> {
    let report = relay(genesis, burn_fees, authorizations)?;

    for (index, reason) in &report.rejected {
        println!("authorization #{index} rejected: {reason}");
    }
    for receipt in &report.receipts {
        println!("{receipt}");
    }
    println!("produced block {}", report.height);

    for address in &report.addresses {
        for height in 0..=report.height {
            let balance = report.ledger.balance_at(address, height)?;
            println!("balance of {address} at block level {height}: {balance}wei");
        }
    }
    Ok(())
}

pub(super) fn relay(
    genesis: &Path,
    burn_fees: bool,
    authorizations: &[String],
) -> Result<RelayReport> {
    let genesis = Genesis::from_file(genesis)?;
    let fee_policy = if burn_fees {
        FeePolicy::Burn
    } else {
        FeePolicy::default()
    };
    let ledger =
        LedgerSimulator::from_genesis(LedgerConfig::default().with_fee_policy(fee_policy), &genesis)?;

    let mut addresses: BTreeSet<Address> = genesis.alloc.keys().copied().collect();
    let mut handles = vec![];
    let mut rejected = vec![];

    for (index, text) in authorizations.iter().enumerate() {
        let auth = match AuthorizationCodec::decode_hex(text) {
            Ok(auth) => auth,
            Err(err) => {
                warn!("Authorization #{index} could not be decoded: {err}");
                rejected.push((index, err.to_string()));
                continue;
            }
        };
        let _ = addresses.insert(auth.intent.sender);
        let _ = addresses.insert(auth.intent.beneficiary());

        match ledger.submit(auth) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                warn!("Authorization #{index} was rejected: {err}");
                rejected.push((index, err.to_string()));
            }
        }
    }

    let height = ledger.produce_block()?;
    let mut receipts = vec![];
    for handle in handles {
        if let Some(receipt) = ledger.receipt(&handle.tx_hash)? {
            receipts.push(receipt);
        }
    }

    Ok(RelayReport {
        ledger,
        height,
        receipts,
        rejected,
        addresses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use eyre::Result;
    use sn_airgap::{Account, FeeParams, GenesisAlloc, DEFAULT_BLOCK_GAS_LIMIT, U256};

    #[test]
    fn relays_hex_against_genesis_file() -> Result<()> {
        let dir = TempDir::new()?;
        let genesis_path = dir.path().join("genesis.json");

        let mut alice = Account::generate()?;
        let bob = Account::generate()?;
        let mut alloc = GenesisAlloc::new();
        let _ = alloc.insert(alice.address(), U256::from(1_000_000u64));
        let genesis = Genesis::new(alloc, DEFAULT_BLOCK_GAS_LIMIT);
        genesis.write_to_file(&genesis_path)?;

        let fee = FeeParams::new(U256::from(1u64), 21_000);
        let good = alice.sign(alice.transfer_intent(
            genesis.chain_id,
            bob.address(),
            U256::from(100u64),
            fee,
        ))?;
        let unfunded = alice.sign(alice.transfer_intent(
            genesis.chain_id,
            bob.address(),
            U256::from(10_000_000u64),
            fee,
        ))?;
        let authorizations = vec![
            good.to_hex(),
            "0xnot-hex".to_string(),
            unfunded.to_hex(),
        ];

        let report = relay(&genesis_path, true, &authorizations)?;
        assert_eq!(report.height, 1);
        assert_eq!(report.receipts.len(), 1);
        assert!(report.receipts[0].is_applied());
        assert_eq!(
            report.rejected.iter().map(|(index, _)| *index).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(report.addresses.contains(&bob.address()));
        assert_eq!(
            report.ledger.balance_at(&alice.address(), 1)?,
            U256::from(1_000_000u64 - 100 - 21_000)
        );
        assert_eq!(report.ledger.burned_at(1)?, U256::from(21_000u64));
        Ok(())
    }
}
