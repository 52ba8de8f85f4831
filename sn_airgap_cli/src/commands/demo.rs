// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::{eyre::eyre, Result};
use sn_airgap::{
    Account, Address, AuthorizationCodec, Bytes, FeeParams, GenesisAlloc, LedgerConfig,
    LedgerSimulator, Receipt, DEFAULT_BLOCK_GAS_LIMIT, U256,
};

/// 10 ETH in wei.
const GENESIS_BALANCE: u128 = 10_000_000_000_000_000_000;
/// 1 gwei.
const DEMO_GAS_PRICE: u64 = 1_000_000_000;
const DEMO_DEPLOY_GAS_LIMIT: u64 = 300_000;
/// Constructor prologue returning an empty runtime. Never executed, only stored.
const DEMO_INIT_CODE: &[u8] = &[
    0x60, 0x80, 0x60, 0x40, 0x52, 0x34, 0x80, 0x15, 0x60, 0x0f, 0x57, 0x60, 0x00, 0x80, 0xfd, 0x5b,
    0x50, 0x60, 0x3f, 0x80, 0x60, 0x1d, 0x60, 0x00, 0x39, 0x60, 0x00, 0xf3, 0xfe,
];
/// One block is produced, so this asks for one height past the tip.
const LAST_QUERIED_HEIGHT: u64 = 2;

pub(super) struct DemoOutcome {
    pub(super) ledger: LedgerSimulator,
    pub(super) hex: String,
    pub(super) receipt: Receipt,
    pub(super) account_a: Address,
    pub(super) account_b: Address,
}

pub fn run(amount: U256, deploy: bool) -> Result<()> {
    let outcome = execute(amount, deploy)?;

    println!("{}", outcome.hex);
    println!("{}", outcome.receipt);
    for (name, address) in [("A", outcome.account_a), ("B", outcome.account_b)] {
        for height in 0..=LAST_QUERIED_HEIGHT {
            match outcome.ledger.balance_at(&address, height) {
                Ok(balance) => {
                    println!("balance of {name} at block level {height}: {balance}wei")
                }
                Err(err) => println!("balance of {name} at block level {height}: {err}"),
            }
        }
    }
    Ok(())
}

pub(super) fn execute(amount: U256, deploy: bool) -> Result<DemoOutcome> {
    let mut account_a = Account::generate()?;
    let account_b = Account::generate()?;
    let (address_a, address_b) = (account_a.address(), account_b.address());

    let alloc: GenesisAlloc = [address_a, address_b]
        .into_iter()
        .map(|address| (address, U256::from(GENESIS_BALANCE)))
        .collect();
    let ledger = LedgerSimulator::new(LedgerConfig::default());
    ledger.initialize(alloc, DEFAULT_BLOCK_GAS_LIMIT)?;

    // offline: only the hex leaves this block
    let hex = {
        let chain_id = ledger.chain_id();
        let intent = if deploy {
            account_a.deploy_intent(
                chain_id,
                Bytes::from_static(DEMO_INIT_CODE),
                amount,
                FeeParams::new(U256::from(DEMO_GAS_PRICE), DEMO_DEPLOY_GAS_LIMIT),
            )
        } else {
            let mut intent = account_a.transfer_intent(
                chain_id,
                address_b,
                amount,
                FeeParams::new(U256::from(DEMO_GAS_PRICE), 0),
            );
            intent.fee.gas_limit = intent.intrinsic_gas();
            intent
        };
        AuthorizationCodec::encode_hex(&account_a.sign(intent)?)
    };
    info!("Signed offline: {hex}");

    // online
    let auth = AuthorizationCodec::decode_hex(&hex)?;
    let handle = ledger.submit(auth)?;
    let _ = ledger.produce_block()?;
    let receipt = ledger
        .receipt(&handle.tx_hash)?
        .ok_or_else(|| eyre!("No receipt for {}", handle.tx_hash))?;

    Ok(DemoOutcome {
        ledger,
        hex,
        receipt,
        account_a: address_a,
        account_b: address_b,
    })
}
