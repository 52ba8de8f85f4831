// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::{eyre::eyre, Result};
use sn_airgap::{
    Account, Address, AuthorizationCodec, Bytes, FeeParams, SignedAuthorization, TransferIntent,
    U256,
};

pub struct SignArgs {
    pub sequence: u64,
    pub to: Option<Address>,
    pub amount: U256,
    pub gas_price: U256,
    pub gas_limit: Option<u64>,
    pub payload: Bytes,
    pub chain_id: u64,
}

pub fn address(secret_key: &str) -> Result<()> {
    let account = Account::from_secret_hex(secret_key)
        .map_err(|_| eyre!("Please provide a valid secret key in hex format"))?;
    println!("{}", account.address());
    Ok(())
}

pub fn sign(secret_key: &str, args: SignArgs) -> Result<()> {
    let auth = sign_authorization(secret_key, args)?;
    info!("Signed {}", auth.intent);
    println!("{}", AuthorizationCodec::encode_hex(&auth));
    Ok(())
}

pub(super) fn sign_authorization(secret_key: &str, args: SignArgs) -> Result<SignedAuthorization> {
    let mut account = Account::from_secret_hex(secret_key)
        .map_err(|_| eyre!("Please provide a valid secret key in hex format"))?;

    let fee = FeeParams::new(args.gas_price, args.gas_limit.unwrap_or_default());
    let mut intent = match args.to {
        Some(to) => TransferIntent::transfer(
            args.chain_id,
            account.address(),
            to,
            args.amount,
            args.sequence,
            fee,
        )
        .with_payload(args.payload),
        None => TransferIntent::deploy(
            args.chain_id,
            account.address(),
            args.payload,
            args.amount,
            args.sequence,
            fee,
        ),
    };
    if args.gas_limit.is_none() {
        intent.fee.gas_limit = intent.intrinsic_gas();
    }

    Ok(account.sign(intent)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Result;
    use sn_airgap::TX_GAS;

    const SECRET: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn args(to: Option<Address>) -> SignArgs {
        SignArgs {
            sequence: 1,
            to,
            amount: U256::from(5u64),
            gas_price: U256::from(2u64),
            gas_limit: None,
            payload: Bytes::new(),
            chain_id: 1337,
        }
    }

    #[test]
    fn gas_limit_defaults_to_intrinsic_gas() -> Result<()> {
        let auth = sign_authorization(SECRET, args(Some(Address::repeat_byte(1))))?;
        auth.verify()?;
        assert_eq!(auth.intent.fee.gas_limit, TX_GAS);
        Ok(())
    }

    #[test]
    fn missing_recipient_means_deployment() -> Result<()> {
        let mut args = args(None);
        args.payload = Bytes::from_static(&[0x60, 0x00]);
        let auth = sign_authorization(SECRET, args)?;
        assert!(auth.intent.kind.is_deploy());
        assert_eq!(auth.intent.payload, Bytes::from_static(&[0x60, 0x00]));
        Ok(())
    }

    #[test]
    fn zero_sequence_is_refused() {
        let mut args = args(Some(Address::repeat_byte(1)));
        args.sequence = 0;
        assert!(sign_authorization(SECRET, args).is_err());
    }
}
