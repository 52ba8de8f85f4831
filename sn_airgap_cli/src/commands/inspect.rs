// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::Result;
use sn_airgap::{AuthorizationCodec, IntentKind, SignedAuthorization};

pub fn inspect(authorization: &str) -> Result<()> {
    let auth = AuthorizationCodec::decode_hex(authorization)?;
    for line in describe(&auth) {
        println!("{line}");
    }
    Ok(())
}

fn describe(auth: &SignedAuthorization) -> Vec<String> {
    let intent = &auth.intent;
    let mut lines = vec![
        format!("tx hash:      {}", auth.hash()),
        format!("chain id:     {}", intent.chain_id),
        format!("sender:       {}", intent.sender),
        format!("sequence:     {}", intent.sequence),
    ];
    match intent.kind {
        IntentKind::Transfer { to } => lines.push(format!("to:           {to}")),
        IntentKind::Deploy => {
            if let Some(contract) = intent.contract_address() {
                lines.push(format!("deploys at:   {contract}"));
            }
        }
    }
    lines.push(format!("amount:       {}wei", intent.amount));
    lines.push(format!("gas price:    {}wei", intent.fee.gas_price));
    lines.push(format!(
        "gas limit:    {} (intrinsic {})",
        intent.fee.gas_limit,
        intent.intrinsic_gas()
    ));
    if let Some(max_cost) = intent.max_cost() {
        lines.push(format!("max cost:     {max_cost}wei"));
    }
    lines.push(format!("payload:      {} bytes", intent.payload.len()));
    lines.push(match auth.verify() {
        Ok(()) => "signature:    valid".to_string(),
        Err(err) => format!("signature:    INVALID ({err})"),
    });
    lines
}
