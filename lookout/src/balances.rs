//! Bank balance models and conversion of raw base denomination amounts into display units.
use bigdecimal::num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::registry::{AssetInfo, AssetsInfo};

/// A single coin balance as reported by the bank module. The amount is kept as the decimal
/// string the chain returns since it can exceed any native integer width.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct BalanceEntry {
    pub denom: String,
    pub amount: String,
}

impl BalanceEntry {
    pub fn new(denom: &str, amount: &str) -> Self {
        BalanceEntry {
            denom: denom.to_string(),
            amount: amount.to_string(),
        }
    }
}

/// Body of `GET /cosmos/bank/v1beta1/balances/{address}`. Errors are reported in-band through
/// a non-zero `code`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancesResponse {
    pub balances: Vec<BalanceEntry>,
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl BalancesResponse {
    /// The backend's error message if the response carries a non-zero code.
    pub fn application_error(&self) -> Option<String> {
        match self.code {
            Some(code) if code != 0 => Some(
                self.message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Failed to fetch balances".to_string()),
            ),
            _ => None,
        }
    }
}

/// A balance ready for display.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FormattedBalance {
    pub name: String,
    pub denom: String,
    pub display_amount: String,
    pub display_denom: String,
}

/// Formats a raw balance using the chain's asset metadata.
///
/// Denoms without metadata are passed through unscaled. Otherwise the amount is divided by
/// `10^exponent` of the asset's display unit and rendered with exactly `exponent` fractional
/// digits. All arithmetic is done on arbitrary-precision integers.
pub fn format_balance(entry: &BalanceEntry, assets: &AssetsInfo) -> FormattedBalance {
    match assets.get(&entry.denom) {
        Some(info) => format_with_asset(entry, info),
        None => FormattedBalance {
            name: entry.denom.clone(),
            denom: entry.denom.clone(),
            display_amount: entry.amount.clone(),
            display_denom: entry.denom.clone(),
        },
    }
}

/// Formats every entry, keeping the backend's order.
pub fn format_balances(entries: &[BalanceEntry], assets: &AssetsInfo) -> Vec<FormattedBalance> {
    entries.iter().map(|e| format_balance(e, assets)).collect()
}

fn format_with_asset(entry: &BalanceEntry, info: &AssetInfo) -> FormattedBalance {
    let scaled = info
        .display_unit()
        .filter(|unit| unit.exponent > 0)
        .and_then(|unit| {
            scale_amount(&entry.amount, unit.exponent).map(|amount| (amount, unit.denom.clone()))
        });

    let (display_amount, display_denom) =
        scaled.unwrap_or_else(|| (entry.amount.clone(), info.symbol.clone()));

    FormattedBalance {
        name: info.name.clone(),
        denom: entry.denom.clone(),
        display_amount,
        display_denom,
    }
}

/// Renders `amount / 10^exponent` in fixed-point notation. `None` if `amount` is not a
/// non-negative integer.
fn scale_amount(amount: &str, exponent: u32) -> Option<String> {
    let mut digits = BigInt::from_str(amount).ok()?.to_string();
    if digits.starts_with('-') {
        return None;
    }

    let exponent = exponent as usize;
    if digits.len() <= exponent {
        digits = format!("{}{}", "0".repeat(exponent + 1 - digits.len()), digits);
    }
    let (whole, fraction) = digits.split_at(digits.len() - exponent);

    Some(format!("{}.{}", whole, fraction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DenomUnit;
    use assay::assay;

    fn atom_assets() -> AssetsInfo {
        AssetsInfo::defaults_for("cosmoshub")
    }

    #[assay]
    fn scales_by_display_exponent() {
        let formatted = format_balance(&BalanceEntry::new("uatom", "1000000"), &atom_assets());

        assert_eq!(
            formatted,
            FormattedBalance {
                name: "Cosmos Hub".to_string(),
                denom: "uatom".to_string(),
                display_amount: "1.000000".to_string(),
                display_denom: "atom".to_string(),
            }
        );
    }

    #[assay]
    fn scales_zero_and_dust() {
        let assets = atom_assets();

        assert_eq!(
            format_balance(&BalanceEntry::new("uatom", "0"), &assets).display_amount,
            "0.000000"
        );
        assert_eq!(
            format_balance(&BalanceEntry::new("uatom", "42"), &assets).display_amount,
            "0.000042"
        );
        assert_eq!(
            format_balance(&BalanceEntry::new("uatom", "123456789"), &assets).display_amount,
            "123.456789"
        );
    }

    #[assay]
    fn keeps_precision_of_huge_amounts() {
        let assets: AssetsInfo = vec![AssetInfo {
            base_denom: "aevmos".to_string(),
            name: "Evmos".to_string(),
            symbol: "EVMOS".to_string(),
            display_denom: "evmos".to_string(),
            denom_units: vec![DenomUnit::new("aevmos", 0), DenomUnit::new("evmos", 18)],
        }]
        .into_iter()
        .collect();
        let formatted = format_balance(
            &BalanceEntry::new("aevmos", "340282366920938463463374607431768211457123"),
            &assets,
        );

        assert_eq!(
            formatted.display_amount,
            "340282366920938463463374.607431768211457123"
        );
        assert_eq!(formatted.display_denom, "evmos");
    }

    #[assay]
    fn passes_unknown_denom_through() {
        let denom = "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";
        let formatted = format_balance(&BalanceEntry::new(denom, "5000000"), &atom_assets());

        assert_eq!(formatted.name, denom);
        assert_eq!(formatted.denom, denom);
        assert_eq!(formatted.display_amount, "5000000");
        assert_eq!(formatted.display_denom, denom);
    }

    #[assay]
    fn zero_exponent_uses_symbol() {
        let assets: AssetsInfo = vec![AssetInfo {
            base_denom: "ustars".to_string(),
            name: "Stargaze".to_string(),
            symbol: "STARS".to_string(),
            display_denom: "ustars".to_string(),
            denom_units: vec![DenomUnit::new("ustars", 0)],
        }]
        .into_iter()
        .collect();
        let formatted = format_balance(&BalanceEntry::new("ustars", "987"), &assets);

        assert_eq!(formatted.display_amount, "987");
        assert_eq!(formatted.display_denom, "STARS");
    }

    #[assay]
    fn malformed_amount_is_not_scaled() {
        let formatted = format_balance(&BalanceEntry::new("uatom", "12.5"), &atom_assets());

        assert_eq!(formatted.display_amount, "12.5");
        assert_eq!(formatted.display_denom, "ATOM");
    }

    #[assay]
    fn formatting_is_idempotent() {
        let assets = atom_assets();
        let entries = vec![
            BalanceEntry::new("uatom", "1000000"),
            BalanceEntry::new("uosmo", "25000000"),
        ];

        assert_eq!(
            format_balances(&entries, &assets),
            format_balances(&entries, &assets)
        );
    }

    #[assay]
    fn reads_application_error() {
        let response: BalancesResponse =
            serde_json::from_str(r#"{"code":3,"message":"invalid address","details":[]}"#)
                .unwrap();
        assert_eq!(response.application_error(), Some("invalid address".to_string()));

        let response: BalancesResponse = serde_json::from_str(r#"{"code":13}"#).unwrap();
        assert_eq!(
            response.application_error(),
            Some("Failed to fetch balances".to_string())
        );

        let response: BalancesResponse = serde_json::from_str(
            r#"{"balances":[{"denom":"uatom","amount":"5"}],"pagination":{"next_key":null,"total":"1"}}"#,
        )
        .unwrap();
        assert_eq!(response.application_error(), None);
        assert_eq!(response.balances, vec![BalanceEntry::new("uatom", "5")]);
    }
}
