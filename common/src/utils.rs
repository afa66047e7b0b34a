use std::fmt;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::errors::WalletError;
use crate::{impl_display_for_enum, impl_from_str_for_enum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Deposit,
    Withdraw,
}

impl_from_str_for_enum!(TxType, WalletError::invalid_tx_type(), Deposit => "deposit", Withdraw => "withdraw");
impl_display_for_enum!(TxType, Deposit => "deposit", Withdraw => "withdraw");

// `type` stays a plain string so an unknown value reaches the ledger and is
// rejected there as an invalid argument instead of a body parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWalletRequest {
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: String,
}

// 2^96, the first magnitude a Decimal cannot hold
const DECIMAL_LIMIT: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// Accepts a JSON number only if it converts to a `Decimal` without rounding.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> de::Visitor<'de> for AmountVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a numeric amount")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            if !v.is_finite() || v.abs() >= DECIMAL_LIMIT {
                return Err(E::custom("Amount out of range"));
            }
            // f64 Display never uses an exponent, so this is the full expansion
            Decimal::from_str_exact(&v.to_string())
                .map_err(|_| E::custom("Amount has too many decimal places"))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWalletResponse {
    pub message: String,
    pub balance: Decimal,
}
