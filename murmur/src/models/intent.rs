use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, Network};

/// A validated "send X to Y" command, ready for execution.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransferIntent {
    pub to: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub network: Network,
    /// The normalized utterance this intent was extracted from, kept for
    /// the audit record.
    pub transcript: String,
}

/// A validated "swap X for Y" command, ready for execution.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SwapIntent {
    pub amount: Decimal,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub network: Network,
    pub transcript: String,
}

/// Shape of the extraction model's transfer response before validation.
/// Every field is optional: the model may omit anything, and incomplete
/// extractions are dropped rather than treated as errors.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTransferExtraction {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

impl RawTransferExtraction {
    /// Validate into a [`TransferIntent`]. `None` means the extraction was
    /// incomplete or out of domain and the utterance is skipped.
    pub fn validate(self, transcript: &str) -> Option<TransferIntent> {
        let to = self.to.filter(|t| !t.trim().is_empty())?;
        let amount = self.amount.filter(|a| a.is_sign_positive() && !a.is_zero())?;
        let currency = self.currency?.parse::<Currency>().ok()?;
        let network = self.network?.parse::<Network>().ok()?;

        Some(TransferIntent {
            to,
            amount,
            currency,
            network,
            transcript: transcript.to_string(),
        })
    }
}

/// Shape of the extraction model's swap response before validation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSwapExtraction {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "fromCurrency")]
    pub from_currency: Option<String>,
    #[serde(default, alias = "toCurrency")]
    pub to_currency: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

impl RawSwapExtraction {
    pub fn validate(self, transcript: &str) -> Option<SwapIntent> {
        let amount = self.amount.filter(|a| a.is_sign_positive() && !a.is_zero())?;
        let from_currency = self.from_currency?.parse::<Currency>().ok()?;
        let to_currency = self.to_currency?.parse::<Currency>().ok()?;
        let network = self.network?.parse::<Network>().ok()?;

        Some(SwapIntent {
            amount,
            from_currency,
            to_currency,
            network,
            transcript: transcript.to_string(),
        })
    }
}
