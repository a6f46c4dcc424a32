//! Prompt templates for intent extraction.
//!
//! These templates use basic `format!()` interpolation for type safety.

/// System instruction for extracting a transfer intent from one utterance.
///
/// The known usernames are supplied as grounding context so the model maps
/// spoken names onto registered recipients instead of inventing handles.
pub fn transfer_extraction_prompt(usernames: &[String]) -> String {
    let usernames_list = usernames.join(", ");

    format!(
        r#"The user will provide you with a text transcription of a spoken request to create a blockchain transaction.
Extract the recipient, amount, currency, and network from the transaction message.
Output a structured JSON object with 'to' for the recipient username, 'amount' for the amount, 'currency' for the currency, and 'network' for the network.
Use 'USDC' for dollar amounts, otherwise use 'ETH'.
The network must be one of: base, polygon, arbitrum, ethereum. If no network is mentioned, use 'base'.
Omit any field you cannot determine from the message.
Here are the available usernames: {usernames_list}."#
    )
}

/// System instruction for extracting a swap intent from one utterance.
pub fn swap_extraction_prompt() -> String {
    r#"The user will provide you with a text transcription of a spoken request to swap one currency for another.
Extract the amount, the currency to swap from, the currency to swap to, and the network.
Output a structured JSON object with 'amount', 'from_currency', 'to_currency', and 'network'.
Currencies must be 'USDC' or 'ETH'. Use 'USDC' for dollar amounts.
The network must be one of: base, polygon, arbitrum, ethereum. If no network is mentioned, use 'base'.
Omit any field you cannot determine from the message."#
        .to_string()
}
