use murmur::llm::prompts::{swap_extraction_prompt, transfer_extraction_prompt};

#[test]
fn transfer_prompt_includes_known_usernames() {
    let usernames = vec!["alice".to_string(), "bob".to_string()];
    let prompt = transfer_extraction_prompt(&usernames);

    assert!(prompt.contains("alice, bob"));
    assert!(prompt.contains("'to'"));
    assert!(prompt.contains("'amount'"));
    assert!(prompt.contains("'currency'"));
    assert!(prompt.contains("'network'"));
}

#[test]
fn transfer_prompt_pins_currency_and_network_domains() {
    let prompt = transfer_extraction_prompt(&[]);
    assert!(prompt.contains("USDC"));
    assert!(prompt.contains("ETH"));
    assert!(prompt.contains("base, polygon, arbitrum, ethereum"));
}

#[test]
fn swap_prompt_names_both_currency_fields() {
    let prompt = swap_extraction_prompt();
    assert!(prompt.contains("'from_currency'"));
    assert!(prompt.contains("'to_currency'"));
    assert!(prompt.contains("'amount'"));
    assert!(prompt.contains("base, polygon, arbitrum, ethereum"));
}
