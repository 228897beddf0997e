use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;

use crate::entity::SwapError;

/// Restore the signing account from a hex private key (with or without `0x`).
///
/// The key itself never appears in the error.
pub fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner, SwapError> {
    PrivateKeySigner::from_str(private_key.trim())
        .map_err(|_| SwapError::Config("PRIVATE_KEY is not a valid secp256k1 hex key".to_string()))
}

/// Parse an EVM address, naming the setting it came from on failure
pub fn parse_address(value: &str, name: &str) -> Result<Address, SwapError> {
    Address::from_str(value.trim())
        .map_err(|e| SwapError::Config(format!("{} is not a valid address: {}", name, e)))
}

/// Shorten address for display
pub fn shorten_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first development account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn restores_signer_with_and_without_prefix() {
        let with_prefix = signer_from_private_key(DEV_KEY).unwrap();
        let without_prefix = signer_from_private_key(&DEV_KEY[2..]).unwrap();

        assert_eq!(with_prefix.address(), without_prefix.address());
        assert_eq!(
            with_prefix.address(),
            parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266", "TEST").unwrap()
        );
    }

    #[test]
    fn rejects_garbage_key_without_echoing_it() {
        let err = signer_from_private_key("not-a-key").unwrap_err();
        assert!(!err.to_string().contains("not-a-key"));
    }

    #[test]
    fn names_the_setting_on_bad_address() {
        let err = parse_address("0x1234", "ROUTER_ADDRESS").unwrap_err();
        assert!(err.to_string().contains("ROUTER_ADDRESS"));
    }

    #[test]
    fn shortens_checksummed_address() {
        let address = parse_address("0x4200000000000000000000000000000000000006", "T").unwrap();
        assert_eq!(shorten_address(&address), "0x4200...0006");
    }
}
