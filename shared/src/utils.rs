//! # Shared Utility Functions
//!
//! Common utility functions used by the client and any tooling that displays
//! linked wallet addresses.
//!
//! ## Address Formatting
//!
//! Functions for formatting `0x`-prefixed wallet addresses for display:
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - Keeps the `0x` prefix plus four hex digits on each side
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
//! let formatted = format_address(address, 6, 4);
//! assert_eq!(formatted, "0xf39F...2266");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Arguments
///
/// * `address` - The wallet address to format
/// * `prefix_len` - Number of characters to show at the start (including any `0x`)
/// * `suffix_len` - Number of characters to show at the end
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
/// assert_eq!(format_address(addr, 6, 4), "0xf39F...2266");
/// assert_eq!(format_address(addr, 8, 6), "0xf39Fd6...b92266");
/// assert_eq!(format_address("0x12", 6, 4), "0x12");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    // Also guard against individual lengths exceeding address length to prevent panics
    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
        || !address.is_ascii()
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format a wallet address keeping `0x` plus four characters up front and four at the end.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
/// assert_eq!(truncate_address(addr), "0xf39F...2266");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(ADDR, 6, 4), "0xf39F...2266");
        assert_eq!(format_address(ADDR, 2, 2), "0x...66");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("0x1234", 6, 4), "0x1234");
        assert_eq!(format_address("", 6, 4), "");
    }

    #[test]
    fn test_format_address_non_ascii_is_untouched() {
        let odd = "0xé9Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        assert_eq!(format_address(odd, 6, 4), odd);
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address(ADDR), "0xf39F...2266");
    }
}
