//! Markdown notification text for a resolved swap.

use crate::handlers::{
    swap::{Direction, ResolvedSwap},
    PipelineConfig,
};

/// Characters kept on each side when shortening addresses and hashes
const SHORT_PREFIX: usize = 6;
const SHORT_SUFFIX: usize = 4;

/// Render the notification for one swap.
///
/// Output is a pure function of its inputs, so the same swap always renders
/// to the same text.
pub fn format_swap_message(config: &PipelineConfig, swap: &ResolvedSwap, tx_hash: &str) -> String {
    let links = &config.links;
    let account = swap.account.to_checksum(None);

    let headline = match swap.direction {
        Direction::Bought => format!("🟢 Bought {}", config.token0.ticker),
        Direction::Sold => format!("🔴 Sold {}", config.token0.ticker),
        Direction::Indeterminate => format!("⚪ Swapped {}", config.token0.ticker),
    };

    format!(
        "Account: [{short_account}]({explorer}/address/{account})\n\
         {headline}\n\
         {ticker_in} {amount_in:.6} ➡ {ticker_out} {amount_out:.6}\n\
         On [{dex} {pair}]({pool_info}/{contract}) @ [{short_tx}]({explorer}/tx/{tx_hash})",
        short_account = shorten(&account),
        explorer = links.explorer_url,
        ticker_in = swap.amount_in.ticker,
        amount_in = swap.amount_in.amount,
        ticker_out = swap.amount_out.ticker,
        amount_out = swap.amount_out.amount,
        dex = links.dex_name,
        pair = config.pool_pair(),
        pool_info = links.pool_info_url,
        contract = config.contract_address,
        short_tx = shorten(tx_hash),
    )
}

/// `0x7a250d5630...` style shortening: head and tail joined by `...`
pub fn shorten(value: &str) -> String {
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= SHORT_PREFIX + SHORT_SUFFIX {
        return value.to_string();
    }

    let head = chars[..SHORT_PREFIX].iter().collect::<String>();
    let tail = chars[chars.len() - SHORT_SUFFIX..].iter().collect::<String>();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use pool_events::Token;

    use super::*;
    use crate::handlers::{swap::Leg, Links};

    const TX_HASH: &str = "0x5e1f2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8";

    fn config() -> PipelineConfig {
        PipelineConfig {
            contract_address: "0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852".into(),
            token0: Token::new("ETH", 18).unwrap(),
            token1: Token::new("USDT", 6).unwrap(),
            links: Links {
                explorer_url: "https://etherscan.io".into(),
                pool_info_url: "https://v2.info.uniswap.org/pair".into(),
                dex_name: "Uniswap".into(),
            },
        }
    }

    fn bought() -> ResolvedSwap {
        ResolvedSwap {
            direction: Direction::Bought,
            account: address!("7a250d5630b4cf539739df2c5dacb4c659f2488d"),
            amount_in: Leg {
                ticker: "USDT".into(),
                amount: 0.0001,
            },
            amount_out: Leg {
                ticker: "ETH".into(),
                amount: 50.0 / 1e18,
            },
        }
    }

    /// Targets of every `[text](target)` link in a message
    fn link_targets(message: &str) -> Vec<&str> {
        message
            .split("](")
            .skip(1)
            .map(|rest| rest.split(')').next().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_bought_message() {
        let message = format_swap_message(&config(), &bought(), TX_HASH);

        assert!(message.contains("🟢 Bought ETH"));
        assert!(message.contains("USDT 0.000100 ➡ ETH 0.000000"));
        assert!(message.contains("[Uniswap ETH-USDT]"));
        assert!(message.starts_with("Account: [0x7a25...488D]"));
    }

    #[test]
    fn test_sold_message() {
        let sold = ResolvedSwap {
            direction: Direction::Sold,
            amount_in: Leg {
                ticker: "ETH".into(),
                amount: 1.5,
            },
            amount_out: Leg {
                ticker: "USDT".into(),
                amount: 3012.25,
            },
            ..bought()
        };
        let message = format_swap_message(&config(), &sold, TX_HASH);

        assert!(message.contains("🔴 Sold ETH"));
        assert!(message.contains("ETH 1.500000 ➡ USDT 3012.250000"));
    }

    #[test]
    fn test_links_are_well_formed() {
        let message = format_swap_message(&config(), &bought(), TX_HASH);
        let targets = link_targets(&message);
        let tx_link = format!("https://etherscan.io/tx/{TX_HASH}");

        assert_eq!(
            targets,
            vec![
                "https://etherscan.io/address/0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
                "https://v2.info.uniswap.org/pair/0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852",
                tx_link.as_str(),
            ]
        );
    }

    #[test]
    fn test_fixed_notation_for_tiny_and_large_amounts() {
        let swap = ResolvedSwap {
            amount_in: Leg {
                ticker: "USDT".into(),
                amount: 1e-9,
            },
            amount_out: Leg {
                ticker: "ETH".into(),
                amount: 1e21,
            },
            ..bought()
        };
        let message = format_swap_message(&config(), &swap, TX_HASH);

        assert!(!message.contains("e-"));
        assert!(message.contains("USDT 0.000000 ➡ ETH 1000000000000000000000.000000"));
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let first = format_swap_message(&config(), &bought(), TX_HASH);
        let second = format_swap_message(&config(), &bought(), TX_HASH);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("0x0123456789abcdef"), "0x0123...cdef");
        assert_eq!(shorten("0x01234567"), "0x01234567");
        assert_eq!(shorten(""), "");
    }
}
