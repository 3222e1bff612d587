//! Interactive confirmation.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;

use balances_core::BalancesError;

/// Ask before a destructive write. `--yes` skips the prompt; without a
/// terminal the write is refused instead of prompting.
pub fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(BalancesError::bad_request(
            "refusing to delete without confirmation; pass --yes",
        )
        .into());
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
