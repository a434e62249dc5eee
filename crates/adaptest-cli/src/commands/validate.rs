//! The `adaptest validate` command.

use anyhow::Result;

use adaptest_core::parser::validate_bank;

use super::BankSource;

pub async fn execute(source: BankSource) -> Result<()> {
    let bank_config = source.resolve()?;
    let store = source.store()?;
    let bank = store.snapshot().await?;

    println!(
        "Item bank: {} ({} items, {} topics)",
        bank_config.path().display(),
        bank.len(),
        bank.topics().len()
    );

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Item bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
