//! The `adaptest rank` command.

use std::collections::HashSet;

use anyhow::Result;

use adaptest_core::irt::probability;
use adaptest_core::selector::rank_items;
use adaptest_core::ItemId;

use super::{parse_answered, split_list, BankSource};

pub async fn execute(
    source: BankSource,
    theta: f64,
    answered: Option<String>,
    weak_topics: Option<String>,
    limit: usize,
) -> Result<()> {
    anyhow::ensure!(theta.is_finite(), "theta must be a finite number");

    let store = source.store()?;
    let bank = store.snapshot().await?;
    let answered: HashSet<ItemId> = parse_answered(answered.as_deref()).into_iter().collect();
    let weak_topics = split_list(weak_topics.as_deref());

    let ranked = rank_items(theta, &answered, &bank, &weak_topics);
    if ranked.is_empty() {
        println!("No eligible items ({} in bank, {} answered).", bank.len(), answered.len());
        return Ok(());
    }

    print_ranking(theta, &ranked[..ranked.len().min(limit)]);
    if ranked.len() > limit {
        println!("... {} more candidate(s)", ranked.len() - limit);
    }
    Ok(())
}

fn print_ranking(theta: f64, ranked: &[adaptest_core::selector::RankedItem<'_>]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "ID",
        "Topic",
        "Level",
        "b",
        "P(correct)",
        "Information",
    ]);

    for (pos, r) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(pos + 1),
            Cell::new(&r.item.id),
            Cell::new(&r.item.topic),
            Cell::new(r.item.level_or_default()),
            Cell::new(format!("{:+.2}", r.item.difficulty_b)),
            Cell::new(format!("{:.3}", probability(theta, r.item.difficulty_b))),
            Cell::new(format!("{:.4}", r.information)),
        ]);
    }

    println!("Candidates at theta = {theta:+.2}");
    println!("{table}");
}
