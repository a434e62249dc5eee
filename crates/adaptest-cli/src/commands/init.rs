//! The `adaptest init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("adaptest.toml").exists() {
        println!("adaptest.toml already exists, skipping.");
    } else {
        std::fs::write("adaptest.toml", SAMPLE_CONFIG)?;
        println!("Created adaptest.toml");
    }

    let bank_path = std::path::Path::new("item-bank.json");
    if bank_path.exists() {
        println!("item-bank.json already exists, skipping.");
    } else {
        std::fs::write(bank_path, EXAMPLE_BANK)?;
        println!("Created item-bank.json");
    }

    println!("\nNext steps:");
    println!("  1. Replace item-bank.json with an export of your item bank");
    println!("  2. Run: adaptest validate");
    println!("  3. Run: echo '{{\"command\": \"recommend-item\"}}' | adaptest handle");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptest configuration

[bank]
type = "file"
path = "item-bank.json"

# A directory of .json/.toml exports merged into one bank:
# [bank]
# type = "directory"
# path = "${HOME}/item-bank"
"#;

const EXAMPLE_BANK: &str = r#"[
  { "question_id": 1, "topic": "algebra", "irt_difficulty_b": -1.5, "difficulty_level": "nb" },
  { "question_id": 2, "topic": "algebra", "irt_difficulty_b": -0.5, "difficulty_level": "th" },
  { "question_id": 3, "topic": "algebra", "irt_difficulty_b": 0.5, "difficulty_level": "vd" },
  { "question_id": 4, "topic": "geometry", "irt_difficulty_b": -1.0, "difficulty_level": "nb" },
  { "question_id": 5, "topic": "geometry", "irt_difficulty_b": 0.0, "difficulty_level": "th" },
  { "question_id": 6, "topic": "geometry", "irt_difficulty_b": 1.5, "difficulty_level": "vdc" },
  { "question_id": 7, "topic": "probability", "irt_difficulty_b": 0.0 },
  { "question_id": 8, "topic": "probability", "irt_difficulty_b": 2.0, "difficulty_level": "vdc" }
]
"#;
