//! # Seed Data Generator
//!
//! Populates the database with demo receipts for development.
//!
//! ## Usage
//! ```bash
//! # Issue 50 receipts (default)
//! cargo run -p receipt-db --bin seed
//!
//! # Issue a custom amount
//! cargo run -p receipt-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p receipt-db --bin seed -- --db ./data/receipts.db
//! ```
//!
//! Receipts go through the normal writer, so numbering and totals are real.
//! Creation dates are spread backwards from now, one every few hours.

use chrono::{Duration, Utc};
use receipt_core::{Money, NewReceipt, NewReceiptItem};
use receipt_db::{Database, DbConfig};
use std::env;

const PAYERS: &[&str] = &[
    "Ada Obi",
    "Bola Adeyemi",
    "Chidi Okafor",
    "Dayo Balogun",
    "Emeka Nwosu",
    "Funke Akindele",
    "Gbenga Oladipo",
    "Halima Bello",
    "Ifeoma Eze",
    "Jide Coker",
];

const GROUPS: &[&str] = &["JSS1", "JSS2", "JSS3", "SS1", "SS2", "SS3"];

const DEPARTMENTS: &[&str] = &["", "Science", "Arts", "Commercial"];

/// Fee names with base amounts as they would be typed in.
const FEES: &[(&str, &str)] = &[
    ("Tuition", "50000"),
    ("Books", "199.99"),
    ("Uniform", "7500.5"),
    ("Exam Fee", "2500"),
    ("Sports Levy", "1000"),
    ("Lab Fee", "3250.75"),
    ("Excursion", "12000"),
    ("PTA Levy", "1500"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./receipts_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Receipt Issuer Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of receipts to issue (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./receipts_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Receipt Issuer Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!("Receipts: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.receipts().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} receipts", existing);
        println!("  New receipts continue the existing numbering.");
    }

    println!();
    println!("Issuing receipts...");

    let start = std::time::Instant::now();
    let now = Utc::now();
    let mut issued = 0;
    let mut grand_total = Money::zero();

    for seed in 0..count {
        let created_at = now - Duration::hours((count - seed) as i64 * 5);

        match db.receipts().create_at(&demo_receipt(seed), created_at).await {
            Ok(receipt) => {
                issued += 1;
                grand_total += receipt.total();
            }
            Err(e) => {
                eprintln!("Failed to issue receipt {}: {}", seed, e);
                continue;
            }
        }

        if issued % 25 == 0 {
            println!("  Issued {} receipts...", issued);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Issued {} receipts in {:?}", issued, elapsed);
    println!("  Total collected: {}", grand_total);

    println!();
    for counter in db.counters().list().await? {
        println!("  {}: last number {}", counter.year, counter.last_number);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a receipt request with 1-4 fees picked from `seed`.
fn demo_receipt(seed: usize) -> NewReceipt {
    let item_count = 1 + seed % 4;
    let items = (0..item_count)
        .map(|k| {
            let (name, amount) = FEES[(seed * 3 + k * 5) % FEES.len()];
            NewReceiptItem::new(name, amount)
        })
        .collect();

    let department = DEPARTMENTS[seed % DEPARTMENTS.len()];

    NewReceipt {
        payer_name: PAYERS[seed % PAYERS.len()].to_string(),
        payer_group: GROUPS[(seed / 2) % GROUPS.len()].to_string(),
        department: (!department.is_empty()).then(|| department.to_string()),
        items,
    }
}
