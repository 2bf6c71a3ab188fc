//! # Seed Data Generator
//!
//! Populates the database with test items and users for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 items (default)
//! cargo run -p bazaar-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p bazaar-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p bazaar-db --bin seed -- --db ./data/bazaar.db
//! ```
//!
//! ## Generated Data
//! - Items across a handful of categories, price $0.99-$19.99, stock 0-100
//! - A fixed set of users: one admin plus a few salesmen

use chrono::Utc;
use std::env;
use uuid::Uuid;

use bazaar_core::{Item, User, UserRole};
use bazaar_db::{Database, DbConfig};

/// Item categories for realistic test data.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "electronics",
        &[
            "Wireless Mouse",
            "Mechanical Keyboard",
            "USB-C Hub",
            "Webcam HD",
            "Bluetooth Speaker",
            "Power Bank",
            "Phone Charger",
            "Laptop Stand",
            "HDMI Cable",
            "Earbuds",
        ],
    ),
    (
        "home",
        &[
            "Ceramic Mug",
            "Desk Lamp",
            "Throw Pillow",
            "Wall Clock",
            "Picture Frame",
            "Scented Candle",
            "Storage Basket",
            "Coaster Set",
            "Plant Pot",
            "Table Runner",
        ],
    ),
    (
        "office",
        &[
            "Notebook A5",
            "Gel Pen Pack",
            "Sticky Notes",
            "Stapler",
            "Paper Clips",
            "Desk Organizer",
            "Whiteboard Marker",
            "File Folder",
            "Tape Dispenser",
            "Scissors",
        ],
    ),
];

/// Size/variant suffixes with price addons in cents.
const VARIANTS: &[(&str, i64)] = &[
    ("Standard", 0),
    ("Deluxe", 300),
    ("Pro", 600),
    ("Mini", -100),
    ("Bundle", 900),
];

/// Fixed users: (first, last, email, role).
const USERS: &[(&str, &str, &str, UserRole)] = &[
    ("Amira", "Khan", "amira@bazaar.test", UserRole::Admin),
    ("Grace", "Hopper", "grace@bazaar.test", UserRole::User),
    ("Alan", "Turing", "alan@bazaar.test", UserRole::User),
    ("Ada", "Lovelace", "ada@bazaar.test", UserRole::User),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./bazaar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
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
                println!("Bazaar Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./bazaar_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bazaar Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Users first so salesman references resolve
    println!();
    println!("Creating users...");
    for (first, last, email, role) in USERS {
        let user = User {
            id: Uuid::new_v4().to_string(),
            first_name: (*first).to_string(),
            last_name: (*last).to_string(),
            email: (*email).to_string(),
            role: *role,
            created_at: Utc::now(),
        };
        db.users().insert(&user).await?;
        println!("  {} {} ({:?}) → {}", first, last, role, user.id);
    }

    println!();
    println!("Generating items...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + name_idx * 20 + variant_idx;
                let item = generate_item(category, name, variant, *price_addon, seed);

                if let Err(e) = db.items().insert(&item).await {
                    eprintln!("Failed to insert {}: {}", item.name, e);
                    continue;
                }

                generated += 1;
                if generated % 100 == 0 {
                    println!("  Generated {} items...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} items in {:?}", generated, elapsed);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single item with realistic data.
fn generate_item(category: &str, name: &str, variant: &str, price_addon: i64, seed: usize) -> Item {
    let now = Utc::now();

    // Base price $0.99-$19.99 plus variant addon
    let base_price = 99 + ((seed * 17) % 1900) as i64;
    let price_cents = (base_price + price_addon).max(99);

    // Stock 0-100, deterministic per seed
    let stock = (seed % 101) as i64;

    Item {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {}", name, variant),
        category: Some(category.to_string()),
        price_cents,
        stock,
        sold_count: 0,
        description: None,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}
