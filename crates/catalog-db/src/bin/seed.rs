//! # Seed Data Generator
//!
//! Populates the database with sample products and orders for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default) plus orders referencing them
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! - Products cycle through themed photo sets, each tagged with its theme
//!   and one or two subject tags, so `?tag=` filtering has something to hit
//! - One order per four products, each referencing one to three of them,
//!   with statuses rotating through `CREATED`, `PENDING`, `COMPLETED`

use std::env;

use catalog_core::{NewOrder, NewProduct, OrderStatus, ProductLinks, ProductUrls, ProductUser, Tag};
use catalog_db::{Database, DbConfig};

/// Photo themes and their subjects.
const THEMES: &[(&str, &[&str])] = &[
    ("nature", &["forest", "mountain", "river", "meadow", "waterfall"]),
    ("city", &["street", "skyline", "bridge", "market", "subway"]),
    ("sea", &["beach", "wave", "harbor", "lighthouse", "reef"]),
    ("food", &["coffee", "bread", "fruit", "dessert", "breakfast"]),
    ("people", &["portrait", "crowd", "dance", "family", "work"]),
];

/// Photographers credited on generated products.
const PHOTOGRAPHERS: &[(&str, &str, &str)] = &[
    ("u-ada", "Ada", "ada_l"),
    ("u-grace", "Grace", "ghopper"),
    ("u-linus", "Linus", "linus_t"),
    ("u-margaret", "Margaret", "mhamilton"),
];

const DEFAULT_COUNT: usize = 200;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = DEFAULT_COUNT;
    let mut db_path = String::from("./catalog.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(DEFAULT_COUNT);
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
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Catalog Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Schema ready");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let products = db.products();
    let mut product_ids = Vec::with_capacity(count);

    for seed in 0..count {
        match products.create(generate_product(seed)).await {
            Ok(product) => product_ids.push(product.id),
            Err(e) => {
                eprintln!("Failed to insert product #{}: {}", seed, e);
                continue;
            }
        }

        if product_ids.len() % 100 == 0 {
            println!("  Generated {} products...", product_ids.len());
        }
    }

    println!("✓ Generated {} products in {:?}", product_ids.len(), start.elapsed());

    println!();
    println!("Generating orders...");

    let orders = db.orders();
    let mut generated_orders = 0;

    for (seed, chunk) in product_ids.chunks(4).enumerate() {
        let order = generate_order(seed, chunk);
        if let Err(e) = orders.create(order).await {
            eprintln!("Failed to insert order #{}: {}", seed, e);
            continue;
        }
        generated_orders += 1;
    }

    println!("✓ Generated {} orders", generated_orders);

    // Spot-check the tag filter
    println!();
    for (theme, _) in THEMES {
        let query = catalog_core::ProductListQuery::new().tag(*theme).limit(count as u64);
        let tagged = products.list(&query).await?;
        println!("  Tag '{}': {} products", theme, tagged.len());
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds one sample product draft.
fn generate_product(seed: usize) -> NewProduct {
    let (theme, subjects) = THEMES[seed % THEMES.len()];
    let subject = subjects[(seed / THEMES.len()) % subjects.len()];
    let (user_id, first_name, username) = PHOTOGRAPHERS[seed % PHOTOGRAPHERS.len()];

    let slug = format!("{}-{}-{:04}", theme, subject, seed);

    let mut tags = vec![Tag::new(theme), Tag::new(subject)];
    if seed % 3 == 0 {
        // A cross-theme tag so some products match two themes
        let (other, _) = THEMES[(seed + 1) % THEMES.len()];
        tags.push(Tag::new(other));
    }

    NewProduct {
        id: None,
        description: Some(format!("A {} photo of a {}", theme, subject)),
        alt_description: (seed % 2 == 0).then(|| format!("{} {}", subject, theme)),
        likes: Some(((seed * 37) % 500) as i64),
        urls: Some(ProductUrls {
            regular: format!("https://images.catalog.test/{}?w=1080", slug),
            small: format!("https://images.catalog.test/{}?w=400", slug),
            thumb: format!("https://images.catalog.test/{}?w=200", slug),
        }),
        links: Some(ProductLinks {
            self_link: format!("https://api.catalog.test/photos/{}", slug),
            html: format!("https://catalog.test/photos/{}", slug),
        }),
        user: Some(ProductUser {
            id: user_id.to_string(),
            first_name: first_name.to_string(),
            last_name: None,
            portfolio_url: Some(format!("https://catalog.test/@{}", username)),
            username: username.to_string(),
        }),
        tags,
    }
}

/// Builds one sample order over up to three of the given product ids.
fn generate_order(seed: usize, product_ids: &[String]) -> NewOrder {
    let take = 1 + seed % 3;

    NewOrder {
        id: None,
        buyer_email: Some(format!("buyer{:03}@example.com", seed)),
        products: product_ids.iter().take(take).cloned().collect(),
        status: Some(OrderStatus::ALL[seed % OrderStatus::ALL.len()]),
    }
}
