//! Demo data seeder for Nestegg development.
//!
//! Seeds a fixed demo user with budget categories, a month of transactions,
//! two goals with investment splits and baby-step progress, then prints a
//! bearer token for that user.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, TimeZone, Utc};
use nestegg_core::budget::{CategoryService, NewCategory};
use nestegg_core::goal::NewGoal;
use nestegg_core::investment::InvestmentManager;
use nestegg_core::ledger::{LedgerError, LedgerService, NewTransaction};
use nestegg_core::progress::ProgressService;
use nestegg_core::store::GoalStore;
use nestegg_db::{
    CategoryRepository, GoalRepository, InvestmentRepository, ProgressRepository,
    TransactionRepository,
};
use nestegg_shared::{AppConfig, JwtConfig, JwtService, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = nestegg_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let user = UserId::from_uuid(DEMO_USER_ID);

    let categories = Arc::new(CategoryRepository::new(db.clone()));
    let goals = Arc::new(GoalRepository::new(db.clone()));
    let investments = Arc::new(InvestmentRepository::new(db.clone()));
    let transactions = Arc::new(TransactionRepository::new(db.clone()));
    let progress = Arc::new(ProgressRepository::new(db));

    println!("Seeding budget categories...");
    let category_service = CategoryService::new(categories.clone());
    if category_service.list(user).await?.is_empty() {
        for (name, size) in [
            ("Rent", dec!(1200)),
            ("Groceries", dec!(450)),
            ("Transport", dec!(150)),
            ("Utilities", dec!(180)),
        ] {
            category_service
                .create(
                    user,
                    NewCategory {
                        name: name.to_string(),
                        size,
                    },
                )
                .await?;
        }
    } else {
        println!("  Categories already exist, skipping...");
    }

    println!("Seeding transactions...");
    let ledger = LedgerService::new(transactions, categories);
    let month_start = Utc
        .with_ymd_and_hms(2026, 9, 1, 9, 0, 0)
        .single()
        .context("invalid seed date")?;
    let entries = [
        (0, "Salary", dec!(4200)),
        (1, "Rent", dec!(-1200)),
        (3, "Groceries", dec!(-96.40)),
        (8, "Transport", dec!(-45)),
        (12, "Groceries", dec!(-120.15)),
        (15, "Freelance", dec!(650)),
        (20, "Utilities", dec!(-172.80)),
    ];
    for (day, category, amount) in entries {
        let input = NewTransaction {
            category: category.to_string(),
            amount,
        };
        match ledger
            .create(user, input, Some(month_start + Duration::days(day)))
            .await
        {
            Ok(_) => {}
            Err(LedgerError::DuplicateTimestamp(ts)) => {
                println!("  Transaction at {ts} already exists, skipping...");
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("Seeding goals...");
    if goals.list_goals(user).await?.is_empty() {
        let manager = InvestmentManager::new(goals.clone(), investments);
        for (name, target, equity) in [
            ("Emergency fund", dec!(10000), dec!(20)),
            ("House deposit", dec!(60000), dec!(70)),
        ] {
            let goal = goals
                .insert_goal(
                    user,
                    NewGoal {
                        name: name.to_string(),
                        description: None,
                        target_amount: target,
                    },
                )
                .await?;
            manager
                .create(user, goal.id, Decimal::ONE_HUNDRED - equity, equity)
                .await?;
        }
    } else {
        println!("  Goals already exist, skipping...");
    }

    println!("Seeding progress...");
    ProgressService::new(progress).put(user, 2).await?;

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        audience: config.jwt.audience.clone(),
        access_token_expires_minutes: 24 * 60,
    });
    let token = jwt
        .generate_access_token(user, Some("demo@nestegg.dev".to_string()))
        .context("Failed to sign demo token")?;

    println!("Seeding complete!");
    println!("Demo user: {user}");
    println!("Bearer token (24h): {token}");
    Ok(())
}
