//! Database seeder for Cashfloat development and testing.
//!
//! Seeds an admin, an accountant, a custodian, and the default low-balance
//! threshold so a fresh environment is immediately usable.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use cashfloat_db::entities::{sea_orm_active_enums::UserRole, users};
use cashfloat_db::repositories::setting::LOW_BALANCE_THRESHOLD_KEY;
use cashfloat_db::SettingRepository;

/// Seed admin ID (consistent for all seeds)
const ADMIN_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Seed accountant ID (consistent for all seeds)
const ACCOUNTANT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Seed custodian ID (consistent for all seeds)
const CUSTODIAN_ID: &str = "00000000-0000-0000-0000-000000000003";

/// Default low-balance warning threshold.
const DEFAULT_LOW_BALANCE_THRESHOLD: &str = "100.00";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = cashfloat_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_user(&db, ADMIN_ID, "admin@cashfloat.dev", "Ada", UserRole::Admin).await;
    seed_user(
        &db,
        ACCOUNTANT_ID,
        "accountant@cashfloat.dev",
        "Avery",
        UserRole::Accountant,
    )
    .await;
    seed_user(
        &db,
        CUSTODIAN_ID,
        "custodian@cashfloat.dev",
        "Casey",
        UserRole::Custodian,
    )
    .await;

    println!("Seeding settings...");
    seed_low_balance_threshold(&db).await;

    println!("Seeding complete!");
}

/// Seeds one user if it does not already exist.
async fn seed_user(
    db: &DatabaseConnection,
    id: &str,
    email: &str,
    first_name: &str,
    role: UserRole,
) {
    let user_id = Uuid::parse_str(id).expect("seed IDs are valid UUIDs");

    if users::Entity::find_by_id(user_id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  {email} already exists, skipping...");
        return;
    }

    let user = users::ActiveModel {
        id: Set(user_id),
        email: Set(Some(email.to_string())),
        first_name: Set(Some(first_name.to_string())),
        last_name: Set(Some("Seed".to_string())),
        profile_image_url: Set(None),
        role: Set(role),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert {email}: {e}");
    } else {
        println!("  Created {email}");
    }
}

/// Seeds the default low-balance threshold, keyed to the admin user.
async fn seed_low_balance_threshold(db: &DatabaseConnection) {
    let settings = SettingRepository::new(db.clone());

    match settings.get(LOW_BALANCE_THRESHOLD_KEY).await {
        Ok(Some(value)) => {
            println!("  {LOW_BALANCE_THRESHOLD_KEY} already set to {value}, skipping...");
        }
        Ok(None) => {
            let admin_id = Uuid::parse_str(ADMIN_ID).expect("seed IDs are valid UUIDs");
            match settings
                .set(
                    LOW_BALANCE_THRESHOLD_KEY,
                    DEFAULT_LOW_BALANCE_THRESHOLD,
                    admin_id,
                )
                .await
            {
                Ok(_) => println!(
                    "  Set {LOW_BALANCE_THRESHOLD_KEY} = {DEFAULT_LOW_BALANCE_THRESHOLD}"
                ),
                Err(e) => eprintln!("Failed to set {LOW_BALANCE_THRESHOLD_KEY}: {e}"),
            }
        }
        Err(e) => eprintln!("Failed to read {LOW_BALANCE_THRESHOLD_KEY}: {e}"),
    }
}
