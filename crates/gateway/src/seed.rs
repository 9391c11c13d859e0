//! Demo data seeding.
//!
//! Populates the three tables with a small, reviewable dataset inside one
//! transaction: either the whole seed lands or none of it does. Every
//! insert carries `ON CONFLICT DO NOTHING` so re-running the seed against
//! an already-seeded database is a no-op rather than an error.
//!
//! All seeded sign-ins share the default password `123456`, hashed per
//! user so stored hashes stay distinct.

use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::services::auth;

/// Default password for every seeded sign-in.
const DEFAULT_PASSWORD: &str = "123456";

const FIRST_NAMES: &[&str] = &[
    "Amy", "Balazs", "Carol", "Delba", "Evil", "Hector", "Lee", "Michael", "Steph", "Steven",
];

const LAST_NAMES: &[&str] = &[
    "Burns", "Dixon", "Harding", "Meyer", "Novotny", "Oliveira", "Rabbit", "Robinson", "Simon",
    "Vaccaro",
];

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Hashing the default password failed.
    #[error("failed to hash seed password")]
    PasswordHash,

    /// A seed statement or the transaction itself failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// What a completed seed run inserted (rows that already existed are not
/// counted).
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSummary {
    /// Users inserted.
    pub users: u64,
    /// Customers inserted.
    pub customers: u64,
    /// Invoices inserted.
    pub invoices: u64,
}

struct SeedUser {
    name: String,
    email: String,
    password_hash: String,
}

struct SeedCustomer {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    image_url: &'static str,
}

struct SeedInvoice {
    id: String,
    customer_id: &'static str,
    amount: i64,
    status: &'static str,
    days_ago: i64,
}

const CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        id: "cus_1",
        name: "Evil Rabbit",
        email: "evil@rabbit.com",
        image_url: "/customers/evil-rabbit.png",
    },
    SeedCustomer {
        id: "cus_2",
        name: "Delba de Oliveira",
        email: "delba@oliveira.com",
        image_url: "/customers/delba-de-oliveira.png",
    },
    SeedCustomer {
        id: "cus_3",
        name: "Lee Robinson",
        email: "lee@robinson.com",
        image_url: "/customers/lee-robinson.png",
    },
    SeedCustomer {
        id: "cus_4",
        name: "Michael Novotny",
        email: "michael@novotny.com",
        image_url: "/customers/michael-novotny.png",
    },
    SeedCustomer {
        id: "cus_5",
        name: "Amy Burns",
        email: "amy@burns.com",
        image_url: "/customers/amy-burns.png",
    },
    SeedCustomer {
        id: "cus_6",
        name: "Balazs Orban",
        email: "balazs@orban.com",
        image_url: "/customers/balazs-orban.png",
    },
];

/// Seed demo data inside one transaction: `user_count` users plus the
/// fixed customers and a batch of invoices.
///
/// # Errors
///
/// Returns [`SeedError::PasswordHash`] if hashing the default password
/// fails, or [`SeedError::Database`] if any statement fails; in either
/// case the transaction rolls back and nothing is persisted.
pub async fn run(pool: &PgPool, user_count: usize) -> Result<SeedSummary, SeedError> {
    // Generate everything up front; ThreadRng cannot be held across awaits.
    let users = generate_users(user_count)?;
    let invoices = generate_invoices(24);

    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for user in &users {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&mut *tx)
        .await?;
        summary.users += result.rows_affected();
    }

    for customer in CUSTOMERS {
        let result = sqlx::query(
            "INSERT INTO customers (id, name, email, image_url, status)
             VALUES ($1, $2, $3, $4, 'active')
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(customer.id)
        .bind(customer.name)
        .bind(customer.email)
        .bind(customer.image_url)
        .execute(&mut *tx)
        .await?;
        summary.customers += result.rows_affected();
    }

    for invoice in &invoices {
        let date = Utc::now() - Duration::days(invoice.days_ago);
        let result = sqlx::query(
            "INSERT INTO invoices (id, customer_id, amount, status, date)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&invoice.id)
        .bind(invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(date)
        .execute(&mut *tx)
        .await?;
        summary.invoices += result.rows_affected();
    }

    tx.commit().await?;

    info!(
        users = summary.users,
        customers = summary.customers,
        invoices = summary.invoices,
        "database seeded"
    );
    Ok(summary)
}

fn generate_users(count: usize) -> Result<Vec<SeedUser>, SeedError> {
    let mut rng = rand::rng();
    let mut users = Vec::with_capacity(count);

    for _ in 0..count {
        let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
        let tag: u32 = rng.random_range(100..10_000);

        let email = format!(
            "{}.{}{tag}@example.com",
            first.to_lowercase(),
            last.to_lowercase()
        );
        let password_hash =
            auth::hash_password(DEFAULT_PASSWORD).map_err(|_| SeedError::PasswordHash)?;

        users.push(SeedUser {
            name: format!("{first} {last}"),
            email,
            password_hash,
        });
    }

    Ok(users)
}

fn generate_invoices(count: usize) -> Vec<SeedInvoice> {
    let mut rng = rand::rng();
    let mut invoices = Vec::with_capacity(count);

    for n in 0..count {
        let customer = &CUSTOMERS[rng.random_range(0..CUSTOMERS.len())];
        // Minor units, $5.00 to $900.00.
        let amount: i64 = rng.random_range(500..=90_000);
        let status = if rng.random_bool(0.5) { "paid" } else { "pending" };

        invoices.push(SeedInvoice {
            id: format!("inv_{:03}", n + 1),
            customer_id: customer.id,
            amount,
            status,
            days_ago: rng.random_range(0..365),
        });
    }

    invoices
}
