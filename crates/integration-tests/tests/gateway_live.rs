//! Integration tests exercising the gateway against a live database.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `DATABASE_URL` pointing at it
//!
//! Run with: `cargo test -p ledgerline-integration-tests -- --ignored`

use ledgerline_core::{CustomerId, InvoiceId};
use ledgerline_gateway::services::mutations::{
    ChangeNotifier, ImagePayload, ImageStore, ImageStoreError, InvoiceInput, MutationService,
};
use ledgerline_gateway::db;

use ledgerline_integration_tests::{test_gateway, unique_suffix};

/// Notifier that only records whether it fired; the tests here assert
/// database effects, not cache bookkeeping.
struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn collection_changed(&self, _collection: &str) {}
}

/// Image store that never touches disk.
struct NoopImages;

impl ImageStore for NoopImages {
    async fn store(&self, image: &ImagePayload) -> Result<String, ImageStoreError> {
        Ok(format!("/images/{}", image.file_name))
    }

    async fn remove(&self, _reference: &str) -> Result<(), ImageStoreError> {
        Ok(())
    }
}

fn mutations(
    pool: &sqlx::PgPool,
) -> MutationService<
    db::CustomerRepository<'_>,
    db::InvoiceRepository<'_>,
    NoopNotifier,
    NoopImages,
> {
    MutationService::new(
        db::CustomerRepository::new(pool),
        db::InvoiceRepository::new(pool),
        NoopNotifier,
        NoopImages,
    )
}

/// Insert a throwaway customer and return its id.
async fn insert_customer(pool: &sqlx::PgPool, suffix: &str) -> CustomerId {
    let id = format!("test_cus_{suffix}");
    sqlx::query("INSERT INTO customers (id, name, email) VALUES ($1, $2, $3)")
        .bind(&id)
        .bind(format!("Test Customer {suffix}"))
        .bind(format!("test.{suffix}@example.com"))
        .execute(pool)
        .await
        .expect("failed to insert test customer");
    CustomerId::new(id)
}

/// Insert a throwaway invoice and return its id.
async fn insert_invoice(pool: &sqlx::PgPool, customer: &CustomerId, amount: i64) -> InvoiceId {
    let id: String = sqlx::query_scalar(
        "INSERT INTO invoices (customer_id, amount, status, date) \
         VALUES ($1, $2, 'pending', now()) RETURNING id",
    )
    .bind(customer)
    .bind(amount)
    .fetch_one(pool)
    .await
    .expect("failed to insert test invoice");
    InvoiceId::new(id)
}

async fn remove_customer(pool: &sqlx::PgPool, id: &CustomerId) {
    sqlx::query("DELETE FROM invoices WHERE customer_id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("cleanup failed");
    sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("cleanup failed");
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_pool_is_created_once_and_shared() {
    let gateway = test_gateway().await;

    let first = gateway.pool().await.expect("first acquisition failed");
    let second = gateway.pool().await.expect("second acquisition failed");

    // Same pool handle, not a reconnect.
    assert!(std::ptr::eq(first, second));

    let now = db::ping(first).await.expect("ping failed");
    assert!(now.timestamp() > 0);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_register_then_authenticate_round_trip() {
    let gateway = test_gateway().await;
    let auth = gateway.auth().await.expect("connection failed");

    let suffix = unique_suffix();
    let email = format!("signin.{suffix}@example.com");

    let registered = auth
        .register("Integration Tester", &email, "s3cret-pass")
        .await
        .expect("registration failed");
    assert_eq!(registered.email.as_str(), email);

    let user = auth
        .authenticate(&email, "s3cret-pass")
        .await
        .expect("authentication failed");
    assert_eq!(user.id, registered.id);

    let wrong = auth.authenticate(&email, "wrong-pass").await;
    assert_eq!(
        wrong.expect_err("bad password accepted").public_message(),
        "Invalid credentials."
    );

    // Serialized identity never carries the hash.
    let json = serde_json::to_value(&user).expect("serialization failed");
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(gateway.pool().await.expect("connection failed"))
        .await
        .expect("cleanup failed");
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_create_invoice_persists_minor_units() {
    let gateway = test_gateway().await;
    let pool = gateway.pool().await.expect("connection failed");

    let suffix = unique_suffix();
    let customer = insert_customer(pool, &suffix).await;

    let service = mutations(pool);
    service
        .create_invoice(InvoiceInput {
            customer_id: customer.as_str().to_owned(),
            amount: "19.99".to_owned(),
            status: "pending".to_owned(),
            date: None,
        })
        .await
        .expect("create failed");

    let stored: i64 = sqlx::query_scalar("SELECT amount FROM invoices WHERE customer_id = $1")
        .bind(&customer)
        .fetch_one(pool)
        .await
        .expect("readback failed");
    assert_eq!(stored, 1999);

    remove_customer(pool, &customer).await;
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_batch_delete_skips_missing_ids() {
    let gateway = test_gateway().await;
    let pool = gateway.pool().await.expect("connection failed");

    let suffix = unique_suffix();
    let customer = insert_customer(pool, &suffix).await;
    let a = insert_invoice(pool, &customer, 1000).await;
    let b = insert_invoice(pool, &customer, 2000).await;

    let service = mutations(pool);
    let outcome = service
        .delete_invoices(&[a, InvoiceId::new("no_such_invoice"), b])
        .await
        .expect("batch delete failed");

    // The two real rows go; the phantom id cannot fail the rest.
    assert_eq!(outcome.deleted, 2);
    assert_eq!(outcome.message, "2 invoice(s) deleted successfully");

    remove_customer(pool, &customer).await;
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_update_customer_without_image_preserves_reference() {
    let gateway = test_gateway().await;
    let pool = gateway.pool().await.expect("connection failed");

    let suffix = unique_suffix();
    let customer = insert_customer(pool, &suffix).await;
    sqlx::query("UPDATE customers SET image_url = '/images/original.png' WHERE id = $1")
        .bind(&customer)
        .execute(pool)
        .await
        .expect("setup failed");

    let service = mutations(pool);
    service
        .update_customer(
            &customer,
            ledgerline_gateway::services::mutations::CustomerInput {
                name: format!("Renamed {suffix}"),
                email: format!("renamed.{suffix}@example.com"),
                status: "inactive".to_owned(),
            },
            None,
            Some("/images/original.png"),
        )
        .await
        .expect("update failed");

    let (name, image_url): (String, Option<String>) =
        sqlx::query_as("SELECT name, image_url FROM customers WHERE id = $1")
            .bind(&customer)
            .fetch_one(pool)
            .await
            .expect("readback failed");
    assert_eq!(name, format!("Renamed {suffix}"));
    assert_eq!(image_url.as_deref(), Some("/images/original.png"));

    remove_customer(pool, &customer).await;
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_filtered_invoice_listing_is_paged() {
    let gateway = test_gateway().await;
    let pool = gateway.pool().await.expect("connection failed");

    let suffix = unique_suffix();
    let customer = insert_customer(pool, &suffix).await;
    for n in 0..8 {
        insert_invoice(pool, &customer, 1000 + n).await;
    }

    let invoices = gateway.invoices().await.expect("connection failed");
    let query = format!("Test Customer {suffix}");

    let page_one = invoices
        .list_filtered(&query, 1)
        .await
        .expect("page one failed");
    let page_two = invoices
        .list_filtered(&query, 2)
        .await
        .expect("page two failed");

    assert_eq!(page_one.len(), 6);
    assert_eq!(page_two.len(), 2);
    assert_eq!(invoices.pages(&query).await.expect("count failed"), 2);

    remove_customer(pool, &customer).await;
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_update_of_missing_invoice_succeeds_silently() {
    let gateway = test_gateway().await;
    let pool = gateway.pool().await.expect("connection failed");

    let suffix = unique_suffix();
    let customer = insert_customer(pool, &suffix).await;

    // Zero matched rows is not an error, and never "Database Error.".
    let service = mutations(pool);
    service
        .update_invoice(
            &InvoiceId::new("no_such_invoice"),
            InvoiceInput {
                customer_id: customer.as_str().to_owned(),
                amount: "10.00".to_owned(),
                status: "paid".to_owned(),
                date: None,
            },
        )
        .await
        .expect("update of a missing row must succeed");

    remove_customer(pool, &customer).await;
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_malformed_stored_email_fails_the_read() {
    let gateway = test_gateway().await;
    let pool = gateway.pool().await.expect("connection failed");

    let suffix = unique_suffix();
    let id = format!("test_cus_{suffix}");
    sqlx::query("INSERT INTO customers (id, name, email) VALUES ($1, $2, 'not-an-email')")
        .bind(&id)
        .bind(format!("Corrupt {suffix}"))
        .execute(pool)
        .await
        .expect("setup failed");

    let customers = gateway.customers().await.expect("connection failed");
    let result = customers.get_by_id(&CustomerId::new(&id)).await;
    assert!(result.is_err(), "malformed email must not decode");

    sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(&id)
        .execute(pool)
        .await
        .expect("cleanup failed");
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_dashboard_totals_never_null() {
    let gateway = test_gateway().await;
    let invoices = gateway.invoices().await.expect("connection failed");

    // Regardless of table contents the sums come back as numbers.
    let totals = invoices.dashboard_totals().await.expect("totals failed");
    assert!(totals.invoice_count >= 0);
    assert!(totals.customer_count >= 0);
    assert!(totals.total_paid.minor_units() >= 0);
    assert!(totals.total_pending.minor_units() >= 0);
}
