use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use rollcall_db::{repositories::snapshot_slot, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    println!("Connecting to database...");
    let db_pool = rollcall_db::create_pool(&database_url).await?;

    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    println!("Database schema initialized successfully.");

    let slots = snapshot_slot::list_slots(&db_pool).await?;
    if slots.is_empty() {
        println!("No attendance snapshots stored yet.");
    } else {
        println!("Stored snapshot slots: {}", slots.join(", "));
    }

    Ok(())
}
