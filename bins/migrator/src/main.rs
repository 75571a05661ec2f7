//! Database migration runner for Tally.
//!
//! Usage:
//!   migrator up      - Apply the settlement schema
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! Reads `DATABASE_URL`; both `postgres://` and `sqlite://` URLs work.

use sea_orm_migration::prelude::*;
use tally_db::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
