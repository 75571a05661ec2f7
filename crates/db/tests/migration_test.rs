//! Schema migration tests.

mod common;

use rust_decimal_macros::dec;

use common::*;
use tally_db::Migrator;
use tally_db::entities::sea_orm_active_enums::PartyKind;
use tally_db::migration::MigratorTrait;
use tally_db::repositories::{CreatePartyInput, PartyRepository};

#[tokio::test]
async fn test_schema_rolls_back_and_reapplies_on_sqlite() {
    let db = setup_db().await;

    Migrator::down(&db, None).await.unwrap();
    assert!(Migrator::get_applied_migrations(&db).await.unwrap().is_empty());

    Migrator::up(&db, None).await.unwrap();
    assert_eq!(Migrator::get_pending_migrations(&db).await.unwrap().len(), 0);

    let parties = PartyRepository::new(db.clone());
    let party = parties
        .create_party(CreatePartyInput {
            name: "Apex Auto".to_string(),
            gstin: None,
            kind: PartyKind::Both,
            receivable_balance: dec!(9876543210.55),
            payable_balance: dec!(125.40),
        })
        .await
        .unwrap();

    let loaded = parties.get_party(party.id).await.unwrap();
    assert_eq!(loaded.receivable_balance, dec!(9876543210.55));
    assert_eq!(loaded.payable_balance, dec!(125.40));
}
