use std::sync::Arc;

use balances_core::filter::BaseFilterInput;
use balances_core::model::{
    Asset, AssetFilterInput, BankAccountInput, BankAccountStatus, PropertyAreaUnit, PropertyInput,
    PropertyStatus, PropertyType, ValueFilterInput, ValueInput, VehicleInput, VehicleStatus,
    VehicleType,
};
use balances_core::{Database, ErrorCode, Services};
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

fn services() -> Services {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    Services::new(Arc::new(db))
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn house(initial: f64, current: f64) -> PropertyInput {
    PropertyInput {
        id: None,
        name: "Lake house".to_string(),
        address: "1 Shore Rd".to_string(),
        total_area: 1200.0,
        building_area: 900.0,
        area_unit: PropertyAreaUnit::SquareFeet,
        property_type: PropertyType::House,
        title_holder: "Sam".to_string(),
        tax_identifier: "TX-1".to_string(),
        purchase_date: t0() - Duration::days(730),
        initial_value: initial,
        initial_value_date: t0() - Duration::days(730),
        current_value: current,
        current_value_date: t0(),
        annual_appreciation_percent: 2.5,
        status: PropertyStatus::InUse,
    }
}

fn account(name: &str, balance: f64) -> BankAccountInput {
    BankAccountInput {
        id: None,
        account_name: name.to_string(),
        bank_name: "First Bank".to_string(),
        account_holder_name: "Sam".to_string(),
        account_number: format!("{}-001", name),
        last_balance: balance,
        last_balance_date: t0(),
        status: BankAccountStatus::Active,
    }
}

fn car() -> VehicleInput {
    VehicleInput {
        id: None,
        name: "Daily".to_string(),
        make: "Honda".to_string(),
        model: "Civic".to_string(),
        year: 2019,
        vehicle_type: VehicleType::Car,
        title_holder: "Sam".to_string(),
        license_plate_number: "ABC-123".to_string(),
        purchase_date: t0() - Duration::days(365),
        initial_value: 20000.0,
        initial_value_date: t0() - Duration::days(365),
        current_value: 17000.0,
        current_value_date: t0(),
        annual_depreciation_percent: 15.0,
        status: VehicleStatus::InUse,
    }
}

fn live_values(services: &Services, parent: Uuid) -> usize {
    let (items, info) = services
        .properties
        .get_values_by_filter(&ValueFilterInput::for_parent(parent))
        .unwrap();
    assert_eq!(items.len() as u64, info.total_count);
    items.len()
}

#[test]
fn test_property_valuation_round_trip() {
    let services = services();
    let actor = Uuid::now_v7();

    let property = services.properties.create(&house(68000.0, 50000.0), actor).unwrap();
    assert_eq!(property.values.len(), 2);
    assert_eq!(live_values(&services, property.id), 2);

    let added = services
        .properties
        .create_value(property.id, &ValueInput::new(t0() + Duration::days(1), 45000.0), actor)
        .unwrap();
    let fetched = services.properties.get_by_id(property.id, None).unwrap();
    assert_eq!(fetched.current_value, 45000.0);
    assert_eq!(fetched.current_value_date, t0() + Duration::days(1));

    services.properties.delete_value(added.id, actor).unwrap();
    let fetched = services.properties.get_by_id(property.id, None).unwrap();
    assert_eq!(fetched.current_value, 50000.0);
    assert_eq!(fetched.current_value_date, t0());
    assert_eq!(live_values(&services, property.id), 2);
}

#[test]
fn test_older_value_keeps_snapshot() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.bank_accounts.create(&account("Checking", 100.0), actor).unwrap();

    services
        .bank_accounts
        .create_value(created.id, &ValueInput::new(t0() - Duration::days(3), 80.0), actor)
        .unwrap();
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 100.0);
    assert_eq!(fetched.last_balance_date, t0());
}

#[test]
fn test_update_value_resyncs() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.bank_accounts.create(&account("Checking", 100.0), actor).unwrap();
    let seeded = created.balances[0].id;
    let newer = services
        .bank_accounts
        .create_value(created.id, &ValueInput::new(t0() + Duration::days(2), 150.0), actor)
        .unwrap();

    // Editing the current item moves the snapshot even when it falls behind.
    services
        .bank_accounts
        .update_value(
            created.id,
            newer.id,
            &ValueInput::new(t0() - Duration::days(1), 120.0),
            actor,
        )
        .unwrap();
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 100.0);
    assert_eq!(fetched.last_balance_date, t0());

    // A non-current item overtaking the current one becomes the snapshot.
    services
        .bank_accounts
        .update_value(
            created.id,
            newer.id,
            &ValueInput::new(t0() + Duration::days(5), 175.0),
            actor,
        )
        .unwrap();
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 175.0);

    // A non-current item that stays older leaves the parent alone.
    let before = services.bank_accounts.get_by_id(created.id, None).unwrap();
    services
        .bank_accounts
        .update_value(
            created.id,
            seeded,
            &ValueInput::new(t0() - Duration::days(10), 90.0),
            actor,
        )
        .unwrap();
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 175.0);
    assert_eq!(fetched.audit.updated, before.audit.updated);
    assert_eq!(fetched.audit.updated_by, before.audit.updated_by);

    // Moving it onto the current date does not overtake the current item.
    services
        .bank_accounts
        .update_value(
            created.id,
            seeded,
            &ValueInput::new(t0() + Duration::days(5), 95.0),
            actor,
        )
        .unwrap();
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 175.0);
    assert_eq!(fetched.audit.updated, before.audit.updated);
}

#[test]
fn test_same_day_values_keep_snapshot_in_step() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.bank_accounts.create(&account("Checking", 10.0), actor).unwrap();
    let original = created.balances[0].id;

    let same_day = services
        .bank_accounts
        .create_value(created.id, &ValueInput::new(t0(), 20.0), actor)
        .unwrap();
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 10.0);
    assert_eq!(fetched.audit.updated, created.audit.updated);

    // The listing puts the item the snapshot mirrors first.
    let (items, _) = services
        .bank_accounts
        .get_values_by_filter(&ValueFilterInput::for_parent(created.id))
        .unwrap();
    assert_eq!(items[0].id, original);

    services.bank_accounts.delete_value(original, actor).unwrap();
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 20.0);
    assert_eq!(fetched.last_balance_date, t0());

    let (items, _) = services
        .bank_accounts
        .get_values_by_filter(&ValueFilterInput::for_parent(created.id))
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, same_day.id);
}

#[test]
fn test_update_value_of_other_parent_is_rejected() {
    let services = services();
    let actor = Uuid::now_v7();
    let first = services.bank_accounts.create(&account("One", 1.0), actor).unwrap();
    let second = services.bank_accounts.create(&account("Two", 2.0), actor).unwrap();

    let err = services
        .bank_accounts
        .update_value(
            first.id,
            second.balances[0].id,
            &ValueInput::new(t0(), 5.0),
            actor,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadRequest);
}

#[test]
fn test_delete_only_value_is_refused_without_writes() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.bank_accounts.create(&account("Savings", 500.0), actor).unwrap();
    let only = created.balances[0].id;

    let err = services.bank_accounts.delete_value(only, actor).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OperationNotPermitted);
    assert_eq!(
        err.to_string(),
        "[OperationNotPermitted] delete on Bank Account Balance: cannot delete the only \
         Bank Account Balance belonging to a Bank Account"
    );

    let value = services.bank_accounts.get_value_by_id(only).unwrap();
    assert!(!value.is_deleted());
    let fetched = services.bank_accounts.get_by_id(created.id, None).unwrap();
    assert_eq!(fetched.last_balance, 500.0);
}

#[test]
fn test_delete_non_current_value_keeps_parent() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.vehicles.create(&car(), actor).unwrap();
    assert_eq!(created.values.len(), 2);

    let oldest = created
        .values
        .iter()
        .find(|v| v.amount == 20000.0)
        .map(|v| v.id)
        .unwrap();
    let before = services.vehicles.get_by_id(created.id, None).unwrap();
    services.vehicles.delete_value(oldest, actor).unwrap();
    let after = services.vehicles.get_by_id(created.id, None).unwrap();
    assert_eq!(after.current_value, 17000.0);
    assert_eq!(after.audit.updated, before.audit.updated);
}

#[test]
fn test_delete_cascades_to_history() {
    let services = services();
    let actor = Uuid::now_v7();
    let property = services.properties.create(&house(68000.0, 50000.0), actor).unwrap();

    let deleted = services.properties.delete(property.id, actor).unwrap();
    assert!(deleted.is_deleted());
    assert_eq!(deleted.values.len(), 2);
    assert!(deleted.values.iter().all(|v| v.is_deleted()));
    assert_eq!(live_values(&services, property.id), 0);

    // Still resolvable by id, but closed to further writes.
    let err = services
        .properties
        .create_value(property.id, &ValueInput::new(t0(), 1.0), actor)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OperationNotPermitted);

    let err = services.properties.delete(property.id, actor).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OperationNotPermitted);

    let (listed, _) = services
        .properties
        .get_by_filter(&AssetFilterInput::default())
        .unwrap();
    assert!(listed.is_empty());
}

#[test]
fn test_terminal_status_blocks_value_writes() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.bank_accounts.create(&account("Old", 5.0), actor).unwrap();

    let mut closed = account("Old", 5.0);
    closed.status = BankAccountStatus::Inactive;
    services.bank_accounts.update(created.id, &closed, actor).unwrap();

    let err = services
        .bank_accounts
        .create_value(created.id, &ValueInput::new(t0() + Duration::days(1), 9.0), actor)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OperationNotPermitted);
}

#[test]
fn test_create_with_taken_id_is_refused() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.bank_accounts.create(&account("A", 1.0), actor).unwrap();

    let mut again = account("B", 2.0);
    again.id = Some(created.id);
    let err = services.bank_accounts.create(&again, actor).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OperationNotPermitted);
}

#[test]
fn test_update_missing_is_not_found() {
    let services = services();
    let err = services
        .bank_accounts
        .update(Uuid::now_v7(), &account("Ghost", 0.0), Uuid::now_v7())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::EntityNotFound);

    let err = services
        .vehicles
        .get_value_by_id(Uuid::now_v7())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::EntityNotFound);
}

#[test]
fn test_filter_paginates_and_searches() {
    let services = services();
    let actor = Uuid::now_v7();
    for name in ["Alpha", "Beta", "Gamma", "Alphabet"] {
        services.bank_accounts.create(&account(name, 1.0), actor).unwrap();
    }

    let input = AssetFilterInput {
        base: BaseFilterInput {
            keyword: Some("alpha".to_string()),
            page: Some(1),
            page_size: Some(1),
            ..Default::default()
        },
        ..Default::default()
    };
    let (items, info) = services.bank_accounts.get_by_filter(&input).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(info.total_count, 2);
    assert_eq!(info.page_count, 2);

    let input = AssetFilterInput {
        status: Some("inactive".to_string()),
        ..Default::default()
    };
    let (items, info) = services.bank_accounts.get_by_filter(&input).unwrap();
    assert!(items.is_empty());
    assert_eq!(info.total_count, 0);
}

#[test]
fn test_value_filter_by_date_range() {
    let services = services();
    let actor = Uuid::now_v7();
    let created = services.bank_accounts.create(&account("Range", 1.0), actor).unwrap();
    for day in 1..=4 {
        services
            .bank_accounts
            .create_value(
                created.id,
                &ValueInput::new(t0() + Duration::days(day), day as f64),
                actor,
            )
            .unwrap();
    }

    let input = ValueFilterInput {
        start_date: Some(t0() + Duration::days(2)),
        end_date: Some(t0() + Duration::days(3)),
        ..ValueFilterInput::for_parent(created.id)
    };
    let (items, _) = services.bank_accounts.get_values_by_filter(&input).unwrap();
    let amounts: Vec<f64> = items.iter().map(|v| v.amount).collect();
    assert_eq!(amounts, vec![3.0, 2.0]);
}

#[test]
fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balances.db");
    let actor = Uuid::now_v7();

    let id = {
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        let services = Services::new(Arc::new(db));
        services.bank_accounts.create(&account("Disk", 7.0), actor).unwrap().id
    };

    let db = Database::open(&path).unwrap();
    db.migrate().unwrap();
    let services = Services::new(Arc::new(db));
    let fetched = services.bank_accounts.get_by_id(id, None).unwrap();
    assert_eq!(fetched.last_balance, 7.0);
    assert_eq!(fetched.id(), id);
}
