use relay_sync_client::{
    DeleteFieldIncomeByObject, DoubleIncrementIncomeByObject, FieldItem, LongIncomeByObject,
    LongIncrementIncomeByObject, StructureIncomeByObject,
};
use relay_sync_shared::{FieldType, ObjectId};
use relay_sync_test::{
    connect_client, exchange,
    test_protocol::{HEALTH, SCORE, SPEED, TANK_TEMPLATE, TURRETS},
    LocalRelay, TurretsParams,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn long_set_by_one_member_reaches_another() {
    init_logging();
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);

    let object_id = owner
        .new_object_builder(TANK_TEMPLATE, 0)
        .build()
        .unwrap();
    assert_eq!(object_id, ObjectId::new_member(1, 5));

    let collector = LongIncomeByObject::new(&observer, object_id, SCORE);
    owner.set_long(object_id, SCORE, 7799).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    assert_eq!(
        &*collector.stream(),
        &[FieldItem {
            creator: 5,
            object_id,
            value: 7799
        }]
    );
    assert_eq!(relay.long(object_id, SCORE), Some(7799));
}

#[test]
fn sender_does_not_observe_its_own_commands() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let object_id = ObjectId::new_member(1, 5);
    let collector = LongIncomeByObject::new(&owner, object_id, SCORE);

    owner.set_long(object_id, SCORE, 1).unwrap();
    exchange(&mut relay, &mut [&mut owner]);

    assert!(collector.is_empty());
}

#[test]
fn delete_field_reports_type_not_value() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let object_id = ObjectId::new_member(1, 5);
    let collector = DeleteFieldIncomeByObject::new(&observer, object_id, SCORE);

    owner.set_long(object_id, SCORE, 7799).unwrap();
    owner.delete_field(object_id, SCORE).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    assert_eq!(collector.len(), 1);
    assert_eq!(collector.stream()[0].value, FieldType::Long);
    assert_eq!(relay.long(object_id, SCORE), None);
}

#[test]
fn increments_arrive_as_deltas() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let object_id = ObjectId::new_member(1, 5);
    let longs = LongIncrementIncomeByObject::new(&observer, object_id, HEALTH);
    let doubles = DoubleIncrementIncomeByObject::new(&observer, object_id, SPEED);

    owner.increment_long(object_id, HEALTH, 5).unwrap();
    owner.increment_long(object_id, HEALTH, 3).unwrap();
    owner.increment_double(object_id, SPEED, 1.5).unwrap();
    owner.increment_double(object_id, SPEED, 1.5).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    let deltas: Vec<i64> = longs.stream().iter().map(|item| item.value).collect();
    assert_eq!(deltas, vec![5, 3]);
    assert_eq!(relay.long(object_id, HEALTH), Some(8));

    let deltas: Vec<f64> = doubles.stream().iter().map(|item| item.value).collect();
    assert_eq!(deltas, vec![1.5, 1.5]);
    assert_eq!(relay.double(object_id, SPEED), Some(3.0));
}

#[test]
fn streams_hold_one_update_only() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let object_id = ObjectId::new_member(1, 5);
    let collector = LongIncomeByObject::new(&observer, object_id, SCORE);

    for value in [10, 20, 30] {
        owner.set_long(object_id, SCORE, value).unwrap();
    }
    exchange(&mut relay, &mut [&mut owner, &mut observer]);
    let values: Vec<i64> = collector.stream().iter().map(|item| item.value).collect();
    assert_eq!(values, vec![10, 20, 30]);

    exchange(&mut relay, &mut [&mut owner, &mut observer]);
    assert!(collector.is_empty());

    owner.set_long(object_id, SCORE, 40).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);
    let values: Vec<i64> = collector.stream().iter().map(|item| item.value).collect();
    assert_eq!(values, vec![40]);
}

#[test]
fn listeners_never_see_other_objects() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let watched = ObjectId::new_member(1, 5);
    let other = ObjectId::new_member(2, 5);
    let room_object = ObjectId::new_room(1);
    let collector = LongIncomeByObject::new(&observer, watched, SCORE);

    owner.set_long(other, SCORE, 1).unwrap();
    owner.set_long(room_object, SCORE, 2).unwrap();
    owner.set_long(watched, HEALTH, 3).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    assert!(collector.is_empty());
}

#[test]
fn structures_travel_through_registered_codec() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let object_id = ObjectId::new_member(1, 5);
    let collector =
        StructureIncomeByObject::<TurretsParams>::new(&observer, object_id, TURRETS).unwrap();

    let params = TurretsParams {
        damage: 1.5,
        speed: 154,
    };
    owner.set_structure(object_id, TURRETS, &params).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    assert_eq!(collector.stream()[0].value, params);
}

#[test]
fn disposing_before_any_command_stops_delivery() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let object_id = ObjectId::new_member(1, 5);

    let mut collector = LongIncomeByObject::new(&observer, object_id, SCORE);
    collector.dispose();
    let key = relay_sync_shared::FieldKey::of(object_id, SCORE);
    assert_eq!(
        observer
            .dispatcher()
            .routers()
            .set_long
            .by_object
            .listener_count(&key),
        0
    );

    owner.set_long(object_id, SCORE, 1).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    assert!(collector.is_empty());
}
