use relay_sync_client::{
    CompareAndSetLongIncomeByObject, CreatedObjectByTemplateIncome,
    DeletedObjectByTemplateIncome, EventIncomeByField, EventIncomeByObject, LongIncomeByField,
    LongIncomeByObject,
};
use relay_sync_shared::{Command, ObjectId, Vector3};
use relay_sync_test::{
    connect_client, exchange,
    test_protocol::{DROP_MINE, HEALTH, MINE_TEMPLATE, SCORE, SPEED, TANK_TEMPLATE, TURRETS},
    DropMineEvent, LocalRelay, TurretsParams,
};

#[test]
fn compare_and_set_is_decided_by_relay() {
    let mut relay = LocalRelay::new();
    let mut first = connect_client(&mut relay, 2);
    let mut second = connect_client(&mut relay, 3);
    let mut observer = connect_client(&mut relay, 1);
    let object_id = ObjectId::new_room(1);
    let collector = CompareAndSetLongIncomeByObject::new(&observer, object_id, SCORE);

    first
        .compare_and_set_long(object_id, SCORE, 0, 10, None)
        .unwrap();
    second
        .compare_and_set_long(object_id, SCORE, 0, 20, None)
        .unwrap();
    exchange(&mut relay, &mut [&mut first, &mut second, &mut observer]);

    assert_eq!(collector.len(), 1);
    assert_eq!(collector.stream()[0].creator, 2);
    assert_eq!(collector.stream()[0].value, 10);
    assert_eq!(relay.long(object_id, SCORE), Some(10));
}

#[test]
fn compare_and_set_reset_applies_on_disconnect() {
    let mut relay = LocalRelay::new();
    let mut holder = connect_client(&mut relay, 2);
    let mut observer = connect_client(&mut relay, 1);
    let object_id = ObjectId::new_room(1);
    let sets = LongIncomeByObject::new(&observer, object_id, SCORE);

    holder
        .compare_and_set_long(object_id, SCORE, 0, 2, Some(0))
        .unwrap();
    exchange(&mut relay, &mut [&mut holder, &mut observer]);
    assert_eq!(relay.long(object_id, SCORE), Some(2));

    relay.disconnect(2);
    observer.update().unwrap();

    assert_eq!(sets.stream()[0].value, 0);
    assert_eq!(relay.long(object_id, SCORE), Some(0));
}

#[test]
fn targeted_event_reaches_target_only() {
    let mut relay = LocalRelay::new();
    let mut sender = connect_client(&mut relay, 5);
    let mut target = connect_client(&mut relay, 2);
    let mut bystander = connect_client(&mut relay, 3);
    let object_id = ObjectId::new_member(1, 5);
    let target_events =
        EventIncomeByObject::<DropMineEvent>::new(&target, object_id, DROP_MINE).unwrap();
    let bystander_events =
        EventIncomeByObject::<DropMineEvent>::new(&bystander, object_id, DROP_MINE).unwrap();

    let event = DropMineEvent {
        position: Vector3::new(1.0, 0.0, -1.0),
        mine_id: 7,
    };
    sender.send_event_to(2, object_id, DROP_MINE, &event).unwrap();
    exchange(
        &mut relay,
        &mut [&mut sender, &mut target, &mut bystander],
    );

    assert_eq!(target_events.stream()[0].value, event);
    assert_eq!(target_events.stream()[0].creator, 5);
    assert!(bystander_events.is_empty());
}

#[test]
fn created_object_carries_initial_state() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let tanks = CreatedObjectByTemplateIncome::new(&observer, TANK_TEMPLATE);
    let mines = CreatedObjectByTemplateIncome::new(&observer, MINE_TEMPLATE);

    let params = TurretsParams {
        damage: 3.0,
        speed: 12,
    };
    let mut builder = owner.new_object_builder(TANK_TEMPLATE, 0b1);
    builder.set_long(HEALTH, 100).set_double(SPEED, 2.5);
    builder.set_structure(TURRETS, &params).unwrap();
    let object_id = builder.build().unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    assert!(mines.is_empty());
    let stream = tanks.stream();
    assert_eq!(stream.len(), 1);
    let tank = &stream[0].object;
    assert_eq!(stream[0].creator, 5);
    assert_eq!(tank.object_id(), object_id);
    assert_eq!(tank.template(), TANK_TEMPLATE);
    assert_eq!(tank.access_groups(), 0b1);
    assert_eq!(tank.get_long(HEALTH), Some(100));
    assert_eq!(tank.get_double(SPEED), Some(2.5));
    assert_eq!(tank.get_structure::<TurretsParams>(TURRETS).unwrap(), Some(params));
}

#[test]
fn template_collectors_follow_object_lifecycle() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut observer = connect_client(&mut relay, 1);
    let scores = LongIncomeByField::new(&observer, TANK_TEMPLATE, SCORE);
    let mines = EventIncomeByField::<DropMineEvent>::new(&observer, TANK_TEMPLATE, DROP_MINE)
        .unwrap();
    let deleted = DeletedObjectByTemplateIncome::new(&observer, TANK_TEMPLATE);

    let first = owner.new_object_builder(TANK_TEMPLATE, 0).build().unwrap();
    let second = owner.new_object_builder(TANK_TEMPLATE, 0).build().unwrap();
    let mine = owner.new_object_builder(MINE_TEMPLATE, 0).build().unwrap();
    assert_ne!(first, second);

    owner.set_long(first, SCORE, 1).unwrap();
    owner.set_long(second, SCORE, 2).unwrap();
    owner.set_long(mine, SCORE, 3).unwrap();
    owner
        .send_event(
            second,
            DROP_MINE,
            &DropMineEvent {
                position: Vector3::default(),
                mine_id: 1,
            },
        )
        .unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    let objects: Vec<ObjectId> = scores.stream().iter().map(|item| item.object_id).collect();
    assert_eq!(objects, vec![first, second]);
    assert_eq!(mines.stream()[0].object_id, second);

    owner.delete_object(first).unwrap();
    owner.delete_object(mine).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);

    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted.stream()[0].object_id, first);

    // deleted objects no longer match template collectors
    owner.set_long(first, SCORE, 4).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut observer]);
    assert!(scores.is_empty());
    assert_eq!(relay.long(first, SCORE), Some(4));
}

#[test]
fn by_field_collectors_see_changes_to_own_objects() {
    let mut relay = LocalRelay::new();
    let mut owner = connect_client(&mut relay, 5);
    let mut other = connect_client(&mut relay, 2);
    let by_field = LongIncomeByField::new(&owner, TANK_TEMPLATE, SCORE);

    let tank = owner.new_object_builder(TANK_TEMPLATE, 0).build().unwrap();
    let by_object = LongIncomeByObject::new(&owner, tank, SCORE);
    exchange(&mut relay, &mut [&mut owner, &mut other]);

    other.set_long(tank, SCORE, 42).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut other]);

    assert_eq!(by_object.len(), 1);
    assert_eq!(by_field.len(), 1);
    assert_eq!(by_field.stream()[0].object_id, tank);
    assert_eq!(by_field.stream()[0].creator, 2);
    assert_eq!(by_field.stream()[0].value, 42);

    // once deleted locally the object leaves template collectors
    owner.delete_object(tank).unwrap();
    other.set_long(tank, SCORE, 43).unwrap();
    exchange(&mut relay, &mut [&mut owner, &mut other]);
    assert!(by_field.is_empty());
    assert_eq!(by_object.len(), 1);
}

#[test]
fn departed_member_leaves_no_half_built_objects() {
    let mut relay = LocalRelay::new();
    let mut observer = connect_client(&mut relay, 1);
    let tanks = CreatedObjectByTemplateIncome::new(&observer, TANK_TEMPLATE);
    let object_id = ObjectId::new_member(1, 5);

    let create = Command::Create {
        object_id,
        template: TANK_TEMPLATE,
        access_groups: 0,
    };
    let transport = observer.transport().clone();
    transport.push_inbound(&create.encode(5).unwrap()).unwrap();
    observer.update().unwrap();
    assert!(observer.dispatcher().routers().objects.is_constructing(object_id));

    observer.member_left(5);
    assert!(!observer.dispatcher().routers().objects.is_constructing(object_id));

    let created = Command::Created { object_id };
    transport.push_inbound(&created.encode(5).unwrap()).unwrap();
    observer.update().unwrap();
    assert!(tanks.is_empty());
}
