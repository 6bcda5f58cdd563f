use std::ops::{Deref, DerefMut};

use relay_sync_shared::{
    Buffer, Codec, CodecError, DoubleFieldId, EventFieldId, FieldId, FieldKey, FieldKind, FieldType,
    LongFieldId, ObjectId, StructureFieldId,
};

use crate::{
    dispatcher::Dispatcher,
    error::ListenerError,
    income::{Collector, FieldItem},
    router::{DeletedObject, FieldNotification},
};

macro_rules! collector_deref {
    ($name:ident $(<$param:ident>)?, $item:ty) => {
        impl$(<$param: 'static>)? Deref for $name$(<$param>)? {
            type Target = Collector<$item>;

            fn deref(&self) -> &Self::Target {
                &self.collector
            }
        }

        impl$(<$param: 'static>)? DerefMut for $name$(<$param>)? {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.collector
            }
        }
    };
}
pub(super) use collector_deref;

macro_rules! income_by_object {
    ($(#[$meta:meta])* $name:ident, $router:ident, $field_id:ty, $value:ty) => {
        $(#[$meta])*
        pub struct $name {
            collector: Collector<FieldItem<$value>>,
        }

        impl $name {
            pub fn new(
                dispatcher: &impl AsRef<Dispatcher>,
                object_id: ObjectId,
                field_id: $field_id,
            ) -> Self {
                let dispatcher = dispatcher.as_ref();
                let router = &dispatcher.routers().$router.by_object;
                let key = FieldKey::new(object_id, field_id.id());
                Self {
                    collector: Collector::new(dispatcher, router, key, |notification| {
                        Ok(Some(FieldItem::from(notification)))
                    }),
                }
            }
        }

        collector_deref!($name, FieldItem<$value>);
    };
}

income_by_object!(
    /// Values set on one long field of one object
    LongIncomeByObject,
    set_long,
    LongFieldId,
    i64
);
income_by_object!(
    /// Deltas applied to one long field of one object, one item per
    /// increment
    LongIncrementIncomeByObject,
    increment_long,
    LongFieldId,
    i64
);
income_by_object!(
    /// Values the relay accepted through compare-and-set
    CompareAndSetLongIncomeByObject,
    compare_and_set_long,
    LongFieldId,
    i64
);
income_by_object!(DoubleIncomeByObject, set_double, DoubleFieldId, f64);
income_by_object!(
    DoubleIncrementIncomeByObject,
    increment_double,
    DoubleFieldId,
    f64
);

pub(super) fn decode_item<T: 'static>(
    codec: &dyn Codec<Value = T>,
    notification: &FieldNotification<Buffer>,
) -> Result<FieldItem<T>, ListenerError> {
    let mut buffer = notification.value;
    buffer.rewind();
    let value = codec.decode(&mut buffer).map_err(CodecError::from)?;
    Ok(FieldItem {
        creator: notification.creator,
        object_id: notification.object_id,
        value,
    })
}

/// Structure values set on one field of one object, decoded as `T`
pub struct StructureIncomeByObject<T> {
    collector: Collector<FieldItem<T>>,
}

impl<T: 'static> StructureIncomeByObject<T> {
    /// Fails with [`CodecError::MissingCodec`] if `T` has no codec
    pub fn new(
        dispatcher: &impl AsRef<Dispatcher>,
        object_id: ObjectId,
        field_id: StructureFieldId,
    ) -> Result<Self, CodecError> {
        let dispatcher = dispatcher.as_ref();
        let codec = dispatcher.codecs().get::<T>()?;
        let router = &dispatcher.routers().set_structure.by_object;
        let key = FieldKey::new(object_id, field_id.id());
        Ok(Self {
            collector: Collector::new(dispatcher, router, key, move |notification| {
                decode_item(codec.as_ref(), notification).map(Some)
            }),
        })
    }
}

collector_deref!(StructureIncomeByObject<T>, FieldItem<T>);

/// Events fired on one field of one object, decoded as `T`
pub struct EventIncomeByObject<T> {
    collector: Collector<FieldItem<T>>,
}

impl<T: 'static> EventIncomeByObject<T> {
    /// Fails with [`CodecError::MissingCodec`] if `T` has no codec
    pub fn new(
        dispatcher: &impl AsRef<Dispatcher>,
        object_id: ObjectId,
        field_id: EventFieldId,
    ) -> Result<Self, CodecError> {
        let dispatcher = dispatcher.as_ref();
        let codec = dispatcher.codecs().get::<T>()?;
        let router = &dispatcher.routers().event.by_object;
        let key = FieldKey::new(object_id, field_id.id());
        Ok(Self {
            collector: Collector::new(dispatcher, router, key, move |notification| {
                decode_item(codec.as_ref(), notification).map(Some)
            }),
        })
    }
}

collector_deref!(EventIncomeByObject<T>, FieldItem<T>);

/// Deletions of one field of one object; items carry the deleted field's
/// type, never its prior value
pub struct DeleteFieldIncomeByObject {
    collector: Collector<FieldItem<FieldType>>,
}

impl DeleteFieldIncomeByObject {
    pub fn new<K: FieldKind>(
        dispatcher: &impl AsRef<Dispatcher>,
        object_id: ObjectId,
        field_id: FieldId<K>,
    ) -> Self {
        let dispatcher = dispatcher.as_ref();
        let router = &dispatcher.routers().delete_field.by_object;
        let key = FieldKey::of(object_id, field_id);
        Self {
            collector: Collector::new(dispatcher, router, key, |notification| {
                Ok((notification.value == K::FIELD_TYPE).then(|| FieldItem::from(notification)))
            }),
        }
    }
}

collector_deref!(DeleteFieldIncomeByObject, FieldItem<FieldType>);

/// Deletion of one object
pub struct DeletedObjectIncomeByObject {
    collector: Collector<DeletedObject>,
}

impl DeletedObjectIncomeByObject {
    pub fn new(dispatcher: &impl AsRef<Dispatcher>, object_id: ObjectId) -> Self {
        let dispatcher = dispatcher.as_ref();
        let router = &dispatcher.routers().objects.deleted_by_object;
        Self {
            collector: Collector::new(dispatcher, router, object_id, |deleted| {
                Ok(Some(*deleted))
            }),
        }
    }
}

collector_deref!(DeletedObjectIncomeByObject, DeletedObject);
