use std::ops::{Deref, DerefMut};

use relay_sync_shared::{
    CodecError, DoubleFieldId, EventFieldId, FieldId, FieldKind, FieldType, LongFieldId,
    StructureFieldId, TemplateId,
};

use super::by_object::{collector_deref, decode_item};
use crate::{
    dispatcher::Dispatcher,
    income::{Collector, FieldItem},
};

macro_rules! income_by_field {
    ($(#[$meta:meta])* $name:ident, $router:ident, $field_id:ty, $value:ty) => {
        $(#[$meta])*
        pub struct $name {
            collector: Collector<FieldItem<$value>>,
        }

        impl $name {
            pub fn new(
                dispatcher: &impl AsRef<Dispatcher>,
                template: TemplateId,
                field_id: $field_id,
            ) -> Self {
                let dispatcher = dispatcher.as_ref();
                let router = &dispatcher.routers().$router.by_field;
                Self {
                    collector: Collector::new(
                        dispatcher,
                        router,
                        (template, field_id.id()),
                        |notification| Ok(Some(FieldItem::from(notification))),
                    ),
                }
            }
        }

        collector_deref!($name, FieldItem<$value>);
    };
}

income_by_field!(
    /// Values set on one long field of every created object of a template
    LongIncomeByField,
    set_long,
    LongFieldId,
    i64
);
income_by_field!(
    LongIncrementIncomeByField,
    increment_long,
    LongFieldId,
    i64
);
income_by_field!(
    CompareAndSetLongIncomeByField,
    compare_and_set_long,
    LongFieldId,
    i64
);
income_by_field!(DoubleIncomeByField, set_double, DoubleFieldId, f64);
income_by_field!(
    DoubleIncrementIncomeByField,
    increment_double,
    DoubleFieldId,
    f64
);

/// Structure values set on one field of every created object of a
/// template, decoded as `T`
pub struct StructureIncomeByField<T> {
    collector: Collector<FieldItem<T>>,
}

impl<T: 'static> StructureIncomeByField<T> {
    pub fn new(
        dispatcher: &impl AsRef<Dispatcher>,
        template: TemplateId,
        field_id: StructureFieldId,
    ) -> Result<Self, CodecError> {
        let dispatcher = dispatcher.as_ref();
        let codec = dispatcher.codecs().get::<T>()?;
        let router = &dispatcher.routers().set_structure.by_field;
        Ok(Self {
            collector: Collector::new(
                dispatcher,
                router,
                (template, field_id.id()),
                move |notification| decode_item(codec.as_ref(), notification).map(Some),
            ),
        })
    }
}

collector_deref!(StructureIncomeByField<T>, FieldItem<T>);

pub struct EventIncomeByField<T> {
    collector: Collector<FieldItem<T>>,
}

impl<T: 'static> EventIncomeByField<T> {
    pub fn new(
        dispatcher: &impl AsRef<Dispatcher>,
        template: TemplateId,
        field_id: EventFieldId,
    ) -> Result<Self, CodecError> {
        let dispatcher = dispatcher.as_ref();
        let codec = dispatcher.codecs().get::<T>()?;
        let router = &dispatcher.routers().event.by_field;
        Ok(Self {
            collector: Collector::new(
                dispatcher,
                router,
                (template, field_id.id()),
                move |notification| decode_item(codec.as_ref(), notification).map(Some),
            ),
        })
    }
}

collector_deref!(EventIncomeByField<T>, FieldItem<T>);

pub struct DeleteFieldIncomeByField {
    collector: Collector<FieldItem<FieldType>>,
}

impl DeleteFieldIncomeByField {
    pub fn new<K: FieldKind>(
        dispatcher: &impl AsRef<Dispatcher>,
        template: TemplateId,
        field_id: FieldId<K>,
    ) -> Self {
        let dispatcher = dispatcher.as_ref();
        let router = &dispatcher.routers().delete_field.by_field;
        Self {
            collector: Collector::new(
                dispatcher,
                router,
                (template, field_id.id()),
                |notification| {
                    Ok((notification.value == K::FIELD_TYPE)
                        .then(|| FieldItem::from(notification)))
                },
            ),
        }
    }
}

collector_deref!(DeleteFieldIncomeByField, FieldItem<FieldType>);
