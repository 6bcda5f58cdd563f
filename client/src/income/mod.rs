mod by_field;
mod by_object;
mod by_template;
mod collector;

pub use by_field::{
    CompareAndSetLongIncomeByField, DeleteFieldIncomeByField, DoubleIncomeByField,
    DoubleIncrementIncomeByField, EventIncomeByField, LongIncomeByField,
    LongIncrementIncomeByField, StructureIncomeByField,
};
pub use by_object::{
    CompareAndSetLongIncomeByObject, DeleteFieldIncomeByObject, DeletedObjectIncomeByObject,
    DoubleIncomeByObject, DoubleIncrementIncomeByObject, EventIncomeByObject,
    LongIncomeByObject, LongIncrementIncomeByObject, StructureIncomeByObject,
};
pub use by_template::{CreatedObjectByTemplateIncome, DeletedObjectByTemplateIncome};
pub use collector::Collector;

use relay_sync_shared::{MemberId, ObjectId};

use crate::router::FieldNotification;

/// One field command observed during the current update
#[derive(Clone, Debug, PartialEq)]
pub struct FieldItem<V> {
    pub creator: MemberId,
    pub object_id: ObjectId,
    pub value: V,
}

impl<V: Clone> From<&FieldNotification<V>> for FieldItem<V> {
    fn from(notification: &FieldNotification<V>) -> Self {
        Self {
            creator: notification.creator,
            object_id: notification.object_id,
            value: notification.value.clone(),
        }
    }
}
