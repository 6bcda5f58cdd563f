use std::ops::{Deref, DerefMut};

use relay_sync_shared::TemplateId;

use super::by_object::collector_deref;
use crate::{
    dispatcher::Dispatcher,
    income::Collector,
    router::{CreatedObject, DeletedObject},
};

/// Objects of a template that finished construction during the update,
/// each with the field values its creator set
pub struct CreatedObjectByTemplateIncome {
    collector: Collector<CreatedObject>,
}

impl CreatedObjectByTemplateIncome {
    pub fn new(dispatcher: &impl AsRef<Dispatcher>, template: TemplateId) -> Self {
        let dispatcher = dispatcher.as_ref();
        let router = &dispatcher.routers().objects.created_by_template;
        Self {
            collector: Collector::new(dispatcher, router, template, |created| {
                Ok(Some(created.clone()))
            }),
        }
    }
}

collector_deref!(CreatedObjectByTemplateIncome, CreatedObject);

/// Objects of a template deleted during the update
pub struct DeletedObjectByTemplateIncome {
    collector: Collector<DeletedObject>,
}

impl DeletedObjectByTemplateIncome {
    pub fn new(dispatcher: &impl AsRef<Dispatcher>, template: TemplateId) -> Self {
        let dispatcher = dispatcher.as_ref();
        let router = &dispatcher.routers().objects.deleted_by_template;
        Self {
            collector: Collector::new(dispatcher, router, template, |deleted| {
                Ok(Some(*deleted))
            }),
        }
    }
}

collector_deref!(DeletedObjectByTemplateIncome, DeletedObject);
