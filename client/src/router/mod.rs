mod listeners;
mod object_router;

pub use listeners::{ListenerId, ListenerResult, Router};
pub use object_router::{CreatedObject, DeletedObject, ObjectRouter};

use std::rc::Rc;

use relay_sync_shared::{Buffer, FieldKey, FieldType, MemberId, ObjectId, TemplateId};

use crate::error::ListenerError;

/// One field-level command as handed to listeners
#[derive(Clone, Debug, PartialEq)]
pub struct FieldNotification<V> {
    pub creator: MemberId,
    pub object_id: ObjectId,
    pub field_id: u16,
    pub value: V,
}

/// `(template, field id)`, the key of routers that observe one field on
/// every object of a template
pub type TemplateFieldKey = (TemplateId, u16);

/// Routes one field command kind by object and by template
pub struct FieldRouter<V> {
    pub by_object: Rc<Router<FieldKey, FieldNotification<V>>>,
    pub by_field: Rc<Router<TemplateFieldKey, FieldNotification<V>>>,
}

impl<V> Default for FieldRouter<V> {
    fn default() -> Self {
        Self {
            by_object: Rc::new(Router::new()),
            by_field: Rc::new(Router::new()),
        }
    }
}

impl<V> FieldRouter<V> {
    /// `template` is the template of the addressed object, when the object
    /// is known to be created. Objects still under construction only reach
    /// the per-object listeners.
    pub fn notify(
        &self,
        template: Option<TemplateId>,
        notification: &FieldNotification<V>,
        on_error: &mut dyn FnMut(ListenerError),
    ) -> usize {
        let key = FieldKey::new(notification.object_id, notification.field_id);
        let mut notified = self.by_object.notify(&key, notification, on_error);
        if let Some(template) = template {
            notified += self
                .by_field
                .notify(&(template, notification.field_id), notification, on_error);
        }
        notified
    }
}

/// One router per command kind
#[derive(Default)]
pub struct Routers {
    pub set_long: FieldRouter<i64>,
    pub increment_long: FieldRouter<i64>,
    /// Carries the value the relay accepted
    pub compare_and_set_long: FieldRouter<i64>,
    pub set_double: FieldRouter<f64>,
    pub increment_double: FieldRouter<f64>,
    pub set_structure: FieldRouter<Buffer>,
    pub event: FieldRouter<Buffer>,
    pub delete_field: FieldRouter<FieldType>,
    pub objects: ObjectRouter,
}
