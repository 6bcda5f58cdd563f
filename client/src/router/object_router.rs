use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc};

use log::{debug, warn};

use relay_sync_shared::{
    AccessGroups, Buffer, CodecRegistry, FieldType, MemberId, ObjectId, TemplateId,
};

use crate::{error::ListenerError, object_constructor::ObjectConstructor, router::Router};

/// Delivered once per object when its creator finishes constructing it
#[derive(Clone, Debug)]
pub struct CreatedObject {
    pub creator: MemberId,
    pub object: ObjectConstructor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeletedObject {
    pub creator: MemberId,
    pub object_id: ObjectId,
    /// `None` if the object was deleted before this client saw it created
    pub template: Option<TemplateId>,
}

/// Tracks object lifecycle and routes created/deleted transitions
///
/// Objects built by this client never come back from the relay, so their
/// templates are recorded when they are sent.
#[derive(Default)]
pub struct ObjectRouter {
    constructing: RefCell<HashMap<ObjectId, (MemberId, ObjectConstructor)>>,
    templates: RefCell<HashMap<ObjectId, TemplateId>>,
    pub created_by_template: Rc<Router<TemplateId, CreatedObject>>,
    pub deleted_by_template: Rc<Router<TemplateId, DeletedObject>>,
    pub deleted_by_object: Rc<Router<ObjectId, DeletedObject>>,
}

impl ObjectRouter {
    /// Template of a created, not yet deleted object
    pub fn template_of(&self, object_id: ObjectId) -> Option<TemplateId> {
        self.templates.borrow().get(&object_id).copied()
    }

    pub fn is_constructing(&self, object_id: ObjectId) -> bool {
        self.constructing.borrow().contains_key(&object_id)
    }

    pub(crate) fn on_create(
        &self,
        creator: MemberId,
        object_id: ObjectId,
        template: TemplateId,
        access_groups: AccessGroups,
        codecs: &Arc<CodecRegistry>,
    ) {
        let constructor =
            ObjectConstructor::new(object_id, template, access_groups, codecs.clone());
        if self
            .constructing
            .borrow_mut()
            .insert(object_id, (creator, constructor))
            .is_some()
        {
            warn!("Object {} created twice, restarting construction", object_id);
        }
    }

    pub(crate) fn on_created(
        &self,
        creator: MemberId,
        object_id: ObjectId,
        on_error: &mut dyn FnMut(ListenerError),
    ) {
        let Some((_, object)) = self.constructing.borrow_mut().remove(&object_id) else {
            warn!("Ignoring created command for unknown object {}", object_id);
            return;
        };
        let template = object.template();
        self.templates.borrow_mut().insert(object_id, template);

        self.created_by_template
            .notify(&template, &CreatedObject { creator, object }, on_error);
    }

    pub(crate) fn on_local_created(&self, object_id: ObjectId, template: TemplateId) {
        self.templates.borrow_mut().insert(object_id, template);
    }

    pub(crate) fn on_local_delete(&self, object_id: ObjectId) {
        self.templates.borrow_mut().remove(&object_id);
    }

    /// Drops every construction `member_id` started but never finished
    pub(crate) fn on_member_left(&self, member_id: MemberId) -> usize {
        let mut constructing = self.constructing.borrow_mut();
        let before = constructing.len();
        constructing.retain(|_, (creator, _)| *creator != member_id);
        let dropped = before - constructing.len();
        if dropped > 0 {
            debug!(
                "Dropped {} unfinished objects of departed member {}",
                dropped, member_id
            );
        }
        dropped
    }

    pub(crate) fn on_delete(
        &self,
        creator: MemberId,
        object_id: ObjectId,
        on_error: &mut dyn FnMut(ListenerError),
    ) {
        self.constructing.borrow_mut().remove(&object_id);
        let template = self.templates.borrow_mut().remove(&object_id);
        let deleted = DeletedObject {
            creator,
            object_id,
            template,
        };

        self.deleted_by_object.notify(&object_id, &deleted, on_error);
        if let Some(template) = template {
            self.deleted_by_template.notify(&template, &deleted, on_error);
        }
    }

    /// Applies `apply` to the object if it is still under construction
    pub(crate) fn with_constructing(
        &self,
        object_id: ObjectId,
        apply: impl FnOnce(&mut ObjectConstructor),
    ) {
        if let Some((_, object)) = self.constructing.borrow_mut().get_mut(&object_id) {
            apply(object);
        }
    }

    pub(crate) fn record_structure(&self, object_id: ObjectId, field_id: u16, value: &Buffer) {
        self.with_constructing(object_id, |object| object.set_structure(field_id, *value));
    }

    pub(crate) fn record_delete_field(
        &self,
        object_id: ObjectId,
        field_id: u16,
        field_type: FieldType,
    ) {
        self.with_constructing(object_id, |object| object.delete_field(field_id, field_type));
    }
}
