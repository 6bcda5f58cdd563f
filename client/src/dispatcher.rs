use std::{cell::RefCell, rc::Rc, sync::Arc};

use log::{trace, warn};

use relay_sync_shared::{CodecRegistry, Command, CommandRecord, MemberId, ObjectId};

use crate::{
    error::{ClientError, ListenerError},
    router::{FieldNotification, FieldRouter, Router, Routers},
};

type ErrorHook = Box<dyn FnMut(&ClientError)>;

/// Decodes inbound records and hands each to the router of its kind
///
/// Failures never abort a batch: they are logged, passed to the error hook
/// if one is set, and the next record is processed.
pub struct Dispatcher {
    codecs: Arc<CodecRegistry>,
    routers: Routers,
    before_update: Rc<Router<(), ()>>,
    error_hook: RefCell<Option<ErrorHook>>,
}

impl AsRef<Dispatcher> for Dispatcher {
    fn as_ref(&self) -> &Dispatcher {
        self
    }
}

impl Dispatcher {
    pub fn new(codecs: Arc<CodecRegistry>) -> Self {
        Self {
            codecs,
            routers: Routers::default(),
            before_update: Rc::new(Router::new()),
            error_hook: RefCell::new(None),
        }
    }

    pub fn codecs(&self) -> &Arc<CodecRegistry> {
        &self.codecs
    }

    pub fn routers(&self) -> &Routers {
        &self.routers
    }

    /// Listeners run at the start of every update, before any record is
    /// drained
    pub fn before_update(&self) -> &Rc<Router<(), ()>> {
        &self.before_update
    }

    pub fn set_error_hook(&self, hook: impl FnMut(&ClientError) + 'static) {
        *self.error_hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn clear_error_hook(&self) {
        self.error_hook.borrow_mut().take();
    }

    pub(crate) fn begin_update(&self) {
        self.before_update.notify(&(), &(), &mut |error| {
            self.report(ClientError::BeforeUpdate(error))
        });
    }

    pub fn dispatch_record(&self, record: &CommandRecord) {
        match Command::decode(record) {
            Ok(command) => self.dispatch(record.creator, &command),
            Err(error) => {
                self.report(ClientError::Command(error));
            }
        }
    }

    pub fn dispatch(&self, creator: MemberId, command: &Command) {
        let kind = command.kind();
        trace!("Dispatching {:?} from member {}", kind, creator);

        let mut on_error = |source: ListenerError| {
            self.report(ClientError::Listener { kind, source })
        };
        let routers = &self.routers;
        let objects = &routers.objects;

        match command {
            Command::Create {
                object_id,
                template,
                access_groups,
            } => objects.on_create(creator, *object_id, *template, *access_groups, &self.codecs),
            Command::Created { object_id } => {
                objects.on_created(creator, *object_id, &mut on_error)
            }
            Command::SetLong {
                object_id,
                field_id,
                value,
            } => {
                objects.with_constructing(*object_id, |object| {
                    object.set_long(field_id.id(), *value)
                });
                self.notify_field(
                    &routers.set_long,
                    creator,
                    *object_id,
                    field_id.id(),
                    *value,
                    &mut on_error,
                );
            }
            Command::IncrementLong {
                object_id,
                field_id,
                increment,
            } => {
                objects.with_constructing(*object_id, |object| {
                    object.increment_long(field_id.id(), *increment)
                });
                self.notify_field(
                    &routers.increment_long,
                    creator,
                    *object_id,
                    field_id.id(),
                    *increment,
                    &mut on_error,
                );
            }
            Command::CompareAndSetLong {
                object_id,
                field_id,
                new,
                ..
            } => {
                objects.with_constructing(*object_id, |object| {
                    object.set_long(field_id.id(), *new)
                });
                self.notify_field(
                    &routers.compare_and_set_long,
                    creator,
                    *object_id,
                    field_id.id(),
                    *new,
                    &mut on_error,
                );
            }
            Command::SetDouble {
                object_id,
                field_id,
                value,
            } => {
                objects.with_constructing(*object_id, |object| {
                    object.set_double(field_id.id(), *value)
                });
                self.notify_field(
                    &routers.set_double,
                    creator,
                    *object_id,
                    field_id.id(),
                    *value,
                    &mut on_error,
                );
            }
            Command::IncrementDouble {
                object_id,
                field_id,
                increment,
            } => {
                objects.with_constructing(*object_id, |object| {
                    object.increment_double(field_id.id(), *increment)
                });
                self.notify_field(
                    &routers.increment_double,
                    creator,
                    *object_id,
                    field_id.id(),
                    *increment,
                    &mut on_error,
                );
            }
            Command::SetStructure {
                object_id,
                field_id,
                value,
            } => {
                objects.record_structure(*object_id, field_id.id(), value);
                self.notify_field(
                    &routers.set_structure,
                    creator,
                    *object_id,
                    field_id.id(),
                    *value,
                    &mut on_error,
                );
            }
            // A targeted event only reaches its target, which handles it
            // like any other event
            Command::Event {
                object_id,
                field_id,
                event,
            }
            | Command::TargetEvent {
                object_id,
                field_id,
                event,
                ..
            } => self.notify_field(
                &routers.event,
                creator,
                *object_id,
                field_id.id(),
                *event,
                &mut on_error,
            ),
            Command::DeleteField {
                object_id,
                field_id,
                field_type,
            } => {
                objects.record_delete_field(*object_id, *field_id, *field_type);
                self.notify_field(
                    &routers.delete_field,
                    creator,
                    *object_id,
                    *field_id,
                    *field_type,
                    &mut on_error,
                );
            }
            Command::Delete { object_id } => {
                objects.on_delete(creator, *object_id, &mut on_error)
            }
        }
    }

    fn notify_field<V>(
        &self,
        router: &FieldRouter<V>,
        creator: MemberId,
        object_id: ObjectId,
        field_id: u16,
        value: V,
        on_error: &mut dyn FnMut(ListenerError),
    ) {
        let notification = FieldNotification {
            creator,
            object_id,
            field_id,
            value,
        };
        let template = self.routers.objects.template_of(object_id);
        router.notify(template, &notification, on_error);
    }

    pub(crate) fn report(&self, error: ClientError) {
        warn!("{}", error);
        // A hook that reports again from inside itself only gets logged
        if let Ok(mut hook) = self.error_hook.try_borrow_mut() {
            if let Some(hook) = hook.as_mut() {
                hook(&error);
            }
        }
    }
}
