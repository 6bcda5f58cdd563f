//! Sample game protocol used across the end-to-end tests
use std::sync::Arc;

use relay_sync_shared::{
    Buffer, BufferError, Codec, CodecError, CodecRegistryBuilder, DoubleFieldId, EventFieldId,
    LongFieldId, StructureFieldId, TemplateId, Vector3,
};

pub const TANK_TEMPLATE: TemplateId = 1;
pub const MINE_TEMPLATE: TemplateId = 2;

pub const SCORE: LongFieldId = LongFieldId::new(999);
pub const HEALTH: LongFieldId = LongFieldId::new(1);
pub const SPEED: DoubleFieldId = DoubleFieldId::new(2);
pub const TURRETS: StructureFieldId = StructureFieldId::new(3);
pub const DROP_MINE: EventFieldId = EventFieldId::new(4);

#[derive(Clone, Debug, PartialEq)]
pub struct TurretsParams {
    pub damage: f64,
    pub speed: i32,
}

pub struct TurretsParamsCodec {
    damage: Arc<dyn Codec<Value = f64>>,
    speed: Arc<dyn Codec<Value = i32>>,
}

impl Codec for TurretsParamsCodec {
    type Value = TurretsParams;

    fn encode(&self, value: &TurretsParams, buffer: &mut Buffer) -> Result<(), BufferError> {
        self.damage.encode(&value.damage, buffer)?;
        self.speed.encode(&value.speed, buffer)
    }

    fn decode(&self, buffer: &mut Buffer) -> Result<TurretsParams, BufferError> {
        Ok(TurretsParams {
            damage: self.damage.decode(buffer)?,
            speed: self.speed.decode(buffer)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DropMineEvent {
    pub position: Vector3,
    pub mine_id: u16,
}

pub struct DropMineEventCodec {
    position: Arc<dyn Codec<Value = Vector3>>,
    mine_id: Arc<dyn Codec<Value = u16>>,
}

impl Codec for DropMineEventCodec {
    type Value = DropMineEvent;

    fn encode(&self, value: &DropMineEvent, buffer: &mut Buffer) -> Result<(), BufferError> {
        self.position.encode(&value.position, buffer)?;
        self.mine_id.encode(&value.mine_id, buffer)
    }

    fn decode(&self, buffer: &mut Buffer) -> Result<DropMineEvent, BufferError> {
        Ok(DropMineEvent {
            position: self.position.decode(buffer)?,
            mine_id: self.mine_id.decode(buffer)?,
        })
    }
}

/// Standard codecs plus the sample structures and events
pub fn codecs() -> Result<CodecRegistryBuilder, CodecError> {
    let mut builder = CodecRegistryBuilder::new();
    builder
        .register(|resolver| {
            Ok(TurretsParamsCodec {
                damage: resolver.get::<f64>()?,
                speed: resolver.get::<i32>()?,
            })
        })?
        .register(|resolver| {
            Ok(DropMineEventCodec {
                position: resolver.get::<Vector3>()?,
                mine_id: resolver.get::<u16>()?,
            })
        })?;
    Ok(builder)
}
