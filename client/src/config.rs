use relay_sync_shared::MemberId;

/// Contains Config properties which will be used by a relay-sync client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Member id assigned to this client by the relay. Written as the
    /// creator of every outbound command and embedded in the ids of
    /// objects this client creates.
    pub member_id: MemberId,
    /// Numeric id given to the first object this client creates; later
    /// objects count up from it
    pub first_object_id: u64,
    /// Upper bound on inbound records drained by one `update()`. `None`
    /// drains until the transport is empty. Records left over are handled
    /// on the next update.
    pub max_records_per_update: Option<usize>,
}

impl ClientConfig {
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            member_id: 0,
            first_object_id: 1,
            max_records_per_update: None,
        }
    }
}
