use relay_sync_client::{ClientConfig, MemoryTransport, RelayClient};
use relay_sync_shared::MemberId;

use crate::{local_relay::LocalRelay, test_protocol};

pub type TestClient = RelayClient<MemoryTransport>;

/// Connects a client for `member_id` to `relay` using the sample protocol
pub fn connect_client(relay: &mut LocalRelay, member_id: MemberId) -> TestClient {
    let transport = relay.connect(member_id);
    let codecs = test_protocol::codecs().unwrap();
    RelayClient::new(ClientConfig::new(member_id), codecs, transport).unwrap()
}

/// Forwards everything sent so far, then runs one update on each client
pub fn exchange(relay: &mut LocalRelay, clients: &mut [&mut TestClient]) {
    relay.tick();
    for client in clients.iter_mut() {
        client.update().unwrap();
    }
}
