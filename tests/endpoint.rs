//! End-to-end exchanges between a listening endpoint and a connecting
//! station, both running this crate's state machine.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::codec::Framed;

use voltage_iec60870::{
    connect, listen, Apdu, ApduCodec, Asdu, Connection, ConnectionAcceptor, ConnectionListener,
    ConnectionSettings, Cot, Iec60870Error, InformationElement, InformationObject, LinkState,
    Quality, QualifierOfInterrogation, ScaledValue, TypeId, UFunction,
};

#[derive(Debug)]
enum Event {
    Asdu(Asdu),
    Lost(Iec60870Error),
}

struct Recorder {
    tx: mpsc::UnboundedSender<Event>,
}

#[async_trait]
impl ConnectionListener for Recorder {
    async fn on_asdu_received(&self, _connection: &Connection, asdu: Asdu) {
        let _ = self.tx.send(Event::Asdu(asdu));
    }
    async fn on_connection_lost(&self, _connection: &Connection, error: Iec60870Error) {
        let _ = self.tx.send(Event::Lost(error));
    }
}

/// Confirms every activation it receives, from the reader context.
struct Confirming;

#[async_trait]
impl ConnectionListener for Confirming {
    async fn on_asdu_received(&self, connection: &Connection, asdu: Asdu) {
        if asdu.cause() == Cot::Activation {
            let _ = connection.send_confirmation(&asdu).await;
        }
    }
    async fn on_connection_lost(&self, _connection: &Connection, _error: Iec60870Error) {}
}

struct Acceptor {
    listener: Arc<dyn ConnectionListener>,
    connections: mpsc::UnboundedSender<Connection>,
}

#[async_trait]
impl ConnectionAcceptor for Acceptor {
    async fn listener_for(&self, _peer: SocketAddr) -> Option<Arc<dyn ConnectionListener>> {
        Some(self.listener.clone())
    }
    async fn connected(&self, connection: Connection) {
        let _ = self.connections.send(connection);
    }
}

struct RefuseAll;

#[async_trait]
impl ConnectionAcceptor for RefuseAll {
    async fn listener_for(&self, _peer: SocketAddr) -> Option<Arc<dyn ConnectionListener>> {
        None
    }
    async fn connected(&self, _connection: Connection) {}
}

fn scaled_asdu(ioa: u32, value: i16) -> Asdu {
    Asdu::new(
        TypeId::MeasuredScaled,
        Cot::Spontaneous,
        1,
        vec![InformationObject::new(
            ioa,
            vec![
                InformationElement::Scaled(ScaledValue(value)),
                InformationElement::Quality(Quality::GOOD),
            ],
        )],
    )
    .unwrap()
}

async fn recv_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn interrogation_is_confirmed_from_the_callback() {
    let settings = ConnectionSettings::default();
    let (server_conns_tx, _server_conns) = mpsc::unbounded_channel();
    let server = listen(
        "127.0.0.1:0",
        settings.clone(),
        Arc::new(Acceptor {
            listener: Arc::new(Confirming),
            connections: server_conns_tx,
        }),
    )
    .await
    .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = connect(server.local_addr(), settings, Arc::new(Recorder { tx }))
        .await
        .unwrap();
    client.start_data_transfer(Duration::from_secs(2)).await.unwrap();
    assert_eq!(client.state().await, LinkState::Started);

    client
        .interrogation(1, QualifierOfInterrogation::STATION)
        .await
        .unwrap();

    match recv_event(&mut rx).await {
        Event::Asdu(asdu) => {
            assert_eq!(asdu.type_id(), Some(TypeId::InterrogationCommand));
            assert_eq!(asdu.cause(), Cot::ActivationCon);
            assert_eq!(asdu.common_address(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }

    client.close().await;
    server.shutdown();
}

#[tokio::test]
async fn asdus_arrive_in_send_order() {
    let settings = ConnectionSettings::default();
    let (server_conns_tx, _server_conns) = mpsc::unbounded_channel();
    let (server_events_tx, mut server_events) = mpsc::unbounded_channel();
    let server = listen(
        "127.0.0.1:0",
        settings.clone(),
        Arc::new(Acceptor {
            listener: Arc::new(Recorder {
                tx: server_events_tx,
            }),
            connections: server_conns_tx,
        }),
    )
    .await
    .unwrap();

    let (tx, _rx) = mpsc::unbounded_channel();
    let client = connect(server.local_addr(), settings, Arc::new(Recorder { tx }))
        .await
        .unwrap();
    client.start_data_transfer(Duration::from_secs(2)).await.unwrap();

    for ioa in 1..=5u32 {
        client.send(scaled_asdu(ioa, ioa as i16)).await.unwrap();
    }

    for ioa in 1..=5u32 {
        match recv_event(&mut server_events).await {
            Event::Asdu(asdu) => {
                assert_eq!(asdu.information_objects()[0].address().value(), ioa);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    client.close().await;
    server.shutdown();
}

#[tokio::test]
async fn server_station_talks_back() {
    let settings = ConnectionSettings::default();
    let (server_conns_tx, mut server_conns) = mpsc::unbounded_channel();
    let server = listen(
        "127.0.0.1:0",
        settings.clone(),
        Arc::new(Acceptor {
            listener: Arc::new(Confirming),
            connections: server_conns_tx,
        }),
    )
    .await
    .unwrap();

    let (tx, mut client_events) = mpsc::unbounded_channel();
    let client = connect(server.local_addr(), settings, Arc::new(Recorder { tx }))
        .await
        .unwrap();
    let server_conn = timeout(Duration::from_secs(2), server_conns.recv())
        .await
        .unwrap()
        .unwrap();

    client.start_data_transfer(Duration::from_secs(2)).await.unwrap();
    // The server side entered Started through the STARTDT exchange.
    timeout(Duration::from_secs(2), async {
        while server_conn.state().await != LinkState::Started {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    // Spontaneous data in the monitoring direction.
    server_conn.send(scaled_asdu(42, -7)).await.unwrap();
    match recv_event(&mut client_events).await {
        Event::Asdu(asdu) => {
            assert_eq!(asdu.information_objects()[0].address().value(), 42);
            match &asdu.information_objects()[0].elements()[0] {
                InformationElement::Scaled(value) => assert_eq!(value.0, -7),
                other => panic!("unexpected element {other:?}"),
            }
        }
        other => panic!("unexpected event {other:?}"),
    }

    client.close().await;
    server.shutdown();
}

#[tokio::test]
async fn refused_connection_is_dropped() {
    let settings = ConnectionSettings::default();
    let server = listen("127.0.0.1:0", settings.clone(), Arc::new(RefuseAll))
        .await
        .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = connect(server.local_addr(), settings, Arc::new(Recorder { tx }))
        .await
        .unwrap();

    match recv_event(&mut rx).await {
        Event::Lost(Iec60870Error::TransportClosed) => {}
        other => panic!("unexpected event {other:?}"),
    }
    assert!(client.is_closed());
    server.shutdown();
}

#[tokio::test]
async fn framed_peer_sees_supervisory_ack() {
    // A scripted controlling station built from the public codec drives
    // the server end of this crate.
    let settings = ConnectionSettings::default().t2_timeout(Duration::from_millis(100));
    let (server_conns_tx, _server_conns) = mpsc::unbounded_channel();
    let (server_events_tx, mut server_events) = mpsc::unbounded_channel();
    let server = listen(
        "127.0.0.1:0",
        settings.clone(),
        Arc::new(Acceptor {
            listener: Arc::new(Recorder {
                tx: server_events_tx,
            }),
            connections: server_conns_tx,
        }),
    )
    .await
    .unwrap();

    let stream = TcpStream::connect(server.local_addr()).await.unwrap();
    let mut framed = Framed::new(stream, ApduCodec::new(settings));

    framed.send(Apdu::u_frame(UFunction::StartDtAct)).await.unwrap();
    let reply = framed.next().await.unwrap().unwrap();
    assert_eq!(reply, Apdu::u_frame(UFunction::StartDtCon));

    framed.send(Apdu::i_frame(0, 0, scaled_asdu(9, 99))).await.unwrap();
    match recv_event(&mut server_events).await {
        Event::Asdu(asdu) => {
            assert_eq!(asdu.information_objects()[0].address().value(), 9)
        }
        other => panic!("unexpected event {other:?}"),
    }

    // t2 elapses without reverse traffic: the server acknowledges with
    // an S-frame carrying recvSeq = 1.
    let reply = timeout(Duration::from_secs(2), framed.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(reply, Apdu::s_frame(1));

    server.shutdown();
}
