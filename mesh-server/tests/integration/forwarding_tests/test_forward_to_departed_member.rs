use mesh_core::{EnvelopeKind, NegotiationEnvelope, ParticipantId, SignalMessage};
use serde_json::json;

use crate::integration::{create_test_room, init_tracing};
use crate::utils::{CapturedSignal, collect_signals, expect_quiet, forward, join, leave};

#[tokio::test]
async fn test_forward_to_departed_member() {
    init_tracing();

    let (room_tx, mut signal_rx, _signaling) = create_test_room();

    join(&room_tx, "id1", "alice").await.unwrap();
    join(&room_tx, "id2", "bob").await.unwrap();
    join(&room_tx, "id3", "carol").await.unwrap();
    collect_signals(&mut signal_rx, 6).await.unwrap();

    leave(&room_tx, "id2").await.unwrap();
    collect_signals(&mut signal_rx, 2).await.unwrap();

    let stale = NegotiationEnvelope {
        kind: EnvelopeKind::Candidate,
        sender: "id1".into(),
        target: "id2".into(),
        payload: json!({"candidate": "candidate:1 1 udp 2122260223 10.0.0.1 54321 typ host"}),
    };
    forward(&room_tx, "id1", stale).await.unwrap();
    expect_quiet(&mut signal_rx).await.unwrap();

    // Other pairs keep working.
    let answer = NegotiationEnvelope {
        kind: EnvelopeKind::Answer,
        sender: "id3".into(),
        target: "id1".into(),
        payload: json!({"type": "answer", "sdp": "v=0"}),
    };
    forward(&room_tx, "id3", answer.clone()).await.unwrap();
    let signals = collect_signals(&mut signal_rx, 1).await.unwrap();
    assert_eq!(
        signals,
        vec![CapturedSignal::Sent {
            to: ParticipantId::from("id1"),
            msg: SignalMessage::from(answer),
        }]
    );
}
