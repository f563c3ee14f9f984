//! Integration tests for the sender's network path.
//!
//! These tests send real UDP datagrams over loopback: the production
//! `UdpDatagramSink` on one side and the `FrameMonitor` stand-in receiver on
//! the other, so chunking, markers and reassembly are checked end to end.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use ledboard_core::{encode_frame, Graphics, LedBoard};
use ledboard_sender::application::patterns::Diagonals;
use ledboard_sender::application::render::RenderLoop;
use ledboard_sender::infrastructure::network::{
    FrameMonitor, FrameTransport, SendPolicy, TransportSettings, UdpDatagramSink,
};

const FRAME_LEN: usize = 96 * 48;

async fn monitor_and_sink() -> (FrameMonitor, UdpDatagramSink) {
    let monitor = FrameMonitor::bind("127.0.0.1:0".parse().unwrap(), FRAME_LEN)
        .await
        .expect("monitor must bind on loopback");
    let port = monitor.local_addr().unwrap().port();
    let sink = UdpDatagramSink::connect("127.0.0.1", port)
        .await
        .expect("sink must open on loopback");
    (monitor, sink)
}

fn fast_settings() -> TransportSettings {
    TransportSettings {
        pacing_interval: Duration::from_millis(1),
        ..TransportSettings::default()
    }
}

#[tokio::test]
async fn test_reference_frame_arrives_whole_over_udp() {
    // Arrange
    let (mut monitor, sink) = monitor_and_sink().await;
    let transport = FrameTransport::new(sink, fast_settings());
    let mut board = LedBoard::new(96, 48, 0x7f, 9).unwrap();
    Graphics::new(&mut board).draw_line(2, 2, 45, 45, 0x7f);
    let frame = board.get_surface();

    // Act
    let report = transport.send_frame(&frame).await.expect("send must succeed");
    let received = tokio::time::timeout(Duration::from_secs(5), monitor.recv_frame())
        .await
        .expect("frame must arrive in time")
        .expect("recv must succeed");

    // Assert
    assert_eq!(report.datagrams, 9);
    assert!(report.is_complete());
    assert_eq!(received, encode_frame(&frame).unwrap());
}

#[tokio::test]
async fn test_render_loop_frames_are_received_in_order() {
    // Arrange
    let (mut monitor, sink) = monitor_and_sink().await;
    let transport = FrameTransport::new(
        sink,
        TransportSettings {
            send_policy: SendPolicy::BestEffort,
            ..fast_settings()
        },
    );
    let board = LedBoard::new(96, 48, 0x7f, 9).unwrap();
    let mut render = RenderLoop::new(board, transport, Duration::from_millis(5));
    let running = AtomicBool::new(true);

    // Act
    let stats = render
        .run(&mut Diagonals, Some(2), &running)
        .await
        .expect("render must succeed");
    let first = monitor.recv_frame().await.unwrap();
    let second = monitor.recv_frame().await.unwrap();

    // Assert
    assert_eq!(stats.frames_sent, 2);
    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|b| **b == 0x7f).count(), 88);
    assert_eq!(monitor.frames(), 2);
}
