//! Integration tests for the ledboard-core frame pipeline.
//!
//! These tests drive the public API the way the sender does: draw on a board,
//! flatten it in wiring order, encode it and cut it into datagrams, then check
//! the result byte for byte and reassemble it on the receiving side.

use ledboard_core::{
    chunk_payload, decode_frame, encode_frame,
    protocol::{CONTINUATION_MARKER, DEFAULT_MAX_CHUNK_SIZE, FRAME_START_MARKER},
    BoardConfig, FrameAssembler, Graphics, LedBoard, PanelOrder, PanelPos, PixelSink,
    PixelSurface,
};

fn reference_board() -> LedBoard {
    LedBoard::new(96, 48, 0x7f, 9).expect("reference geometry must be valid")
}

#[test]
fn test_diagonal_line_frame_is_nine_datagrams() {
    // Arrange
    let mut board = reference_board();
    Graphics::new(&mut board).draw_line(2, 2, 45, 45, 0x7f);

    // Act
    let frame = board.get_surface();
    let bytes = encode_frame(&frame).expect("encode must succeed");
    let datagrams = chunk_payload(&bytes, DEFAULT_MAX_CHUNK_SIZE).expect("chunk must succeed");

    // Assert
    assert_eq!(bytes.len(), 96 * 48);
    assert_eq!(datagrams.len(), 9);
    assert_eq!(datagrams[0][0], FRAME_START_MARKER);
    assert!(datagrams[1..].iter().all(|d| d[0] == CONTINUATION_MARKER));
    assert!(datagrams.iter().all(|d| d.len() == 513));
    assert_eq!(bytes.iter().filter(|b| **b == 0x7f).count(), 44);
}

#[test]
fn test_every_panel_lands_in_its_wiring_slot() {
    // Arrange: mark each panel's origin with its slot number in the wiring.
    let mut board = reference_board();
    let order: Vec<PanelPos> = board.panel_order().positions().to_vec();
    for (slot, pos) in order.iter().enumerate() {
        let x = (pos.col * board.panel_width()) as i32;
        let y = (pos.row * board.panel_height()) as i32;
        board.set_pixel(x, y, slot as i32 + 1);
    }

    // Act
    let bytes = encode_frame(&board.get_surface()).unwrap();

    // Assert
    let panel_len = 32 * 16;
    for slot in 0..9 {
        assert_eq!(bytes[slot * panel_len], slot as u8 + 1, "slot {slot}");
    }
}

#[test]
fn test_reassembled_frame_matches_board_capture() {
    // Arrange
    let config = BoardConfig {
        panel_order: Some(PanelOrder::row_major(3, 3)),
        ..BoardConfig::default()
    };
    let mut board = LedBoard::from_config(&config).unwrap();
    Graphics::new(&mut board).draw_circle(48, 24, 20, 0x7f);
    let bytes = encode_frame(&board.get_surface()).unwrap();

    // Act
    let mut assembler = FrameAssembler::new(bytes.len());
    let received = chunk_payload(&bytes, 100)
        .unwrap()
        .iter()
        .find_map(|d| assembler.push(d))
        .expect("frame must complete");

    // Assert: with row-major panels, panel (0,0) comes first.
    let frame = decode_frame(&received, 1).unwrap();
    let first_panel = PixelSurface::from_frame(
        32,
        16,
        0x7f,
        &ledboard_core::Frame::from_components(1, frame.components()[..32 * 16].to_vec()).unwrap(),
    )
    .unwrap();
    for y in 0..16 {
        for x in 0..32 {
            assert_eq!(
                first_panel.get_pixel(x, y).unwrap(),
                board.get_pixel(x, y).unwrap(),
                "({x}, {y})"
            );
        }
    }
}

#[test]
fn test_drawing_off_board_never_fails() {
    let mut board = reference_board();
    let mut gfx = Graphics::new(&mut board);
    gfx.draw_line(-100, -100, 200, 200, 0x7f);
    gfx.draw_circle(0, 0, 500, 0x7f);
    gfx.fill_rect(-10, -10, 5, 5, 0x7f);

    assert!(board.contains(47, 47));
    assert_eq!(board.get_pixel(47, 47).unwrap(), &[0x7f]);
}
