//! Property tests for the TLV decoder and the blocking queue.

use flashlight_shared::codec::{encode_into, FrameDecoder};
use flashlight_shared::{BlockingQueue, Command, Rgb};
use bytes::BytesMut;
use proptest::prelude::*;

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::SwitchOn),
        Just(Command::SwitchOff),
        (any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(r, g, b)| Command::SetColor(Rgb::new(r, g, b))),
        any::<u8>().prop_map(|level| Command::SetBrightness { level }),
    ]
}

fn encode_all(commands: &[Command]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    for command in commands {
        encode_into(command, &mut buf);
    }
    buf.to_vec()
}

/// Split `wire` at the given (unsorted, possibly duplicate) cut points
fn split_at_cuts(wire: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (wire.len() + 1)).collect();
    points.sort_unstable();

    let mut chunks = Vec::new();
    let mut start = 0;
    for point in points {
        chunks.push(wire[start..point].to_vec());
        start = point;
    }
    chunks.push(wire[start..].to_vec());
    chunks
}

/// A raw TLV frame whose declared length always matches its payload
fn arb_raw_frame() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(vec![0x12u8]),
        Just(vec![0x13u8]),
        (
            prop_oneof![Just(0x20u8), Just(0x21u8)],
            proptest::collection::vec(any::<u8>(), 0..10),
        )
            .prop_map(|(tag, payload)| {
                let mut frame = vec![tag];
                frame.extend((payload.len() as u16).to_be_bytes());
                frame.extend(payload);
                frame
            }),
    ]
}

fn decode_chunks(mut decoder: FrameDecoder, chunks: &[Vec<u8>]) -> Vec<Command> {
    chunks.iter().flat_map(|chunk| decoder.decode(chunk)).collect()
}

proptest! {
    /// With a carry cap, frames over the cap are rejected the same way
    /// whether they arrive whole or split.
    #[test]
    fn capped_fragmentation_invariance(
        frames in proptest::collection::vec(arb_raw_frame(), 0..24),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
        max_carry in 3usize..12,
    ) {
        let wire: Vec<u8> = frames.concat();

        let whole = decode_chunks(FrameDecoder::with_max_carry(max_carry), &[wire.clone()]);
        let fragmented = decode_chunks(
            FrameDecoder::with_max_carry(max_carry),
            &split_at_cuts(&wire, &cuts),
        );
        prop_assert_eq!(fragmented, whole);
    }

    /// Decoding a valid stream split at arbitrary boundaries yields the same
    /// commands as decoding it whole.
    #[test]
    fn fragmentation_invariance(
        commands in proptest::collection::vec(arb_command(), 0..32),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let wire = encode_all(&commands);

        let mut whole = FrameDecoder::new();
        prop_assert_eq!(whole.decode(&wire), commands.clone());

        let mut fragmented = FrameDecoder::new();
        let decoded: Vec<Command> = split_at_cuts(&wire, &cuts)
            .iter()
            .flat_map(|chunk| fragmented.decode(chunk))
            .collect();
        prop_assert_eq!(decoded, commands);
        prop_assert_eq!(fragmented.carry_len(), 0);
    }

    /// A stray unknown byte in front of a frame never hides the frame.
    #[test]
    fn stray_prefix_is_skipped(
        stray in any::<u8>().prop_filter("unknown tag", |b| ![0x12, 0x13, 0x20, 0x21].contains(b)),
        command in arb_command(),
    ) {
        let mut wire = vec![stray];
        wire.extend(encode_all(&[command]));

        let mut decoder = FrameDecoder::new();
        prop_assert_eq!(decoder.decode(&wire), vec![command]);
    }

    /// Arbitrary input never panics and a carry never exceeds the input seen.
    #[test]
    fn arbitrary_bytes_never_panic(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..64), 0..8),
    ) {
        let mut decoder = FrameDecoder::new();
        let mut seen = 0;
        for chunk in &chunks {
            seen += chunk.len();
            let _ = decoder.decode(chunk);
            prop_assert!(decoder.carry_len() <= seen);
        }
    }

    /// Items come out of the queue in push order, then the interrupt yields `None`.
    #[test]
    fn queue_preserves_order(items in proptest::collection::vec(any::<u32>(), 0..64)) {
        let queue = BlockingQueue::new();
        for item in &items {
            queue.push(*item);
        }
        queue.interrupt();

        let mut popped = Vec::new();
        while let Some(item) = queue.wait_and_pop() {
            popped.push(item);
        }
        prop_assert_eq!(popped, items);

        queue.push(1);
        prop_assert_eq!(queue.wait_and_pop(), Some(1));
    }
}
