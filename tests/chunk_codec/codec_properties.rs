//! Codec properties over caller-owned buffers

use crate::*;
use proptest::prelude::*;

const CODEC: CellChunkCodec = CellChunkCodec::new();

// =============================================================================
// ROUND TRIP
// =============================================================================

#[test]
fn test_single_record_round_trip_at_any_offset() {
    let kv = put("row", 77);
    let frame = CellChunkCodec::record_overhead(kv.serialized_size());

    for offset in [9usize, 13, 100, 511] {
        let mut buf = vec![0u8; offset + frame];
        let end = CODEC.try_encode(&kv, offset, &mut buf).unwrap();
        assert_eq!(end, offset + frame);

        let cells: Vec<KeyValue> = CODEC.decode(offset, &buf, end);
        assert_eq!(cells, vec![kv.clone()]);
    }
}

#[test]
fn test_header_end_offset_tracks_last_encode() {
    let mut buf = raw_chunk(1024);
    let cells: Vec<KeyValue> = (0..3).map(|i| put("r", i)).collect();
    let end = encode_all(&mut buf, &cells).unwrap();

    assert_eq!(layout::read_end_offset(&buf) as usize, end);
    let expected: usize = cells
        .iter()
        .map(|c| CellChunkCodec::record_overhead(c.serialized_size()))
        .sum();
    assert_eq!(end, layout::CHUNK_HEADER_SIZE + expected);
}

#[test]
fn test_sequence_ids_are_attributes_not_sort_keys() {
    let mut buf = raw_chunk(1024);
    let cells = vec![put("a", 900), put("b", 3), put("c", 500)];
    let end = encode_all(&mut buf, &cells).unwrap();

    let decoded: Vec<KeyValue> = CODEC.decode(layout::CHUNK_HEADER_SIZE, &buf, end);
    let rows: Vec<&[u8]> = decoded.iter().map(|c| c.row()).collect();
    assert_eq!(rows, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
}

#[test]
fn test_decoded_cells_survive_buffer_reuse() {
    let mut buf = raw_chunk(1024);
    let cells = vec![put("a", 1), put("b", 2)];
    let end = encode_all(&mut buf, &cells).unwrap();

    let decoded: Vec<KeyValue> = CODEC.decode(layout::CHUNK_HEADER_SIZE, &buf, end);

    // Recycle the buffer for unrelated cells
    buf.iter_mut().for_each(|b| *b = 0xAA);
    encode_all(&mut buf, &[put("zzz", 99)]).unwrap();

    assert_eq!(decoded, cells);
    assert_eq!(decoded[1].value(), b"value-000002");
}

#[test]
fn test_idempotent_decode() {
    let mut buf = raw_chunk(1024);
    let end = encode_all(&mut buf, &[put("a", 1), put("b", 2)]).unwrap();

    let first: Vec<KeyValue> = CODEC.decode(layout::CHUNK_HEADER_SIZE, &buf, end);
    let mut second: Vec<KeyValue> = CODEC.decode(layout::CHUNK_HEADER_SIZE, &buf, end);
    assert_eq!(first, second);

    second[0] = second[0].clone().with_sequence_id(SequenceId::new(1234));
    assert_eq!(first[0].sequence_id(), SequenceId::new(1));
}

#[test]
fn test_empty_range_is_empty() {
    let buf = raw_chunk(64);
    let cells: Vec<KeyValue> = CODEC.decode(20, &buf, 20);
    assert!(cells.is_empty());
}

#[test]
fn test_overhead_formulas() {
    assert_eq!(CellChunkCodec::record_overhead(0), 12);
    assert_eq!(CellChunkCodec::record_overhead(100), 112);
    assert_eq!(CellChunkCodec::chunk_overhead(0), 13);
    assert_eq!(CellChunkCodec::chunk_overhead(1000), 1013);
}

// =============================================================================
// CHECKED WRAPPERS
// =============================================================================

#[test]
fn test_checked_errors_map_to_facade_errors() {
    let mut buf = raw_chunk(16);
    let err: cellchunk::Error = CODEC.try_encode(&put("r", 1), 0, &mut buf).unwrap_err().into();
    assert!(matches!(err, cellchunk::Error::InvalidArgument(_)));

    let err: cellchunk::Error = encode_all(&mut buf, &[put("row", 1)]).unwrap_err();
    assert!(matches!(err, cellchunk::Error::InvalidArgument(_)));
}

#[test]
fn test_checked_decode_rejects_truncated_range() {
    let mut buf = raw_chunk(1024);
    let end = encode_all(&mut buf, &[put("a", 1), put("b", 2)]).unwrap();

    for cut in 1..12 {
        assert!(CODEC
            .try_decode::<KeyValue>(layout::CHUNK_HEADER_SIZE, &buf, end - cut)
            .is_err());
    }
}

proptest! {
    #[test]
    fn every_prefix_boundary_decodes_a_prefix(
        count in 1usize..20,
        value_len in 0usize..40,
    ) {
        let cells: Vec<KeyValue> = (0..count as u64)
            .map(|i| {
                KeyValue::builder(format!("row-{}", i))
                    .family("f")
                    .value(vec![i as u8; value_len])
                    .sequence_id(SequenceId::new(i))
                    .build()
                    .unwrap()
            })
            .collect();
        let mut buf = raw_chunk(count * (value_len + 64));

        let mut boundaries = vec![layout::CHUNK_HEADER_SIZE];
        for cell in &cells {
            let end = CODEC.try_encode(cell, *boundaries.last().unwrap(), &mut buf).unwrap();
            boundaries.push(end);
        }

        for (n, end) in boundaries.iter().enumerate() {
            let decoded: Vec<KeyValue> = CODEC.try_decode(layout::CHUNK_HEADER_SIZE, &buf, *end).unwrap();
            prop_assert_eq!(&decoded[..], &cells[..n]);
        }
    }
}
