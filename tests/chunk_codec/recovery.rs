//! Chunk handover and recovery

use crate::*;

#[test]
fn test_recover_after_handover() {
    let chunk = Chunk::new(ChunkId::new(42), 4096).unwrap();
    let cells: Vec<KeyValue> = (1..=10).map(|i| put("row", i)).collect();
    for cell in &cells {
        chunk.append(cell).unwrap();
    }
    chunk.set_in_use(false);

    // Simulate a restart: only the bytes survive
    let bytes = chunk.to_bytes();
    drop(chunk);

    let recovered = Chunk::recover(bytes, &ChunkOptions::default()).unwrap();
    assert_eq!(recovered.id(), ChunkId::new(42));
    assert!(!recovered.in_use());
    assert_eq!(recovered.read_cells::<KeyValue>(), cells);
}

#[test]
fn test_recovered_chunk_keeps_appending() {
    let chunk = Chunk::new(ChunkId::new(1), 4096).unwrap();
    chunk.append(&put("a", 1)).unwrap();

    let recovered = Chunk::recover(chunk.into_buffer(), &ChunkOptions::default()).unwrap();
    recovered.append(&put("b", 2)).unwrap();

    let rows: Vec<Vec<u8>> = recovered
        .read_cells::<KeyValue>()
        .iter()
        .map(|c| c.row().to_vec())
        .collect();
    assert_eq!(rows, vec![b"a".to_vec(), b"b".to_vec()]);
}

#[test]
fn test_recover_empty_chunk() {
    let chunk = Chunk::with_options(ChunkId::new(5), &ChunkOptions::small()).unwrap();
    let recovered = Chunk::recover(chunk.into_buffer(), &ChunkOptions::default()).unwrap();
    assert!(recovered.is_empty());
    assert_eq!(recovered.data_size(), 64 * 1024);
    assert!(recovered.read_cells::<KeyValue>().is_empty());
}

#[test]
fn test_recover_buffer_written_by_raw_codec() {
    let mut buf = raw_chunk(2048);
    layout::write_chunk_id(&mut buf, ChunkId::new(9));
    layout::write_in_use(&mut buf, true);
    let cells = vec![put("x", 1), put("y", 2), put("z", 3)];
    encode_all(&mut buf, &cells).unwrap();

    let chunk = Chunk::recover(buf, &ChunkOptions::default()).unwrap();
    assert_eq!(chunk.id(), ChunkId::new(9));
    assert_eq!(chunk.read_cells::<KeyValue>(), cells);
}

#[test]
fn test_recover_rejects_torn_header() {
    let chunk = Chunk::new(ChunkId::new(1), 1024).unwrap();
    let result = chunk.append(&put("row", 1)).unwrap();
    let mut bytes = chunk.to_bytes();
    layout::write_end_offset(&mut bytes, (result.end - 1) as u32);

    let err: cellchunk::Error = Chunk::recover(bytes, &ChunkOptions::default())
        .unwrap_err()
        .into();
    assert!(matches!(err, cellchunk::Error::InvalidArgument(_)));
}

#[test]
fn test_recover_rejects_end_past_buffer() {
    let mut bytes = raw_chunk(64);
    layout::write_end_offset(&mut bytes, 1000);

    let err: cellchunk::Error = Chunk::recover(bytes, &ChunkOptions::default())
        .unwrap_err()
        .into();
    assert!(err.is_corruption());
}

#[test]
fn test_recovered_cells_parse() {
    let chunk = Chunk::new(ChunkId::new(1), 1024).unwrap();
    chunk.append(&put("row", 7)).unwrap();
    let recovered = Chunk::recover(chunk.into_buffer(), &ChunkOptions::default()).unwrap();

    for cell in recovered.read_cells::<KeyValue>() {
        let parsed = KeyValue::parse(cell.as_bytes(), cell.sequence_id()).unwrap();
        assert_eq!(parsed.cell_type(), Some(CellType::Put));
        assert_eq!(parsed.timestamp(), 1_007);
    }
}
