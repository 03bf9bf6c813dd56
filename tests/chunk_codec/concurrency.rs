//! Concurrent appenders and readers sharing one chunk

use crate::*;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_readers_never_see_partial_frames() {
    let chunk = Arc::new(Chunk::new(ChunkId::new(1), 1024 * 1024).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4u64)
        .map(|t| {
            let chunk = Arc::clone(&chunk);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for i in 0..250u64 {
                    let len = rng.gen_range(0..200);
                    let cell = KeyValue::builder(format!("w{}", t))
                        .family("cf")
                        .value(vec![t as u8; len])
                        .sequence_id(SequenceId::new(t * 10_000 + i))
                        .build()
                        .unwrap();
                    chunk.append(&cell).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let chunk = Arc::clone(&chunk);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last_end = layout::CHUNK_HEADER_SIZE;
                while !done.load(Ordering::Acquire) {
                    let end = chunk.end_offset();
                    assert!(end >= last_end, "end offset moved backwards");
                    last_end = end;

                    let cells: Vec<KeyValue> = chunk
                        .read_range(chunk.first_record_offset(), end)
                        .expect("published end is a frame boundary");
                    for cell in &cells {
                        let parsed = KeyValue::parse(cell.as_bytes(), cell.sequence_id())
                            .expect("frame fully written");
                        let writer = parsed.sequence_id().as_u64() / 10_000;
                        assert!(parsed.value().iter().all(|&b| b == writer as u8));
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(chunk.read_cells::<KeyValue>().len(), 1000);
}

#[test]
fn test_full_chunk_rejects_without_corrupting() {
    let chunk = Arc::new(Chunk::new(ChunkId::new(1), 4096).unwrap());
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let chunk = Arc::clone(&chunk);
            thread::spawn(move || {
                let mut accepted = 0usize;
                for i in 0..100u64 {
                    match chunk.append(&put("row", t * 1000 + i)) {
                        Ok(_) => accepted += 1,
                        Err(e) => assert!(e.is_capacity()),
                    }
                }
                accepted
            })
        })
        .collect();

    let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let cells = chunk.read_cells::<KeyValue>();
    assert_eq!(cells.len(), accepted);
    assert!(chunk.remaining() < CellChunkCodec::record_overhead(put("row", 0).serialized_size()));
}
