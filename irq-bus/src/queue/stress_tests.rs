//! Two-thread stress tests for the SPSC queues.
//!
//! A producer thread and a consumer thread exchange a long counting
//! sequence. Any lost, duplicated or reordered element breaks the count.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    use crate::queue::{ContiguousRingBuffer, RingQueue};

    const ITEMS: u32 = 100_000;

    #[test]
    fn ring_queue_preserves_sequence_across_threads() {
        let q: Arc<RingQueue<u32, 64>> = Arc::new(RingQueue::new());

        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let mut next = 0;
                while next < ITEMS {
                    if q.try_push(next).is_ok() {
                        next += 1;
                    } else {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut expected = 0;
        while expected < ITEMS {
            match q.pop() {
                Ok(v) => {
                    assert_eq!(v, expected);
                    expected += 1;
                }
                Err(_) => thread::yield_now(),
            }
        }

        producer.join().unwrap();
        assert!(q.is_empty());
    }

    #[test]
    fn ring_queue_moves_owned_values() {
        let q: Arc<RingQueue<Vec<u32>, 8>> = Arc::new(RingQueue::new());

        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..10_000u32 {
                    let mut item = std::vec![i, i.wrapping_mul(3)];
                    loop {
                        match q.try_emplace(|| core::mem::take(&mut item)) {
                            Ok(()) => break,
                            Err(_) => thread::yield_now(),
                        }
                    }
                }
            })
        };

        let mut received = 0u32;
        while received < 10_000 {
            if let Ok(v) = q.pop() {
                assert_eq!(v, std::vec![received, received.wrapping_mul(3)]);
                received += 1;
            } else {
                thread::yield_now();
            }
        }

        producer.join().unwrap();
    }

    #[test]
    fn contiguous_buffer_preserves_sequence_across_threads() {
        let buf: Arc<ContiguousRingBuffer<u32, 128>> = Arc::new(ContiguousRingBuffer::new());

        let producer = {
            let buf = Arc::clone(&buf);
            thread::spawn(move || {
                let mut next = 0u32;
                let mut chunk = [0u32; 7];
                while next < ITEMS {
                    // Uneven chunk lengths so writes regularly straddle the end.
                    let len = (1 + next as usize % chunk.len()).min((ITEMS - next) as usize);
                    for (i, slot) in chunk[..len].iter_mut().enumerate() {
                        *slot = next + i as u32;
                    }
                    if buf.put_range(&chunk[..len]).is_ok() {
                        next += len as u32;
                    } else {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut expected = 0u32;
        while expected < ITEMS {
            let range = buf.peek_range();
            if range.is_empty() {
                thread::yield_now();
                continue;
            }
            for &v in range {
                assert_eq!(v, expected);
                expected += 1;
            }
            let released = buf.drop_range();
            assert!(released > 0);
        }

        producer.join().unwrap();
        assert!(buf.is_empty());
    }
}
