use crate::types::HashRecord;
use std::io;
use std::num::NonZeroUsize;

/// Separator placed between hashes in the `hashes` form field.
pub const HASH_DELIMITER: char = '#';

/// Default number of hashes sent per request.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// An ordered, non-empty group of hashes sent in one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    records: Vec<HashRecord>,
}

impl Batch {
    /// Returns `None` for an empty record list; batches are never empty.
    pub fn new(records: Vec<HashRecord>) -> Option<Self> {
        if records.is_empty() {
            None
        } else {
            Some(Self { records })
        }
    }

    pub fn records(&self) -> &[HashRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Join the batch into the `#`-delimited form the bulk endpoint expects.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                out.push(HASH_DELIMITER);
            }
            out.push_str(record.as_str());
        }
        out
    }
}

/// Groups a record stream into [`Batch`]es of at most `size` records,
/// preserving input order. An empty stream yields no batches.
pub struct Batcher<I> {
    lines: I,
    size: NonZeroUsize,
    done: bool,
}

impl<I> Batcher<I>
where
    I: Iterator<Item = io::Result<HashRecord>>,
{
    pub fn new(lines: I, size: NonZeroUsize) -> Self {
        Self {
            lines,
            size,
            done: false,
        }
    }
}

impl<I> Iterator for Batcher<I>
where
    I: Iterator<Item = io::Result<HashRecord>>,
{
    type Item = io::Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut records = Vec::with_capacity(self.size.get().min(DEFAULT_BATCH_SIZE));
        while records.len() < self.size.get() {
            match self.lines.next() {
                Some(Ok(record)) => records.push(record),
                Some(Err(e)) => {
                    // the partial batch is dropped along with the rest of the input
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        Batch::new(records).map(Ok)
    }
}
