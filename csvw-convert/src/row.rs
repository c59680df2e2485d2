//! Rows, chunks, and row sources

use rustc_hash::FxHashMap;

use crate::error::SourceError;

/// Column name → raw cell value
pub type RowValues = FxHashMap<String, String>;

/// Boxed row iterator returned by [`RowSource::open`]
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<RowValues, SourceError>> + Send + 'a>;

/// A re-openable stream of rows
///
/// Sequential fallback after a failed parallel attempt re-reads the input
/// from the start, so a source must be able to open more than once.
pub trait RowSource: Sync {
    fn open(&self) -> Result<RowIter<'_>, SourceError>;
}

/// In-memory row source
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    rows: Vec<RowValues>,
}

impl VecSource {
    pub fn new(rows: Vec<RowValues>) -> Self {
        Self { rows }
    }

    /// Build rows from `(column, value)` pairs
    pub fn from_pairs<I, R, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSource for VecSource {
    fn open(&self) -> Result<RowIter<'_>, SourceError> {
        Ok(Box::new(self.rows.iter().cloned().map(Ok::<RowValues, SourceError>)))
    }
}

/// One row with its global index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: u64,
    values: RowValues,
}

impl Row {
    pub fn new(index: u64, values: RowValues) -> Self {
        Self { index, values }
    }

    /// Global 0-based position in the input stream
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn values(&self) -> &RowValues {
        &self.values
    }
}

/// Fixed-size batch of rows; `None` entries pad the final chunk
#[derive(Debug, Clone)]
pub struct Chunk {
    index: usize,
    first_row: u64,
    rows: Vec<Option<RowValues>>,
}

impl Chunk {
    pub fn new(index: usize, first_row: u64, rows: Vec<Option<RowValues>>) -> Self {
        Self {
            index,
            first_row,
            rows,
        }
    }

    /// Sequence index in submission order
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Slots in order: `Some(row)` for real rows, `None` for padding
    pub fn rows(&self) -> impl Iterator<Item = Option<Row>> + '_ {
        self.rows.iter().enumerate().map(move |(pos, slot)| {
            slot.as_ref()
                .map(|values| Row::new(self.first_row + pos as u64, values.clone()))
        })
    }

    /// Number of real (non-padding) rows
    pub fn real_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }
}

/// Groups a row stream into padded chunks of `size`
pub struct Chunker<I> {
    rows: I,
    size: usize,
    next_index: usize,
    done: bool,
}

impl<I> Chunker<I>
where
    I: Iterator<Item = Result<RowValues, SourceError>>,
{
    /// `size` must be non-zero
    pub fn new(rows: I, size: usize) -> Self {
        Self {
            rows,
            size: size.max(1),
            next_index: 0,
            done: false,
        }
    }
}

impl<I> Iterator for Chunker<I>
where
    I: Iterator<Item = Result<RowValues, SourceError>>,
{
    type Item = Result<Chunk, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut rows = Vec::with_capacity(self.size);
        while rows.len() < self.size {
            match self.rows.next() {
                Some(Ok(values)) => rows.push(Some(values)),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if rows.is_empty() {
            return None;
        }
        rows.resize(self.size, None);

        let index = self.next_index;
        self.next_index += 1;
        let first_row = (index as u64) * (self.size as u64);
        Some(Ok(Chunk::new(index, first_row, rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(n: usize) -> VecSource {
        VecSource::from_pairs((0..n).map(|i| vec![("id", i.to_string())]))
    }

    #[test]
    fn test_chunks_are_padded_and_indexed() {
        let src = source(7);
        let chunks: Vec<Chunk> = Chunker::new(src.open().unwrap(), 3)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].index(), 2);
        assert_eq!(chunks[2].len(), 3);
        assert_eq!(chunks[2].real_rows(), 1);

        let last: Vec<Option<u64>> = chunks[2].rows().map(|r| r.map(|r| r.index())).collect();
        assert_eq!(last, vec![Some(6), None, None]);

        let row = chunks[1].rows().next().unwrap().unwrap();
        assert_eq!(row.index(), 3);
        assert_eq!(row.get("id"), Some("3"));
    }

    #[test]
    fn test_exact_multiple_has_no_padding_chunk() {
        let src = source(6);
        let chunks: Vec<Chunk> = Chunker::new(src.open().unwrap(), 3)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.real_rows() == 3));
    }

    #[test]
    fn test_empty_source_has_no_chunks() {
        let src = source(0);
        assert_eq!(Chunker::new(src.open().unwrap(), 5).count(), 0);
    }

    #[test]
    fn test_source_error_ends_chunking() {
        let rows = vec![
            Ok(RowValues::default()),
            Err(SourceError::Other("boom".to_string())),
            Ok(RowValues::default()),
        ];
        let results: Vec<_> = Chunker::new(rows.into_iter(), 2).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_source_reopens() {
        let src = source(2);
        assert_eq!(src.open().unwrap().count(), 2);
        assert_eq!(src.open().unwrap().count(), 2);
    }
}
