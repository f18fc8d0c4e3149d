use std::convert::TryFrom;
use tracing::error;

/// Entities read in bulk. Rows that can not be converted into an entity are
/// skipped and counted, so one corrupt row does not hide all the others.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan<T> {
    pub items: Vec<T>,
    pub malformed: usize,
}

impl<T> Scan<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            malformed: 0,
        }
    }

    pub(crate) fn from_rows<R>(rows: Vec<R>) -> Self
    where
        T: TryFrom<R, Error = anyhow::Error>,
    {
        let mut scan = Self::new(Vec::with_capacity(rows.len()));
        for row in rows {
            match T::try_from(row) {
                Ok(item) => scan.items.push(item),
                Err(e) => {
                    error!("Skipping malformed row: {:?}", e);
                    scan.malformed += 1;
                }
            }
        }
        scan
    }
}
