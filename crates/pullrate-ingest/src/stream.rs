use std::fmt;
use std::io::{BufReader, Read};

use serde::Deserializer as _;
use serde::de::{self, SeqAccess, Visitor};
use serde_json::Value;
use thiserror::Error;

use crate::raw::RawCardRecord;

/// The input is not a well-formed JSON array.
#[derive(Debug, Error)]
#[error("failed to decode card array: {0}")]
pub struct StreamError(#[source] pub serde_json::Error);

/// Decodes a JSON array of card objects one element at a time and hands each to
/// `on_record`, in input order.
///
/// Elements that are not card objects of the expected shape are passed as `None`.
/// The first error returned by `on_record` stops decoding and is returned unchanged.
/// Returns the number of array elements seen.
pub fn for_each_record<R, F, E>(reader: R, mut on_record: F) -> Result<u64, E>
where
    R: Read,
    F: FnMut(Option<RawCardRecord>) -> Result<(), E>,
    E: From<StreamError>,
{
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(reader));
    let mut failure = None;
    let visitor = RecordVisitor {
        on_record: &mut on_record,
        failure: &mut failure,
    };
    let result = (&mut deserializer).deserialize_seq(visitor);

    if let Some(err) = failure {
        return Err(err);
    }
    let count = result.map_err(StreamError)?;
    deserializer.end().map_err(StreamError)?;
    Ok(count)
}

struct RecordVisitor<'a, F, E> {
    on_record: &'a mut F,
    failure: &'a mut Option<E>,
}

impl<'de, F, E> Visitor<'de> for RecordVisitor<'_, F, E>
where
    F: FnMut(Option<RawCardRecord>) -> Result<(), E>,
{
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of card objects")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let RecordVisitor { on_record, failure } = self;
        let mut count = 0u64;
        while let Some(value) = seq.next_element::<Value>()? {
            count += 1;
            let record = serde_json::from_value::<RawCardRecord>(value).ok();
            if let Err(err) = on_record(record) {
                *failure = Some(err);
                return Err(de::Error::custom("card stream aborted by consumer"));
            }
        }
        Ok(count)
    }
}
