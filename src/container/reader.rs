//! Container reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::codec::{TypedValue, ValueKind};
use super::format::*;
use super::index::LoadedContainer;
use super::stream::IStream;
use crate::report::{Event, NullReporter, Reporter};
use crate::util::{Error, Result};

/// Sequential record reader.
///
/// A clean end of stream between records ends iteration. Running out of
/// bytes inside a record is an [`Error::UnexpectedEof`].
pub struct ContainerReader<R: Read> {
    stream: IStream<R>,
    failed: bool,
}

impl ContainerReader<BufReader<File>> {
    /// Open a container file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> ContainerReader<R> {
    pub fn new(reader: R) -> Self {
        Self { stream: IStream::new(reader), failed: false }
    }

    /// Current byte offset in the stream.
    pub fn pos(&self) -> u64 {
        self.stream.pos()
    }

    /// Read the next record, or `None` at a clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let start = self.stream.pos();
        let Some(byte) = self.stream.read_u8_or_eof()? else {
            return Ok(None);
        };
        let marker = RecordMarker::from_u8(byte)
            .ok_or(Error::UnknownMarker { marker: byte, pos: start })?;

        let owner = self.stream.read_string("owner name")?;
        if owner.is_empty() {
            return Err(Error::EmptyOwner { pos: start });
        }

        let record = match marker {
            RecordMarker::DocumentProperty => Record::DocumentProperty(self.read_property_tail(owner)?),
            RecordMarker::GeometryProperty => Record::GeometryProperty(self.read_property_tail(owner)?),
            RecordMarker::AuxiliaryArray => {
                let name = self.stream.read_string("array name")?;
                let elements = self.stream.read_i32_array("array elements")?;
                Record::AuxiliaryArray(ArrayRecord { owner, name, elements })
            }
        };
        Ok(Some(record))
    }

    fn read_property_tail(&mut self, owner: String) -> Result<PropertyRecord> {
        let name = self.stream.read_string("property name")?;
        let type_tag = self.stream.read_string("type tag")?;
        let kind = ValueKind::from_tag(&type_tag)?;
        let value = TypedValue::decode(&mut self.stream, kind)?;
        Ok(PropertyRecord { owner, name, type_tag, value })
    }
}

impl<R: Read> Iterator for ContainerReader<R> {
    type Item = Result<Record>;

    /// Yields records until end of stream; stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Load every record of a stream into an index.
///
/// Any error aborts the load and nothing is returned; a partially read
/// container is never handed to the caller.
pub fn load_all<R: Read>(reader: R) -> Result<LoadedContainer> {
    load_all_with(reader, &mut NullReporter)
}

/// [`load_all`] reporting each record as it is read.
pub fn load_all_with<R: Read>(reader: R, reporter: &mut dyn Reporter) -> Result<LoadedContainer> {
    load_records(ContainerReader::new(reader), reporter)
}

/// Load a container file.
pub fn load_file(path: impl AsRef<Path>, reporter: &mut dyn Reporter) -> Result<LoadedContainer> {
    load_records(ContainerReader::open(path)?, reporter)
}

fn load_records<R: Read>(mut reader: ContainerReader<R>, reporter: &mut dyn Reporter) -> Result<LoadedContainer> {
    let mut loaded = LoadedContainer::new();
    while let Some(record) = reader.next_record()? {
        reporter.record(Event::RecordLoaded {
            marker: record.marker(),
            owner: record.owner().to_string(),
            name: record.name().to_string(),
            size: record_size(&record),
        });
        loaded.apply(record);
    }
    Ok(loaded)
}

/// Payload bytes for properties, element count for arrays.
fn record_size(record: &Record) -> usize {
    match record {
        Record::DocumentProperty(p) | Record::GeometryProperty(p) => p.value.payload_len(),
        Record::AuxiliaryArray(a) => a.elements.len(),
    }
}
