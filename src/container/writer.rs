//! Container writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::codec::{check_tag, TypedValue};
use super::format::*;
use super::stream::OStream;
use crate::util::{Error, Result};

/// Appends records to a container stream.
///
/// Each append writes exactly one record. Nothing is written before the
/// first record or after the last.
pub struct ContainerWriter<W: Write> {
    stream: OStream<W>,
    records: usize,
}

impl ContainerWriter<BufWriter<File>> {
    /// Create (or truncate) a container file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { stream: OStream::new(writer), records: 0 }
    }

    /// Append a `'G'` record owned by the document.
    pub fn append_document_property(
        &mut self,
        name: &str,
        type_tag: &str,
        value: &TypedValue,
    ) -> Result<()> {
        self.write_property(RecordMarker::DocumentProperty, DOCUMENT_OWNER, name, type_tag, value)
    }

    /// Append an `'M'` record owned by a mesh.
    pub fn append_geometry_property(
        &mut self,
        owner: &str,
        name: &str,
        type_tag: &str,
        value: &TypedValue,
    ) -> Result<()> {
        self.write_property(RecordMarker::GeometryProperty, owner, name, type_tag, value)
    }

    /// Append an `'I'` record. An empty slice is written as a zero count.
    pub fn append_auxiliary_array(&mut self, owner: &str, name: &str, elements: &[i32]) -> Result<()> {
        self.check_owner(owner)?;
        self.stream.write_u8(MARKER_AUXILIARY_ARRAY)?;
        self.stream.write_prefixed(owner.as_bytes(), "owner name")?;
        self.stream.write_prefixed(name.as_bytes(), "array name")?;
        self.stream.write_i32_array(elements, "array elements")?;
        self.records += 1;
        Ok(())
    }

    /// Append any record.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        match record {
            Record::DocumentProperty(p) => {
                self.write_property(RecordMarker::DocumentProperty, &p.owner, &p.name, &p.type_tag, &p.value)
            }
            Record::GeometryProperty(p) => {
                self.write_property(RecordMarker::GeometryProperty, &p.owner, &p.name, &p.type_tag, &p.value)
            }
            Record::AuxiliaryArray(a) => self.append_auxiliary_array(&a.owner, &a.name, &a.elements),
        }
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.stream.pos()
    }

    /// Flush and return the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.stream.into_inner()
    }

    fn write_property(
        &mut self,
        marker: RecordMarker,
        owner: &str,
        name: &str,
        type_tag: &str,
        value: &TypedValue,
    ) -> Result<()> {
        self.check_owner(owner)?;
        // Validate before the marker so a rejected value leaves no partial record.
        check_tag(type_tag, value)?;

        self.stream.write_u8(marker.as_u8())?;
        self.stream.write_prefixed(owner.as_bytes(), "owner name")?;
        self.stream.write_prefixed(name.as_bytes(), "property name")?;
        self.stream.write_prefixed(type_tag.as_bytes(), "type tag")?;
        value.encode(&mut self.stream)?;
        self.records += 1;
        Ok(())
    }

    fn check_owner(&self, owner: &str) -> Result<()> {
        if owner.is_empty() {
            return Err(Error::EmptyOwner { pos: self.stream.pos() });
        }
        Ok(())
    }
}
