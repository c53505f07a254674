//! Versioned on-disk format for finished tables.
//!
//! Layout: a bincode header (magic, format version, checksum, entry count)
//! followed by the bincode-encoded table itself. The displacement table is
//! persisted verbatim, so loading validates and deserializes — it never
//! re-runs construction. Writes go through a temp file and an atomic rename
//! so a crash mid-write cannot leave a truncated table behind.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PhfError;
use crate::table::PhfTable;

/// Current format version - increment when the layout changes.
const FORMAT_VERSION: u32 = 1;

/// Magic number identifying the file format.
const MAGIC: &[u8; 8] = b"PHFKV\x00\x00\x01";

#[derive(Debug, Serialize, Deserialize)]
struct FileHeader {
    magic: [u8; 8],
    version: u32,
    /// CRC32 of the data section.
    checksum: u32,
    /// Slot count of the stored table, cross-checked after decode.
    entry_count: u64,
}

impl FileHeader {
    fn new(checksum: u32, entry_count: usize) -> Self {
        Self {
            magic: *MAGIC,
            version: FORMAT_VERSION,
            checksum,
            entry_count: entry_count as u64,
        }
    }

    fn validate(&self) -> Result<(), PhfError> {
        if &self.magic != MAGIC {
            return Err(invalid_data(format!(
                "invalid file format: expected magic {:?}, got {:?}",
                MAGIC, self.magic
            )));
        }
        if self.version != FORMAT_VERSION {
            return Err(invalid_data(format!(
                "incompatible format version: expected {}, got {}",
                FORMAT_VERSION, self.version
            )));
        }
        Ok(())
    }
}

fn invalid_data(msg: String) -> PhfError {
    PhfError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, msg))
}

/// Writer that stages output in a `.tmp` sibling and renames into place on
/// commit. Dropping without committing removes the temp file.
pub struct AtomicWriter {
    temp_path: std::path::PathBuf,
    final_path: std::path::PathBuf,
    writer: BufWriter<File>,
}

impl AtomicWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PhfError> {
        let final_path = path.as_ref().to_path_buf();
        let temp_path = final_path.with_extension("tmp");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        Ok(Self {
            temp_path,
            final_path,
            writer: BufWriter::new(file),
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), PhfError> {
        self.writer.write_all(data)?;
        Ok(())
    }

    pub fn commit(mut self) -> Result<(), PhfError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        std::fs::rename(&self.temp_path, &self.final_path)?;
        Ok(())
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        // Clean up the temp file if commit wasn't called.
        let _ = std::fs::remove_file(&self.temp_path);
    }
}

pub fn calculate_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Serialize `table` to `path` with header, checksum, and atomic rename.
pub fn write_table<V, P>(path: P, table: &PhfTable<V>) -> Result<(), PhfError>
where
    V: Serialize,
    P: AsRef<Path>,
{
    let data_bytes = bincode::serialize(table)?;
    let header = FileHeader::new(calculate_checksum(&data_bytes), table.len());
    let header_bytes = bincode::serialize(&header)?;

    let mut writer = AtomicWriter::new(path)?;
    writer.write_all(&header_bytes)?;
    writer.write_all(&data_bytes)?;
    writer.commit()
}

/// Read a table back, validating magic, version, checksum, entry count, and
/// the table's own length invariant (enforced during deserialization).
pub fn read_table<V, P>(path: P) -> Result<PhfTable<V>, PhfError>
where
    V: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let header: FileHeader = bincode::deserialize_from(&mut reader)?;
    header.validate()?;

    let mut data_bytes = Vec::new();
    reader.read_to_end(&mut data_bytes)?;

    let actual_checksum = calculate_checksum(&data_bytes);
    if actual_checksum != header.checksum {
        return Err(invalid_data(format!(
            "checksum mismatch: expected {}, got {}",
            header.checksum, actual_checksum
        )));
    }

    let table: PhfTable<V> = bincode::deserialize(&data_bytes)?;

    if table.len() as u64 != header.entry_count {
        return Err(invalid_data(format!(
            "entry count mismatch: header says {}, table has {}",
            header.entry_count,
            table.len()
        )));
    }

    Ok(table)
}
