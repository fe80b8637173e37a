//! The binary file format of a [`Lut`].
//!
//! All fields are little-endian, with no magic number, version or checksum:
//!
//! | Field               | Type          |
//! |---------------------|---------------|
//! | `rank`              | `u32`         |
//! | `size[0..rank]`     | `u32` each    |
//! | `min[0..rank]`      | `f32` each    |
//! | `max[0..rank]`      | `f32` each    |
//! | `output_dim`        | `u32`         |
//! | samples             | `output_dim` × `f32` for each flat index, ascending |
//!
//! Samples are held as `f64` in memory and narrowed to `f32` when written.

use std::fs::{File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path};

use log::{debug, trace};

use super::{Error, Result, Position, Range, Lut};
use super::lut::{sample_count};

pub fn read_u32(r: &mut impl Read) -> std::io::Result<u32> {
    let mut buf = [0; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn read_f32(r: &mut impl Read) -> std::io::Result<f32> {
    let mut buf = [0; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

pub fn write_u32(w: &mut impl Write, x: u32) -> std::io::Result<()> {
    w.write_all(&x.to_le_bytes())
}

pub fn write_f32(w: &mut impl Write, x: f32) -> std::io::Result<()> {
    w.write_all(&x.to_le_bytes())
}

/// Narrows a length to a `u32` header field.
fn header_u32(what: &'static str, n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::OutOfRange(format!("{} {} does not fit in a u32", what, n)))
}

// ----------------------------------------------------------------------------

impl Lut {
    /// Reads a `Lut` in the binary format from `r`.
    ///
    /// Nothing is allocated for the samples until they have all been read,
    /// so a corrupt header fails with [`Error::Io`] rather than exhausting
    /// memory.
    pub fn read_from(r: &mut impl Read) -> Result<Self> {
        let rank = read_u32(r)? as usize;
        let mut size = Vec::new();
        for _ in 0..rank { size.push(read_u32(r)? as usize); }
        let mut min = Vec::new();
        for _ in 0..rank { min.push(read_f32(r)? as f64); }
        let mut max = Vec::new();
        for _ in 0..rank { max.push(read_f32(r)? as f64); }
        let output_dim = read_u32(r)? as usize;
        debug!("reading lut: size {:?}, min {:?}, max {:?}, output_dim {}", size, min, max, output_dim);

        let range = Range::new(min, max, size)?;
        let len = sample_count(&range, output_dim)?.checked_mul(4)
            .ok_or_else(|| Error::OutOfRange(format!("{} outputs per grid point is too many", output_dim)))?;
        let mut bytes = Vec::new();
        r.by_ref().take(len as u64).read_to_end(&mut bytes)?;
        if bytes.len() < len { return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into()); }

        let mut lut = Lut::new(range, output_dim)?;
        for (ind, chunk) in bytes.chunks_exact(4 * output_dim).enumerate() {
            let y: Vec<f64> = chunk.chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
                .collect();
            trace!("sample {}: {:?}", ind, y);
            lut.set(&Position::Ind(ind), &y)?;
        }
        Ok(lut)
    }

    /// Writes `self` in the binary format to `w`.
    pub fn write_to(&self, w: &mut impl Write) -> Result<()> {
        let range = self.range();
        write_u32(w, header_u32("rank", range.rank())?)?;
        for &n in range.size() { write_u32(w, header_u32("size", n)?)?; }
        for &x in range.min() { write_f32(w, x as f32)?; }
        for &x in range.max() { write_f32(w, x as f32)?; }
        write_u32(w, header_u32("output_dim", self.output_dim())?)?;
        for (_, y) in self.samples() {
            for y in y { write_f32(w, y as f32)?; }
        }
        Ok(())
    }

    /// Reads a `Lut` from the file at `path`.
    ///
    /// The file is assumed to be a `Lut`; there is nothing in the format to
    /// check that.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading lut from {}", path.display());
        let mut r = BufReader::new(File::open(path)?);
        Self::read_from(&mut r)
    }

    /// Writes `self` to the file at `path`, replacing it if it exists.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("saving lut to {}", path.display());
        let mut w = BufWriter::new(File::create(path)?);
        self.write_to(&mut w)?;
        w.flush()?;
        Ok(())
    }
}
