//! Minimal NumPy `.npy` reader for 2D float arrays.
//!
//! Covers what the viewer actually loads: little-endian `f4`/`f8`, C order,
//! two dimensions. Anything else is reported as unsupported rather than
//! guessed at.

use std::fs;
use std::path::Path;

use crate::error::{FieldError, FieldResult};
use crate::field::ScalarField;
use crate::lod::GridShape;

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Read a 2D scalar field from an `.npy` file. The first array dimension
/// becomes the rows (abscissa) of the field.
pub fn read_npy(path: &Path) -> FieldResult<ScalarField> {
    let data = fs::read(path).map_err(|source| FieldError::Io {
        path: path.into(),
        source,
    })?;
    parse_npy(&data, path)
}

fn parse_npy(data: &[u8], path: &Path) -> FieldResult<ScalarField> {
    if data.len() < 10 || &data[..6] != NPY_MAGIC {
        return Err(FieldError::BadMagic { path: path.into() });
    }

    let major = data[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([data[8], data[9]]) as usize, 10),
        2 | 3 => {
            if data.len() < 12 {
                return Err(malformed("truncated header length"));
            }
            (
                u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize,
                12,
            )
        }
        version => {
            return Err(FieldError::Unsupported(format!(
                "npy format version {version}"
            )))
        }
    };

    let header_end = header_start + header_len;
    if data.len() < header_end {
        return Err(malformed("header runs past end of file"));
    }
    let header = std::str::from_utf8(&data[header_start..header_end])
        .map_err(|_| malformed("header is not valid UTF-8"))?;

    let descr = dict_value(header, "descr")?;
    let descr = descr.trim_matches('\'');
    let fortran = dict_value(header, "fortran_order")?;
    let shape_entry = dict_value(header, "shape")?;

    if fortran != "False" {
        return Err(FieldError::Unsupported(
            "Fortran-order arrays".to_string(),
        ));
    }

    let dims = parse_shape(&shape_entry)?;
    if dims.len() != 2 {
        return Err(FieldError::Unsupported(format!(
            "{}-dimensional array, expected 2",
            dims.len()
        )));
    }
    if dims[0] == 0 || dims[1] == 0 {
        return Err(FieldError::Unsupported("empty array".to_string()));
    }
    let shape = GridShape::new(dims[0], dims[1]);

    let body = &data[header_end..];
    let count = shape.len();
    let values = match descr {
        "<f4" => {
            if body.len() < count * 4 {
                return Err(malformed("data shorter than declared shape"));
            }
            body.chunks_exact(4)
                .take(count)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect()
        }
        "<f8" => {
            if body.len() < count * 8 {
                return Err(malformed("data shorter than declared shape"));
            }
            body.chunks_exact(8)
                .take(count)
                .map(|b| {
                    f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32
                })
                .collect()
        }
        other => {
            return Err(FieldError::Unsupported(format!(
                "dtype {other}, expected <f4 or <f8"
            )))
        }
    };

    ScalarField::from_values(shape, values)
}

fn malformed(reason: &str) -> FieldError {
    FieldError::MalformedHeader(reason.to_string())
}

/// Pull one value out of the header's Python dict literal. Tracks paren
/// depth so the shape tuple's inner commas survive.
fn dict_value(header: &str, key: &str) -> FieldResult<String> {
    let pattern = format!("'{key}':");
    let start = header
        .find(&pattern)
        .ok_or_else(|| malformed(&format!("missing '{key}' entry")))?
        + pattern.len();

    let mut depth = 0usize;
    let mut out = String::new();
    for c in header[start..].chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            ',' | '}' if depth == 0 => break,
            _ => out.push(c),
        }
    }
    Ok(out.trim().to_string())
}

fn parse_shape(entry: &str) -> FieldResult<Vec<usize>> {
    entry
        .trim_matches(|c| c == '(' || c == ')')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| malformed("non-integer shape entry"))
        })
        .collect()
}
