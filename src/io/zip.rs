//! In-memory ZIP extraction.

use std::io::{Cursor, Read};

use zip::{result::ZipError, ZipArchive};

use crate::error::{Error, Result};

/// Extract a single member of an in-memory ZIP archive.
pub(crate) fn read_zip_member(bytes: &[u8], member: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::format(member, format!("[io::zip] failed to read zip archive: {e}")))?;

    let names = archive.file_names().map(str::to_string).collect::<Vec<_>>();
    let mut file = match archive.by_name(member) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(Error::format(member, format!("[io::zip] not in archive; found: {}", names.join(", "))));
        }
        Err(e) => return Err(Error::format(member, format!("[io::zip] failed to open member: {e}"))),
    };

    let mut out = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut out)
        .map_err(|e| Error::format(member, format!("[io::zip] failed to decompress: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::{write::SimpleFileOptions, ZipWriter};

    fn archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in files {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn extracts_named_member() {
        let bytes = archive(&[("a/b.csv", "x,y\n1,2\n"), ("c.txt", "z")]);
        assert_eq!(read_zip_member(&bytes, "a/b.csv").unwrap(), b"x,y\n1,2\n");
    }

    #[test]
    fn missing_member_lists_contents() {
        let bytes = archive(&[("only.geojson", "{}")]);
        let err = read_zip_member(&bytes, "other.geojson").unwrap_err();
        assert!(err.to_string().contains("only.geojson"));
    }

    #[test]
    fn garbage_is_a_format_error() {
        assert!(matches!(read_zip_member(b"not a zip", "x"), Err(Error::Format { .. })));
    }
}
