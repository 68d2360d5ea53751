use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use anyhow::Context;
use zip::ZipArchive;

/// A `.docx` package read fully into memory. The zip handle is released as
/// soon as `read`/`from_reader` returns; extraction never re-opens the file.
pub struct DocxPackage {
    pub entries: Vec<DocxEntry>,
}

pub struct DocxEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl DocxPackage {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let f = File::open(path).with_context(|| format!("open docx: {}", path.display()))?;
        Self::from_reader(f)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> anyhow::Result<Self> {
        let mut zip = ZipArchive::new(reader).context("read zip")?;
        let mut entries = Vec::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).context("zip entry")?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data).context("read zip entry")?;
            entries.push(DocxEntry {
                name: file.name().to_string(),
                data,
            });
        }
        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::DocxPackage;

    fn zip_with(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            zw.start_file(*name, SimpleFileOptions::default())
                .expect("start zip file");
            zw.write_all(body.as_bytes()).expect("write zip file");
        }
        zw.finish().expect("finish zip")
    }

    #[test]
    fn read_from_disk_matches_in_memory() {
        let buf = zip_with(&[("word/document.xml", "<w:document/>")]);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.docx");
        std::fs::write(&path, buf.into_inner()).expect("write docx");
        let pkg = DocxPackage::read(&path).expect("read package");
        assert_eq!(pkg.part("word/document.xml"), Some("<w:document/>".as_bytes()));
    }

    #[test]
    fn part_lookup_by_exact_name() {
        let buf = zip_with(&[
            ("word/document.xml", "<w:document/>"),
            ("word/comments.xml", "<w:comments/>"),
        ]);
        let pkg = DocxPackage::from_reader(buf).expect("read package");
        assert_eq!(
            pkg.part("word/document.xml"),
            Some("<w:document/>".as_bytes())
        );
        assert!(pkg.part("word/styles.xml").is_none());
    }
}
