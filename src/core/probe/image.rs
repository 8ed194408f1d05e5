//! EXIF prober for image files.
//!
//! Reads the full EXIF field dictionary with `kamadak-exif`. Any failure to
//! open or parse the file means the image simply has no metadata; images
//! always have a filesystem-timestamp fallback, so nothing here is fatal.

use super::{MediaMetadata, MetadataProber, ProbeOutcome, TagValue};
use exif::{In, Reader, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Probes embedded EXIF metadata
#[derive(Debug, Default)]
pub struct ExifProber;

impl ExifProber {
    pub fn new() -> Self {
        ExifProber
    }
}

impl MetadataProber for ExifProber {
    fn probe(&self, path: &Path) -> ProbeOutcome {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return ProbeOutcome::Absent,
        };

        let mut reader = BufReader::new(&file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(e) => e,
            Err(_) => return ProbeOutcome::Absent,
        };

        let mut metadata = MediaMetadata::default();

        for field in exif.fields() {
            // Primary-IFD tags keep their plain names; other IFDs (e.g. the
            // thumbnail) are suffixed so same-named tags don't collide.
            let key = if field.ifd_num == In::PRIMARY {
                field.tag.to_string()
            } else {
                format!("{}@{}", field.tag, field.ifd_num.index())
            };
            // ASCII values keep their raw on-disk form: the display rendering
            // reformats DateTime-family tags into dashed dates, which would
            // no longer parse as EXIF timestamps downstream.
            let value = match &field.value {
                Value::Ascii(lines) => TagValue::Simple(
                    lines
                        .iter()
                        .map(|line| String::from_utf8_lossy(line).into_owned())
                        .collect::<Vec<_>>()
                        .join(" "),
                ),
                Value::Byte(_)
                | Value::SByte(_)
                | Value::Short(_)
                | Value::SShort(_)
                | Value::Long(_)
                | Value::SLong(_)
                | Value::Float(_)
                | Value::Double(_) => TagValue::Simple(field.display_value().to_string()),
                _ => TagValue::Composite(field.display_value().to_string()),
            };
            metadata.tags.insert(key, value);
        }

        if metadata.tags.is_empty() {
            ProbeOutcome::Absent
        } else {
            ProbeOutcome::Found(metadata)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn nonexistent_file_is_absent() {
        let outcome = ExifProber::new().probe(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(outcome, ProbeOutcome::Absent));
    }

    #[test]
    fn non_image_bytes_are_absent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("not_a_photo.jpg");
        File::create(&path)
            .unwrap()
            .write_all(b"just some text")
            .unwrap();

        let outcome = ExifProber::new().probe(&path);
        assert!(matches!(outcome, ProbeOutcome::Absent));
    }

    #[test]
    fn ascii_date_tags_keep_their_raw_colon_form() {
        use exif::experimental::Writer;
        use exif::{Field, Tag};

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shot.tif");

        let field = Field {
            tag: Tag::DateTimeOriginal,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"2019:06:21 08:15:00".to_vec()]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut cursor = std::io::Cursor::new(Vec::new());
        writer.write(&mut cursor, false).unwrap();
        std::fs::write(&path, cursor.into_inner()).unwrap();

        let ProbeOutcome::Found(meta) = ExifProber::new().probe(&path) else {
            panic!("expected metadata");
        };
        assert_eq!(meta.text("DateTimeOriginal"), Some("2019:06:21 08:15:00"));
    }
}
