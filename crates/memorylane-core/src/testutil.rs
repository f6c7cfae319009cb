//! Byte-level fixtures for tests: minimal JPEG and HEIF files carrying a
//! generated Exif block, and a stand-in for the MediaInfo executable.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};

/// TIFF-structured Exif block holding only `DateTimeOriginal`.
pub fn exif_tiff(datetime: &str) -> Vec<u8> {
    let field = Field {
        tag: Tag::DateTimeOriginal,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![datetime.as_bytes().to_vec()]),
    };
    let mut writer = Writer::new();
    writer.push_field(&field);
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    buf.into_inner()
}

/// SOI, an APP1 Exif segment, EOI.
pub fn jpeg_with_exif(datetime: &str) -> Vec<u8> {
    let tiff = exif_tiff(datetime);
    let mut out = vec![0xff, 0xd8, 0xff, 0xe1];
    out.extend(((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend(b"Exif\0\0");
    out.extend(tiff);
    out.extend([0xff, 0xd9]);
    out
}

/// SOI, a JFIF APP0 segment, EOI.
pub fn jpeg_without_exif() -> Vec<u8> {
    let mut out = vec![0xff, 0xd8, 0xff, 0xe0];
    out.extend(16u16.to_be_bytes());
    out.extend(b"JFIF\0");
    out.extend([1, 1, 0, 0, 1, 0, 1, 0, 0]);
    out.extend([0xff, 0xd9]);
    out
}

fn isobmff_box(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend(((8 + body.len()) as u32).to_be_bytes());
    out.extend(kind);
    out.extend(body);
    out
}

fn full_box(kind: &[u8; 4], version: u8, body: &[u8]) -> Vec<u8> {
    let mut inner = vec![version, 0, 0, 0];
    inner.extend(body);
    isobmff_box(kind, &inner)
}

pub struct HeifItem {
    pub id: u16,
    pub kind: [u8; 4],
    pub data: Vec<u8>,
}

fn meta_box(items: &[HeifItem], data_start: u32) -> Vec<u8> {
    let mut hdlr = vec![0u8; 4];
    hdlr.extend(b"pict");
    hdlr.extend([0u8; 12]);
    hdlr.push(0);

    let mut iinf = (items.len() as u16).to_be_bytes().to_vec();
    for item in items {
        let mut infe = item.id.to_be_bytes().to_vec();
        infe.extend(0u16.to_be_bytes());
        infe.extend(item.kind);
        infe.push(0);
        iinf.extend(full_box(b"infe", 2, &infe));
    }

    // version 0: 4-byte offsets and lengths, no base offset
    let mut iloc = vec![0x44, 0x00];
    iloc.extend((items.len() as u16).to_be_bytes());
    let mut offset = data_start;
    for item in items {
        iloc.extend(item.id.to_be_bytes());
        iloc.extend(0u16.to_be_bytes());
        iloc.extend(1u16.to_be_bytes());
        iloc.extend(offset.to_be_bytes());
        iloc.extend((item.data.len() as u32).to_be_bytes());
        offset += item.data.len() as u32;
    }

    let mut body = full_box(b"hdlr", 0, &hdlr);
    body.extend(full_box(b"iinf", 0, &iinf));
    body.extend(full_box(b"iloc", 0, &iloc));
    full_box(b"meta", 0, &body)
}

/// ftyp, meta describing `items`, mdat holding their bytes back to back.
pub fn heif(items: &[HeifItem]) -> Vec<u8> {
    let ftyp = isobmff_box(b"ftyp", b"heic\0\0\0\0mif1heic");
    let meta_len = meta_box(items, 0).len();
    let data_start = (ftyp.len() + meta_len + 8) as u32;

    let mut mdat = Vec::new();
    for item in items {
        mdat.extend(&item.data);
    }

    let mut out = ftyp;
    out.extend(meta_box(items, data_start));
    out.extend(isobmff_box(b"mdat", &mdat));
    out
}

/// A HEIF with an image item and an Exif item whose payload is `tiff`
/// preceded by the 4-byte header offset.
pub fn heif_with_exif(tiff: &[u8], header_offset: u32) -> Vec<u8> {
    let mut payload = header_offset.to_be_bytes().to_vec();
    payload.extend(tiff);
    heif(&[
        HeifItem {
            id: 1,
            kind: *b"hvc1",
            data: vec![0, 0, 0, 0],
        },
        HeifItem {
            id: 2,
            kind: *b"Exif",
            data: payload,
        },
    ])
}

/// MediaInfo `--Output=JSON` report with a General and a Video track.
pub fn mediainfo_report(tagged_date: Option<&str>) -> String {
    let general = match tagged_date {
        Some(d) => format!(r#"{{"@type":"General","Format":"MPEG-4","Tagged_Date":"{}"}}"#, d),
        None => r#"{"@type":"General","Format":"MPEG-4"}"#.to_string(),
    };
    format!(
        r#"{{"creatingLibrary":{{"name":"MediaInfoLib","version":"21.09"}},"media":{{"@ref":"clip.mp4","track":[{},{{"@type":"Video","Format":"AVC","Tagged_Date":"UTC 2001-01-01 00:00:00"}}]}}}}"#,
        general
    )
}

/// Shell script in `dir` that behaves like `mediainfo --Output=JSON <file>`
/// for a `.mp4` argument and fails on anything else.
#[cfg(unix)]
pub fn fake_mediainfo(dir: &Path, tagged_date: Option<&str>) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        "#!/bin/sh\n[ \"$1\" = \"--Output=JSON\" ] || exit 3\ncase \"$2\" in *.mp4) ;; *) exit 4 ;; esac\ncat <<'EOF'\n{}\nEOF\n",
        mediainfo_report(tagged_date)
    );
    let path = dir.join("mediainfo");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
