use crate::Field;
use anyhow::{anyhow, bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

const MAGIC: &str = "P1";

/// Saves generations as plain PBM (`P1`) images, one file per generation.
#[derive(Clone, Debug)]
pub struct FrameWriter {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl FrameWriter {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<prefix>_<generation>_<rows>*<cols>.<ext>`
    pub fn file_name(&self, generation: usize, rows: usize, cols: usize) -> String {
        format!(
            "{}_{}_{}*{}.{}",
            self.prefix, generation, rows, cols, self.extension
        )
    }

    pub fn path(&self, generation: usize, rows: usize, cols: usize) -> PathBuf {
        self.dir.join(self.file_name(generation, rows, cols))
    }

    /// Creates (or truncates) the frame file of `generation` and writes `field` into it.
    ///
    /// Returns the path of the written file.
    pub fn write(&self, field: &Field, generation: usize) -> Result<PathBuf> {
        let path = self.path(generation, field.rows(), field.cols());
        let file = File::create(&path)
            .with_context(|| format!("failed to create frame {}", path.display()))?;
        let mut out = BufWriter::new(file);
        encode(field, &mut out)
            .and_then(|()| out.flush())
            .with_context(|| format!("failed to write frame {}", path.display()))?;
        log::trace!("generation {} saved to {}", generation, path.display());
        Ok(path)
    }
}

/// Serializes `field`: magic, `<cols> <rows>`, then one line of `0`/`1` tokens per row.
pub fn encode(field: &Field, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", MAGIC)?;
    writeln!(out, "{} {}", field.cols(), field.rows())?;
    let mut line = String::with_capacity(field.cols() * 2);
    for row in field.rows_iter() {
        line.clear();
        for (i, &cell) in row.iter().enumerate() {
            if i != 0 {
                line.push(' ');
            }
            line.push(if cell { '1' } else { '0' });
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Parses a plain PBM image back into a field.
///
/// Accepts any whitespace layout, `#` comments and pixels packed without
/// separators (`0110`).
pub fn decode(input: impl BufRead) -> Result<Field> {
    let mut tokens = Vec::new();
    for line in input.lines() {
        let line = line.context("failed to read image")?;
        let content = match line.find('#') {
            Some(i) => &line[..i],
            None => &line[..],
        };
        tokens.extend(content.split_whitespace().map(str::to_owned));
    }

    let mut tokens = tokens.into_iter();
    match tokens.next() {
        Some(magic) if magic == MAGIC => {}
        Some(magic) => bail!("unsupported image type {:?}, expected {}", magic, MAGIC),
        None => bail!("empty image"),
    }
    let mut dimension = |name: &str| -> Result<usize> {
        let token = tokens
            .next()
            .ok_or_else(|| anyhow!("missing image {}", name))?;
        let value = token
            .parse::<usize>()
            .with_context(|| format!("invalid image {} {:?}", name, token))?;
        if value == 0 {
            bail!("image {} must be positive", name);
        }
        Ok(value)
    };
    let cols = dimension("width")?;
    let rows = dimension("height")?;

    let Some(total) = rows.checked_mul(cols) else {
        bail!("image size {}x{} is too large", cols, rows);
    };

    let mut cells = Vec::new();
    for token in tokens {
        for b in token.bytes() {
            match b {
                b'0' => cells.push(false),
                b'1' => cells.push(true),
                _ => bail!("unexpected pixel value {:?}", token),
            }
        }
    }
    if cells.len() != total {
        bail!(
            "image declares {}x{} pixels but contains {}",
            cols,
            rows,
            cells.len()
        );
    }
    Ok(Field::from_cells(rows, cols, cells))
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, FrameWriter};
    use crate::Field;

    fn encoded(field: &Field) -> String {
        let mut buf = Vec::new();
        encode(field, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_blank_2x3_layout() {
        let text = encoded(&Field::blank(2, 3));
        assert_eq!(text, "P1\n3 2\n0 0 0\n0 0 0\n");
        let tokens = text.split_whitespace().collect::<Vec<_>>();
        assert_eq!(tokens[..3], ["P1", "3", "2"]);
        assert_eq!(tokens[3..].len(), 6);
        assert!(tokens[3..].iter().all(|&t| t == "0"));
    }

    #[test]
    fn test_header_is_cols_then_rows() {
        let mut field = Field::blank(3, 5);
        field.set(0, 4, true);
        field.set(2, 0, true);
        let text = encoded(&field);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines, ["P1", "5 3", "0 0 0 0 1", "0 0 0 0 0", "1 0 0 0 0"]);
    }

    #[test]
    fn test_decode_accepts_comments_and_packed_pixels() {
        let text = "P1\n# made elsewhere\n4 2\n0110\n1 0 0\n1\n";
        let field = decode(text.as_bytes()).unwrap();
        assert_eq!((field.rows(), field.cols()), (2, 4));
        assert_eq!(
            field.cells(),
            &[false, true, true, false, true, false, false, true]
        );
    }

    #[test]
    fn test_decode_reads_back_encoded_field() {
        let field = Field::random(7, 11, Some(42), 0.5);
        let text = encoded(&field);
        assert_eq!(decode(text.as_bytes()).unwrap(), field);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode("P3\n1 1\n0\n".as_bytes()).is_err());
        assert!(decode("".as_bytes()).is_err());
        assert!(decode("P1\n2 2\n0 1 0\n".as_bytes()).is_err());
        assert!(decode("P1\n0 2\n".as_bytes()).is_err());
        assert!(decode("P1\n1 1\n2\n".as_bytes()).is_err());
        let err = decode("P1\n4294967296 4294967296\n0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("too large"), "{:#}", err);
        assert!(decode(format!("P1\n{} 2\n0\n", usize::MAX).as_bytes()).is_err());
    }

    #[test]
    fn test_file_name() {
        let writer = FrameWriter::new(".", "life", "ppm");
        assert_eq!(writer.file_name(7, 100, 80), "life_7_100*80.ppm");
    }

    #[test]
    fn test_write_creates_file() {
        let dir =
            std::env::temp_dir().join(format!("conway_frames_write_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let writer = FrameWriter::new(&dir, "t", "pbm");

        let path = writer.write(&Field::blank(2, 3), 0).unwrap();
        assert_eq!(path, dir.join("t_0_2*3.pbm"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "P1\n3 2\n0 0 0\n0 0 0\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_into_missing_dir_fails_with_path() {
        let dir = std::env::temp_dir()
            .join(format!("conway_frames_missing_{}", std::process::id()))
            .join("nope");
        let writer = FrameWriter::new(&dir, "t", "pbm");
        let err = writer.write(&Field::blank(1, 1), 3).unwrap_err();
        assert!(format!("{:#}", err).contains("t_3_1*1.pbm"), "{:#}", err);
    }
}
