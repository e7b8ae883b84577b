use crate::Field;
use anyhow::{anyhow, bail, Result};

/// Parses an RLE pattern into a field of exactly the declared `x` by `y` size.
pub fn parse_rle(data: &[u8]) -> Result<Field> {
    let parse_next_number = |i: &mut usize| -> Result<usize> {
        while *i < data.len() && !data[*i].is_ascii_digit() {
            if data[*i] == b'\n' {
                bail!("RLE header is missing a size");
            }
            *i += 1;
        }
        let j = {
            let mut j = *i;
            while j < data.len() && data[j].is_ascii_digit() {
                j += 1;
            }
            j
        };
        if j == *i {
            bail!("RLE header is missing a size");
        }
        let digits = std::str::from_utf8(&data[*i..j])?;
        let ans = digits
            .parse::<usize>()
            .map_err(|_| anyhow!("invalid number {} in RLE data", digits))?;
        *i = j;
        Ok(ans)
    };

    let mut i = 0;
    // skipping comment and blank lines
    while i < data.len() && (data[i] == b'#' || data[i].is_ascii_whitespace()) {
        if data[i] == b'#' {
            while i < data.len() && data[i] != b'\n' {
                i += 1;
            }
        }
        i += 1;
    }
    if i >= data.len() || data[i] != b'x' {
        bail!("RLE header line must start with 'x'");
    }
    let width = parse_next_number(&mut i)?;
    let height = parse_next_number(&mut i)?;
    if width == 0 || height == 0 {
        bail!("RLE pattern must not be empty");
    }
    if width.checked_mul(height).is_none() {
        bail!("RLE pattern size {}x{} is too large", width, height);
    }
    // the rest of the header (e.g. `rule = B3/S23`) is ignored
    while i < data.len() && data[i] != b'\n' {
        i += 1;
    }

    let mut field = Field::blank(height, width);
    let (mut x, mut y, mut cnt): (usize, usize, usize) = (0, 0, 1);
    while i < data.len() {
        match data[i] {
            b'0'..=b'9' => {
                cnt = parse_next_number(&mut i)?;
                continue;
            }
            b'o' => {
                let end = x.checked_add(cnt).filter(|&v| v <= width && y < height);
                let Some(end) = end else {
                    bail!("RLE data exceeds the declared {}x{} size", width, height);
                };
                for col in x..end {
                    field.set(y, col, true);
                }
                (x, cnt) = (end, 1);
            }
            b'b' => {
                let Some(end) = x.checked_add(cnt).filter(|&v| v <= width) else {
                    bail!("RLE data exceeds the declared {}x{} size", width, height);
                };
                (x, cnt) = (end, 1);
            }
            b'$' => {
                let Some(end) = y.checked_add(cnt).filter(|&v| v <= height) else {
                    bail!("RLE data exceeds the declared {}x{} size", width, height);
                };
                (x, y, cnt) = (0, end, 1);
            }
            b'!' => return Ok(field),
            c if c.is_ascii_whitespace() => {}
            c => bail!("unexpected symbol {:?} in RLE data", c as char),
        }
        i += 1;
    }
    bail!("RLE data is not terminated with '!'")
}
