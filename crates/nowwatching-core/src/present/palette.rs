//! Dominant colours of a cover image.

use std::collections::HashMap;

/// Perceived-brightness cutoff; at or below this a colour is dark.
pub const DARK_THRESHOLD: f64 = 80.0;

/// Longest side of the thumbnail that is actually sampled.
const SAMPLE_SIZE: u32 = 64;

/// Bits dropped from each channel when bucketing.
const QUANT_SHIFT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// HSP perceived brightness, `0.0..=255.0`.
    pub fn hsp(self) -> f64 {
        let (r, g, b) = (f64::from(self.r), f64::from(self.g), f64::from(self.b));
        (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt()
    }

    pub fn is_dark(self) -> bool {
        self.hsp() <= DARK_THRESHOLD
    }

    /// Lowercase hex without the leading `#`.
    pub fn hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Up to `count` representative colours, most common first.
pub fn extract_palette(bytes: &[u8], count: usize) -> Result<Vec<Rgb>, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let img = if img.width() > SAMPLE_SIZE || img.height() > SAMPLE_SIZE {
        img.thumbnail(SAMPLE_SIZE, SAMPLE_SIZE)
    } else {
        img
    }
    .to_rgb8();

    let mut buckets: HashMap<(u8, u8, u8), (u64, [u64; 3])> = HashMap::new();
    for px in img.pixels() {
        let [r, g, b] = px.0;
        let key = (r >> QUANT_SHIFT, g >> QUANT_SHIFT, b >> QUANT_SHIFT);
        let entry = buckets.entry(key).or_insert((0, [0; 3]));
        entry.0 += 1;
        entry.1[0] += u64::from(r);
        entry.1[1] += u64::from(g);
        entry.1[2] += u64::from(b);
    }

    let mut ranked: Vec<_> = buckets.into_iter().collect();
    // Ties broken by bucket key so the result is deterministic.
    ranked.sort_by(|(ka, (na, _)), (kb, (nb, _))| nb.cmp(na).then(ka.cmp(kb)));

    Ok(ranked
        .into_iter()
        .take(count)
        .map(|(_, (n, sum))| {
            let mean = |s: u64| (s / n) as u8;
            Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2]))
        })
        .collect())
}

/// First palette entry, or the first non-dark one when `skip_dark` is set.
pub fn choose_bar_color(palette: &[Rgb], skip_dark: bool) -> Option<Rgb> {
    palette
        .iter()
        .copied()
        .find(|color| !(skip_dark && color.is_dark()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb as Pixel};
    use std::io::Cursor;

    fn png(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| Pixel(f(x, y)));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_brightness_classification() {
        assert!(Rgb::new(10, 10, 10).is_dark());
        assert!(Rgb::new(80, 80, 80).is_dark());
        assert!(!Rgb::new(83, 177, 79).is_dark());
        assert!(!Rgb::new(255, 255, 255).is_dark());
    }

    #[test]
    fn test_skip_dark_picks_first_light() {
        let palette = [Rgb::new(20, 20, 30), Rgb::new(200, 40, 40), Rgb::new(30, 200, 30)];
        assert_eq!(choose_bar_color(&palette, true), Some(Rgb::new(200, 40, 40)));
        assert_eq!(choose_bar_color(&palette, false), Some(Rgb::new(20, 20, 30)));
        assert_eq!(choose_bar_color(&[Rgb::new(0, 0, 0)], true), None);
    }

    #[test]
    fn test_extract_palette_orders_by_frequency() {
        // Three quarters red, one quarter blue.
        let bytes = png(8, 8, |x, _| if x < 6 { [220, 20, 20] } else { [20, 20, 220] });
        let palette = extract_palette(&bytes, 5).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0], Rgb::new(220, 20, 20));
        assert_eq!(palette[1], Rgb::new(20, 20, 220));
        assert_eq!(palette[0].hex(), "dc1414");
    }

    #[test]
    fn test_extract_palette_rejects_garbage() {
        assert!(extract_palette(b"not an image", 5).is_err());
    }
}
